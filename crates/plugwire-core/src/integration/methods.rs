use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::integration::message::Message;

/// An operation invoked on a selected plugin. `None` means the operation has
/// no return value; such results are never collected.
pub type ServiceMethod<P> = Arc<dyn Fn(&P, &Message) -> Option<Value> + Send + Sync>;

/// Named operations that message handlers may invoke on plugins of type `P`.
pub struct ServiceMethods<P: ?Sized> {
    methods: HashMap<String, ServiceMethod<P>>,
}

impl<P: ?Sized> ServiceMethods<P> {
    pub fn new() -> Self {
        Self {
            methods: HashMap::new(),
        }
    }

    /// Add (or replace) an operation
    pub fn method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&P, &Message) -> Option<Value> + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(method));
        self
    }

    pub fn get(&self, name: &str) -> Option<ServiceMethod<P>> {
        self.methods.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Declared operation names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl<P: ?Sized> Default for ServiceMethods<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ?Sized> Clone for ServiceMethods<P> {
    fn clone(&self) -> Self {
        Self {
            methods: self.methods.clone(),
        }
    }
}

impl<P: ?Sized> fmt::Debug for ServiceMethods<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceMethods")
            .field("methods", &self.names())
            .finish()
    }
}
