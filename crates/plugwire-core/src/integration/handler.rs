use std::any::type_name;
use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::integration::error::IntegrationError;
use crate::integration::message::Message;
use crate::integration::methods::{ServiceMethod, ServiceMethods};
use crate::kernel::error::Result;
use crate::plugin_system::ordering::OrderAwarePluginRegistry;
use crate::plugin_system::registry::{PluginRegistry, SimplePluginRegistry};
use crate::plugin_system::traits::{Plugin, short_type_name};
use crate::support::registry_factory::PluginRegistryFactory;

/// Pointer selecting the whole payload as delimiter
pub const PAYLOAD_POINTER: &str = "/payload";

/// How many plugins a handler invokes per message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupMethod {
    /// Only the first plugin supporting the delimiter
    #[default]
    One,
    /// Every plugin supporting the delimiter, in registry order
    All,
}

/// Asynchronous message handler
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Handle a message, returning the reply if there is one
    async fn handle(&self, message: &Message) -> Result<Option<Value>>;
}

/// Supplies the registry a handler selects plugins from, once per message.
pub trait RegistrySource<P, S>: Send + Sync
where
    P: Plugin<S> + ?Sized,
    S: ?Sized,
{
    type Registry: PluginRegistry<P, S>;

    fn current_registry(&self) -> Result<Self::Registry>;
}

impl<P, S> RegistrySource<P, S> for SimplePluginRegistry<P, S>
where
    P: Plugin<S> + ?Sized,
    S: ?Sized,
{
    type Registry = Self;

    fn current_registry(&self) -> Result<Self> {
        Ok(self.clone())
    }
}

impl<P, S> RegistrySource<P, S> for OrderAwarePluginRegistry<P, S>
where
    P: Plugin<S> + ?Sized,
    S: ?Sized,
{
    type Registry = Self;

    fn current_registry(&self) -> Result<Self> {
        Ok(self.clone())
    }
}

impl<P, S> RegistrySource<P, S> for Arc<PluginRegistryFactory<P, S>>
where
    P: Plugin<S> + ?Sized + 'static,
    S: ?Sized + 'static,
{
    type Registry = OrderAwarePluginRegistry<P, S>;

    fn current_registry(&self) -> Result<Self::Registry> {
        self.registry()
    }
}

/// Routes each message to the plugin(s) of a registry that support the
/// delimiter derived from the message, and invokes a named service method on
/// them.
pub struct PluginRegistryAwareMessageHandler<P: ?Sized, S: ?Sized + ToOwned, R> {
    registry: R,
    method_name: String,
    method: ServiceMethod<P>,
    lookup: LookupMethod,
    pointer: String,
    extractor: Arc<dyn Fn(&Message) -> Result<S::Owned> + Send + Sync>,
    _delimiter: PhantomData<fn(&S)>,
}

impl<P, S, R> PluginRegistryAwareMessageHandler<P, S, R>
where
    P: Plugin<S> + ?Sized + 'static,
    S: ?Sized + ToOwned + 'static,
    S::Owned: DeserializeOwned,
    R: RegistrySource<P, S>,
{
    /// Fails with [`IntegrationError::NoApplicableMethod`] when `method_name`
    /// is not declared in `methods`. The delimiter defaults to the payload.
    pub fn new(registry: R, methods: &ServiceMethods<P>, method_name: impl Into<String>) -> Result<Self> {
        let method_name = method_name.into();
        let method = methods.get(&method_name).ok_or_else(|| IntegrationError::NoApplicableMethod {
            method: method_name.clone(),
            plugin_type: short_type_name(type_name::<P>()).to_string(),
        })?;

        Ok(Self {
            registry,
            method_name,
            method,
            lookup: LookupMethod::default(),
            pointer: PAYLOAD_POINTER.to_string(),
            extractor: Arc::new(pointer_extractor::<S>(PAYLOAD_POINTER.to_string())),
            _delimiter: PhantomData,
        })
    }

    /// Derive the delimiter from the value at a JSON pointer into
    /// [`Message::to_value`]
    pub fn with_delimiter_pointer(mut self, pointer: impl Into<String>) -> Result<Self> {
        let pointer = pointer.into();
        validate_delimiter_pointer(&pointer)?;
        self.extractor = Arc::new(pointer_extractor::<S>(pointer.clone()));
        self.pointer = pointer;
        Ok(self)
    }
}

impl<P, S, R> PluginRegistryAwareMessageHandler<P, S, R>
where
    P: Plugin<S> + ?Sized + 'static,
    S: ?Sized + ToOwned + 'static,
    R: RegistrySource<P, S>,
{
    /// Derive the delimiter with an arbitrary function
    pub fn with_delimiter_extractor<F>(mut self, extractor: F) -> Self
    where
        F: Fn(&Message) -> Result<S::Owned> + Send + Sync + 'static,
    {
        self.extractor = Arc::new(extractor);
        self.pointer = "<custom>".to_string();
        self
    }

    pub fn with_lookup(mut self, lookup: LookupMethod) -> Self {
        self.lookup = lookup;
        self
    }

    pub fn lookup(&self) -> LookupMethod {
        self.lookup
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// Select plugin(s) for the message and invoke the service method.
    ///
    /// With [`LookupMethod::One`] the reply is the first match's result, or
    /// none when nothing matches. With [`LookupMethod::All`] the reply is
    /// the array of every non-empty result, in registry order.
    pub fn invoke(&self, message: &Message) -> Result<Option<Value>> {
        let owned = (self.extractor)(message)?;
        let delimiter: &S = owned.borrow();
        let registry = self.registry.current_registry()?;

        match self.lookup {
            LookupMethod::One => match registry.plugin_for(delimiter) {
                Some(plugin) => {
                    log::debug!(
                        "Invoking '{}' on {} for message {}",
                        self.method_name,
                        plugin.plugin_name(),
                        message.id
                    );
                    Ok((self.method)(plugin.as_ref(), message))
                }
                None => {
                    log::debug!(
                        "No plugin supports the delimiter of message {}; nothing to invoke",
                        message.id
                    );
                    Ok(None)
                }
            },
            LookupMethod::All => {
                let plugins = registry.plugins_for(delimiter);
                log::debug!(
                    "Invoking '{}' on {} plugin(s) for message {}",
                    self.method_name,
                    plugins.len(),
                    message.id
                );
                let results: Vec<Value> = plugins
                    .iter()
                    .filter_map(|plugin| (self.method)(plugin.as_ref(), message))
                    .collect();
                Ok(Some(Value::Array(results)))
            }
        }
    }
}

#[async_trait]
impl<P, S, R> MessageHandler for PluginRegistryAwareMessageHandler<P, S, R>
where
    P: Plugin<S> + ?Sized + 'static,
    S: ?Sized + ToOwned + 'static,
    R: RegistrySource<P, S>,
{
    async fn handle(&self, message: &Message) -> Result<Option<Value>> {
        self.invoke(message)
    }
}

impl<P: ?Sized, S: ?Sized + ToOwned, R> fmt::Debug for PluginRegistryAwareMessageHandler<P, S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistryAwareMessageHandler")
            .field("method", &self.method_name)
            .field("lookup", &self.lookup)
            .field("delimiter", &self.pointer)
            .finish_non_exhaustive()
    }
}

/// A delimiter pointer must be empty or start with '/'
pub(crate) fn validate_delimiter_pointer(pointer: &str) -> Result<()> {
    if !pointer.is_empty() && !pointer.starts_with('/') {
        return Err(IntegrationError::InvalidDelimiter {
            pointer: pointer.to_string(),
            reason: "a JSON pointer must be empty or start with '/'".to_string(),
        }
        .into());
    }
    Ok(())
}

fn pointer_extractor<S>(pointer: String) -> impl Fn(&Message) -> Result<S::Owned> + Send + Sync + 'static
where
    S: ?Sized + ToOwned + 'static,
    S::Owned: DeserializeOwned,
{
    move |message: &Message| {
        let value = message.pointer(&pointer).ok_or_else(|| IntegrationError::InvalidDelimiter {
            pointer: pointer.clone(),
            reason: "no value at pointer".to_string(),
        })?;
        serde_json::from_value(value).map_err(|e| {
            IntegrationError::InvalidDelimiter {
                pointer: pointer.clone(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}
