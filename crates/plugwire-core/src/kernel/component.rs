use std::any::{Any, TypeId, type_name};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::kernel::error::{ComponentError, Result};
use crate::plugin_system::traits::short_type_name;

/// Types to skip when enumerating the components providing a capability.
///
/// A component is excluded when its concrete type id is listed, or when its
/// type name matches a listed name (either fully qualified or the short,
/// last path segment form).
#[derive(Debug, Clone, Default)]
pub struct Exclusions {
    type_ids: HashSet<TypeId>,
    type_names: HashSet<String>,
}

impl Exclusions {
    pub fn none() -> Self {
        Self::default()
    }

    /// Exclude the concrete type `V`
    pub fn with_type<V: Any>(mut self) -> Self {
        self.type_ids.insert(TypeId::of::<V>());
        self
    }

    /// Exclude every type with this name
    pub fn with_type_name(mut self, name: impl Into<String>) -> Self {
        self.type_names.insert(name.into());
        self
    }

    pub fn from_type_names<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        names
            .into_iter()
            .fold(Self::none(), |exclusions, name| exclusions.with_type_name(name))
    }

    pub fn is_empty(&self) -> bool {
        self.type_ids.is_empty() && self.type_names.is_empty()
    }

    pub fn excludes(&self, type_id: TypeId, type_name: &str) -> bool {
        self.type_ids.contains(&type_id)
            || self.type_names.contains(type_name)
            || self.type_names.contains(short_type_name(type_name))
    }
}

/// A registered component and the capability views it provides
struct ComponentEntry {
    name: String,
    type_id: TypeId,
    type_name: &'static str,
    instance: Arc<dyn Any + Send + Sync>,
    // TypeId of the capability `P` -> boxed `Arc<P>`
    provided: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

/// Handle returned by [`ComponentRegistry::register`] to declare which
/// capabilities (usually trait objects) the new component provides.
pub struct ComponentBinding<'a, V> {
    entry: &'a mut ComponentEntry,
    instance: Arc<V>,
}

impl<V: Send + Sync + 'static> ComponentBinding<'_, V> {
    /// Expose the component as `Arc<P>`. The cast is usually the identity
    /// closure, relying on unsized coercion: `.provides(|it| -> Arc<dyn Greeter> { it })`.
    pub fn provides<P>(self, cast: impl FnOnce(Arc<V>) -> Arc<P>) -> Self
    where
        P: ?Sized + Send + Sync + 'static,
    {
        let view: Arc<P> = cast(Arc::clone(&self.instance));
        self.entry.provided.insert(TypeId::of::<P>(), Box::new(view));
        self
    }

    pub fn name(&self) -> &str {
        &self.entry.name
    }
}

/// In-process component container.
///
/// Components are kept in registration order, addressed by unique name, and
/// can be enumerated by the capabilities they provide.
#[derive(Default)]
pub struct ComponentRegistry {
    entries: Vec<ComponentEntry>,
    index: HashMap<String, usize>,
}

impl ComponentRegistry {
    /// Create a new empty component registry
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a component instance under a unique name
    pub fn register<V>(&mut self, name: impl Into<String>, instance: Arc<V>) -> Result<ComponentBinding<'_, V>>
    where
        V: Send + Sync + 'static,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ComponentError::BlankName.into());
        }
        if self.index.contains_key(&name) {
            return Err(ComponentError::DuplicateName { name }.into());
        }

        let position = self.entries.len();
        self.entries.push(ComponentEntry {
            name: name.clone(),
            type_id: TypeId::of::<V>(),
            type_name: type_name::<V>(),
            instance: Arc::clone(&instance) as Arc<dyn Any + Send + Sync>,
            provided: HashMap::new(),
        });
        self.index.insert(name, position);

        let entry = &mut self.entries[position];
        Ok(ComponentBinding { entry, instance })
    }

    fn entry(&self, name: &str) -> Result<&ComponentEntry> {
        self.index
            .get(name)
            .map(|position| &self.entries[*position])
            .ok_or_else(|| {
                ComponentError::NotFound {
                    name: name.to_string(),
                }
                .into()
            })
    }

    /// Get a component by name as its concrete type
    pub fn get<V>(&self, name: &str) -> Result<Arc<V>>
    where
        V: Send + Sync + 'static,
    {
        let entry = self.entry(name)?;
        Arc::clone(&entry.instance).downcast::<V>().map_err(|_| {
            ComponentError::TypeMismatch {
                name: name.to_string(),
                expected: type_name::<V>(),
                actual: entry.type_name,
            }
            .into()
        })
    }

    /// Get a capability view of a component by name
    pub fn get_provided<P>(&self, name: &str) -> Result<Arc<P>>
    where
        P: ?Sized + Send + Sync + 'static,
    {
        let entry = self.entry(name)?;
        entry
            .provided
            .get(&TypeId::of::<P>())
            .and_then(|view| view.downcast_ref::<Arc<P>>())
            .cloned()
            .ok_or_else(|| {
                ComponentError::TypeMismatch {
                    name: name.to_string(),
                    expected: type_name::<P>(),
                    actual: entry.type_name,
                }
                .into()
            })
    }

    /// All components providing `P`, in registration order, minus the
    /// excluded types.
    pub fn instances_of<P>(&self, exclusions: &Exclusions) -> Vec<Arc<P>>
    where
        P: ?Sized + Send + Sync + 'static,
    {
        let capability = TypeId::of::<P>();
        self.entries
            .iter()
            .filter(|entry| !exclusions.excludes(entry.type_id, entry.type_name))
            .filter_map(|entry| entry.provided.get(&capability))
            .filter_map(|view| view.downcast_ref::<Arc<P>>())
            .cloned()
            .collect()
    }

    /// Names of the components providing `P`, in registration order
    pub fn names_providing<P>(&self) -> Vec<String>
    where
        P: ?Sized + 'static,
    {
        let capability = TypeId::of::<P>();
        self.entries
            .iter()
            .filter(|entry| entry.provided.contains_key(&capability))
            .map(|entry| entry.name.clone())
            .collect()
    }

    /// All component names in registration order
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.name.clone()).collect()
    }

    /// Fully qualified type name of a component
    pub fn type_name_of(&self, name: &str) -> Option<&'static str> {
        self.entry(name).ok().map(|entry| entry.type_name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("components", &self.names())
            .finish()
    }
}
