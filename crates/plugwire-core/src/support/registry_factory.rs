use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::kernel::component::Exclusions;
use crate::kernel::context::{ApplicationContext, ContextListener};
use crate::kernel::error::Result;
use crate::plugin_system::ordering::{OrderAwarePluginRegistry, SortOrder};
use crate::plugin_system::registry::PluginRegistry;
use crate::plugin_system::traits::{Plugin, short_type_name};
use crate::support::type_aware::{BeansOfType, ComponentSource};

/// What a factory registered in the container produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactoryKind {
    Registry,
    List,
}

impl fmt::Display for FactoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactoryKind::Registry => write!(f, "registry"),
            FactoryKind::List => write!(f, "list"),
        }
    }
}

/// Type-erased view of a registry or list factory, for listing what a
/// container holds without knowing the plugin types.
pub trait FactoryDescriptor: Send + Sync {
    fn kind(&self) -> FactoryKind;

    /// Declared name of the plugin type the factory collects
    fn plugin_type(&self) -> &str;

    /// Names of the plugins the factory currently produces, in order
    fn plugin_names(&self) -> Result<Vec<String>>;
}

/// Produces an [`OrderAwarePluginRegistry`] over every component of type
/// `P` found by its source.
///
/// The registry is rebuilt on every [`registry`](Self::registry) call, so it
/// reflects components registered after the factory itself, until the
/// factory is frozen. Registering the factory as a [`ContextListener`]
/// freezes it and takes the snapshot when the context is refreshed.
pub struct PluginRegistryFactory<P: ?Sized, S: ?Sized> {
    beans: BeansOfType<P>,
    order: SortOrder,
    plugin_type: String,
    _delimiter: PhantomData<fn(&S)>,
}

impl<P, S> PluginRegistryFactory<P, S>
where
    P: Plugin<S> + ?Sized + 'static,
    S: ?Sized + 'static,
{
    pub fn new(beans: BeansOfType<P>) -> Self {
        Self {
            beans,
            order: SortOrder::default(),
            plugin_type: short_type_name(type_name::<P>()).to_string(),
            _delimiter: PhantomData,
        }
    }

    pub fn from_source(source: impl ComponentSource<P> + 'static) -> Self {
        Self::new(BeansOfType::new(source))
    }

    /// Factory over a host supplied enumeration callback
    pub fn from_supplier<F>(supplier: F) -> Self
    where
        F: Fn() -> Vec<Arc<P>> + Send + Sync + 'static,
    {
        Self::new(BeansOfType::from_supplier(supplier))
    }

    /// Factory over everything in `context` providing `P`
    pub fn from_context(context: &Arc<ApplicationContext>, exclusions: Exclusions) -> Self {
        Self::new(BeansOfType::from_context(context, exclusions))
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Override the plugin type name reported by [`FactoryDescriptor`]
    pub fn with_plugin_type(mut self, plugin_type: impl Into<String>) -> Self {
        self.plugin_type = plugin_type.into();
        self
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// Build the registry from the current (or frozen) component list
    pub fn registry(&self) -> Result<OrderAwarePluginRegistry<P, S>> {
        let beans = self.beans.beans()?;
        Ok(OrderAwarePluginRegistry::of_sorted(beans, self.order))
    }

    pub fn freeze(&self) {
        self.beans.freeze();
    }

    pub fn is_frozen(&self) -> bool {
        self.beans.is_frozen()
    }
}

impl<P, S> ContextListener for PluginRegistryFactory<P, S>
where
    P: Plugin<S> + ?Sized + 'static,
    S: ?Sized + 'static,
{
    fn on_context_refreshed(&self, _context: &ApplicationContext) -> Result<()> {
        match self.beans.capture() {
            Ok(count) => log::debug!("Froze registry of {} with {} plugin(s)", self.plugin_type, count),
            Err(e) => log::warn!(
                "Could not snapshot registry of {} on refresh, retrying on first use: {}",
                self.plugin_type,
                e
            ),
        }
        Ok(())
    }
}

impl<P, S> FactoryDescriptor for PluginRegistryFactory<P, S>
where
    P: Plugin<S> + ?Sized + 'static,
    S: ?Sized + 'static,
{
    fn kind(&self) -> FactoryKind {
        FactoryKind::Registry
    }

    fn plugin_type(&self) -> &str {
        &self.plugin_type
    }

    fn plugin_names(&self) -> Result<Vec<String>> {
        let registry = self.registry()?;
        Ok(registry
            .iter()
            .map(|plugin| short_type_name(plugin.plugin_name()).to_string())
            .collect())
    }
}

impl<P: ?Sized, S: ?Sized> fmt::Debug for PluginRegistryFactory<P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistryFactory")
            .field("plugin_type", &self.plugin_type)
            .field("order", &self.order)
            .field("beans", &self.beans)
            .finish()
    }
}
