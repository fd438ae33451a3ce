use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::kernel::component::Exclusions;
use crate::kernel::context::{ApplicationContext, ContextListener};
use crate::kernel::error::Result;
use crate::plugin_system::ordering::Comparator;
use crate::plugin_system::traits::{Plugin, short_type_name};
use crate::support::registry_factory::{FactoryDescriptor, FactoryKind};
use crate::support::type_aware::BeansOfType;

/// Produces the plain, priority sorted list of every component of type `P`.
///
/// Freezes like [`PluginRegistryFactory`](crate::support::PluginRegistryFactory)
/// once the context is refreshed.
pub struct BeanListFactory<P: ?Sized, S: ?Sized> {
    beans: BeansOfType<P>,
    comparator: Comparator<P>,
    plugin_type: String,
    _delimiter: PhantomData<fn(&S)>,
}

impl<P, S> BeanListFactory<P, S>
where
    P: Plugin<S> + ?Sized + 'static,
    S: ?Sized + 'static,
{
    pub fn new(beans: BeansOfType<P>) -> Self {
        Self {
            beans,
            comparator: Comparator::default_order::<S>(),
            plugin_type: short_type_name(type_name::<P>()).to_string(),
            _delimiter: PhantomData,
        }
    }

    pub fn from_supplier<F>(supplier: F) -> Self
    where
        F: Fn() -> Vec<Arc<P>> + Send + Sync + 'static,
    {
        Self::new(BeansOfType::from_supplier(supplier))
    }

    pub fn from_context(context: &Arc<ApplicationContext>, exclusions: Exclusions) -> Self {
        Self::new(BeansOfType::from_context(context, exclusions))
    }

    pub fn with_plugin_type(mut self, plugin_type: impl Into<String>) -> Self {
        self.plugin_type = plugin_type.into();
        self
    }

    /// The components, stably sorted by their priority hints
    pub fn beans(&self) -> Result<Vec<Arc<P>>> {
        let mut beans = self.beans.beans()?;
        beans.sort_by(|left, right| self.comparator.compare(left, right));
        Ok(beans)
    }

    pub fn freeze(&self) {
        self.beans.freeze();
    }

    pub fn is_frozen(&self) -> bool {
        self.beans.is_frozen()
    }
}

impl<P, S> ContextListener for BeanListFactory<P, S>
where
    P: Plugin<S> + ?Sized + 'static,
    S: ?Sized + 'static,
{
    fn on_context_refreshed(&self, _context: &ApplicationContext) -> Result<()> {
        match self.beans.capture() {
            Ok(count) => log::debug!("Froze list of {} with {} plugin(s)", self.plugin_type, count),
            Err(e) => log::warn!(
                "Could not snapshot list of {} on refresh, retrying on first use: {}",
                self.plugin_type,
                e
            ),
        }
        Ok(())
    }
}

impl<P, S> FactoryDescriptor for BeanListFactory<P, S>
where
    P: Plugin<S> + ?Sized + 'static,
    S: ?Sized + 'static,
{
    fn kind(&self) -> FactoryKind {
        FactoryKind::List
    }

    fn plugin_type(&self) -> &str {
        &self.plugin_type
    }

    fn plugin_names(&self) -> Result<Vec<String>> {
        Ok(self
            .beans()?
            .iter()
            .map(|plugin| short_type_name(plugin.plugin_name()).to_string())
            .collect())
    }
}

impl<P: ?Sized, S: ?Sized> fmt::Debug for BeanListFactory<P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanListFactory")
            .field("plugin_type", &self.plugin_type)
            .field("beans", &self.beans)
            .finish_non_exhaustive()
    }
}
