use std::fmt;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::slice;
use std::sync::Arc;

use crate::plugin_system::error::RegistryError;
use crate::plugin_system::traits::Plugin;

/// Lookup operations over an ordered, read-only set of plugins.
///
/// Every "for delimiter" operation is a single linear scan applying
/// [`Plugin::supports`]; first-match operations stop at the first hit.
/// Only the "required" variants turn absence into an error.
pub trait PluginRegistry<T, S>
where
    T: Plugin<S> + ?Sized,
    S: ?Sized,
{
    /// All registered plugins in registry order.
    ///
    /// Meant for diagnostics and tests; prefer the lookup methods for
    /// selecting plugins.
    fn plugins(&self) -> &[Arc<T>];

    /// Iterate over the registered plugins in registry order
    fn iter(&self) -> slice::Iter<'_, Arc<T>> {
        self.plugins().iter()
    }

    /// Returns the first plugin supporting the delimiter
    fn plugin_for(&self, delimiter: &S) -> Option<Arc<T>> {
        self.plugins()
            .iter()
            .find(|plugin| plugin.supports(delimiter))
            .cloned()
    }

    /// Returns the first plugin supporting the delimiter or a
    /// [`RegistryError::NotFound`] naming the delimiter and all plugins.
    fn required_plugin_for(&self, delimiter: &S) -> Result<Arc<T>, RegistryError>
    where
        S: Debug,
    {
        self.plugin_for(delimiter).ok_or_else(|| {
            RegistryError::not_found(
                delimiter,
                self.plugins().iter().map(|plugin| plugin.plugin_name()),
            )
        })
    }

    /// Like [`required_plugin_for`](Self::required_plugin_for), with the
    /// failure message produced lazily by the caller.
    fn required_plugin_for_with<F>(&self, delimiter: &S, message: F) -> Result<Arc<T>, RegistryError>
    where
        F: FnOnce() -> String,
        Self: Sized,
    {
        self.plugin_for(delimiter)
            .ok_or_else(|| RegistryError::with_message(message()))
    }

    /// Returns the first plugin supporting the delimiter or the error built
    /// by `error`. The closure only runs on a miss.
    fn plugin_for_or_else<E, F>(&self, delimiter: &S, error: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> E,
        Self: Sized,
    {
        self.plugin_for(delimiter).ok_or_else(error)
    }

    /// Returns all plugins supporting the delimiter, in registry order.
    /// An empty result is not an error.
    fn plugins_for(&self, delimiter: &S) -> Vec<Arc<T>> {
        self.plugins()
            .iter()
            .filter(|plugin| plugin.supports(delimiter))
            .cloned()
            .collect()
    }

    /// Returns all plugins supporting the delimiter, or the error built by
    /// `error` if there are none.
    fn plugins_for_or_else<E, F>(&self, delimiter: &S, error: F) -> Result<Vec<Arc<T>>, E>
    where
        F: FnOnce() -> E,
        Self: Sized,
    {
        let plugins = self.plugins_for(delimiter);
        if plugins.is_empty() {
            return Err(error());
        }
        Ok(plugins)
    }

    /// Returns the first plugin supporting the delimiter or `default`
    fn plugin_or_default_for(&self, delimiter: &S, default: Arc<T>) -> Arc<T> {
        self.plugin_for(delimiter).unwrap_or(default)
    }

    /// Returns the first plugin supporting the delimiter or the plugin
    /// produced by `default`. The supplier is not invoked on a hit.
    fn plugin_or_else_get<F>(&self, delimiter: &S, default: F) -> Arc<T>
    where
        F: FnOnce() -> Arc<T>,
        Self: Sized,
    {
        self.plugin_for(delimiter).unwrap_or_else(default)
    }

    /// Returns all plugins supporting the delimiter or `defaults` if none do
    fn plugins_or_default_for(&self, delimiter: &S, defaults: Vec<Arc<T>>) -> Vec<Arc<T>> {
        let plugins = self.plugins_for(delimiter);
        if plugins.is_empty() { defaults } else { plugins }
    }

    /// Number of registered plugins
    fn count_plugins(&self) -> usize {
        self.plugins().len()
    }

    /// Whether this exact plugin instance is registered
    fn contains(&self, plugin: &Arc<T>) -> bool {
        self.plugins()
            .iter()
            .any(|candidate| Arc::ptr_eq(candidate, plugin))
    }

    /// Whether any plugin supports the delimiter
    fn has_plugin_for(&self, delimiter: &S) -> bool {
        self.plugin_for(delimiter).is_some()
    }
}

/// Plugin registry holding plugins in construction order.
///
/// The plugin list is fixed at construction. Cloning is cheap and shares the
/// underlying list.
pub struct SimplePluginRegistry<T: ?Sized, S: ?Sized> {
    plugins: Arc<Vec<Arc<T>>>,
    _delimiter: PhantomData<fn(&S)>,
}

impl<T, S> SimplePluginRegistry<T, S>
where
    T: Plugin<S> + ?Sized,
    S: ?Sized,
{
    /// Create an empty registry
    pub fn empty() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Create a registry holding the given plugins in iteration order
    pub fn of<I>(plugins: I) -> Self
    where
        I: IntoIterator<Item = Arc<T>>,
    {
        Self::from_vec(plugins.into_iter().collect())
    }

    /// Create a registry from possibly absent entries. Absent entries are
    /// dropped silently.
    pub fn of_nullable<I>(plugins: I) -> Self
    where
        I: IntoIterator<Item = Option<Arc<T>>>,
    {
        Self::from_vec(plugins.into_iter().flatten().collect())
    }

    pub(crate) fn from_vec(plugins: Vec<Arc<T>>) -> Self {
        Self {
            plugins: Arc::new(plugins),
            _delimiter: PhantomData,
        }
    }
}

impl<T, S> PluginRegistry<T, S> for SimplePluginRegistry<T, S>
where
    T: Plugin<S> + ?Sized,
    S: ?Sized,
{
    fn plugins(&self) -> &[Arc<T>] {
        &self.plugins
    }
}

impl<T: ?Sized, S: ?Sized> Clone for SimplePluginRegistry<T, S> {
    fn clone(&self) -> Self {
        Self {
            plugins: Arc::clone(&self.plugins),
            _delimiter: PhantomData,
        }
    }
}

impl<T, S> Default for SimplePluginRegistry<T, S>
where
    T: Plugin<S> + ?Sized,
    S: ?Sized,
{
    fn default() -> Self {
        Self::empty()
    }
}

impl<T, S> fmt::Debug for SimplePluginRegistry<T, S>
where
    T: Plugin<S> + ?Sized,
    S: ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.plugins.iter().map(|plugin| plugin.plugin_name()))
            .finish()
    }
}

impl<'a, T, S> IntoIterator for &'a SimplePluginRegistry<T, S>
where
    T: Plugin<S> + ?Sized,
    S: ?Sized,
{
    type Item = &'a Arc<T>;
    type IntoIter = slice::Iter<'a, Arc<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.plugins.iter()
    }
}
