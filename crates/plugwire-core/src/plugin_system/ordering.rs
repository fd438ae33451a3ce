use std::cmp::Ordering;
use std::fmt;
use std::slice;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::plugin_system::registry::{PluginRegistry, SimplePluginRegistry};
use crate::plugin_system::traits::{compare_order, Plugin};

/// Shareable total order over plugins (or any other components).
pub struct Comparator<T: ?Sized> {
    compare: Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>,
}

impl<T: ?Sized + 'static> Comparator<T> {
    /// Wrap an arbitrary comparison function
    pub fn from_fn<F>(compare: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        Self {
            compare: Arc::new(compare),
        }
    }

    /// Order ascending by a derived key
    pub fn by_key<K, F>(key: F) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Self::from_fn(move |left: &T, right: &T| key(left).cmp(&key(right)))
    }

    /// Ascending by [`Plugin::as_ordered`] hints. Plugins without a hint sort
    /// last.
    pub fn default_order<S>() -> Self
    where
        T: Plugin<S>,
        S: ?Sized + 'static,
    {
        Self::from_fn(|left: &T, right: &T| compare_order::<T, S>(left, right))
    }

    /// The mirror image of [`default_order`](Self::default_order)
    pub fn reverse_order<S>() -> Self
    where
        T: Plugin<S>,
        S: ?Sized + 'static,
    {
        Self::default_order::<S>().reversed()
    }

    /// Same ordering, opposite sense
    pub fn reversed(&self) -> Self {
        let inner = Arc::clone(&self.compare);
        Self::from_fn(move |left: &T, right: &T| inner(left, right).reverse())
    }

    pub fn compare(&self, left: &T, right: &T) -> Ordering {
        (self.compare)(left, right)
    }
}

impl<T: ?Sized> Clone for Comparator<T> {
    fn clone(&self) -> Self {
        Self {
            compare: Arc::clone(&self.compare),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Comparator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comparator").finish_non_exhaustive()
    }
}

/// Sense of a registry's priority ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Lowest order value first
    #[default]
    Ascending,
    /// Highest order value first
    Descending,
}

/// Plugin registry that keeps its plugins sorted by a [`Comparator`].
///
/// Sorting happens once, at construction, and is stable: plugins that
/// compare equal keep their original relative order.
pub struct OrderAwarePluginRegistry<T: ?Sized, S: ?Sized> {
    inner: SimplePluginRegistry<T, S>,
    comparator: Comparator<T>,
}

impl<T, S> OrderAwarePluginRegistry<T, S>
where
    T: Plugin<S> + ?Sized + 'static,
    S: ?Sized + 'static,
{
    /// Empty registry using the default comparator
    pub fn empty() -> Self {
        Self::of_with(Vec::new(), Comparator::default_order::<S>())
    }

    /// Empty registry using the given comparator
    pub fn with_comparator(comparator: Comparator<T>) -> Self {
        Self::of_with(Vec::new(), comparator)
    }

    /// Registry over the given plugins using the default comparator
    pub fn of<I>(plugins: I) -> Self
    where
        I: IntoIterator<Item = Arc<T>>,
    {
        Self::of_with(plugins, Comparator::default_order::<S>())
    }

    /// Registry over possibly absent entries using the default comparator.
    /// Absent entries are dropped.
    pub fn of_nullable<I>(plugins: I) -> Self
    where
        I: IntoIterator<Item = Option<Arc<T>>>,
    {
        Self::of(plugins.into_iter().flatten())
    }

    /// Registry over the given plugins with the default order reversed
    pub fn of_reverse<I>(plugins: I) -> Self
    where
        I: IntoIterator<Item = Arc<T>>,
    {
        Self::of_with(plugins, Comparator::reverse_order::<S>())
    }

    /// Registry over the given plugins in the given sense of the default order
    pub fn of_sorted<I>(plugins: I, order: SortOrder) -> Self
    where
        I: IntoIterator<Item = Arc<T>>,
    {
        match order {
            SortOrder::Ascending => Self::of(plugins),
            SortOrder::Descending => Self::of_reverse(plugins),
        }
    }

    /// Registry over the given plugins sorted by `comparator`
    pub fn of_with<I>(plugins: I, comparator: Comparator<T>) -> Self
    where
        I: IntoIterator<Item = Arc<T>>,
    {
        let mut sorted: Vec<Arc<T>> = plugins.into_iter().collect();
        sorted.sort_by(|left, right| comparator.compare(left, right));
        Self {
            inner: SimplePluginRegistry::from_vec(sorted),
            comparator,
        }
    }

    /// Returns a new registry over the same plugins with the comparator
    /// inverted. `self` is left untouched.
    ///
    /// The plugins are re-sorted stably, so plugins that compare equal keep
    /// their relative order rather than being mirrored.
    pub fn reverse(&self) -> Self {
        Self::of_with(self.inner.plugins().iter().cloned(), self.comparator.reversed())
    }

    pub fn comparator(&self) -> &Comparator<T> {
        &self.comparator
    }
}

impl<T, S> PluginRegistry<T, S> for OrderAwarePluginRegistry<T, S>
where
    T: Plugin<S> + ?Sized,
    S: ?Sized,
{
    fn plugins(&self) -> &[Arc<T>] {
        self.inner.plugins()
    }
}

impl<T: ?Sized, S: ?Sized> Clone for OrderAwarePluginRegistry<T, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            comparator: self.comparator.clone(),
        }
    }
}

impl<T, S> Default for OrderAwarePluginRegistry<T, S>
where
    T: Plugin<S> + ?Sized + 'static,
    S: ?Sized + 'static,
{
    fn default() -> Self {
        Self::empty()
    }
}

impl<T, S> fmt::Debug for OrderAwarePluginRegistry<T, S>
where
    T: Plugin<S> + ?Sized,
    S: ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderAwarePluginRegistry")
            .field("plugins", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<'a, T, S> IntoIterator for &'a OrderAwarePluginRegistry<T, S>
where
    T: Plugin<S> + ?Sized,
    S: ?Sized,
{
    type Item = &'a Arc<T>;
    type IntoIter = slice::Iter<'a, Arc<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.plugins().iter()
    }
}
