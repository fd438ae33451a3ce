use std::any::type_name;
use std::cmp::Ordering;

/// Highest possible precedence; sorts before everything else.
pub const HIGHEST_PRECEDENCE: i32 = i32::MIN;

/// Lowest possible precedence. Plugins without an order hint get this value.
pub const LOWEST_PRECEDENCE: i32 = i32::MAX;

/// Optional priority hint a plugin can expose to ordering registries.
///
/// Lower values sort first.
pub trait Ordered {
    /// The numeric order of this component
    fn order(&self) -> i32;
}

/// Core trait that all plugins must implement.
///
/// `S` is the delimiter type: an opaque value the host hands to every plugin
/// to ask whether it applies. What "applies" means is entirely up to the
/// implementation.
pub trait Plugin<S: ?Sized>: Send + Sync {
    /// Whether this plugin should be invoked for the given delimiter
    fn supports(&self, delimiter: &S) -> bool;

    /// Exposes the priority hint capability, if the plugin has one.
    ///
    /// Implementations that also implement [`Ordered`] override this to
    /// return `Some(self)`.
    fn as_ordered(&self) -> Option<&dyn Ordered> {
        None
    }

    /// Name used in diagnostics such as lookup failure messages
    fn plugin_name(&self) -> &str {
        type_name::<Self>()
    }
}

/// Resolves the effective order of a plugin, falling back to
/// [`LOWEST_PRECEDENCE`] when the plugin has no hint.
pub fn order_of<T, S>(plugin: &T) -> i32
where
    T: Plugin<S> + ?Sized,
    S: ?Sized,
{
    plugin
        .as_ordered()
        .map(|ordered| ordered.order())
        .unwrap_or(LOWEST_PRECEDENCE)
}

/// Compares two plugins by their effective order (ascending).
pub fn compare_order<T, S>(left: &T, right: &T) -> Ordering
where
    T: Plugin<S> + ?Sized,
    S: ?Sized,
{
    order_of::<T, S>(left).cmp(&order_of::<T, S>(right))
}

/// Returns the short type name (last path segment, generics stripped) of a
/// fully qualified Rust type name.
pub fn short_type_name(full: &str) -> &str {
    let without_generics = full.split('<').next().unwrap_or(full);
    without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics)
}
