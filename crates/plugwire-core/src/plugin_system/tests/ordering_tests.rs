use std::cmp::Ordering;
use std::sync::Arc;

use crate::plugin_system::ordering::{Comparator, OrderAwarePluginRegistry, SortOrder};
use crate::plugin_system::registry::PluginRegistry;
use crate::plugin_system::tests::TagPlugin;
use crate::plugin_system::traits::{HIGHEST_PRECEDENCE, LOWEST_PRECEDENCE};

fn names(plugins: &[Arc<TagPlugin>]) -> Vec<&'static str> {
    plugins.iter().map(|plugin| plugin.name).collect()
}

/// A (order 5), B (order 1) and C (no hint), all matching "X"
fn abc() -> Vec<Arc<TagPlugin>> {
    vec![
        Arc::new(TagPlugin::ordered("A", &["X"], 5)),
        Arc::new(TagPlugin::ordered("B", &["X"], 1)),
        Arc::new(TagPlugin::new("C", &["X"])),
    ]
}

#[test]
fn test_priority_scenario() {
    let registry = OrderAwarePluginRegistry::<TagPlugin, str>::of(abc());

    assert_eq!(names(registry.plugins()), vec!["B", "A", "C"]);
    assert_eq!(names(&registry.plugins_for("X")), vec!["B", "A", "C"]);
    assert_eq!(registry.plugin_for("X").unwrap().name, "B");

    let reversed = registry.reverse();
    assert_eq!(names(&reversed.plugins_for("X")), vec!["C", "A", "B"]);

    // The original is left untouched
    assert_eq!(names(registry.plugins()), vec!["B", "A", "C"]);
}

#[test]
fn test_reverse_twice_restores_order() {
    let registry = OrderAwarePluginRegistry::<TagPlugin, str>::of(abc());
    let twice = registry.reverse().reverse();

    assert_eq!(names(twice.plugins()), names(registry.plugins()));
}

fn with_ties() -> Vec<Arc<TagPlugin>> {
    vec![
        Arc::new(TagPlugin::ordered("first", &["X"], 3)),
        Arc::new(TagPlugin::new("unordered-1", &["X"])),
        Arc::new(TagPlugin::ordered("second", &["X"], 3)),
        Arc::new(TagPlugin::new("unordered-2", &["X"])),
        Arc::new(TagPlugin::ordered("top", &["X"], HIGHEST_PRECEDENCE)),
    ]
}

#[test]
fn test_reverse_keeps_ties_in_relative_order() {
    let registry = OrderAwarePluginRegistry::<TagPlugin, str>::of(with_ties());
    assert_eq!(
        names(registry.plugins()),
        vec!["top", "first", "second", "unordered-1", "unordered-2"]
    );

    // Reversing re-sorts stably: tied plugins are not mirrored
    let reversed = registry.reverse();
    assert_eq!(
        names(reversed.plugins()),
        vec!["unordered-1", "unordered-2", "first", "second", "top"]
    );
    let built_reversed = OrderAwarePluginRegistry::<TagPlugin, str>::of_reverse(with_ties());
    assert_eq!(names(reversed.plugins()), names(built_reversed.plugins()));
    assert_eq!(names(reversed.reverse().plugins()), names(registry.plugins()));
}

#[test]
fn test_sort_is_stable_for_equal_orders() {
    let registry = OrderAwarePluginRegistry::<TagPlugin, str>::of(with_ties());

    assert_eq!(
        names(registry.plugins()),
        vec!["top", "first", "second", "unordered-1", "unordered-2"]
    );
}

#[test]
fn test_explicit_lowest_precedence_ties_with_no_hint() {
    let plugins = vec![
        Arc::new(TagPlugin::new("no-hint", &["X"])),
        Arc::new(TagPlugin::ordered("lowest", &["X"], LOWEST_PRECEDENCE)),
    ];
    let registry = OrderAwarePluginRegistry::<TagPlugin, str>::of(plugins);

    assert_eq!(names(registry.plugins()), vec!["no-hint", "lowest"]);
}

#[test]
fn test_of_reverse_and_of_sorted() {
    let reversed = OrderAwarePluginRegistry::<TagPlugin, str>::of_reverse(abc());
    assert_eq!(names(reversed.plugins()), vec!["C", "A", "B"]);

    let ascending = OrderAwarePluginRegistry::<TagPlugin, str>::of_sorted(abc(), SortOrder::Ascending);
    let descending = OrderAwarePluginRegistry::<TagPlugin, str>::of_sorted(abc(), SortOrder::Descending);
    assert_eq!(names(ascending.plugins()), vec!["B", "A", "C"]);
    assert_eq!(names(descending.plugins()), vec!["C", "A", "B"]);
}

#[test]
fn test_custom_comparator() {
    let by_name = Comparator::<TagPlugin>::by_key(|plugin: &TagPlugin| plugin.name);
    let registry = OrderAwarePluginRegistry::<TagPlugin, str>::of_with(abc(), by_name);

    assert_eq!(names(registry.plugins()), vec!["A", "B", "C"]);
    assert_eq!(names(registry.reverse().plugins()), vec!["C", "B", "A"]);
}

#[test]
fn test_comparator_reversed() {
    let comparator = Comparator::<i32>::from_fn(|left: &i32, right: &i32| left.cmp(right));
    let reversed = comparator.reversed();

    assert_eq!(comparator.compare(&1, &2), Ordering::Less);
    assert_eq!(reversed.compare(&1, &2), Ordering::Greater);
    assert_eq!(reversed.compare(&2, &2), Ordering::Equal);
}

#[test]
fn test_empty_registries() {
    let empty = OrderAwarePluginRegistry::<TagPlugin, str>::empty();
    assert_eq!(empty.count_plugins(), 0);
    assert!(empty.reverse().plugins().is_empty());

    let custom = OrderAwarePluginRegistry::<TagPlugin, str>::with_comparator(Comparator::default_order::<str>());
    assert_eq!(custom.count_plugins(), 0);

    let default = OrderAwarePluginRegistry::<TagPlugin, str>::default();
    let fallback = Arc::new(TagPlugin::new("D", &[]));
    assert!(Arc::ptr_eq(&default.plugin_or_default_for("anything", Arc::clone(&fallback)), &fallback));
}

#[test]
fn test_of_nullable_keeps_present_plugin() {
    let plugin = Arc::new(TagPlugin::ordered("P", &["X"], 7));
    let registry = OrderAwarePluginRegistry::<TagPlugin, str>::of_nullable(vec![None, Some(Arc::clone(&plugin))]);

    assert_eq!(registry.count_plugins(), 1);
    assert!(registry.contains(&plugin));
}

#[test]
fn test_sort_order_serde() {
    let order: SortOrder = serde_json::from_str("\"descending\"").unwrap();
    assert_eq!(order, SortOrder::Descending);
    assert_eq!(SortOrder::default(), SortOrder::Ascending);
}
