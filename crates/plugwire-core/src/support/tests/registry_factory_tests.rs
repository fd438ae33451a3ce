use std::sync::Arc;

use crate::kernel::component::Exclusions;
use crate::kernel::context::ApplicationContext;
use crate::plugin_system::ordering::SortOrder;
use crate::plugin_system::registry::PluginRegistry;
use crate::support::registry_factory::{FactoryDescriptor, FactoryKind, PluginRegistryFactory};
use crate::support::tests::{Handler, Prefixed, ids, register_catch_all, register_prefixed};

fn context_with_handlers() -> Arc<ApplicationContext> {
    let context = ApplicationContext::new();
    register_catch_all(&context);
    register_prefixed(&context, "slow", "s", 10);
    register_prefixed(&context, "fast", "s", 1);
    context
}

#[test]
fn test_registry_sorted_by_priority() {
    let context = context_with_handlers();
    let factory = PluginRegistryFactory::<dyn Handler, str>::from_context(&context, Exclusions::none());
    let registry = factory.registry().unwrap();

    assert_eq!(ids(registry.plugins()), vec!["fast", "slow", "catch-all"]);
    assert_eq!(registry.plugin_for("sync").unwrap().id(), "fast");
    assert_eq!(registry.plugin_for("other").unwrap().id(), "catch-all");
    assert_eq!(ids(&registry.plugins_for("sync")), vec!["fast", "slow", "catch-all"]);
}

#[test]
fn test_descending_order() {
    let context = context_with_handlers();
    let factory = PluginRegistryFactory::<dyn Handler, str>::from_context(&context, Exclusions::none())
        .with_order(SortOrder::Descending);

    assert_eq!(factory.order(), SortOrder::Descending);
    assert_eq!(ids(factory.registry().unwrap().plugins()), vec!["catch-all", "slow", "fast"]);
}

#[test]
fn test_exclusions_by_name() {
    let context = context_with_handlers();
    let factory =
        PluginRegistryFactory::<dyn Handler, str>::from_context(&context, Exclusions::from_type_names(["CatchAll"]));

    assert_eq!(ids(factory.registry().unwrap().plugins()), vec!["fast", "slow"]);
}

#[test]
fn test_refresh_freezes_factory() {
    let context = context_with_handlers();
    let factory = Arc::new(PluginRegistryFactory::<dyn Handler, str>::from_context(
        &context,
        Exclusions::none(),
    ));
    context.add_listener(factory.clone()).unwrap();

    assert!(!factory.is_frozen());
    context.refresh().unwrap();
    assert!(factory.is_frozen());

    assert_eq!(factory.registry().unwrap().count_plugins(), 3);
    register_prefixed(&context, "late", "l", 0);
    assert_eq!(factory.registry().unwrap().count_plugins(), 3);
}

#[test]
fn test_snapshot_taken_at_refresh() {
    let context = context_with_handlers();
    let factory = Arc::new(PluginRegistryFactory::<dyn Handler, str>::from_context(
        &context,
        Exclusions::none(),
    ));
    context.add_listener(factory.clone()).unwrap();

    context.refresh().unwrap();
    // No registry was built before this registration
    register_prefixed(&context, "late", "l", 0);

    assert_eq!(ids(factory.registry().unwrap().plugins()), vec!["fast", "slow", "catch-all"]);
}

#[test]
fn test_supplier_factory() {
    let factory = PluginRegistryFactory::<dyn Handler, str>::from_supplier(|| {
        vec![
            Arc::new(Prefixed { id: "b", prefix: "b", order: 2 }) as Arc<dyn Handler>,
            Arc::new(Prefixed { id: "a", prefix: "a", order: 1 }) as Arc<dyn Handler>,
        ]
    });

    assert_eq!(ids(factory.registry().unwrap().plugins()), vec!["a", "b"]);
}

#[test]
fn test_descriptor() {
    let context = context_with_handlers();
    let factory = PluginRegistryFactory::<dyn Handler, str>::from_context(&context, Exclusions::none());

    assert_eq!(factory.kind(), FactoryKind::Registry);
    assert_eq!(factory.plugin_type(), "Handler");
    assert_eq!(
        factory.plugin_names().unwrap(),
        vec!["fast".to_string(), "slow".to_string(), "CatchAll".to_string()]
    );

    let renamed = factory.with_plugin_type("Handlers");
    assert_eq!(renamed.plugin_type(), "Handlers");
    assert_eq!(FactoryKind::List.to_string(), "list");
}
