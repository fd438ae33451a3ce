use std::sync::Arc;

use crate::kernel::component::Exclusions;
use crate::kernel::context::ApplicationContext;
use crate::support::bean_list::BeanListFactory;
use crate::support::registry_factory::{FactoryDescriptor, FactoryKind};
use crate::support::tests::{Handler, ids, register_catch_all, register_prefixed};

#[test]
fn test_list_is_sorted_by_priority() {
    let context = ApplicationContext::new();
    register_catch_all(&context);
    register_prefixed(&context, "second", "x", 2);
    register_prefixed(&context, "first", "x", 1);

    let factory = BeanListFactory::<dyn Handler, str>::from_context(&context, Exclusions::none());
    assert_eq!(ids(&factory.beans().unwrap()), vec!["first", "second", "catch-all"]);
    assert_eq!(factory.kind(), FactoryKind::List);
    assert_eq!(factory.plugin_names().unwrap(), vec!["first", "second", "CatchAll"]);
}

#[test]
fn test_list_freezes_on_refresh() {
    let context = ApplicationContext::new();
    register_prefixed(&context, "only", "o", 1);
    let factory = Arc::new(BeanListFactory::<dyn Handler, str>::from_context(&context, Exclusions::none()));
    context.add_listener(factory.clone()).unwrap();

    context.refresh().unwrap();
    register_prefixed(&context, "late", "l", 0);

    assert!(factory.is_frozen());
    assert_eq!(ids(&factory.beans().unwrap()), vec!["only"]);
}

#[test]
fn test_supplier_list() {
    let factory = BeanListFactory::<dyn Handler, str>::from_supplier(Vec::new).with_plugin_type("Nothing");

    assert!(factory.beans().unwrap().is_empty());
    assert_eq!(factory.plugin_type(), "Nothing");
}
