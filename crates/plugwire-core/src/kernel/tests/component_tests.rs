use std::sync::Arc;

use crate::kernel::component::{ComponentRegistry, Exclusions};
use crate::kernel::error::{ComponentError, Error};

trait Speaker: Send + Sync {
    fn speak(&self) -> String;
}

#[derive(Debug)]
struct Dog;

#[derive(Debug)]
struct Cat {
    name: String,
}

impl Speaker for Dog {
    fn speak(&self) -> String {
        "woof".to_string()
    }
}

impl Speaker for Cat {
    fn speak(&self) -> String {
        format!("{} says meow", self.name)
    }
}

fn populated() -> ComponentRegistry {
    let mut registry = ComponentRegistry::new();
    registry
        .register("dog", Arc::new(Dog))
        .unwrap()
        .provides(|it| -> Arc<dyn Speaker> { it });
    registry
        .register("cat", Arc::new(Cat { name: "Tom".to_string() }))
        .unwrap()
        .provides(|it| -> Arc<dyn Speaker> { it });
    registry.register("config", Arc::new(42_u32)).unwrap();
    registry
}

#[test]
fn test_register_and_get() {
    let registry = populated();

    assert_eq!(registry.count(), 3);
    assert!(registry.contains("dog"));
    assert_eq!(*registry.get::<u32>("config").unwrap(), 42);
    assert_eq!(registry.get::<Cat>("cat").unwrap().name, "Tom");
    assert_eq!(registry.names(), vec!["dog", "cat", "config"]);
}

#[test]
fn test_get_with_wrong_type() {
    let registry = populated();

    match registry.get::<Dog>("cat") {
        Err(Error::Component(ComponentError::TypeMismatch { name, .. })) => assert_eq!(name, "cat"),
        other => panic!("Expected a type mismatch, got {:?}", other),
    }
    assert!(matches!(
        registry.get::<Dog>("missing"),
        Err(Error::Component(ComponentError::NotFound { .. }))
    ));
}

#[test]
fn test_duplicate_and_blank_names_are_rejected() {
    let mut registry = populated();

    assert!(matches!(
        registry.register("dog", Arc::new(Dog)),
        Err(Error::Component(ComponentError::DuplicateName { .. }))
    ));
    assert!(matches!(
        registry.register("  ", Arc::new(Dog)),
        Err(Error::Component(ComponentError::BlankName))
    ));
    assert_eq!(registry.count(), 3);
}

#[test]
fn test_instances_of_capability() {
    let registry = populated();

    let speakers = registry.instances_of::<dyn Speaker>(&Exclusions::none());
    let said: Vec<String> = speakers.iter().map(|speaker| speaker.speak()).collect();
    assert_eq!(said, vec!["woof", "Tom says meow"]);

    assert_eq!(registry.names_providing::<dyn Speaker>(), vec!["dog", "cat"]);
    assert!(registry.instances_of::<dyn std::fmt::Debug + Send + Sync>(&Exclusions::none()).is_empty());
}

#[test]
fn test_get_provided_view() {
    let registry = populated();

    assert_eq!(registry.get_provided::<dyn Speaker>("dog").unwrap().speak(), "woof");
    assert!(matches!(
        registry.get_provided::<dyn Speaker>("config"),
        Err(Error::Component(ComponentError::TypeMismatch { .. }))
    ));
}

#[test]
fn test_exclusions_by_type_and_name() {
    let registry = populated();

    let without_dog = registry.instances_of::<dyn Speaker>(&Exclusions::none().with_type::<Dog>());
    assert_eq!(without_dog.len(), 1);
    assert_eq!(without_dog[0].speak(), "Tom says meow");

    let without_cat = registry.instances_of::<dyn Speaker>(&Exclusions::from_type_names(["Cat"]));
    assert_eq!(without_cat.len(), 1);
    assert_eq!(without_cat[0].speak(), "woof");

    let full_name = std::any::type_name::<Cat>();
    let by_full_name = Exclusions::none().with_type_name(full_name);
    assert_eq!(registry.instances_of::<dyn Speaker>(&by_full_name).len(), 1);

    let everything = Exclusions::from_type_names(["Cat", "Dog"]);
    assert!(!everything.is_empty());
    assert!(registry.instances_of::<dyn Speaker>(&everything).is_empty());
}

#[test]
fn test_type_name_of() {
    let registry = populated();

    assert!(registry.type_name_of("dog").unwrap().ends_with("Dog"));
    assert!(registry.type_name_of("missing").is_none());
}
