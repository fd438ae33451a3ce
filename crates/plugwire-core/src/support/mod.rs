//! # Plugwire Core Support
//!
//! Glue between the component container and the plugin registries: lazily
//! enumerated, freezable component lists and the factories that turn them
//! into registries or sorted lists.
//!
//! ## Key Submodules:
//!
//! - **[`type_aware`]**: [`BeansOfType`] and the [`ComponentSource`] seam it
//!   enumerates through.
//! - **[`registry_factory`]**: [`PluginRegistryFactory`], producing
//!   [`OrderAwarePluginRegistry`](crate::plugin_system::OrderAwarePluginRegistry)
//!   instances, and the type-erased [`FactoryDescriptor`].
//! - **[`bean_list`]**: [`BeanListFactory`], producing priority sorted lists.
//!
//! Both factories implement [`ContextListener`](crate::kernel::ContextListener)
//! and freeze their component snapshot when the context is refreshed.
pub mod bean_list;
pub mod registry_factory;
pub mod type_aware;

pub use bean_list::BeanListFactory;
pub use registry_factory::{FactoryDescriptor, FactoryKind, PluginRegistryFactory};
pub use type_aware::{BeansOfType, ComponentSource, ContextSource};

// Test module declaration
#[cfg(test)]
mod tests;
