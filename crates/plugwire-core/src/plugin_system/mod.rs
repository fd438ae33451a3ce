//! # Plugwire Core Plugin System
//!
//! This module provides the selection core of Plugwire: a single-method
//! plugin capability and the registries that pick the plugins applicable to
//! a given delimiter.
//!
//! ## Key Submodules and Responsibilities:
//!
//! - **[`traits`]**: The [`Plugin`] capability (`supports(delimiter)`) and the
//!   optional [`Ordered`] priority hint.
//! - **[`registry`]**: The [`PluginRegistry`] lookup operations and
//!   [`SimplePluginRegistry`], which keeps plugins in construction order.
//! - **[`ordering`]**: [`OrderAwarePluginRegistry`] and [`Comparator`], which
//!   sort plugins by priority (stable, lowest order first).
//! - **[`metadata`]**: [`PluginMetadata`] and [`MetadataProvider`] for plugins
//!   selected by name and version.
//! - **[`error`]**: [`RegistryError`](error::RegistryError) and
//!   [`MetadataError`](error::MetadataError).
//!
//! Registries are immutable once built, so they can be shared across threads
//! and read concurrently without locking.
pub mod error;
pub mod metadata;
pub mod ordering;
pub mod registry;
pub mod traits;

pub use error::{MetadataError, RegistryError};
pub use metadata::{MetadataProvider, PluginMetadata};
pub use ordering::{Comparator, OrderAwarePluginRegistry, SortOrder};
pub use registry::{PluginRegistry, SimplePluginRegistry};
pub use traits::{HIGHEST_PRECEDENCE, LOWEST_PRECEDENCE, Ordered, Plugin, order_of};

// Test module declaration
#[cfg(test)]
mod tests;
