//! # Plugwire Core Kernel
//!
//! The `kernel` module stands in for the host's dependency-injection
//! container. It stores live component instances, lets them be enumerated by
//! the capabilities they provide, and emits the lifecycle signal registry
//! factories rely on.
//!
//! ## Key Responsibilities & Components:
//!
//! - **Component Container**: [`ComponentRegistry`](component::ComponentRegistry)
//!   holds named instances and their capability views; [`Exclusions`](component::Exclusions)
//!   filters enumeration by concrete type.
//! - **Lifecycle**: [`ApplicationContext`](context::ApplicationContext) owns the
//!   container and notifies [`ContextListener`](context::ContextListener)s on refresh.
//! - **Error Handling**: Defines the crate-wide [`Error`](error::Error) and
//!   a `Result` type alias in the `error` submodule.
pub mod component;
pub mod context;
pub mod error;

pub use component::{ComponentBinding, ComponentRegistry, Exclusions};
pub use context::{ApplicationContext, ContextListener};
pub use error::{ComponentError, Error, Result};
// Test module declaration
#[cfg(test)]
mod tests;
