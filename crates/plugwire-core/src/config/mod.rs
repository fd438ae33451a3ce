//! # Plugwire Core Configuration
//!
//! Declarative wiring of plugin registries, plugin lists and message
//! activators from a JSON, YAML or TOML file.
//!
//! ## Key Submodules:
//!
//! - **[`model`]**: [`WiringConfig`] and its definitions.
//! - **[`format`]**: [`ConfigFormat`], chosen by file extension. YAML and TOML
//!   sit behind the `yaml-config` and `toml-config` features.
//! - **[`registrar`]**: [`PluginTypeTable`], where the host declares the plugin
//!   types a file may name, and [`PluginRegistriesRegistrar`], which applies a
//!   file to an application context and a dispatcher.
//! - **[`error`]**: [`ConfigError`].
pub mod error;
pub mod format;
pub mod model;
pub mod registrar;

pub use error::ConfigError;
pub use format::ConfigFormat;
pub use model::{ActivatorDefinition, ListDefinition, RegistryDefinition, WiringConfig};
pub use registrar::{AppliedWiring, PluginRegistriesRegistrar, PluginTypeTable, registry_bean_name};

// Test module declaration
#[cfg(test)]
mod tests;
