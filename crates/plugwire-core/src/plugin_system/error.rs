//! # Plugwire Core Plugin System Errors
//!
//! Defines error types specific to plugin lookup and plugin metadata.
//!
//! [`RegistryError`] is raised by the "required" lookup variants of a
//! [`PluginRegistry`](crate::plugin_system::PluginRegistry) when no plugin
//! supports the delimiter. Empty results from the non-required variants are
//! never errors. [`MetadataError`] covers invalid plugin metadata.
use std::fmt::Debug;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("{message}")]
    NotFound { message: String },
}

impl RegistryError {
    /// Builds the default lookup failure, naming the delimiter and every
    /// registered plugin.
    pub fn not_found<S, I, N>(delimiter: &S, plugins: I) -> Self
    where
        S: Debug + ?Sized,
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let names: Vec<String> = plugins
            .into_iter()
            .map(|name| name.as_ref().to_string())
            .collect();
        RegistryError::NotFound {
            message: format!(
                "No plugin found for delimiter {:?}! Registered plugins: [{}].",
                delimiter,
                names.join(", ")
            ),
        }
    }

    /// Builds a lookup failure carrying a caller supplied message.
    pub fn with_message(message: impl Into<String>) -> Self {
        RegistryError::NotFound {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            RegistryError::NotFound { message } => message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetadataError {
    #[error("Plugin metadata name must not be blank")]
    BlankName,

    #[error("Invalid version '{version}' for plugin '{name}': {reason}")]
    InvalidVersion {
        name: String,
        version: String,
        reason: String,
    },
}
