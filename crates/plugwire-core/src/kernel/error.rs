//! # Plugwire Core Kernel Errors
//!
//! Defines the crate-wide [`Error`] and [`Result`] alias.
//!
//! Each subsystem defines its own typed error ([`RegistryError`],
//! [`ComponentError`], [`IntegrationError`], [`ConfigError`],
//! [`MetadataError`]) and [`Error`] aggregates them through `#[from]`
//! conversions, so `?` works across subsystem boundaries.
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::config::error::ConfigError;
use crate::integration::error::IntegrationError;
use crate::plugin_system::error::{MetadataError, RegistryError};

/// Crate-wide error type
#[derive(Debug, ThisError)]
pub enum Error {
    /// A required plugin lookup found nothing
    #[error("Plugin registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Plugin metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// Error related to the component container
    #[error("Component registry error: {0}")]
    Component(#[from] ComponentError),

    #[error("Integration error: {0}")]
    Integration(#[from] IntegrationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Programmer misuse detected at setup time (blank names, unknown types,
    /// refreshing twice). Not meant to be recovered from.
    #[error("Precondition violated: {0}")]
    Precondition(String),

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Errors raised by the component container
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ComponentError {
    #[error("Component name must not be blank")]
    BlankName,

    #[error("A component named '{name}' is already registered")]
    DuplicateName { name: String },

    #[error("No component named '{name}'")]
    NotFound { name: String },

    #[error("Component '{name}' is a {actual}, not a {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Attempted to operate on a poisoned container lock: {component}")]
    Poisoned { component: String },
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl Error {
    pub fn precondition(message: impl Into<String>) -> Self {
        Error::Precondition(message.into())
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}
