//! # Plugwire Core Integration Errors
//!
//! Errors raised while building message handlers and routing messages.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrationError {
    /// The configured service method is not declared for the plugin type
    #[error("No method '{method}' found for plugin type {plugin_type}!")]
    NoApplicableMethod { method: String, plugin_type: String },

    #[error("Cannot derive delimiter from '{pointer}': {reason}")]
    InvalidDelimiter { pointer: String, reason: String },

    #[error("No handlers registered for channel '{channel}'")]
    NoHandlers { channel: String },

    #[error("Message handler failed: {reason}")]
    HandlerFailed { reason: String },
}
