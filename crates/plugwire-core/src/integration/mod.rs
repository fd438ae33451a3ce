//! # Plugwire Core Integration
//!
//! Message routing on top of plugin registries: a handler derives a
//! delimiter from each incoming [`Message`], selects the supporting
//! plugin(s) from a registry and invokes a named service method on them.
//!
//! ## Key Submodules:
//!
//! - **[`message`]**: The [`Message`] envelope (payload plus headers).
//! - **[`methods`]**: [`ServiceMethods`], the table of operations handlers may
//!   invoke on a plugin type.
//! - **[`handler`]**: The async [`MessageHandler`] trait and
//!   [`PluginRegistryAwareMessageHandler`].
//! - **[`dispatcher`]**: [`MessageDispatcher`] and the thread-safe
//!   [`SharedMessageDispatcher`], routing messages by channel name.
//! - **[`error`]**: [`IntegrationError`].
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod message;
pub mod methods;

pub use dispatcher::{
    HandlerId, MessageDispatcher, SharedMessageDispatcher, create_dispatcher, sync_message_handler,
};
pub use error::IntegrationError;
pub use handler::{LookupMethod, MessageHandler, PluginRegistryAwareMessageHandler, RegistrySource};
pub use message::Message;
pub use methods::{ServiceMethod, ServiceMethods};

// Test module declaration
#[cfg(test)]
mod tests;
