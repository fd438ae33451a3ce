use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::integration::error::IntegrationError;
use crate::integration::handler::MessageHandler;
use crate::integration::message::Message;
use crate::kernel::error::{Error, Result};

/// Type for handler identifiers
pub type HandlerId = u64;

//--------------------------------------------------
// MessageDispatcher (Internal, wrapped by SharedMessageDispatcher)
//--------------------------------------------------

/// Channel based message dispatcher (Internal Implementation)
pub struct MessageDispatcher {
    handlers: HashMap<String, Vec<(HandlerId, Arc<dyn MessageHandler>)>>,
    next_handler_id: HandlerId,
    message_queue: VecDeque<(String, Message)>,
}

impl fmt::Debug for MessageDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handler_count: usize = self.handlers.values().map(|v| v.len()).sum();
        f.debug_struct("MessageDispatcher")
            .field("channels", &self.channels())
            .field("handlers_count", &handler_count)
            .field("next_handler_id", &self.next_handler_id)
            .field("message_queue_size", &self.message_queue.len())
            .finish()
    }
}

/// Handler wrapping a synchronous closure (Internal Helper)
struct FnHandler<F> {
    handler: F,
}

#[async_trait]
impl<F> MessageHandler for FnHandler<F>
where
    F: Fn(&Message) -> std::result::Result<Option<Value>, String> + Send + Sync,
{
    async fn handle(&self, message: &Message) -> Result<Option<Value>> {
        (self.handler)(message).map_err(|reason| IntegrationError::HandlerFailed { reason }.into())
    }
}

impl MessageDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            next_handler_id: 1,
            message_queue: VecDeque::new(),
        }
    }

    pub fn register_handler(&mut self, channel: impl Into<String>, handler: Box<dyn MessageHandler>) -> HandlerId {
        let id = self.next_handler_id;
        self.next_handler_id += 1;
        self.handlers
            .entry(channel.into())
            .or_default()
            .push((id, Arc::from(handler)));
        id
    }

    pub fn unregister_handler(&mut self, id: HandlerId) -> bool {
        let mut found = false;
        self.handlers.values_mut().for_each(|handlers| {
            let len_before = handlers.len();
            handlers.retain(|(h_id, _)| *h_id != id);
            if handlers.len() < len_before {
                found = true;
            }
        });
        self.handlers.retain(|_, handlers| !handlers.is_empty());
        found
    }

    /// Channels with at least one handler, sorted
    pub fn channels(&self) -> Vec<String> {
        let mut channels: Vec<String> = self.handlers.keys().cloned().collect();
        channels.sort();
        channels
    }

    pub fn handler_count(&self, channel: &str) -> usize {
        self.handlers.get(channel).map(|h| h.len()).unwrap_or(0)
    }

    /// The handlers of a channel in registration order
    pub fn handlers_for(&self, channel: &str) -> Result<Vec<Arc<dyn MessageHandler>>> {
        self.handlers
            .get(channel)
            .filter(|handlers| !handlers.is_empty())
            .map(|handlers| handlers.iter().map(|(_, handler)| Arc::clone(handler)).collect())
            .ok_or_else(|| {
                IntegrationError::NoHandlers {
                    channel: channel.to_string(),
                }
                .into()
            })
    }

    /// Hand the message to every handler of the channel in registration
    /// order and collect their replies.
    pub async fn dispatch_internal(&self, channel: &str, message: &Message) -> Result<Vec<Value>> {
        let handlers = self.handlers_for(channel)?;
        run_handlers(channel, &handlers, message).await
    }

    pub fn queue_message(&mut self, channel: impl Into<String>, message: Message) {
        self.message_queue.push_back((channel.into(), message));
    }

    /// Dispatch every queued message. Failures are logged and do not stop
    /// the remaining messages.
    pub async fn process_queue_internal(&mut self) -> usize {
        let mut count = 0;
        while let Some((channel, message)) = self.message_queue.pop_front() {
            let dispatcher_ref = &*self;
            if let Err(e) = dispatcher_ref.dispatch_internal(&channel, &message).await {
                log_queue_failure(&channel, &message, &e);
            }
            count += 1;
        }
        count
    }

    fn next_queued(&mut self) -> Option<(String, Message)> {
        self.message_queue.pop_front()
    }

    pub fn queue_size(&self) -> usize {
        self.message_queue.len()
    }
}

impl Default for MessageDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

//--------------------------------------------------
// SharedMessageDispatcher (Public API)
//--------------------------------------------------

/// Thread-safe shared message dispatcher using Tokio Mutex.
///
/// The lock is only held to look handlers up, never while they run, so a
/// handler may dispatch through the same dispatcher and messages on
/// different channels are handled concurrently.
#[derive(Clone)]
pub struct SharedMessageDispatcher {
    dispatcher: Arc<Mutex<MessageDispatcher>>,
}

impl fmt::Debug for SharedMessageDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedMessageDispatcher").finish_non_exhaustive()
    }
}

impl SharedMessageDispatcher {
    pub fn new() -> Self {
        Self {
            dispatcher: Arc::new(Mutex::new(MessageDispatcher::new())),
        }
    }

    pub async fn dispatch(&self, channel: &str, message: &Message) -> Result<Vec<Value>> {
        let handlers = self.dispatcher.lock().await.handlers_for(channel)?;
        run_handlers(channel, &handlers, message).await
    }

    pub async fn queue_message(&self, channel: impl Into<String>, message: Message) -> Result<()> {
        let mut dispatcher = self.dispatcher.lock().await;
        dispatcher.queue_message(channel, message);
        Ok(())
    }

    /// Dispatch queued messages until the queue is empty, including
    /// messages queued by the handlers themselves. Failures are logged.
    pub async fn process_queue(&self) -> Result<usize> {
        let mut count = 0;
        loop {
            let next = self.dispatcher.lock().await.next_queued();
            let Some((channel, message)) = next else {
                break;
            };
            if let Err(e) = self.dispatch(&channel, &message).await {
                log_queue_failure(&channel, &message, &e);
            }
            count += 1;
        }
        Ok(count)
    }

    pub async fn register_handler(&self, channel: impl Into<String>, handler: Box<dyn MessageHandler>) -> Result<HandlerId> {
        let mut dispatcher = self.dispatcher.lock().await;
        Ok(dispatcher.register_handler(channel, handler))
    }

    pub async fn unregister_handler(&self, id: HandlerId) -> Result<bool> {
        let mut dispatcher = self.dispatcher.lock().await;
        Ok(dispatcher.unregister_handler(id))
    }

    pub async fn channels(&self) -> Vec<String> {
        self.dispatcher.lock().await.channels()
    }

    pub async fn queue_size(&self) -> usize {
        self.dispatcher.lock().await.queue_size()
    }
}

impl Default for SharedMessageDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

//--------------------------------------------------
// Helper Functions
//--------------------------------------------------

async fn run_handlers(channel: &str, handlers: &[Arc<dyn MessageHandler>], message: &Message) -> Result<Vec<Value>> {
    log::debug!(
        "Dispatching message {} on '{}' to {} handler(s)",
        message.id,
        channel,
        handlers.len()
    );
    let mut replies = Vec::new();
    for handler in handlers {
        if let Some(reply) = handler.handle(message).await? {
            replies.push(reply);
        }
    }
    Ok(replies)
}

fn log_queue_failure(channel: &str, message: &Message, error: &Error) {
    log::warn!("Queued message {} on '{}' failed: {}", message.id, channel, error);
}

/// Create a new message dispatcher instance
pub fn create_dispatcher() -> SharedMessageDispatcher {
    SharedMessageDispatcher::new()
}

/// Wrap a synchronous closure as a handler. An `Err` from the closure
/// surfaces as [`IntegrationError::HandlerFailed`].
pub fn sync_message_handler<F>(f: F) -> Box<dyn MessageHandler>
where
    F: Fn(&Message) -> std::result::Result<Option<Value>, String> + Send + Sync + 'static,
{
    Box::new(FnHandler { handler: f })
}
