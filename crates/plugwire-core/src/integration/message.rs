use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

static NEXT_MESSAGE_ID: AtomicU64 = AtomicU64::new(1);

/// A payload with headers, routed to handlers by channel name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub payload: Value,
    #[serde(default)]
    pub headers: BTreeMap<String, Value>,
}

impl Message {
    /// Create a message with a fresh, process-unique id
    pub fn new(payload: impl Into<Value>) -> Self {
        Self {
            id: NEXT_MESSAGE_ID.fetch_add(1, Ordering::Relaxed),
            payload: payload.into(),
            headers: BTreeMap::new(),
        }
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn header(&self, key: &str) -> Option<&Value> {
        self.headers.get(key)
    }

    /// The whole message as a JSON document (`id`, `payload`, `headers`),
    /// the target of delimiter pointers.
    pub fn to_value(&self) -> Value {
        json!({
            "id": self.id,
            "payload": self.payload,
            "headers": self.headers,
        })
    }

    /// Resolve a JSON pointer against [`to_value`](Self::to_value)
    pub fn pointer(&self, pointer: &str) -> Option<Value> {
        self.to_value().pointer(pointer).cloned()
    }
}
