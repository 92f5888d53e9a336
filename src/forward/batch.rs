use serde_json::Value;
use tracing::warn;

use super::error::ForwardResult;

/// A size-bounded group of serialized messages sent in one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    messages: Vec<String>,
    bytes: usize,
}

impl Batch {
    fn new() -> Self {
        Batch {
            messages: Vec::new(),
            bytes: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Accumulated size: sum of each message's byte length plus one
    /// separator byte each.
    pub fn bytes(&self) -> usize {
        self.bytes
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Newline-joined request body.
    pub fn payload(&self) -> String {
        self.messages.join("\n")
    }

    fn push(&mut self, message: String, size: usize) {
        self.messages.push(message);
        self.bytes += size;
    }
}

/// Convert a raw payload to its wire form. Strings pass through unchanged,
/// anything else becomes its JSON text.
fn serialize_message(message: Value) -> ForwardResult<String> {
    match message {
        Value::String(s) => Ok(s),
        other => Ok(serde_json::to_string(&other)?),
    }
}

/// Pack messages into batches whose newline-joined payload stays under
/// `max_batch_bytes`, preserving input order. Messages that cannot be
/// serialized or are larger than the ceiling can never be sent and are
/// dropped with a warning; an empty result means there is nothing to send.
pub fn build_batches(messages: Vec<Value>, max_batch_bytes: usize) -> Vec<Batch> {
    let mut batches = Vec::new();
    let mut current = Batch::new();

    for raw in messages {
        let message = match serialize_message(raw) {
            Ok(message) => message,
            Err(e) => {
                warn!("{}, skipping", e);
                continue;
            }
        };

        let message_bytes = message.len();
        if message_bytes > max_batch_bytes {
            warn!(
                "Message exceeds batch size limit ({} > {} bytes), skipping",
                message_bytes, max_batch_bytes
            );
            continue;
        }

        // +1 for the joining newline
        let message_size = message_bytes + 1;

        if current.bytes + message_size > max_batch_bytes && !current.is_empty() {
            batches.push(std::mem::replace(&mut current, Batch::new()));
        }
        current.push(message, message_size);
    }

    if !current.is_empty() {
        batches.push(current);
    }

    batches
}
