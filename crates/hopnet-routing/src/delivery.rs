//! Stock delivery handler

use hopnet_core::{DeliveryHandler, Message, MessageError};
use tracing::{info, warn};

/// Parses delivered payloads and keeps the results
///
/// Each accepted message is logged as `(sender, command, data)`;
/// malformed payloads are kept separately.
#[derive(Debug, Clone, Default)]
pub struct Inbox {
    messages: Vec<Message>,
    rejected: Vec<MessageError>,
}

impl Inbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages parsed so far, oldest first
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn rejected(&self) -> &[MessageError] {
        &self.rejected
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drain accepted messages
    pub fn take(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.rejected.clear();
    }
}

impl DeliveryHandler for Inbox {
    fn deliver(&mut self, payload: &str) -> Result<Message, MessageError> {
        match payload.parse::<Message>() {
            Ok(message) => {
                info!(
                    sender = %message.sender,
                    command = %message.command,
                    data = %message.data,
                    "Received message {} from {}",
                    payload,
                    message.sender
                );
                self.messages.push(message.clone());
                Ok(message)
            }
            Err(e) => {
                warn!(error = %e, "Rejected malformed message");
                self.rejected.push(e.clone());
                Err(e)
            }
        }
    }
}
