//! Typed message payloads and their wire format
//!
//! On the wire a message is the text `"<sender>:<command>=<data>"`, for
//! example `"3:PING="`. [`Message`]'s `FromStr` impl is the only place that
//! text is taken apart; everything past the boundary works with the typed
//! record, and `Display` puts it back together with the same template.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MessageError;
use crate::identity::NodeId;

/// Command sent by the editor's ping action
pub const PING_COMMAND: &str = "PING";

/// A parsed `"<sender>:<command>=<data>"` message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    /// Node that originated the message
    pub sender: NodeId,
    /// Command name; never contains `'='`
    pub command: String,
    /// Free-form data, may be empty and may contain any separator
    pub data: String,
}

impl Message {
    /// Build a message, rejecting commands that would not survive the wire
    /// format.
    pub fn new(
        sender: NodeId,
        command: impl Into<String>,
        data: impl Into<String>,
    ) -> Result<Self, MessageError> {
        let message = Self {
            sender,
            command: command.into(),
            data: data.into(),
        };
        message.validate()?;
        Ok(message)
    }

    /// `"<sender>:PING="`
    pub fn ping(sender: NodeId) -> Self {
        Self {
            sender,
            command: PING_COMMAND.to_string(),
            data: String::new(),
        }
    }

    /// Check that the wire form parses back to this message
    pub fn validate(&self) -> Result<(), MessageError> {
        if self.command.contains('=') {
            return Err(MessageError::InvalidCommand(self.command.clone()));
        }
        Ok(())
    }

    pub fn is_ping(&self) -> bool {
        self.command == PING_COMMAND
    }

    /// Render the wire form
    pub fn to_wire(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}={}", self.sender, self.command, self.data)
    }
}

impl FromStr for Message {
    type Err = MessageError;

    /// Split once on `':'` for the sender, then once on `'='` for the
    /// command; whatever is left is the data.
    ///
    /// The sender must be a canonical decimal integer (no sign, no leading
    /// zeros, no whitespace) so that parsing and re-rendering reproduce the
    /// input exactly.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (sender, rest) = input
            .split_once(':')
            .ok_or_else(|| MessageError::MissingSenderSeparator(input.to_string()))?;
        let (command, data) = rest
            .split_once('=')
            .ok_or_else(|| MessageError::MissingCommandSeparator(input.to_string()))?;

        let sender = NodeId::parse_canonical(sender).ok_or_else(|| MessageError::InvalidSender {
            input: input.to_string(),
            sender: sender.to_string(),
        })?;

        Ok(Self {
            sender,
            command: command.to_string(),
            data: data.to_string(),
        })
    }
}
