//! Routing requests

use hopnet_core::{Message, NodeId};
use serde::{Deserialize, Serialize};

/// Hop budget used when none is given (the editor's ping default)
pub const DEFAULT_HOP_BUDGET: u32 = 10;

/// A payload addressed from one node to another, with a hop budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Wire-form payload handed to the delivery handler on arrival
    pub payload: String,
    pub source: NodeId,
    pub destination: NodeId,
    /// Maximum number of link traversals
    pub hop_budget: u32,
}

impl Envelope {
    /// Wrap a raw payload
    pub fn new(source: NodeId, destination: NodeId, payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            source,
            destination,
            hop_budget: DEFAULT_HOP_BUDGET,
        }
    }

    /// Wrap a typed message, rendering it to wire form
    pub fn message(source: NodeId, destination: NodeId, message: &Message) -> Self {
        Self::new(source, destination, message.to_wire())
    }

    /// `"<source>:PING="` from `source` to `destination`
    pub fn ping(source: NodeId, destination: NodeId) -> Self {
        Self::message(source, destination, &Message::ping(source))
    }

    pub fn with_hop_budget(mut self, hop_budget: u32) -> Self {
        self.hop_budget = hop_budget;
        self
    }
}
