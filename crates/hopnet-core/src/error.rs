//! Error types for hopnet

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::{LinkId, NodeId};

/// Errors related to node identifiers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("Invalid node id {0:?}: expected a non-negative integer")]
    InvalidFormat(String),

    #[error("Missing node id")]
    Missing,
}

/// Precondition failures raised by topology mutations and lookups.
///
/// A call that returns one of these has left the graph untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("Link {0} not found")]
    LinkNotFound(LinkId),

    #[error("Node {0} already exists")]
    DuplicateId(NodeId),

    #[error("Cannot link node {0} to itself")]
    SelfLink(NodeId),

    #[error("Node {node} is not an endpoint of link {link}")]
    NotAnEndpoint { link: LinkId, node: NodeId },
}

impl TopologyError {
    /// True for the "missing reference" family (node, link, or endpoint).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NodeNotFound(_) | Self::LinkNotFound(_) | Self::NotAnEndpoint { .. }
        )
    }
}

/// Reasons a wire message is malformed
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum MessageError {
    #[error("Malformed message {0:?}: missing ':' after sender id")]
    MissingSenderSeparator(String),

    #[error("Malformed message {0:?}: missing '=' after command")]
    MissingCommandSeparator(String),

    #[error("Malformed message {input:?}: sender {sender:?} is not a node id")]
    InvalidSender { input: String, sender: String },

    #[error("Invalid command {0:?}: a command cannot contain '='")]
    InvalidCommand(String),
}

impl MessageError {
    /// Every variant is a malformed-message failure; kept for call sites
    /// that only care about the kind.
    pub fn is_malformed(&self) -> bool {
        true
    }

    /// The raw text that failed to parse
    pub fn input(&self) -> &str {
        match self {
            Self::MissingSenderSeparator(input)
            | Self::MissingCommandSeparator(input)
            | Self::InvalidCommand(input) => input,
            Self::InvalidSender { input, .. } => input,
        }
    }
}
