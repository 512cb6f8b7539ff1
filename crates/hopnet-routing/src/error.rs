//! Routing error types
//!
//! Budget exhaustion and dead ends are *outcomes*, reported through
//! [`Outcome`](crate::Outcome). The errors here are for requests that
//! cannot start at all, or a topology that misbehaves mid-walk.

use hopnet_core::{MessageError, NodeId, TopologyError};
use thiserror::Error;

/// Errors returned by [`Router::send`](crate::Router::send)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// Source or destination is not in the topology
    #[error("Unknown node {0}")]
    UnknownNode(NodeId),

    /// The topology rejected a query during the walk
    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),

    /// A typed message that would not survive its wire form
    #[error("Invalid message: {0}")]
    InvalidMessage(#[from] MessageError),
}

/// Result type for routing operations
pub type RoutingResult<T> = Result<T, RoutingError>;
