//! Per-step traversal events
//!
//! A routing walk reports its progress as a stream of [`TraversalEvent`]s.
//! Visualizers highlight the node carried by [`TraversalEvent::Visit`];
//! loggers and statistics collectors usually care about the rest.

use serde::{Deserialize, Serialize};

use crate::identity::{LinkId, NodeId};

/// Events emitted while a message walks the topology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraversalEvent {
    /// The walk is now at `node`; `hop` links have been traversed so far
    Visit { node: NodeId, hop: u32 },
    /// Moved to a previously unvisited neighbor
    Forward {
        from: NodeId,
        to: NodeId,
        link: LinkId,
        /// Delay paid for this traversal (the value before the ping)
        delay: u64,
    },
    /// Dead end: stepped back toward an earlier node
    Backtrack {
        from: NodeId,
        to: NodeId,
        link: LinkId,
        delay: u64,
    },
    /// Message handed to the delivery handler at `node`
    Delivered { node: NodeId, hops: u32 },
    /// Hop budget ran out at `node`
    BudgetExhausted { node: NodeId, hops: u32 },
    /// No forward neighbor and no way back from `node`
    DeadEnd { node: NodeId, hops: u32 },
}

impl TraversalEvent {
    /// The node the walk is at after this event
    pub fn node(&self) -> NodeId {
        match self {
            Self::Visit { node, .. }
            | Self::Delivered { node, .. }
            | Self::BudgetExhausted { node, .. }
            | Self::DeadEnd { node, .. } => *node,
            Self::Forward { to, .. } | Self::Backtrack { to, .. } => *to,
        }
    }

    /// Link traversed by this event, if any
    pub fn link(&self) -> Option<(LinkId, u64)> {
        match self {
            Self::Forward { link, delay, .. } | Self::Backtrack { link, delay, .. } => {
                Some((*link, *delay))
            }
            _ => None,
        }
    }

    /// Whether this event ends the walk
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Delivered { .. } | Self::BudgetExhausted { .. } | Self::DeadEnd { .. }
        )
    }
}
