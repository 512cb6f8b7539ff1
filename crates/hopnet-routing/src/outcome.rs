//! Results of a routing walk

use std::fmt;

use hopnet_core::{MessageError, NodeId};
use serde::{Deserialize, Serialize};

/// How a walk ended
///
/// None of these are errors: the caller decides whether to retry with a
/// larger budget or a different source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The payload reached the destination and was handed to the handler
    Delivered,
    /// The hop budget ran out first
    MaxDepthExceeded,
    /// No unvisited neighbor and no way back
    DeadEnd,
}

impl Outcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Delivered => "delivered",
            Self::MaxDepthExceeded => "max depth exceeded",
            Self::DeadEnd => "dead end",
        };
        f.write_str(s)
    }
}

/// Why a walk hit [`Outcome::DeadEnd`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeadEndCause {
    /// Stuck at the start of the visited sequence
    NoPreviousNode,
    /// The backtrack target is not adjacent to the current node
    NoReturnLink { previous: NodeId },
}

/// Everything a caller may want to know about one walk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteReport {
    pub outcome: Outcome,
    /// Distinct nodes in first-visit order
    pub visited: Vec<NodeId>,
    /// Every node the walk stood on, revisits included
    pub path: Vec<NodeId>,
    /// Links traversed, forward and backward
    pub hops: u32,
    pub backtracks: u32,
    /// Sum of the delays paid on each traversal, in milliseconds
    pub latency: u64,
    pub dead_end: Option<DeadEndCause>,
    /// Set when the payload arrived but the handler could not parse it
    pub delivery_error: Option<MessageError>,
}

impl RouteReport {
    pub fn is_delivered(&self) -> bool {
        self.outcome.is_delivered()
    }

    /// Node the walk ended on
    pub fn final_node(&self) -> Option<NodeId> {
        self.path.last().copied()
    }
}

impl fmt::Display for RouteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path: Vec<String> = self.path.iter().map(|n| n.to_string()).collect();
        write!(
            f,
            "{} after {} hop(s) ({} backtrack(s), {}ms): {}",
            self.outcome,
            self.hops,
            self.backtracks,
            self.latency,
            path.join(" -> ")
        )
    }
}
