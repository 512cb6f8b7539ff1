//! Undirected weighted links

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identity::{LinkId, NodeId};

/// An undirected connection between two distinct nodes.
///
/// `delay` is the simulated latency in milliseconds. It is re-sampled by
/// the owning topology's delay model every time the link is pinged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    pub a: NodeId,
    pub b: NodeId,
    pub delay: u64,
}

impl Link {
    pub fn new(id: LinkId, a: NodeId, b: NodeId, delay: u64) -> Self {
        Self { id, a, b, delay }
    }

    /// Check whether `node` is one of the two endpoints
    pub fn touches(&self, node: NodeId) -> bool {
        self.a == node || self.b == node
    }

    /// Check whether this link joins `x` and `y`, in either orientation
    pub fn connects(&self, x: NodeId, y: NodeId) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }

    /// The endpoint that is not `node`, or `None` when `node` is not on this link
    pub fn other_end(&self, node: NodeId) -> Option<NodeId> {
        if self.a == node {
            Some(self.b)
        } else if self.b == node {
            Some(self.a)
        } else {
            None
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--{}-{}ms-{}--", self.a, self.delay, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(a: u64, b: u64) -> Link {
        Link::new(LinkId(0), NodeId(a), NodeId(b), 0)
    }

    #[test]
    fn test_other_end() {
        let l = link(1, 2);
        assert_eq!(l.other_end(NodeId(1)), Some(NodeId(2)));
        assert_eq!(l.other_end(NodeId(2)), Some(NodeId(1)));
        assert_eq!(l.other_end(NodeId(3)), None);
    }

    #[test]
    fn test_connects_either_orientation() {
        let l = link(1, 2);
        assert!(l.connects(NodeId(1), NodeId(2)));
        assert!(l.connects(NodeId(2), NodeId(1)));
        assert!(!l.connects(NodeId(1), NodeId(3)));
        assert!(l.touches(NodeId(2)));
        assert!(!l.touches(NodeId(5)));
    }

    #[test]
    fn test_display() {
        let mut l = link(3, 8);
        l.delay = 25;
        assert_eq!(l.to_string(), "--3-25ms-8--");
    }
}
