//! Per-walk traversal state
//!
//! Created at the start of one [`Router::send`](crate::Router::send) call
//! and dropped at its end. Nothing here outlives a walk.

use std::collections::HashSet;

use hopnet_core::NodeId;

/// Visited sequence, lookback cursor, and budget for one walk
#[derive(Debug, Clone)]
pub struct Traversal {
    /// Distinct nodes in first-visit order. Never truncated.
    visited: Vec<NodeId>,
    seen: HashSet<NodeId>,
    /// Index in `visited` that the next backtrack steps back from
    cursor: usize,
    current: NodeId,
    path: Vec<NodeId>,
    remaining: u32,
    hops: u32,
    backtracks: u32,
    latency: u64,
}

impl Traversal {
    pub fn new(source: NodeId, hop_budget: u32) -> Self {
        let mut seen = HashSet::new();
        seen.insert(source);
        Self {
            visited: vec![source],
            seen,
            cursor: 0,
            current: source,
            path: vec![source],
            remaining: hop_budget,
            hops: 0,
            backtracks: 0,
            latency: 0,
        }
    }

    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn has_visited(&self, node: NodeId) -> bool {
        self.seen.contains(&node)
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// The node a dead end at the current position would return to.
    ///
    /// Right after a forward hop this is the second-to-last visited node;
    /// each further backtrack moves it one entry earlier.
    pub fn lookback(&self) -> Option<NodeId> {
        self.cursor
            .checked_sub(1)
            .and_then(|i| self.visited.get(i))
            .copied()
    }

    /// Step onto an unvisited node
    pub fn advance(&mut self, to: NodeId, delay: u64) {
        debug_assert!(!self.has_visited(to), "advance onto visited node {to}");
        self.seen.insert(to);
        self.visited.push(to);
        self.cursor = self.visited.len() - 1;
        self.step(to, delay);
    }

    /// Step back to [`lookback`](Self::lookback)
    pub fn retreat(&mut self, to: NodeId, delay: u64) {
        debug_assert_eq!(self.lookback(), Some(to));
        self.cursor -= 1;
        self.backtracks += 1;
        self.step(to, delay);
    }

    fn step(&mut self, to: NodeId, delay: u64) {
        self.current = to;
        self.path.push(to);
        self.remaining = self.remaining.saturating_sub(1);
        self.hops += 1;
        self.latency = self.latency.saturating_add(delay);
    }

    pub fn visited(&self) -> &[NodeId] {
        &self.visited
    }

    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn hops(&self) -> u32 {
        self.hops
    }

    pub fn backtracks(&self) -> u32 {
        self.backtracks
    }

    pub fn latency(&self) -> u64 {
        self.latency
    }

    /// Split into `(visited, path)`
    pub fn into_sequences(self) -> (Vec<NodeId>, Vec<NodeId>) {
        (self.visited, self.path)
    }
}
