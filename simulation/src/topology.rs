//! Topology graph for hopnet
//!
//! Provides the mutable graph the router walks, plus builders for common
//! shapes:
//! - Line: each node linked to the next
//! - Ring: a line closed back onto the first node
//! - Star: node 0 in the center
//! - Full mesh: every node linked to every other
//! - Random: configurable link probability, seeded
//! - Custom: build from an edge list

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use hopnet_core::{DelayModel, Link, LinkId, NetworkTopology, NodeId, TopologyError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::delay::UniformDelay;

/// A node in the graph; presentation attributes live with the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
}

/// A mutable graph of nodes and undirected, delayed links
///
/// Link ids are allocated monotonically, so id order is insertion order.
/// Every mutation validates before touching any state.
#[derive(Clone)]
pub struct Topology<D = UniformDelay> {
    nodes: BTreeMap<NodeId, Node>,
    links: BTreeMap<LinkId, Link>,
    /// Incident link ids per node
    adjacency: BTreeMap<NodeId, BTreeSet<LinkId>>,
    next_node_id: u64,
    next_link_id: u64,
    delay_model: D,
}

impl Topology<UniformDelay> {
    /// Empty graph whose links all have zero delay
    pub fn zero_delay() -> Self {
        Self::new(UniformDelay::fixed_zero())
    }
}

impl Default for Topology<UniformDelay> {
    fn default() -> Self {
        Self::zero_delay()
    }
}

impl<D> fmt::Debug for Topology<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Topology")
            .field("nodes", &self.nodes.len())
            .field("links", &self.links.len())
            .field("next_node_id", &self.next_node_id)
            .field("next_link_id", &self.next_link_id)
            .finish()
    }
}

impl<D: DelayModel> Topology<D> {
    /// Create an empty graph that samples link delays from `delay_model`
    pub fn new(delay_model: D) -> Self {
        Self {
            nodes: BTreeMap::new(),
            links: BTreeMap::new(),
            adjacency: BTreeMap::new(),
            next_node_id: 0,
            next_link_id: 0,
            delay_model,
        }
    }

    /// Add a node with a caller-chosen id
    pub fn add_node(&mut self, id: NodeId) -> Result<Node, TopologyError> {
        if self.nodes.contains_key(&id) {
            return Err(TopologyError::DuplicateId(id));
        }
        Ok(self.insert_node(id))
    }

    /// Add a node with the next monotonic id (one past the largest ever used)
    pub fn add_next_node(&mut self) -> Result<Node, TopologyError> {
        self.add_node(NodeId(self.next_node_id))
    }

    /// Remove a node and every link touching it; returns the removed links
    pub fn remove_node(&mut self, id: NodeId) -> Result<Vec<Link>, TopologyError> {
        if self.nodes.remove(&id).is_none() {
            return Err(TopologyError::NodeNotFound(id));
        }
        let incident = self.adjacency.remove(&id).unwrap_or_default();

        let mut removed = Vec::with_capacity(incident.len());
        for link_id in incident {
            let Some(link) = self.links.remove(&link_id) else {
                continue;
            };
            if let Some(other) = link.other_end(id)
                && let Some(ids) = self.adjacency.get_mut(&other)
            {
                ids.remove(&link_id);
            }
            removed.push(link);
        }

        debug!(node = %id, cascaded = removed.len(), "Removed node");
        Ok(removed)
    }

    /// Link two existing, distinct nodes; the delay comes from the model
    pub fn add_link(&mut self, a: NodeId, b: NodeId) -> Result<Link, TopologyError> {
        for node in [a, b] {
            if !self.nodes.contains_key(&node) {
                return Err(TopologyError::NodeNotFound(node));
            }
        }
        if a == b {
            return Err(TopologyError::SelfLink(a));
        }
        Ok(self.insert_link(a, b))
    }

    pub fn remove_link(&mut self, id: LinkId) -> Result<Link, TopologyError> {
        let link = self
            .links
            .remove(&id)
            .ok_or(TopologyError::LinkNotFound(id))?;
        for node in [link.a, link.b] {
            if let Some(ids) = self.adjacency.get_mut(&node) {
                ids.remove(&id);
            }
        }
        debug!(link = %id, a = %link.a, b = %link.b, "Removed link");
        Ok(link)
    }

    /// All links touching `id`, in insertion order
    pub fn incident_links(&self, id: NodeId) -> Result<Vec<&Link>, TopologyError> {
        let ids = self
            .adjacency
            .get(&id)
            .ok_or(TopologyError::NodeNotFound(id))?;
        Ok(ids.iter().filter_map(|link_id| self.links.get(link_id)).collect())
    }

    /// The endpoint of `link` that is not `id`
    pub fn neighbor_via(&self, link: &Link, id: NodeId) -> Result<NodeId, TopologyError> {
        link.other_end(id).ok_or(TopologyError::NotAnEndpoint {
            link: link.id,
            node: id,
        })
    }

    pub fn find_node(&self, id: NodeId) -> Result<&Node, TopologyError> {
        self.nodes.get(&id).ok_or(TopologyError::NodeNotFound(id))
    }

    /// Re-sample a link's delay from the model
    pub fn ping(&mut self, id: LinkId) -> Result<u64, TopologyError> {
        let link = self
            .links
            .get_mut(&id)
            .ok_or(TopologyError::LinkNotFound(id))?;
        link.delay = self.delay_model.sample();
        Ok(link.delay)
    }

    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(&id)
    }

    /// All links between `a` and `b`, in insertion order
    pub fn links_between(&self, a: NodeId, b: NodeId) -> Vec<&Link> {
        self.adjacency
            .get(&a)
            .into_iter()
            .flatten()
            .filter_map(|link_id| self.links.get(link_id))
            .filter(|link| link.connects(a, b))
            .collect()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    /// Links in insertion order
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn delay_model_mut(&mut self) -> &mut D {
        &mut self.delay_model
    }

    /// Verify the graph's structural invariants, describing the first
    /// violation found
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.adjacency.len() != self.nodes.len()
            || self.adjacency.keys().any(|id| !self.nodes.contains_key(id))
        {
            return Err("adjacency and node set disagree".to_string());
        }

        for (id, link) in &self.links {
            if link.id != *id {
                return Err(format!("link stored under {} has id {}", id, link.id));
            }
            if link.a == link.b {
                return Err(format!("link {} is a self link", id));
            }
            for end in [link.a, link.b] {
                if !self.nodes.contains_key(&end) {
                    return Err(format!("link {} references missing node {}", id, end));
                }
                if self.adjacency.get(&end).is_none_or(|ids| !ids.contains(id)) {
                    return Err(format!("link {} missing from adjacency of {}", id, end));
                }
            }
            if id.0 >= self.next_link_id {
                return Err(format!("link {} not below the id counter", id));
            }
        }

        for (node, ids) in &self.adjacency {
            for id in ids {
                match self.links.get(id) {
                    Some(link) if link.touches(*node) => {}
                    _ => return Err(format!("node {} lists stale link {}", node, id)),
                }
            }
        }

        Ok(())
    }

    /// Print a simple ASCII visualization of the graph
    pub fn visualize(&self) -> String {
        let mut output = String::new();
        output.push_str("Topology:\n");
        output.push_str(&format!("  Nodes: {}\n", self.node_count()));
        output.push_str(&format!("  Links: {}\n\n", self.link_count()));

        for (node, ids) in &self.adjacency {
            let neighbors: Vec<String> = ids
                .iter()
                .filter_map(|id| self.links.get(id))
                .filter_map(|link| {
                    link.other_end(*node)
                        .map(|other| format!("{} ({}, {}ms)", other, link.id, link.delay))
                })
                .collect();
            output.push_str(&format!("  {} -> [{}]\n", node, neighbors.join(", ")));
        }
        output
    }

    fn insert_node(&mut self, id: NodeId) -> Node {
        let node = Node { id };
        self.nodes.insert(id, node);
        self.adjacency.insert(id, BTreeSet::new());
        self.next_node_id = self.next_node_id.max(id.0.saturating_add(1));
        debug!(node = %id, "Added node");
        node
    }

    /// Caller guarantees both endpoints exist and differ
    fn insert_link(&mut self, a: NodeId, b: NodeId) -> Link {
        let id = LinkId(self.next_link_id);
        self.next_link_id += 1;

        let link = Link::new(id, a, b, self.delay_model.sample());
        self.links.insert(id, link.clone());
        for end in [a, b] {
            self.adjacency.entry(end).or_default().insert(id);
        }
        debug!(link = %id, a = %a, b = %b, delay_ms = link.delay, "Added link");
        link
    }
}

impl<D: DelayModel> NetworkTopology for Topology<D> {
    fn contains(&self, node: NodeId) -> bool {
        self.contains_node(node)
    }

    fn incident_links(&self, node: NodeId) -> Result<Vec<Link>, TopologyError> {
        Ok(Topology::<D>::incident_links(self, node)?
            .into_iter()
            .cloned()
            .collect())
    }

    fn ping(&mut self, link: LinkId) -> Result<u64, TopologyError> {
        Topology::<D>::ping(self, link)
    }
}

/// Builder for common topology shapes over nodes `0..node_count`
#[derive(Debug, Clone)]
pub struct TopologyBuilder<D = UniformDelay> {
    node_count: u64,
    delay_model: D,
}

impl TopologyBuilder<UniformDelay> {
    /// Create a builder for `node_count` nodes with zero-delay links
    pub fn new(node_count: u64) -> Self {
        Self {
            node_count,
            delay_model: UniformDelay::fixed_zero(),
        }
    }
}

impl<D: DelayModel> TopologyBuilder<D> {
    /// Sample link delays from `delay_model` instead
    pub fn with_delay_model<E: DelayModel>(self, delay_model: E) -> TopologyBuilder<E> {
        TopologyBuilder {
            node_count: self.node_count,
            delay_model,
        }
    }

    /// Build a line topology: 0 - 1 - 2 - ...
    pub fn line(self) -> Topology<D> {
        let (mut topology, nodes) = self.empty();
        for pair in nodes.windows(2) {
            topology.insert_link(pair[0], pair[1]);
        }
        topology
    }

    /// Build a ring topology: 0 - 1 - ... - (n-1) - 0
    ///
    /// Fewer than three nodes cannot close a ring and give a line.
    pub fn ring(self) -> Topology<D> {
        let count = self.node_count;
        let mut topology = self.line();
        if count >= 3 {
            topology.insert_link(NodeId(count - 1), NodeId(0));
        }
        topology
    }

    /// Build a star topology: node 0 in the center, linked to all others
    pub fn star(self) -> Topology<D> {
        let (mut topology, nodes) = self.empty();
        if let Some((&center, rest)) = nodes.split_first() {
            for &node in rest {
                topology.insert_link(center, node);
            }
        }
        topology
    }

    /// Build a full mesh where every node is linked to every other
    pub fn full_mesh(self) -> Topology<D> {
        let (mut topology, nodes) = self.empty();
        for (i, &a) in nodes.iter().enumerate() {
            for &b in &nodes[i + 1..] {
                topology.insert_link(a, b);
            }
        }
        topology
    }

    /// Build a random graph: each pair is linked with `probability`.
    ///
    /// Nodes left isolated are then linked to one random other node, so
    /// every node has at least one link when there are two or more nodes.
    pub fn random(self, probability: f64, seed: u64) -> Topology<D> {
        let mut rng = StdRng::seed_from_u64(seed);
        let (mut topology, nodes) = self.empty();

        for (i, &a) in nodes.iter().enumerate() {
            for &b in &nodes[i + 1..] {
                if rng.random::<f64>() < probability {
                    topology.insert_link(a, b);
                }
            }
        }

        if nodes.len() >= 2 {
            for &node in &nodes {
                if topology.adjacency.get(&node).is_some_and(|ids| ids.is_empty()) {
                    let mut other = nodes[rng.random_range(0..nodes.len())];
                    while other == node {
                        other = nodes[rng.random_range(0..nodes.len())];
                    }
                    topology.insert_link(node, other);
                }
            }
        }

        topology
    }

    fn empty(self) -> (Topology<D>, Vec<NodeId>) {
        let mut topology = Topology::new(self.delay_model);
        let nodes = NodeId::range(self.node_count);
        for &node in &nodes {
            topology.insert_node(node);
        }
        (topology, nodes)
    }
}

/// Create a zero-delay topology from an edge list; nodes are added as
/// they first appear
pub fn from_edges(edges: &[(u64, u64)]) -> Result<Topology, TopologyError> {
    let mut topology = Topology::zero_delay();
    for &(a, b) in edges {
        for id in [a, b] {
            if !topology.contains_node(NodeId(id)) {
                topology.add_node(NodeId(id))?;
            }
        }
        topology.add_link(NodeId(a), NodeId(b))?;
    }
    Ok(topology)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delay::FixedDelay;

    #[test]
    fn test_add_and_find_nodes() {
        let mut topo = Topology::zero_delay();
        let node = topo.add_node(NodeId(4)).unwrap();
        assert_eq!(node.id, NodeId(4));
        assert_eq!(topo.find_node(NodeId(4)).unwrap().id, NodeId(4));
        assert_eq!(
            topo.find_node(NodeId(5)),
            Err(TopologyError::NodeNotFound(NodeId(5)))
        );
        assert_eq!(
            topo.add_node(NodeId(4)),
            Err(TopologyError::DuplicateId(NodeId(4)))
        );
        assert_eq!(topo.node_count(), 1);
    }

    #[test]
    fn test_next_node_id_is_monotonic() {
        let mut topo = Topology::zero_delay();
        assert_eq!(topo.add_next_node().unwrap().id, NodeId(0));
        topo.add_node(NodeId(10)).unwrap();
        assert_eq!(topo.add_next_node().unwrap().id, NodeId(11));

        // Removing the largest id does not hand it out again
        topo.remove_node(NodeId(11)).unwrap();
        assert_eq!(topo.add_next_node().unwrap().id, NodeId(12));
    }

    #[test]
    fn test_add_link_preconditions() {
        let mut topo = Topology::zero_delay();
        topo.add_node(NodeId(0)).unwrap();
        topo.add_node(NodeId(1)).unwrap();

        assert_eq!(
            topo.add_link(NodeId(0), NodeId(9)),
            Err(TopologyError::NodeNotFound(NodeId(9)))
        );
        assert_eq!(
            topo.add_link(NodeId(1), NodeId(1)),
            Err(TopologyError::SelfLink(NodeId(1)))
        );
        assert_eq!(topo.link_count(), 0);

        let link = topo.add_link(NodeId(0), NodeId(1)).unwrap();
        assert_eq!(link.id, LinkId(0));
        assert_eq!(link.delay, 0);
        assert!(topo.link(link.id).is_some());
    }

    #[test]
    fn test_parallel_links_are_independent() {
        let mut topo = from_edges(&[(0, 1), (0, 1)]).unwrap();
        let between = topo.links_between(NodeId(1), NodeId(0));
        assert_eq!(between.len(), 2);
        assert_ne!(between[0].id, between[1].id);

        topo.remove_link(LinkId(0)).unwrap();
        assert_eq!(topo.links_between(NodeId(0), NodeId(1)).len(), 1);
        assert_eq!(
            topo.remove_link(LinkId(0)),
            Err(TopologyError::LinkNotFound(LinkId(0)))
        );
    }

    #[test]
    fn test_remove_node_cascades() {
        let mut topo = from_edges(&[(0, 1), (1, 2), (2, 0), (2, 3)]).unwrap();
        let removed = topo.remove_node(NodeId(2)).unwrap();

        let removed_ids: Vec<LinkId> = removed.iter().map(|l| l.id).collect();
        assert_eq!(removed_ids, vec![LinkId(1), LinkId(2), LinkId(3)]);
        assert_eq!(topo.link_count(), 1);
        assert!(topo.incident_links(NodeId(3)).unwrap().is_empty());
        assert!(topo.links().all(|l| !l.touches(NodeId(2))));
        assert!(topo.check_invariants().is_ok());

        assert_eq!(
            topo.remove_node(NodeId(2)),
            Err(TopologyError::NodeNotFound(NodeId(2)))
        );
    }

    #[test]
    fn test_incident_links_in_insertion_order() {
        let topo = from_edges(&[(0, 3), (1, 0), (0, 2)]).unwrap();
        let ids: Vec<LinkId> = topo
            .incident_links(NodeId(0))
            .unwrap()
            .iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, vec![LinkId(0), LinkId(1), LinkId(2)]);
        assert_eq!(
            topo.incident_links(NodeId(7)),
            Err(TopologyError::NodeNotFound(NodeId(7)))
        );
    }

    #[test]
    fn test_neighbor_via() {
        let topo = from_edges(&[(0, 1)]).unwrap();
        let link = topo.link(LinkId(0)).unwrap();
        assert_eq!(topo.neighbor_via(link, NodeId(0)), Ok(NodeId(1)));
        assert_eq!(topo.neighbor_via(link, NodeId(1)), Ok(NodeId(0)));
        assert_eq!(
            topo.neighbor_via(link, NodeId(5)),
            Err(TopologyError::NotAnEndpoint {
                link: LinkId(0),
                node: NodeId(5)
            })
        );
    }

    #[test]
    fn test_ping_resamples_delay() {
        let mut topo = TopologyBuilder::new(2)
            .with_delay_model(FixedDelay(7))
            .line();
        assert_eq!(topo.link(LinkId(0)).unwrap().delay, 7);

        topo.delay_model_mut().0 = 30;
        assert_eq!(topo.ping(LinkId(0)), Ok(30));
        assert_eq!(topo.link(LinkId(0)).unwrap().delay, 30);
        assert_eq!(
            topo.ping(LinkId(9)),
            Err(TopologyError::LinkNotFound(LinkId(9)))
        );
    }

    #[test]
    fn test_zero_delay_pings_stay_zero() {
        let mut topo = TopologyBuilder::new(4).full_mesh();
        for _ in 0..10 {
            for id in 0..6 {
                assert_eq!(topo.ping(LinkId(id)), Ok(0));
            }
        }
    }

    #[test]
    fn test_seeded_delays_reproducible() {
        let build = || {
            let model = UniformDelay::new(1, 100, 99).unwrap();
            let mut topo = TopologyBuilder::new(5).with_delay_model(model).ring();
            let mut delays = Vec::new();
            for _ in 0..3 {
                for id in 0..5 {
                    delays.push(topo.ping(LinkId(id)).unwrap());
                }
            }
            delays
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_builder_shapes() {
        let line = TopologyBuilder::new(4).line();
        assert_eq!((line.node_count(), line.link_count()), (4, 3));

        let ring = TopologyBuilder::new(4).ring();
        assert_eq!(ring.link_count(), 4);
        assert_eq!(ring.links_between(NodeId(3), NodeId(0)).len(), 1);

        let small_ring = TopologyBuilder::new(2).ring();
        assert_eq!(small_ring.link_count(), 1);

        let star = TopologyBuilder::new(5).star();
        assert_eq!(star.incident_links(NodeId(0)).unwrap().len(), 4);
        assert_eq!(star.incident_links(NodeId(3)).unwrap().len(), 1);

        let mesh = TopologyBuilder::new(4).full_mesh();
        assert_eq!(mesh.link_count(), 6);

        let empty = TopologyBuilder::new(0).line();
        assert_eq!(empty.node_count(), 0);

        for topo in [line, ring, star, mesh, empty] {
            assert!(topo.check_invariants().is_ok());
        }
    }

    #[test]
    fn test_random_topology() {
        let a = TopologyBuilder::new(10).random(0.3, 5);
        let b = TopologyBuilder::new(10).random(0.3, 5);
        let edges = |t: &Topology| t.links().map(|l| (l.a, l.b)).collect::<Vec<_>>();
        assert_eq!(edges(&a), edges(&b));

        // No isolated nodes
        for id in a.node_ids() {
            assert!(!a.incident_links(id).unwrap().is_empty());
        }
        assert!(a.check_invariants().is_ok());

        let single = TopologyBuilder::new(1).random(1.0, 0);
        assert_eq!(single.link_count(), 0);
    }

    #[test]
    fn test_from_edges_rejects_self_link() {
        assert_eq!(
            from_edges(&[(0, 1), (2, 2)]).err(),
            Some(TopologyError::SelfLink(NodeId(2)))
        );
    }

    #[test]
    fn test_network_topology_impl() {
        let mut topo = from_edges(&[(0, 1), (1, 2)]).unwrap();
        assert!(NetworkTopology::contains(&topo, NodeId(2)));
        assert!(!NetworkTopology::contains(&topo, NodeId(3)));

        let links = NetworkTopology::incident_links(&topo, NodeId(1)).unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(
            NetworkTopology::neighbors(&topo, NodeId(1)).unwrap(),
            vec![NodeId(0), NodeId(2)]
        );
        assert_eq!(NetworkTopology::ping(&mut topo, LinkId(1)), Ok(0));
    }

    #[test]
    fn test_visualize() {
        let topo = from_edges(&[(0, 1), (1, 2)]).unwrap();
        let output = topo.visualize();
        assert!(output.contains("Nodes: 3"));
        assert!(output.contains("Links: 2"));
        assert!(output.contains("1 -> [0 (L0, 0ms), 2 (L1, 0ms)]"));
    }

    /// Random operation sequences never leave a link pointing at a
    /// removed node, and failed operations change nothing.
    #[test]
    fn test_invariants_under_random_operations() {
        for seed in 0..50u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let delays = UniformDelay::new(0, 10, seed).unwrap();
            let mut topo = Topology::new(delays);

            for step in 0..300 {
                let before = (topo.node_count(), topo.link_count());
                let result = match rng.random_range(0..5) {
                    0 => topo.add_node(NodeId(rng.random_range(0..16))).map(|_| ()),
                    1 => topo.add_next_node().map(|_| ()),
                    2 => topo.remove_node(NodeId(rng.random_range(0..16))).map(|_| ()),
                    3 => {
                        let a = NodeId(rng.random_range(0..16));
                        let b = NodeId(rng.random_range(0..16));
                        topo.add_link(a, b).map(|_| ())
                    }
                    _ => topo
                        .remove_link(LinkId(rng.random_range(0..64)))
                        .map(|_| ()),
                };

                if result.is_err() {
                    assert_eq!(
                        (topo.node_count(), topo.link_count()),
                        before,
                        "seed {seed} step {step}: failed operation changed the graph"
                    );
                }
                if let Err(violation) = topo.check_invariants() {
                    panic!("seed {seed} step {step}: {violation}");
                }
                for link in topo.links() {
                    assert!(topo.contains_node(link.a) && topo.contains_node(link.b));
                }
            }
        }
    }
}
