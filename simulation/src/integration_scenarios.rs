//! Integration scenarios exercising the full hopnet stack
//!
//! These run the router from hopnet-routing over the concrete
//! [`Topology`], with real delay models and the stock [`Inbox`].

use std::collections::{HashSet, VecDeque};

use hopnet_core::{DelayModel, LinkId, Message, NodeId, TraversalEvent};
use hopnet_routing::{DeadEndCause, Envelope, Inbox, Outcome, RouteReport, Router};

use crate::config::SimConfig;
use crate::delay::UniformDelay;
use crate::simulation::Simulation;
use crate::topology::{Topology, TopologyBuilder, from_edges};

/// Hands out delays from a script, then zeros
struct Scripted(VecDeque<u64>);

impl Scripted {
    fn new(delays: &[u64]) -> Self {
        Self(delays.iter().copied().collect())
    }
}

impl DelayModel for Scripted {
    fn sample(&mut self) -> u64 {
        self.0.pop_front().unwrap_or(0)
    }
}

fn walk<D: DelayModel>(topology: &mut Topology<D>, from: u64, to: u64, budget: u32) -> RouteReport {
    let envelope = Envelope::ping(NodeId(from), NodeId(to)).with_hop_budget(budget);
    Router::new()
        .send(topology, &envelope, &mut Inbox::new(), &mut ())
        .unwrap()
}

fn ids(nodes: &[u64]) -> Vec<NodeId> {
    nodes.iter().copied().map(NodeId).collect()
}

#[test]
fn test_direct_link() {
    let mut topo = from_edges(&[(0, 1)]).unwrap();
    let report = walk(&mut topo, 0, 1, 1);
    assert_eq!(report.outcome, Outcome::Delivered);
    assert_eq!(report.visited, ids(&[0, 1]));
}

#[test]
fn test_line_topology_budget() {
    let mut topo = TopologyBuilder::new(3).line();

    let report = walk(&mut topo, 0, 2, 2);
    assert_eq!(report.outcome, Outcome::Delivered);
    assert_eq!(report.visited, ids(&[0, 1, 2]));

    let report = walk(&mut topo, 0, 2, 1);
    assert_eq!(report.outcome, Outcome::MaxDepthExceeded);
    assert_eq!(report.final_node(), Some(NodeId(1)));
}

#[test]
fn test_star_leaf_to_leaf() {
    // A=0, B=1, C=2, D=3: A-B, A-C, B-D
    let mut topo = from_edges(&[(0, 1), (0, 2), (1, 3)]).unwrap();
    let report = walk(&mut topo, 3, 2, 10);

    assert_eq!(report.outcome, Outcome::Delivered);
    assert_eq!(report.path, ids(&[3, 1, 0, 2]));
    assert_eq!(report.path.iter().filter(|n| **n == NodeId(3)).count(), 1);
}

#[test]
fn test_isolated_source() {
    let mut topo = from_edges(&[(0, 1)]).unwrap();
    topo.add_node(NodeId(2)).unwrap();

    let report = walk(&mut topo, 2, 0, 10);
    assert_eq!(report.outcome, Outcome::DeadEnd);
    assert_eq!(report.dead_end, Some(DeadEndCause::NoPreviousNode));
    assert_eq!(report.hops, 0);
}

#[test]
fn test_self_delivery() {
    let mut topo = TopologyBuilder::new(3).full_mesh();
    for budget in [0, 1, 5] {
        let report = walk(&mut topo, 1, 1, budget);
        assert_eq!(report.outcome, Outcome::Delivered);
        assert_eq!(report.visited, ids(&[1]));
        assert_eq!(report.hops, 0);
    }
}

#[test]
fn test_slowest_link_taken_first() {
    // Links 0-1, 0-2, 0-3 get delays 5, 40, 40
    let mut topo = Topology::new(Scripted::new(&[5, 40, 40]));
    for id in [0, 1, 2, 3, 9] {
        topo.add_node(NodeId(id)).unwrap();
    }
    for b in 1..4 {
        topo.add_link(NodeId(0), NodeId(b)).unwrap();
    }

    // Budget 1 stops at whichever neighbor was chosen first.
    let report = walk(&mut topo, 0, 9, 1);
    assert_eq!(report.outcome, Outcome::MaxDepthExceeded);
    assert_eq!(report.final_node(), Some(NodeId(2)));
    assert_eq!(report.latency, 40);

    // The ping on 0-2 re-sampled it to zero, so 0-3 is now the slowest.
    let report = walk(&mut topo, 0, 9, 1);
    assert_eq!(report.final_node(), Some(NodeId(3)));
    assert_eq!(topo.link(LinkId(1)).unwrap().delay, 0);
}

#[test]
fn test_lookback_keeps_moving_backward() {
    // 0 - 1 - 2 - 3, destination 9 has no links
    let mut topo = TopologyBuilder::new(4).line();
    topo.add_node(NodeId(9)).unwrap();

    let report = walk(&mut topo, 1, 9, 100);
    // 1 -> 0 first (ties keep insertion order), dead end back to 1, then
    // 1 -> 2 -> 3. The dead end at 3 returns to 2; the next lookback is 0,
    // which 2 has no link to.
    assert_eq!(report.path, ids(&[1, 0, 1, 2, 3, 2]));
    assert_eq!(report.visited, ids(&[1, 0, 2, 3]));
    assert_eq!(report.outcome, Outcome::DeadEnd);
    assert_eq!(report.dead_end, Some(DeadEndCause::NoReturnLink { previous: NodeId(0) }));
    assert_eq!(report.final_node(), Some(NodeId(2)));
}

#[test]
fn test_walk_never_repeats_visited_nodes() {
    for seed in 0..40u64 {
        let delays = UniformDelay::new(0, 30, seed).unwrap();
        let mut topo = TopologyBuilder::new(15)
            .with_delay_model(delays)
            .random(0.2, seed);
        let report = walk(&mut topo, seed % 15, (seed * 11 + 4) % 15, 40);

        let unique: HashSet<_> = report.visited.iter().collect();
        assert_eq!(unique.len(), report.visited.len(), "seed {seed}");
        assert!(report.hops <= 40);
        for pair in report.path.windows(2) {
            assert!(
                !topo.links_between(pair[0], pair[1]).is_empty(),
                "seed {seed}: {pair:?} is not a link"
            );
        }
    }
}

#[test]
fn test_delivered_message_round_trip() {
    let mut topo = TopologyBuilder::new(4).ring();
    let message = Message::new(NodeId(0), "PUT", "key=value").unwrap();
    let envelope = Envelope::message(NodeId(0), NodeId(2), &message);

    let mut inbox = Inbox::new();
    let report = Router::new()
        .send(&mut topo, &envelope, &mut inbox, &mut ())
        .unwrap();

    assert!(report.is_delivered());
    let received = inbox.last().unwrap();
    assert_eq!(received, &message);
    assert_eq!(received.data, "key=value");
    assert_eq!(received.to_string(), envelope.payload);
}

#[test]
fn test_visit_events_highlight_progress() {
    let mut sim = Simulation::new(TopologyBuilder::new(4).line(), SimConfig::quiet());
    sim.ping(NodeId(0), NodeId(3)).unwrap();

    let highlighted: Vec<NodeId> = sim
        .event_log
        .iter()
        .filter_map(|e| match e {
            TraversalEvent::Visit { node, .. } => Some(*node),
            _ => None,
        })
        .collect();
    assert_eq!(highlighted, ids(&[0, 1, 2, 3]));
    assert_eq!(
        sim.event_log.last(),
        Some(&TraversalEvent::Delivered {
            node: NodeId(3),
            hops: 3
        })
    );
}

#[test]
fn test_seeded_simulations_agree() {
    let run = || {
        let mut config = SimConfig::quiet();
        config.delay.max_ms = 25;
        config.delay.seed = Some(11);
        let mut sim = Simulation::from_config(config).unwrap();
        for _ in 0..8 {
            sim.add_next_node().unwrap();
        }
        for (a, b) in [(0, 1), (1, 2), (2, 3), (1, 4), (4, 5), (5, 6), (3, 7), (0, 6)] {
            sim.connect(NodeId(a), NodeId(b)).unwrap();
        }
        for to in 1..8 {
            sim.ping(NodeId(0), NodeId(to)).unwrap();
        }
        (sim.stats.clone(), sim.event_log.clone())
    };
    assert_eq!(run(), run());
}
