//! Simulation engine for hopnet
//!
//! A [`Simulation`] bundles one topology with the router, an inbox, an
//! append-only event log and running statistics. Its operations mirror what
//! an editor does: place and delete nodes, draw and erase links, and ping
//! one node from another.

use hopnet_core::{
    DelayModel, Link, LinkId, Message, NodeId, TopologyError, TraversalEvent, TraversalObserver,
};
use hopnet_routing::{Envelope, Inbox, Outcome, RouteReport, Router, RoutingError};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{ConfigError, SimConfig};
use crate::delay::UniformDelay;
use crate::pacing::PacingObserver;
use crate::topology::{Node, Topology};

/// Simulation statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimStats {
    /// Walks that ran to an outcome
    pub messages_sent: u64,
    pub messages_delivered: u64,
    pub max_depth_exceeded: u64,
    pub dead_ends: u64,
    /// Delivered, but the payload did not parse
    pub malformed_deliveries: u64,
    pub total_hops: u64,
    pub total_backtracks: u64,
    /// Total simulated latency over all walks
    pub total_latency_ms: u64,
}

impl SimStats {
    pub fn record(&mut self, report: &RouteReport) {
        self.messages_sent += 1;
        match report.outcome {
            Outcome::Delivered => self.messages_delivered += 1,
            Outcome::MaxDepthExceeded => self.max_depth_exceeded += 1,
            Outcome::DeadEnd => self.dead_ends += 1,
        }
        if report.delivery_error.is_some() {
            self.malformed_deliveries += 1;
        }
        self.total_hops = self.total_hops.saturating_add(u64::from(report.hops));
        self.total_backtracks = self
            .total_backtracks
            .saturating_add(u64::from(report.backtracks));
        self.total_latency_ms = self.total_latency_ms.saturating_add(report.latency);
    }

    pub fn delivery_rate(&self) -> f64 {
        if self.messages_sent == 0 {
            return 0.0;
        }
        self.messages_delivered as f64 / self.messages_sent as f64
    }

    pub fn average_hops(&self) -> f64 {
        if self.messages_sent == 0 {
            return 0.0;
        }
        self.total_hops as f64 / self.messages_sent as f64
    }
}

/// The simulation state
#[derive(Debug)]
pub struct Simulation<D = UniformDelay> {
    /// The network graph
    pub topology: Topology<D>,
    /// Configuration
    pub config: SimConfig,
    router: Router,
    /// Every message delivered so far
    pub inbox: Inbox,
    /// Global event log (all walks, in order)
    pub event_log: Vec<TraversalEvent>,
    /// Statistics
    pub stats: SimStats,
}

impl Simulation<UniformDelay> {
    /// Empty topology with delays drawn from `config.delay`
    pub fn from_config(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let delay = UniformDelay::from_config(&config.delay)?;
        Ok(Self::new(Topology::new(delay), config))
    }
}

impl<D: DelayModel> Simulation<D> {
    /// Create a new simulation with the given topology and configuration
    pub fn new(topology: Topology<D>, config: SimConfig) -> Self {
        Self {
            topology,
            config,
            router: Router::new(),
            inbox: Inbox::new(),
            event_log: Vec::new(),
            stats: SimStats::default(),
        }
    }

    pub fn add_node(&mut self, id: NodeId) -> Result<Node, TopologyError> {
        let node = self.topology.add_node(id)?;
        info!(node = %node.id, "Node placed");
        Ok(node)
    }

    pub fn add_next_node(&mut self) -> Result<Node, TopologyError> {
        let node = self.topology.add_next_node()?;
        info!(node = %node.id, "Node placed");
        Ok(node)
    }

    /// Delete a node together with its links
    pub fn remove_node(&mut self, id: NodeId) -> Result<Vec<Link>, TopologyError> {
        let removed = self.topology.remove_node(id)?;
        info!(node = %id, links = removed.len(), "Node deleted");
        Ok(removed)
    }

    pub fn connect(&mut self, a: NodeId, b: NodeId) -> Result<Link, TopologyError> {
        let link = self.topology.add_link(a, b)?;
        info!(link = %link.id, a = %a, b = %b, delay_ms = link.delay, "Link drawn");
        Ok(link)
    }

    pub fn disconnect(&mut self, id: LinkId) -> Result<Link, TopologyError> {
        let link = self.topology.remove_link(id)?;
        info!(link = %id, a = %link.a, b = %link.b, "Link erased");
        Ok(link)
    }

    /// Send `"<from>:PING="` from `from` to `to` with the configured budget
    pub fn ping(&mut self, from: NodeId, to: NodeId) -> Result<RouteReport, RoutingError> {
        let envelope = Envelope::ping(from, to).with_hop_budget(self.config.hop_budget);
        self.route(&envelope, &mut ())
    }

    /// Send a typed message; `hop_budget` falls back to the configured one
    pub fn send_message(
        &mut self,
        from: NodeId,
        to: NodeId,
        message: &Message,
        hop_budget: Option<u32>,
    ) -> Result<RouteReport, RoutingError> {
        message.validate()?;
        let envelope = Envelope::message(from, to, message)
            .with_hop_budget(hop_budget.unwrap_or(self.config.hop_budget));
        self.route(&envelope, &mut ())
    }

    /// Walk `envelope`, recording events and stats; `observer` sees every
    /// event as well
    pub fn route<O>(
        &mut self,
        envelope: &Envelope,
        observer: &mut O,
    ) -> Result<RouteReport, RoutingError>
    where
        O: TraversalObserver + ?Sized,
    {
        let trace = self.config.trace_routing;
        let mut pacer = self.config.pace_real_time.then(PacingObserver::new);
        let event_log = &mut self.event_log;

        let mut record = |event: &TraversalEvent| {
            if trace && let TraversalEvent::Visit { node, hop } = event {
                info!(node = %node, hop = *hop, "Visiting node");
            }
            if let Some(pacer) = pacer.as_mut() {
                pacer.observe(event);
            }
            observer.observe(event);
            event_log.push(event.clone());
        };

        let result = self
            .router
            .send(&mut self.topology, envelope, &mut self.inbox, &mut record);

        match &result {
            Ok(report) => {
                self.stats.record(report);
                info!(
                    source = %envelope.source,
                    destination = %envelope.destination,
                    outcome = %report.outcome,
                    hops = report.hops,
                    backtracks = report.backtracks,
                    latency_ms = report.latency,
                    "Send finished"
                );
            }
            Err(e) => {
                warn!(
                    source = %envelope.source,
                    destination = %envelope.destination,
                    error = %e,
                    "Send rejected"
                );
            }
        }
        result
    }

    /// One-line summary of the current state
    pub fn state_summary(&self) -> String {
        format!(
            "Nodes: {} | Links: {} | Sent: {} | Delivered: {} | MaxDepth: {} | DeadEnd: {} | Inbox: {}",
            self.topology.node_count(),
            self.topology.link_count(),
            self.stats.messages_sent,
            self.stats.messages_delivered,
            self.stats.max_depth_exceeded,
            self.stats.dead_ends,
            self.inbox.len()
        )
    }
}
