//! # hopnet simulation
//!
//! A network topology simulator with a greedy, hop-budgeted message walk.
//!
//! ## Overview
//!
//! Nodes and undirected links live in a mutable [`Topology`]. Every link
//! carries a simulated delay drawn from a pluggable [`DelayModel`]. A send
//! walks the graph one link at a time:
//!
//! - **Slowest link first**: incident links are tried by delay, descending
//! - **No revisits**: a node already in the visited sequence is never
//!   entered going forward
//! - **Dead-end backtracking**: with nowhere new to go, step back along
//!   the visited sequence
//! - **Hop budget**: every traversal costs one hop; the walk stops when
//!   the budget is spent
//!
//! ## Architecture
//!
//! - **Topology** (`topology.rs`): The graph and builders (line, ring, star, full, random)
//! - **Delay** (`delay.rs`): Fixed and seeded uniform delay models
//! - **Simulation** (`simulation.rs`): Graph + router + inbox + event log + stats
//! - **Pacing** (`pacing.rs`): Optional real-time sleeps driven by the event stream
//! - **Scenarios** (`scenarios.rs`): Pre-built scenarios
//!
//! ## Example
//!
//! ```rust,ignore
//! use hopnet_simulation::*;
//!
//! // C - A - B - D
//! let topology = from_edges(&[(0, 1), (0, 2), (1, 3)])?;
//! let mut sim = Simulation::new(topology, SimConfig::default());
//!
//! // D pings C: the walk goes D -> B -> A -> C
//! let report = sim.ping(NodeId(3), NodeId(2))?;
//! assert_eq!(report.outcome, Outcome::Delivered);
//! assert_eq!(sim.inbox.last(), Some(&Message::ping(NodeId(3))));
//! ```

pub mod config;
pub mod delay;
pub mod pacing;
pub mod scenarios;
pub mod simulation;
pub mod topology;

#[cfg(test)]
mod integration_scenarios;

pub use config::{ConfigError, DelayConfig, SimConfig};
pub use delay::{FixedDelay, UniformDelay};
pub use pacing::PacingObserver;
pub use simulation::{SimStats, Simulation};
pub use topology::{Node, Topology, TopologyBuilder, from_edges};

pub use hopnet_core::{DelayModel, Link, LinkId, Message, NodeId, TopologyError, TraversalEvent};
pub use hopnet_routing::{Envelope, Outcome, RouteReport, RoutingError};
