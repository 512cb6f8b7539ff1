//! # Hopnet Core
//!
//! Core traits, types, and errors shared by the hopnet crates.
//!
//! The routing walk never talks to a concrete graph. It goes through the
//! seams defined here so the same walk runs against the simulation
//! `Topology` as well as the small test topologies in each crate.
//!
//! ## Key Traits
//!
//! - [`NetworkTopology`]: Adjacency queries plus the per-link delay refresh ("ping")
//! - [`DelayModel`]: Strategy that samples a link's simulated latency
//! - [`DeliveryHandler`]: Consumes a payload once it reaches its destination
//! - [`TraversalObserver`]: Receives one [`TraversalEvent`] per step of a walk
//!
//! ## Key Types
//!
//! - [`NodeId`] / [`LinkId`]: Stable identities for nodes and links
//! - [`Link`]: An undirected, weighted connection between two nodes
//! - [`Message`]: Typed `"<sender>:<command>=<data>"` payload

pub mod error;
pub mod event;
pub mod identity;
pub mod link;
pub mod message;
pub mod traits;

// Re-export main types
pub use error::*;
pub use event::*;
pub use identity::*;
pub use link::*;
pub use message::*;
pub use traits::*;
