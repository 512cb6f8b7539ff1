//! # Hopnet Routing
//!
//! The routing walk for hopnet: a single-path, greedy, hop-budgeted walk
//! with limited dead-end backtracking. It is a packet-with-TTL simulation,
//! not a shortest-path algorithm; delivery is never guaranteed.
//!
//! ## Core Components
//!
//! - [`Router`]: Runs one walk per [`Router::send`] call
//! - [`Envelope`]: What to send, from where, to where, with which budget
//! - [`RouteReport`] / [`Outcome`]: How the walk ended and what it cost
//! - [`Inbox`]: Delivery handler that parses and records messages
//!
//! ## Walk
//!
//! At every node the walk:
//!
//! 1. **DELIVER** if it is at the destination
//! 2. **EXHAUST** if the hop budget is spent
//! 3. **FORWARD** over the first link (delay descending, insertion order on
//!    ties) whose far end has not been visited, pinging that link
//! 4. **BACKTRACK** over the link to the node before it in the visited
//!    sequence, pinging that link
//! 5. **DEAD END** when there is nothing to go back to
//!
//! ## Example
//!
//! ```rust,ignore
//! use hopnet_routing::{Envelope, Inbox, Outcome, Router};
//!
//! let envelope = Envelope::ping(source, destination).with_hop_budget(10);
//! let mut inbox = Inbox::new();
//! let report = Router::new().send(&mut topology, &envelope, &mut inbox, &mut ())?;
//! match report.outcome {
//!     Outcome::Delivered => { /* inbox.last() holds the message */ }
//!     Outcome::MaxDepthExceeded => { /* retry with a larger budget */ }
//!     Outcome::DeadEnd => { /* try another source */ }
//! }
//! ```

pub mod delivery;
pub mod envelope;
pub mod error;
pub mod outcome;
pub mod router;
pub mod traversal;

// Re-export main types
pub use delivery::Inbox;
pub use envelope::{DEFAULT_HOP_BUDGET, Envelope};
pub use error::{RoutingError, RoutingResult};
pub use outcome::{DeadEndCause, Outcome, RouteReport};
pub use router::Router;
pub use traversal::Traversal;

// Re-export core routing types for convenience
pub use hopnet_core::{DeliveryHandler, NetworkTopology, TraversalEvent, TraversalObserver};
