//! Greedy hop-budgeted router
//!
//! The [`Router`] walks a message across the topology one link at a time.
//! It is a single-path walk: at each node it takes the first unvisited
//! neighbor and never comes back to try the alternatives, except through
//! the dead-end backtrack.
//!
//! ## Link order
//!
//! Incident links are tried by delay **descending**, ties in insertion
//! order. The walk therefore prefers the slowest link among unvisited
//! neighbors. Changing this changes every observable traversal order.
//!
//! ## Termination
//!
//! Every traversal, forward or backward, costs one hop. The hop budget is
//! the only cancellation mechanism; there is no clock and no cancel signal.
//! The walk is a loop, so its depth is bounded by the budget rather than
//! by the call stack.

use hopnet_core::{
    DeliveryHandler, Link, MessageError, NetworkTopology, NodeId, TraversalEvent,
    TraversalObserver,
};
use tracing::{debug, debug_span, trace, warn};

use crate::envelope::Envelope;
use crate::error::{RoutingError, RoutingResult};
use crate::outcome::{DeadEndCause, Outcome, RouteReport};
use crate::traversal::Traversal;

/// Stateless router; all per-walk state lives in a [`Traversal`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Router;

impl Router {
    pub fn new() -> Self {
        Self
    }

    /// Walk `envelope` from its source toward its destination.
    ///
    /// Holding `&mut T` for the whole call keeps the topology from being
    /// edited mid-walk. `Err` is returned only when the request cannot
    /// start (unknown source or destination) or the topology fails a query;
    /// budget exhaustion and dead ends come back as an [`Outcome`].
    pub fn send<T, H, O>(
        &self,
        topology: &mut T,
        envelope: &Envelope,
        handler: &mut H,
        observer: &mut O,
    ) -> RoutingResult<RouteReport>
    where
        T: NetworkTopology + ?Sized,
        H: DeliveryHandler + ?Sized,
        O: TraversalObserver + ?Sized,
    {
        let source = envelope.source;
        let destination = envelope.destination;

        for node in [source, destination] {
            if !topology.contains(node) {
                return Err(RoutingError::UnknownNode(node));
            }
        }

        let span = debug_span!(
            "send",
            source = %source,
            destination = %destination,
            hop_budget = envelope.hop_budget
        );
        let _enter = span.enter();

        let mut walk = Traversal::new(source, envelope.hop_budget);
        observer.observe(&TraversalEvent::Visit {
            node: source,
            hop: 0,
        });

        loop {
            let current = walk.current();

            if current == destination {
                let delivery_error = match handler.deliver(&envelope.payload) {
                    Ok(message) => {
                        debug!(
                            node = %current,
                            sender = %message.sender,
                            command = %message.command,
                            hops = walk.hops(),
                            latency_ms = walk.latency(),
                            "Delivered"
                        );
                        None
                    }
                    Err(e) => {
                        warn!(node = %current, error = %e, "Delivered a malformed payload");
                        Some(e)
                    }
                };
                observer.observe(&TraversalEvent::Delivered {
                    node: current,
                    hops: walk.hops(),
                });
                return Ok(finish(walk, Outcome::Delivered, None, delivery_error));
            }

            if walk.is_exhausted() {
                debug!(node = %current, hops = walk.hops(), "Max depth reached");
                observer.observe(&TraversalEvent::BudgetExhausted {
                    node: current,
                    hops: walk.hops(),
                });
                return Ok(finish(walk, Outcome::MaxDepthExceeded, None, None));
            }

            let links = ordered_links(&*topology, current)?;

            // FORWARD: first link whose far end is still unvisited
            let forward = links.iter().find_map(|link| {
                link.other_end(current)
                    .filter(|away| !walk.has_visited(*away))
                    .map(|away| (link, away))
            });

            if let Some((link, away)) = forward {
                let delay = link.delay;
                let refreshed = topology.ping(link.id)?;
                walk.advance(away, delay);
                trace!(
                    from = %current,
                    to = %away,
                    link = %link.id,
                    delay_ms = delay,
                    refreshed_ms = refreshed,
                    remaining = walk.remaining(),
                    "Forward"
                );
                observer.observe(&TraversalEvent::Forward {
                    from: current,
                    to: away,
                    link: link.id,
                    delay,
                });
                observer.observe(&TraversalEvent::Visit {
                    node: away,
                    hop: walk.hops(),
                });
                continue;
            }

            // BACKTRACK: step back along the visited sequence
            let Some(previous) = walk.lookback() else {
                debug!(node = %current, hops = walk.hops(), "Dead end with nowhere to return");
                observer.observe(&TraversalEvent::DeadEnd {
                    node: current,
                    hops: walk.hops(),
                });
                return Ok(finish(
                    walk,
                    Outcome::DeadEnd,
                    Some(DeadEndCause::NoPreviousNode),
                    None,
                ));
            };

            let Some(link) = links
                .iter()
                .find(|link| link.other_end(current) == Some(previous))
            else {
                warn!(
                    node = %current,
                    previous = %previous,
                    "Dead end: no return link to previous node"
                );
                observer.observe(&TraversalEvent::DeadEnd {
                    node: current,
                    hops: walk.hops(),
                });
                return Ok(finish(
                    walk,
                    Outcome::DeadEnd,
                    Some(DeadEndCause::NoReturnLink { previous }),
                    None,
                ));
            };

            let delay = link.delay;
            topology.ping(link.id)?;
            walk.retreat(previous, delay);
            debug!(
                from = %current,
                to = %previous,
                link = %link.id,
                delay_ms = delay,
                remaining = walk.remaining(),
                "Dead end, returning to previous node"
            );
            observer.observe(&TraversalEvent::Backtrack {
                from: current,
                to: previous,
                link: link.id,
                delay,
            });
            observer.observe(&TraversalEvent::Visit {
                node: previous,
                hop: walk.hops(),
            });
        }
    }
}

/// Incident links, slowest first; `sort_by` is stable so ties keep
/// insertion order
fn ordered_links<T>(topology: &T, node: NodeId) -> RoutingResult<Vec<Link>>
where
    T: NetworkTopology + ?Sized,
{
    let mut links = topology.incident_links(node)?;
    links.sort_by(|x, y| y.delay.cmp(&x.delay));
    Ok(links)
}

fn finish(
    walk: Traversal,
    outcome: Outcome,
    dead_end: Option<DeadEndCause>,
    delivery_error: Option<MessageError>,
) -> RouteReport {
    let hops = walk.hops();
    let backtracks = walk.backtracks();
    let latency = walk.latency();
    let (visited, path) = walk.into_sequences();
    RouteReport {
        outcome,
        visited,
        path,
        hops,
        backtracks,
        latency,
        dead_end,
        delivery_error,
    }
}
