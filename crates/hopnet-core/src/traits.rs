//! Core traits for hopnet
//!
//! These traits are the seams between the routing walk and everything
//! around it: the graph it walks, the latency model behind each link, the
//! consumer of delivered payloads, and whoever watches the walk.

use crate::error::{MessageError, TopologyError};
use crate::event::TraversalEvent;
use crate::identity::{LinkId, NodeId};
use crate::link::Link;
use crate::message::Message;

/// Network topology as seen by the router
///
/// `incident_links` must return links in the topology's insertion order;
/// the router's tie-breaking depends on it.
pub trait NetworkTopology {
    /// Check whether a node exists
    fn contains(&self, node: NodeId) -> bool;

    /// Snapshot of every link touching `node`, in insertion order
    fn incident_links(&self, node: NodeId) -> Result<Vec<Link>, TopologyError>;

    /// Re-sample a link's delay and return the new value
    fn ping(&mut self, link: LinkId) -> Result<u64, TopologyError>;

    /// Get the neighbors of a node, one entry per incident link
    fn neighbors(&self, node: NodeId) -> Result<Vec<NodeId>, TopologyError> {
        Ok(self
            .incident_links(node)?
            .iter()
            .filter_map(|link| link.other_end(node))
            .collect())
    }
}

/// Strategy that produces a link's simulated latency
pub trait DelayModel {
    /// Draw the next delay value, in milliseconds
    fn sample(&mut self) -> u64;
}

impl<D: DelayModel + ?Sized> DelayModel for Box<D> {
    fn sample(&mut self) -> u64 {
        (**self).sample()
    }
}

/// Consumer of payloads that reached their destination
pub trait DeliveryHandler {
    /// Interpret a delivered payload.
    ///
    /// A parse failure is reported back to the caller but does not undo the
    /// delivery.
    fn deliver(&mut self, payload: &str) -> Result<Message, MessageError>;
}

impl<F> DeliveryHandler for F
where
    F: FnMut(&str) -> Result<Message, MessageError>,
{
    fn deliver(&mut self, payload: &str) -> Result<Message, MessageError> {
        self(payload)
    }
}

/// Receives every event of a walk, in order
pub trait TraversalObserver {
    fn observe(&mut self, event: &TraversalEvent);
}

/// Discards all events
impl TraversalObserver for () {
    fn observe(&mut self, _event: &TraversalEvent) {}
}

/// Records all events
impl TraversalObserver for Vec<TraversalEvent> {
    fn observe(&mut self, event: &TraversalEvent) {
        self.push(event.clone());
    }
}

impl<F> TraversalObserver for F
where
    F: FnMut(&TraversalEvent),
{
    fn observe(&mut self, event: &TraversalEvent) {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant(u64);

    impl DelayModel for Constant {
        fn sample(&mut self) -> u64 {
            self.0
        }
    }

    #[test]
    fn test_boxed_delay_model() {
        let mut model: Box<dyn DelayModel> = Box::new(Constant(7));
        assert_eq!(model.sample(), 7);
    }

    #[test]
    fn test_closure_handler() {
        let mut seen = Vec::new();
        let mut handler = |payload: &str| {
            seen.push(payload.to_string());
            payload.parse::<Message>()
        };
        assert!(handler.deliver("1:PING=").is_ok());
        assert!(handler.deliver("garbage").is_err());
        assert_eq!(seen, vec!["1:PING=".to_string(), "garbage".to_string()]);
    }

    #[test]
    fn test_observers() {
        let event = TraversalEvent::Visit { node: NodeId(1), hop: 0 };

        let mut recorded: Vec<TraversalEvent> = Vec::new();
        recorded.observe(&event);
        assert_eq!(recorded, vec![event.clone()]);

        let mut count = 0;
        let mut counter = |_: &TraversalEvent| count += 1;
        counter.observe(&event);
        counter.observe(&event);
        assert_eq!(count, 2);

        ().observe(&event);
    }
}
