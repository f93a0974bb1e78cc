//! Event types for project mutations
//!
//! The graph engine publishes a [`GraphEvent`] after every successful
//! mutation. Delivery is synchronous: subscribers run on the caller's stack
//! before the mutating call returns, in subscription order.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::types::{Edge, EdgeId, Node, NodeId};

/// Events emitted by the graph engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GraphEvent {
    NodeAdded {
        node: Node,
    },

    /// A node was removed together with every edge touching it
    #[serde(rename_all = "camelCase")]
    NodeRemoved {
        node_id: NodeId,
        removed_edges: Vec<EdgeId>,
    },

    NodeUpdated {
        node: Node,
    },

    EdgeAdded {
        edge: Edge,
    },

    #[serde(rename_all = "camelCase")]
    EdgeRemoved {
        edge_id: EdgeId,
    },

    #[serde(rename_all = "camelCase")]
    ProjectLoaded {
        project_id: String,
    },

    #[serde(rename_all = "camelCase")]
    ProjectSaved {
        project_id: String,
    },
}

impl GraphEvent {
    /// The kind tag of this event
    pub fn kind(&self) -> EventKind {
        match self {
            Self::NodeAdded { .. } => EventKind::NodeAdded,
            Self::NodeRemoved { .. } => EventKind::NodeRemoved,
            Self::NodeUpdated { .. } => EventKind::NodeUpdated,
            Self::EdgeAdded { .. } => EventKind::EdgeAdded,
            Self::EdgeRemoved { .. } => EventKind::EdgeRemoved,
            Self::ProjectLoaded { .. } => EventKind::ProjectLoaded,
            Self::ProjectSaved { .. } => EventKind::ProjectSaved,
        }
    }
}

/// Kind tags used to filter subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    NodeAdded,
    NodeRemoved,
    NodeUpdated,
    EdgeAdded,
    EdgeRemoved,
    ProjectLoaded,
    ProjectSaved,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NodeAdded => "node-added",
            Self::NodeRemoved => "node-removed",
            Self::NodeUpdated => "node-updated",
            Self::EdgeAdded => "edge-added",
            Self::EdgeRemoved => "edge-removed",
            Self::ProjectLoaded => "project-loaded",
            Self::ProjectSaved => "project-saved",
        }
    }
}

/// Trait for receiving graph events
///
/// Sinks see every event regardless of kind.
pub trait EventSink: Send + Sync {
    fn send(&self, event: &GraphEvent);
}

/// A no-op event sink that discards all events
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn send(&self, _event: &GraphEvent) {}
}

/// A vector-based event sink that collects events
///
/// Useful for testing to verify events were emitted correctly.
#[derive(Default)]
pub struct VecEventSink {
    events: Mutex<Vec<GraphEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<GraphEvent> {
        self.events.lock().clone()
    }

    /// Kinds of all collected events, in delivery order
    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.lock().iter().map(GraphEvent::kind).collect()
    }

    /// Clear all collected events
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for VecEventSink {
    fn send(&self, event: &GraphEvent) {
        self.events.lock().push(event.clone());
    }
}

/// Handle returned by [`EventBus::on`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn Fn(&GraphEvent) + Send + Sync>;

enum Subscriber {
    Handler { kind: EventKind, handler: Handler },
    Sink(Arc<dyn EventSink>),
}

/// Synchronous in-process publish/subscribe channel
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a handler to one kind of event
    pub fn on(
        &mut self,
        kind: EventKind,
        handler: impl Fn(&GraphEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.push(Subscriber::Handler {
            kind,
            handler: Box::new(handler),
        })
    }

    /// Attach a sink that receives every event
    pub fn attach(&mut self, sink: Arc<dyn EventSink>) -> SubscriptionId {
        self.push(Subscriber::Sink(sink))
    }

    /// Remove a subscription; returns whether it existed
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Deliver an event to every matching subscriber, in subscription order
    pub fn emit(&self, event: &GraphEvent) {
        let kind = event.kind();
        for (_, subscriber) in &self.subscribers {
            match subscriber {
                Subscriber::Handler { kind: wanted, handler } if *wanted == kind => handler(event),
                Subscriber::Handler { .. } => {}
                Subscriber::Sink(sink) => sink.send(event),
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn push(&mut self, subscriber: Subscriber) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscribers.push((id, subscriber));
        id
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn removed(edge_id: &str) -> GraphEvent {
        GraphEvent::EdgeRemoved {
            edge_id: edge_id.to_string(),
        }
    }

    #[test]
    fn test_handler_filters_by_kind() {
        let mut bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        bus.on(EventKind::EdgeRemoved, move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(&removed("e1"));
        bus.emit(&GraphEvent::ProjectSaved {
            project_id: "p".to_string(),
        });

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_off_unsubscribes() {
        let mut bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let id = bus.on(EventKind::EdgeRemoved, move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        assert!(bus.off(id));
        assert!(!bus.off(id));
        bus.emit(&removed("e1"));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_vec_sink_receives_everything() {
        let mut bus = EventBus::new();
        let sink = Arc::new(VecEventSink::new());
        bus.attach(sink.clone());

        bus.emit(&removed("e1"));
        bus.emit(&GraphEvent::ProjectLoaded {
            project_id: "p".to_string(),
        });

        assert_eq!(sink.kinds(), vec![EventKind::EdgeRemoved, EventKind::ProjectLoaded]);
        sink.clear();
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_event_wire_format() {
        let json = serde_json::to_value(removed("e9")).unwrap();
        assert_eq!(json["type"], "edge-removed");
        assert_eq!(json["edgeId"], "e9");
        assert_eq!(EventKind::NodeAdded.as_str(), "node-added");
    }
}
