//! DOM Events

use crate::NodeId;

/// A native DOM event as seen by listeners
#[derive(Debug, Clone)]
pub struct Event {
    /// Event type, e.g. "change" or "input"
    pub event_type: String,
    /// Originating element; `None` on legacy dispatches where only the
    /// document's current-event slot carries the origin
    pub target: Option<NodeId>,
}

impl Event {
    /// Create an event with an explicit target
    pub fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target: Some(target),
        }
    }

    /// Create a legacy event carrying no target of its own
    pub fn legacy(event_type: &str) -> Self {
        Self {
            event_type: event_type.to_string(),
            target: None,
        }
    }
}
