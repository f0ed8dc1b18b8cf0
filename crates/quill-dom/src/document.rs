//! Document
//!
//! Owns the DOM tree, the native listener table, and event dispatch.
//! The document is a page-lifetime singleton: listeners are attached for
//! the life of the process and listener closures may themselves hold an
//! `Rc<Document>`; there is no teardown.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::{DomError, DomTree, Event, NodeId};

/// Handler invoked by native event dispatch
pub type NativeHandler = Rc<dyn Fn(&Event)>;

/// Identifier for a registered native listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct ListenerEntry {
    id: ListenerId,
    handler: NativeHandler,
    capture: bool,
}

/// A document: DOM tree plus the native event plumbing
pub struct Document {
    tree: RefCell<DomTree>,
    listeners: RefCell<HashMap<(NodeId, String), Vec<ListenerEntry>>>,
    next_listener_id: Cell<u64>,
    current_event_target: Cell<Option<NodeId>>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            tree: RefCell::new(DomTree::new()),
            listeners: RefCell::new(HashMap::new()),
            next_listener_id: Cell::new(0),
            current_event_target: Cell::new(None),
        }
    }

    /// Document root node ID
    pub fn root(&self) -> NodeId {
        self.tree.borrow().root()
    }

    /// Create a detached element node
    pub fn create_element(&self, tag_name: &str) -> NodeId {
        self.tree.borrow_mut().create_element(tag_name)
    }

    /// Create a detached text node
    pub fn create_text(&self, content: &str) -> NodeId {
        self.tree.borrow_mut().create_text(content)
    }

    /// Append `child` under `parent`
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.tree.borrow_mut().append_child(parent, child)
    }

    /// Parent of a node
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree.borrow().parent(node)
    }

    /// Tag name if the node is an element
    pub fn tag_name(&self, node: NodeId) -> Option<String> {
        self.tree
            .borrow()
            .get(node)
            .and_then(|n| n.tag_name().map(str::to_string))
    }

    /// Number of nodes in the tree
    pub fn node_count(&self) -> usize {
        self.tree.borrow().len()
    }

    /// Register a native listener; returns its removal handle
    pub fn add_event_listener(
        &self,
        target: NodeId,
        event_type: &str,
        handler: NativeHandler,
        capture: bool,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener_id.get());
        self.next_listener_id.set(id.0 + 1);
        tracing::trace!("listener {:?} attached to {:?} for '{}'", id, target, event_type);
        self.listeners
            .borrow_mut()
            .entry((target, event_type.to_string()))
            .or_default()
            .push(ListenerEntry {
                id,
                handler,
                capture,
            });
        id
    }

    /// Remove a native listener; removing an unknown one is a no-op
    pub fn remove_event_listener(&self, target: NodeId, event_type: &str, id: ListenerId) {
        if let Some(entries) = self
            .listeners
            .borrow_mut()
            .get_mut(&(target, event_type.to_string()))
        {
            entries.retain(|entry| entry.id != id);
        }
    }

    /// Number of listeners registered on `target` for `event_type`
    pub fn listener_count(&self, target: NodeId, event_type: &str) -> usize {
        self.listeners
            .borrow()
            .get(&(target, event_type.to_string()))
            .map_or(0, Vec::len)
    }

    /// Current-event slot, set for the duration of a dispatch
    pub fn current_event_target(&self) -> Option<NodeId> {
        self.current_event_target.get()
    }

    /// Dispatch an event along the propagation path from its target.
    ///
    /// Capture-phase listeners run root-to-target, then bubble-phase
    /// listeners run target-to-root. A disconnected target's path never
    /// reaches the document root. An event without a target is delivered
    /// to root listeners only.
    pub fn dispatch(&self, event: Event) {
        let path = match event.target {
            Some(origin) => self.propagation_path(origin),
            None => vec![self.root()],
        };
        self.current_event_target.set(event.target);
        self.run_phases(&path, &event);
        self.current_event_target.set(None);
    }

    /// Dispatch where the origin is visible only through the
    /// current-event slot, as on legacy platforms
    pub fn dispatch_legacy(&self, origin: NodeId, event_type: &str) {
        let path = self.propagation_path(origin);
        self.current_event_target.set(Some(origin));
        self.run_phases(&path, &Event::legacy(event_type));
        self.current_event_target.set(None);
    }

    fn run_phases(&self, path: &[NodeId], event: &Event) {
        for &node in path.iter().rev() {
            self.invoke(node, event, true);
        }
        for &node in path {
            self.invoke(node, event, false);
        }
    }

    /// Path from the origin up through its ancestors, origin first
    fn propagation_path(&self, origin: NodeId) -> Vec<NodeId> {
        let tree = self.tree.borrow();
        let mut path = Vec::new();
        let mut cursor = tree.get(origin).map(|_| origin);
        while let Some(node) = cursor {
            path.push(node);
            cursor = tree.parent(node);
        }
        path
    }

    fn invoke(&self, node: NodeId, event: &Event, capture: bool) {
        // Snapshot before invoking so handlers may add or remove
        // listeners without holding the table borrow.
        let handlers: Vec<NativeHandler> = {
            let listeners = self.listeners.borrow();
            match listeners.get(&(node, event.event_type.clone())) {
                Some(entries) => entries
                    .iter()
                    .filter(|entry| entry.capture == capture)
                    .map(|entry| Rc::clone(&entry.handler))
                    .collect(),
                None => return,
            }
        };
        for handler in handlers {
            handler(event);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counting_handler(count: &Rc<Cell<u32>>) -> NativeHandler {
        let count = Rc::clone(count);
        Rc::new(move |_event: &Event| count.set(count.get() + 1))
    }

    #[test]
    fn test_dispatch_bubbles_to_root() {
        let document = Document::new();
        let div = document.create_element("div");
        document.append_child(document.root(), div).unwrap();

        let count = Rc::new(Cell::new(0));
        document.add_event_listener(document.root(), "click", counting_handler(&count), false);

        document.dispatch(Event::new("click", div));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_disconnected_target_does_not_reach_root() {
        let document = Document::new();
        let loose = document.create_element("div");

        let count = Rc::new(Cell::new(0));
        document.add_event_listener(document.root(), "click", counting_handler(&count), false);

        document.dispatch(Event::new("click", loose));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_remove_listener_and_unknown_removal() {
        let document = Document::new();
        let div = document.create_element("div");

        let count = Rc::new(Cell::new(0));
        let id = document.add_event_listener(div, "input", counting_handler(&count), false);
        assert_eq!(document.listener_count(div, "input"), 1);

        document.remove_event_listener(div, "input", id);
        assert_eq!(document.listener_count(div, "input"), 0);

        // Second removal is a no-op.
        document.remove_event_listener(div, "input", id);

        document.dispatch(Event::new("input", div));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_current_event_slot_set_during_dispatch_only() {
        let document = Rc::new(Document::new());
        let div = document.create_element("div");
        document.append_child(document.root(), div).unwrap();

        let seen = Rc::new(Cell::new(None));
        {
            let seen = Rc::clone(&seen);
            let probe = Rc::clone(&document);
            let handler: NativeHandler = Rc::new(move |event: &Event| {
                assert_eq!(event.target, None, "legacy event carries no target");
                seen.set(probe.current_event_target());
            });
            document.add_event_listener(document.root(), "change", handler, false);
        }

        document.dispatch_legacy(div, "change");
        assert_eq!(seen.get(), Some(div));
        assert_eq!(document.current_event_target(), None);
    }

    #[test]
    fn test_capture_listeners_run_once() {
        let document = Document::new();
        let div = document.create_element("div");
        document.append_child(document.root(), div).unwrap();

        let count = Rc::new(Cell::new(0));
        document.add_event_listener(document.root(), "click", counting_handler(&count), true);

        document.dispatch(Event::new("click", div));
        assert_eq!(count.get(), 1);
    }
}
