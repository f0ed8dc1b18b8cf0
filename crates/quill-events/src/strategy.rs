//! Subscription strategies
//!
//! The delegation strategy services every subscriber of an event type
//! through one shared document-level listener, resolved per dispatch by
//! walking the target's ancestor chain. Direct subscriptions attach their
//! own listener on the element instead.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use quill_dom::{Document, Event, NativeHandler, NodeId};

use crate::callback::{CallbackResultHandler, EventCallback, NoopResultHandler};

/// Capability returned by every subscribe operation.
///
/// Calling `unsubscribe` more than once is safe.
pub struct Subscription(Box<dyn Fn()>);

impl Subscription {
    /// Build a subscription from its unsubscribe action
    pub fn new(unsubscribe: impl Fn() + 'static) -> Self {
        Self(Box::new(unsubscribe))
    }

    /// Render the subscription inert
    pub fn unsubscribe(&self) {
        (self.0)()
    }
}

/// Pluggable subscribe contract, selectable per event name
pub trait EventStrategy {
    /// Subscribe `callback` to `event_name` on `target`.
    ///
    /// With `delegate` set, the listener is attached straight on the
    /// element; otherwise the subscription is serviced by the shared
    /// document-level listener for that event type.
    fn subscribe(
        &self,
        target: NodeId,
        event_name: &str,
        callback: EventCallback,
        delegate: bool,
    ) -> Subscription;
}

/// Per-element callback table, keyed by event type.
///
/// Entries are cleared to `None` on unsubscribe rather than removed, so a
/// table may outlive its last active entry.
type CallbackTable = HashMap<String, Option<EventCallback>>;

#[derive(Default)]
struct DelegateState {
    /// Event names with a shared listener already attached at the root
    delegated_events: HashSet<String>,
    /// Side table of per-element callbacks, identity-keyed by node
    element_callbacks: HashMap<NodeId, CallbackTable>,
}

/// Default strategy: one shared native listener per delegated event type.
///
/// Shared root listeners are attached for the lifetime of the strategy and
/// never detached; their closures keep the document alive.
pub struct DelegationStrategy {
    document: Rc<Document>,
    state: Rc<RefCell<DelegateState>>,
    result_handler: Rc<dyn CallbackResultHandler>,
}

impl DelegationStrategy {
    pub fn new(document: Rc<Document>) -> Self {
        Self::with_result_handler(document, Rc::new(NoopResultHandler))
    }

    /// Inject the handler that consumes callback return values
    pub fn with_result_handler(
        document: Rc<Document>,
        result_handler: Rc<dyn CallbackResultHandler>,
    ) -> Self {
        Self {
            document,
            state: Rc::new(RefCell::new(DelegateState::default())),
            result_handler,
        }
    }

    /// Attach the shared root listener for `event_name` once; later calls
    /// are no-ops
    pub fn ensure_delegated_event(&self, event_name: &str) {
        if self.state.borrow().delegated_events.contains(event_name) {
            return;
        }
        self.state
            .borrow_mut()
            .delegated_events
            .insert(event_name.to_string());
        tracing::debug!("attaching shared root listener for '{}'", event_name);

        let document = Rc::clone(&self.document);
        let state = Rc::clone(&self.state);
        let result_handler = Rc::clone(&self.result_handler);
        let listener: NativeHandler = Rc::new(move |event: &Event| {
            handle_delegated_event(&document, &state, result_handler.as_ref(), event);
        });
        self.document
            .add_event_listener(self.document.root(), event_name, listener, false);
    }

    /// Subscribe through the shared root listener for `event_name`.
    ///
    /// A second subscribe on the same (target, event) pair replaces the
    /// first. The returned subscription clears the slot without removing
    /// the key; a stale unsubscribe therefore also clears a slot that a
    /// replacing subscriber has since taken over.
    pub fn subscribe_to_delegated_event(
        &self,
        target: NodeId,
        event_name: &str,
        callback: EventCallback,
    ) -> Subscription {
        self.ensure_delegated_event(event_name);
        self.state
            .borrow_mut()
            .element_callbacks
            .entry(target)
            .or_default()
            .insert(event_name.to_string(), Some(callback));

        let state = Rc::clone(&self.state);
        let event_name = event_name.to_string();
        Subscription::new(move || {
            if let Some(table) = state.borrow_mut().element_callbacks.get_mut(&target) {
                table.insert(event_name.clone(), None);
            }
        })
    }

    /// Attach a dedicated native listener on `target`
    pub fn subscribe_to_direct_event(
        &self,
        target: NodeId,
        event_name: &str,
        callback: EventCallback,
    ) -> Subscription {
        let result_handler = Rc::clone(&self.result_handler);
        let wrapped: NativeHandler = Rc::new(move |event: &Event| {
            result_handler.handle_callback_result(callback(event));
        });
        let id = self
            .document
            .add_event_listener(target, event_name, wrapped, false);

        let document = Rc::clone(&self.document);
        let event_name = event_name.to_string();
        Subscription::new(move || {
            document.remove_event_listener(target, &event_name, id);
        })
    }

    /// Delegation bookkeeping counters
    pub fn stats(&self) -> DelegationStats {
        let state = self.state.borrow();
        DelegationStats {
            delegated_events: state.delegated_events.len(),
            element_tables: state.element_callbacks.len(),
            active_callbacks: state
                .element_callbacks
                .values()
                .flat_map(HashMap::values)
                .filter(|slot| slot.is_some())
                .count(),
        }
    }
}

impl EventStrategy for DelegationStrategy {
    fn subscribe(
        &self,
        target: NodeId,
        event_name: &str,
        callback: EventCallback,
        delegate: bool,
    ) -> Subscription {
        if delegate {
            self.subscribe_to_direct_event(target, event_name, callback)
        } else {
            self.subscribe_to_delegated_event(target, event_name, callback)
        }
    }
}

/// Delegation bookkeeping counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelegationStats {
    pub delegated_events: usize,
    pub element_tables: usize,
    pub active_callbacks: usize,
}

/// Body of the shared root listener: bubbling resolution.
///
/// Walks from the originating element up through its ancestors until the
/// first node with an active callback for the event's type, invokes that
/// one callback, and routes its return through the result seam. Finding
/// nothing is a normal outcome.
fn handle_delegated_event(
    document: &Document,
    state: &RefCell<DelegateState>,
    result_handler: &dyn CallbackResultHandler,
    event: &Event,
) {
    let origin = event.target.or_else(|| document.current_event_target());

    let mut callback = None;
    let mut cursor = origin;
    while let Some(node) = cursor {
        callback = state
            .borrow()
            .element_callbacks
            .get(&node)
            .and_then(|table| table.get(&event.event_type))
            .and_then(Clone::clone);
        if callback.is_some() {
            break;
        }
        cursor = document.parent(node);
    }

    if let Some(callback) = callback {
        tracing::trace!("delegated '{}' resolved at {:?}", event.event_type, cursor);
        result_handler.handle_callback_result(callback(event));
    }
}
