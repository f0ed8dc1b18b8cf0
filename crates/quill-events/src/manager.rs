//! Event Manager
//!
//! Public entry point for the binding layer: routes each subscribe through
//! the strategy registered for its event name, falling back to the
//! delegation strategy, and exposes property-handler lookup.

use std::collections::HashMap;
use std::rc::Rc;

use quill_dom::{Document, NodeId};

use crate::callback::{CallbackResultHandler, EventCallback, NoopResultHandler};
use crate::registry::{ElementHandler, PropertyEventRegistry, PropertyHandler};
use crate::strategy::{DelegationStrategy, EventStrategy, Subscription};

/// Event subscription entry point
pub struct EventManager {
    registry: PropertyEventRegistry,
    strategies: HashMap<String, Rc<dyn EventStrategy>>,
    default_strategy: Rc<DelegationStrategy>,
}

impl EventManager {
    pub fn new(document: Rc<Document>) -> Self {
        Self::with_result_handler(document, Rc::new(NoopResultHandler))
    }

    /// Inject the handler that consumes callback return values
    pub fn with_result_handler(
        document: Rc<Document>,
        result_handler: Rc<dyn CallbackResultHandler>,
    ) -> Self {
        Self {
            registry: PropertyEventRegistry::new(Rc::clone(&document)),
            strategies: HashMap::new(),
            default_strategy: Rc::new(DelegationStrategy::with_result_handler(
                document,
                result_handler,
            )),
        }
    }

    /// Replace the entire property set for `tag_name`
    pub fn register_element_config(&mut self, tag_name: &str, properties: &[(&str, &[&str])]) {
        self.registry.register_element_config(tag_name, properties);
    }

    /// Install a handler for a single property on `tag_name`
    pub fn register_element_property_config(
        &mut self,
        tag_name: &str,
        property_name: &str,
        event_names: &[&str],
    ) {
        self.registry
            .register_element_property_config(tag_name, property_name, event_names);
    }

    /// Replace the entire per-tag handler
    pub fn register_element_handler(&mut self, tag_name: &str, handler: Rc<dyn ElementHandler>) {
        self.registry.register_element_handler(tag_name, handler);
    }

    /// Install a custom strategy for `event_name`, replacing any prior one
    pub fn register_event_strategy(&mut self, event_name: &str, strategy: Rc<dyn EventStrategy>) {
        self.strategies.insert(event_name.to_string(), strategy);
    }

    /// Handler for observing `property_name` on `target`, if any
    pub fn get_element_handler(
        &self,
        target: NodeId,
        property_name: &str,
    ) -> Option<Rc<dyn PropertyHandler>> {
        self.registry.get_element_handler(target, property_name)
    }

    /// Subscribe via the strategy registered for `event_name`, falling
    /// back to the delegation strategy; the subscription is returned
    /// unchanged
    pub fn add_event_listener(
        &self,
        target: NodeId,
        event_name: &str,
        callback: EventCallback,
        delegate: bool,
    ) -> Subscription {
        match self.strategies.get(event_name) {
            Some(strategy) => strategy.subscribe(target, event_name, callback, delegate),
            None => self
                .default_strategy
                .subscribe(target, event_name, callback, delegate),
        }
    }

    /// Default delegation strategy, for diagnostics
    pub fn delegation_strategy(&self) -> &DelegationStrategy {
        &self.default_strategy
    }
}
