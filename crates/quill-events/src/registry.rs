//! Property-Event Registry
//!
//! Maps (tag name, property name) to the native events that signal a
//! change to that property. Property names are the binding layer's
//! vocabulary; this registry is the only place the event-name knowledge
//! lives.

use std::collections::HashMap;
use std::rc::Rc;

use quill_dom::{Document, Event, NativeHandler, NodeId};

use crate::callback::EventCallback;
use crate::strategy::Subscription;

/// Fallback family for content-editable-like properties
const CONTENT_EDITABLE: &str = "content editable";

/// Handler for one (tag, property) pair
pub trait PropertyHandler {
    /// Attach `callback` to every native event that signals a change to
    /// the property; the returned subscription removes all of them.
    fn subscribe(&self, target: NodeId, callback: EventCallback) -> Subscription;
}

/// Per-tag handler, looked up by property name
pub trait ElementHandler {
    fn property_handler(&self, property_name: &str) -> Option<Rc<dyn PropertyHandler>>;
}

/// Built-in property handler: one native listener per configured event
/// name, attached in order
pub struct EventsPropertyHandler {
    document: Rc<Document>,
    event_names: Vec<String>,
}

impl EventsPropertyHandler {
    pub fn new(document: Rc<Document>, event_names: &[&str]) -> Self {
        Self {
            document,
            event_names: event_names.iter().map(|name| name.to_string()).collect(),
        }
    }

    /// Native event names, in subscription order
    pub fn event_names(&self) -> &[String] {
        &self.event_names
    }
}

impl PropertyHandler for EventsPropertyHandler {
    fn subscribe(&self, target: NodeId, callback: EventCallback) -> Subscription {
        let mut listeners = Vec::with_capacity(self.event_names.len());
        for event_name in &self.event_names {
            let callback = Rc::clone(&callback);
            let native: NativeHandler = Rc::new(move |event: &Event| {
                let _ = callback(event);
            });
            let id = self
                .document
                .add_event_listener(target, event_name, native, false);
            listeners.push((event_name.clone(), id));
        }

        let document = Rc::clone(&self.document);
        Subscription::new(move || {
            for (event_name, id) in &listeners {
                document.remove_event_listener(target, event_name, *id);
            }
        })
    }
}

/// Per-tag entry: the built-in config map or a caller-supplied handler
enum TagHandler {
    Config(HashMap<String, Rc<dyn PropertyHandler>>),
    Custom(Rc<dyn ElementHandler>),
}

/// Registry of per-tag property handlers, with the four built-in families
pub struct PropertyEventRegistry {
    document: Rc<Document>,
    tags: HashMap<String, TagHandler>,
}

impl PropertyEventRegistry {
    pub fn new(document: Rc<Document>) -> Self {
        let mut registry = Self {
            document,
            tags: HashMap::new(),
        };

        registry.register_element_config(
            "input",
            &[
                ("value", &["change", "input"]),
                ("checked", &["change", "input"]),
            ],
        );
        registry.register_element_config("textarea", &[("value", &["change", "input"])]);
        registry.register_element_config("select", &[("value", &["change"])]);
        registry.register_element_config(
            CONTENT_EDITABLE,
            &[("value", &["change", "input", "blur", "keyup", "paste"])],
        );

        registry
    }

    /// Replace the entire property set for `tag_name`
    pub fn register_element_config(&mut self, tag_name: &str, properties: &[(&str, &[&str])]) {
        let tag_name = tag_name.to_lowercase();
        self.tags
            .insert(tag_name.clone(), TagHandler::Config(HashMap::new()));
        for (property_name, event_names) in properties {
            self.register_element_property_config(&tag_name, property_name, event_names);
        }
    }

    /// Install a handler for a single property on `tag_name`
    pub fn register_element_property_config(
        &mut self,
        tag_name: &str,
        property_name: &str,
        event_names: &[&str],
    ) {
        tracing::debug!(
            "registering {}.{} -> {:?}",
            tag_name,
            property_name,
            event_names
        );
        let handler: Rc<dyn PropertyHandler> = Rc::new(EventsPropertyHandler::new(
            Rc::clone(&self.document),
            event_names,
        ));

        let entry = self
            .tags
            .entry(tag_name.to_lowercase())
            .or_insert_with(|| TagHandler::Config(HashMap::new()));
        if !matches!(entry, TagHandler::Config(_)) {
            *entry = TagHandler::Config(HashMap::new());
        }
        if let TagHandler::Config(properties) = entry {
            properties.insert(property_name.to_string(), handler);
        }
    }

    /// Replace the entire per-tag handler
    pub fn register_element_handler(&mut self, tag_name: &str, handler: Rc<dyn ElementHandler>) {
        self.tags
            .insert(tag_name.to_lowercase(), TagHandler::Custom(handler));
    }

    /// Resolve the handler for observing `property_name` on `target`.
    ///
    /// Elements without a matching tag entry fall back to the content
    /// editable family for `textContent` and `innerHTML`. Non-element
    /// nodes and unknown pairs resolve to `None`; absence is a normal
    /// outcome.
    pub fn get_element_handler(
        &self,
        target: NodeId,
        property_name: &str,
    ) -> Option<Rc<dyn PropertyHandler>> {
        let tag_name = self.document.tag_name(target)?.to_lowercase();
        if let Some(handler) = self.lookup(&tag_name, property_name) {
            return Some(handler);
        }
        if property_name == "textContent" || property_name == "innerHTML" {
            return self.lookup(CONTENT_EDITABLE, "value");
        }
        None
    }

    fn lookup(&self, tag_name: &str, property_name: &str) -> Option<Rc<dyn PropertyHandler>> {
        match self.tags.get(tag_name)? {
            TagHandler::Config(properties) => properties.get(property_name).cloned(),
            TagHandler::Custom(handler) => handler.property_handler(property_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::callback::CallbackResult;

    fn counting_callback(count: &Rc<Cell<u32>>) -> EventCallback {
        let count = Rc::clone(count);
        Rc::new(move |_event: &Event| {
            count.set(count.get() + 1);
            CallbackResult::Continue
        })
    }

    #[test]
    fn test_builtin_event_sets() {
        let document = Rc::new(Document::new());
        let handler = EventsPropertyHandler::new(Rc::clone(&document), &["change", "input"]);
        assert_eq!(handler.event_names().to_vec(), ["change", "input"]);
    }

    #[test]
    fn test_property_handler_attaches_and_removes_all_events() {
        let document = Rc::new(Document::new());
        let handler = EventsPropertyHandler::new(Rc::clone(&document), &["change", "input"]);
        let input = document.create_element("input");

        let count = Rc::new(Cell::new(0));
        let subscription = handler.subscribe(input, counting_callback(&count));
        assert_eq!(document.listener_count(input, "change"), 1);
        assert_eq!(document.listener_count(input, "input"), 1);

        document.dispatch(Event::new("change", input));
        document.dispatch(Event::new("input", input));
        assert_eq!(count.get(), 2);

        subscription.unsubscribe();
        assert_eq!(document.listener_count(input, "change"), 0);
        assert_eq!(document.listener_count(input, "input"), 0);

        document.dispatch(Event::new("change", input));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_tag_names_are_lowercased() {
        let document = Rc::new(Document::new());
        let registry = PropertyEventRegistry::new(Rc::clone(&document));
        let input = document.create_element("INPUT");

        assert!(registry.get_element_handler(input, "value").is_some());
    }

    #[test]
    fn test_unknown_pairs_resolve_to_none() {
        let document = Rc::new(Document::new());
        let registry = PropertyEventRegistry::new(Rc::clone(&document));
        let div = document.create_element("div");
        let text = document.create_text("hello");

        assert!(registry.get_element_handler(div, "value").is_none());
        assert!(registry.get_element_handler(text, "value").is_none());
        assert!(registry.get_element_handler(text, "textContent").is_none());
    }

    #[test]
    fn test_content_editable_fallback() {
        let document = Rc::new(Document::new());
        let registry = PropertyEventRegistry::new(Rc::clone(&document));
        let div = document.create_element("div");

        let count = Rc::new(Cell::new(0));
        let handler = registry.get_element_handler(div, "textContent").unwrap();
        handler.subscribe(div, counting_callback(&count));

        for event_name in ["change", "input", "blur", "keyup", "paste"] {
            assert_eq!(document.listener_count(div, event_name), 1);
        }
        assert!(registry.get_element_handler(div, "innerHTML").is_some());
    }

    #[test]
    fn test_whole_tag_config_replace() {
        let document = Rc::new(Document::new());
        let mut registry = PropertyEventRegistry::new(Rc::clone(&document));
        let input = document.create_element("input");

        registry.register_element_config("input", &[("value", &["input"])]);
        assert!(registry.get_element_handler(input, "value").is_some());
        assert!(registry.get_element_handler(input, "checked").is_none());
    }

    #[test]
    fn test_single_property_config_on_fresh_tag() {
        let document = Rc::new(Document::new());
        let mut registry = PropertyEventRegistry::new(Rc::clone(&document));
        let meter = document.create_element("meter");

        registry.register_element_property_config("meter", "value", &["change"]);
        assert!(registry.get_element_handler(meter, "value").is_some());
    }
}
