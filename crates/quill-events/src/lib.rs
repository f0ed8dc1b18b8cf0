//! Quill Events
//!
//! Event subscription engine for a data-binding layer. Observers of the
//! same event type share a single document-level listener resolved by
//! bubbling, instead of attaching one native listener each; a registry
//! maps element properties to the native events that signal their change.

mod callback;
mod manager;
mod registry;
mod strategy;

pub use callback::{CallbackResult, CallbackResultHandler, EventCallback, NoopResultHandler};
pub use manager::EventManager;
pub use registry::{
    ElementHandler, EventsPropertyHandler, PropertyEventRegistry, PropertyHandler,
};
pub use strategy::{DelegationStats, DelegationStrategy, EventStrategy, Subscription};
