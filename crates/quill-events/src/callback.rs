//! Subscription callbacks
//!
//! The callback type and the result seam shared by all dispatch paths.

use std::rc::Rc;

use quill_dom::Event;

/// Value returned by every subscription callback.
///
/// Nothing consumes this yet; the seam is reserved for a future
/// cancellation contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallbackResult {
    /// Keep going, nothing to report
    #[default]
    Continue,
    /// The callback consumed the event
    Handled,
}

/// Callback invoked when a subscribed event fires
pub type EventCallback = Rc<dyn Fn(&Event) -> CallbackResult>;

/// Seam through which every callback's return value passes.
///
/// Both delegated and direct dispatch route their results here; keep it a
/// single injectable handler rather than inlining at the call sites.
pub trait CallbackResultHandler {
    fn handle_callback_result(&self, result: CallbackResult);
}

/// Default result handler; discards the result
#[derive(Debug, Default)]
pub struct NoopResultHandler;

impl CallbackResultHandler for NoopResultHandler {
    fn handle_callback_result(&self, _result: CallbackResult) {}
}
