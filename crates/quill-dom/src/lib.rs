//! Quill DOM
//!
//! Minimal DOM tree with native event dispatch: arena-allocated nodes,
//! a per-node listener table, capture/bubble propagation, and the
//! process-wide current-event slot legacy platforms expose.

mod document;
mod event;
mod node;
mod tree;

pub use document::{Document, ListenerId, NativeHandler};
pub use event::Event;
pub use node::{Node, NodeData};
pub use tree::DomTree;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Document root node ID
    pub const DOCUMENT: NodeId = NodeId(0);
}

/// DOM tree mutation errors
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    #[error("unknown node: {0:?}")]
    UnknownNode(NodeId),

    #[error("appending {0:?} would create a cycle")]
    WouldCycle(NodeId),
}
