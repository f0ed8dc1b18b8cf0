//! DOM Node

use crate::NodeId;

/// A node in the DOM tree
#[derive(Debug)]
pub struct Node {
    /// Parent node; `None` for the document root and detached nodes
    pub parent: Option<NodeId>,
    /// Children in document order
    pub children: Vec<NodeId>,
    /// Node-specific data
    pub data: NodeData,
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element with a tag name
    Element { tag_name: String },
    /// Text content
    Text { content: String },
}

impl Node {
    pub(crate) fn document() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data: NodeData::Document,
        }
    }

    pub(crate) fn element(tag_name: &str) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data: NodeData::Element {
                tag_name: tag_name.to_string(),
            },
        }
    }

    pub(crate) fn text(content: &str) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data: NodeData::Text {
                content: content.to_string(),
            },
        }
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element { .. })
    }

    /// Tag name if this is an element
    #[inline]
    pub fn tag_name(&self) -> Option<&str> {
        match &self.data {
            NodeData::Element { tag_name } => Some(tag_name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_tag_name() {
        let node = Node::element("input");
        assert!(node.is_element());
        assert_eq!(node.tag_name(), Some("input"));
    }

    #[test]
    fn test_non_elements_have_no_tag() {
        assert_eq!(Node::document().tag_name(), None);
        assert_eq!(Node::text("hello").tag_name(), None);
    }
}
