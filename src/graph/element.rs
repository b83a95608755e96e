//! Addressable elements: the unit of formula reference and of highlighting

use super::node::{AttributeId, NodeId};
use serde::{Deserialize, Serialize};

/// An attribute together with the node that owns it
///
/// A back-reference by id; the document owns both.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeAttribute {
    pub node: NodeId,
    pub attribute: AttributeId,
}

impl NodeAttribute {
    pub fn new(node: NodeId, attribute: AttributeId) -> Self {
        Self { node, attribute }
    }
}

/// A node or one of its attributes
///
/// Serializes as the bare node id for nodes and as
/// `{"node": ..., "attribute": ...}` for attributes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Element {
    Node(NodeId),
    Attribute(NodeAttribute),
}

impl Element {
    pub fn node(id: impl Into<String>) -> Self {
        Self::Node(NodeId::from_string(id))
    }

    pub fn attribute(node: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::Attribute(NodeAttribute::new(
            NodeId::from_string(node),
            AttributeId::from_string(attribute),
        ))
    }

    /// The node itself, or the node owning the attribute
    pub fn owner(&self) -> &NodeId {
        match self {
            Self::Node(id) => id,
            Self::Attribute(na) => &na.node,
        }
    }

    /// What a highlight sink records for this element.
    ///
    /// Attributes resolve to their key/value pair, never to the owning node.
    /// The pair keeps its node back-reference so equal attribute ids on
    /// different nodes stay distinct.
    pub fn highlight(&self) -> Highlight {
        match self {
            Self::Node(id) => Highlight::Node(id.clone()),
            Self::Attribute(na) => Highlight::Attribute(na.clone()),
        }
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self, Self::Attribute(_))
    }
}

impl From<NodeId> for Element {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl From<NodeAttribute> for Element {
    fn from(na: NodeAttribute) -> Self {
        Self::Attribute(na)
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Node(id) => write!(f, "{}", id),
            Self::Attribute(na) => write!(f, "{}@{}", na.node, na.attribute),
        }
    }
}

/// A highlighted entity as seen by the rendering side
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Highlight {
    Node(NodeId),
    Attribute(NodeAttribute),
}

/// What the user currently has selected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Node(NodeId),
    Attribute(NodeAttribute),
}

impl Selection {
    /// The element a fresh trace starts from
    pub fn seed(&self) -> Element {
        match self {
            Self::Node(id) => Element::Node(id.clone()),
            Self::Attribute(na) => Element::Attribute(na.clone()),
        }
    }
}
