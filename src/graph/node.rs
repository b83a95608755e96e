//! Nodes and their named attributes

use super::element::Element;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node
///
/// Serializes as a plain string (UUID or semantic ID like "budget:total")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a new random NodeId
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create a NodeId from a string (semantic ID)
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identity of one attribute (its key/value pair), independent of its owner
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeId(String);

impl AttributeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AttributeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AttributeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AttributeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A named value owned by a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Identity of the key/value pair
    #[serde(default)]
    pub id: AttributeId,
    /// Attribute name, unique within its node
    pub name: String,
    /// Current (evaluated or literal) value
    #[serde(default)]
    pub value: String,
    /// Formula text, for display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    /// Elements the formula reads from
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Element>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: AttributeId::new(),
            name: name.into(),
            value: value.into(),
            formula: None,
            references: Vec::new(),
        }
    }

    /// Use a fixed identity instead of a random one
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = AttributeId::from_string(id);
        self
    }

    /// Attach a formula and the elements it references
    pub fn with_formula(mut self, formula: impl Into<String>, references: Vec<Element>) -> Self {
        self.formula = Some(formula.into());
        self.references = references;
        self
    }
}

/// A node in the document tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier
    #[serde(default)]
    pub id: NodeId,
    /// Node text (or evaluated formula result)
    #[serde(default)]
    pub text: String,
    /// Parent node, `None` for the root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    /// Node-level formula text, for display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    /// Elements the node-level formula reads from
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Element>,
    /// Attributes owned by this node
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
}

impl Node {
    /// Create a new node with the given text
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            text: text.into(),
            parent: None,
            formula: None,
            references: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Create a node with a semantic ID
    pub fn with_id(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: NodeId::from_string(id),
            ..Self::new(text)
        }
    }

    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Attach a node-level formula and the elements it references
    pub fn with_formula(mut self, formula: impl Into<String>, references: Vec<Element>) -> Self {
        self.formula = Some(formula.into());
        self.references = references;
        self
    }

    /// Add an attribute, replacing any existing attribute with the same name
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.retain(|a| a.name != attribute.name);
        self.attributes.push(attribute);
        self
    }

    pub fn attribute(&self, id: &AttributeId) -> Option<&Attribute> {
        self.attributes.iter().find(|a| &a.id == id)
    }

    pub fn attribute_mut(&mut self, id: &AttributeId) -> Option<&mut Attribute> {
        self.attributes.iter_mut().find(|a| &a.id == id)
    }

    pub fn attribute_named(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}
