//! Document: the node tree plus the formula reference relation

use super::element::{Element, NodeAttribute};
use super::node::{Attribute, Node, NodeId};
use crate::query::FormulaReferences;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Create a new random DocumentId (UUID-based)
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create a DocumentId from a string (semantic ID)
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Errors from loading or building documents
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Duplicate node id: {0}")]
    DuplicateNode(String),
}

/// Metadata about a document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// When the document was created
    pub created_at: Option<DateTime<Utc>>,
    /// When the document was last updated
    pub updated_at: Option<DateTime<Utc>>,
}

/// On-disk shape of a document: nodes as a list, no derived index
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DocumentData {
    #[serde(default)]
    id: DocumentId,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    metadata: DocumentMetadata,
}

/// A hierarchical document whose nodes and attributes may carry formulas
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "DocumentData", into = "DocumentData")]
pub struct Document {
    /// Unique identifier
    pub id: DocumentId,
    /// Human-readable name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    nodes: BTreeMap<NodeId, Node>,
    /// Document metadata
    pub metadata: DocumentMetadata,
    dependents: DependentIndex,
}

/// element -> elements whose formula references it
type DependentIndex = HashMap<Element, BTreeSet<Element>>;

impl TryFrom<DocumentData> for Document {
    type Error = DocumentError;

    fn try_from(data: DocumentData) -> Result<Self, Self::Error> {
        let mut nodes = BTreeMap::new();
        let mut dependents = DependentIndex::new();
        for node in data.nodes {
            let id = node.id.clone();
            link_node(&mut dependents, &node);
            if nodes.insert(id.clone(), node).is_some() {
                return Err(DocumentError::DuplicateNode(id.to_string()));
            }
        }
        Ok(Self {
            id: data.id,
            name: data.name,
            description: data.description,
            nodes,
            metadata: data.metadata,
            dependents,
        })
    }
}

impl From<Document> for DocumentData {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            description: doc.description,
            nodes: doc.nodes.into_values().collect(),
            metadata: doc.metadata,
        }
    }
}

impl Document {
    /// Create a new, empty document
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(DocumentId::new(), name)
    }

    /// Create a new document with a specific ID and name
    pub fn with_id(id: DocumentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            nodes: BTreeMap::new(),
            metadata: DocumentMetadata {
                created_at: Some(Utc::now()),
                ..Default::default()
            },
            dependents: DependentIndex::new(),
        }
    }

    /// Build a document from a batch of nodes, indexing them in one pass.
    ///
    /// Fails on a repeated node id, like loading a file does.
    pub fn from_nodes(
        name: impl Into<String>,
        nodes: impl IntoIterator<Item = Node>,
    ) -> Result<Self, DocumentError> {
        let empty = Self::new(name);
        Self::try_from(DocumentData {
            nodes: nodes.into_iter().collect(),
            ..DocumentData::from(empty)
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Parse a document from JSON
    pub fn from_json_str(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a document from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DocumentError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a document, choosing the format by file extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        let text = std::fs::read_to_string(path)?;
        match ext.as_str() {
            "json" => Self::from_json_str(&text),
            "yaml" | "yml" => Self::from_yaml_str(&text),
            _ => Err(DocumentError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn to_json_string(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Add a node, replacing any node with the same id
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id.clone();
        if let Some(old) = self.nodes.remove(&id) {
            unlink_node(&mut self.dependents, &old);
        }
        link_node(&mut self.dependents, &node);
        self.nodes.insert(id.clone(), node);
        self.touch();
        id
    }

    /// Remove a node and, with it, its attributes.
    ///
    /// References to it elsewhere are left in place; lookups skip them.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        let removed = self.nodes.remove(id)?;
        unlink_node(&mut self.dependents, &removed);
        self.touch();
        Some(removed)
    }

    /// Replace the formula references of a node or attribute.
    ///
    /// Returns `false` if the element does not exist.
    pub fn set_references(&mut self, element: &Element, references: Vec<Element>) -> bool {
        let Some(node) = self.nodes.get_mut(element.owner()) else {
            return false;
        };
        if let Element::Attribute(na) = element {
            if node.attribute(&na.attribute).is_none() {
                return false;
            }
        }
        unlink_node(&mut self.dependents, node);
        match element {
            Element::Node(_) => node.references = references,
            Element::Attribute(na) => {
                if let Some(attr) = node.attribute_mut(&na.attribute) {
                    attr.references = references;
                }
            }
        }
        link_node(&mut self.dependents, node);
        self.touch();
        true
    }

    pub fn get_node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn attribute(&self, na: &NodeAttribute) -> Option<&Attribute> {
        self.nodes.get(&na.node).and_then(|n| n.attribute(&na.attribute))
    }

    /// Resolve an attribute by owner and name
    pub fn find_attribute(&self, node: &NodeId, name: &str) -> Option<NodeAttribute> {
        let attr = self.nodes.get(node)?.attribute_named(name)?;
        Some(NodeAttribute::new(node.clone(), attr.id.clone()))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Human-readable label: node text, or `text.name` for attributes
    pub fn element_label(&self, element: &Element) -> String {
        match element {
            Element::Node(id) => match self.nodes.get(id) {
                Some(n) => n.text.clone(),
                None => id.to_string(),
            },
            Element::Attribute(na) => {
                let owner = self
                    .nodes
                    .get(&na.node)
                    .map(|n| n.text.clone())
                    .unwrap_or_else(|| na.node.to_string());
                match self.attribute(na) {
                    Some(a) => format!("{}.{}", owner, a.name),
                    None => format!("{}.{}", owner, na.attribute),
                }
            }
        }
    }

    fn references(&self, element: &Element) -> Option<&[Element]> {
        match element {
            Element::Node(id) => self.nodes.get(id).map(|n| n.references.as_slice()),
            Element::Attribute(na) => self.attribute(na).map(|a| a.references.as_slice()),
        }
    }

    fn touch(&mut self) {
        self.metadata.updated_at = Some(Utc::now());
    }
}

/// Every (dependent, referenced) pair a node contributes, attributes included
fn node_links(node: &Node) -> impl Iterator<Item = (Element, &Element)> + '_ {
    let own = node
        .references
        .iter()
        .map(move |r| (Element::Node(node.id.clone()), r));
    let attrs = node.attributes.iter().flat_map(move |attr| {
        let dependent = Element::Attribute(NodeAttribute::new(node.id.clone(), attr.id.clone()));
        attr.references.iter().map(move |r| (dependent.clone(), r))
    });
    own.chain(attrs)
}

fn link_node(index: &mut DependentIndex, node: &Node) {
    for (dependent, referenced) in node_links(node) {
        index.entry(referenced.clone()).or_default().insert(dependent);
    }
}

fn unlink_node(index: &mut DependentIndex, node: &Node) {
    for (dependent, referenced) in node_links(node) {
        if let Some(set) = index.get_mut(referenced) {
            set.remove(&dependent);
            if set.is_empty() {
                index.remove(referenced);
            }
        }
    }
}

impl FormulaReferences for Document {
    fn precedents_of(&self, element: &Element) -> Vec<Element> {
        let Some(refs) = self.references(element) else {
            return Vec::new();
        };
        let found: BTreeSet<&Element> = refs.iter().filter(|r| self.contains(r)).collect();
        found.into_iter().cloned().collect()
    }

    fn dependents_of(&self, element: &Element) -> Vec<Element> {
        if !self.contains(element) {
            return Vec::new();
        }
        self.dependents
            .get(element)
            .map(|set| set.iter().filter(|e| self.contains(e)).cloned().collect())
            .unwrap_or_default()
    }

    fn contains(&self, element: &Element) -> bool {
        match element {
            Element::Node(id) => self.nodes.contains_key(id),
            Element::Attribute(na) => self.attribute(na).is_some(),
        }
    }
}
