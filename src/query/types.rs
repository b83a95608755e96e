//! Query types and result structures

use crate::graph::{Element, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Direction for dependency tracing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Follow formula references backwards: what does this element read?
    Precedents,
    /// Follow formula references forwards: who reads this element?
    Dependents,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Self::Precedents => Self::Dependents,
            Self::Dependents => Self::Precedents,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Precedents => "precedents",
            Self::Dependents => "dependents",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "precedents" | "p" => Ok(Self::Precedents),
            "dependents" | "d" => Ok(Self::Dependents),
            other => Err(format!("unknown direction: {}", other)),
        }
    }
}

/// Result of a single lookup
///
/// `nodes` is always exactly the set of owners of `elements`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelatedElements {
    elements: BTreeSet<Element>,
    nodes: BTreeSet<NodeId>,
}

impl RelatedElements {
    pub fn new(elements: impl IntoIterator<Item = Element>) -> Self {
        let elements: BTreeSet<Element> = elements.into_iter().collect();
        let nodes = elements.iter().map(|e| e.owner().clone()).collect();
        Self { elements, nodes }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &BTreeSet<Element> {
        &self.elements
    }

    /// Distinct owning nodes of the discovered elements
    pub fn nodes(&self) -> &BTreeSet<NodeId> {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }
}

/// A directed node pair, always precedent -> dependent
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DirectedPair {
    pub from: NodeId,
    pub to: NodeId,
}

impl DirectedPair {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to }
    }
}

impl std::fmt::Display for DirectedPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}
