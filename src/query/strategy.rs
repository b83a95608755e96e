//! Direction-aware lookup and connector orientation

use super::references::FormulaReferences;
use super::types::{DirectedPair, Direction, RelatedElements};
use crate::graph::{Element, NodeAttribute, NodeId};

impl Direction {
    /// Elements related to `element` in this direction
    pub fn lookup<R: FormulaReferences + ?Sized>(self, refs: &R, element: &Element) -> RelatedElements {
        let found = match self {
            Direction::Precedents => refs.precedents_of(element),
            Direction::Dependents => refs.dependents_of(element),
        };
        RelatedElements::new(found)
    }

    /// Lookup scoped to a node's own formula
    pub fn lookup_node<R: FormulaReferences + ?Sized>(self, refs: &R, node: &NodeId) -> RelatedElements {
        self.lookup(refs, &Element::Node(node.clone()))
    }

    /// Lookup scoped to one attribute's formula
    pub fn lookup_attribute<R: FormulaReferences + ?Sized>(
        self,
        refs: &R,
        attribute: &NodeAttribute,
    ) -> RelatedElements {
        self.lookup(refs, &Element::Attribute(attribute.clone()))
    }

    /// Orient a discovered `(origin, related)` pair as precedent -> dependent.
    ///
    /// Tracing precedents, the origin is the dependent; tracing dependents,
    /// the origin is the precedent.
    pub fn connection_order(self, origin: NodeId, related: NodeId) -> DirectedPair {
        match self {
            Direction::Precedents => DirectedPair::new(related, origin),
            Direction::Dependents => DirectedPair::new(origin, related),
        }
    }
}
