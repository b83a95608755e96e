//! Turns one step's lookup results into highlights, connectors and the next frontier

use crate::graph::{Element, Highlight, NodeId};
use crate::query::{DirectedPair, Direction, RelatedElements};
use std::collections::BTreeSet;

/// Everything one trace step will commit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    /// Discovered elements; also the frontier for the next same-direction step
    pub frontier: BTreeSet<Element>,
    /// Entities to highlight, attributes unwrapped to their value pair
    pub highlights: BTreeSet<Highlight>,
    /// Deduplicated connectors, precedent -> dependent
    pub connectors: BTreeSet<DirectedPair>,
}

impl Projection {
    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }
}

/// Project `(origin node, related elements)` pairs found tracing `direction`.
pub fn project(direction: Direction, found: &[(NodeId, RelatedElements)]) -> Projection {
    let mut projection = Projection::default();

    for (origin, related) in found {
        for element in related.elements() {
            projection.highlights.insert(element.highlight());
            projection.frontier.insert(element.clone());
        }
        for node in related.nodes() {
            projection
                .connectors
                .insert(direction.connection_order(origin.clone(), node.clone()));
        }
    }

    projection
}
