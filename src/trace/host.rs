//! Host contract: selection, highlight/connector sinks, redraw
//!
//! The tracer pushes its results into sinks owned by the host. Sinks are
//! created on demand, cleared when a new trace starts, and removed on clear.

use crate::graph::{Highlight, Selection};
use crate::query::DirectedPair;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Connector line shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorShape {
    #[default]
    Cubic,
    Line,
    Linear,
    EdgeLike,
}

/// Arrowheads drawn on a connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowHead {
    /// Single arrowhead at the `to` end
    #[default]
    Forward,
}

/// Host-supplied connector styling; opaque to the tracer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorStyle {
    /// `#rrggbb`
    pub color: String,
    pub alpha: u8,
    pub shape: ConnectorShape,
    pub width: u32,
    pub label_font_family: String,
    pub label_font_size: u32,
}

impl Default for ConnectorStyle {
    fn default() -> Self {
        Self {
            color: "#ff0000".to_string(),
            alpha: 80,
            shape: ConnectorShape::Cubic,
            width: 2,
            label_font_family: "SansSerif".to_string(),
            label_font_size: 12,
        }
    }
}

/// A directed visual edge, precedent -> dependent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connector {
    #[serde(flatten)]
    pub pair: DirectedPair,
    pub arrows: ArrowHead,
    pub style: ConnectorStyle,
}

impl Connector {
    pub fn new(pair: DirectedPair, style: ConnectorStyle) -> Self {
        Self {
            pair,
            arrows: ArrowHead::Forward,
            style,
        }
    }
}

/// Cumulative set of highlighted entities
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighlightSet {
    items: BTreeSet<Highlight>,
}

impl HighlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if already present
    pub fn add(&mut self, highlight: Highlight) -> bool {
        self.items.insert(highlight)
    }

    pub fn contains(&self, highlight: &Highlight) -> bool {
        self.items.contains(highlight)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Highlight> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cumulative connectors, one per `(from, to)` pair, in insertion order
#[derive(Debug, Clone, Default)]
pub struct ConnectorSet {
    connectors: Vec<Connector>,
    seen: HashSet<DirectedPair>,
}

impl ConnectorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if a connector between the same pair already exists
    pub fn add(&mut self, connector: Connector) -> bool {
        if !self.seen.insert(connector.pair.clone()) {
            return false;
        }
        self.connectors.push(connector);
        true
    }

    pub fn contains(&self, pair: &DirectedPair) -> bool {
        self.seen.contains(pair)
    }

    pub fn clear(&mut self) {
        self.connectors.clear();
        self.seen.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Connector> {
        self.connectors.iter()
    }

    pub fn pairs(&self) -> impl Iterator<Item = &DirectedPair> {
        self.connectors.iter().map(|c| &c.pair)
    }

    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }
}

/// What the tracer needs from the surrounding application.
pub trait TraceHost {
    /// The selected attribute if any, else the selected node
    fn selection(&self) -> Option<Selection>;

    /// Get or create the highlight sink
    fn highlight_sink(&mut self) -> &mut HighlightSet;

    /// Get or create the connector sink
    fn connector_sink(&mut self) -> &mut ConnectorSet;

    fn remove_highlight_sink(&mut self);

    fn remove_connector_sink(&mut self);

    /// Detach the trace session from the document
    fn remove_session_extension(&mut self);

    /// Styling for newly created connectors
    fn connector_style(&self) -> ConnectorStyle;

    /// Request a redraw
    fn refresh_view(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeId;

    fn pair(from: &str, to: &str) -> DirectedPair {
        DirectedPair::new(NodeId::from_string(from), NodeId::from_string(to))
    }

    #[test]
    fn connector_set_dedups_on_pair() {
        let mut set = ConnectorSet::new();
        assert!(set.add(Connector::new(pair("a", "b"), ConnectorStyle::default())));
        assert!(!set.add(Connector::new(pair("a", "b"), ConnectorStyle::default())));
        assert!(set.add(Connector::new(pair("b", "a"), ConnectorStyle::default())));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&pair("b", "a")));
    }

    #[test]
    fn connectors_always_carry_forward_arrow() {
        let c = Connector::new(pair("a", "b"), ConnectorStyle::default());
        assert_eq!(c.arrows, ArrowHead::Forward);
    }

    #[test]
    fn highlight_set_clear() {
        let mut set = HighlightSet::new();
        assert!(set.add(Highlight::Node(NodeId::from_string("a"))));
        assert!(!set.add(Highlight::Node(NodeId::from_string("a"))));
        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn style_defaults_fill_missing_fields() {
        let style: ConnectorStyle = serde_json::from_str(r##"{"color": "#00ff00"}"##).unwrap();
        assert_eq!(style.color, "#00ff00");
        assert_eq!(style.width, 2);
        assert_eq!(style.shape, ConnectorShape::Cubic);
    }
}
