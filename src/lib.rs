//! formula-tracer: precedent/dependent tracing for formula documents
//!
//! Walks the formula-reference relation of a hierarchical document one hop
//! at a time, accumulating highlights and precedent -> dependent connectors.
//!
//! # Core Concepts
//!
//! - **Elements**: nodes and their named attributes, the unit of reference
//! - **Direction**: precedents (what a formula reads) or dependents (who reads it)
//! - **Sessions**: the accumulated frontier and highlight set across calls
//! - **Hosts**: the application side that owns selection, highlights and connectors
//!
//! # Example
//!
//! ```
//! use formula_tracer::{Direction, Document, DocumentView, Element, Node, NodeId, Selection, TraceSession};
//!
//! let mut doc = Document::new("budget");
//! doc.add_node(Node::with_id("price", "10"));
//! doc.add_node(Node::with_id("total", "20").with_formula("=ID_price * 2", vec![Element::node("price")]));
//!
//! let mut view = DocumentView::new();
//! view.select(Selection::Node(NodeId::from_string("total")));
//!
//! let step = TraceSession::new().trace(Direction::Precedents, &doc, &mut view).unwrap();
//! assert_eq!(step.report.new_highlights, vec![Element::node("price")]);
//! ```

pub mod config;
mod graph;
pub mod query;
pub mod trace;

pub use config::{ConfigError, TracerConfig};
pub use graph::{
    Attribute, AttributeId, Document, DocumentError, DocumentId, DocumentMetadata, Element, Highlight, Node,
    NodeAttribute, NodeId, Selection, TracerEngine, TracerError, TracerResult,
};
pub use query::{DirectedPair, Direction, FormulaReferences, RelatedElements};
pub use trace::{
    find_dependents, find_precedents, Connector, ConnectorSet, ConnectorStyle, DocumentView, HighlightSet,
    TraceError, TraceHost, TraceReport, TraceSession, TraceStep,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
