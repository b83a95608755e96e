//! Core document data structures

mod document;
mod element;
mod engine;
mod node;


pub use document::{Document, DocumentError, DocumentId, DocumentMetadata};
pub use element::{Element, Highlight, NodeAttribute, Selection};
pub use engine::{TracerEngine, TracerError, TracerResult};
pub use node::{Attribute, AttributeId, Node, NodeId};
