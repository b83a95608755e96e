//! Shared fixtures for tracer integration tests

#![allow(dead_code)]

use formula_tracer::{
    Attribute, Document, DocumentView, Element, FormulaReferences, Node, NodeId, Selection,
};
use std::cell::RefCell;

/// N1 reads N2.Rate; N3 reads N1; N4 reads N3 and N2.Rate.
///
/// ```text
/// N2.Rate --> N1 --> N3 --> N4
///    \__________________/^
/// ```
pub fn rate_document() -> Document {
    let mut doc = Document::new("rates");
    doc.add_node(Node::with_id("N2", "Rates").with_attribute(Attribute::new("Rate", "0.5").with_id("N2.Rate")));
    doc.add_node(Node::with_id("N1", "Total").with_formula("=ID_N2['Rate'] * 10", vec![rate()]));
    doc.add_node(Node::with_id("N3", "Taxed").with_formula("=ID_N1 * 1.2", vec![Element::node("N1")]));
    doc.add_node(
        Node::with_id("N4", "Report")
            .with_formula("=ID_N3 + ID_N2['Rate']", vec![Element::node("N3"), rate()]),
    );
    doc
}

pub fn rate() -> Element {
    Element::attribute("N2", "N2.Rate")
}

pub fn view_on_node(id: &str) -> DocumentView {
    let mut view = DocumentView::new();
    view.select(Selection::Node(NodeId::from_string(id)));
    view
}

/// Wraps a reference source and records every element looked up
pub struct Recording<R> {
    pub inner: R,
    pub queried: RefCell<Vec<Element>>,
}

impl<R: FormulaReferences> Recording<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            queried: RefCell::new(Vec::new()),
        }
    }

    pub fn take(&self) -> Vec<Element> {
        let mut v = self.queried.take();
        v.sort();
        v
    }
}

impl<R: FormulaReferences> FormulaReferences for Recording<R> {
    fn precedents_of(&self, element: &Element) -> Vec<Element> {
        self.queried.borrow_mut().push(element.clone());
        self.inner.precedents_of(element)
    }

    fn dependents_of(&self, element: &Element) -> Vec<Element> {
        self.queried.borrow_mut().push(element.clone());
        self.inner.dependents_of(element)
    }

    fn contains(&self, element: &Element) -> bool {
        self.inner.contains(element)
    }
}
