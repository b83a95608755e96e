//! The graph-side reference relation the tracer queries

use crate::graph::Element;

/// Answers "what does this element's formula read" and "who reads this element".
///
/// Implementations own the document; the tracer only asks questions.
/// Elements that no longer exist must yield empty relations rather than fail.
pub trait FormulaReferences {
    /// Elements referenced by the formula of `element`
    fn precedents_of(&self, element: &Element) -> Vec<Element>;

    /// Elements whose formula references `element`
    fn dependents_of(&self, element: &Element) -> Vec<Element>;

    /// Whether `element` currently exists
    fn contains(&self, element: &Element) -> bool;
}

impl<T: FormulaReferences + ?Sized> FormulaReferences for &T {
    fn precedents_of(&self, element: &Element) -> Vec<Element> {
        (**self).precedents_of(element)
    }

    fn dependents_of(&self, element: &Element) -> Vec<Element> {
        (**self).dependents_of(element)
    }

    fn contains(&self, element: &Element) -> bool {
        (**self).contains(element)
    }
}
