//! In-memory host for one document: selection plus the two sinks

use super::host::{ConnectorSet, ConnectorStyle, HighlightSet, TraceHost};
use crate::graph::Selection;

/// A headless document view
///
/// Holds what a UI would: the current selection, the highlight and
/// connector overlays (absent until first used), and a redraw counter.
#[derive(Debug, Clone, Default)]
pub struct DocumentView {
    selection: Option<Selection>,
    highlights: Option<HighlightSet>,
    connectors: Option<ConnectorSet>,
    style: ConnectorStyle,
    session_attached: bool,
    refresh_count: usize,
}

impl DocumentView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, style: ConnectorStyle) -> Self {
        self.style = style;
        self
    }

    pub fn select(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }

    pub fn deselect(&mut self) {
        self.selection = None;
    }

    pub fn highlights(&self) -> Option<&HighlightSet> {
        self.highlights.as_ref()
    }

    pub fn connectors(&self) -> Option<&ConnectorSet> {
        self.connectors.as_ref()
    }

    /// Whether a trace session is registered on this view
    pub fn has_session(&self) -> bool {
        self.session_attached
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_count
    }
}

impl TraceHost for DocumentView {
    fn selection(&self) -> Option<Selection> {
        self.selection.clone()
    }

    fn highlight_sink(&mut self) -> &mut HighlightSet {
        self.session_attached = true;
        self.highlights.get_or_insert_with(HighlightSet::new)
    }

    fn connector_sink(&mut self) -> &mut ConnectorSet {
        self.session_attached = true;
        self.connectors.get_or_insert_with(ConnectorSet::new)
    }

    fn remove_highlight_sink(&mut self) {
        self.highlights = None;
    }

    fn remove_connector_sink(&mut self) {
        self.connectors = None;
    }

    fn remove_session_extension(&mut self) {
        self.session_attached = false;
    }

    fn connector_style(&self) -> ConnectorStyle {
        self.style.clone()
    }

    fn refresh_view(&mut self) {
        self.refresh_count += 1;
    }
}
