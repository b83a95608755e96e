//! End-to-end behaviour of trace sessions against an in-memory document

mod common;

use common::{rate, rate_document, view_on_node, Recording};
use formula_tracer::{
    Attribute, DirectedPair, Direction, Document, DocumentView, Element, FormulaReferences, Highlight, Node,
    NodeId, Selection, TraceError, TraceHost, TraceSession, TracerEngine,
};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

fn pair(from: &str, to: &str) -> DirectedPair {
    DirectedPair::new(NodeId::from_string(from), NodeId::from_string(to))
}

fn connector_pairs(view: &DocumentView) -> Vec<DirectedPair> {
    let mut pairs: Vec<_> = view
        .connectors()
        .map(|c| c.pairs().cloned().collect())
        .unwrap_or_default();
    pairs.sort();
    pairs
}

/// Every (precedent owner, dependent owner) pair the document actually contains
fn true_edges(doc: &Document) -> BTreeSet<DirectedPair> {
    let mut edges = BTreeSet::new();
    for node in doc.nodes() {
        let mut elements = vec![Element::Node(node.id.clone())];
        for attr in &node.attributes {
            elements.push(Element::attribute(node.id.as_str(), attr.id.as_str()));
        }
        for element in elements {
            for p in doc.precedents_of(&element) {
                edges.insert(DirectedPair::new(p.owner().clone(), element.owner().clone()));
            }
        }
    }
    edges
}

#[test]
fn rate_scenario_precedents_then_dependents() {
    let mut doc = Document::new("scenario");
    doc.add_node(Node::with_id("N2", "Rates").with_attribute(Attribute::new("Rate", "0.5").with_id("N2.Rate")));
    doc.add_node(Node::with_id("N1", "Total").with_formula("=ID_N2['Rate'] * 10", vec![rate()]));
    let mut view = view_on_node("N1");

    let first = TraceSession::new().trace(Direction::Precedents, &doc, &mut view).unwrap();
    let highlights = view.highlights().unwrap();
    assert!(highlights.contains(&rate().highlight()));
    assert_eq!(connector_pairs(&view), vec![pair("N2", "N1")]);

    let second = first.session.trace(Direction::Precedents, &doc, &mut view).unwrap();
    assert!(second.report.is_noop());
    assert_eq!(second.session.frontier().map(|f| f.len()), Some(0));
    assert_eq!(connector_pairs(&view), vec![pair("N2", "N1")]);

    let third = second.session.trace(Direction::Dependents, &doc, &mut view).unwrap();
    assert!(third.report.switched);
    assert!(third.report.is_noop());
    assert_eq!(third.session.frontier().unwrap(), &BTreeSet::from([Element::node("N1")]));
    assert_eq!(connector_pairs(&view), vec![pair("N2", "N1")]);
}

#[test]
fn empty_expansion_is_idempotent() {
    let doc = rate_document();
    let mut view = view_on_node("N1");

    let mut session = TraceSession::new();
    for _ in 0..2 {
        session = session.trace(Direction::Precedents, &doc, &mut view).unwrap().session;
    }
    assert_eq!(session.frontier().map(|f| f.is_empty()), Some(true));
    let highlights = view.highlights().cloned();
    let connectors = connector_pairs(&view);

    for _ in 0..3 {
        let step = session.trace(Direction::Precedents, &doc, &mut view).unwrap();
        assert!(step.report.is_noop());
        assert_eq!(step.report.queried, 0);
        session = step.session;
    }
    assert_eq!(view.highlights().cloned(), highlights);
    assert_eq!(connector_pairs(&view), connectors);
}

#[test]
fn direction_switch_retraces_whole_highlight_set() {
    let refs = Recording::new(rate_document());
    let mut view = DocumentView::new();
    view.select(Selection::Attribute(
        refs.inner.find_attribute(&NodeId::from_string("N2"), "Rate").unwrap(),
    ));

    let s1 = TraceSession::new().trace(Direction::Dependents, &refs, &mut view).unwrap();
    assert_eq!(refs.take(), vec![rate()]);

    let s2 = s1.session.trace(Direction::Dependents, &refs, &mut view).unwrap();
    // only the last hop is expanded
    assert_eq!(refs.take(), vec![Element::node("N1"), Element::node("N4")]);
    assert_eq!(s2.session.frontier().unwrap(), &BTreeSet::from([Element::node("N3")]));

    let s3 = s2.session.trace(Direction::Precedents, &refs, &mut view).unwrap();
    assert_eq!(
        refs.take(),
        vec![Element::node("N1"), Element::node("N3"), Element::node("N4"), rate()]
    );
    assert!(s3.report.switched);
    assert_eq!(s3.session.direction(), Some(Direction::Precedents));
}

#[test]
fn connectors_point_from_precedent_to_dependent_both_ways() {
    let doc = rate_document();
    let edges = true_edges(&doc);

    for direction in [Direction::Precedents, Direction::Dependents] {
        let mut view = view_on_node("N3");
        let mut session = TraceSession::new();
        for step in [direction, direction, direction.opposite(), direction] {
            session = session.trace(step, &doc, &mut view).unwrap().session;
        }
        let drawn = connector_pairs(&view);
        assert!(!drawn.is_empty());
        for p in drawn {
            assert!(edges.contains(&p), "{} is not a precedent -> dependent edge", p);
        }
    }
}

#[test]
fn attributes_highlight_their_value_and_connect_their_owner() {
    let doc = rate_document();
    let mut view = view_on_node("N4");
    TraceSession::new().trace(Direction::Precedents, &doc, &mut view).unwrap();

    let highlights = view.highlights().unwrap();
    assert!(highlights.contains(&rate().highlight()));
    assert!(!highlights.contains(&Highlight::Node(NodeId::from_string("N2"))));
    assert_eq!(connector_pairs(&view), vec![pair("N2", "N4"), pair("N3", "N4")]);
}

#[test]
fn attribute_seed_is_highlighted_as_value() {
    let doc = rate_document();
    let mut view = DocumentView::new();
    view.select(Selection::Attribute(doc.find_attribute(&"N2".into(), "Rate").unwrap()));

    let step = TraceSession::new().trace(Direction::Precedents, &doc, &mut view).unwrap();
    assert!(step.report.is_noop());
    assert_eq!(
        view.highlights().unwrap().iter().collect::<Vec<_>>(),
        vec![&rate().highlight()]
    );
}

#[test]
fn clear_then_trace_behaves_like_first_call() {
    let doc = rate_document();
    let mut view = view_on_node("N3");

    let first = TraceSession::new().trace(Direction::Precedents, &doc, &mut view).unwrap();
    let first_highlights = view.highlights().cloned();
    let first_connectors = connector_pairs(&view);
    let more = first.session.trace(Direction::Dependents, &doc, &mut view).unwrap();

    let idle = more.session.clear(&mut view);
    assert_eq!(idle.frontier(), None);
    assert_eq!(idle.direction(), None);
    assert!(view.highlights().is_none());
    assert!(view.connectors().is_none());

    let again = idle.trace(Direction::Precedents, &doc, &mut view).unwrap();
    assert_eq!(again.report, first.report);
    assert_eq!(again.session, first.session);
    assert_eq!(view.highlights().cloned(), first_highlights);
    assert_eq!(connector_pairs(&view), first_connectors);
}

#[test]
fn continuing_session_ignores_selection() {
    let doc = rate_document();
    let mut view = view_on_node("N1");
    let step = TraceSession::new().trace(Direction::Dependents, &doc, &mut view).unwrap();

    view.deselect();
    let next = step.session.trace(Direction::Dependents, &doc, &mut view).unwrap();
    assert_eq!(next.report.new_highlights, vec![Element::node("N4")]);
}

#[test]
fn connectors_use_host_style() {
    let doc = rate_document();
    let style = formula_tracer::ConnectorStyle {
        color: "#00ff00".to_string(),
        ..Default::default()
    };
    let mut view = view_on_node("N1").with_style(style.clone());
    TraceSession::new().trace(Direction::Dependents, &doc, &mut view).unwrap();

    assert_eq!(view.connector_style(), style);
    assert!(view.connectors().unwrap().iter().all(|c| c.style == style));
}

#[test]
fn engine_tolerates_elements_removed_between_calls() {
    let engine = TracerEngine::new();
    let mut doc = rate_document();
    let id = engine.upsert_document(doc.clone());
    let mut view = view_on_node("N1");

    engine.find_dependents(&id, &mut view).unwrap();
    assert_eq!(
        engine.session(&id).frontier().unwrap(),
        &BTreeSet::from([Element::node("N3")])
    );

    doc.remove_node(&NodeId::from_string("N3"));
    engine.upsert_document(doc);

    let report = engine.find_dependents(&id, &mut view).unwrap();
    assert!(report.is_noop());
    assert_eq!(report.frontier_len, 0);
}

#[test]
fn engine_failure_leaves_session_and_sinks_unchanged() {
    let engine = TracerEngine::new();
    let id = engine.upsert_document(rate_document());
    let mut view = DocumentView::new();

    let err = engine.find_precedents(&id, &mut view).unwrap_err();
    assert!(matches!(err, formula_tracer::TracerError::Trace(TraceError::InvalidSelection)));
    assert!(view.highlights().is_none());
    assert!(view.connectors().is_none());
    assert_eq!(view.refresh_count(), 0);
    assert_eq!(engine.session(&id), TraceSession::Idle);
}

#[test]
fn equal_attribute_ids_on_different_nodes_stay_distinct() {
    let mut doc = Document::new("shared ids");
    doc.add_node(Node::with_id("A", "Rates A").with_attribute(Attribute::new("Rate", "0.5").with_id("rate")));
    doc.add_node(Node::with_id("B", "Rates B").with_attribute(Attribute::new("Rate", "0.7").with_id("rate")));
    doc.add_node(Node::with_id("C", "Sum").with_formula(
        "=ID_A['Rate'] + ID_B['Rate']",
        vec![Element::attribute("A", "rate"), Element::attribute("B", "rate")],
    ));
    let mut view = view_on_node("C");

    let step = TraceSession::new().trace(Direction::Precedents, &doc, &mut view).unwrap();

    let session_highlights: BTreeSet<Highlight> =
        step.session.highlighted().unwrap().iter().map(Element::highlight).collect();
    let sink: BTreeSet<Highlight> = view.highlights().unwrap().iter().cloned().collect();
    assert_eq!(sink.len(), 3);
    assert_eq!(sink, session_highlights);
    assert!(sink.contains(&Element::attribute("A", "rate").highlight()));
    assert!(sink.contains(&Element::attribute("B", "rate").highlight()));
    assert_eq!(connector_pairs(&view), vec![pair("A", "C"), pair("B", "C")]);
}
