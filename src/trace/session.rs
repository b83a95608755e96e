//! Trace session: the accumulated state across find-precedents/find-dependents calls
//!
//! A session is a plain value. Each [`TraceSession::trace`] call reads the
//! current session and returns the next one, so the Idle/Active transitions
//! can be driven and inspected without any hidden state.
//!
//! - **Idle**: the next call starts from the current selection.
//! - **Active, same direction**: the next call expands only the last hop.
//! - **Active, direction switch**: the next call re-traces every element
//!   highlighted so far, in the new direction.

use super::host::{Connector, TraceHost};
use super::projector::{project, Projection};
use crate::graph::{Element, NodeId};
use crate::query::{DirectedPair, Direction, FormulaReferences, RelatedElements};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::instrument;

/// Errors that can occur when starting or continuing a trace
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    #[error("No node or attribute selected")]
    InvalidSelection,

    #[error("Selected element no longer exists: {0}")]
    StaleSeed(String),
}

/// Result type for trace operations
pub type TraceResult<T> = Result<T, TraceError>;

/// State of an in-progress trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTrace {
    frontier: BTreeSet<Element>,
    direction: Direction,
    highlighted: BTreeSet<Element>,
    connected: BTreeSet<DirectedPair>,
}

impl ActiveTrace {
    fn seeded(seed: Element, direction: Direction) -> Self {
        Self {
            frontier: BTreeSet::new(),
            direction,
            highlighted: BTreeSet::from([seed]),
            connected: BTreeSet::new(),
        }
    }
}

/// Accumulated trace state for one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TraceSession {
    #[default]
    Idle,
    Active(ActiveTrace),
}

/// What one call changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceReport {
    pub direction: Direction,
    /// A fresh session was started from the selection
    pub restarted: bool,
    /// The direction changed, so the whole highlight set was re-traced
    pub switched: bool,
    /// Number of elements looked up
    pub queried: usize,
    /// Elements highlighted for the first time this session
    pub new_highlights: Vec<Element>,
    /// Connectors drawn for the first time this session
    pub new_connectors: Vec<DirectedPair>,
    /// Size of the frontier for the next same-direction call
    pub frontier_len: usize,
}

impl TraceReport {
    /// Nothing new was highlighted or connected
    pub fn is_noop(&self) -> bool {
        self.new_highlights.is_empty() && self.new_connectors.is_empty()
    }
}

/// The session after a call, plus what changed
#[derive(Debug, Clone)]
pub struct TraceStep {
    pub session: TraceSession,
    pub report: TraceReport,
}

impl TraceSession {
    pub fn new() -> Self {
        Self::Idle
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    /// `None` when idle
    pub fn frontier(&self) -> Option<&BTreeSet<Element>> {
        match self {
            Self::Idle => None,
            Self::Active(a) => Some(&a.frontier),
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        match self {
            Self::Idle => None,
            Self::Active(a) => Some(a.direction),
        }
    }

    /// Every element highlighted this session, seed included
    pub fn highlighted(&self) -> Option<&BTreeSet<Element>> {
        match self {
            Self::Idle => None,
            Self::Active(a) => Some(&a.highlighted),
        }
    }

    /// Every connector drawn this session
    pub fn connected(&self) -> Option<&BTreeSet<DirectedPair>> {
        match self {
            Self::Idle => None,
            Self::Active(a) => Some(&a.connected),
        }
    }

    /// Run one trace step in `direction`.
    ///
    /// Lookups and projection are computed before anything is written, so an
    /// error leaves both `self` and the host sinks untouched.
    #[instrument(level = "trace", skip(self, refs, host))]
    pub fn trace<R, H>(&self, direction: Direction, refs: &R, host: &mut H) -> TraceResult<TraceStep>
    where
        R: FormulaReferences + ?Sized,
        H: TraceHost + ?Sized,
    {
        let (queries, mut next, restarted, switched) = match self {
            Self::Idle => {
                let seed = host.selection().ok_or(TraceError::InvalidSelection)?.seed();
                if !refs.contains(&seed) {
                    return Err(TraceError::StaleSeed(seed.to_string()));
                }
                tracing::debug!(seed = %seed, %direction, "starting trace session");
                let queries = BTreeSet::from([seed.clone()]);
                (queries, ActiveTrace::seeded(seed, direction), true, false)
            }
            Self::Active(active) if active.direction != direction => {
                tracing::debug!(
                    from = %active.direction,
                    to = %direction,
                    highlighted = active.highlighted.len(),
                    "direction switched, re-tracing highlighted elements"
                );
                (active.highlighted.clone(), active.clone(), false, true)
            }
            Self::Active(active) => (active.frontier.clone(), active.clone(), false, false),
        };

        let found: Vec<(NodeId, RelatedElements)> = queries
            .iter()
            .filter_map(|element| {
                let related = direction.lookup(refs, element);
                (!related.is_empty()).then(|| (element.owner().clone(), related))
            })
            .collect();
        let projection = project(direction, &found);

        let report = commit(&mut next, direction, projection, host, restarted, switched, queries.len());
        tracing::debug!(
            %direction,
            queried = report.queried,
            new_highlights = report.new_highlights.len(),
            new_connectors = report.new_connectors.len(),
            frontier = report.frontier_len,
            "trace step complete"
        );

        Ok(TraceStep {
            session: Self::Active(next),
            report,
        })
    }

    /// End the session: remove both sinks and detach from the host.
    pub fn clear<H: TraceHost + ?Sized>(&self, host: &mut H) -> TraceSession {
        host.remove_highlight_sink();
        host.remove_connector_sink();
        host.remove_session_extension();
        host.refresh_view();
        tracing::debug!(was_active = self.is_active(), "trace session cleared");
        Self::Idle
    }
}

/// Apply a computed projection to the session and the host sinks
fn commit<H: TraceHost + ?Sized>(
    next: &mut ActiveTrace,
    direction: Direction,
    projection: Projection,
    host: &mut H,
    restarted: bool,
    switched: bool,
    queried: usize,
) -> TraceReport {
    let style = host.connector_style();

    if restarted {
        host.highlight_sink().clear();
        host.connector_sink().clear();
        for seed in &next.highlighted {
            host.highlight_sink().add(seed.highlight());
        }
    }

    for highlight in projection.highlights {
        host.highlight_sink().add(highlight);
    }

    let mut new_highlights = Vec::new();
    for element in &projection.frontier {
        if next.highlighted.insert(element.clone()) {
            new_highlights.push(element.clone());
        }
    }

    let mut new_connectors = Vec::new();
    let sink = host.connector_sink();
    for pair in projection.connectors {
        sink.add(Connector::new(pair.clone(), style.clone()));
        if next.connected.insert(pair.clone()) {
            new_connectors.push(pair);
        }
    }

    next.frontier = projection.frontier;
    next.direction = direction;
    host.refresh_view();

    TraceReport {
        direction,
        restarted,
        switched,
        queried,
        new_highlights,
        new_connectors,
        frontier_len: next.frontier.len(),
    }
}

/// Trace one more hop towards the elements `session`'s formulas read from
pub fn find_precedents<R, H>(session: &TraceSession, refs: &R, host: &mut H) -> TraceResult<TraceStep>
where
    R: FormulaReferences + ?Sized,
    H: TraceHost + ?Sized,
{
    session.trace(Direction::Precedents, refs, host)
}

/// Trace one more hop towards the elements whose formulas read `session`'s
pub fn find_dependents<R, H>(session: &TraceSession, refs: &R, host: &mut H) -> TraceResult<TraceStep>
where
    R: FormulaReferences + ?Sized,
    H: TraceHost + ?Sized,
{
    session.trace(Direction::Dependents, refs, host)
}
