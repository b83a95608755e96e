//! Dependency tracing: session state machine, projection, and host contract

mod host;
mod projector;
mod session;
mod view;

pub use host::{ArrowHead, Connector, ConnectorSet, ConnectorShape, ConnectorStyle, HighlightSet, TraceHost};
pub use projector::{project, Projection};
pub use session::{
    find_dependents, find_precedents, ActiveTrace, TraceError, TraceReport, TraceResult, TraceSession,
    TraceStep,
};
pub use view::DocumentView;
