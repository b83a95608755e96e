//! Query layer: which elements are related to which, in which direction
//!
//! [`Direction`] doubles as the search strategy: it selects the lookup and
//! orients discovered pairs so connectors always run precedent -> dependent.

mod references;
mod strategy;
mod types;

pub use references::FormulaReferences;
pub use types::{DirectedPair, Direction, RelatedElements};
