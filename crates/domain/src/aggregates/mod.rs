//! Aggregates - domain objects that own a consistent set of related data
//!
//! | Aggregate | Owns | Invariants |
//! |-----------|------|------------|
//! | [`LocationForest`] | every loaded location | acyclic, single placement, levels match depth |

pub mod location_forest;

pub use location_forest::{HierarchyRepair, LocationForest, LocationNode, MAX_DEPTH};
