//! fieldreg domain - locations, wells, boreholes and well parameters.
//!
//! Pure types and algorithms only: no I/O, no logging, no async. The engine
//! crate supplies storage and caching around these.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use aggregates::{HierarchyRepair, LocationForest, LocationNode, MAX_DEPTH};

pub use entities::{
    Borehole, BoreholeFullInfo, BoreholePatch, ClusterStatistics, FilterScope, Location,
    LocationFilter, LocationPatch, LocationType, NewBorehole, NewLocation, NewParameter,
    NewParameterGroup, NewWell, Parameter, ParameterFilter, ParameterGroup, ParameterGroupPatch,
    ParameterPatch, ParentRule, Well, WellFilter, WellFullInfo, WellGroupCount,
    WellParameterReading, WellPatch, WellWithBoreholes,
};

pub use error::DomainError;

pub use ids::{BoreholeId, LocationId, ParameterGroupId, ParameterId, ParameterValueId, WellId};

pub use value_objects::{code_candidates, slugify, DataType, ParameterValue};
