//! Domain entities - Core business objects with identity

mod borehole;
mod location;
mod parameter;
mod well;

pub use borehole::{Borehole, BoreholeFullInfo, BoreholePatch, NewBorehole};
pub use location::{
    FilterScope, Location, LocationFilter, LocationPatch, LocationType, NewLocation, ParentRule,
};
pub use parameter::{
    NewParameter, NewParameterGroup, Parameter, ParameterFilter, ParameterGroup,
    ParameterGroupPatch, ParameterPatch, WellParameterReading,
};
pub use well::{
    ClusterStatistics, NewWell, Well, WellFilter, WellFullInfo, WellGroupCount, WellPatch,
    WellWithBoreholes,
};
