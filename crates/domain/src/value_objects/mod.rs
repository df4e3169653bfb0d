//! Value objects - Immutable objects defined by their attributes

mod code;
mod parameter_value;

pub use code::{code_candidates, slugify};
pub use parameter_value::{DataType, ParameterValue, DATE_FORMAT};
