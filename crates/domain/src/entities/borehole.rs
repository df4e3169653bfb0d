//! Borehole entity - a numbered wellbore within a well.

use serde::{Deserialize, Serialize};

use crate::entities::{Location, Well};
use crate::ids::{BoreholeId, WellId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Borehole {
    pub id: BoreholeId,
    pub well_id: WellId,
    /// Unique within the well, starting at 1
    pub number: i64,
    pub name: String,
}

impl Borehole {
    /// Name used when a borehole is added without one.
    pub fn default_name(well_name: Option<&str>, number: i64) -> String {
        match well_name {
            Some(well_name) => format!("{well_name} Borehole {number}"),
            None => format!("Borehole {number}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBorehole {
    pub well_id: WellId,
    /// Next free number when absent or zero
    pub number: Option<i64>,
    pub name: Option<String>,
}

impl NewBorehole {
    pub fn new(well_id: WellId) -> Self {
        Self {
            well_id,
            number: None,
            name: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoreholePatch {
    pub number: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoreholeFullInfo {
    #[serde(flatten)]
    pub borehole: Borehole,
    pub well: Option<Well>,
    /// Ancestry of the well's cluster; empty when the well is missing
    pub hierarchy: Vec<Location>,
}
