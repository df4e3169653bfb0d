//! Parameter definitions, their groups, and per-well readings.

use serde::{Deserialize, Serialize};

use crate::ids::{ParameterGroupId, ParameterId, ParameterValueId, WellId};
use crate::value_objects::{DataType, ParameterValue};

// =============================================================================
// Groups
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterGroup {
    pub id: ParameterGroupId,
    pub code: String,
    pub name: String,
    pub sort_order: i64,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewParameterGroup {
    pub name: String,
    pub code: Option<String>,
    pub sort_order: i64,
    pub is_active: bool,
}

impl NewParameterGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: None,
            sort_order: 0,
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterGroupPatch {
    pub name: Option<String>,
    pub code: Option<String>,
    pub sort_order: Option<i64>,
    pub is_active: Option<bool>,
}

// =============================================================================
// Parameters
// =============================================================================

/// A parameter definition, with its group's name and code joined in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: ParameterId,
    pub group_id: Option<ParameterGroupId>,
    pub code: String,
    pub name: String,
    pub data_type: DataType,
    pub unit: Option<String>,
    pub sort_order: i64,
    pub is_active: bool,
    pub group_name: Option<String>,
    pub group_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewParameter {
    pub group_id: Option<ParameterGroupId>,
    pub name: String,
    pub code: Option<String>,
    pub data_type: DataType,
    pub unit: Option<String>,
    pub sort_order: i64,
    pub is_active: bool,
}

impl NewParameter {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            group_id: None,
            name: name.into(),
            code: None,
            data_type,
            unit: None,
            sort_order: 0,
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterPatch {
    pub group_id: Option<Option<ParameterGroupId>>,
    pub name: Option<String>,
    pub code: Option<String>,
    pub data_type: Option<DataType>,
    pub unit: Option<Option<String>>,
    pub sort_order: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParameterFilter {
    pub is_active: Option<bool>,
    pub group_id: Option<ParameterGroupId>,
}

// =============================================================================
// Values
// =============================================================================

/// One stored parameter value for a well, with the definition joined in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellParameterReading {
    pub id: ParameterValueId,
    pub well_id: WellId,
    pub parameter_id: ParameterId,
    pub code: String,
    pub name: String,
    /// `None` when the column for the declared type is NULL
    pub value: Option<ParameterValue>,
    pub unit: Option<String>,
    pub data_type: DataType,
    pub group_id: Option<ParameterGroupId>,
    pub group_name: Option<String>,
    pub group_code: Option<String>,
}
