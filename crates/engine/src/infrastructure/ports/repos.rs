//! Repository port traits for database access.
//!
//! Writes take whole validated records; the use cases never assemble SQL.

use async_trait::async_trait;
use fieldreg_domain::{
    Borehole, BoreholeId, BoreholePatch, Location, LocationId, LocationPatch, NewBorehole,
    NewLocation, NewParameter, NewParameterGroup, NewWell, Parameter, ParameterFilter,
    ParameterGroup, ParameterGroupId, ParameterGroupPatch, ParameterId, ParameterPatch,
    ParameterValue, Well, WellFilter, WellGroupCount, WellId, WellParameterReading, WellPatch,
};

use super::error::RepoError;

// =============================================================================
// Locations
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationRepo: Send + Sync {
    /// Every location row, ordered by `parent_id` (NULL first), `position`, `name`.
    async fn list_locations(&self) -> Result<Vec<Location>, RepoError>;

    /// Insert a location whose `code` has already been resolved.
    async fn insert_location(&self, location: &NewLocation) -> Result<LocationId, RepoError>;
    async fn set_position(&self, id: LocationId, position: i64) -> Result<u64, RepoError>;
    async fn update_location(
        &self,
        id: LocationId,
        patch: &LocationPatch,
    ) -> Result<u64, RepoError>;

    /// Delete exactly the given rows. Returns the number removed.
    async fn delete_locations(&self, ids: &[LocationId]) -> Result<u64, RepoError>;
}

// =============================================================================
// Wells
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WellRepo: Send + Sync {
    async fn get_well(&self, id: WellId) -> Result<Option<Well>, RepoError>;
    async fn get_well_by_code(&self, code: &str) -> Result<Option<Well>, RepoError>;
    /// Wells matching every set condition, ordered by `position`, `id`.
    async fn list_wells(&self, filter: &WellFilter) -> Result<Vec<Well>, RepoError>;

    async fn insert_well(&self, well: &NewWell) -> Result<WellId, RepoError>;
    async fn set_position(&self, id: WellId, position: i64) -> Result<u64, RepoError>;
    async fn update_well(&self, id: WellId, patch: &WellPatch) -> Result<u64, RepoError>;
    /// Delete the well together with its boreholes and parameter values.
    async fn delete_well(&self, id: WellId) -> Result<u64, RepoError>;

    /// Visible wells of a cluster grouped by status, category and purpose.
    async fn cluster_well_counts(
        &self,
        cluster_id: LocationId,
    ) -> Result<Vec<WellGroupCount>, RepoError>;
}

// =============================================================================
// Boreholes
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BoreholeRepo: Send + Sync {
    async fn get_borehole(&self, id: BoreholeId) -> Result<Option<Borehole>, RepoError>;
    /// Boreholes of one well ordered by `number`.
    async fn list_by_well(&self, well_id: WellId) -> Result<Vec<Borehole>, RepoError>;
    /// Any borehole of `well_id` already using `number`, other than `exclude`.
    async fn find_by_number(
        &self,
        well_id: WellId,
        number: i64,
        exclude: Option<BoreholeId>,
    ) -> Result<Option<BoreholeId>, RepoError>;

    /// Insert a borehole whose `number` and `name` have already been resolved.
    async fn insert_borehole(&self, borehole: &NewBorehole) -> Result<BoreholeId, RepoError>;
    async fn update_borehole(
        &self,
        id: BoreholeId,
        patch: &BoreholePatch,
    ) -> Result<u64, RepoError>;
    async fn delete_borehole(&self, id: BoreholeId) -> Result<u64, RepoError>;
}

// =============================================================================
// Parameters
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParameterRepo: Send + Sync {
    // Groups
    async fn list_groups(&self, is_active: Option<bool>)
        -> Result<Vec<ParameterGroup>, RepoError>;
    async fn get_group(&self, id: ParameterGroupId) -> Result<Option<ParameterGroup>, RepoError>;
    async fn get_group_by_code(&self, code: &str) -> Result<Option<ParameterGroup>, RepoError>;
    async fn insert_group(&self, group: &NewParameterGroup)
        -> Result<ParameterGroupId, RepoError>;
    async fn update_group(
        &self,
        id: ParameterGroupId,
        patch: &ParameterGroupPatch,
    ) -> Result<u64, RepoError>;
    async fn delete_group(&self, id: ParameterGroupId) -> Result<u64, RepoError>;

    // Definitions
    async fn list_parameters(&self, filter: &ParameterFilter)
        -> Result<Vec<Parameter>, RepoError>;
    async fn get_parameter(&self, id: ParameterId) -> Result<Option<Parameter>, RepoError>;
    async fn get_parameter_by_code(&self, code: &str) -> Result<Option<Parameter>, RepoError>;
    async fn insert_parameter(&self, parameter: &NewParameter) -> Result<ParameterId, RepoError>;
    async fn update_parameter(
        &self,
        id: ParameterId,
        patch: &ParameterPatch,
    ) -> Result<u64, RepoError>;
    /// Delete the stored values of the parameter, then the parameter.
    async fn delete_parameter(&self, id: ParameterId) -> Result<u64, RepoError>;

    // Values
    async fn list_values_for_well(
        &self,
        well_id: WellId,
    ) -> Result<Vec<WellParameterReading>, RepoError>;
    /// Insert or replace the single value a well holds for a parameter.
    async fn upsert_value(
        &self,
        well_id: WellId,
        parameter_id: ParameterId,
        value: &ParameterValue,
    ) -> Result<(), RepoError>;
}
