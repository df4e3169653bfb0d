//! Parameter catalog: groups, definitions and per-well typed values.

use std::sync::Arc;

use fieldreg_domain::{
    NewParameter, NewParameterGroup, Parameter, ParameterFilter, ParameterGroup,
    ParameterGroupId, ParameterGroupPatch, ParameterId, ParameterPatch, ParameterValue, WellId,
    WellParameterReading,
};

use super::validation::{base_code, require_non_empty, require_non_empty_if_present};
use super::{first_free_code, CatalogError};
use crate::infrastructure::ports::{ParameterRepo, RepoError};

pub struct ParameterCatalog {
    parameters: Arc<dyn ParameterRepo>,
}

impl ParameterCatalog {
    pub fn new(parameters: Arc<dyn ParameterRepo>) -> Self {
        Self { parameters }
    }

    // =========================================================================
    // Groups
    // =========================================================================

    pub async fn get_parameter_groups(
        &self,
        is_active: Option<bool>,
    ) -> Result<Vec<ParameterGroup>, CatalogError> {
        Ok(self.parameters.list_groups(is_active).await?)
    }

    pub async fn get_parameter_group(
        &self,
        id: ParameterGroupId,
    ) -> Result<Option<ParameterGroup>, CatalogError> {
        Ok(self.parameters.get_group(id).await?)
    }

    pub async fn get_parameter_group_by_code(
        &self,
        code: &str,
    ) -> Result<Option<ParameterGroup>, CatalogError> {
        Ok(self.parameters.get_group_by_code(code).await?)
    }

    pub async fn add_parameter_group(
        &self,
        mut group: NewParameterGroup,
    ) -> Result<ParameterGroupId, CatalogError> {
        require_non_empty(&group.name, "Parameter group name")?;
        let base = base_code(group.code.as_deref(), &group.name, "Parameter group code")?;
        group.code = Some(self.unique_group_code(&base, None).await?);

        let id = self.parameters.insert_group(&group).await?;
        tracing::info!(group_id = %id, "Parameter group added");
        Ok(id)
    }

    pub async fn update_parameter_group(
        &self,
        id: ParameterGroupId,
        mut patch: ParameterGroupPatch,
    ) -> Result<ParameterGroupId, CatalogError> {
        require_non_empty_if_present(patch.name.as_deref(), "Parameter group name")?;
        if let Some(code) = patch.code.take() {
            require_non_empty(&code, "Parameter group code")?;
            patch.code = Some(self.unique_group_code(code.trim(), Some(id)).await?);
        }
        self.parameters.update_group(id, &patch).await?;
        Ok(id)
    }

    /// Delete groups. Their parameters stay and become ungrouped.
    pub async fn delete_parameter_group(
        &self,
        ids: &[ParameterGroupId],
    ) -> Result<(), CatalogError> {
        for &id in ids {
            self.parameters.delete_group(id).await?;
        }
        Ok(())
    }

    // =========================================================================
    // Definitions
    // =========================================================================

    pub async fn get_parameters(
        &self,
        filter: &ParameterFilter,
    ) -> Result<Vec<Parameter>, CatalogError> {
        Ok(self.parameters.list_parameters(filter).await?)
    }

    pub async fn get_parameter(&self, id: ParameterId) -> Result<Option<Parameter>, CatalogError> {
        Ok(self.parameters.get_parameter(id).await?)
    }

    pub async fn get_parameter_by_code(
        &self,
        code: &str,
    ) -> Result<Option<Parameter>, CatalogError> {
        Ok(self.parameters.get_parameter_by_code(code).await?)
    }

    pub async fn add_parameter(
        &self,
        mut parameter: NewParameter,
    ) -> Result<ParameterId, CatalogError> {
        require_non_empty(&parameter.name, "Parameter name")?;
        let base = base_code(parameter.code.as_deref(), &parameter.name, "Parameter code")?;
        parameter.code = Some(self.unique_parameter_code(&base, None).await?);

        let id = self.parameters.insert_parameter(&parameter).await?;
        tracing::info!(parameter_id = %id, data_type = %parameter.data_type, "Parameter added");
        Ok(id)
    }

    pub async fn update_parameter(
        &self,
        id: ParameterId,
        mut patch: ParameterPatch,
    ) -> Result<ParameterId, CatalogError> {
        require_non_empty_if_present(patch.name.as_deref(), "Parameter name")?;
        if let Some(code) = patch.code.take() {
            require_non_empty(&code, "Parameter code")?;
            patch.code = Some(self.unique_parameter_code(code.trim(), Some(id)).await?);
        }
        self.parameters.update_parameter(id, &patch).await?;
        Ok(id)
    }

    /// Delete parameters together with every value stored for them.
    pub async fn delete_parameter(&self, ids: &[ParameterId]) -> Result<(), CatalogError> {
        for &id in ids {
            self.parameters.delete_parameter(id).await?;
        }
        Ok(())
    }

    // =========================================================================
    // Values
    // =========================================================================

    /// Every stored value of a well, in group then parameter order.
    pub async fn get_parameter_values(
        &self,
        well_id: WellId,
    ) -> Result<Vec<WellParameterReading>, CatalogError> {
        Ok(self.parameters.list_values_for_well(well_id).await?)
    }

    /// Parse `raw` by the parameter's declared type and store it for the well,
    /// replacing any previous value. Returns the stored value.
    pub async fn set_parameter_value(
        &self,
        well_id: WellId,
        parameter_id: ParameterId,
        raw: &str,
    ) -> Result<ParameterValue, CatalogError> {
        let parameter = self.require_parameter(parameter_id).await?;
        let value = ParameterValue::parse(parameter.data_type, raw)?;
        self.parameters
            .upsert_value(well_id, parameter_id, &value)
            .await?;
        tracing::debug!(well_id = %well_id, parameter = %parameter.code, "Parameter value set");
        Ok(value)
    }

    /// Store an already typed value; it must match the declared type.
    pub async fn set_typed_parameter_value(
        &self,
        well_id: WellId,
        parameter_id: ParameterId,
        value: ParameterValue,
    ) -> Result<ParameterValue, CatalogError> {
        let parameter = self.require_parameter(parameter_id).await?;
        if !value.matches(parameter.data_type) {
            return Err(CatalogError::InvalidInput(format!(
                "parameter {} expects a {} value",
                parameter.code, parameter.data_type
            )));
        }
        self.parameters
            .upsert_value(well_id, parameter_id, &value)
            .await?;
        Ok(value)
    }

    async fn require_parameter(&self, id: ParameterId) -> Result<Parameter, CatalogError> {
        self.parameters
            .get_parameter(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Parameter", id))
    }

    async fn unique_group_code(
        &self,
        base: &str,
        owner: Option<ParameterGroupId>,
    ) -> Result<String, RepoError> {
        let parameters = &self.parameters;
        first_free_code(base, |candidate| async move {
            let existing = parameters.get_group_by_code(&candidate).await?;
            Ok::<_, RepoError>(existing.is_some_and(|existing| Some(existing.id) != owner))
        })
        .await
    }

    async fn unique_parameter_code(
        &self,
        base: &str,
        owner: Option<ParameterId>,
    ) -> Result<String, RepoError> {
        let parameters = &self.parameters;
        first_free_code(base, |candidate| async move {
            let existing = parameters.get_parameter_by_code(&candidate).await?;
            Ok::<_, RepoError>(existing.is_some_and(|existing| Some(existing.id) != owner))
        })
        .await
    }
}
