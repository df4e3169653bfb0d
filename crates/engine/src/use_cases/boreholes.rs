//! Borehole catalog.

use std::sync::Arc;

use fieldreg_domain::{
    Borehole, BoreholeFullInfo, BoreholeId, BoreholePatch, NewBorehole, WellId,
};

use super::locations::LocationDirectory;
use super::validation::require_non_empty_if_present;
use super::wells::owned_hierarchy;
use super::CatalogError;
use crate::infrastructure::ports::{BoreholeRepo, WellRepo};

pub struct BoreholeCatalog {
    boreholes: Arc<dyn BoreholeRepo>,
    wells: Arc<dyn WellRepo>,
}

impl BoreholeCatalog {
    pub fn new(boreholes: Arc<dyn BoreholeRepo>, wells: Arc<dyn WellRepo>) -> Self {
        Self { boreholes, wells }
    }

    pub async fn get_borehole(&self, id: BoreholeId) -> Result<Option<Borehole>, CatalogError> {
        Ok(self.boreholes.get_borehole(id).await?)
    }

    pub async fn get_boreholes_by_well(
        &self,
        well_id: WellId,
    ) -> Result<Vec<Borehole>, CatalogError> {
        Ok(self.boreholes.list_by_well(well_id).await?)
    }

    /// Add a borehole to a well.
    ///
    /// Without a number it takes the next one after the well's current
    /// count; a number already in use is bumped until free. Without a name
    /// it is called `"<well name> Borehole <n>"`.
    pub async fn add_borehole(&self, mut borehole: NewBorehole) -> Result<BoreholeId, CatalogError> {
        let well_id = borehole.well_id;

        let mut number = match borehole.number.filter(|n| *n > 0) {
            Some(number) => number,
            None => self.boreholes.list_by_well(well_id).await?.len() as i64 + 1,
        };
        while self
            .boreholes
            .find_by_number(well_id, number, None)
            .await?
            .is_some()
        {
            number += 1;
        }

        let name = match borehole.name.take().filter(|n| !n.trim().is_empty()) {
            Some(name) => name,
            None => {
                let well = self.wells.get_well(well_id).await?;
                Borehole::default_name(well.as_ref().map(|w| w.name.as_str()), number)
            }
        };

        borehole.number = Some(number);
        borehole.name = Some(name);
        let id = self.boreholes.insert_borehole(&borehole).await?;

        tracing::info!(borehole_id = %id, well_id = %well_id, number, "Borehole added");
        Ok(id)
    }

    /// Update a borehole. `Ok(None)` when the new number is already used by
    /// another borehole of the same well; nothing is written in that case.
    pub async fn update_borehole(
        &self,
        id: BoreholeId,
        patch: BoreholePatch,
    ) -> Result<Option<BoreholeId>, CatalogError> {
        require_non_empty_if_present(patch.name.as_deref(), "Borehole name")?;

        if let Some(number) = patch.number {
            if let Some(current) = self.boreholes.get_borehole(id).await? {
                let clash = current.number != number
                    && self
                        .boreholes
                        .find_by_number(current.well_id, number, Some(id))
                        .await?
                        .is_some();
                if clash {
                    tracing::debug!(borehole_id = %id, number, "Borehole number already in use");
                    return Ok(None);
                }
            }
        }

        self.boreholes.update_borehole(id, &patch).await?;
        Ok(Some(id))
    }

    pub async fn delete_borehole(&self, ids: &[BoreholeId]) -> Result<(), CatalogError> {
        for &id in ids {
            self.boreholes.delete_borehole(id).await?;
        }
        tracing::info!(count = ids.len(), "Boreholes deleted");
        Ok(())
    }

    /// The borehole with its well and the well cluster's ancestry.
    pub async fn get_borehole_full_info(
        &self,
        locations: &mut LocationDirectory,
        id: BoreholeId,
    ) -> Result<Option<BoreholeFullInfo>, CatalogError> {
        let Some(borehole) = self.boreholes.get_borehole(id).await? else {
            return Ok(None);
        };

        let well = self.wells.get_well(borehole.well_id).await?;
        let hierarchy = match &well {
            Some(well) => owned_hierarchy(locations, well.cluster_id).await?,
            None => Vec::new(),
        };

        Ok(Some(BoreholeFullInfo {
            borehole,
            well,
            hierarchy,
        }))
    }
}
