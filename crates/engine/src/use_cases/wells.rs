//! Well catalog: CRUD plus views decorated with boreholes and the cluster's
//! place in the location hierarchy.

use std::sync::Arc;

use fieldreg_domain::{
    ClusterStatistics, Location, LocationId, NewWell, Well, WellFilter, WellFullInfo, WellId,
    WellPatch, WellWithBoreholes,
};

use super::locations::LocationDirectory;
use super::validation::{base_code, require_non_empty};
use super::{first_free_code, CatalogError};
use crate::infrastructure::ports::{BoreholeRepo, RepoError, WellRepo};

pub struct WellCatalog {
    wells: Arc<dyn WellRepo>,
    boreholes: Arc<dyn BoreholeRepo>,
}

impl WellCatalog {
    pub fn new(wells: Arc<dyn WellRepo>, boreholes: Arc<dyn BoreholeRepo>) -> Self {
        Self { wells, boreholes }
    }

    pub async fn get_well(&self, id: WellId) -> Result<Option<Well>, CatalogError> {
        Ok(self.wells.get_well(id).await?)
    }

    pub async fn get_wells(&self, filter: &WellFilter) -> Result<Vec<Well>, CatalogError> {
        Ok(self.wells.list_wells(filter).await?)
    }

    pub async fn get_well_by_code(&self, code: &str) -> Result<Option<Well>, CatalogError> {
        Ok(self.wells.get_well_by_code(code).await?)
    }

    pub async fn add_well(&self, mut well: NewWell) -> Result<WellId, CatalogError> {
        require_non_empty(&well.name, "Well name")?;
        let base = base_code(well.code.as_deref(), &well.name, "Well code")?;
        well.code = Some(self.unique_code(&base, None).await?);

        let position_from_id = matches!(well.position, None | Some(0));
        let id = self.wells.insert_well(&well).await?;
        if position_from_id {
            self.wells.set_position(id, id.get()).await?;
        }

        tracing::info!(well_id = %id, cluster_id = %well.cluster_id, "Well added");
        Ok(id)
    }

    pub async fn update_well(&self, id: WellId, mut patch: WellPatch) -> Result<WellId, CatalogError> {
        if let Some(name) = &patch.name {
            require_non_empty(name, "Well name")?;
        }
        if let Some(code) = patch.code.take() {
            require_non_empty(&code, "Well code")?;
            patch.code = Some(self.unique_code(code.trim(), Some(id)).await?);
        }

        if !patch.is_empty() {
            self.wells.update_well(id, &patch).await?;
        }
        tracing::info!(well_id = %id, "Well updated");
        Ok(id)
    }

    /// Delete wells along with their boreholes and parameter values.
    pub async fn delete_well(&self, ids: &[WellId]) -> Result<(), CatalogError> {
        for &id in ids {
            let deleted = self.wells.delete_well(id).await?;
            tracing::info!(well_id = %id, deleted, "Well deleted");
        }
        Ok(())
    }

    /// Wells of a cluster, each with its boreholes and the cluster's
    /// root-first ancestry.
    pub async fn get_wells_by_cluster(
        &self,
        locations: &mut LocationDirectory,
        cluster_id: LocationId,
    ) -> Result<Vec<WellWithBoreholes>, CatalogError> {
        let wells = self.wells.list_wells(&WellFilter::in_cluster(cluster_id)).await?;
        let location_hierarchy = owned_hierarchy(locations, cluster_id).await?;

        let mut decorated = Vec::with_capacity(wells.len());
        for well in wells {
            let boreholes = self.boreholes.list_by_well(well.id).await?;
            decorated.push(WellWithBoreholes {
                well,
                boreholes_count: boreholes.len(),
                boreholes,
                location_hierarchy: location_hierarchy.clone(),
            });
        }
        Ok(decorated)
    }

    pub async fn get_well_full_info(
        &self,
        locations: &mut LocationDirectory,
        id: WellId,
    ) -> Result<Option<WellFullInfo>, CatalogError> {
        let Some(well) = self.wells.get_well(id).await? else {
            return Ok(None);
        };

        let cluster = locations.get_location(well.cluster_id).await?.cloned();
        let hierarchy = owned_hierarchy(locations, well.cluster_id).await?;
        let boreholes = self.boreholes.list_by_well(id).await?;

        Ok(Some(WellFullInfo {
            well,
            cluster,
            hierarchy,
            boreholes,
        }))
    }

    /// Visible-well counts for a cluster by status, category and purpose.
    pub async fn get_cluster_statistics(
        &self,
        cluster_id: LocationId,
    ) -> Result<ClusterStatistics, CatalogError> {
        let counts = self.wells.cluster_well_counts(cluster_id).await?;
        Ok(ClusterStatistics::from_counts(counts))
    }

    async fn unique_code(&self, base: &str, owner: Option<WellId>) -> Result<String, RepoError> {
        let wells = &self.wells;
        first_free_code(base, |candidate| async move {
            let existing = wells.get_well_by_code(&candidate).await?;
            Ok::<_, RepoError>(existing.is_some_and(|existing| Some(existing.id) != owner))
        })
        .await
    }
}

/// Ancestry of `id` as owned rows; empty when `id` is not a loaded location.
pub(crate) async fn owned_hierarchy(
    locations: &mut LocationDirectory,
    id: LocationId,
) -> Result<Vec<Location>, RepoError> {
    Ok(locations
        .get_location_hierarchy(id)
        .await?
        .map(|chain| chain.into_iter().cloned().collect())
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockBoreholeRepo, MockLocationRepo, MockWellRepo};
    use crate::use_cases::locations::test_support::{cluster, field, id, organization};
    use fieldreg_domain::{Borehole, BoreholeId, WellGroupCount};
    use mockall::predicate::*;

    fn well_id(raw: i64) -> WellId {
        WellId::new(raw).expect("positive id")
    }

    fn well(raw: i64, cluster: i64, name: &str) -> Well {
        Well {
            id: well_id(raw),
            cluster_id: id(cluster),
            code: name.to_lowercase(),
            name: name.to_string(),
            status: None,
            category: None,
            purpose: None,
            visible: true,
            position: raw,
        }
    }

    fn borehole(raw: i64, well: i64, number: i64) -> Borehole {
        Borehole {
            id: BoreholeId::new(raw).expect("positive id"),
            well_id: well_id(well),
            number,
            name: format!("Borehole {number}"),
        }
    }

    fn directory() -> LocationDirectory {
        let mut repo = MockLocationRepo::new();
        repo.expect_list_locations().times(1).returning(|| {
            Ok(vec![
                organization(1, "Acme"),
                field(2, 1, "North"),
                cluster(3, 2, "Pad 1"),
            ])
        });
        LocationDirectory::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn add_well_derives_code_and_position() {
        let mut wells = MockWellRepo::new();
        wells
            .expect_get_well_by_code()
            .with(eq("w_101"))
            .returning(|_| Ok(Some(well(9, 3, "W_101"))));
        wells
            .expect_get_well_by_code()
            .with(eq("w_101_1"))
            .returning(|_| Ok(None));
        wells
            .expect_insert_well()
            .withf(|well: &NewWell| well.code.as_deref() == Some("w_101_1"))
            .returning(|_| Ok(well_id(10)));
        wells
            .expect_set_position()
            .with(eq(well_id(10)), eq(10_i64))
            .times(1)
            .returning(|_, _| Ok(1));

        let catalog = WellCatalog::new(Arc::new(wells), Arc::new(MockBoreholeRepo::new()));
        let id = catalog
            .add_well(NewWell::new(id(3), "W 101"))
            .await
            .expect("add");
        assert_eq!(id, well_id(10));
    }

    #[tokio::test]
    async fn add_well_rejects_blank_name() {
        let catalog = WellCatalog::new(
            Arc::new(MockWellRepo::new()),
            Arc::new(MockBoreholeRepo::new()),
        );
        let err = catalog
            .add_well(NewWell::new(id(3), " "))
            .await
            .expect_err("blank");
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[tokio::test]
    async fn update_keeps_own_code() {
        let mut wells = MockWellRepo::new();
        wells
            .expect_get_well_by_code()
            .with(eq("w1"))
            .returning(|_| Ok(Some(well(1, 3, "W1"))));
        wells
            .expect_update_well()
            .withf(|_, patch: &WellPatch| patch.code.as_deref() == Some("w1"))
            .times(1)
            .returning(|_, _| Ok(1));

        let catalog = WellCatalog::new(Arc::new(wells), Arc::new(MockBoreholeRepo::new()));
        let patch = WellPatch {
            code: Some("w1".to_string()),
            ..WellPatch::default()
        };
        catalog.update_well(well_id(1), patch).await.expect("update");
    }

    #[tokio::test]
    async fn wells_by_cluster_are_decorated() {
        let mut wells = MockWellRepo::new();
        wells
            .expect_list_wells()
            .withf(|filter: &WellFilter| filter.cluster_id == Some(id(3)))
            .returning(|_| Ok(vec![well(1, 3, "W1"), well(2, 3, "W2")]));
        let mut boreholes = MockBoreholeRepo::new();
        boreholes
            .expect_list_by_well()
            .with(eq(well_id(1)))
            .returning(|_| Ok(vec![borehole(1, 1, 1), borehole(2, 1, 2)]));
        boreholes
            .expect_list_by_well()
            .with(eq(well_id(2)))
            .returning(|_| Ok(Vec::new()));

        let catalog = WellCatalog::new(Arc::new(wells), Arc::new(boreholes));
        let mut locations = directory();
        let decorated = catalog
            .get_wells_by_cluster(&mut locations, id(3))
            .await
            .expect("wells");

        assert_eq!(decorated.len(), 2);
        assert_eq!(decorated[0].boreholes_count, 2);
        assert_eq!(decorated[1].boreholes_count, 0);
        let chain: Vec<&str> = decorated[0]
            .location_hierarchy
            .iter()
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(chain, vec!["Acme", "North", "Pad 1"]);
    }

    #[tokio::test]
    async fn full_info_for_unknown_well_is_none() {
        let mut wells = MockWellRepo::new();
        wells.expect_get_well().returning(|_| Ok(None));

        let catalog = WellCatalog::new(Arc::new(wells), Arc::new(MockBoreholeRepo::new()));
        let mut locations = LocationDirectory::new(Arc::new(MockLocationRepo::new()));
        let info = catalog
            .get_well_full_info(&mut locations, well_id(5))
            .await
            .expect("info");
        assert!(info.is_none());
        assert!(!locations.is_loaded());
    }

    #[tokio::test]
    async fn full_info_with_missing_cluster_has_empty_hierarchy() {
        let mut wells = MockWellRepo::new();
        wells
            .expect_get_well()
            .returning(|_| Ok(Some(well(1, 77, "Stray"))));
        let mut boreholes = MockBoreholeRepo::new();
        boreholes.expect_list_by_well().returning(|_| Ok(Vec::new()));

        let catalog = WellCatalog::new(Arc::new(wells), Arc::new(boreholes));
        let mut locations = directory();
        let info = catalog
            .get_well_full_info(&mut locations, well_id(1))
            .await
            .expect("info")
            .expect("known well");
        assert!(info.cluster.is_none());
        assert!(info.hierarchy.is_empty());
    }

    #[tokio::test]
    async fn delete_removes_each_well() {
        let mut wells = MockWellRepo::new();
        wells.expect_delete_well().times(2).returning(|_| Ok(1));

        let catalog = WellCatalog::new(Arc::new(wells), Arc::new(MockBoreholeRepo::new()));
        catalog
            .delete_well(&[well_id(1), well_id(2)])
            .await
            .expect("delete");
    }

    #[tokio::test]
    async fn cluster_statistics_fold_counts() {
        let mut wells = MockWellRepo::new();
        wells
            .expect_cluster_well_counts()
            .with(eq(id(3)))
            .returning(|_| {
                Ok(vec![WellGroupCount {
                    total: 4,
                    status: Some("active".to_string()),
                    category: None,
                    purpose: Some(String::new()),
                }])
            });

        let catalog = WellCatalog::new(Arc::new(wells), Arc::new(MockBoreholeRepo::new()));
        let stats = catalog.get_cluster_statistics(id(3)).await.expect("stats");
        assert_eq!(stats.total_wells, 4);
        assert_eq!(stats.by_status.get("active"), Some(&4));
        assert!(stats.by_purpose.is_empty());
    }
}
