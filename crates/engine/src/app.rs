//! Application state and composition.

use std::sync::Arc;

use fieldreg_domain::{BoreholeFullInfo, BoreholeId, LocationId, WellFullInfo, WellId, WellWithBoreholes};

use crate::infrastructure::ports::{BoreholeRepo, LocationRepo, ParameterRepo, WellRepo};
use crate::infrastructure::sqlite::SqliteRepositories;
use crate::use_cases::{
    BoreholeCatalog, CatalogError, LocationDirectory, ParameterCatalog, WellCatalog,
};

/// Main application state.
///
/// Holds the repository ports and hands out request-scoped sessions.
pub struct App {
    pub repositories: Repositories,
}

/// Container for all repository ports.
#[derive(Clone)]
pub struct Repositories {
    pub location: Arc<dyn LocationRepo>,
    pub well: Arc<dyn WellRepo>,
    pub borehole: Arc<dyn BoreholeRepo>,
    pub parameter: Arc<dyn ParameterRepo>,
}

impl From<SqliteRepositories> for Repositories {
    fn from(repos: SqliteRepositories) -> Self {
        Self {
            location: repos.location,
            well: repos.well,
            borehole: repos.borehole,
            parameter: repos.parameter,
        }
    }
}

impl App {
    pub fn new(repositories: impl Into<Repositories>) -> Self {
        Self {
            repositories: repositories.into(),
        }
    }

    /// A fresh session with a cold location cache.
    pub fn session(&self) -> Session {
        let repos = &self.repositories;
        Session {
            locations: LocationDirectory::new(repos.location.clone()),
            wells: WellCatalog::new(repos.well.clone(), repos.borehole.clone()),
            boreholes: BoreholeCatalog::new(repos.borehole.clone(), repos.well.clone()),
            parameters: ParameterCatalog::new(repos.parameter.clone()),
        }
    }
}

/// Everything one request needs. The location cache lives exactly as long
/// as the session.
pub struct Session {
    pub locations: LocationDirectory,
    pub wells: WellCatalog,
    pub boreholes: BoreholeCatalog,
    pub parameters: ParameterCatalog,
}

impl Session {
    pub async fn wells_by_cluster(
        &mut self,
        cluster_id: LocationId,
    ) -> Result<Vec<WellWithBoreholes>, CatalogError> {
        self.wells
            .get_wells_by_cluster(&mut self.locations, cluster_id)
            .await
    }

    pub async fn well_full_info(&mut self, id: WellId) -> Result<Option<WellFullInfo>, CatalogError> {
        self.wells.get_well_full_info(&mut self.locations, id).await
    }

    pub async fn borehole_full_info(
        &mut self,
        id: BoreholeId,
    ) -> Result<Option<BoreholeFullInfo>, CatalogError> {
        self.boreholes
            .get_borehole_full_info(&mut self.locations, id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::AppConfig;
    use crate::infrastructure::sqlite;
    use fieldreg_domain::{LocationType, NewBorehole, NewLocation, NewWell};

    async fn sqlite_app() -> (tempfile::TempDir, App) {
        let temp_dir = tempfile::tempdir().expect("tempdir");
        let config = AppConfig {
            database_url: format!(
                "sqlite:{}?mode=rwc",
                temp_dir.path().join("app.db").to_string_lossy()
            ),
            max_connections: 1,
        };
        let pool = sqlite::connect(&config).await.expect("connect");
        sqlite::ensure_schema(&pool).await.expect("schema");
        (temp_dir, App::new(SqliteRepositories::new(pool)))
    }

    #[tokio::test]
    async fn sessions_do_not_share_cache_state() {
        let (_dir, app) = sqlite_app().await;

        let mut first = app.session();
        first
            .locations
            .add_location(NewLocation::new(LocationType::Organization, "Acme"))
            .await
            .expect("add");
        assert_eq!(first.locations.get_locations_tree().await.expect("tree").len(), 1);

        let second = app.session();
        assert!(!second.locations.is_loaded());
    }

    #[tokio::test]
    async fn well_full_info_end_to_end() {
        let (_dir, app) = sqlite_app().await;
        let mut session = app.session();

        let org = session
            .locations
            .add_location(NewLocation::new(LocationType::Organization, "Acme"))
            .await
            .expect("org");
        let pad = session
            .locations
            .add_location(NewLocation::new(LocationType::Cluster, "Pad 3").under(org))
            .await
            .expect("pad");
        let well = session
            .wells
            .add_well(NewWell::new(pad, "W 12"))
            .await
            .expect("well");
        session
            .boreholes
            .add_borehole(NewBorehole::new(well))
            .await
            .expect("borehole");

        let info = session
            .well_full_info(well)
            .await
            .expect("info")
            .expect("known well");
        assert_eq!(info.well.code, "w_12");
        assert_eq!(info.well.position, info.well.id.get());
        assert_eq!(info.cluster.as_ref().map(|c| c.id), Some(pad));
        assert_eq!(info.hierarchy.len(), 2);
        assert_eq!(info.boreholes.len(), 1);
        assert_eq!(info.boreholes[0].name, "W 12 Borehole 1");

        let listed = session.wells_by_cluster(pad).await.expect("by cluster");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].boreholes_count, 1);
    }
}
