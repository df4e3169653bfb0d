//! Lazily built location forest.

use fieldreg_domain::{HierarchyRepair, LocationForest};

use crate::infrastructure::ports::{LocationRepo, RepoError};

/// Holds at most one built forest. Cold until the first read, cold again
/// after [`LocationCache::invalidate`].
#[derive(Debug, Default)]
pub struct LocationCache {
    forest: Option<LocationForest>,
    loads: u64,
}

impl LocationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_warm(&self) -> bool {
        self.forest.is_some()
    }

    /// Number of full reloads performed so far.
    pub fn load_count(&self) -> u64 {
        self.loads
    }

    /// Return the cached forest, reloading everything when cold.
    ///
    /// A failed load leaves the cache cold.
    pub async fn ensure_loaded(
        &mut self,
        repo: &dyn LocationRepo,
    ) -> Result<&LocationForest, RepoError> {
        let forest = match self.forest.take() {
            Some(forest) => forest,
            None => self.load(repo).await?,
        };
        Ok(self.forest.insert(forest))
    }

    pub fn invalidate(&mut self) {
        if self.forest.take().is_some() {
            tracing::debug!("Location cache invalidated");
        }
    }

    async fn load(&mut self, repo: &dyn LocationRepo) -> Result<LocationForest, RepoError> {
        let rows = repo.list_locations().await?;
        let forest = LocationForest::build(rows);
        self.loads += 1;

        for repair in forest.repairs() {
            log_repair(repair);
        }
        tracing::debug!(
            locations = forest.len(),
            roots = forest.roots().len(),
            repairs = forest.repairs().len(),
            "Location cache loaded"
        );
        Ok(forest)
    }
}

fn log_repair(repair: &HierarchyRepair) {
    match repair {
        HierarchyRepair::SelfParent { id } => {
            tracing::warn!(location_id = %id, "Location is its own parent, treating as root");
        }
        HierarchyRepair::DanglingParent { id, missing_parent } => {
            tracing::warn!(
                location_id = %id,
                parent_id = %missing_parent,
                "Location parent does not exist, treating as root"
            );
        }
        HierarchyRepair::Cycle { members } => {
            tracing::warn!(
                ?members,
                "Location parent chain forms a cycle, members treated as roots"
            );
        }
        HierarchyRepair::DuplicateId { id } => {
            tracing::warn!(location_id = %id, "Duplicate location id, keeping first row");
        }
        HierarchyRepair::DepthExceeded { id, parent } => {
            tracing::warn!(
                location_id = %id,
                parent_id = %parent,
                "Location nested too deep, treating as root"
            );
        }
    }
}
