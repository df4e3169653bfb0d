//! Read operations. Every one warms the cache first.

use fieldreg_domain::{Location, LocationFilter, LocationId, LocationNode, LocationType};

use super::LocationDirectory;
use crate::infrastructure::ports::RepoError;

impl LocationDirectory {
    /// Locations in load order, narrowed by one filter dimension.
    ///
    /// A type filter takes precedence over a parent filter; see
    /// [`LocationFilter`].
    pub async fn get_locations(
        &mut self,
        filter: &LocationFilter,
    ) -> Result<Vec<&Location>, RepoError> {
        Ok(self.forest().await?.filter(filter))
    }

    pub async fn get_location(&mut self, id: LocationId) -> Result<Option<&Location>, RepoError> {
        Ok(self.forest().await?.get(id))
    }

    /// Look up an id that has not been validated yet. Zero, negative and
    /// non-numeric input is simply not found.
    pub async fn get_location_by_raw_id(
        &mut self,
        raw: &str,
    ) -> Result<Option<&Location>, RepoError> {
        let forest = self.forest().await?;
        Ok(raw.parse::<LocationId>().ok().and_then(|id| forest.get(id)))
    }

    /// First location in load order with exactly this code.
    pub async fn get_location_by_code(
        &mut self,
        code: &str,
    ) -> Result<Option<&Location>, RepoError> {
        Ok(self.forest().await?.find_by_code(code))
    }

    pub async fn get_locations_tree(&mut self) -> Result<&[LocationNode], RepoError> {
        Ok(self.forest().await?.roots())
    }

    /// Root-first chain ending with `id`; `None` when `id` is unknown.
    pub async fn get_location_hierarchy(
        &mut self,
        id: LocationId,
    ) -> Result<Option<Vec<&Location>>, RepoError> {
        Ok(self.forest().await?.ancestry(id))
    }

    pub async fn get_locations_by_type(
        &mut self,
        location_type: LocationType,
    ) -> Result<Vec<&Location>, RepoError> {
        Ok(self.forest().await?.by_type(location_type))
    }

    /// Organizations sitting at the top of the hierarchy.
    pub async fn get_organizations(&mut self) -> Result<Vec<&Location>, RepoError> {
        Ok(self
            .forest()
            .await?
            .by_type(LocationType::Organization)
            .into_iter()
            .filter(|location| location.is_root())
            .collect())
    }

    pub async fn get_clusters_by_field(
        &mut self,
        field_id: LocationId,
    ) -> Result<Vec<&Location>, RepoError> {
        Ok(self
            .forest()
            .await?
            .children_of(field_id)
            .into_iter()
            .filter(|location| location.location_type == LocationType::Cluster)
            .collect())
    }

    /// Clusters that can be placed on a map.
    pub async fn get_clusters_with_coordinates(&mut self) -> Result<Vec<&Location>, RepoError> {
        Ok(self
            .forest()
            .await?
            .by_type(LocationType::Cluster)
            .into_iter()
            .filter(|location| location.has_coordinates())
            .collect())
    }
}
