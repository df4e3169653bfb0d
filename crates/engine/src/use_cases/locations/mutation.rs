//! Write operations. Each invalidates the cache once its writes succeed.

use fieldreg_domain::{LocationId, LocationPatch, LocationType, NewLocation};

use super::LocationDirectory;
use crate::infrastructure::ports::RepoError;
use crate::use_cases::validation::{base_code, require_non_empty};
use crate::use_cases::CatalogError;

impl LocationDirectory {
    /// Insert a location and return its id.
    ///
    /// A missing code is derived from the name; either way the code is made
    /// unique by appending `_1`, `_2`, … A missing or zero position becomes
    /// the new id, which keeps later siblings after earlier ones.
    pub async fn add_location(
        &mut self,
        mut location: NewLocation,
    ) -> Result<LocationId, CatalogError> {
        require_non_empty(&location.name, "Location name")?;
        let base = base_code(location.code.as_deref(), &location.name, "Location code")?;
        let code = self.unique_code(&base, None).await?;

        let position_from_id = matches!(location.position, None | Some(0));
        location.code = Some(code);
        let id = self.repo.insert_location(&location).await?;
        if position_from_id {
            self.repo.set_position(id, id.get()).await?;
        }

        self.cache.invalidate();
        tracing::info!(
            location_id = %id,
            location_type = %location.location_type,
            code = location.code.as_deref().unwrap_or_default(),
            "Location added"
        );
        Ok(id)
    }

    /// Apply `patch` to one location.
    ///
    /// A changed code is disambiguated against every other location; the
    /// location's own current code never counts as a collision. A blank code
    /// is derived again from the patched name, or the current one. Updating
    /// an unknown id is a no-op at the store.
    pub async fn update_location(
        &mut self,
        id: LocationId,
        mut patch: LocationPatch,
    ) -> Result<LocationId, CatalogError> {
        if let Some(name) = &patch.name {
            require_non_empty(name, "Location name")?;
        }
        if let Some(code) = patch.code.take() {
            let current = self
                .forest()
                .await?
                .get(id)
                .map(|l| (l.code.clone(), l.name.clone()));
            let name = match (&patch.name, &current) {
                (Some(name), _) => name.as_str(),
                (None, Some((_, name))) => name.as_str(),
                (None, None) => "",
            };
            let code = base_code(Some(&code), name, "Location code")?;
            let current_code = current.as_ref().map(|(code, _)| code.as_str());
            patch.code = Some(if current_code == Some(code.as_str()) {
                code
            } else {
                self.unique_code(&code, Some(id)).await?
            });
        }

        if !patch.is_empty() {
            self.repo.update_location(id, &patch).await?;
        }

        self.cache.invalidate();
        tracing::info!(location_id = %id, "Location updated");
        Ok(id)
    }

    /// Delete each location together with its direct children.
    ///
    /// Grandchildren are left in place; their parent no longer exists, so the
    /// next load promotes them to roots. Ids that are not loaded are skipped.
    pub async fn delete_location(&mut self, ids: &[LocationId]) -> Result<(), CatalogError> {
        let mut deleted = 0;
        for &id in ids {
            let children = match self.forest().await?.get(id) {
                Some(location) => location.children.clone(),
                None => continue,
            };
            if !children.is_empty() {
                deleted += self.repo.delete_locations(&children).await?;
            }
            deleted += self.repo.delete_locations(&[id]).await?;
        }

        self.cache.invalidate();
        tracing::info!(requested = ids.len(), deleted, "Locations deleted");
        Ok(())
    }

    /// Whether a location of `location_type` may sit under `parent_id`.
    ///
    /// Organizations must be roots; every other known type needs a parent of
    /// the type directly above it. Unknown types and unknown parents are
    /// never valid. Does not consult the cache when there is no parent.
    pub async fn validate_hierarchy(
        &mut self,
        parent_id: Option<LocationId>,
        location_type: LocationType,
    ) -> Result<bool, RepoError> {
        let Some(rule) = location_type.parent_rule() else {
            return Ok(false);
        };
        let parent_type = match parent_id {
            None => None,
            Some(parent_id) => match self.get_location(parent_id).await? {
                Some(parent) => Some(parent.location_type),
                None => return Ok(false),
            },
        };
        Ok(rule.admits(parent_type))
    }

    async fn unique_code(
        &mut self,
        base: &str,
        owner: Option<LocationId>,
    ) -> Result<String, RepoError> {
        let forest = self.forest().await?;
        let code = fieldreg_domain::code_candidates(base)
            .find(|candidate| {
                !matches!(
                    forest.find_by_code(candidate),
                    Some(existing) if Some(existing.id) != owner
                )
            })
            .unwrap_or_else(|| base.to_string());
        Ok(code)
    }
}
