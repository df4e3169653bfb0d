//! The location directory: a cached, repaired view of the location hierarchy
//! plus the writes that keep it consistent.
//!
//! A directory is request-scoped. The first read loads every row through the
//! [`LocationRepo`] and builds the forest; later reads are served from memory
//! until a successful write invalidates the cache.

use std::sync::Arc;

use fieldreg_domain::LocationForest;

use crate::infrastructure::ports::{LocationRepo, RepoError};

mod cache;
mod mutation;
mod query;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache::LocationCache;

pub struct LocationDirectory {
    repo: Arc<dyn LocationRepo>,
    cache: LocationCache,
}

impl LocationDirectory {
    pub fn new(repo: Arc<dyn LocationRepo>) -> Self {
        Self {
            repo,
            cache: LocationCache::new(),
        }
    }

    /// The built forest, loading it first when the cache is cold.
    pub async fn forest(&mut self) -> Result<&LocationForest, RepoError> {
        self.cache.ensure_loaded(self.repo.as_ref()).await
    }

    /// Drop all cached state; the next read reloads from storage.
    pub fn clear_locations_cache(&mut self) {
        self.cache.invalidate();
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.is_warm()
    }
}
