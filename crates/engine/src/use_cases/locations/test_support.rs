//! Fixtures for location use case tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use fieldreg_domain::{slugify, Location, LocationId, LocationPatch, LocationType, NewLocation};

use crate::infrastructure::ports::{LocationRepo, RepoError};

pub fn id(raw: i64) -> LocationId {
    LocationId::new(raw).expect("positive id")
}

pub fn location(raw_id: i64, parent: Option<i64>, location_type: LocationType, name: &str) -> Location {
    let mut location = Location::new(id(raw_id), location_type, slugify(name), name);
    location.parent_id = parent.map(id);
    location
}

pub fn organization(raw_id: i64, name: &str) -> Location {
    location(raw_id, None, LocationType::Organization, name)
}

pub fn tpp(raw_id: i64, parent: i64, name: &str) -> Location {
    location(raw_id, Some(parent), LocationType::Tpp, name)
}

pub fn cdng(raw_id: i64, parent: i64, name: &str) -> Location {
    location(raw_id, Some(parent), LocationType::Cdng, name)
}

pub fn field(raw_id: i64, parent: i64, name: &str) -> Location {
    location(raw_id, Some(parent), LocationType::Field, name)
}

pub fn cluster(raw_id: i64, parent: i64, name: &str) -> Location {
    location(raw_id, Some(parent), LocationType::Cluster, name)
}

/// A location table in memory, for tests that need writes to show up in the
/// next load.
#[derive(Default)]
pub struct InMemoryLocationRepo {
    rows: Mutex<Vec<Location>>,
    loads: AtomicUsize,
}

impl InMemoryLocationRepo {
    pub fn with_rows(rows: Vec<Location>) -> Self {
        Self {
            rows: Mutex::new(rows),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn row(&self, id: LocationId) -> Option<Location> {
        self.rows
            .lock()
            .expect("rows lock")
            .iter()
            .find(|row| row.id == id)
            .cloned()
    }

    pub fn ids(&self) -> Vec<LocationId> {
        let mut ids: Vec<LocationId> = self
            .rows
            .lock()
            .expect("rows lock")
            .iter()
            .map(|row| row.id)
            .collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl LocationRepo for InMemoryLocationRepo {
    async fn list_locations(&self) -> Result<Vec<Location>, RepoError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.lock().expect("rows lock").clone())
    }

    async fn insert_location(&self, new: &NewLocation) -> Result<LocationId, RepoError> {
        let mut rows = self.rows.lock().expect("rows lock");
        let next = rows.iter().map(|row| row.id.get()).max().unwrap_or(0) + 1;
        let mut location = Location::new(
            id(next),
            new.location_type,
            new.code.clone().expect("resolved code"),
            new.name.clone(),
        );
        location.parent_id = new.parent_id;
        location.position = new.position.unwrap_or(0);
        location.coordinates = new.coordinates.clone();
        location.description = new.description.clone();
        location.extra = new.extra.clone();
        rows.push(location);
        Ok(id(next))
    }

    async fn set_position(&self, id: LocationId, position: i64) -> Result<u64, RepoError> {
        let mut rows = self.rows.lock().expect("rows lock");
        match rows.iter_mut().find(|row| row.id == id) {
            Some(row) => {
                row.position = position;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn update_location(
        &self,
        id: LocationId,
        patch: &LocationPatch,
    ) -> Result<u64, RepoError> {
        let mut rows = self.rows.lock().expect("rows lock");
        let Some(row) = rows.iter_mut().find(|row| row.id == id) else {
            return Ok(0);
        };
        if let Some(parent_id) = patch.parent_id {
            row.parent_id = parent_id;
        }
        if let Some(location_type) = patch.location_type {
            row.location_type = location_type;
        }
        if let Some(name) = &patch.name {
            row.name = name.clone();
        }
        if let Some(code) = &patch.code {
            row.code = code.clone();
        }
        if let Some(position) = patch.position {
            row.position = position;
        }
        if let Some(coordinates) = &patch.coordinates {
            row.coordinates = coordinates.clone();
        }
        if let Some(description) = &patch.description {
            row.description = description.clone();
        }
        if let Some(extra) = &patch.extra {
            row.extra = extra.clone();
        }
        Ok(1)
    }

    async fn delete_locations(&self, ids: &[LocationId]) -> Result<u64, RepoError> {
        let mut rows = self.rows.lock().expect("rows lock");
        let before = rows.len();
        rows.retain(|row| !ids.contains(&row.id));
        Ok((before - rows.len()) as u64)
    }
}
