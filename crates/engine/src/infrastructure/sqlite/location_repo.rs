//! SQLite location storage.

use async_trait::async_trait;
use fieldreg_domain::{Location, LocationId, LocationPatch, LocationType, NewLocation};
use serde_json::{Map, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{column, inserted_id, non_empty};
use crate::infrastructure::ports::{LocationRepo, RepoError};

const SELECT_LOCATIONS: &str = "SELECT id, parent_id, type, code, name, position, \
     coordinates, description, extra FROM locations";

pub struct SqliteLocationRepo {
    pool: SqlitePool,
}

impl SqliteLocationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Decode a row. Rows with an unusable id are skipped rather than failing
/// the whole load; everything else is taken as stored and left for the
/// hierarchy builder to repair.
fn row_to_location(row: &SqliteRow) -> Result<Option<Location>, RepoError> {
    let raw_id: i64 = column(row, "id")?;
    let Some(id) = LocationId::new(raw_id) else {
        tracing::warn!(raw_id, "Skipping location row with invalid id");
        return Ok(None);
    };

    let parent_id = column::<Option<i64>>(row, "parent_id")?.and_then(LocationId::new);
    let location_type = LocationType::parse(&column::<String>(row, "type")?);
    if location_type == LocationType::Unknown {
        tracing::debug!(location_id = %id, "Location has an unrecognised type");
    }

    let extra = match non_empty(column(row, "extra")?) {
        Some(json) => decode_extra(id, &json),
        None => Map::new(),
    };

    Ok(Some(Location {
        id,
        parent_id,
        location_type,
        code: column(row, "code")?,
        name: column(row, "name")?,
        position: column(row, "position")?,
        coordinates: non_empty(column(row, "coordinates")?),
        description: non_empty(column(row, "description")?),
        extra,
        children: Vec::new(),
        level: 0,
    }))
}

fn decode_extra(id: LocationId, json: &str) -> Map<String, Value> {
    match serde_json::from_str::<Map<String, Value>>(json) {
        Ok(map) => map,
        Err(e) => {
            tracing::warn!(location_id = %id, error = %e, "Ignoring malformed extra attributes");
            Map::new()
        }
    }
}

/// `None` for an empty map so the column stays NULL.
fn encode_extra(extra: &Map<String, Value>) -> Result<Option<String>, RepoError> {
    if extra.is_empty() {
        return Ok(None);
    }
    serde_json::to_string(extra)
        .map(Some)
        .map_err(|e| RepoError::Serialization(e.to_string()))
}

#[async_trait]
impl LocationRepo for SqliteLocationRepo {
    async fn list_locations(&self) -> Result<Vec<Location>, RepoError> {
        let rows = sqlx::query(&format!(
            "{SELECT_LOCATIONS} ORDER BY parent_id, position, name"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("list_locations", e))?;

        let mut locations = Vec::with_capacity(rows.len());
        for row in &rows {
            if let Some(location) = row_to_location(row)? {
                locations.push(location);
            }
        }
        Ok(locations)
    }

    async fn insert_location(&self, location: &NewLocation) -> Result<LocationId, RepoError> {
        let code = location
            .code
            .as_deref()
            .ok_or_else(|| RepoError::constraint("location code must be resolved before insert"))?;
        let extra = encode_extra(&location.extra)?;

        let result = sqlx::query(
            r#"
            INSERT INTO locations
                (parent_id, type, code, name, position, coordinates, description, extra)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(location.parent_id.map(LocationId::get))
        .bind(location.location_type.as_str())
        .bind(code)
        .bind(&location.name)
        .bind(location.position.unwrap_or(0))
        .bind(location.coordinates.as_deref())
        .bind(location.description.as_deref())
        .bind(extra)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("insert_location", e))?;

        inserted_id(result.last_insert_rowid(), LocationId::new)
    }

    async fn set_position(&self, id: LocationId, position: i64) -> Result<u64, RepoError> {
        let result = sqlx::query("UPDATE locations SET position = ? WHERE id = ?")
            .bind(position)
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("set_location_position", e))?;
        Ok(result.rows_affected())
    }

    async fn update_location(
        &self,
        id: LocationId,
        patch: &LocationPatch,
    ) -> Result<u64, RepoError> {
        if patch.is_empty() {
            return Ok(0);
        }
        let extra = patch.extra.as_ref().map(encode_extra).transpose()?;

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE locations SET ");
        let mut set = builder.separated(", ");
        if let Some(parent_id) = patch.parent_id {
            set.push("parent_id = ")
                .push_bind_unseparated(parent_id.map(LocationId::get));
        }
        if let Some(location_type) = patch.location_type {
            set.push("type = ")
                .push_bind_unseparated(location_type.as_str());
        }
        if let Some(name) = &patch.name {
            set.push("name = ").push_bind_unseparated(name.clone());
        }
        if let Some(code) = &patch.code {
            set.push("code = ").push_bind_unseparated(code.clone());
        }
        if let Some(position) = patch.position {
            set.push("position = ").push_bind_unseparated(position);
        }
        if let Some(coordinates) = &patch.coordinates {
            set.push("coordinates = ")
                .push_bind_unseparated(coordinates.clone());
        }
        if let Some(description) = &patch.description {
            set.push("description = ")
                .push_bind_unseparated(description.clone());
        }
        if let Some(extra) = extra {
            set.push("extra = ").push_bind_unseparated(extra);
        }
        builder.push(" WHERE id = ").push_bind(id.get());

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("update_location", e))?;
        Ok(result.rows_affected())
    }

    async fn delete_locations(&self, ids: &[LocationId]) -> Result<u64, RepoError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::<Sqlite>::new("DELETE FROM locations WHERE id IN (");
        let mut list = builder.separated(", ");
        for id in ids {
            list.push_bind(id.get());
        }
        list.push_unseparated(")");

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("delete_locations", e))?;
        Ok(result.rows_affected())
    }
}
