//! SQLite implementations of the repository ports.

use std::sync::Arc;

use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, SqlitePool};

use crate::infrastructure::config::AppConfig;
use crate::infrastructure::ports::RepoError;

mod borehole_repo;
mod location_repo;
mod parameter_repo;
mod schema;
mod well_repo;

#[cfg(test)]
mod integration_tests;

pub use borehole_repo::SqliteBoreholeRepo;
pub use location_repo::SqliteLocationRepo;
pub use parameter_repo::SqliteParameterRepo;
pub use schema::ensure_schema;
pub use well_repo::SqliteWellRepo;

/// Open the connection pool described by `config`.
pub async fn connect(config: &AppConfig) -> Result<SqlitePool, RepoError> {
    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .map_err(|e| RepoError::database("connect", e))
}

/// Create all SQLite repositories from a pool.
pub struct SqliteRepositories {
    pub location: Arc<SqliteLocationRepo>,
    pub well: Arc<SqliteWellRepo>,
    pub borehole: Arc<SqliteBoreholeRepo>,
    pub parameter: Arc<SqliteParameterRepo>,
}

impl SqliteRepositories {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            location: Arc::new(SqliteLocationRepo::new(pool.clone())),
            well: Arc::new(SqliteWellRepo::new(pool.clone())),
            borehole: Arc::new(SqliteBoreholeRepo::new(pool.clone())),
            parameter: Arc::new(SqliteParameterRepo::new(pool)),
        }
    }
}

/// Decode one column, reporting type mismatches as serialization errors.
fn column<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T, RepoError>
where
    T: sqlx::Decode<'r, Sqlite> + sqlx::Type<Sqlite>,
{
    row.try_get(name)
        .map_err(|e| RepoError::serialization(format!("column {name}: {e}")))
}

/// Optional text column that treats empty strings like NULL.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Map a stored id column to a typed id, rejecting zero and negatives.
fn required_id<T>(
    raw: i64,
    entity_type: &'static str,
    parse: impl FnOnce(i64) -> Option<T>,
) -> Result<T, RepoError> {
    parse(raw).ok_or_else(|| RepoError::serialization(format!("invalid {entity_type} id {raw}")))
}

/// The rowid of a fresh insert as a typed id.
fn inserted_id<T>(rowid: i64, parse: impl FnOnce(i64) -> Option<T>) -> Result<T, RepoError> {
    parse(rowid).ok_or_else(|| RepoError::constraint("insert returned no row id"))
}
