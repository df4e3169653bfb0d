//! Table definitions, created on startup when missing.
//!
//! No foreign keys: rows are edited by hand in the field and the location
//! loader is expected to cope with dangling parents instead of rejecting them.

use sqlx::SqlitePool;

use crate::infrastructure::ports::RepoError;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS locations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        parent_id INTEGER,
        type TEXT NOT NULL,
        code TEXT NOT NULL,
        name TEXT NOT NULL,
        position INTEGER NOT NULL DEFAULT 0,
        coordinates TEXT,
        description TEXT,
        extra TEXT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_locations_parent ON locations (parent_id, position, name)",
    "CREATE INDEX IF NOT EXISTS idx_locations_code ON locations (code)",
    r#"
    CREATE TABLE IF NOT EXISTS wells (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        cluster_id INTEGER NOT NULL,
        code TEXT NOT NULL,
        name TEXT NOT NULL,
        status TEXT,
        category TEXT,
        purpose TEXT,
        visible INTEGER NOT NULL DEFAULT 1,
        position INTEGER NOT NULL DEFAULT 0
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_wells_cluster ON wells (cluster_id, position, name)",
    "CREATE INDEX IF NOT EXISTS idx_wells_code ON wells (code)",
    r#"
    CREATE TABLE IF NOT EXISTS boreholes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        well_id INTEGER NOT NULL,
        number INTEGER NOT NULL,
        name TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_boreholes_well ON boreholes (well_id, number)",
    r#"
    CREATE TABLE IF NOT EXISTS parameter_groups (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        code TEXT NOT NULL,
        name TEXT NOT NULL,
        sort_order INTEGER NOT NULL DEFAULT 0,
        is_active INTEGER NOT NULL DEFAULT 1
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS parameters (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        group_id INTEGER,
        code TEXT NOT NULL,
        name TEXT NOT NULL,
        data_type TEXT NOT NULL,
        unit TEXT,
        sort_order INTEGER NOT NULL DEFAULT 0,
        is_active INTEGER NOT NULL DEFAULT 1
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS well_parameter_values (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        well_id INTEGER NOT NULL,
        parameter_id INTEGER NOT NULL,
        value_string TEXT,
        value_integer INTEGER,
        value_decimal REAL,
        value_boolean INTEGER,
        value_date TEXT,
        UNIQUE (well_id, parameter_id)
    )
    "#,
];

/// Create every table and index the repositories use.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepoError> {
    for statement in STATEMENTS {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| RepoError::database("ensure_schema", e))?;
    }
    tracing::debug!(statements = STATEMENTS.len(), "SQLite schema ensured");
    Ok(())
}
