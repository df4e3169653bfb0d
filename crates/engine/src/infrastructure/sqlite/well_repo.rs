//! SQLite well storage.

use async_trait::async_trait;
use fieldreg_domain::{LocationId, NewWell, Well, WellFilter, WellGroupCount, WellId, WellPatch};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{column, inserted_id, non_empty, required_id};
use crate::infrastructure::ports::{RepoError, WellRepo};

const SELECT_WELLS: &str = "SELECT id, cluster_id, code, name, status, category, purpose, \
     visible, position FROM wells";

pub struct SqliteWellRepo {
    pool: SqlitePool,
}

impl SqliteWellRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_well(row: &SqliteRow) -> Result<Well, RepoError> {
    Ok(Well {
        id: required_id(column(row, "id")?, "well", WellId::new)?,
        cluster_id: required_id(column(row, "cluster_id")?, "cluster", LocationId::new)?,
        code: column(row, "code")?,
        name: column(row, "name")?,
        status: non_empty(column(row, "status")?),
        category: non_empty(column(row, "category")?),
        purpose: non_empty(column(row, "purpose")?),
        visible: column(row, "visible")?,
        position: column(row, "position")?,
    })
}

#[async_trait]
impl WellRepo for SqliteWellRepo {
    async fn get_well(&self, id: WellId) -> Result<Option<Well>, RepoError> {
        let row = sqlx::query(&format!("{SELECT_WELLS} WHERE id = ?"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_well", e))?;
        row.as_ref().map(row_to_well).transpose()
    }

    async fn get_well_by_code(&self, code: &str) -> Result<Option<Well>, RepoError> {
        let row = sqlx::query(&format!("{SELECT_WELLS} WHERE code = ? ORDER BY id LIMIT 1"))
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_well_by_code", e))?;
        row.as_ref().map(row_to_well).transpose()
    }

    async fn list_wells(&self, filter: &WellFilter) -> Result<Vec<Well>, RepoError> {
        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_WELLS);
        builder.push(" WHERE 1 = 1");
        if let Some(cluster_id) = filter.cluster_id {
            builder.push(" AND cluster_id = ").push_bind(cluster_id.get());
        }
        if let Some(status) = &filter.status {
            builder.push(" AND status = ").push_bind(status.clone());
        }
        if let Some(visible) = filter.visible {
            builder.push(" AND visible = ").push_bind(visible);
        }
        builder.push(" ORDER BY position, id");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("list_wells", e))?;
        rows.iter().map(row_to_well).collect()
    }

    async fn insert_well(&self, well: &NewWell) -> Result<WellId, RepoError> {
        let code = well
            .code
            .as_deref()
            .ok_or_else(|| RepoError::constraint("well code must be resolved before insert"))?;

        let result = sqlx::query(
            r#"
            INSERT INTO wells
                (cluster_id, code, name, status, category, purpose, visible, position)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(well.cluster_id.get())
        .bind(code)
        .bind(&well.name)
        .bind(well.status.as_deref())
        .bind(well.category.as_deref())
        .bind(well.purpose.as_deref())
        .bind(well.visible)
        .bind(well.position.unwrap_or(0))
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("insert_well", e))?;

        inserted_id(result.last_insert_rowid(), WellId::new)
    }

    async fn set_position(&self, id: WellId, position: i64) -> Result<u64, RepoError> {
        let result = sqlx::query("UPDATE wells SET position = ? WHERE id = ?")
            .bind(position)
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("set_well_position", e))?;
        Ok(result.rows_affected())
    }

    async fn update_well(&self, id: WellId, patch: &WellPatch) -> Result<u64, RepoError> {
        if patch.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE wells SET ");
        let mut set = builder.separated(", ");
        if let Some(cluster_id) = patch.cluster_id {
            set.push("cluster_id = ")
                .push_bind_unseparated(cluster_id.get());
        }
        if let Some(name) = &patch.name {
            set.push("name = ").push_bind_unseparated(name.clone());
        }
        if let Some(code) = &patch.code {
            set.push("code = ").push_bind_unseparated(code.clone());
        }
        if let Some(status) = &patch.status {
            set.push("status = ").push_bind_unseparated(status.clone());
        }
        if let Some(category) = &patch.category {
            set.push("category = ")
                .push_bind_unseparated(category.clone());
        }
        if let Some(purpose) = &patch.purpose {
            set.push("purpose = ").push_bind_unseparated(purpose.clone());
        }
        if let Some(visible) = patch.visible {
            set.push("visible = ").push_bind_unseparated(visible);
        }
        if let Some(position) = patch.position {
            set.push("position = ").push_bind_unseparated(position);
        }
        builder.push(" WHERE id = ").push_bind(id.get());

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("update_well", e))?;
        Ok(result.rows_affected())
    }

    async fn delete_well(&self, id: WellId) -> Result<u64, RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("delete_well", e))?;

        for statement in [
            "DELETE FROM boreholes WHERE well_id = ?",
            "DELETE FROM well_parameter_values WHERE well_id = ?",
        ] {
            sqlx::query(statement)
                .bind(id.get())
                .execute(&mut *tx)
                .await
                .map_err(|e| RepoError::database("delete_well", e))?;
        }

        let result = sqlx::query("DELETE FROM wells WHERE id = ?")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("delete_well", e))?;

        tx.commit()
            .await
            .map_err(|e| RepoError::database("delete_well", e))?;
        Ok(result.rows_affected())
    }

    async fn cluster_well_counts(
        &self,
        cluster_id: LocationId,
    ) -> Result<Vec<WellGroupCount>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT COUNT(*) AS total, status, category, purpose
            FROM wells
            WHERE cluster_id = ? AND visible = 1
            GROUP BY status, category, purpose
            "#,
        )
        .bind(cluster_id.get())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("cluster_well_counts", e))?;

        rows.iter()
            .map(|row| -> Result<WellGroupCount, RepoError> {
                let total: i64 = column(row, "total")?;
                Ok(WellGroupCount {
                    total: u64::try_from(total).unwrap_or(0),
                    status: column(row, "status")?,
                    category: column(row, "category")?,
                    purpose: column(row, "purpose")?,
                })
            })
            .collect()
    }
}
