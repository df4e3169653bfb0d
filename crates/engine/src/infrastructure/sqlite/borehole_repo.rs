//! SQLite borehole storage.

use async_trait::async_trait;
use fieldreg_domain::{Borehole, BoreholeId, BoreholePatch, NewBorehole, WellId};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{column, inserted_id, required_id};
use crate::infrastructure::ports::{BoreholeRepo, RepoError};

pub struct SqliteBoreholeRepo {
    pool: SqlitePool,
}

impl SqliteBoreholeRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_borehole(row: &SqliteRow) -> Result<Borehole, RepoError> {
    Ok(Borehole {
        id: required_id(column(row, "id")?, "borehole", BoreholeId::new)?,
        well_id: required_id(column(row, "well_id")?, "well", WellId::new)?,
        number: column(row, "number")?,
        name: column(row, "name")?,
    })
}

#[async_trait]
impl BoreholeRepo for SqliteBoreholeRepo {
    async fn get_borehole(&self, id: BoreholeId) -> Result<Option<Borehole>, RepoError> {
        let row = sqlx::query("SELECT id, well_id, number, name FROM boreholes WHERE id = ?")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_borehole", e))?;
        row.as_ref().map(row_to_borehole).transpose()
    }

    async fn list_by_well(&self, well_id: WellId) -> Result<Vec<Borehole>, RepoError> {
        let rows = sqlx::query(
            "SELECT id, well_id, number, name FROM boreholes WHERE well_id = ? ORDER BY number, id",
        )
        .bind(well_id.get())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("list_boreholes", e))?;
        rows.iter().map(row_to_borehole).collect()
    }

    async fn find_by_number(
        &self,
        well_id: WellId,
        number: i64,
        exclude: Option<BoreholeId>,
    ) -> Result<Option<BoreholeId>, RepoError> {
        let raw: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT id FROM boreholes
            WHERE well_id = ? AND number = ? AND (? IS NULL OR id != ?)
            LIMIT 1
            "#,
        )
        .bind(well_id.get())
        .bind(number)
        .bind(exclude.map(BoreholeId::get))
        .bind(exclude.map(BoreholeId::get))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("find_borehole_by_number", e))?;
        Ok(raw.and_then(BoreholeId::new))
    }

    async fn insert_borehole(&self, borehole: &NewBorehole) -> Result<BoreholeId, RepoError> {
        let (Some(number), Some(name)) = (borehole.number, borehole.name.as_deref()) else {
            return Err(RepoError::constraint(
                "borehole number and name must be resolved before insert",
            ));
        };

        let result = sqlx::query("INSERT INTO boreholes (well_id, number, name) VALUES (?, ?, ?)")
            .bind(borehole.well_id.get())
            .bind(number)
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("insert_borehole", e))?;

        inserted_id(result.last_insert_rowid(), BoreholeId::new)
    }

    async fn update_borehole(
        &self,
        id: BoreholeId,
        patch: &BoreholePatch,
    ) -> Result<u64, RepoError> {
        if patch.number.is_none() && patch.name.is_none() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE boreholes SET ");
        let mut set = builder.separated(", ");
        if let Some(number) = patch.number {
            set.push("number = ").push_bind_unseparated(number);
        }
        if let Some(name) = &patch.name {
            set.push("name = ").push_bind_unseparated(name.clone());
        }
        builder.push(" WHERE id = ").push_bind(id.get());

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("update_borehole", e))?;
        Ok(result.rows_affected())
    }

    async fn delete_borehole(&self, id: BoreholeId) -> Result<u64, RepoError> {
        let result = sqlx::query("DELETE FROM boreholes WHERE id = ?")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("delete_borehole", e))?;
        Ok(result.rows_affected())
    }
}
