//! SQLite storage for parameter groups, parameter definitions and per-well
//! values.
//!
//! Values keep one column per data type. Only the column matching the
//! parameter's declared type is read; an upsert writes that column and clears
//! the others.

use async_trait::async_trait;
use chrono::NaiveDate;
use fieldreg_domain::value_objects::DATE_FORMAT;
use fieldreg_domain::{
    DataType, NewParameter, NewParameterGroup, Parameter, ParameterFilter, ParameterGroup,
    ParameterGroupId, ParameterGroupPatch, ParameterId, ParameterPatch, ParameterValue,
    ParameterValueId, WellId, WellParameterReading,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{column, inserted_id, non_empty, required_id};
use crate::infrastructure::ports::{ParameterRepo, RepoError};

const SELECT_GROUPS: &str =
    "SELECT id, code, name, sort_order, is_active FROM parameter_groups";

const SELECT_PARAMETERS: &str = r#"
    SELECT p.id, p.group_id, p.code, p.name, p.data_type, p.unit, p.sort_order, p.is_active,
           g.name AS group_name, g.code AS group_code
    FROM parameters p
    LEFT JOIN parameter_groups g ON g.id = p.group_id
"#;

pub struct SqliteParameterRepo {
    pool: SqlitePool,
}

impl SqliteParameterRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_group(row: &SqliteRow) -> Result<ParameterGroup, RepoError> {
    Ok(ParameterGroup {
        id: required_id(column(row, "id")?, "parameter group", ParameterGroupId::new)?,
        code: column(row, "code")?,
        name: column(row, "name")?,
        sort_order: column(row, "sort_order")?,
        is_active: column(row, "is_active")?,
    })
}

fn data_type(row: &SqliteRow) -> Result<DataType, RepoError> {
    column::<String>(row, "data_type")?
        .parse()
        .map_err(RepoError::serialization)
}

fn row_to_parameter(row: &SqliteRow) -> Result<Parameter, RepoError> {
    Ok(Parameter {
        id: required_id(column(row, "id")?, "parameter", ParameterId::new)?,
        group_id: column::<Option<i64>>(row, "group_id")?.and_then(ParameterGroupId::new),
        code: column(row, "code")?,
        name: column(row, "name")?,
        data_type: data_type(row)?,
        unit: non_empty(column(row, "unit")?),
        sort_order: column(row, "sort_order")?,
        is_active: column(row, "is_active")?,
        group_name: column(row, "group_name")?,
        group_code: column(row, "group_code")?,
    })
}

fn row_to_reading(row: &SqliteRow) -> Result<WellParameterReading, RepoError> {
    let data_type = data_type(row)?;
    Ok(WellParameterReading {
        id: required_id(column(row, "id")?, "parameter value", ParameterValueId::new)?,
        well_id: required_id(column(row, "well_id")?, "well", WellId::new)?,
        parameter_id: required_id(column(row, "parameter_id")?, "parameter", ParameterId::new)?,
        code: column(row, "code")?,
        name: column(row, "name")?,
        value: decode_value(row, data_type)?,
        unit: non_empty(column(row, "unit")?),
        data_type,
        group_id: column::<Option<i64>>(row, "group_id")?.and_then(ParameterGroupId::new),
        group_name: column(row, "group_name")?,
        group_code: column(row, "group_code")?,
    })
}

fn decode_value(
    row: &SqliteRow,
    data_type: DataType,
) -> Result<Option<ParameterValue>, RepoError> {
    let value = match data_type {
        DataType::String | DataType::Enum => {
            column::<Option<String>>(row, "value_string")?.map(ParameterValue::String)
        }
        DataType::Integer => {
            column::<Option<i64>>(row, "value_integer")?.map(ParameterValue::Integer)
        }
        DataType::Decimal => {
            column::<Option<f64>>(row, "value_decimal")?.map(ParameterValue::Decimal)
        }
        DataType::Boolean => {
            column::<Option<bool>>(row, "value_boolean")?.map(ParameterValue::Boolean)
        }
        DataType::Date => match non_empty(column(row, "value_date")?) {
            Some(raw) => match NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
                Ok(date) => Some(ParameterValue::Date(date)),
                Err(e) => {
                    tracing::warn!(value = %raw, error = %e, "Ignoring unparsable stored date");
                    None
                }
            },
            None => None,
        },
    };
    Ok(value)
}

/// The typed columns for one value; all but one are NULL.
#[derive(Default)]
struct ValueColumns {
    string: Option<String>,
    integer: Option<i64>,
    decimal: Option<f64>,
    boolean: Option<bool>,
    date: Option<String>,
}

impl From<&ParameterValue> for ValueColumns {
    fn from(value: &ParameterValue) -> Self {
        match value {
            ParameterValue::String(s) => Self {
                string: Some(s.clone()),
                ..Self::default()
            },
            ParameterValue::Integer(n) => Self {
                integer: Some(*n),
                ..Self::default()
            },
            ParameterValue::Decimal(x) => Self {
                decimal: Some(*x),
                ..Self::default()
            },
            ParameterValue::Boolean(b) => Self {
                boolean: Some(*b),
                ..Self::default()
            },
            ParameterValue::Date(d) => Self {
                date: Some(d.format(DATE_FORMAT).to_string()),
                ..Self::default()
            },
        }
    }
}

#[async_trait]
impl ParameterRepo for SqliteParameterRepo {
    async fn list_groups(
        &self,
        is_active: Option<bool>,
    ) -> Result<Vec<ParameterGroup>, RepoError> {
        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_GROUPS);
        if let Some(is_active) = is_active {
            builder.push(" WHERE is_active = ").push_bind(is_active);
        }
        builder.push(" ORDER BY sort_order, name");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("list_parameter_groups", e))?;
        rows.iter().map(row_to_group).collect()
    }

    async fn get_group(&self, id: ParameterGroupId) -> Result<Option<ParameterGroup>, RepoError> {
        let row = sqlx::query(&format!("{SELECT_GROUPS} WHERE id = ?"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_parameter_group", e))?;
        row.as_ref().map(row_to_group).transpose()
    }

    async fn get_group_by_code(&self, code: &str) -> Result<Option<ParameterGroup>, RepoError> {
        let row = sqlx::query(&format!("{SELECT_GROUPS} WHERE code = ? ORDER BY id LIMIT 1"))
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_parameter_group_by_code", e))?;
        row.as_ref().map(row_to_group).transpose()
    }

    async fn insert_group(
        &self,
        group: &NewParameterGroup,
    ) -> Result<ParameterGroupId, RepoError> {
        let code = group.code.as_deref().ok_or_else(|| {
            RepoError::constraint("parameter group code must be resolved before insert")
        })?;

        let result = sqlx::query(
            "INSERT INTO parameter_groups (code, name, sort_order, is_active) VALUES (?, ?, ?, ?)",
        )
        .bind(code)
        .bind(&group.name)
        .bind(group.sort_order)
        .bind(group.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("insert_parameter_group", e))?;

        inserted_id(result.last_insert_rowid(), ParameterGroupId::new)
    }

    async fn update_group(
        &self,
        id: ParameterGroupId,
        patch: &ParameterGroupPatch,
    ) -> Result<u64, RepoError> {
        if *patch == ParameterGroupPatch::default() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE parameter_groups SET ");
        let mut set = builder.separated(", ");
        if let Some(name) = &patch.name {
            set.push("name = ").push_bind_unseparated(name.clone());
        }
        if let Some(code) = &patch.code {
            set.push("code = ").push_bind_unseparated(code.clone());
        }
        if let Some(sort_order) = patch.sort_order {
            set.push("sort_order = ").push_bind_unseparated(sort_order);
        }
        if let Some(is_active) = patch.is_active {
            set.push("is_active = ").push_bind_unseparated(is_active);
        }
        builder.push(" WHERE id = ").push_bind(id.get());

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("update_parameter_group", e))?;
        Ok(result.rows_affected())
    }

    async fn delete_group(&self, id: ParameterGroupId) -> Result<u64, RepoError> {
        let result = sqlx::query("DELETE FROM parameter_groups WHERE id = ?")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("delete_parameter_group", e))?;
        Ok(result.rows_affected())
    }

    async fn list_parameters(
        &self,
        filter: &ParameterFilter,
    ) -> Result<Vec<Parameter>, RepoError> {
        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_PARAMETERS);
        builder.push(" WHERE 1 = 1");
        if let Some(is_active) = filter.is_active {
            builder.push(" AND p.is_active = ").push_bind(is_active);
        }
        if let Some(group_id) = filter.group_id {
            builder.push(" AND p.group_id = ").push_bind(group_id.get());
        }
        builder.push(" ORDER BY g.sort_order, p.sort_order, p.name");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("list_parameters", e))?;
        rows.iter().map(row_to_parameter).collect()
    }

    async fn get_parameter(&self, id: ParameterId) -> Result<Option<Parameter>, RepoError> {
        let row = sqlx::query(&format!("{SELECT_PARAMETERS} WHERE p.id = ?"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get_parameter", e))?;
        row.as_ref().map(row_to_parameter).transpose()
    }

    async fn get_parameter_by_code(&self, code: &str) -> Result<Option<Parameter>, RepoError> {
        let row = sqlx::query(&format!(
            "{SELECT_PARAMETERS} WHERE p.code = ? ORDER BY p.id LIMIT 1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("get_parameter_by_code", e))?;
        row.as_ref().map(row_to_parameter).transpose()
    }

    async fn insert_parameter(&self, parameter: &NewParameter) -> Result<ParameterId, RepoError> {
        let code = parameter.code.as_deref().ok_or_else(|| {
            RepoError::constraint("parameter code must be resolved before insert")
        })?;

        let result = sqlx::query(
            r#"
            INSERT INTO parameters
                (group_id, code, name, data_type, unit, sort_order, is_active)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(parameter.group_id.map(ParameterGroupId::get))
        .bind(code)
        .bind(&parameter.name)
        .bind(parameter.data_type.as_str())
        .bind(parameter.unit.as_deref())
        .bind(parameter.sort_order)
        .bind(parameter.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("insert_parameter", e))?;

        inserted_id(result.last_insert_rowid(), ParameterId::new)
    }

    async fn update_parameter(
        &self,
        id: ParameterId,
        patch: &ParameterPatch,
    ) -> Result<u64, RepoError> {
        if *patch == ParameterPatch::default() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE parameters SET ");
        let mut set = builder.separated(", ");
        if let Some(group_id) = patch.group_id {
            set.push("group_id = ")
                .push_bind_unseparated(group_id.map(ParameterGroupId::get));
        }
        if let Some(name) = &patch.name {
            set.push("name = ").push_bind_unseparated(name.clone());
        }
        if let Some(code) = &patch.code {
            set.push("code = ").push_bind_unseparated(code.clone());
        }
        if let Some(data_type) = patch.data_type {
            set.push("data_type = ")
                .push_bind_unseparated(data_type.as_str());
        }
        if let Some(unit) = &patch.unit {
            set.push("unit = ").push_bind_unseparated(unit.clone());
        }
        if let Some(sort_order) = patch.sort_order {
            set.push("sort_order = ").push_bind_unseparated(sort_order);
        }
        if let Some(is_active) = patch.is_active {
            set.push("is_active = ").push_bind_unseparated(is_active);
        }
        builder.push(" WHERE id = ").push_bind(id.get());

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("update_parameter", e))?;
        Ok(result.rows_affected())
    }

    async fn delete_parameter(&self, id: ParameterId) -> Result<u64, RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("delete_parameter", e))?;

        sqlx::query("DELETE FROM well_parameter_values WHERE parameter_id = ?")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("delete_parameter", e))?;

        let result = sqlx::query("DELETE FROM parameters WHERE id = ?")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("delete_parameter", e))?;

        tx.commit()
            .await
            .map_err(|e| RepoError::database("delete_parameter", e))?;
        Ok(result.rows_affected())
    }

    async fn list_values_for_well(
        &self,
        well_id: WellId,
    ) -> Result<Vec<WellParameterReading>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT v.id, v.well_id, v.parameter_id,
                   v.value_string, v.value_integer, v.value_decimal, v.value_boolean, v.value_date,
                   p.code, p.name, p.unit, p.data_type, p.group_id,
                   g.name AS group_name, g.code AS group_code
            FROM well_parameter_values v
            JOIN parameters p ON p.id = v.parameter_id
            LEFT JOIN parameter_groups g ON g.id = p.group_id
            WHERE v.well_id = ?
            ORDER BY g.sort_order, p.sort_order, p.name
            "#,
        )
        .bind(well_id.get())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("list_parameter_values", e))?;
        rows.iter().map(row_to_reading).collect()
    }

    async fn upsert_value(
        &self,
        well_id: WellId,
        parameter_id: ParameterId,
        value: &ParameterValue,
    ) -> Result<(), RepoError> {
        let columns = ValueColumns::from(value);

        sqlx::query(
            r#"
            INSERT INTO well_parameter_values
                (well_id, parameter_id,
                 value_string, value_integer, value_decimal, value_boolean, value_date)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(well_id, parameter_id) DO UPDATE SET
                value_string = excluded.value_string,
                value_integer = excluded.value_integer,
                value_decimal = excluded.value_decimal,
                value_boolean = excluded.value_boolean,
                value_date = excluded.value_date
            "#,
        )
        .bind(well_id.get())
        .bind(parameter_id.get())
        .bind(columns.string)
        .bind(columns.integer)
        .bind(columns.decimal)
        .bind(columns.boolean)
        .bind(columns.date)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("upsert_parameter_value", e))?;

        Ok(())
    }
}
