use fieldreg_domain::{
    DataType, LocationId, LocationPatch, LocationType, NewBorehole, NewLocation, NewParameter,
    NewParameterGroup, NewWell, ParameterFilter, ParameterValue, WellFilter, WellPatch,
};
use sqlx::SqlitePool;
use tempfile::TempDir;

use super::*;
use crate::infrastructure::ports::{BoreholeRepo, LocationRepo, ParameterRepo, WellRepo};

async fn open_db() -> (TempDir, SqlitePool) {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let db_path = temp_dir.path().join("fieldreg.db");
    let config = AppConfig {
        database_url: format!("sqlite:{}?mode=rwc", db_path.to_string_lossy()),
        max_connections: 1,
    };
    let pool = connect(&config).await.expect("connect");
    ensure_schema(&pool).await.expect("schema");
    (temp_dir, pool)
}

fn new_location(location_type: LocationType, name: &str, code: &str) -> NewLocation {
    let mut location = NewLocation::new(location_type, name);
    location.code = Some(code.to_string());
    location
}

#[tokio::test]
async fn schema_is_idempotent() {
    let (_dir, pool) = open_db().await;
    ensure_schema(&pool).await.expect("second run");
}

#[tokio::test]
async fn locations_round_trip_through_storage() {
    let (_dir, pool) = open_db().await;
    let repo = SqliteLocationRepo::new(pool);

    let org = repo
        .insert_location(&new_location(LocationType::Organization, "Acme", "acme"))
        .await
        .expect("insert org");
    let mut field = new_location(LocationType::Field, "North Field", "north_field").under(org);
    field.position = Some(5);
    field.coordinates = Some("55.75,37.61".to_string());
    field
        .extra
        .insert("area_km2".to_string(), serde_json::json!(12.5));
    let field_id = repo.insert_location(&field).await.expect("insert field");

    let rows = repo.list_locations().await.expect("list");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, org, "root rows sort first");

    let stored = &rows[1];
    assert_eq!(stored.id, field_id);
    assert_eq!(stored.parent_id, Some(org));
    assert_eq!(stored.location_type, LocationType::Field);
    assert_eq!(stored.position, 5);
    assert_eq!(stored.coordinates.as_deref(), Some("55.75,37.61"));
    assert_eq!(stored.extra.get("area_km2"), Some(&serde_json::json!(12.5)));
}

#[tokio::test]
async fn location_patch_touches_only_set_columns() {
    let (_dir, pool) = open_db().await;
    let repo = SqliteLocationRepo::new(pool);

    let mut location = new_location(LocationType::Cluster, "Pad 7", "pad_7");
    location.description = Some("old".to_string());
    let id = repo.insert_location(&location).await.expect("insert");

    let patch = LocationPatch {
        name: Some("Pad 7A".to_string()),
        description: Some(None),
        ..LocationPatch::default()
    };
    assert_eq!(repo.update_location(id, &patch).await.expect("update"), 1);
    assert_eq!(
        repo.update_location(id, &LocationPatch::default())
            .await
            .expect("empty update"),
        0
    );

    let rows = repo.list_locations().await.expect("list");
    assert_eq!(rows[0].name, "Pad 7A");
    assert_eq!(rows[0].code, "pad_7");
    assert_eq!(rows[0].description, None);
}

#[tokio::test]
async fn zero_parent_and_unknown_type_load_without_error() {
    let (_dir, pool) = open_db().await;
    sqlx::query("INSERT INTO locations (id, parent_id, type, code, name) VALUES (3, 0, 'swamp', 'bog', 'Bog')")
        .execute(&pool)
        .await
        .expect("raw insert");

    let repo = SqliteLocationRepo::new(pool);
    let rows = repo.list_locations().await.expect("list");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].parent_id, None);
    assert_eq!(rows[0].location_type, LocationType::Unknown);
}

#[tokio::test]
async fn delete_locations_removes_exactly_the_given_rows() {
    let (_dir, pool) = open_db().await;
    let repo = SqliteLocationRepo::new(pool);

    let a = repo
        .insert_location(&new_location(LocationType::Field, "A", "a"))
        .await
        .expect("a");
    let b = repo
        .insert_location(&new_location(LocationType::Field, "B", "b"))
        .await
        .expect("b");
    let c = repo
        .insert_location(&new_location(LocationType::Field, "C", "c"))
        .await
        .expect("c");

    assert_eq!(repo.delete_locations(&[a, c]).await.expect("delete"), 2);
    assert_eq!(repo.delete_locations(&[]).await.expect("noop"), 0);

    let ids: Vec<LocationId> = repo
        .list_locations()
        .await
        .expect("list")
        .into_iter()
        .map(|l| l.id)
        .collect();
    assert_eq!(ids, vec![b]);
}

#[tokio::test]
async fn deleting_a_well_removes_its_boreholes_and_values() {
    let (_dir, pool) = open_db().await;
    let repos = SqliteRepositories::new(pool);
    let cluster = LocationId::new(1).expect("id");

    let mut well = NewWell::new(cluster, "W-1");
    well.code = Some("w_1".to_string());
    let well_id = repos.well.insert_well(&well).await.expect("well");

    let borehole = NewBorehole {
        well_id,
        number: Some(1),
        name: Some("W-1 Borehole 1".to_string()),
    };
    repos
        .borehole
        .insert_borehole(&borehole)
        .await
        .expect("borehole");

    let mut parameter = NewParameter::new("Depth", DataType::Integer);
    parameter.code = Some("depth".to_string());
    let parameter_id = repos
        .parameter
        .insert_parameter(&parameter)
        .await
        .expect("parameter");
    repos
        .parameter
        .upsert_value(well_id, parameter_id, &ParameterValue::Integer(2400))
        .await
        .expect("value");

    assert_eq!(repos.well.delete_well(well_id).await.expect("delete"), 1);

    assert!(repos.well.get_well(well_id).await.expect("get").is_none());
    assert!(repos
        .borehole
        .list_by_well(well_id)
        .await
        .expect("boreholes")
        .is_empty());
    assert!(repos
        .parameter
        .list_values_for_well(well_id)
        .await
        .expect("values")
        .is_empty());
}

#[tokio::test]
async fn well_filter_and_patch() {
    let (_dir, pool) = open_db().await;
    let repo = SqliteWellRepo::new(pool);
    let cluster = LocationId::new(7).expect("id");
    let other = LocationId::new(8).expect("id");

    for (cluster_id, name, visible) in [(cluster, "B", true), (cluster, "A", false), (other, "C", true)] {
        let mut well = NewWell::new(cluster_id, name);
        well.code = Some(name.to_lowercase());
        well.visible = visible;
        repo.insert_well(&well).await.expect("insert");
    }

    let in_cluster = repo
        .list_wells(&WellFilter::in_cluster(cluster))
        .await
        .expect("list");
    let names: Vec<&str> = in_cluster.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["B", "A"]);

    let visible = WellFilter {
        visible: Some(true),
        ..WellFilter::in_cluster(cluster)
    };
    assert_eq!(repo.list_wells(&visible).await.expect("visible").len(), 1);

    let b = repo
        .get_well_by_code("b")
        .await
        .expect("by code")
        .expect("well b");
    let patch = WellPatch {
        status: Some(Some("idle".to_string())),
        ..WellPatch::default()
    };
    repo.update_well(b.id, &patch).await.expect("patch");
    let b = repo.get_well(b.id).await.expect("get").expect("well b");
    assert_eq!(b.status.as_deref(), Some("idle"));
    assert_eq!(b.name, "B");
}

#[tokio::test]
async fn wells_sort_by_position_then_id() {
    let (_dir, pool) = open_db().await;
    let repo = SqliteWellRepo::new(pool);
    let cluster = LocationId::new(7).expect("id");

    for (name, position) in [("Zulu", 2), ("Yankee", 1), ("Alpha", 2), ("Bravo", 1)] {
        let mut well = NewWell::new(cluster, name);
        well.code = Some(name.to_lowercase());
        well.position = Some(position);
        repo.insert_well(&well).await.expect("insert");
    }

    let wells = repo.list_wells(&WellFilter::default()).await.expect("list");
    let names: Vec<&str> = wells.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["Yankee", "Bravo", "Zulu", "Alpha"]);
}

#[tokio::test]
async fn cluster_counts_group_visible_wells() {
    let (_dir, pool) = open_db().await;
    let repo = SqliteWellRepo::new(pool);
    let cluster = LocationId::new(3).expect("id");

    for (code, status, visible) in [("w1", "active", true), ("w2", "active", true), ("w3", "idle", false)] {
        let mut well = NewWell::new(cluster, code);
        well.code = Some(code.to_string());
        well.status = Some(status.to_string());
        well.visible = visible;
        repo.insert_well(&well).await.expect("insert");
    }

    let counts = repo.cluster_well_counts(cluster).await.expect("counts");
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].total, 2);
    assert_eq!(counts[0].status.as_deref(), Some("active"));
}

#[tokio::test]
async fn borehole_number_lookup_honours_exclusion() {
    let (_dir, pool) = open_db().await;
    let repo = SqliteBoreholeRepo::new(pool);
    let well_id = fieldreg_domain::WellId::new(1).expect("id");

    let id = repo
        .insert_borehole(&NewBorehole {
            well_id,
            number: Some(1),
            name: Some("First".to_string()),
        })
        .await
        .expect("insert");

    assert_eq!(
        repo.find_by_number(well_id, 1, None).await.expect("find"),
        Some(id)
    );
    assert_eq!(
        repo.find_by_number(well_id, 1, Some(id))
            .await
            .expect("find excluding self"),
        None
    );
    assert_eq!(repo.find_by_number(well_id, 2, None).await.expect("free"), None);
}

#[tokio::test]
async fn unresolved_borehole_is_rejected() {
    let (_dir, pool) = open_db().await;
    let repo = SqliteBoreholeRepo::new(pool);
    let well_id = fieldreg_domain::WellId::new(1).expect("id");

    let err = repo
        .insert_borehole(&NewBorehole::new(well_id))
        .await
        .expect_err("number and name missing");
    assert!(matches!(err, RepoError::ConstraintViolation(_)));
}

#[tokio::test]
async fn parameter_values_upsert_and_decode_by_declared_type() {
    let (_dir, pool) = open_db().await;
    let repo = SqliteParameterRepo::new(pool);
    let well_id = fieldreg_domain::WellId::new(4).expect("id");

    let mut group = NewParameterGroup::new("Geology");
    group.code = Some("geology".to_string());
    let group_id = repo.insert_group(&group).await.expect("group");

    let mut spud = NewParameter::new("Spud date", DataType::Date);
    spud.code = Some("spud_date".to_string());
    spud.group_id = Some(group_id);
    let spud_id = repo.insert_parameter(&spud).await.expect("spud");

    let mut flowing = NewParameter::new("Flowing", DataType::Boolean);
    flowing.code = Some("flowing".to_string());
    flowing.sort_order = 1;
    flowing.group_id = Some(group_id);
    let flowing_id = repo.insert_parameter(&flowing).await.expect("flowing");

    let date = chrono::NaiveDate::from_ymd_opt(2021, 3, 14).expect("date");
    repo.upsert_value(well_id, spud_id, &ParameterValue::Date(date))
        .await
        .expect("spud value");
    repo.upsert_value(well_id, flowing_id, &ParameterValue::Boolean(false))
        .await
        .expect("flowing value");
    repo.upsert_value(well_id, flowing_id, &ParameterValue::Boolean(true))
        .await
        .expect("flowing overwrite");

    let readings = repo.list_values_for_well(well_id).await.expect("readings");
    assert_eq!(readings.len(), 2, "upsert keeps one value per parameter");
    assert_eq!(readings[0].code, "spud_date");
    assert_eq!(readings[0].value, Some(ParameterValue::Date(date)));
    assert_eq!(readings[0].group_code.as_deref(), Some("geology"));
    assert_eq!(readings[1].value, Some(ParameterValue::Boolean(true)));

    let listed = repo
        .list_parameters(&ParameterFilter {
            group_id: Some(group_id),
            ..ParameterFilter::default()
        })
        .await
        .expect("parameters");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].group_name.as_deref(), Some("Geology"));
}

#[tokio::test]
async fn deleting_a_parameter_drops_its_values() {
    let (_dir, pool) = open_db().await;
    let repo = SqliteParameterRepo::new(pool);
    let well_id = fieldreg_domain::WellId::new(2).expect("id");

    let mut parameter = NewParameter::new("Operator", DataType::String);
    parameter.code = Some("operator".to_string());
    let id = repo.insert_parameter(&parameter).await.expect("insert");
    repo.upsert_value(well_id, id, &ParameterValue::String("Acme".to_string()))
        .await
        .expect("value");

    assert_eq!(repo.delete_parameter(id).await.expect("delete"), 1);
    assert!(repo.get_parameter(id).await.expect("get").is_none());
    assert!(repo
        .list_values_for_well(well_id)
        .await
        .expect("values")
        .is_empty());
}
