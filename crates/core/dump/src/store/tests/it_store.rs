use serde_json::{Value, json};
use table_catalog::{FieldDef, FieldType, TableSchema};

use crate::store::{BatchInsertError, Store, WriteMode, WriteReport};

const FIELDS: &[FieldDef] = &[
    FieldDef::key("cartodb_id", FieldType::Integer),
    FieldDef::required("name", FieldType::Text),
    FieldDef::optional("opened", FieldType::Date),
    FieldDef::optional("seen_at", FieldType::Timestamp),
];

fn schema() -> &'static TableSchema {
    static SCHEMA: std::sync::LazyLock<TableSchema> =
        std::sync::LazyLock::new(|| TableSchema::new("widgets", FIELDS));
    &SCHEMA
}

fn rows(value: Value) -> Vec<carto_client::Row> {
    let Value::Array(rows) = value else {
        panic!("not an array");
    };
    rows.into_iter()
        .map(|row| match row {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        })
        .collect()
}

/// Three records, the second of which has a null in a required field.
fn batch_with_invalid_second_record() -> Vec<carto_client::Row> {
    rows(json!([
        {"cartodb_id": 1, "name": "first", "opened": "2020-01-02"},
        {"cartodb_id": 2, "name": null},
        {"cartodb_id": 3, "name": "third", "seen_at": "2020-01-02T03:04:05Z"},
    ]))
}

async fn open_store(dir: &tempfile::TempDir) -> Store {
    let mut store = Store::open(dir.path().join("odp.db"))
        .await
        .expect("failed to open store");
    store
        .ensure_tables([schema()])
        .await
        .expect("failed to create tables");
    store
}

async fn stored_ids(store: &mut Store) -> Vec<i64> {
    sqlx::query_scalar("SELECT cartodb_id FROM widgets ORDER BY cartodb_id")
        .fetch_all(&mut store.conn)
        .await
        .expect("failed to read ids")
}

#[tokio::test]
async fn strict_mode_skips_the_invalid_record_and_keeps_the_rest() {
    //* Given
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open_store(&dir).await;

    //* When
    let report = store
        .insert(schema(), &batch_with_invalid_second_record(), WriteMode::Strict)
        .await
        .expect("strict mode does not fail");

    //* Then
    assert_eq!(
        report,
        WriteReport {
            inserted: 2,
            skipped: 1
        }
    );
    assert_eq!(stored_ids(&mut store).await, vec![1, 3]);
}

#[tokio::test]
async fn strict_mode_skips_duplicate_primary_keys() {
    //* Given
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open_store(&dir).await;
    let batch = rows(json!([
        {"cartodb_id": 1, "name": "first"},
        {"cartodb_id": 1, "name": "again"},
        {"cartodb_id": 2, "name": "second"},
    ]));

    //* When
    let report = store
        .insert(schema(), &batch, WriteMode::Strict)
        .await
        .expect("strict mode does not fail");

    //* Then
    assert_eq!(report.skipped, 1);
    assert_eq!(stored_ids(&mut store).await, vec![1, 2]);
}

#[tokio::test]
async fn bulk_mode_rejects_the_whole_batch_on_an_invalid_record() {
    //* Given
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open_store(&dir).await;

    //* When
    let result = store
        .insert(schema(), &batch_with_invalid_second_record(), WriteMode::Bulk)
        .await;

    //* Then
    let err = result.expect_err("batch must be rejected");
    assert!(
        matches!(
            err,
            BatchInsertError::Validation { index: 1, ref source } if source.field == "name"
        ),
        "unexpected error: {err:?}"
    );
    assert!(stored_ids(&mut store).await.is_empty());
}

#[tokio::test]
async fn bulk_mode_rolls_back_on_duplicate_primary_key() {
    //* Given
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open_store(&dir).await;
    let batch = rows(json!([
        {"cartodb_id": 1, "name": "first"},
        {"cartodb_id": 2, "name": "second"},
        {"cartodb_id": 1, "name": "again"},
    ]));

    //* When
    let result = store.insert(schema(), &batch, WriteMode::Bulk).await;

    //* Then
    assert!(matches!(
        result,
        Err(BatchInsertError::Insert { index: 2, .. })
    ));
    assert!(stored_ids(&mut store).await.is_empty());
}

#[tokio::test]
async fn bulk_mode_commits_a_valid_batch() {
    //* Given
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open_store(&dir).await;
    let batch = rows(json!([
        {"cartodb_id": "7", "name": "a", "opened": "2018-03-28T05:00:00Z"},
        {"cartodb_id": 8.0, "name": "b", "seen_at": "2018-03-28 05:00:00"},
    ]));

    //* When
    let report = store
        .insert(schema(), &batch, WriteMode::Bulk)
        .await
        .expect("valid batch");

    //* Then
    assert_eq!(report.inserted, 2);
    let stored: Vec<(i64, Option<String>, Option<String>)> = sqlx::query_as(
        "SELECT cartodb_id, opened, seen_at FROM widgets ORDER BY cartodb_id",
    )
    .fetch_all(&mut store.conn)
    .await
    .expect("failed to read rows");
    assert_eq!(
        stored,
        vec![
            (7, Some("2018-03-28".to_string()), None),
            (8, None, Some("2018-03-28 05:00:00.000000".to_string())),
        ]
    );
}

#[tokio::test]
async fn records_accumulate_across_sessions() {
    //* Given
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open_store(&dir).await;
    store
        .insert(
            schema(),
            &rows(json!([{"cartodb_id": 1, "name": "a"}])),
            WriteMode::Bulk,
        )
        .await
        .expect("first session");
    store.close().await.expect("close");

    //* When
    let mut store = open_store(&dir).await;
    store
        .insert(
            schema(),
            &rows(json!([{"cartodb_id": 2, "name": "b"}])),
            WriteMode::Bulk,
        )
        .await
        .expect("second session");

    //* Then
    assert_eq!(store.count(schema()).await.expect("count"), 2);
}

#[tokio::test]
async fn ensure_tables_creates_every_catalog_table() {
    //* Given
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = Store::open(dir.path().join("odp.db"))
        .await
        .expect("failed to open store");

    //* When
    let catalog = table_catalog::catalog();
    store
        .ensure_tables(catalog.tables())
        .await
        .expect("first pass");
    store
        .ensure_tables(catalog.tables())
        .await
        .expect("second pass is a no-op");

    //* Then
    let mut names: Vec<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .fetch_all(&mut store.conn)
            .await
            .expect("failed to list tables");
    names.retain(|name| !name.starts_with("sqlite_"));
    assert_eq!(names, catalog.names());
}
