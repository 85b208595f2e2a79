//! End-to-end runs of the split pipeline against a mock SQL endpoint.

use std::path::Path;

use carto_client::Client;
use dump::{
    DatePart, Error, PartitionExpr, PartitionKey, RunStats, SplitJob, StoreOptions, WriteMode,
    resolve_keys, sql,
};
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{Value, json};

const SQL_PATH: &str = "/api/v2/sql";

fn client(server: &ServerGuard) -> Client {
    let url = format!("{}{SQL_PATH}", server.url())
        .parse()
        .expect("valid mock URL");
    Client::new(url)
}

/// Answer exactly `sql` with `body`, expecting it to be sent `hits` times.
async fn mock_sql(server: &mut ServerGuard, sql: &str, body: Value, hits: usize) -> Mock {
    server
        .mock("POST", SQL_PATH)
        .match_body(Matcher::UrlEncoded("q".into(), sql.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(hits)
        .create_async()
        .await
}

fn widget_fields() -> Value {
    json!({
        "cartodb_id": {"type": "number"},
        "category": {"type": "string"},
        "opened": {"type": "date"},
    })
}

fn read_csv(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .expect("open CSV");
    reader
        .records()
        .map(|record| {
            record
                .expect("read record")
                .iter()
                .map(String::from)
                .collect()
        })
        .collect()
}

#[tokio::test]
async fn resolve_keys_keeps_remote_order_with_null_last() {
    //* Given
    let mut server = mockito::Server::new_async().await;
    let expr = PartitionExpr::column("category");
    let mock = mock_sql(
        &mut server,
        &sql::distinct_keys("widgets", &expr),
        json!({"rows": [
            {"split_field": "a"},
            {"split_field": "b"},
            {"split_field": null},
        ]}),
        1,
    )
    .await;

    //* When
    let keys = resolve_keys(&client(&server), "widgets", &expr)
        .await
        .expect("keys resolve");

    //* Then
    mock.assert_async().await;
    assert_eq!(
        keys,
        vec![
            PartitionKey::Text("a".into()),
            PartitionKey::Text("b".into()),
            PartitionKey::Null,
        ]
    );
}

#[tokio::test]
async fn categorical_split_writes_one_csv_per_key() {
    //* Given
    let mut server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let expr = PartitionExpr::column("category");

    let probe = mock_sql(
        &mut server,
        &sql::probe("widgets"),
        json!({"rows": [], "fields": widget_fields()}),
        1,
    )
    .await;
    let keys = mock_sql(
        &mut server,
        &sql::distinct_keys("widgets", &expr),
        json!({"rows": [
            {"split_field": "a"},
            {"split_field": "b"},
            {"split_field": null},
        ]}),
        1,
    )
    .await;
    let a = mock_sql(
        &mut server,
        "SELECT * FROM widgets WHERE category = 'a' AND cartodb_id > 0",
        json!({
            "rows": [
                {"cartodb_id": 1, "category": "a", "opened": "2020-01-01T00:00:00Z"},
                {"cartodb_id": 2, "category": "a", "opened": null},
            ],
            "fields": widget_fields(),
        }),
        1,
    )
    .await;
    let b = mock_sql(
        &mut server,
        "SELECT * FROM widgets WHERE category = 'b' AND cartodb_id > 0",
        json!({
            "rows": [{"cartodb_id": 3, "category": "b", "opened": "2021-05-06T00:00:00Z"}],
            "fields": widget_fields(),
        }),
        1,
    )
    .await;
    let null = mock_sql(
        &mut server,
        "SELECT * FROM widgets WHERE category IS NULL AND cartodb_id > 0",
        json!({"rows": [], "fields": widget_fields()}),
        1,
    )
    .await;

    let mut job = SplitJob::new("widgets", expr);
    job.where_str = Some("cartodb_id > 0".to_string());
    job.csv_dir = Some(dir.path().to_path_buf());

    //* When
    let stats = job.run(&client(&server)).await.expect("run succeeds");

    //* Then
    for mock in [probe, keys, a, b, null] {
        mock.assert_async().await;
    }
    assert_eq!(
        stats,
        RunStats {
            partitions: 3,
            rows: 3,
            sink_failures: 0,
        }
    );

    let table_dir = dir.path().join("widgets");
    assert_eq!(
        read_csv(&table_dir.join("widgets_category_a.csv")),
        vec![
            vec!["cartodb_id", "category", "opened"],
            vec!["1", "a", "2020-01-01T00:00:00Z"],
            vec!["2", "a", ""],
        ]
    );
    assert_eq!(
        read_csv(&table_dir.join("widgets_category_b.csv")),
        vec![
            vec!["cartodb_id", "category", "opened"],
            vec!["3", "b", "2021-05-06T00:00:00Z"],
        ]
    );
    assert_eq!(
        read_csv(&table_dir.join("widgets_category_null.csv")),
        vec![vec!["cartodb_id", "category", "opened"]]
    );
}

#[tokio::test]
async fn unknown_partition_column_fails_before_any_partition_query() {
    //* Given
    let mut server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let expr = PartitionExpr::column("colour");

    let probe = mock_sql(
        &mut server,
        &sql::probe("widgets"),
        json!({"rows": [], "fields": widget_fields()}),
        1,
    )
    .await;
    let keys = mock_sql(
        &mut server,
        &sql::distinct_keys("widgets", &expr),
        json!({"rows": [{"split_field": "red"}]}),
        0,
    )
    .await;

    let mut job = SplitJob::new("widgets", expr);
    job.csv_dir = Some(dir.path().to_path_buf());

    //* When
    let result = job.run(&client(&server)).await;

    //* Then
    probe.assert_async().await;
    keys.assert_async().await;
    let err = result.expect_err("column does not exist");
    assert!(matches!(err, Error::InvalidColumn(_)), "unexpected error: {err:?}");
    assert!(!dir.path().join("widgets").exists());
}

#[tokio::test]
async fn temporal_split_on_non_date_column_is_rejected() {
    //* Given
    let mut server = mockito::Server::new_async().await;
    let probe = mock_sql(
        &mut server,
        &sql::probe("widgets"),
        json!({"rows": [], "fields": widget_fields()}),
        1,
    )
    .await;

    let job = SplitJob::new(
        "widgets",
        PartitionExpr::date_part("category", DatePart::Year),
    );

    //* When
    let result = job.run(&client(&server)).await;

    //* Then
    probe.assert_async().await;
    assert!(matches!(
        result,
        Err(Error::InvalidColumn(dump::InvalidColumnError::NotDate { .. }))
    ));
}

#[tokio::test]
async fn store_sink_for_unregistered_table_fails_without_querying() {
    //* Given
    let mut server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("odp.db");

    let probe = mock_sql(
        &mut server,
        &sql::probe("widgets"),
        json!({"rows": [], "fields": widget_fields()}),
        0,
    )
    .await;

    let mut job = SplitJob::new("widgets", PartitionExpr::column("category"));
    job.store = Some(StoreOptions {
        path: db_path.clone(),
        mode: WriteMode::Bulk,
    });

    //* When
    let result = job.run(&client(&server)).await;

    //* Then
    probe.assert_async().await;
    let err = result.expect_err("widgets has no registered schema");
    assert!(matches!(err, Error::UnregisteredTable(_)), "unexpected error: {err:?}");
    assert!(!db_path.exists());
}

#[tokio::test]
async fn temporal_split_writes_summary_and_store() {
    //* Given
    let mut server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_dir = dir.path().join("csvs");
    let db_path = dir.path().join("odp.db");
    let expr = PartitionExpr::date_part("date_", DatePart::Year);
    let fields = json!({
        "cartodb_id": {"type": "number"},
        "objectid": {"type": "number"},
        "date_": {"type": "date"},
        "location": {"type": "string"},
        "fatal": {"type": "number"},
    });
    let shooting = |id: i64, date: &str| {
        json!({
            "cartodb_id": id,
            "objectid": id * 10,
            "date_": date,
            "location": format!("{id}00 BLOCK MARKET ST"),
            "fatal": 0,
        })
    };

    let mocks = [
        mock_sql(
            &mut server,
            &sql::probe("shootings"),
            json!({"rows": [], "fields": fields}),
            1,
        )
        .await,
        mock_sql(
            &mut server,
            &sql::bounds("shootings", "date_"),
            json!({"rows": [{
                "first_dt": "2019-03-01T00:00:00Z",
                "last_dt": "2020-07-04T00:00:00Z",
            }]}),
            1,
        )
        .await,
        mock_sql(
            &mut server,
            &sql::value_counts("shootings", &expr),
            json!({"rows": [
                {"dt": 2019, "num_rows": 2},
                {"dt": 2020, "num_rows": 1},
            ]}),
            1,
        )
        .await,
        mock_sql(
            &mut server,
            &sql::distinct_keys("shootings", &expr),
            json!({"rows": [{"split_field": 2019}, {"split_field": 2020}]}),
            1,
        )
        .await,
        mock_sql(
            &mut server,
            "SELECT * FROM shootings WHERE extract(year from date_) = '2019'",
            json!({
                "rows": [
                    shooting(1, "2019-03-01T00:00:00Z"),
                    shooting(2, "2019-11-20T13:45:00Z"),
                ],
                "fields": fields,
            }),
            1,
        )
        .await,
        mock_sql(
            &mut server,
            "SELECT * FROM shootings WHERE extract(year from date_) = '2020'",
            json!({"rows": [shooting(3, "2020-07-04T00:00:00Z")], "fields": fields}),
            1,
        )
        .await,
    ];

    let mut job = SplitJob::new("shootings", expr);
    job.csv_dir = Some(csv_dir.clone());
    job.store = Some(StoreOptions {
        path: db_path.clone(),
        mode: WriteMode::Bulk,
    });

    //* When
    let stats = job.run(&client(&server)).await.expect("run succeeds");

    //* Then
    for mock in mocks {
        mock.assert_async().await;
    }
    assert_eq!(stats.partitions, 2);
    assert_eq!(stats.rows, 3);

    let summary: Value = serde_json::from_slice(
        &std::fs::read(csv_dir.join("shootings/summary.json")).expect("summary exists"),
    )
    .expect("summary is JSON");
    assert_eq!(
        summary,
        json!({
            "first_dt": "2019-03-01T00:00:00Z",
            "last_dt": "2020-07-04T00:00:00Z",
            "value_counts": {"2019": 2, "2020": 1},
        })
    );
    assert!(csv_dir.join("shootings/shootings_year_2019.csv").exists());
    assert!(csv_dir.join("shootings/shootings_year_2020.csv").exists());

    let mut store = dump::Store::open(&db_path).await.expect("reopen store");
    let shootings = table_catalog::catalog()
        .get("shootings")
        .expect("registered");
    assert_eq!(store.count(shootings).await.expect("count"), 3);
}

#[tokio::test]
async fn remote_error_aborts_the_run() {
    //* Given
    let mut server = mockito::Server::new_async().await;
    let probe_sql = sql::probe("widgets");
    let _probe = server
        .mock("POST", SQL_PATH)
        .match_body(Matcher::UrlEncoded("q".into(), probe_sql.clone()))
        .with_status(400)
        .with_body(r#"{"error": ["relation \"widgets\" does not exist"]}"#)
        .create_async()
        .await;

    let job = SplitJob::new("widgets", PartitionExpr::column("category"));

    //* When
    let result = job.run(&client(&server)).await;

    //* Then
    match result {
        Err(Error::Query(err)) => {
            assert_eq!(err.sql(), probe_sql);
            assert!(err.to_string().contains("does not exist"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn invalid_table_name_is_rejected_before_querying() {
    let server = mockito::Server::new_async().await;
    let job = SplitJob::new("widgets; DROP TABLE x", PartitionExpr::column("category"));

    let result = job.run(&client(&server)).await;

    assert!(matches!(result, Err(Error::InvalidIdentifier(_))));
}
