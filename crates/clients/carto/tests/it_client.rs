//! Integration tests for the SQL API client against a mock server

use carto_client::{Client, RemoteQueryError};
use mockito::{Matcher, Server};

fn sql_url(server: &Server) -> url::Url {
    format!("{}/api/v2/sql", server.url())
        .parse()
        .expect("valid mock URL")
}

#[tokio::test]
async fn execute_sends_sql_as_form_data() {
    //* Given
    let mut server = Server::new_async().await;
    let sql = "SELECT * FROM widgets WHERE category = 'a'";

    let mock = server
        .mock("POST", "/api/v2/sql")
        .match_body(Matcher::UrlEncoded("q".into(), sql.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "rows": [{"cartodb_id": 1, "category": "a"}],
                "time": 0.002,
                "fields": {
                    "cartodb_id": {"type": "number", "pgtype": "int4"},
                    "category": {"type": "string", "pgtype": "text"}
                },
                "total_rows": 1
            }"#,
        )
        .expect(1)
        .create_async()
        .await;

    let client = Client::new(sql_url(&server));

    //* When
    let response = client.execute(sql).await.expect("query succeeds");

    //* Then
    mock.assert_async().await;
    assert_eq!(response.rows.len(), 1);
    assert_eq!(response.rows[0]["category"], "a");
    assert_eq!(response.fields.names(), vec!["cartodb_id", "category"]);
}

#[tokio::test]
async fn execute_reports_service_error_with_sql_and_body() {
    //* Given
    let mut server = Server::new_async().await;
    let sql = "SELECT * FROM missing_table LIMIT 0";
    let body = r#"{"error":["relation \"missing_table\" does not exist"]}"#;

    let mock = server
        .mock("POST", "/api/v2/sql")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(body)
        .expect(1)
        .create_async()
        .await;

    let client = Client::new(sql_url(&server));

    //* When
    let err = client.execute(sql).await.expect_err("service error");

    //* Then
    mock.assert_async().await;
    match err {
        RemoteQueryError::MissingRows { sql: sent, response } => {
            assert_eq!(sent, sql);
            assert_eq!(response, body);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn execute_treats_rows_as_success_regardless_of_status() {
    //* Given
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/api/v2/sql")
        .with_status(500)
        .with_body(r#"{"rows": []}"#)
        .expect(1)
        .create_async()
        .await;

    let client = Client::new(sql_url(&server));

    //* When
    let response = client.execute("SELECT 1").await;

    //* Then
    mock.assert_async().await;
    assert!(response.expect("rows present").rows.is_empty());
}

#[tokio::test]
async fn execute_reports_network_failure() {
    //* Given
    let client = Client::new(
        "http://127.0.0.1:1/api/v2/sql"
            .parse()
            .expect("valid URL"),
    );

    //* When
    let err = client.execute("SELECT 1").await.expect_err("nothing listens on port 1");

    //* Then
    assert!(matches!(err, RemoteQueryError::Network { .. }));
    assert_eq!(err.sql(), "SELECT 1");
}
