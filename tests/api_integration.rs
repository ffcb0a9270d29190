//! Integration tests for the HTTP surface.
//!
//! These tests verify:
//! 1. Dataset listing after a real load pass
//! 2. Paginated row fetch, including defaults and boundary validation
//! 3. Date-filtered fetch with all three of its failure shapes
//! 4. Metadata lookup
//! 5. Key normalization collisions resolving last-write-wins
//!
//! Everything runs in-process: fixture CSVs are written to a temp
//! directory, loaded through the real ingest path, and requests are
//! dispatched to the real router with `tower::ServiceExt::oneshot` —
//! no sockets, no network.

use std::io::Write;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use gwdata_service::ingest;
use gwdata_service::registry::DataStore;
use gwdata_service::server;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn write_csv(dir: &tempfile::TempDir, name: &str, contents: &str) {
    let mut file = std::fs::File::create(dir.path().join(name)).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
}

/// Build a router over a freshly-loaded fixture directory:
/// - `Well A.csv`: three valid rows (two on 2020-01-01, one on
///   2020-01-02) plus one row with a null `Data Value`, with metadata
///   columns
/// - `Plant A.csv` / `Plant-A.csv`: colliding keys, one row vs two
fn fixture_app() -> Router {
    let dir = tempfile::tempdir().unwrap();
    write_csv(
        &dir,
        "Well A.csv",
        "Data Time,Data Value,Data Source,Period\n\
         2020-01-01 00:00:00,1.5,DWR,2000-2020\n\
         2020-01-01 12:00:00,2.5,DWR,2000-2020\n\
         2020-01-02 00:00:00,3.5,DWR,2000-2020\n\
         2020-01-03 00:00:00,,DWR,2000-2020\n",
    );
    write_csv(
        &dir,
        "Plant A.csv",
        "Data Time,Data Value\n2021-05-01 00:00:00,10.0\n",
    );
    write_csv(
        &dir,
        "Plant-A.csv",
        "Data Time,Data Value\n\
         2021-06-01 00:00:00,20.0\n\
         2021-06-02 00:00:00,30.0\n",
    );

    let mut store = DataStore::new();
    ingest::load_directory(dir.path(), &mut store).unwrap();
    server::build_router(Arc::new(store))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn row_values(body: &serde_json::Value) -> Vec<f64> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|row| row["Data Value"].as_f64().unwrap())
        .collect()
}

// ---------------------------------------------------------------------------
// /datasets
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_list_datasets_contains_each_key_once() {
    let app = fixture_app();
    let (status, body) = get(&app, "/datasets").await;

    assert_eq!(status, StatusCode::OK);
    let mut keys: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|k| k.as_str().unwrap())
        .collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["planta", "wella"]);
}

// ---------------------------------------------------------------------------
// /data/:dataset_name
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_get_data_returns_filtered_rows_with_all_columns() {
    let app = fixture_app();
    let (status, body) = get(&app, "/data/wella").await;

    assert_eq!(status, StatusCode::OK);
    // The null-value row was dropped at load time.
    assert_eq!(row_values(&body), vec![1.5, 2.5, 3.5]);

    // Every column of the source schema round-trips.
    let first = &body[0];
    assert_eq!(first["Data Time"], serde_json::json!("2020-01-01T00:00:00"));
    assert_eq!(first["Data Source"], serde_json::json!("DWR"));
    assert_eq!(first["Period"], serde_json::json!("2000-2020"));
}

#[tokio::test]
async fn test_get_data_pagination_reconstructs_without_overlap() {
    let app = fixture_app();

    let (_, page1) = get(&app, "/data/wella?limit=2&offset=0").await;
    let (_, page2) = get(&app, "/data/wella?limit=2&offset=2").await;
    let (status, page3) = get(&app, "/data/wella?limit=2&offset=4").await;

    let mut all = row_values(&page1);
    all.extend(row_values(&page2));
    assert_eq!(all, vec![1.5, 2.5, 3.5]);

    // Offset past the end is an empty 200, not an error.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page3, serde_json::json!([]));
}

#[tokio::test]
async fn test_get_data_name_is_matched_case_insensitively() {
    let app = fixture_app();
    let (status, body) = get(&app, "/data/WellA?limit=10").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(row_values(&body).len(), 3);
}

#[tokio::test]
async fn test_get_data_unknown_dataset_is_404_with_detail() {
    let app = fixture_app();
    let (status, body) = get(&app, "/data/unknown?limit=10").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        serde_json::json!({"detail": "Dataset 'unknown' not found"})
    );
}

#[tokio::test]
async fn test_get_data_rejects_out_of_range_parameters() {
    let app = fixture_app();

    for uri in [
        "/data/wella?limit=0",
        "/data/wella?limit=1001",
        "/data/wella?limit=ten",
        "/data/wella?offset=-1",
        "/data/wella?offset=abc",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "uri={}", uri);
        assert!(body["detail"].is_string(), "uri={}", uri);
    }
}

// ---------------------------------------------------------------------------
// /data/:dataset_name/date/:date_str
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_date_fetch_matches_whole_calendar_day() {
    let app = fixture_app();
    let (status, body) = get(&app, "/data/wella/date/2020-01-01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(row_values(&body), vec![1.5, 2.5]);
}

#[tokio::test]
async fn test_date_fetch_empty_day_has_its_own_404_shape() {
    let app = fixture_app();
    let (status, body) = get(&app, "/data/wella/date/2020-03-01").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        serde_json::json!({
            "message": "No records found for 2020-03-01 in dataset 'wella'"
        })
    );
}

#[tokio::test]
async fn test_date_fetch_invalid_date_is_400() {
    let app = fixture_app();

    for bad in ["2020-13-99", "01-01-2020", "yesterday"] {
        let (status, body) = get(&app, &format!("/data/wella/date/{}", bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "date={}", bad);
        assert_eq!(
            body,
            serde_json::json!({"detail": "Invalid date format. Use YYYY-MM-DD."})
        );
    }
}

#[tokio::test]
async fn test_date_fetch_unknown_dataset_is_404_with_detail() {
    let app = fixture_app();
    let (status, body) = get(&app, "/data/unknown/date/2020-01-01").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        serde_json::json!({"detail": "Dataset 'unknown' not found"})
    );
}

// ---------------------------------------------------------------------------
// /metadata/:dataset_name
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_metadata_returns_only_present_columns() {
    let app = fixture_app();
    let (status, body) = get(&app, "/metadata/wella").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!({"Data Source": "DWR", "Period": "2000-2020"})
    );
}

#[tokio::test]
async fn test_metadata_with_no_descriptive_columns_is_empty_object() {
    let app = fixture_app();
    let (status, body) = get(&app, "/metadata/planta").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({}));
}

#[tokio::test]
async fn test_metadata_unknown_dataset_is_404_with_detail() {
    let app = fixture_app();
    let (status, body) = get(&app, "/metadata/unknown").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        serde_json::json!({"detail": "Metadata for dataset 'unknown' not found"})
    );
}

// ---------------------------------------------------------------------------
// Key collisions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_colliding_file_names_resolve_last_write_wins() {
    let app = fixture_app();
    let (status, body) = get(&app, "/data/planta").await;

    // "Plant A.csv" sorts before "Plant-A.csv", so the hyphenated file's
    // two rows are the ones served.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(row_values(&body), vec![20.0, 30.0]);
}
