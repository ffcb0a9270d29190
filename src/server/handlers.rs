//! REST API handlers using axum.
//!
//! The handlers own boundary validation (pagination bounds, returned as
//! 422s) and the mapping from `QueryError` to status codes and the JSON
//! body shapes of the API contract. Error bodies echo the dataset name
//! exactly as the caller typed it.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::logging::{self, LogSource};
use crate::model::{MetadataRecord, QueryError, RowRecord};
use crate::query;
use crate::registry::DataStore;

/// Shared application state
pub type AppState = Arc<DataStore>;

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

/// Error body for 404/400/422 responses
#[derive(Serialize, Debug)]
pub struct ErrorDetail {
    pub detail: String,
}

/// Body of the dataset-exists-but-no-rows-match 404 — a distinct shape
/// from `ErrorDetail` so callers can tell an empty day from a missing
/// dataset.
#[derive(Serialize)]
pub struct EmptyResult {
    pub message: String,
}

type ApiError = (StatusCode, Json<ErrorDetail>);

fn dataset_not_found(name: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorDetail {
            detail: format!("Dataset '{}' not found", name),
        }),
    )
}

fn unprocessable(detail: String) -> ApiError {
    (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorDetail { detail }))
}

// ---------------------------------------------------------------------------
// Pagination parameters
// ---------------------------------------------------------------------------

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 1000;

/// Raw pagination parameters.
///
/// Taken as strings so this boundary layer controls the validation
/// response (422 with a reason) instead of the extractor rejecting
/// malformed values on its own.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    limit: Option<String>,
    offset: Option<String>,
}

impl PageParams {
    /// Validate into `(limit, offset)`: limit in 1..=1000 (default 100),
    /// offset a non-negative integer (default 0).
    fn validate(&self) -> Result<(usize, usize), ApiError> {
        let limit = match &self.limit {
            None => DEFAULT_LIMIT,
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if (1..=MAX_LIMIT).contains(&n) => n,
                _ => {
                    return Err(unprocessable(format!(
                        "limit must be an integer between 1 and {}",
                        MAX_LIMIT
                    )));
                }
            },
        };

        let offset = match &self.offset {
            None => 0,
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) => n,
                Err(_) => {
                    return Err(unprocessable(
                        "offset must be a non-negative integer".to_string(),
                    ));
                }
            },
        };

        Ok((limit, offset))
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /datasets - List available dataset keys
pub async fn list_datasets(State(store): State<AppState>) -> Json<Vec<String>> {
    logging::debug(LogSource::Server, None, "list datasets");
    Json(query::list_datasets(&store))
}

/// GET /data/:dataset_name - Paginated rows from a dataset
pub async fn get_data(
    State(store): State<AppState>,
    Path(dataset_name): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<RowRecord>>, ApiError> {
    let (limit, offset) = params.validate()?;
    logging::debug(
        LogSource::Server,
        Some(&dataset_name),
        &format!("rows request limit={} offset={}", limit, offset),
    );

    let rows = query::fetch_rows(&store, &dataset_name, limit, offset)
        .map_err(|_| dataset_not_found(&dataset_name))?;
    Ok(Json(rows))
}

/// GET /data/:dataset_name/date/:date_str - Rows on one calendar day
pub async fn get_data_by_date(
    State(store): State<AppState>,
    Path((dataset_name, date_str)): Path<(String, String)>,
) -> Result<Json<Vec<RowRecord>>, Response> {
    logging::debug(
        LogSource::Server,
        Some(&dataset_name),
        &format!("rows-by-date request date={}", date_str),
    );

    let rows = query::fetch_rows_for_date(&store, &dataset_name, &date_str).map_err(|e| {
        match e {
            QueryError::InvalidDate(_) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorDetail {
                    detail: "Invalid date format. Use YYYY-MM-DD.".to_string(),
                }),
            )
                .into_response(),
            QueryError::DatasetNotFound(_) | QueryError::MetadataNotFound(_) => {
                dataset_not_found(&dataset_name).into_response()
            }
        }
    })?;

    if rows.is_empty() {
        // Valid dataset, valid date, zero matches: success-shaped empty
        // signal with its own body, still a 404.
        return Err((
            StatusCode::NOT_FOUND,
            Json(EmptyResult {
                message: format!(
                    "No records found for {} in dataset '{}'",
                    date_str, dataset_name
                ),
            }),
        )
            .into_response());
    }

    Ok(Json(rows))
}

/// GET /metadata/:dataset_name - Descriptive metadata for a dataset
pub async fn get_metadata(
    State(store): State<AppState>,
    Path(dataset_name): Path<String>,
) -> Result<Json<MetadataRecord>, ApiError> {
    logging::debug(LogSource::Server, Some(&dataset_name), "metadata request");

    let meta = query::fetch_metadata(&store, &dataset_name).map_err(|_| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorDetail {
                detail: format!("Metadata for dataset '{}' not found", dataset_name),
            }),
        )
    })?;
    Ok(Json(meta.clone()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
