//! HTTP surface for the groundwater data service.
//!
//! A thin routing layer: paths and query parameters are translated into
//! query-service calls by the handlers, nothing else lives here. The
//! store is injected as shared state at router construction, after the
//! load pass has completed.

pub mod handlers;

use std::net::SocketAddr;

use axum::{routing::get, Router};

pub use handlers::AppState;

/// Build the REST API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/datasets", get(handlers::list_datasets))
        .route("/data/:dataset_name", get(handlers::get_data))
        .route(
            "/data/:dataset_name/date/:date_str",
            get(handlers::get_data_by_date),
        )
        .route("/metadata/:dataset_name", get(handlers::get_metadata))
        .with_state(state)
}

/// Bind `addr` and serve requests until the process is terminated.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(state);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
