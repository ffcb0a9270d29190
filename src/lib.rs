//! Read-only HTTP API over groundwater time-series CSV exports.
//!
//! At startup the loader reads every CSV in the configured data
//! directory into an immutable in-memory store; the HTTP surface then
//! answers list, pagination, date-filter, and metadata queries against
//! it for the life of the process. There is no reload and no write path.

pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod query;
pub mod registry;
pub mod server;
