//! Service entry point.
//!
//! Startup order is a hard precondition, not a race to defend against:
//! configuration, then logging, then one synchronous load pass, and only
//! then the HTTP listener. Queries never observe a partially-built store.

use std::net::SocketAddr;
use std::sync::Arc;

use gwdata_service::config::Config;
use gwdata_service::ingest;
use gwdata_service::logging::{self, LogLevel, LogSource};
use gwdata_service::registry::DataStore;
use gwdata_service::server;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "gwdata.toml".to_string());
    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let level = LogLevel::parse(&config.log_level).unwrap_or(LogLevel::Info);
    logging::init_logger(level, config.log_file.as_deref());

    let mut store = DataStore::new();
    let summary = match ingest::load_directory(&config.data_dir, &mut store) {
        Ok(summary) => summary,
        Err(e) => {
            logging::error(
                LogSource::System,
                None,
                &format!("cannot read data directory: {}", e),
            );
            std::process::exit(1);
        }
    };
    logging::log_load_summary(
        summary.total(),
        summary.loaded.len(),
        summary.failed.len(),
    );

    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            logging::error(
                LogSource::Config,
                None,
                &format!("invalid listen address {}:{}: {}", config.host, config.port, e),
            );
            std::process::exit(1);
        }
    };

    logging::info(
        LogSource::Server,
        None,
        &format!("serving {} datasets on {}", store.len(), addr),
    );
    if let Err(e) = server::serve(addr, Arc::new(store)).await {
        logging::error(LogSource::Server, None, &format!("server error: {}", e));
        std::process::exit(1);
    }
}
