//! agenda service entry point
//!
//! Loads `.env`, reads configuration from the environment, installs
//! logging, opens the store, and serves HTTP on port 3000. A failed store
//! connection is logged and the service keeps running; store-backed
//! requests then answer 500.

use std::path::Path;
use std::sync::Arc;

use agenda::config::{load_env_file, AppConfig, ENV_FILE};
use agenda::http_server::HttpServer;
use agenda::store::{self, DocumentStore, UnavailableStore};
use agenda::telemetry;
use tracing::{debug, error, warn};

#[tokio::main]
async fn main() {
    let env_file = load_env_file(Path::new(ENV_FILE));
    let config = AppConfig::from_env();

    if let Err(e) = telemetry::init(&config.log) {
        eprintln!("{}", e);
    }

    match env_file {
        Ok(true) => debug!(path = ENV_FILE, "environment file loaded"),
        Ok(false) => {}
        Err(e) => warn!(error = %e, "environment file ignored"),
    }

    let store: Arc<dyn DocumentStore> = match store::connect(&config.store).await {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "store connection failed");
            Arc::new(UnavailableStore::new(e.to_string()))
        }
    };

    let server = HttpServer::new(config.listen, store);
    if let Err(e) = server.start().await {
        error!(error = %e, "server failed");
        std::process::exit(1);
    }
}
