//! Catalog Indexer Main Entry Point
//!
//! Runs one full reindex of the ocean-current imagery catalog: rebuilds
//! the search index from the remote JSON manifests and the surface waves
//! bucket, then atomically repoints the query alias.

use std::env;
use std::sync::Arc;

use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use catalog_indexer::callback::{LogCallback, ReindexCallback};
use catalog_indexer::{Dependencies, IndexingError};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("catalog_indexer=info,catalog_indexer_repository=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
        .init();

    info!(
        service_name = "catalog-indexer",
        service_version = env!("CARGO_PKG_VERSION"),
        "Tracing initialized"
    );
}

#[tokio::main]
async fn main() -> Result<(), IndexingError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    // A full rebuild only runs with the explicit --confirm flag
    let confirm = env::args().any(|arg| arg == "--confirm");

    info!("Starting catalog reindexer");

    let deps = match Dependencies::new().await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let callback: Arc<dyn ReindexCallback> = Arc::new(LogCallback);

    match deps.orchestrator.reindex_all(confirm, Some(callback)).await {
        Ok(()) => {
            info!("Reindex completed successfully");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Reindex failed");
            Err(e.into())
        }
    }
}
