pub mod catalog;
pub mod clinical;
pub mod commands;
pub mod config;
pub mod legacy;
pub mod models;

use std::fs::File;

use tracing_subscriber::EnvFilter;

use crate::catalog::CatalogStore;
use crate::commands::CommandError;
use crate::config::EngineConfig;

pub use crate::clinical::engine::{DefaultRiskEngine, RiskEngine};
pub use crate::clinical::EngineError;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Entry point of the `vitalrisk` binary.
///
/// Loads the configured catalog, then answers one JSON request read from the
/// file named by the first argument (or stdin) on stdout.
pub fn run() -> Result<(), CommandError> {
    init_tracing();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let engine_config = EngineConfig::from_env();
    let catalog = engine_config.load_catalog()?;
    tracing::info!(
        source = ?engine_config.catalog,
        version = %catalog.version,
        "Catalog ready"
    );

    let store = CatalogStore::new(catalog);
    let engine = store.engine()?;

    let stdout = std::io::stdout().lock();
    match std::env::args_os().nth(1) {
        Some(path) => commands::run_request(&engine, File::open(path)?, stdout),
        None => commands::run_request(&engine, std::io::stdin().lock(), stdout),
    }
}
