use std::ffi::OsString;
use std::path::PathBuf;

use crate::catalog::{Catalog, CatalogError};

/// Application-level constants
pub const APP_NAME: &str = "vitalrisk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable naming a catalog JSON file to load instead of the bundled one.
pub const CATALOG_ENV_VAR: &str = "VITALRISK_CATALOG";

/// File name looked up under the application data directory.
pub const CATALOG_FILE_NAME: &str = "catalog.json";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "vitalrisk=info,vitalrisk_lib=info"
}

/// Get the application data directory (~/.vitalrisk/).
/// None when the home directory cannot be determined.
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".vitalrisk"))
}

/// Default location of a user-provided catalog override.
pub fn default_catalog_path() -> Option<PathBuf> {
    app_data_dir().map(|dir| dir.join(CATALOG_FILE_NAME))
}

/// Where the engine's static catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// A JSON catalog on disk.
    File(PathBuf),
    /// The catalog compiled into the binary.
    Bundled,
}

/// Engine configuration resolved once at process start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub catalog: CatalogSource,
}

impl EngineConfig {
    /// Resolve from `VITALRISK_CATALOG`, then `~/.vitalrisk/catalog.json`, then the bundled catalog.
    pub fn from_env() -> Self {
        Self::resolve(std::env::var_os(CATALOG_ENV_VAR), default_catalog_path())
    }

    /// Resolution rules without touching the process environment.
    /// An explicit override always wins, even if the file does not exist.
    pub fn resolve(env_override: Option<OsString>, default_path: Option<PathBuf>) -> Self {
        let catalog = match env_override {
            Some(path) if !path.is_empty() => CatalogSource::File(PathBuf::from(path)),
            _ => match default_path {
                Some(path) if path.is_file() => CatalogSource::File(path),
                _ => CatalogSource::Bundled,
            },
        };
        Self { catalog }
    }

    /// Load and validate the configured catalog.
    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        match &self.catalog {
            CatalogSource::File(path) => Catalog::load(path),
            CatalogSource::Bundled => {
                tracing::debug!("No catalog override found, using bundled catalog");
                Catalog::bundled()
            }
        }
    }
}
