pub mod reference;
pub mod store;
pub mod types;

pub use store::CatalogStore;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog load failed ({0}): {1}")]
    Load(String, String),

    #[error("Catalog parse failed ({0}): {1}")]
    Parse(String, String),

    #[error("Catalog {version} is invalid: {}", .problems.join("; "))]
    Invalid {
        version: String,
        problems: Vec<String>,
    },

    #[error("Internal lock failed")]
    LockFailed,
}
