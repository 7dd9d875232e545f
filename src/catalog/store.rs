use std::sync::{Arc, RwLock};

use crate::clinical::engine::DefaultRiskEngine;

use super::types::Catalog;
use super::CatalogError;

/// Holds the process-wide catalog snapshot.
///
/// Readers clone the `Arc` and compute against that snapshot for as long as
/// they need it. A reload replaces the whole reference; entries are never
/// mutated in place, so no caller can observe a half-updated catalog.
pub struct CatalogStore {
    current: RwLock<Arc<Catalog>>,
}

impl CatalogStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    /// Current snapshot.
    pub fn current(&self) -> Result<Arc<Catalog>, CatalogError> {
        let current = self.current.read().map_err(|_| CatalogError::LockFailed)?;
        Ok(Arc::clone(&current))
    }

    /// Validate `catalog` and atomically make it current.
    /// Returns the snapshot it replaced. An invalid catalog leaves the store untouched.
    pub fn swap(&self, catalog: Catalog) -> Result<Arc<Catalog>, CatalogError> {
        catalog.validate()?;
        let replacement = Arc::new(catalog);

        let mut current = self.current.write().map_err(|_| CatalogError::LockFailed)?;
        let previous = std::mem::replace(&mut *current, replacement);

        tracing::info!(
            from = %previous.version,
            to = %current.version,
            "Catalog swapped"
        );

        Ok(previous)
    }

    /// Engine bound to the current snapshot.
    pub fn engine(&self) -> Result<DefaultRiskEngine, CatalogError> {
        Ok(DefaultRiskEngine::new(self.current()?))
    }
}
