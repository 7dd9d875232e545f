use std::collections::BTreeSet;
use std::path::Path;

use crate::models::enums::{RecommendationCategory, RiskLevel};

use super::types::Catalog;
use super::CatalogError;

/// Catalog shipped with the crate.
const BUNDLED_CATALOG: &str = include_str!("../../resources/catalog.json");

/// Allowed risk-factor weight range.
const RISK_FACTOR_WEIGHT_RANGE: std::ops::RangeInclusive<u32> = 1..=3;

impl Catalog {
    /// Load and validate a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::Load(path.display().to_string(), e.to_string())
        })?;
        let catalog = Self::from_json(&path.display().to_string(), &json)?;

        tracing::info!(
            path = %path.display(),
            version = %catalog.version,
            "Catalog loaded"
        );

        Ok(catalog)
    }

    /// The catalog compiled into the crate.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json("bundled catalog.json", BUNDLED_CATALOG)
    }

    /// Parse and validate. `origin` only labels errors.
    pub fn from_json(origin: &str, json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)
            .map_err(|e| CatalogError::Parse(origin.to_string(), e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check the catalog's internal invariants. Collects every problem
    /// rather than stopping at the first one.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut problems = Vec::new();

        if self.version.trim().is_empty() {
            problems.push("version is empty".to_string());
        }

        let mut seen = BTreeSet::new();
        for symptom in &self.symptoms {
            if !seen.insert(symptom.id.as_str()) {
                problems.push(format!("duplicate symptom '{}'", symptom.id));
            }
        }

        let mut seen = BTreeSet::new();
        for factor in &self.risk_factors {
            if !seen.insert(factor.id.as_str()) {
                problems.push(format!("duplicate risk factor '{}'", factor.id));
            }
            if !RISK_FACTOR_WEIGHT_RANGE.contains(&factor.weight) {
                problems.push(format!(
                    "risk factor '{}' has weight {} outside 1-3",
                    factor.id, factor.weight
                ));
            }
        }

        for level in RiskLevel::ALL {
            let Some(table) = self.recommendations.get(level) else {
                problems.push(format!("no recommendations for level '{level}'"));
                continue;
            };
            if table.is_empty() {
                problems.push(format!("recommendations for level '{level}' are empty"));
            }

            for category in RecommendationCategory::ALL {
                let mut keys = BTreeSet::new();
                for entry in table.entries(*category) {
                    if !self.has_recommendation_key(&entry.key) {
                        problems.push(format!(
                            "{level}/{category}: key '{}' is not in recommendation_keys",
                            entry.key
                        ));
                    }
                    if !keys.insert(entry.key.as_str()) {
                        problems.push(format!(
                            "{level}/{category}: duplicate key '{}'",
                            entry.key
                        ));
                    }
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::Invalid {
                version: self.version.clone(),
                problems,
            })
        }
    }
}
