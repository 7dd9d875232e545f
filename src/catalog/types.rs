use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::models::enums::{
    Priority, RecommendationCategory, RecommendationType, RiskLevel, SymptomSeverity,
};

/// Symptom identifier with its fixed severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomEntry {
    pub id: String,
    pub severity: SymptomSeverity,
}

/// Risk-factor identifier with its fixed weight (1–3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactorEntry {
    pub id: String,
    pub weight: u32,
}

/// One row of the recommendation decision table. The category comes from
/// the list the row is authored in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationEntry {
    pub key: String,
    pub priority: Priority,
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, f64>,
}

/// Decision table rows for a single risk level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelRecommendations {
    #[serde(default)]
    pub testing: Vec<RecommendationEntry>,
    #[serde(default)]
    pub isolation: Vec<RecommendationEntry>,
    #[serde(default)]
    pub monitoring: Vec<RecommendationEntry>,
    #[serde(default)]
    pub medical: Vec<RecommendationEntry>,
    #[serde(default)]
    pub prevention: Vec<RecommendationEntry>,
}

impl LevelRecommendations {
    pub fn entries(&self, category: RecommendationCategory) -> &[RecommendationEntry] {
        match category {
            RecommendationCategory::Testing => &self.testing,
            RecommendationCategory::Isolation => &self.isolation,
            RecommendationCategory::Monitoring => &self.monitoring,
            RecommendationCategory::Medical => &self.medical,
            RecommendationCategory::Prevention => &self.prevention,
        }
    }

    pub fn is_empty(&self) -> bool {
        RecommendationCategory::ALL
            .iter()
            .all(|c| self.entries(*c).is_empty())
    }
}

/// Immutable, versioned configuration the engine computes against.
///
/// Loaded once (see `reference.rs`) and shared as `Arc<Catalog>`. Never
/// mutated after validation; a reload builds a new value and swaps it in
/// through `CatalogStore`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub version: String,
    pub symptoms: Vec<SymptomEntry>,
    pub risk_factors: Vec<RiskFactorEntry>,
    /// Closed set of keys the localization layer knows how to render.
    pub recommendation_keys: BTreeSet<String>,
    pub recommendations: BTreeMap<RiskLevel, LevelRecommendations>,
}

impl Catalog {
    /// Score weight of a symptom, None if the identifier is unknown.
    pub fn symptom_weight(&self, id: &str) -> Option<u32> {
        self.symptoms
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.severity.weight())
    }

    /// Score weight of a risk factor, None if the identifier is unknown.
    pub fn risk_factor_weight(&self, id: &str) -> Option<u32> {
        self.risk_factors
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.weight)
    }

    pub fn has_recommendation_key(&self, key: &str) -> bool {
        self.recommendation_keys.contains(key)
    }

    pub fn level_table(&self, level: RiskLevel) -> Option<&LevelRecommendations> {
        self.recommendations.get(&level)
    }
}
