use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::enums::{Priority, RecommendationCategory, RecommendationType};

/// A structured, localizable recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub key: String,
    pub category: RecommendationCategory,
    pub priority: Priority,
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, f64>,
}

/// Recommendations for one risk level, grouped by category.
/// Regenerated from the risk level rather than patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationBundle {
    pub testing: Vec<Recommendation>,
    pub isolation: Vec<Recommendation>,
    pub monitoring: Vec<Recommendation>,
    pub medical: Vec<Recommendation>,
    pub prevention: Vec<Recommendation>,
}

impl RecommendationBundle {
    pub fn category(&self, category: RecommendationCategory) -> &[Recommendation] {
        match category {
            RecommendationCategory::Testing => &self.testing,
            RecommendationCategory::Isolation => &self.isolation,
            RecommendationCategory::Monitoring => &self.monitoring,
            RecommendationCategory::Medical => &self.medical,
            RecommendationCategory::Prevention => &self.prevention,
        }
    }

    pub(crate) fn category_mut(
        &mut self,
        category: RecommendationCategory,
    ) -> &mut Vec<Recommendation> {
        match category {
            RecommendationCategory::Testing => &mut self.testing,
            RecommendationCategory::Isolation => &mut self.isolation,
            RecommendationCategory::Monitoring => &mut self.monitoring,
            RecommendationCategory::Medical => &mut self.medical,
            RecommendationCategory::Prevention => &mut self.prevention,
        }
    }

    /// Categories in field order with their records.
    pub fn iter(&self) -> impl Iterator<Item = (RecommendationCategory, &[Recommendation])> {
        RecommendationCategory::ALL
            .iter()
            .map(move |c| (*c, self.category(*c)))
    }

    pub fn len(&self) -> usize {
        self.iter().map(|(_, records)| records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every record's category equals the name of the list it lives in.
    pub fn is_self_consistent(&self) -> bool {
        self.iter()
            .all(|(category, records)| records.iter().all(|r| r.category == category))
    }

    /// Highest priority across all categories.
    pub fn highest_priority(&self) -> Option<Priority> {
        self.iter()
            .flat_map(|(_, records)| records.iter().map(|r| r.priority))
            .max()
    }
}
