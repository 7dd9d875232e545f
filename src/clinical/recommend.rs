use crate::catalog::Catalog;
use crate::models::enums::{RecommendationCategory, RiskLevel};
use crate::models::{Recommendation, RecommendationBundle};

/// Look up the recommendation bundle for a risk level.
///
/// Pure table lookup: records come out in the order they are authored, each
/// tagged with the category of the list it was authored in.
pub fn recommend(level: RiskLevel, catalog: &Catalog) -> RecommendationBundle {
    let mut bundle = RecommendationBundle::default();

    let Some(table) = catalog.level_table(level) else {
        // Unreachable for a validated catalog.
        tracing::warn!(
            level = level.as_str(),
            catalog_version = %catalog.version,
            "No recommendations for level"
        );
        return bundle;
    };

    for category in RecommendationCategory::ALL {
        *bundle.category_mut(*category) = table
            .entries(*category)
            .iter()
            .map(|entry| Recommendation {
                key: entry.key.clone(),
                category: *category,
                priority: entry.priority,
                kind: entry.kind,
                params: entry.params.clone(),
            })
            .collect();
    }

    bundle
}
