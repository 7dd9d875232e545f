use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::enums::{ExposureHistory, RiskLevel};
use super::recommendation::RecommendationBundle;

/// Integer risk score, derived from an assessment and never stored on its own.
pub type RiskScore = u32;

/// One user-submitted symptom assessment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentInput {
    #[serde(default)]
    pub symptoms: BTreeSet<String>,
    #[serde(default)]
    pub risk_factors: BTreeSet<String>,
    /// Body temperature in °C, if measured.
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub exposure_history: ExposureHistory,
}

/// Per-step contributions, in evaluation order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub symptoms: u32,
    pub risk_factors: u32,
    pub temperature: u32,
    pub exposure: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> RiskScore {
        self.symptoms + self.risk_factors + self.temperature + self.exposure
    }
}

/// Everything the persistence layer attaches to a stored assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentOutcome {
    pub score: RiskScore,
    pub level: RiskLevel,
    pub breakdown: ScoreBreakdown,
    pub recommendations: RecommendationBundle,
    /// Version of the catalog the outcome was computed against.
    pub catalog_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakdown_total() {
        let breakdown = ScoreBreakdown {
            symptoms: 6,
            risk_factors: 3,
            temperature: 2,
            exposure: 4,
        };
        assert_eq!(breakdown.total(), 15);
    }

    #[test]
    fn input_defaults_when_fields_absent() {
        let input: AssessmentInput = serde_json::from_str("{}").unwrap();
        assert!(input.symptoms.is_empty());
        assert!(input.risk_factors.is_empty());
        assert_eq!(input.temperature, None);
        assert_eq!(input.exposure_history, ExposureHistory::None);
    }

    #[test]
    fn input_deserializes_portal_payload() {
        let input: AssessmentInput = serde_json::from_str(
            r#"{
                "symptoms": ["fever", "cough", "fever"],
                "riskFactors": ["age_65_plus"],
                "temperature": 38.2,
                "exposureHistory": "suspected"
            }"#,
        )
        .unwrap();
        assert_eq!(input.symptoms.len(), 2);
        assert!(input.risk_factors.contains("age_65_plus"));
        assert_eq!(input.temperature, Some(38.2));
        assert_eq!(input.exposure_history, ExposureHistory::Suspected);
    }

    #[test]
    fn unknown_exposure_is_rejected_at_the_boundary() {
        let parsed: Result<AssessmentInput, _> =
            serde_json::from_str(r#"{"exposureHistory":"sometimes"}"#);
        assert!(parsed.is_err());
    }
}
