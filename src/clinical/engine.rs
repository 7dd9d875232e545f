use std::sync::Arc;

use crate::catalog::Catalog;
use crate::models::enums::RiskLevel;
use crate::models::{
    AbnormalityResult, AssessmentInput, AssessmentOutcome, RecommendationBundle, RiskScore,
    VitalFinding, VitalReading,
};

use super::recommend::recommend;
use super::scoring::{breakdown, level_of};
use super::vitals::classify;
use super::EngineError;

/// The clinical engine. Every operation is a pure function of its arguments
/// and the catalog snapshot the engine was built with.
pub trait RiskEngine {
    /// Classify one vital-sign reading.
    fn classify(&self, reading: &VitalReading) -> Result<AbnormalityResult, EngineError>;

    /// Classify a batch and keep only abnormal findings, in input order.
    /// The first invalid reading fails the whole batch.
    fn diagnose(&self, readings: &[VitalReading]) -> Result<Vec<VitalFinding>, EngineError>;

    /// Total risk score of an assessment.
    fn score(&self, input: &AssessmentInput) -> Result<RiskScore, EngineError>;

    /// Risk level for a score.
    fn level_of(&self, score: RiskScore) -> RiskLevel;

    /// Recommendation bundle for a risk level.
    fn recommend(&self, level: RiskLevel) -> RecommendationBundle;

    /// Score, level and recommendations for an assessment in one pass.
    fn assess(&self, input: &AssessmentInput) -> Result<AssessmentOutcome, EngineError>;
}

/// Default implementation over a shared catalog snapshot.
#[derive(Debug, Clone)]
pub struct DefaultRiskEngine {
    catalog: Arc<Catalog>,
}

impl DefaultRiskEngine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

impl RiskEngine for DefaultRiskEngine {
    fn classify(&self, reading: &VitalReading) -> Result<AbnormalityResult, EngineError> {
        classify(reading)
    }

    fn diagnose(&self, readings: &[VitalReading]) -> Result<Vec<VitalFinding>, EngineError> {
        let mut findings = Vec::new();

        for reading in readings {
            let result = classify(reading)?;
            if result.is_abnormal {
                findings.push(VitalFinding {
                    vital_type: reading.vital_type,
                    recorded_at: reading.recorded_at,
                    result,
                });
            }
        }

        tracing::debug!(
            readings = readings.len(),
            abnormal = findings.len(),
            "Vital diagnosis complete"
        );

        Ok(findings)
    }

    fn score(&self, input: &AssessmentInput) -> Result<RiskScore, EngineError> {
        breakdown(input, &self.catalog).map(|b| b.total())
    }

    fn level_of(&self, score: RiskScore) -> RiskLevel {
        level_of(score)
    }

    fn recommend(&self, level: RiskLevel) -> RecommendationBundle {
        recommend(level, &self.catalog)
    }

    fn assess(&self, input: &AssessmentInput) -> Result<AssessmentOutcome, EngineError> {
        let breakdown = breakdown(input, &self.catalog)?;
        let score = breakdown.total();
        let level = level_of(score);
        let recommendations = recommend(level, &self.catalog);

        tracing::info!(
            score,
            level = level.as_str(),
            recommendations = recommendations.len(),
            catalog_version = %self.catalog.version,
            "Assessment complete"
        );

        Ok(AssessmentOutcome {
            score,
            level,
            breakdown,
            recommendations,
            catalog_version: self.catalog.version.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::{ExposureHistory, Severity};
    use crate::models::{ScoreBreakdown, VitalType};

    fn engine() -> DefaultRiskEngine {
        DefaultRiskEngine::new(Arc::new(Catalog::bundled().unwrap()))
    }

    #[test]
    fn assess_combines_score_level_and_recommendations() {
        let engine = engine();
        let input = AssessmentInput {
            symptoms: ["fever".to_string(), "cough".to_string()].into(),
            temperature: Some(37.0),
            ..Default::default()
        };

        let outcome = engine.assess(&input).unwrap();
        assert_eq!(outcome.score, 6);
        assert_eq!(outcome.level, RiskLevel::Medium);
        assert_eq!(outcome.recommendations, engine.recommend(RiskLevel::Medium));
        assert_eq!(outcome.catalog_version, "2024.1");
        assert_eq!(
            outcome.breakdown,
            ScoreBreakdown {
                symptoms: 6,
                ..Default::default()
            }
        );
    }

    #[test]
    fn assess_matches_individual_operations() {
        let engine = engine();
        let input = AssessmentInput {
            risk_factors: ["age_65_plus".to_string()].into(),
            temperature: Some(39.5),
            exposure_history: ExposureHistory::Confirmed,
            ..Default::default()
        };

        let score = engine.score(&input).unwrap();
        let level = engine.level_of(score);
        let outcome = engine.assess(&input).unwrap();

        assert_eq!(outcome.score, score);
        assert_eq!(outcome.level, level);
        assert_eq!(level, RiskLevel::High);
        assert_eq!(outcome.recommendations, engine.recommend(level));
    }

    #[test]
    fn assess_propagates_invalid_input() {
        let input = AssessmentInput {
            symptoms: ["sneezing_fits".to_string()].into(),
            ..Default::default()
        };
        assert!(matches!(
            engine().assess(&input),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn diagnose_keeps_only_abnormal_findings_in_order() {
        let recorded_at = chrono::NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        let mut spo2 = VitalReading::scalar(VitalType::OxygenSaturation, 88.0);
        spo2.recorded_at = Some(recorded_at);

        let readings = vec![
            VitalReading::blood_pressure(165.0, 95.0),
            VitalReading::scalar(VitalType::HeartRate, 72.0),
            spo2,
            VitalReading::scalar(VitalType::Weight, 80.0),
        ];

        let findings = engine().diagnose(&readings).unwrap();
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].vital_type, VitalType::BloodPressure);
        assert_eq!(findings[0].result.severity, Severity::SevereHigh);
        assert_eq!(findings[1].vital_type, VitalType::OxygenSaturation);
        assert_eq!(findings[1].recorded_at, Some(recorded_at));
        assert_eq!(
            findings[1].result.reason_key.as_deref(),
            Some("oxygen_saturation_low")
        );
    }

    #[test]
    fn diagnose_fails_on_first_invalid_reading() {
        let readings = vec![
            VitalReading::scalar(VitalType::HeartRate, 130.0),
            VitalReading::scalar(VitalType::BloodPressure, 120.0),
        ];
        assert!(matches!(
            engine().diagnose(&readings),
            Err(EngineError::InvalidReading {
                vital: VitalType::BloodPressure,
                ..
            })
        ));
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        let engine = Arc::new(engine());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || engine.level_of(i * 4))
            })
            .collect();
        let levels: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(
            levels,
            [
                RiskLevel::VeryLow,
                RiskLevel::Low,
                RiskLevel::High,
                RiskLevel::VeryHigh
            ]
        );
    }
}
