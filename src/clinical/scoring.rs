use crate::catalog::Catalog;
use crate::models::enums::RiskLevel;
use crate::models::{AssessmentInput, RiskScore, ScoreBreakdown};

use super::EngineError;

/// Lower bound of each level, highest first. First match wins.
const LEVEL_BOUNDS: [(RiskScore, RiskLevel); 4] = [
    (12, RiskLevel::VeryHigh),
    (8, RiskLevel::High),
    (5, RiskLevel::Medium),
    (2, RiskLevel::Low),
];

/// Temperature bands (°C, points), highest first. Only the first match contributes.
const TEMPERATURE_BANDS: [(f64, u32); 3] = [(39.0, 3), (38.0, 2), (37.5, 1)];

/// Score an assessment, step by step, in the fixed order:
/// symptoms, risk factors, temperature, exposure.
pub fn breakdown(input: &AssessmentInput, catalog: &Catalog) -> Result<ScoreBreakdown, EngineError> {
    if let Some(temperature) = input.temperature {
        if !temperature.is_finite() {
            tracing::warn!("Assessment rejected: temperature is not finite");
            return Err(EngineError::InvalidInput(
                "temperature is not a finite number".into(),
            ));
        }
    }

    let mut unknown = Vec::new();

    let mut symptoms = 0;
    for id in &input.symptoms {
        match catalog.symptom_weight(id) {
            Some(weight) => symptoms += weight,
            None => unknown.push(format!("symptom '{id}'")),
        }
    }

    let mut risk_factors = 0;
    for id in &input.risk_factors {
        match catalog.risk_factor_weight(id) {
            Some(weight) => risk_factors += weight,
            None => unknown.push(format!("risk factor '{id}'")),
        }
    }

    if !unknown.is_empty() {
        tracing::warn!(
            catalog_version = %catalog.version,
            unknown = unknown.len(),
            "Assessment rejected: identifiers outside the catalog"
        );
        return Err(EngineError::InvalidInput(format!(
            "unknown identifiers: {}",
            unknown.join(", ")
        )));
    }

    Ok(ScoreBreakdown {
        symptoms,
        risk_factors,
        temperature: input.temperature.map(temperature_points).unwrap_or(0),
        exposure: input.exposure_history.weight(),
    })
}

/// Total risk score of an assessment.
pub fn score(input: &AssessmentInput, catalog: &Catalog) -> Result<RiskScore, EngineError> {
    breakdown(input, catalog).map(|b| b.total())
}

/// Points contributed by a body temperature.
pub fn temperature_points(celsius: f64) -> u32 {
    TEMPERATURE_BANDS
        .iter()
        .find(|(threshold, _)| celsius >= *threshold)
        .map(|(_, points)| *points)
        .unwrap_or(0)
}

/// Map a score onto its risk level. Boundary values belong to the higher level.
pub fn level_of(score: RiskScore) -> RiskLevel {
    LEVEL_BOUNDS
        .iter()
        .find(|(bound, _)| score >= *bound)
        .map(|(_, level)| *level)
        .unwrap_or(RiskLevel::VeryLow)
}
