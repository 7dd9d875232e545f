//! JSON command surface over the clinical engine.
//!
//! One request in, one response out. Used by the `vitalrisk` binary so the
//! portal's form layer (or a batch job) can drive the engine without linking it.
//!
//! Commands:
//! - `classify`: one vital reading → abnormality result
//! - `diagnose`: a batch of readings → abnormal findings only
//! - `assess`: an assessment → score, level, recommendations
//! - `legacy`: a legacy sentence → display key, or the verbatim text as fallback

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::clinical::engine::RiskEngine;
use crate::clinical::EngineError;
use crate::legacy::{to_display_key, DisplayKey};
use crate::models::{
    AbnormalityResult, AssessmentInput, AssessmentOutcome, VitalFinding, VitalReading,
};

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed request: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Request {
    Classify { reading: VitalReading },
    Diagnose { readings: Vec<VitalReading> },
    Assess { input: AssessmentInput },
    Legacy { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "result", rename_all = "snake_case")]
pub enum Response {
    Classify(AbnormalityResult),
    Diagnose(Vec<VitalFinding>),
    Assess(AssessmentOutcome),
    Legacy(LegacyTranslation),
}

/// Outcome of a legacy lookup. Exactly one of the two fields is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyTranslation {
    pub display_key: Option<DisplayKey>,
    /// The original text, when no key could be recovered.
    pub fallback: Option<String>,
}

/// Dispatch a single request.
pub fn handle(engine: &impl RiskEngine, request: Request) -> Result<Response, EngineError> {
    match request {
        Request::Classify { reading } => engine.classify(&reading).map(Response::Classify),
        Request::Diagnose { readings } => engine.diagnose(&readings).map(Response::Diagnose),
        Request::Assess { input } => engine.assess(&input).map(Response::Assess),
        Request::Legacy { text } => {
            let display_key = to_display_key(&text);
            let fallback = display_key.is_none().then_some(text);
            Ok(Response::Legacy(LegacyTranslation {
                display_key,
                fallback,
            }))
        }
    }
}

/// Read one JSON request, handle it, write the JSON response.
pub fn run_request(
    engine: &impl RiskEngine,
    mut input: impl Read,
    mut output: impl Write,
) -> Result<(), CommandError> {
    let mut body = String::new();
    input.read_to_string(&mut body)?;

    let request: Request = serde_json::from_str(&body)?;
    let response = handle(engine, request)?;

    serde_json::to_writer_pretty(&mut output, &response)?;
    writeln!(output)?;
    Ok(())
}
