pub mod engine;
pub mod recommend;
pub mod scoring;
pub mod vitals;

use thiserror::Error;

use crate::models::VitalType;

/// Local validation failures. Never retried: the same input fails the same way.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid {vital} reading: {reason}")]
    InvalidReading { vital: VitalType, reason: String },

    #[error("Invalid assessment input: {0}")]
    InvalidInput(String),
}

/// Which side of the normal band a reading falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Low,
    High,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Low => "low",
            Direction::High => "high",
        }
    }
}
