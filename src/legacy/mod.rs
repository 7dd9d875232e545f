//! Read-time translation of legacy free-text reasons into structured keys.
//!
//! Records written before the structured format stored already-localized
//! sentences. This module recovers a display key from them where it can and
//! returns `None` otherwise, so callers fall back to the verbatim text.
//! Nothing here mutates or re-saves a record.

pub mod parser;
pub mod templates;

pub use parser::to_display_key;
pub use templates::{format_abnormal_reason, LegacyLocale};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::enums::Severity;

/// Category used for abnormality reasons recovered from legacy text.
pub const ABNORMAL_REASONS_CATEGORY: &str = "abnormal_reasons";

/// Structured key recovered from a legacy sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayKey {
    pub category: String,
    pub key: String,
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
    /// Severity label as written in the legacy text, if it parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}
