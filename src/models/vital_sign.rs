use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::Severity;

/// Type of vital sign measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalType {
    BloodPressure,
    HeartRate,
    Temperature,
    OxygenSaturation,
    BloodGlucose,
    Weight,
}

impl VitalType {
    pub fn as_str(self) -> &'static str {
        match self {
            VitalType::BloodPressure => "blood_pressure",
            VitalType::HeartRate => "heart_rate",
            VitalType::Temperature => "temperature",
            VitalType::OxygenSaturation => "oxygen_saturation",
            VitalType::BloodGlucose => "blood_glucose",
            VitalType::Weight => "weight",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "blood_pressure" => Some(VitalType::BloodPressure),
            "heart_rate" => Some(VitalType::HeartRate),
            "temperature" => Some(VitalType::Temperature),
            "oxygen_saturation" => Some(VitalType::OxygenSaturation),
            "blood_glucose" => Some(VitalType::BloodGlucose),
            "weight" => Some(VitalType::Weight),
            _ => None,
        }
    }

    /// Default unit for this vital type.
    pub fn default_unit(self) -> &'static str {
        match self {
            VitalType::BloodPressure => "mmHg",
            VitalType::HeartRate => "bpm",
            VitalType::Temperature => "°C",
            VitalType::OxygenSaturation => "%",
            VitalType::BloodGlucose => "mg/dL",
            VitalType::Weight => "kg",
        }
    }
}

impl std::fmt::Display for VitalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw measured value as delivered by the submission boundary.
///
/// Older forms submit numbers as strings, so `Text` is accepted and parsed
/// by the classifier, and blood pressure sub-fields may be numeric strings.
/// Sub-fields are optional so a missing component can be reported instead of
/// failing deserialization. Any other JSON lands in `Other` and is rejected
/// by the classifier as an invalid reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VitalValue {
    Number(f64),
    Pressure {
        #[serde(default, deserialize_with = "deserialize_flexible_number")]
        systolic: Option<f64>,
        #[serde(default, deserialize_with = "deserialize_flexible_number")]
        diastolic: Option<f64>,
    },
    Text(String),
    Other(serde_json::Value),
}

/// A number, a numeric string like `"120"`, or null.
fn deserialize_flexible_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| de::Error::custom("number out of range")),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("'{s}' is not numeric"))),
        other => Err(de::Error::custom(format!("expected a number, got {other}"))),
    }
}

/// A single vital sign measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalReading {
    #[serde(rename = "type")]
    pub vital_type: VitalType,
    #[serde(default)]
    pub value: Option<VitalValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<NaiveDateTime>,
}

impl VitalReading {
    /// Single-number reading (everything except blood pressure).
    pub fn scalar(vital_type: VitalType, value: f64) -> Self {
        Self {
            vital_type,
            value: Some(VitalValue::Number(value)),
            recorded_at: None,
        }
    }

    pub fn blood_pressure(systolic: f64, diastolic: f64) -> Self {
        Self {
            vital_type: VitalType::BloodPressure,
            value: Some(VitalValue::Pressure {
                systolic: Some(systolic),
                diastolic: Some(diastolic),
            }),
            recorded_at: None,
        }
    }
}

/// Classification of one reading. Recomputed on demand, never stored on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbnormalityResult {
    pub is_abnormal: bool,
    pub severity: Severity,
    /// `<vital>_<direction>`, e.g. `systolic_high`. None for normal readings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_key: Option<String>,
    /// Numeric values the presentation layer needs to render the reason.
    /// The severity tag is carried by `severity`, not repeated here.
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
}

impl AbnormalityResult {
    pub fn normal() -> Self {
        Self {
            is_abnormal: false,
            severity: Severity::Normal,
            reason_key: None,
            params: BTreeMap::new(),
        }
    }
}

/// An abnormal reading found while diagnosing a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalFinding {
    #[serde(rename = "type")]
    pub vital_type: VitalType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<NaiveDateTime>,
    pub result: AbnormalityResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vital_type_round_trip() {
        for vital in [
            VitalType::BloodPressure,
            VitalType::HeartRate,
            VitalType::Temperature,
            VitalType::OxygenSaturation,
            VitalType::BloodGlucose,
            VitalType::Weight,
        ] {
            assert_eq!(VitalType::from_str(vital.as_str()), Some(vital));
        }
        assert_eq!(VitalType::from_str("height"), None);
    }

    #[test]
    fn reading_deserializes_scalar() {
        let reading: VitalReading =
            serde_json::from_str(r#"{"type":"heart_rate","value":72}"#).unwrap();
        assert_eq!(reading.vital_type, VitalType::HeartRate);
        assert_eq!(reading.value, Some(VitalValue::Number(72.0)));
    }

    #[test]
    fn reading_deserializes_pressure() {
        let reading: VitalReading = serde_json::from_str(
            r#"{"type":"blood_pressure","value":{"systolic":120,"diastolic":80}}"#,
        )
        .unwrap();
        assert_eq!(reading, VitalReading::blood_pressure(120.0, 80.0));
    }

    #[test]
    fn reading_deserializes_partial_pressure() {
        let reading: VitalReading =
            serde_json::from_str(r#"{"type":"blood_pressure","value":{"systolic":120}}"#)
                .unwrap();
        assert_eq!(
            reading.value,
            Some(VitalValue::Pressure {
                systolic: Some(120.0),
                diastolic: None
            })
        );
    }

    #[test]
    fn reading_deserializes_text_and_missing_value() {
        let text: VitalReading =
            serde_json::from_str(r#"{"type":"temperature","value":"36.8"}"#).unwrap();
        assert_eq!(text.value, Some(VitalValue::Text("36.8".into())));

        let missing: VitalReading = serde_json::from_str(r#"{"type":"weight"}"#).unwrap();
        assert_eq!(missing.value, None);
    }

    #[test]
    fn reading_deserializes_pressure_given_as_strings() {
        let reading: VitalReading = serde_json::from_str(
            r#"{"type":"blood_pressure","value":{"systolic":"120","diastolic":" 80 "}}"#,
        )
        .unwrap();
        assert_eq!(reading, VitalReading::blood_pressure(120.0, 80.0));

        let reading: VitalReading = serde_json::from_str(
            r#"{"type":"blood_pressure","value":{"systolic":"120","diastolic":null}}"#,
        )
        .unwrap();
        assert_eq!(
            reading.value,
            Some(VitalValue::Pressure {
                systolic: Some(120.0),
                diastolic: None
            })
        );
    }

    #[test]
    fn reading_keeps_unexpected_values_for_the_classifier() {
        let boolean: VitalReading =
            serde_json::from_str(r#"{"type":"heart_rate","value":true}"#).unwrap();
        assert_eq!(boolean.value, Some(VitalValue::Other(serde_json::Value::Bool(true))));

        let bad_pressure: VitalReading = serde_json::from_str(
            r#"{"type":"blood_pressure","value":{"systolic":"high","diastolic":80}}"#,
        )
        .unwrap();
        assert!(matches!(bad_pressure.value, Some(VitalValue::Other(_))));
    }

    #[test]
    fn reading_carries_timestamp() {
        let reading: VitalReading = serde_json::from_str(
            r#"{"type":"heart_rate","value":80,"recordedAt":"2026-03-01T08:30:00"}"#,
        )
        .unwrap();
        assert!(reading.recorded_at.is_some());
    }

    #[test]
    fn abnormality_result_uses_camel_case() {
        let json = serde_json::to_value(AbnormalityResult::normal()).unwrap();
        assert_eq!(json["isAbnormal"], false);
        assert_eq!(json["severity"], "normal");
        assert!(json.get("reasonKey").is_none());
    }
}
