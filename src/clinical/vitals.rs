use std::collections::BTreeMap;

use crate::models::enums::Severity;
use crate::models::{AbnormalityResult, VitalReading, VitalType, VitalValue};

use super::{Direction, EngineError};

// Blood pressure (mmHg)
const SYSTOLIC_HIGH: f64 = 140.0;
const SYSTOLIC_SEVERE_HIGH: f64 = 160.0;
const SYSTOLIC_LOW: f64 = 90.0;
const SYSTOLIC_SEVERE_LOW: f64 = 80.0;
const DIASTOLIC_HIGH: f64 = 90.0;
const DIASTOLIC_SEVERE_HIGH: f64 = 100.0;
const DIASTOLIC_LOW: f64 = 60.0;
const DIASTOLIC_SEVERE_LOW: f64 = 50.0;

// Heart rate (bpm)
const HEART_RATE_HIGH: f64 = 100.0;
const HEART_RATE_SEVERE_HIGH: f64 = 120.0;
const HEART_RATE_LOW: f64 = 60.0;
const HEART_RATE_SEVERE_LOW: f64 = 50.0;

// Temperature (°C)
const TEMPERATURE_HIGH: f64 = 37.5;
const TEMPERATURE_SEVERE_HIGH: f64 = 38.5;
const TEMPERATURE_LOW: f64 = 36.0;

// Oxygen saturation (%)
const OXYGEN_LOW: f64 = 95.0;
const OXYGEN_SEVERE_LOW: f64 = 90.0;
const OXYGEN_CRITICAL: f64 = 85.0;
const OXYGEN_MAX: f64 = 100.0;

// Blood glucose (mg/dL)
const GLUCOSE_HIGH: f64 = 140.0;
const GLUCOSE_LOW: f64 = 70.0;

/// Classify a single reading against the fixed thresholds.
pub fn classify(reading: &VitalReading) -> Result<AbnormalityResult, EngineError> {
    let vital = reading.vital_type;

    let result = match vital {
        VitalType::BloodPressure => {
            let (systolic, diastolic) = pressure_value(reading)?;
            classify_blood_pressure(systolic, diastolic)
        }
        VitalType::HeartRate => classify_heart_rate(scalar_value(reading)?),
        VitalType::Temperature => classify_temperature(scalar_value(reading)?),
        VitalType::OxygenSaturation => {
            let value = scalar_value(reading)?;
            if value > OXYGEN_MAX {
                return Err(invalid(vital, format!("{value}% exceeds 100%")));
            }
            classify_oxygen_saturation(value)
        }
        VitalType::BloodGlucose => classify_blood_glucose(scalar_value(reading)?),
        // Needs height for BMI; a weight on its own is never abnormal.
        VitalType::Weight => {
            scalar_value(reading)?;
            AbnormalityResult::normal()
        }
    };

    if result.is_abnormal {
        tracing::debug!(
            vital = vital.as_str(),
            severity = result.severity.as_str(),
            reason = result.reason_key.as_deref().unwrap_or_default(),
            "Abnormal vital reading"
        );
    }

    Ok(result)
}

/// Both components are checked; when they point in opposite directions the
/// high side wins. The reason names the component that sets the severity:
/// systolic when it is out of range, unless only diastolic reaches the severe tier.
fn classify_blood_pressure(systolic: f64, diastolic: f64) -> AbnormalityResult {
    let systolic_dir = band_direction(systolic, SYSTOLIC_LOW, SYSTOLIC_HIGH);
    let diastolic_dir = band_direction(diastolic, DIASTOLIC_LOW, DIASTOLIC_HIGH);

    let direction = if systolic_dir == Some(Direction::High)
        || diastolic_dir == Some(Direction::High)
    {
        Direction::High
    } else if systolic_dir == Some(Direction::Low) || diastolic_dir == Some(Direction::Low) {
        Direction::Low
    } else {
        return AbnormalityResult::normal();
    };

    let (systolic_severe, diastolic_severe) = match direction {
        Direction::High => (
            systolic >= SYSTOLIC_SEVERE_HIGH,
            diastolic >= DIASTOLIC_SEVERE_HIGH,
        ),
        Direction::Low => (
            systolic < SYSTOLIC_SEVERE_LOW,
            diastolic < DIASTOLIC_SEVERE_LOW,
        ),
    };

    let severity = match (direction, systolic_severe || diastolic_severe) {
        (Direction::High, true) => Severity::SevereHigh,
        (Direction::High, false) => Severity::High,
        (Direction::Low, true) => Severity::SevereLow,
        (Direction::Low, false) => Severity::Low,
    };

    let (component, value) = if systolic_dir == Some(direction) && (systolic_severe || !diastolic_severe) {
        ("systolic", systolic)
    } else {
        ("diastolic", diastolic)
    };

    let mut result = abnormal(component, direction, severity, value);
    result.params.insert("systolic".into(), systolic);
    result.params.insert("diastolic".into(), diastolic);
    result
}

fn classify_heart_rate(bpm: f64) -> AbnormalityResult {
    let prefix = VitalType::HeartRate.as_str();
    if bpm > HEART_RATE_HIGH {
        let severity = if bpm > HEART_RATE_SEVERE_HIGH {
            Severity::SevereHigh
        } else {
            Severity::High
        };
        abnormal(prefix, Direction::High, severity, bpm)
    } else if bpm < HEART_RATE_LOW {
        let severity = if bpm < HEART_RATE_SEVERE_LOW {
            Severity::SevereLow
        } else {
            Severity::Low
        };
        abnormal(prefix, Direction::Low, severity, bpm)
    } else {
        AbnormalityResult::normal()
    }
}

fn classify_temperature(celsius: f64) -> AbnormalityResult {
    let prefix = VitalType::Temperature.as_str();
    if celsius > TEMPERATURE_HIGH {
        let severity = if celsius >= TEMPERATURE_SEVERE_HIGH {
            Severity::SevereHigh
        } else {
            Severity::High
        };
        abnormal(prefix, Direction::High, severity, celsius)
    } else if celsius < TEMPERATURE_LOW {
        abnormal(prefix, Direction::Low, Severity::Low, celsius)
    } else {
        AbnormalityResult::normal()
    }
}

fn classify_oxygen_saturation(percent: f64) -> AbnormalityResult {
    let severity = if percent < OXYGEN_CRITICAL {
        Severity::Critical
    } else if percent < OXYGEN_SEVERE_LOW {
        Severity::SevereLow
    } else if percent < OXYGEN_LOW {
        Severity::Low
    } else {
        return AbnormalityResult::normal();
    };
    abnormal(
        VitalType::OxygenSaturation.as_str(),
        Direction::Low,
        severity,
        percent,
    )
}

fn classify_blood_glucose(mg_dl: f64) -> AbnormalityResult {
    let prefix = VitalType::BloodGlucose.as_str();
    if mg_dl > GLUCOSE_HIGH {
        abnormal(prefix, Direction::High, Severity::High, mg_dl)
    } else if mg_dl < GLUCOSE_LOW {
        abnormal(prefix, Direction::Low, Severity::Low, mg_dl)
    } else {
        AbnormalityResult::normal()
    }
}

fn band_direction(value: f64, low: f64, high: f64) -> Option<Direction> {
    if value > high {
        Some(Direction::High)
    } else if value < low {
        Some(Direction::Low)
    } else {
        None
    }
}

fn abnormal(prefix: &str, direction: Direction, severity: Severity, value: f64) -> AbnormalityResult {
    AbnormalityResult {
        is_abnormal: true,
        severity,
        reason_key: Some(format!("{}_{}", prefix, direction.as_str())),
        params: BTreeMap::from([("value".to_string(), value)]),
    }
}

fn invalid(vital: VitalType, reason: impl Into<String>) -> EngineError {
    EngineError::InvalidReading {
        vital,
        reason: reason.into(),
    }
}

/// A measured number must be finite and non-negative.
fn checked(vital: VitalType, field: &str, value: f64) -> Result<f64, EngineError> {
    if !value.is_finite() {
        return Err(invalid(vital, format!("{field} is not a finite number")));
    }
    if value < 0.0 {
        return Err(invalid(vital, format!("{field} is negative ({value})")));
    }
    Ok(value)
}

fn scalar_value(reading: &VitalReading) -> Result<f64, EngineError> {
    let vital = reading.vital_type;
    match &reading.value {
        None => Err(invalid(vital, "value is missing")),
        Some(VitalValue::Number(value)) => checked(vital, "value", *value),
        Some(VitalValue::Text(text)) => {
            let value = text
                .trim()
                .parse::<f64>()
                .map_err(|_| invalid(vital, format!("'{text}' is not numeric")))?;
            checked(vital, "value", value)
        }
        Some(VitalValue::Pressure { .. }) => {
            Err(invalid(vital, "expected a single number, got systolic/diastolic"))
        }
        Some(VitalValue::Other(value)) => Err(invalid(vital, format!("unsupported value {value}"))),
    }
}

fn pressure_value(reading: &VitalReading) -> Result<(f64, f64), EngineError> {
    let vital = reading.vital_type;
    match &reading.value {
        None => Err(invalid(vital, "value is missing")),
        Some(VitalValue::Pressure {
            systolic,
            diastolic,
        }) => {
            let systolic = systolic.ok_or_else(|| invalid(vital, "systolic is missing"))?;
            let diastolic = diastolic.ok_or_else(|| invalid(vital, "diastolic is missing"))?;
            Ok((
                checked(vital, "systolic", systolic)?,
                checked(vital, "diastolic", diastolic)?,
            ))
        }
        Some(VitalValue::Other(value)) => Err(invalid(
            vital,
            format!("requires numeric systolic and diastolic, got {value}"),
        )),
        Some(_) => Err(invalid(vital, "requires systolic and diastolic")),
    }
}
