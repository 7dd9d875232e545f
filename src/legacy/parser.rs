use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::clinical::Direction;
use crate::models::enums::{RecommendationCategory, Severity};

use super::templates::prefix_for_label;
use super::{DisplayKey, ABNORMAL_REASONS_CATEGORY};

/// `<label>異常 (<number> [unit], 嚴重程度: <token>)` and its English form
/// `<label> abnormal (<number> [unit], severity: <token>)`.
/// ASCII and full-width punctuation are both accepted; the severity clause is optional.
static REASON_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^\s*(?P<label>.+?)\s*(?:異常|(?i:abnormal))\s*
        [(（]\s*
        (?P<value>\d+(?:\.\d+)?)\s*(?P<unit>[^\s,，)）]+)?\s*
        (?:[,，]\s*(?:嚴重程度|(?i:severity))\s*[:：]\s*(?P<severity>[^)）]+?)\s*)?
        [)）]\s*$",
    )
    .expect("Invalid legacy reason regex")
});

// Lower edge of each vital's normal band. Legacy text records the magnitude
// but not the direction, so direction is re-inferred here from the number.
const SYSTOLIC_LOWER_BOUND: f64 = 90.0;
const DIASTOLIC_LOWER_BOUND: f64 = 60.0;
const HEART_RATE_LOWER_BOUND: f64 = 60.0;
const TEMPERATURE_LOWER_BOUND: f64 = 36.0;
const GLUCOSE_LOWER_BOUND: f64 = 70.0;

/// A known legacy recommendation sentence.
struct RecommendationPattern {
    regexes: Vec<Regex>,
    category: RecommendationCategory,
    key: &'static str,
    /// Param filled from the `n` capture group, if the sentence has one.
    param: Option<&'static str>,
}

/// Legacy recommendation sentences, zh-TW first then English.
/// Order matters: more specific phrasings come before the general ones.
static RECOMMENDATION_PATTERNS: LazyLock<Vec<RecommendationPattern>> = LazyLock::new(|| {
    use RecommendationCategory::*;
    vec![
        phrase(
            Testing,
            "pcr_test_urgent",
            None,
            &[
                r"立即(?:進行|安排|接受)\s*PCR\s*(?:檢測|篩檢)",
                r"(?i)\bget\s+an?\s+PCR\s+test\s+(?:immediately|urgently|right\s+away)",
            ],
        ),
        phrase(
            Testing,
            "pcr_test",
            None,
            &[
                r"(?:進行|安排|接受)\s*PCR\s*(?:檢測|篩檢)",
                r"(?i)\bget\s+an?\s+PCR\s+test\b",
            ],
        ),
        phrase(
            Testing,
            "rapid_antigen_test",
            None,
            &[r"快篩|快速抗原(?:檢測)?", r"(?i)\brapid\s+(?:antigen\s+)?test"],
        ),
        phrase(
            Isolation,
            "strict_isolation",
            Some("days"),
            &[
                r"嚴格(?:居家)?隔離\s*(?P<n>\d+)\s*天",
                r"(?i)\bstrict(?:ly)?\s+isolat\w*\s+(?:for\s+)?(?P<n>\d+)\s+days",
            ],
        ),
        phrase(
            Isolation,
            "self_isolate",
            Some("days"),
            &[
                r"(?:自我|居家)隔離\s*(?P<n>\d+)\s*天",
                r"(?i)\bself[- ]isolate\s+(?:for\s+)?(?P<n>\d+)\s+days",
            ],
        ),
        phrase(
            Isolation,
            "notify_close_contacts",
            None,
            &[r"通知(?:密切)?接觸者", r"(?i)\bnotify\s+(?:your\s+)?close\s+contacts"],
        ),
        phrase(
            Monitoring,
            "check_temperature",
            Some("times_per_day"),
            &[
                r"每日(?:測量)?體溫\s*(?P<n>\d+)\s*次",
                r"(?i)\bcheck\s+(?:your\s+)?temperature\s+(?P<n>\d+)\s+times?\s+(?:a|per)\s+day",
            ],
        ),
        phrase(
            Monitoring,
            "monitor_oxygen_saturation",
            None,
            &[r"監測血氧", r"(?i)\bmonitor\s+(?:your\s+)?(?:blood\s+)?oxygen"],
        ),
        phrase(
            Monitoring,
            "monitor_symptoms_daily",
            None,
            &[r"每日(?:觀察|留意|記錄)症狀", r"(?i)\bmonitor\s+(?:your\s+)?symptoms\s+daily"],
        ),
        phrase(
            Medical,
            "seek_care_if_breathing_difficulty",
            None,
            &[r"呼吸困難.*就醫", r"(?i)\bseek\s+(?:medical\s+)?care\s+if\b.*\bbreath"],
        ),
        phrase(
            Medical,
            "seek_emergency_care",
            None,
            &[r"立即就醫|前往急診", r"(?i)\bseek\s+emergency\s+(?:medical\s+)?care"],
        ),
        phrase(
            Medical,
            "telehealth_consultation",
            None,
            &[r"遠距(?:醫療)?諮詢|視訊看診", r"(?i)\btelehealth\b"],
        ),
        phrase(
            Prevention,
            "hand_hygiene",
            None,
            &[r"勤洗手", r"(?i)\bwash\s+(?:your\s+)?hands"],
        ),
        phrase(
            Prevention,
            "wear_mask_public",
            None,
            &[r"外出(?:時)?(?:配)?戴口罩", r"(?i)\bwear\s+a\s+mask\s+in\s+public"],
        ),
    ]
});

fn phrase(
    category: RecommendationCategory,
    key: &'static str,
    param: Option<&'static str>,
    patterns: &[&str],
) -> RecommendationPattern {
    RecommendationPattern {
        regexes: patterns
            .iter()
            .map(|p| Regex::new(p).expect("Invalid legacy recommendation regex"))
            .collect(),
        category,
        key,
        param,
    }
}

/// Best-effort translation of a legacy sentence into a structured key.
///
/// Abnormality reasons come back under `abnormal_reasons` with the direction
/// re-derived from the number; recommendation sentences come back under their
/// recommendation category. Anything else (including weight, which has no
/// direction) yields None so the caller can show the text verbatim.
pub fn to_display_key(legacy_reason: &str) -> Option<DisplayKey> {
    let text = legacy_reason.trim();
    if text.is_empty() {
        return None;
    }

    let parsed = parse_abnormal_reason(text).or_else(|| parse_recommendation(text));
    if parsed.is_none() {
        tracing::debug!(chars = text.chars().count(), "Legacy text not recognised");
    }
    parsed
}

fn parse_abnormal_reason(text: &str) -> Option<DisplayKey> {
    let caps = REASON_PATTERN.captures(text)?;
    let prefix = prefix_for_label(&caps["label"])?;
    let value: f64 = caps["value"].parse().ok()?;
    let direction = infer_direction(prefix, value)?;

    Some(DisplayKey {
        category: ABNORMAL_REASONS_CATEGORY.to_string(),
        key: format!("{}_{}", prefix, direction.as_str()),
        params: BTreeMap::from([("value".to_string(), value)]),
        severity: caps.name("severity").and_then(|m| parse_severity(m.as_str())),
    })
}

fn parse_recommendation(text: &str) -> Option<DisplayKey> {
    RECOMMENDATION_PATTERNS.iter().find_map(|pattern| {
        let caps = pattern.regexes.iter().find_map(|r| r.captures(text))?;
        Some(DisplayKey {
            category: pattern.category.as_str().to_string(),
            key: pattern.key.to_string(),
            params: recommendation_params(pattern, &caps),
            severity: None,
        })
    })
}

fn recommendation_params(pattern: &RecommendationPattern, caps: &Captures<'_>) -> BTreeMap<String, f64> {
    let mut params = BTreeMap::new();
    if let (Some(name), Some(n)) = (pattern.param, caps.name("n")) {
        if let Ok(value) = n.as_str().parse::<f64>() {
            params.insert(name.to_string(), value);
        }
    }
    params
}

/// Below the lower normal edge reads as low, anything else as high.
/// Oxygen saturation only has a low side; weight has no direction at all.
fn infer_direction(prefix: &str, value: f64) -> Option<Direction> {
    let lower_bound = match prefix {
        "systolic" => SYSTOLIC_LOWER_BOUND,
        "diastolic" => DIASTOLIC_LOWER_BOUND,
        "heart_rate" => HEART_RATE_LOWER_BOUND,
        "temperature" => TEMPERATURE_LOWER_BOUND,
        "blood_glucose" => GLUCOSE_LOWER_BOUND,
        "oxygen_saturation" => return Some(Direction::Low),
        _ => return None,
    };
    Some(if value < lower_bound {
        Direction::Low
    } else {
        Direction::High
    })
}

/// Legacy severity tokens vary in case and separators (`severeLow`,
/// `SEVERE_LOW`, `severe-low`). Unknown tokens, including localized ones, yield None.
fn parse_severity(token: &str) -> Option<Severity> {
    let normalized: String = token
        .chars()
        .filter(|c| !matches!(c, '_' | '-') && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    Severity::ALL
        .iter()
        .find(|s| s.as_str().to_lowercase() == normalized)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::clinical::vitals::classify;
    use crate::legacy::templates::{format_abnormal_reason, LegacyLocale};
    use crate::models::{VitalReading, VitalType};

    fn key_of(text: &str) -> Option<String> {
        to_display_key(text).map(|k| k.key)
    }

    #[test]
    fn heart_rate_low_from_chinese_sentence() {
        let display = to_display_key("心率異常 (45 bpm, 嚴重程度: severeLow)").unwrap();
        assert_eq!(display.category, "abnormal_reasons");
        assert_eq!(display.key, "heart_rate_low");
        assert_eq!(display.params, BTreeMap::from([("value".to_string(), 45.0)]));
        assert_eq!(display.severity, Some(Severity::SevereLow));
    }

    #[test]
    fn systolic_sentence_from_legacy_record() {
        let display = to_display_key("收縮壓異常 (160 mmHg, 嚴重程度: high)").unwrap();
        assert_eq!(display.key, "systolic_high");
        assert_eq!(display.params["value"], 160.0);
        assert_eq!(display.severity, Some(Severity::High));
    }

    #[test]
    fn direction_comes_from_the_number_not_the_wording() {
        // The stored severity says "high" but 50 bpm is below the normal band.
        let display = to_display_key("心率異常 (50 bpm, 嚴重程度: high)").unwrap();
        assert_eq!(display.key, "heart_rate_low");
        assert_eq!(display.severity, Some(Severity::High));
    }

    #[test]
    fn accepts_full_width_punctuation_and_missing_unit() {
        assert_eq!(
            key_of("體溫異常（35.2 °C，嚴重程度：low）").as_deref(),
            Some("temperature_low")
        );
        assert_eq!(key_of("血糖異常 (180, 嚴重程度: high)").as_deref(), Some("blood_glucose_high"));
        assert_eq!(key_of("血糖異常 (180 mg/dL)").as_deref(), Some("blood_glucose_high"));
    }

    #[test]
    fn english_sentences_and_aliases() {
        assert_eq!(
            key_of("Blood oxygen abnormal (88 %, severity: severeLow)").as_deref(),
            Some("oxygen_saturation_low")
        );
        assert_eq!(
            key_of("SpO2 ABNORMAL (93%, Severity: low)").as_deref(),
            Some("oxygen_saturation_low")
        );
        assert_eq!(
            key_of("pulse abnormal (130 bpm, severity: SEVERE_HIGH)").as_deref(),
            Some("heart_rate_high")
        );
    }

    #[test]
    fn unparseable_severity_keeps_the_key() {
        let display = to_display_key("舒張壓異常 (105 mmHg, 嚴重程度: extreme)").unwrap();
        assert_eq!(display.key, "diastolic_high");
        assert_eq!(display.severity, None);
    }

    #[test]
    fn localized_severity_keeps_the_key() {
        let display = to_display_key("心率異常 (45 bpm, 嚴重程度: 嚴重偏低)").unwrap();
        assert_eq!(display.key, "heart_rate_low");
        assert_eq!(display.params["value"], 45.0);
        assert_eq!(display.severity, None);
    }

    #[test]
    fn separated_severity_tokens_are_normalized() {
        let display = to_display_key("心率異常 (45 bpm, 嚴重程度: severe-low)").unwrap();
        assert_eq!(display.key, "heart_rate_low");
        assert_eq!(display.severity, Some(Severity::SevereLow));

        let display = to_display_key("收縮壓異常 (160 mmHg, 嚴重程度: severe high)").unwrap();
        assert_eq!(display.key, "systolic_high");
        assert_eq!(display.severity, Some(Severity::SevereHigh));
    }

    #[test]
    fn weight_and_unknown_vitals_fall_back() {
        assert_eq!(to_display_key("體重異常 (120 kg, 嚴重程度: high)"), None);
        assert_eq!(to_display_key("膽固醇異常 (240 mg/dL, 嚴重程度: high)"), None);
    }

    #[test]
    fn free_text_falls_back() {
        assert_eq!(to_display_key(""), None);
        assert_eq!(to_display_key("   "), None);
        assert_eq!(to_display_key("病人今天感覺不錯"), None);
        assert_eq!(to_display_key("Feeling fine today"), None);
        assert_eq!(to_display_key("心率異常"), None);
    }

    #[test]
    fn recommendation_sentences() {
        let display = to_display_key("建議立即進行PCR檢測").unwrap();
        assert_eq!(display.category, "testing");
        assert_eq!(display.key, "pcr_test_urgent");
        assert!(display.params.is_empty());

        assert_eq!(key_of("請安排 PCR 檢測").as_deref(), Some("pcr_test"));
        assert_eq!(key_of("Get a PCR test").as_deref(), Some("pcr_test"));
        assert_eq!(
            key_of("Get a PCR test immediately").as_deref(),
            Some("pcr_test_urgent")
        );
        assert_eq!(key_of("建議進行快篩").as_deref(), Some("rapid_antigen_test"));
        assert_eq!(key_of("出現呼吸困難時請立即就醫").as_deref(), Some("seek_care_if_breathing_difficulty"));
        assert_eq!(key_of("請立即就醫").as_deref(), Some("seek_emergency_care"));
        assert_eq!(key_of("Wash your hands often").as_deref(), Some("hand_hygiene"));
    }

    #[test]
    fn recommendation_params_are_captured() {
        let display = to_display_key("請自我隔離 7 天").unwrap();
        assert_eq!(display.category, "isolation");
        assert_eq!(display.key, "self_isolate");
        assert_eq!(display.params["days"], 7.0);

        let display = to_display_key("Strictly isolate for 14 days").unwrap();
        assert_eq!(display.key, "strict_isolation");
        assert_eq!(display.params["days"], 14.0);

        let display = to_display_key("每日測量體溫 2 次").unwrap();
        assert_eq!(display.category, "monitoring");
        assert_eq!(display.key, "check_temperature");
        assert_eq!(display.params["times_per_day"], 2.0);
    }

    #[test]
    fn recommendation_keys_exist_in_bundled_catalog() {
        let catalog = Catalog::bundled().unwrap();
        for pattern in RECOMMENDATION_PATTERNS.iter() {
            assert!(
                catalog.has_recommendation_key(pattern.key),
                "legacy pattern maps to unknown key {}",
                pattern.key
            );
        }
    }

    #[test]
    fn templates_round_trip_through_the_parser() {
        let readings = [
            VitalReading::blood_pressure(165.0, 95.0),
            VitalReading::blood_pressure(130.0, 104.0),
            VitalReading::blood_pressure(85.0, 70.0),
            VitalReading::blood_pressure(100.0, 45.0),
            VitalReading::scalar(VitalType::HeartRate, 45.0),
            VitalReading::scalar(VitalType::HeartRate, 135.0),
            VitalReading::scalar(VitalType::Temperature, 38.6),
            VitalReading::scalar(VitalType::Temperature, 35.4),
            VitalReading::scalar(VitalType::OxygenSaturation, 92.0),
            VitalReading::scalar(VitalType::OxygenSaturation, 80.0),
            VitalReading::scalar(VitalType::BloodGlucose, 210.0),
            VitalReading::scalar(VitalType::BloodGlucose, 55.0),
        ];

        for reading in &readings {
            let result = classify(reading).unwrap();
            let expected = result.reason_key.clone().unwrap();
            for locale in [LegacyLocale::ZhTw, LegacyLocale::En] {
                let sentence = format_abnormal_reason(locale, &result).unwrap();
                let display = to_display_key(&sentence)
                    .unwrap_or_else(|| panic!("no key recovered from {sentence:?}"));
                assert_eq!(display.key, expected, "{sentence}");
                assert_eq!(display.params["value"], result.params["value"]);
                assert_eq!(display.severity, Some(result.severity));
            }
        }
    }

    #[test]
    fn input_is_not_modified() {
        let legacy = String::from("心率異常 (45 bpm, 嚴重程度: severeLow)");
        let before = legacy.clone();
        let _ = to_display_key(&legacy);
        assert_eq!(legacy, before);
    }
}
