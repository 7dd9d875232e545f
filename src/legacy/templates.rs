use crate::models::AbnormalityResult;

/// Locales legacy sentences were written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyLocale {
    ZhTw,
    En,
}

/// How a vital (or blood-pressure component) was labelled in legacy text.
pub(crate) struct VitalLabel {
    /// Reason-key prefix, e.g. `systolic` or `heart_rate`.
    pub prefix: &'static str,
    pub zh_tw: &'static str,
    pub en: &'static str,
    pub unit: &'static str,
    /// Other spellings seen in older records.
    pub aliases: &'static [&'static str],
}

pub(crate) const VITAL_LABELS: &[VitalLabel] = &[
    VitalLabel {
        prefix: "systolic",
        zh_tw: "收縮壓",
        en: "Systolic blood pressure",
        unit: "mmHg",
        aliases: &["血壓", "Blood pressure", "Systolic"],
    },
    VitalLabel {
        prefix: "diastolic",
        zh_tw: "舒張壓",
        en: "Diastolic blood pressure",
        unit: "mmHg",
        aliases: &["Diastolic"],
    },
    VitalLabel {
        prefix: "heart_rate",
        zh_tw: "心率",
        en: "Heart rate",
        unit: "bpm",
        aliases: &["心跳", "脈搏", "Pulse"],
    },
    VitalLabel {
        prefix: "temperature",
        zh_tw: "體溫",
        en: "Body temperature",
        unit: "°C",
        aliases: &["Temperature"],
    },
    VitalLabel {
        prefix: "oxygen_saturation",
        zh_tw: "血氧",
        en: "Blood oxygen",
        unit: "%",
        aliases: &["血氧飽和度", "Oxygen saturation", "SpO2"],
    },
    VitalLabel {
        prefix: "blood_glucose",
        zh_tw: "血糖",
        en: "Blood glucose",
        unit: "mg/dL",
        aliases: &["Glucose"],
    },
    VitalLabel {
        prefix: "weight",
        zh_tw: "體重",
        en: "Weight",
        unit: "kg",
        aliases: &[],
    },
];

pub(crate) fn label_for_prefix(prefix: &str) -> Option<&'static VitalLabel> {
    VITAL_LABELS.iter().find(|l| l.prefix == prefix)
}

/// Resolve a legacy label to its reason-key prefix.
/// Chinese labels match exactly; English labels ignore case.
pub(crate) fn prefix_for_label(label: &str) -> Option<&'static str> {
    let label = label.trim();
    VITAL_LABELS
        .iter()
        .find(|l| {
            l.zh_tw == label
                || l.en.eq_ignore_ascii_case(label)
                || l.aliases.iter().any(|a| a.eq_ignore_ascii_case(label))
        })
        .map(|l| l.prefix)
}

/// Render an abnormality the way pre-structured records stored it, e.g.
/// `收縮壓異常 (160 mmHg, 嚴重程度: high)`.
///
/// None for normal results or results without a `value` param.
pub fn format_abnormal_reason(locale: LegacyLocale, result: &AbnormalityResult) -> Option<String> {
    let reason_key = result.reason_key.as_deref()?;
    let prefix = reason_key
        .strip_suffix("_high")
        .or_else(|| reason_key.strip_suffix("_low"))?;
    let label = label_for_prefix(prefix)?;
    let value = result.params.get("value")?;
    let severity = result.severity.as_str();

    Some(match locale {
        LegacyLocale::ZhTw => format!(
            "{}異常 ({} {}, 嚴重程度: {})",
            label.zh_tw, value, label.unit, severity
        ),
        LegacyLocale::En => format!(
            "{} abnormal ({} {}, severity: {})",
            label.en, value, label.unit, severity
        ),
    })
}
