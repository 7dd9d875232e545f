use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unknown string value for one of the engine's closed enums.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {field} value: '{value}'")]
pub struct InvalidEnum {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The serde name of each variant is its `as_str` value.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnum;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(Severity {
    Normal => "normal",
    Low => "low",
    High => "high",
    SevereLow => "severeLow",
    SevereHigh => "severeHigh",
    Critical => "critical",
});

// Declaration order is the clinical order: VeryLow < Low < ... < VeryHigh.
str_enum!(RiskLevel {
    VeryLow => "very_low",
    Low => "low",
    Medium => "medium",
    High => "high",
    VeryHigh => "very_high",
});

str_enum!(ExposureHistory {
    None => "none",
    Suspected => "suspected",
    Confirmed => "confirmed",
    Community => "community",
});

str_enum!(SymptomSeverity {
    Low => "low",
    Medium => "medium",
    High => "high",
});

str_enum!(Priority {
    Low => "low",
    Medium => "medium",
    High => "high",
    Critical => "critical",
});

str_enum!(RecommendationType {
    Action => "action",
    Warning => "warning",
});

// Declaration order is the bundle's field order.
str_enum!(RecommendationCategory {
    Testing => "testing",
    Isolation => "isolation",
    Monitoring => "monitoring",
    Medical => "medical",
    Prevention => "prevention",
});

impl Severity {
    pub fn is_abnormal(&self) -> bool {
        *self != Self::Normal
    }
}

impl ExposureHistory {
    /// Score contribution of the exposure history.
    pub fn weight(&self) -> u32 {
        match self {
            Self::None => 0,
            Self::Suspected => 2,
            Self::Confirmed => 4,
            Self::Community => 1,
        }
    }
}

impl Default for ExposureHistory {
    fn default() -> Self {
        Self::None
    }
}

impl SymptomSeverity {
    /// Score contribution of a symptom with this severity.
    pub fn weight(&self) -> u32 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}
