use crate::models::MealContext;
use serde::{Deserialize, Serialize};

pub const LOW_BELOW: i64 = 70;
pub const FASTING_TARGET_MAX: i64 = 130;
pub const AFTER_MEAL_TARGET_MAX: i64 = 180;
pub const NORMAL_MAX: i64 = 140;
pub const ELEVATED_MAX: i64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Target,
    High,
    Normal,
    Elevated,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Target => "Target",
            Severity::High => "High",
            Severity::Normal => "Normal",
            Severity::Elevated => "Elevated",
            Severity::VeryHigh => "Very High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Blue,
    Green,
    Orange,
    Red,
}

impl StatusColor {
    pub const ALL: [StatusColor; 4] = [
        StatusColor::Blue,
        StatusColor::Green,
        StatusColor::Orange,
        StatusColor::Red,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatusColor::Blue => "blue",
            StatusColor::Green => "green",
            StatusColor::Orange => "orange",
            StatusColor::Red => "red",
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            StatusColor::Blue => "#2196F3",
            StatusColor::Green => "#4CAF50",
            StatusColor::Orange => "#FF9800",
            StatusColor::Red => "#F44336",
        }
    }
}

/// Label and display color for one reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub label: Severity,
    pub color: StatusColor,
}

impl Status {
    fn new(label: Severity, color: StatusColor) -> Self {
        Self { label, color }
    }
}

/// Which set of reference ranges a deployment uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdScheme {
    /// Three tiers, target range depends on the meal context.
    #[default]
    MealAware,
    /// Context-free Low / Normal / Elevated / Very High.
    FourTier,
}

impl ThresholdScheme {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "meal_aware" | "meal-aware" | "context" => Some(Self::MealAware),
            "four_tier" | "four-tier" | "tiered" => Some(Self::FourTier),
            _ => None,
        }
    }

    pub fn classify(self, value: i64, context: MealContext) -> Status {
        match self {
            ThresholdScheme::MealAware => classify(value, context),
            ThresholdScheme::FourTier => classify_four_tier(value),
        }
    }

    /// Human-readable target range shown next to the input form.
    pub fn target_hint(self, context: MealContext) -> String {
        match (self, context) {
            (ThresholdScheme::MealAware, MealContext::Fasting) => {
                format!("Target: {LOW_BELOW} - {FASTING_TARGET_MAX} mg/dL")
            }
            (ThresholdScheme::MealAware, MealContext::AfterMeal) => {
                format!("Target: {LOW_BELOW} - {AFTER_MEAL_TARGET_MAX} mg/dL")
            }
            (ThresholdScheme::FourTier, _) => format!("Normal: {LOW_BELOW} - {NORMAL_MAX} mg/dL"),
        }
    }
}

/// Classifies a reading against the meal-aware reference ranges.
///
/// Total over `i64`: values outside the physiological range land in the
/// nearest boundary bucket.
pub fn classify(value: i64, context: MealContext) -> Status {
    let target_max = match context {
        MealContext::Fasting => FASTING_TARGET_MAX,
        MealContext::AfterMeal => AFTER_MEAL_TARGET_MAX,
    };

    if value < LOW_BELOW {
        Status::new(Severity::Low, StatusColor::Blue)
    } else if value <= target_max {
        Status::new(Severity::Target, StatusColor::Green)
    } else {
        Status::new(Severity::High, StatusColor::Red)
    }
}

pub fn classify_four_tier(value: i64) -> Status {
    if value < LOW_BELOW {
        Status::new(Severity::Low, StatusColor::Blue)
    } else if value <= NORMAL_MAX {
        Status::new(Severity::Normal, StatusColor::Green)
    } else if value <= ELEVATED_MAX {
        Status::new(Severity::Elevated, StatusColor::Orange)
    } else {
        Status::new(Severity::VeryHigh, StatusColor::Red)
    }
}
