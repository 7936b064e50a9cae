//! Air quality classification
//!
//! Maps already-computed numbers (AQI, model accuracy, R², trend slope) to the
//! fixed ordinal scales used throughout a report. Every function here is total:
//! negative, zero, huge and non-finite inputs all land in some band.
//!
//! AQI bands follow the US EPA category table:
//! <https://www.airnow.gov/aqi/aqi-basics/>

use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive upper bound of the "Good" band
pub const GOOD_MAX: f64 = 50.0;
/// Inclusive upper bound of the "Moderate" band
pub const MODERATE_MAX: f64 = 100.0;
/// Inclusive upper bound of the "Unhealthy for Sensitive Groups" band
pub const SENSITIVE_MAX: f64 = 150.0;
/// Inclusive upper bound of the "Unhealthy" band
pub const UNHEALTHY_MAX: f64 = 200.0;
/// Inclusive upper bound of the "Very Unhealthy" band; anything above is hazardous
pub const VERY_UNHEALTHY_MAX: f64 = 300.0;

/// AQI strictly above this raises the health alert
pub const HEALTH_ALERT_THRESHOLD: f64 = SENSITIVE_MAX;
/// AQI strictly above this adds the medical-attention directive to the alert
pub const MEDICAL_ATTENTION_THRESHOLD: f64 = VERY_UNHEALTHY_MAX;

const AQI_BANDS: [(f64, Category); 5] = [
    (GOOD_MAX, Category::Good),
    (MODERATE_MAX, Category::Moderate),
    (SENSITIVE_MAX, Category::UnhealthyForSensitiveGroups),
    (UNHEALTHY_MAX, Category::Unhealthy),
    (VERY_UNHEALTHY_MAX, Category::VeryUnhealthy),
];

/// Haze levels the analysis service assigns per AQI range (0..200 scale)
const HAZE_LEVELS: [(f64, u8); 5] = [
    (50.0, 0),
    (100.0, 25),
    (200.0, 60),
    (300.0, 100),
    (400.0, 140),
];
const HAZE_LEVEL_MAX: u8 = 180;

/// Slope magnitude below which a trend counts as stable
pub const STABLE_SLOPE_TOLERANCE: f64 = 0.01;

/// AQI category, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Good,
    Moderate,
    #[serde(rename = "Unhealthy for Sensitive Groups")]
    UnhealthyForSensitiveGroups,
    Unhealthy,
    #[serde(rename = "Very Unhealthy")]
    VeryUnhealthy,
    Hazardous,
    /// Anything outside the closed set; rendered neutrally and never alerts
    Unknown,
}

impl Category {
    const KNOWN: [Self; 6] = [
        Self::Good,
        Self::Moderate,
        Self::UnhealthyForSensitiveGroups,
        Self::Unhealthy,
        Self::VeryUnhealthy,
        Self::Hazardous,
    ];

    /// Parse a category label, falling back to `Unknown`
    ///
    /// Only the exact label spelling is recognized.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|c| c.as_str() == label)
            .unwrap_or(Self::Unknown)
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            Self::Unhealthy => "Unhealthy",
            Self::VeryUnhealthy => "Very Unhealthy",
            Self::Hazardous => "Hazardous",
            Self::Unknown => "Unknown",
        }
    }

    /// Severity rank, 0 (Good) to 5 (Hazardous); `None` for `Unknown`
    #[must_use]
    pub fn severity(&self) -> Option<u8> {
        match self {
            Self::Good => Some(0),
            Self::Moderate => Some(1),
            Self::UnhealthyForSensitiveGroups => Some(2),
            Self::Unhealthy => Some(3),
            Self::VeryUnhealthy => Some(4),
            Self::Hazardous => Some(5),
            Self::Unknown => None,
        }
    }

    #[must_use]
    pub fn risk_tier(&self) -> RiskTier {
        match self {
            Self::Good | Self::Moderate | Self::Unknown => RiskTier::Low,
            Self::UnhealthyForSensitiveGroups => RiskTier::Moderate,
            Self::Unhealthy | Self::VeryUnhealthy => RiskTier::High,
            Self::Hazardous => RiskTier::Emergency,
        }
    }

    #[must_use]
    pub fn tone(&self) -> Tone {
        match self {
            Self::Good => Tone::Green,
            Self::Moderate => Tone::Yellow,
            Self::UnhealthyForSensitiveGroups => Tone::Orange,
            Self::Unhealthy => Tone::Red,
            Self::VeryUnhealthy => Tone::Purple,
            Self::Hazardous => Tone::Maroon,
            Self::Unknown => Tone::Neutral,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Health risk tier attached to recommendations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Low,
    Moderate,
    High,
    Emergency,
}

impl RiskTier {
    /// Parse a risk label such as `"HIGH"`; unknown labels give `None`
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "LOW" => Some(Self::Low),
            "MODERATE" => Some(Self::Moderate),
            "HIGH" => Some(Self::High),
            "EMERGENCY" => Some(Self::Emergency),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
            Self::Emergency => "EMERGENCY",
        }
    }

    #[must_use]
    pub fn tone(&self) -> Tone {
        match self {
            Self::Low => Tone::Green,
            Self::Moderate => Tone::Yellow,
            Self::High => Tone::Red,
            Self::Emergency => Tone::Maroon,
        }
    }
}

/// Semantic color for a classified value; the adapter binds it to a style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Green,
    Blue,
    Yellow,
    Orange,
    Red,
    Purple,
    Maroon,
    Neutral,
}

/// Result of classifying an AQI value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AqiClass {
    pub category: Category,
    pub risk_tier: RiskTier,
    pub tone: Tone,
}

/// Category for an AQI value. Bands are closed on their upper bound, values
/// below zero fall into "Good" and `NaN` is `Unknown`.
#[must_use]
pub fn category_for_aqi(value: f64) -> Category {
    if value.is_nan() {
        return Category::Unknown;
    }

    AQI_BANDS
        .iter()
        .find(|(upper, _)| value <= *upper)
        .map_or(Category::Hazardous, |(_, category)| *category)
}

/// Classify an AQI value into category, risk tier and tone
#[must_use]
pub fn classify_aqi(value: f64) -> AqiClass {
    let category = category_for_aqi(value);
    AqiClass {
        category,
        risk_tier: category.risk_tier(),
        tone: category.tone(),
    }
}

/// Haze intensity (0..200) the analysis service renders for a given AQI
#[must_use]
pub fn haze_for_aqi(aqi: f64) -> u8 {
    if aqi.is_nan() {
        return 0;
    }

    HAZE_LEVELS
        .iter()
        .find(|(upper, _)| aqi <= *upper)
        .map_or(HAZE_LEVEL_MAX, |(_, haze)| *haze)
}

/// Model accuracy tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccuracyTier {
    Excellent,
    Good,
    Fair,
    Moderate,
}

impl AccuracyTier {
    #[must_use]
    pub fn tone(&self) -> Tone {
        match self {
            Self::Excellent => Tone::Green,
            Self::Good => Tone::Blue,
            Self::Fair => Tone::Yellow,
            Self::Moderate => Tone::Orange,
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent - Highly reliable predictions",
            Self::Good => "Good - Reliable for most applications",
            Self::Fair => "Fair - Acceptable with caution",
            Self::Moderate => "Moderate - Use with additional validation",
        }
    }
}

/// Tier for an accuracy percentage (≥90, ≥75, ≥60, else Moderate)
#[must_use]
pub fn classify_accuracy(pct: f64) -> AccuracyTier {
    if pct >= 90.0 {
        AccuracyTier::Excellent
    } else if pct >= 75.0 {
        AccuracyTier::Good
    } else if pct >= 60.0 {
        AccuracyTier::Fair
    } else {
        AccuracyTier::Moderate
    }
}

/// Model fit quality tier derived from R²
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FitTier {
    Excellent,
    Good,
    Moderate,
    Weak,
}

impl FitTier {
    #[must_use]
    pub fn tone(&self) -> Tone {
        match self {
            Self::Excellent => Tone::Green,
            Self::Good => Tone::Blue,
            Self::Moderate => Tone::Yellow,
            Self::Weak => Tone::Orange,
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent fit - Model explains variance very well",
            Self::Good => "Good fit - Model captures most patterns",
            Self::Moderate => "Moderate fit - Some patterns captured",
            Self::Weak => "Weak fit - Consider model improvements",
        }
    }
}

/// Tier for an R² score (≥0.9, ≥0.7, ≥0.5, else Weak). The score is clamped
/// to 0..1 first.
#[must_use]
pub fn classify_fit(r2: f64) -> FitTier {
    let r2 = r2.clamp(0.0, 1.0);
    if r2 >= 0.9 {
        FitTier::Excellent
    } else if r2 >= 0.7 {
        FitTier::Good
    } else if r2 >= 0.5 {
        FitTier::Moderate
    } else {
        FitTier::Weak
    }
}

/// Direction of the recent 30-day trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    Improving,
    Worsening,
    Stable,
    /// A direction label outside the known set. Kept apart from `Stable`
    /// even though both render the same way.
    Unknown,
}

impl Trend {
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "Improving" => Self::Improving,
            "Worsening" => Self::Worsening,
            "Stable" => Self::Stable,
            _ => Self::Unknown,
        }
    }

    /// Direction implied by a PM2.5 slope; falling concentrations improve
    #[must_use]
    pub fn from_slope(slope: f64) -> Self {
        if slope.is_nan() {
            Self::Unknown
        } else if slope < -STABLE_SLOPE_TOLERANCE {
            Self::Improving
        } else if slope > STABLE_SLOPE_TOLERANCE {
            Self::Worsening
        } else {
            Self::Stable
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Improving => "Improving",
            Self::Worsening => "Worsening",
            Self::Stable => "Stable",
            Self::Unknown => "Unknown",
        }
    }

    #[must_use]
    pub fn style(&self) -> TrendStyle {
        match self {
            Self::Improving => TrendStyle {
                icon: '↗',
                tone: Tone::Green,
            },
            Self::Worsening => TrendStyle {
                icon: '↘',
                tone: Tone::Red,
            },
            Self::Stable | Self::Unknown => TrendStyle {
                icon: '→',
                tone: Tone::Neutral,
            },
        }
    }
}

/// Glyph and tone used to draw a trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendStyle {
    pub icon: char,
    pub tone: Tone,
}

/// Style for a trend direction label
#[must_use]
pub fn classify_trend(direction: &str) -> TrendStyle {
    Trend::from_label(direction).style()
}
