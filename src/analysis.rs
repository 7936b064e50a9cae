//! Data types for a normalized analysis result
//!
//! Every optional section of the remote payload is represented by a struct
//! that is empty rather than absent, so consumers never guard against a
//! missing section. Numbers the service did not compute stay `None`.
//!
//! Serializing an [`AnalysisResult`] produces the canonical snake_case payload
//! shape, which [`crate::normalize::normalize`] accepts unchanged.

use crate::air_quality::{
    AccuracyTier, Category, FitTier, RiskTier, Trend, classify_accuracy, classify_fit,
};
use crate::error::{AnalysisError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Terminal outcome tag reported by the analysis service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Success,
    Error,
}

/// Either a usable result or the failure sentinel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome {
    Completed(Box<AnalysisResult>),
    Failed(AnalysisFailure),
}

impl Outcome {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Unwrap the completed result, turning the sentinel into `AnalysisFailed`
    ///
    /// # Errors
    ///
    /// * `AnalysisError::AnalysisFailed` - the service reported a failure
    pub fn into_result(self) -> Result<AnalysisResult> {
        match self {
            Self::Completed(result) => Ok(*result),
            Self::Failed(failure) => Err(AnalysisError::AnalysisFailed(failure.error)),
        }
    }
}

/// Failure sentinel for a payload whose status is not `success`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisFailure {
    /// Always `Status::Error`
    pub status: Status,
    pub error: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Canonical analysis result, immutable once normalized
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub status: Status,
    pub timestamp: Option<DateTime<Utc>>,
    pub summary: Summary,
    pub data_summary: DataSummary,
    pub current_conditions: CurrentConditions,
    /// Chronological, one point per date
    pub predictions: Vec<ForecastPoint>,
    pub statistics: Statistics,
    pub health_recommendations: HealthRecommendations,
    pub multi_parameter_analysis: BTreeMap<String, PollutantSummary>,
    pub aqi_breakdown: BTreeMap<String, u32>,
    pub primary_pollutant: PrimaryPollutant,
    pub processed_images: ProcessedImages,
    pub visualizations: Visualizations,
    pub model_evaluation: ModelEvaluation,
    pub ai_generation: AiGeneration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub overall_aqi: Option<f64>,
    pub overall_category: Category,
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            overall_aqi: None,
            overall_category: Category::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSummary {
    /// Number of pollutant parameters in the uploaded dataset (at least PM2.5)
    pub parameters_analyzed: u32,
}

impl Default for DataSummary {
    fn default() -> Self {
        Self {
            parameters_analyzed: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Latest PM2.5 in μg/m³
    pub latest_pm25: Option<f64>,
    /// Tomorrow's predicted value; the primary forecast horizon
    pub predicted_tomorrow: Option<f64>,
    pub category: Category,
    /// Pollutant name to concentration in μg/m³
    pub pollutant_levels: BTreeMap<String, f64>,
}

impl Default for CurrentConditions {
    fn default() -> Self {
        Self {
            latest_pm25: None,
            predicted_tomorrow: None,
            category: Category::Unknown,
            pollutant_levels: BTreeMap::new(),
        }
    }
}

/// One day of the forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_aqi: Option<f64>,
    pub category: Category,
    pub confidence_lower: Option<f64>,
    pub confidence_upper: Option<f64>,
    /// Simulated smog strength, 0..200
    pub haze_intensity: u8,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Statistics {
    pub total_records: u64,
    pub date_range: DateRange,
    pub recent_30_days: RecentWindow,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Statistics over the last 30 days of the dataset
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecentWindow {
    pub average: Option<f64>,
    pub median: Option<f64>,
    pub maximum: Option<f64>,
    pub minimum: Option<f64>,
    pub std_dev: Option<f64>,
    pub trend_direction: Option<Trend>,
    pub trend_slope: Option<f64>,
    /// Days above the safe limit, 0..30
    pub days_above_safe: u8,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HealthRecommendations {
    pub risk_level: Option<RiskTier>,
    pub general: Option<String>,
    pub sensitive: Option<String>,
    pub activities: Option<String>,
    pub precautions: Option<String>,
}

impl HealthRecommendations {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.risk_level.is_none()
            && self.general.is_none()
            && self.sensitive.is_none()
            && self.activities.is_none()
            && self.precautions.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PollutantSummary {
    pub latest_value: Option<f64>,
    pub average_30_days: Option<f64>,
    pub unit: Option<String>,
}

/// Pollutant contributing the highest sub-index
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PrimaryPollutant {
    pub pollutant: Option<String>,
    pub aqi_value: Option<u32>,
}

impl PrimaryPollutant {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pollutant.is_none() && self.aqi_value.is_none()
    }
}

/// Base64 encoded reference photo, before and after the smog overlay
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProcessedImages {
    pub original: Option<String>,
    pub with_smog: Option<String>,
    pub haze_intensity: Option<u8>,
}

/// Base64 encoded charts rendered by the service
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Visualizations {
    pub forecast_plot: Option<String>,
    pub aqi_gauge: Option<String>,
}

impl Visualizations {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forecast_plot.is_none() && self.aqi_gauge.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelEvaluation {
    pub accuracy_percentage: Option<f64>,
    pub r2_score: Option<f64>,
    pub mae: Option<f64>,
    pub mse: Option<f64>,
    pub rmse: Option<f64>,
    pub mape: Option<f64>,
}

impl ModelEvaluation {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            self.accuracy_percentage,
            self.r2_score,
            self.mae,
            self.mse,
            self.rmse,
            self.mape,
        ]
        .iter()
        .all(Option::is_none)
    }

    #[must_use]
    pub fn accuracy_tier(&self) -> Option<AccuracyTier> {
        self.accuracy_percentage.map(classify_accuracy)
    }

    #[must_use]
    pub fn fit_tier(&self) -> Option<FitTier> {
        self.r2_score.map(classify_fit)
    }

    /// R² clamped to 0..1 for display
    #[must_use]
    pub fn r2_display(&self) -> Option<f64> {
        self.r2_score.map(|r2| r2.clamp(0.0, 1.0))
    }
}

/// Link to an external image generator primed with a smog prompt
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AiGeneration {
    pub gemini_url: Option<String>,
    pub prompt: Option<String>,
}
