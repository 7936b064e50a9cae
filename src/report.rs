//! Report assembly for the presentation layer
//!
//! [`prepare`] runs the whole pipeline once per received payload: normalize,
//! classify, derive, gate. The presentation layer gets plain values back and
//! binds tones to its own styles.

use crate::air_quality::{
    AccuracyTier, AqiClass, Category, FitTier, Tone, Trend, TrendStyle, classify_aqi,
};
use crate::analysis::{AnalysisResult, Outcome};
use crate::error::AnalysisError;
use crate::gate::{HealthAlert, SectionVisibility, gate, health_alert};
use crate::metrics::{
    DayBreakdown, bar_width_fraction, day_breakdown, forecast_max_aqi, haze_bar_fraction,
};
use crate::normalize::normalize;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

/// What the presentation layer renders for one submission
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ReportView {
    /// Single generic failure message; nothing else is rendered
    Failure { message: &'static str },
    Ready(Box<Report>),
}

impl ReportView {
    #[must_use]
    pub fn failure(error: &AnalysisError) -> Self {
        Self::Failure {
            message: error.user_message(),
        }
    }

    #[must_use]
    pub fn report(&self) -> Option<&Report> {
        match self {
            Self::Ready(report) => Some(&**report),
            Self::Failure { .. } => None,
        }
    }
}

/// Normalized result plus everything derived from it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub result: AnalysisResult,
    pub sections: SectionVisibility,
    pub health_alert: Option<HealthAlert>,
    pub overall: Option<AqiClass>,
    /// Badge tone for the recommendations' risk level
    pub risk_tone: Option<Tone>,
    pub forecast: Vec<ForecastRow>,
    pub days: DayBreakdown,
    pub trend: Option<TrendView>,
    pub breakdown: Vec<BreakdownEntry>,
    pub accuracy: Option<AccuracyTier>,
    pub fit: Option<FitTier>,
}

/// One forecast row, scaled for the table and the bar chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRow {
    pub date: NaiveDate,
    pub predicted_aqi: Option<f64>,
    pub category: Category,
    pub tone: Tone,
    /// Width relative to the highest predicted AQI
    pub bar_fraction: f64,
    pub haze_intensity: u8,
    pub haze_fraction: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendView {
    pub trend: Trend,
    pub style: TrendStyle,
}

/// Per-pollutant AQI sub-index with its classification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownEntry {
    pub pollutant: String,
    pub aqi: u32,
    pub class: AqiClass,
}

impl Report {
    /// Derive every display value from a normalized result
    #[must_use]
    pub fn build(result: AnalysisResult) -> Self {
        let max_aqi = forecast_max_aqi(&result.predictions);
        let forecast = result
            .predictions
            .iter()
            .map(|point| ForecastRow {
                date: point.date,
                predicted_aqi: point.predicted_aqi,
                category: point.category,
                tone: point.category.tone(),
                bar_fraction: point
                    .predicted_aqi
                    .map_or(0.0, |aqi| bar_width_fraction(aqi, max_aqi)),
                haze_intensity: point.haze_intensity,
                haze_fraction: haze_bar_fraction(f64::from(point.haze_intensity)),
            })
            .collect();

        let breakdown = result
            .aqi_breakdown
            .iter()
            .map(|(pollutant, aqi)| BreakdownEntry {
                pollutant: pollutant.clone(),
                aqi: *aqi,
                class: classify_aqi(f64::from(*aqi)),
            })
            .collect();

        let recent = &result.statistics.recent_30_days;

        Self {
            sections: gate(&result),
            health_alert: health_alert(&result),
            overall: result.summary.overall_aqi.map(classify_aqi),
            risk_tone: result.health_recommendations.risk_level.map(|tier| tier.tone()),
            forecast,
            days: day_breakdown(recent),
            trend: recent.trend_direction.map(|trend| TrendView {
                trend,
                style: trend.style(),
            }),
            breakdown,
            accuracy: result.model_evaluation.accuracy_tier(),
            fit: result.model_evaluation.fit_tier(),
            result,
        }
    }
}

/// Turn a raw payload into the view to render
///
/// Malformed payloads and failed analyses both collapse into the same
/// failure view; nothing is classified or gated for them.
#[must_use]
pub fn prepare(raw: &Value) -> ReportView {
    match normalize(raw).and_then(Outcome::into_result) {
        Ok(result) => ReportView::Ready(Box::new(Report::build(result))),
        Err(err) => {
            log::warn!("Not rendering report: {err}");
            ReportView::failure(&err)
        }
    }
}
