//! Payload normalization
//!
//! The analysis service has answered in several shapes over time: snake_case
//! and camelCase keys, and the AI generation link either nested under
//! `ai_generation` or flat at the top level as `image_url` / `prompt`. Every
//! known spelling lives in [`FIELD_ALIASES`]; the rest of the crate only sees
//! the canonical [`AnalysisResult`].

use crate::air_quality::{Category, RiskTier, Trend, category_for_aqi, haze_for_aqi};
use crate::analysis::{
    AiGeneration, AnalysisFailure, AnalysisResult, CurrentConditions, DataSummary, DateRange,
    ForecastPoint, HealthRecommendations, ModelEvaluation, Outcome, PollutantSummary,
    PrimaryPollutant, ProcessedImages, RecentWindow, Statistics, Status, Summary, Visualizations,
};
use crate::error::{AnalysisError, Result};
use crate::metrics::{HAZE_SCALE_MAX, WINDOW_DAYS};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

type Object = Map<String, Value>;

/// Canonical field name and the other spellings accepted for it, in lookup order
pub const FIELD_ALIASES: &[(&str, &[&str])] = &[
    ("summary", &[]),
    ("overall_aqi", &["overallAqi"]),
    ("overall_category", &["overallCategory"]),
    ("data_summary", &["dataSummary"]),
    ("parameters_analyzed", &["parametersAnalyzed"]),
    ("current_conditions", &["currentConditions"]),
    ("latest_pm25", &["latestPm25", "latestPM25"]),
    ("predicted_tomorrow", &["predictedTomorrow"]),
    ("pollutant_levels", &["pollutantLevels"]),
    ("predicted_aqi", &["predictedAqi", "predictedAQI"]),
    ("confidence_lower", &["confidenceLower"]),
    ("confidence_upper", &["confidenceUpper"]),
    ("haze_intensity", &["hazeIntensity"]),
    ("total_records", &["totalRecords"]),
    ("date_range", &["dateRange"]),
    ("recent_30_days", &["recent30Days"]),
    ("std_dev", &["stdDev"]),
    ("trend_direction", &["trendDirection"]),
    ("trend_slope", &["trendSlope"]),
    ("days_above_safe", &["daysAboveSafe"]),
    ("health_recommendations", &["healthRecommendations"]),
    ("risk_level", &["riskLevel"]),
    ("multi_parameter_analysis", &["multiParameterAnalysis"]),
    ("latest_value", &["latestValue"]),
    ("average_30_days", &["average30Days"]),
    ("aqi_breakdown", &["aqiBreakdown"]),
    ("primary_pollutant", &["primaryPollutant"]),
    ("aqi_value", &["aqiValue"]),
    ("processed_images", &["processedImages"]),
    ("with_smog", &["withSmog"]),
    ("visualizations", &[]),
    ("forecast_plot", &["forecastPlot"]),
    ("aqi_gauge", &["aqiGauge"]),
    ("model_evaluation", &["modelEvaluation"]),
    ("accuracy_percentage", &["accuracyPercentage"]),
    ("r2_score", &["r2Score", "r2"]),
    ("ai_generation", &["aiGeneration"]),
    ("gemini_url", &["geminiUrl"]),
    ("image_url", &["imageUrl"]),
    ("error", &["message", "detail"]),
];

const NO_ALIASES: &[&str] = &[];

/// Top-level spellings used by the flat AI generation shape
const FLAT_AI_URL: &str = "image_url";
const FLAT_AI_PROMPT: &str = "prompt";

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Normalize a raw analysis payload
///
/// # Arguments
///
/// * `raw` - Payload as received from the analysis service
///
/// # Returns
///
/// * `Ok(Outcome::Completed)` - `status` is `success`; every section is present,
///   possibly empty
/// * `Ok(Outcome::Failed)` - any other `status`; nothing else is read
///
/// # Example
///
/// ```rust
/// use aqi_report::normalize::normalize;
/// use serde_json::json;
///
/// let outcome = normalize(&json!({"status": "success"})).unwrap();
/// assert!(outcome.is_completed());
/// ```
///
/// # Errors
///
/// * `AnalysisError::MalformedPayload` - `raw` is not an object, or has no
///   usable `status`
pub fn normalize(raw: &Value) -> Result<Outcome> {
    let root = raw.as_object().ok_or_else(|| {
        log::warn!("Rejecting analysis payload: not an object");
        AnalysisError::not_an_object(json_kind(raw))
    })?;

    let status = match root.get("status") {
        None | Some(Value::Null) => {
            log::warn!("Rejecting analysis payload: no status");
            return Err(AnalysisError::missing_status());
        }
        Some(Value::String(status)) => status.as_str(),
        Some(other) => return Err(AnalysisError::invalid_status(&other.to_string())),
    };

    let timestamp = field(root, "timestamp").and_then(parse_timestamp);

    if status != "success" {
        let error = text(root, "error");
        log::warn!(
            "Analysis reported status {status:?}: {}",
            error.as_deref().unwrap_or("no detail")
        );
        return Ok(Outcome::Failed(AnalysisFailure {
            status: Status::Error,
            error,
            timestamp,
        }));
    }

    Ok(Outcome::Completed(Box::new(AnalysisResult {
        status: Status::Success,
        timestamp,
        summary: summary(section(root, "summary")),
        data_summary: data_summary(section(root, "data_summary")),
        current_conditions: current_conditions(section(root, "current_conditions")),
        predictions: forecast(root),
        statistics: statistics(section(root, "statistics")),
        health_recommendations: health_recommendations(section(root, "health_recommendations")),
        multi_parameter_analysis: multi_parameter_analysis(section(
            root,
            "multi_parameter_analysis",
        )),
        aqi_breakdown: aqi_breakdown(section(root, "aqi_breakdown")),
        primary_pollutant: primary_pollutant(section(root, "primary_pollutant")),
        processed_images: processed_images(section(root, "processed_images")),
        visualizations: visualizations(section(root, "visualizations")),
        model_evaluation: model_evaluation(section(root, "model_evaluation")),
        ai_generation: ai_generation(root),
    })))
}

fn aliases(canonical: &str) -> &'static [&'static str] {
    FIELD_ALIASES
        .iter()
        .find(|(name, _)| *name == canonical)
        .map_or(NO_ALIASES, |&(_, aliases)| aliases)
}

/// First non-null value under the canonical name or one of its aliases
fn field<'a>(obj: &'a Object, name: &str) -> Option<&'a Value> {
    std::iter::once(name)
        .chain(aliases(name).iter().copied())
        .find_map(|key| obj.get(key).filter(|value| !value.is_null()))
}

fn section<'a>(obj: &'a Object, name: &str) -> Option<&'a Object> {
    let found = field(obj, name).and_then(Value::as_object);
    if found.is_none() {
        log::debug!("Section {name} absent, using defaults");
    }
    found
}

/// Finite number, accepting numeric strings
fn finite(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

fn number(obj: &Object, name: &str) -> Option<f64> {
    field(obj, name).and_then(finite)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole(obj: &Object, name: &str) -> Option<u64> {
    number(obj, name).map(|v| v.round().max(0.0) as u64)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn sub_index(value: f64) -> u32 {
    value.round().clamp(0.0, f64::from(u32::MAX)) as u32
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamped_u8(value: f64, max: u8) -> u8 {
    value.round().clamp(0.0, f64::from(max)) as u8
}

fn text(obj: &Object, name: &str) -> Option<String> {
    field(obj, name)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Enumerated label, kept verbatim; labels match only their exact spelling
fn label<'a>(obj: &'a Object, name: &str) -> Option<&'a str> {
    field(obj, name)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn category(obj: &Object, name: &str) -> Option<Category> {
    label(obj, name).map(|label| {
        let category = Category::from_label(label);
        if category == Category::Unknown && label != Category::Unknown.as_str() {
            log::debug!("Unrecognized category {label:?}, treating as Unknown");
        }
        category
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_datetime(s.trim()),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// RFC 3339, or a naive ISO-8601 date-time taken as UTC
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .map(|naive| naive.and_utc())
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(s).map(|dt| dt.date_naive()))
}

fn summary(obj: Option<&Object>) -> Summary {
    let Some(obj) = obj else {
        return Summary::default();
    };

    Summary {
        overall_aqi: number(obj, "overall_aqi"),
        overall_category: category(obj, "overall_category").unwrap_or(Category::Unknown),
    }
}

fn data_summary(obj: Option<&Object>) -> DataSummary {
    obj.and_then(|obj| whole(obj, "parameters_analyzed"))
        .filter(|n| *n > 0)
        .map_or_else(DataSummary::default, |n| DataSummary {
            parameters_analyzed: u32::try_from(n).unwrap_or(u32::MAX),
        })
}

fn current_conditions(obj: Option<&Object>) -> CurrentConditions {
    let Some(obj) = obj else {
        return CurrentConditions::default();
    };

    let pollutant_levels = section(obj, "pollutant_levels")
        .into_iter()
        .flatten()
        .filter_map(|(name, value)| finite(value).map(|v| (name.clone(), v)))
        .collect();

    CurrentConditions {
        latest_pm25: number(obj, "latest_pm25"),
        predicted_tomorrow: number(obj, "predicted_tomorrow"),
        category: category(obj, "category").unwrap_or(Category::Unknown),
        pollutant_levels,
    }
}

fn forecast(root: &Object) -> Vec<ForecastPoint> {
    let Some(raw) = field(root, "predictions").and_then(Value::as_array) else {
        log::debug!("Section predictions absent, using defaults");
        return Vec::new();
    };

    let mut points: Vec<ForecastPoint> = raw
        .iter()
        .filter_map(Value::as_object)
        .filter_map(forecast_point)
        .collect();

    // Stable sort, so the first point for a date survives the dedup.
    points.sort_by_key(|p| p.date);
    let before = points.len();
    points.dedup_by_key(|p| p.date);
    if points.len() < before {
        log::debug!(
            "Dropped {} forecast points with duplicate dates",
            before - points.len()
        );
    }

    points
}

fn forecast_point(obj: &Object) -> Option<ForecastPoint> {
    let Some(date) = text(obj, "date").as_deref().and_then(parse_date) else {
        log::debug!("Dropping forecast point without a usable date");
        return None;
    };

    let predicted_aqi = number(obj, "predicted_aqi");
    let category = category(obj, "category")
        .or_else(|| predicted_aqi.map(category_for_aqi))
        .unwrap_or(Category::Unknown);
    let haze_intensity = number(obj, "haze_intensity")
        .map(|haze| clamped_u8(haze, HAZE_SCALE_MAX))
        .or_else(|| predicted_aqi.map(haze_for_aqi))
        .unwrap_or(0);

    Some(ForecastPoint {
        date,
        predicted_aqi,
        category,
        confidence_lower: number(obj, "confidence_lower"),
        confidence_upper: number(obj, "confidence_upper"),
        haze_intensity,
    })
}

fn statistics(obj: Option<&Object>) -> Statistics {
    let Some(obj) = obj else {
        return Statistics::default();
    };

    let date_range = section(obj, "date_range")
        .map(|range| DateRange {
            start: text(range, "start"),
            end: text(range, "end"),
        })
        .unwrap_or_default();

    Statistics {
        total_records: whole(obj, "total_records").unwrap_or(0),
        date_range,
        recent_30_days: recent_window(section(obj, "recent_30_days")),
    }
}

fn recent_window(obj: Option<&Object>) -> RecentWindow {
    let Some(obj) = obj else {
        return RecentWindow::default();
    };

    let trend_slope = number(obj, "trend_slope");
    let trend_direction = match label(obj, "trend_direction") {
        Some(label) => {
            let trend = Trend::from_label(label);
            if trend == Trend::Unknown && label != Trend::Unknown.as_str() {
                log::debug!("Unrecognized trend direction {label:?}, treating as Unknown");
            }
            Some(trend)
        }
        None => trend_slope.map(Trend::from_slope),
    };

    RecentWindow {
        average: number(obj, "average"),
        median: number(obj, "median"),
        maximum: number(obj, "maximum"),
        minimum: number(obj, "minimum"),
        std_dev: number(obj, "std_dev"),
        trend_direction,
        trend_slope,
        days_above_safe: number(obj, "days_above_safe")
            .map_or(0, |days| clamped_u8(days, WINDOW_DAYS)),
    }
}

fn health_recommendations(obj: Option<&Object>) -> HealthRecommendations {
    let Some(obj) = obj else {
        return HealthRecommendations::default();
    };

    let risk_level = label(obj, "risk_level").and_then(|label| {
        let tier = RiskTier::from_label(label);
        if tier.is_none() {
            log::debug!("Unrecognized risk level {label:?}");
        }
        tier
    });

    HealthRecommendations {
        risk_level,
        general: text(obj, "general"),
        sensitive: text(obj, "sensitive"),
        activities: text(obj, "activities"),
        precautions: text(obj, "precautions"),
    }
}

fn multi_parameter_analysis(obj: Option<&Object>) -> BTreeMap<String, PollutantSummary> {
    obj.into_iter()
        .flatten()
        .filter_map(|(name, info)| {
            let info = info.as_object()?;
            Some((
                name.clone(),
                PollutantSummary {
                    latest_value: number(info, "latest_value"),
                    average_30_days: number(info, "average_30_days"),
                    unit: text(info, "unit"),
                },
            ))
        })
        .collect()
}

fn aqi_breakdown(obj: Option<&Object>) -> BTreeMap<String, u32> {
    obj.into_iter()
        .flatten()
        .filter_map(|(name, value)| finite(value).map(|aqi| (name.clone(), sub_index(aqi))))
        .collect()
}

fn primary_pollutant(obj: Option<&Object>) -> PrimaryPollutant {
    let Some(obj) = obj else {
        return PrimaryPollutant::default();
    };

    PrimaryPollutant {
        pollutant: text(obj, "pollutant"),
        aqi_value: number(obj, "aqi_value").map(sub_index),
    }
}

fn processed_images(obj: Option<&Object>) -> ProcessedImages {
    let Some(obj) = obj else {
        return ProcessedImages::default();
    };

    ProcessedImages {
        original: text(obj, "original"),
        with_smog: text(obj, "with_smog"),
        haze_intensity: number(obj, "haze_intensity").map(|h| clamped_u8(h, HAZE_SCALE_MAX)),
    }
}

fn visualizations(obj: Option<&Object>) -> Visualizations {
    let Some(obj) = obj else {
        return Visualizations::default();
    };

    Visualizations {
        forecast_plot: text(obj, "forecast_plot"),
        aqi_gauge: text(obj, "aqi_gauge"),
    }
}

fn model_evaluation(obj: Option<&Object>) -> ModelEvaluation {
    let Some(obj) = obj else {
        return ModelEvaluation::default();
    };

    ModelEvaluation {
        accuracy_percentage: number(obj, "accuracy_percentage"),
        r2_score: number(obj, "r2_score"),
        mae: number(obj, "mae"),
        mse: number(obj, "mse"),
        rmse: number(obj, "rmse"),
        mape: number(obj, "mape"),
    }
}

/// Nested `ai_generation` wins; the flat top-level fields fill any gap
fn ai_generation(root: &Object) -> AiGeneration {
    let nested = section(root, "ai_generation");

    AiGeneration {
        gemini_url: nested
            .and_then(|ai| text(ai, "gemini_url"))
            .or_else(|| text(root, FLAT_AI_URL)),
        prompt: nested
            .and_then(|ai| text(ai, "prompt"))
            .or_else(|| text(root, FLAT_AI_PROMPT)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use rstest::rstest;
    use serde_json::json;

    fn completed(raw: &Value) -> AnalysisResult {
        normalize(raw)
            .expect("payload should normalize")
            .into_result()
            .expect("payload should be a success")
    }

    fn full_payload() -> Value {
        json!({
            "status": "success",
            "timestamp": "2024-03-01T12:30:00Z",
            "summary": {"overall_aqi": 162.4, "overall_category": "Unhealthy"},
            "data_summary": {"parameters_analyzed": 3},
            "current_conditions": {
                "latest_pm25": 88.2,
                "predicted_tomorrow": 171.0,
                "category": "Unhealthy",
                "pollutant_levels": {"pm25": 88.2, "pm10": 140.5, "no2": 31.0}
            },
            "predictions": [
                {"date": "2024-03-03", "predicted_aqi": 120.0, "category": "Unhealthy for Sensitive Groups",
                 "confidence_lower": 100.0, "confidence_upper": 140.0, "haze_intensity": 60},
                {"date": "2024-03-02", "predicted_aqi": 171.0, "category": "Unhealthy",
                 "confidence_lower": 150.0, "confidence_upper": 190.0, "haze_intensity": 60}
            ],
            "statistics": {
                "total_records": 365,
                "date_range": {"start": "2023-03-01", "end": "2024-02-29"},
                "recent_30_days": {
                    "average": 92.1, "median": 90.0, "maximum": 180.2, "minimum": 20.4,
                    "std_dev": 30.5, "trend_direction": "Worsening", "trend_slope": 0.42,
                    "days_above_safe": 21
                }
            },
            "health_recommendations": {
                "risk_level": "HIGH",
                "general": "Limit outdoor exertion.",
                "sensitive": "Stay indoors.",
                "activities": "Move workouts inside.",
                "precautions": "Wear an N95 mask."
            },
            "multi_parameter_analysis": {
                "pm10": {"latest_value": 140.5, "average_30_days": 120.0, "unit": "μg/m³"}
            },
            "aqi_breakdown": {"pm25": 171, "pm10": 95.4},
            "primary_pollutant": {"pollutant": "pm25", "aqi_value": 171},
            "processed_images": {"original": "aGVsbG8=", "with_smog": "c21vZw==", "haze_intensity": 60},
            "visualizations": {"forecast_plot": "cGxvdA==", "aqi_gauge": "Z2F1Z2U="},
            "model_evaluation": {
                "accuracy_percentage": 87.5, "r2_score": 0.81, "mae": 6.2,
                "mse": 64.0, "rmse": 8.0, "mape": 12.5
            },
            "ai_generation": {"gemini_url": "https://gemini.google.com/app?prompt=smog", "prompt": "smog"}
        })
    }

    #[test]
    fn test_rejects_non_objects() {
        let err = normalize(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(err, AnalysisError::not_an_object("array"));

        let err = normalize(&Value::Null).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedPayload(_)));
    }

    #[test]
    fn test_rejects_missing_status() {
        // The legacy flat shape carries no status at all.
        let raw = json!({"predictions": [], "image_url": "https://example.test", "prompt": "smog"});
        assert_eq!(normalize(&raw).unwrap_err(), AnalysisError::missing_status());

        let raw = json!({"status": null});
        assert_eq!(normalize(&raw).unwrap_err(), AnalysisError::missing_status());

        let raw = json!({"status": 200});
        assert_eq!(
            normalize(&raw).unwrap_err(),
            AnalysisError::invalid_status("200")
        );
    }

    #[test]
    fn test_error_status_short_circuits() {
        let raw = json!({
            "status": "error",
            "error": "Prophet fit diverged",
            "predictions": "not even an array"
        });
        let outcome = normalize(&raw).unwrap();
        match &outcome {
            Outcome::Failed(failure) => {
                assert_eq!(failure.status, Status::Error);
                assert_eq!(failure.error.as_deref(), Some("Prophet fit diverged"));
            }
            Outcome::Completed(_) => panic!("Expected the failure sentinel"),
        }
        assert_eq!(
            outcome.into_result().unwrap_err(),
            AnalysisError::AnalysisFailed(Some("Prophet fit diverged".into()))
        );

        let outcome = normalize(&json!({"status": "pending"})).unwrap();
        assert!(!outcome.is_completed());
    }

    #[rstest]
    #[case("Success")]
    #[case("SUCCESS")]
    #[case(" success")]
    #[case("success ")]
    #[case("")]
    fn test_status_must_be_exactly_success(#[case] status: &str) {
        let outcome = normalize(&json!({"status": status, "summary": {"overall_aqi": 42}})).unwrap();
        assert!(matches!(outcome, Outcome::Failed(_)), "status {status:?}");
    }

    #[test]
    fn test_labels_match_exact_spelling() {
        let raw = json!({
            "status": "success",
            "summary": {"overall_category": "unhealthy"},
            "current_conditions": {"category": " Moderate"},
            "statistics": {"recent_30_days": {"trend_direction": "improving", "trend_slope": -1.0}},
            "health_recommendations": {"risk_level": "high", "general": "Stay in"}
        });
        let result = completed(&raw);
        assert_eq!(result.summary.overall_category, Category::Unknown);
        assert_eq!(result.current_conditions.category, Category::Unknown);
        assert_eq!(result.statistics.recent_30_days.trend_direction, Some(Trend::Unknown));
        assert_eq!(result.health_recommendations.risk_level, None);
    }

    #[test]
    fn test_missing_sections_get_defaults() {
        let result = completed(&json!({"status": "success"}));

        assert_eq!(result.status, Status::Success);
        assert_eq!(result.timestamp, None);
        assert_eq!(result.summary.overall_category, Category::Unknown);
        assert_eq!(result.data_summary.parameters_analyzed, 1);
        assert!(result.predictions.is_empty());
        assert_eq!(result.statistics.total_records, 0);
        assert_eq!(result.statistics.recent_30_days.days_above_safe, 0);
        assert!(result.health_recommendations.is_empty());
        assert!(result.multi_parameter_analysis.is_empty());
        assert!(result.primary_pollutant.is_empty());
        assert!(result.visualizations.is_empty());
        assert!(result.model_evaluation.is_empty());
        assert_eq!(result.ai_generation, AiGeneration::default());
    }

    #[test]
    fn test_full_payload() {
        let result = completed(&full_payload());

        let ts = result.timestamp.unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day(), ts.hour()), (2024, 3, 1, 12));
        assert_eq!(result.summary.overall_aqi, Some(162.4));
        assert_eq!(result.summary.overall_category, Category::Unhealthy);
        assert_eq!(result.data_summary.parameters_analyzed, 3);
        assert_eq!(result.current_conditions.pollutant_levels.len(), 3);
        assert_eq!(
            result.statistics.recent_30_days.trend_direction,
            Some(Trend::Worsening)
        );
        assert_eq!(result.health_recommendations.risk_level, Some(RiskTier::High));
        assert_eq!(result.aqi_breakdown.get("pm10"), Some(&95));
        assert_eq!(result.primary_pollutant.aqi_value, Some(171));
        assert_eq!(result.processed_images.haze_intensity, Some(60));
        assert_eq!(result.model_evaluation.r2_score, Some(0.81));
        assert_eq!(result.ai_generation.prompt.as_deref(), Some("smog"));
    }

    #[test]
    fn test_predictions_sorted_and_deduplicated() {
        let raw = json!({
            "status": "success",
            "predictions": [
                {"date": "2024-01-03", "predicted_aqi": 40.0},
                {"date": "2024-01-01", "predicted_aqi": 160.0},
                {"date": "2024-01-01T00:00:00", "predicted_aqi": 999.0},
                {"date": "yesterday", "predicted_aqi": 80.0},
                {"predicted_aqi": 80.0},
                {"date": "2024-01-02 00:00:00", "predicted_aqi": 75.0}
            ]
        });
        let result = completed(&raw);

        let dates: Vec<String> = result
            .predictions
            .iter()
            .map(|p| p.date.to_string())
            .collect();
        assert_eq!(dates, ["2024-01-01", "2024-01-02", "2024-01-03"]);
        assert_eq!(result.predictions[0].predicted_aqi, Some(160.0));
    }

    #[test]
    fn test_forecast_category_and_haze_derived_when_absent() {
        let raw = json!({
            "status": "success",
            "predictions": [
                {"date": "2024-01-01", "predicted_aqi": 160.0},
                {"date": "2024-01-02", "predicted_aqi": 45.0, "category": "Smoky", "haze_intensity": 250},
                {"date": "2024-01-03"}
            ]
        });
        let result = completed(&raw);

        assert_eq!(result.predictions[0].category, Category::Unhealthy);
        assert_eq!(result.predictions[0].haze_intensity, 60);
        // An unrecognized label is kept as Unknown rather than re-derived.
        assert_eq!(result.predictions[1].category, Category::Unknown);
        assert_eq!(result.predictions[1].haze_intensity, 200);
        assert_eq!(result.predictions[2].category, Category::Unknown);
        assert_eq!(result.predictions[2].haze_intensity, 0);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let raw = json!({
            "status": "success",
            "statistics": {"recent_30_days": {"days_above_safe": 45}},
            "processed_images": {"haze_intensity": -12},
            "aqi_breakdown": {"o3": -4}
        });
        let result = completed(&raw);
        assert_eq!(result.statistics.recent_30_days.days_above_safe, 30);
        assert_eq!(result.processed_images.haze_intensity, Some(0));
        assert_eq!(result.aqi_breakdown.get("o3"), Some(&0));

        let raw = json!({
            "status": "success",
            "statistics": {"recent_30_days": {"days_above_safe": -3}}
        });
        assert_eq!(completed(&raw).statistics.recent_30_days.days_above_safe, 0);
    }

    #[test]
    fn test_non_finite_and_non_numeric_values_dropped() {
        let raw = json!({
            "status": "success",
            "summary": {"overall_aqi": "NaN"},
            "current_conditions": {
                "latest_pm25": "42.5",
                "predicted_tomorrow": {"value": 3},
                "pollutant_levels": {"pm25": 40.0, "co": "inf", "so2": null}
            },
            "model_evaluation": {"mae": "n/a", "rmse": true}
        });
        let result = completed(&raw);

        assert_eq!(result.summary.overall_aqi, None);
        assert_eq!(result.current_conditions.latest_pm25, Some(42.5));
        assert_eq!(result.current_conditions.predicted_tomorrow, None);
        assert_eq!(
            result.current_conditions.pollutant_levels.keys().collect::<Vec<_>>(),
            ["pm25"]
        );
        assert!(result.model_evaluation.is_empty());
    }

    #[test]
    fn test_camel_case_variant_matches_snake_case() {
        let camel = json!({
            "status": "success",
            "timestamp": "2024-03-01T12:30:00Z",
            "summary": {"overallAqi": 162.4, "overallCategory": "Unhealthy"},
            "dataSummary": {"parametersAnalyzed": 3},
            "currentConditions": {
                "latestPm25": 88.2,
                "predictedTomorrow": 171.0,
                "category": "Unhealthy",
                "pollutantLevels": {"pm25": 88.2, "pm10": 140.5, "no2": 31.0}
            },
            "predictions": [
                {"date": "2024-03-03", "predictedAqi": 120.0, "category": "Unhealthy for Sensitive Groups",
                 "confidenceLower": 100.0, "confidenceUpper": 140.0, "hazeIntensity": 60},
                {"date": "2024-03-02", "predictedAqi": 171.0, "category": "Unhealthy",
                 "confidenceLower": 150.0, "confidenceUpper": 190.0, "hazeIntensity": 60}
            ],
            "statistics": {
                "totalRecords": 365,
                "dateRange": {"start": "2023-03-01", "end": "2024-02-29"},
                "recent30Days": {
                    "average": 92.1, "median": 90.0, "maximum": 180.2, "minimum": 20.4,
                    "stdDev": 30.5, "trendDirection": "Worsening", "trendSlope": 0.42,
                    "daysAboveSafe": 21
                }
            },
            "healthRecommendations": {
                "riskLevel": "HIGH",
                "general": "Limit outdoor exertion.",
                "sensitive": "Stay indoors.",
                "activities": "Move workouts inside.",
                "precautions": "Wear an N95 mask."
            },
            "multiParameterAnalysis": {
                "pm10": {"latestValue": 140.5, "average30Days": 120.0, "unit": "μg/m³"}
            },
            "aqiBreakdown": {"pm25": 171, "pm10": 95.4},
            "primaryPollutant": {"pollutant": "pm25", "aqiValue": 171},
            "processedImages": {"original": "aGVsbG8=", "withSmog": "c21vZw==", "hazeIntensity": 60},
            "visualizations": {"forecastPlot": "cGxvdA==", "aqiGauge": "Z2F1Z2U="},
            "modelEvaluation": {
                "accuracyPercentage": 87.5, "r2Score": 0.81, "mae": 6.2,
                "mse": 64.0, "rmse": 8.0, "mape": 12.5
            },
            "aiGeneration": {"geminiUrl": "https://gemini.google.com/app?prompt=smog", "prompt": "smog"}
        });

        assert_eq!(completed(&camel), completed(&full_payload()));
    }

    #[test]
    fn test_flat_ai_fields_match_nested() {
        let flat = json!({
            "status": "success",
            "image_url": "https://gemini.google.com/app?prompt=smog",
            "prompt": "smog"
        });
        let nested = json!({
            "status": "success",
            "ai_generation": {"gemini_url": "https://gemini.google.com/app?prompt=smog", "prompt": "smog"}
        });
        assert_eq!(completed(&flat).ai_generation, completed(&nested).ai_generation);

        let mixed = json!({
            "status": "success",
            "prompt": "flat prompt",
            "ai_generation": {"gemini_url": "https://gemini.google.com/app"}
        });
        let ai = completed(&mixed).ai_generation;
        assert_eq!(ai.gemini_url.as_deref(), Some("https://gemini.google.com/app"));
        assert_eq!(ai.prompt.as_deref(), Some("flat prompt"));
    }

    #[test]
    fn test_trend_direction_fallbacks() {
        let raw = json!({
            "status": "success",
            "statistics": {"recent_30_days": {"trend_slope": -0.8}}
        });
        assert_eq!(
            completed(&raw).statistics.recent_30_days.trend_direction,
            Some(Trend::Improving)
        );

        let raw = json!({
            "status": "success",
            "statistics": {"recent_30_days": {"trend_direction": "Sideways", "trend_slope": -0.8}}
        });
        assert_eq!(
            completed(&raw).statistics.recent_30_days.trend_direction,
            Some(Trend::Unknown)
        );
    }

    #[test]
    fn test_timestamp_formats() {
        let naive = completed(&json!({"status": "success", "timestamp": "2024-03-01T12:30:00.123456"}));
        let zoned = completed(&json!({"status": "success", "timestamp": "2024-03-01T14:30:00.123456+02:00"}));
        assert!(naive.timestamp.is_some());
        assert_eq!(naive.timestamp, zoned.timestamp);

        let millis = completed(&json!({"status": "success", "timestamp": 1_709_296_200_000_i64}));
        assert_eq!(millis.timestamp.map(|t| t.hour()), Some(12));

        let garbage = completed(&json!({"status": "success", "timestamp": "soon"}));
        assert_eq!(garbage.timestamp, None);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let first = normalize(&full_payload()).unwrap();
        let second = normalize(&serde_json::to_value(&first).unwrap()).unwrap();
        assert_eq!(first, second);

        let sparse = json!({
            "status": "success",
            "predictions": [{"date": "2024-01-01", "predicted_aqi": 160.0, "category": "Smoky"}],
            "statistics": {"recent_30_days": {"trend_slope": 0.3, "days_above_safe": 99}}
        });
        let first = normalize(&sparse).unwrap();
        let second = normalize(&serde_json::to_value(&first).unwrap()).unwrap();
        assert_eq!(first, second);

        let failed = normalize(&json!({"status": "error", "timestamp": "2024-03-01T12:30:00Z"})).unwrap();
        let again = normalize(&serde_json::to_value(&failed).unwrap()).unwrap();
        assert_eq!(failed, again);
    }
}
