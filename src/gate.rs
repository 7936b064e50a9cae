//! Section visibility
//!
//! Decides which optional report sections apply to a normalized result.
//! Absent data never fails; it only hides the dependent section.

use crate::air_quality::{HEALTH_ALERT_THRESHOLD, MEDICAL_ATTENTION_THRESHOLD};
use crate::analysis::AnalysisResult;
use serde::{Deserialize, Serialize};

/// Actions listed in every health alert
pub const ALERT_ACTIONS: [&str; 5] = [
    "Stay indoors as much as possible",
    "Use air purifiers if available",
    "Wear N95 masks when going outside",
    "Avoid outdoor exercise and strenuous activities",
    "Keep windows and doors closed",
];

/// Extra action once the forecast reaches hazardous levels
pub const MEDICAL_ATTENTION_ACTION: &str =
    "Seek medical attention if you experience breathing difficulties";

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SectionVisibility {
    /// Primary forecast AQI above the Unhealthy threshold
    pub show_health_alert: bool,
    /// Original or smog-overlaid reference image present
    pub show_image_panel: bool,
    /// AI generation link present
    pub show_ai_panel: bool,
    /// More than one pollutant measured, or a per-pollutant table present
    pub show_multi_pollutant: bool,
    pub show_forecast: bool,
    pub show_health_recommendations: bool,
    pub show_visualizations: bool,
    pub show_model_evaluation: bool,
    pub show_primary_pollutant: bool,
    pub show_aqi_breakdown: bool,
}

/// A raised health alert
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthAlert {
    /// AQI that triggered the alert
    pub aqi: f64,
    /// AQI is in the hazardous range
    pub seek_medical_attention: bool,
}

impl HealthAlert {
    /// Actions to list, including the medical one when it applies
    #[must_use]
    pub fn actions(&self) -> Vec<&'static str> {
        let mut actions = ALERT_ACTIONS.to_vec();
        if self.seek_medical_attention {
            actions.push(MEDICAL_ATTENTION_ACTION);
        }
        actions
    }
}

/// AQI of the primary forecast horizon: tomorrow's prediction when the
/// service gave one, otherwise the earliest forecast point
#[must_use]
pub fn primary_forecast_aqi(result: &AnalysisResult) -> Option<f64> {
    result
        .current_conditions
        .predicted_tomorrow
        .or_else(|| result.predictions.first().and_then(|p| p.predicted_aqi))
}

#[must_use]
pub fn health_alert(result: &AnalysisResult) -> Option<HealthAlert> {
    primary_forecast_aqi(result)
        .filter(|aqi| *aqi > HEALTH_ALERT_THRESHOLD)
        .map(|aqi| HealthAlert {
            aqi,
            seek_medical_attention: aqi > MEDICAL_ATTENTION_THRESHOLD,
        })
}

/// Compute section visibility for a normalized result
#[must_use]
pub fn gate(result: &AnalysisResult) -> SectionVisibility {
    let images = &result.processed_images;

    SectionVisibility {
        show_health_alert: health_alert(result).is_some(),
        show_image_panel: images.original.is_some() || images.with_smog.is_some(),
        show_ai_panel: result.ai_generation.gemini_url.is_some(),
        show_multi_pollutant: result.current_conditions.pollutant_levels.len() > 1
            || !result.multi_parameter_analysis.is_empty(),
        show_forecast: !result.predictions.is_empty(),
        show_health_recommendations: !result.health_recommendations.is_empty(),
        show_visualizations: !result.visualizations.is_empty(),
        show_model_evaluation: !result.model_evaluation.is_empty(),
        show_primary_pollutant: !result.primary_pollutant.is_empty(),
        show_aqi_breakdown: !result.aqi_breakdown.is_empty(),
    }
}
