//! Derived display metrics
//!
//! Values the report shows but the payload does not carry directly. All of
//! them are deterministic and clamp instead of failing.

use crate::analysis::{ForecastPoint, RecentWindow};
use serde::{Deserialize, Serialize};

/// Length of the recent statistics window in days
pub const WINDOW_DAYS: u8 = 30;
/// Top of the haze intensity scale
pub const HAZE_SCALE_MAX: u8 = 200;

/// Placeholder for a metric the service did not compute
pub const NOT_AVAILABLE: &str = "N/A";

/// Safe vs unhealthy days over the recent window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayBreakdown {
    pub safe_days: u8,
    pub unhealthy_days: u8,
    /// Percentage of unhealthy days, one decimal
    pub unhealthy_percentage: f64,
}

/// Days at or below the safe limit: `30 - days_above_safe`
#[must_use]
pub fn safe_days(stats: &RecentWindow) -> u8 {
    WINDOW_DAYS - stats.days_above_safe.min(WINDOW_DAYS)
}

/// Share of unhealthy days in percent, rounded to one decimal
#[must_use]
pub fn unhealthy_percentage(stats: &RecentWindow) -> f64 {
    let days = f64::from(stats.days_above_safe.min(WINDOW_DAYS));
    round_to(days / f64::from(WINDOW_DAYS) * 100.0, 1)
}

#[must_use]
pub fn day_breakdown(stats: &RecentWindow) -> DayBreakdown {
    DayBreakdown {
        safe_days: safe_days(stats),
        unhealthy_days: stats.days_above_safe.min(WINDOW_DAYS),
        unhealthy_percentage: unhealthy_percentage(stats),
    }
}

/// `value / max` clamped to 0..1
///
/// A `max` of zero (or below, or non-finite) gives 0 rather than dividing.
#[must_use]
pub fn bar_width_fraction(value: f64, max: f64) -> f64 {
    if !max.is_finite() || max <= 0.0 || value.is_nan() {
        return 0.0;
    }
    (value / max).clamp(0.0, 1.0)
}

/// Haze intensity on the 0..200 scale as a 0..1 fraction
#[must_use]
pub fn haze_bar_fraction(haze_intensity: f64) -> f64 {
    bar_width_fraction(
        haze_intensity.clamp(0.0, f64::from(HAZE_SCALE_MAX)),
        f64::from(HAZE_SCALE_MAX),
    )
}

/// Largest predicted AQI in the forecast, 0 when there is none
#[must_use]
pub fn forecast_max_aqi(predictions: &[ForecastPoint]) -> f64 {
    predictions
        .iter()
        .filter_map(|p| p.predicted_aqi)
        .fold(0.0, f64::max)
}

#[must_use]
pub fn round_to(value: f64, decimals: u8) -> f64 {
    let factor = 10f64.powi(i32::from(decimals));
    (value * factor).round() / factor
}

/// Fixed-decimal rendering of an optional metric, `"N/A"` when absent
#[must_use]
pub fn format_metric(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.decimals$}"))
}
