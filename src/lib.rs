//! Air Quality Analysis Reports
//!
//! This crate turns the loosely structured payload returned by a remote
//! air-quality analysis service into something a report can render:
//! - Normalization of every known payload shape into one canonical result
//! - Classification of AQI, model accuracy, fit quality and trend
//! - Derived display metrics (safe days, bar widths, haze scale)
//! - Visibility of optional report sections
//!
//! Forecasting, statistics and image processing all happen remotely; this
//! crate only classifies values that were already computed.
//!
//! # Example
//!
//! ```rust
//! use aqi_report::{ReportView, prepare};
//! use serde_json::json;
//!
//! let payload = json!({
//!     "status": "success",
//!     "predictions": [
//!         {"date": "2024-01-01", "predicted_aqi": 160, "category": "Unhealthy", "haze_intensity": 80}
//!     ]
//! });
//!
//! match prepare(&payload) {
//!     ReportView::Ready(report) => {
//!         println!("Health alert: {}", report.sections.show_health_alert);
//!         println!("Forecast days: {}", report.forecast.len());
//!     }
//!     ReportView::Failure { message } => println!("{message}"),
//! }
//! ```

pub mod air_quality;
pub mod analysis;
pub mod error;
pub mod gate;
pub mod metrics;
pub mod normalize;
pub mod report;
pub mod submission;

pub use air_quality::{
    AccuracyTier, AqiClass, Category, FitTier, RiskTier, Tone, Trend, TrendStyle, classify_accuracy,
    classify_aqi, classify_fit, classify_trend,
};
pub use analysis::{AnalysisResult, Outcome, Status};
pub use error::{AnalysisError, Result};
pub use gate::{HealthAlert, SectionVisibility, gate};
pub use metrics::{bar_width_fraction, haze_bar_fraction, safe_days, unhealthy_percentage};
pub use normalize::normalize;
pub use report::{Report, ReportView, prepare};
pub use submission::{AnalysisService, Artifact, Submission, analyze};
