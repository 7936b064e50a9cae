//! Error Handling Example for AQI Report
//!
//! This example shows how malformed payloads, failed analyses and transport
//! errors all collapse into one failure view, while partial payloads still
//! render as much as they can.
//!
//! Run with: cargo run --example error_handling

use aqi_report::submission::{AnalysisService, Artifact, Submission};
use aqi_report::{AnalysisError, ReportView, analyze, normalize, prepare};
use serde_json::{Value, json};

/// Statistics for outcome tracking
#[derive(Debug, Default)]
struct OutcomeStats {
    total: u32,
    rendered: u32,
    malformed: u32,
    failed: u32,
}

impl OutcomeStats {
    fn record(&mut self, raw: &Value) {
        self.total += 1;
        match normalize(raw).and_then(|outcome| outcome.into_result()) {
            Ok(_) => self.rendered += 1,
            Err(AnalysisError::MalformedPayload(_)) => self.malformed += 1,
            Err(AnalysisError::AnalysisFailed(_)) => self.failed += 1,
        }
    }

    fn render_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (f64::from(self.rendered) / f64::from(self.total)) * 100.0
        }
    }
}

/// A transport that is always offline
struct Offline;

impl AnalysisService for Offline {
    type Error = String;

    fn submit(&self, _submission: &Submission) -> Result<Value, String> {
        Err("connection refused (127.0.0.1:8000)".into())
    }
}

fn main() {
    println!("⚠️  AQI Report - Error Handling Example");
    println!("======================================\n");

    let cases = vec![
        ("Valid payload", json!({"status": "success", "predictions": [{"date": "2024-01-01", "predicted_aqi": 42}]})),
        ("Not an object", json!(["status", "success"])),
        ("Legacy shape without status", json!({"predictions": [], "image_url": "https://gemini.google.com/app"})),
        ("Remote failure", json!({"status": "error", "error": "could not parse dates"})),
        ("Partial payload", json!({"status": "success", "statistics": {"recent_30_days": {"days_above_safe": 44}}})),
        ("Odd values", json!({"status": "success", "summary": {"overall_aqi": "NaN", "overall_category": "Smoky"}})),
    ];

    let mut stats = OutcomeStats::default();

    for (description, raw) in &cases {
        println!("🧪 {description}");
        stats.record(raw);

        match normalize(raw) {
            Ok(outcome) => match outcome.into_result() {
                Ok(result) => println!(
                    "    ✅ normalized: {} forecast points, category {}",
                    result.predictions.len(),
                    result.summary.overall_category
                ),
                Err(e) => println!("    ❌ {e}"),
            },
            Err(e) => println!("    ❌ {e}"),
        }

        match prepare(raw) {
            ReportView::Ready(report) => println!(
                "    📄 renders, safe days {}, alert {}",
                report.days.safe_days, report.sections.show_health_alert
            ),
            ReportView::Failure { message } => println!("    🛑 shows: {message}"),
        }
    }

    println!("\n🧪 Transport failure");
    let submission = Submission::new(Artifact::new("delhi_pm25.csv", "date,pm25\n"));
    match analyze(&Offline, &submission) {
        ReportView::Ready(_) => println!("    ✅ Unexpectedly rendered"),
        ReportView::Failure { message } => println!("    🛑 shows: {message}"),
    }

    println!("\n📊 Outcome Statistics");
    println!("=====================");
    println!("Payloads: {}", stats.total);
    println!("Rendered: {}", stats.rendered);
    println!("Malformed: {}", stats.malformed);
    println!("Failed analyses: {}", stats.failed);
    println!("Render rate: {:.1}%", stats.render_rate());
}
