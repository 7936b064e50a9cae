//! Basic Usage Example for AQI Report
//!
//! This example walks a typical analysis payload through normalization,
//! classification and section gating, and prints what a report would show.
//!
//! Run with: cargo run --example basic_usage

use aqi_report::metrics::format_metric;
use aqi_report::{Report, ReportView, classify_aqi, prepare};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🌫️  AQI Report - Basic Usage Example\n");

    // Example 1: Full payload
    println!("📡 Example 1: Full Analysis Payload");
    println!("===================================");

    let payload = json!({
        "status": "success",
        "timestamp": "2024-11-02T18:45:10",
        "summary": {"overall_aqi": 212.6, "overall_category": "Very Unhealthy"},
        "data_summary": {"parameters_analyzed": 3},
        "current_conditions": {
            "latest_pm25": 188.4,
            "predicted_tomorrow": 205.2,
            "category": "Very Unhealthy",
            "pollutant_levels": {"pm25": 188.4, "pm10": 260.1, "no2": 48.0}
        },
        "predictions": [
            {"date": "2024-11-03", "predicted_aqi": 205.2, "category": "Very Unhealthy",
             "confidence_lower": 180.0, "confidence_upper": 230.0, "haze_intensity": 100},
            {"date": "2024-11-04", "predicted_aqi": 176.9, "category": "Unhealthy",
             "confidence_lower": 150.2, "confidence_upper": 201.4, "haze_intensity": 60},
            {"date": "2024-11-05", "predicted_aqi": 142.3}
        ],
        "statistics": {
            "total_records": 1096,
            "date_range": {"start": "2021-11-01", "end": "2024-11-01"},
            "recent_30_days": {
                "average": 161.2, "median": 158.0, "maximum": 240.3, "minimum": 88.1,
                "std_dev": 35.4, "trend_direction": "Worsening", "trend_slope": 2.114,
                "days_above_safe": 27
            }
        },
        "health_recommendations": {
            "risk_level": "HIGH",
            "general": "Everyone should reduce prolonged outdoor exertion.",
            "sensitive": "Avoid all outdoor activity.",
            "activities": "Move exercise indoors.",
            "precautions": "Run air purifiers and keep windows closed."
        },
        "aqi_breakdown": {"pm25": 205, "pm10": 153, "no2": 45},
        "primary_pollutant": {"pollutant": "pm25", "aqi_value": 205},
        "model_evaluation": {
            "accuracy_percentage": 84.31, "r2_score": 0.7712, "mae": 11.2,
            "mse": 201.6, "rmse": 14.2, "mape": 15.69
        },
        "ai_generation": {
            "gemini_url": "https://gemini.google.com/app?prompt=smog",
            "prompt": "A realistic photo of India Gate covered in smog, AQI 205"
        }
    });

    match prepare(&payload) {
        ReportView::Ready(report) => print_report(&report),
        ReportView::Failure { message } => println!("❌ {message}"),
    }

    println!();

    // Example 2: Sparse payload
    println!("🔧 Example 2: Sparse Payload");
    println!("============================");

    let sparse = json!({
        "status": "success",
        "predictions": [{"date": "2024-01-01", "predicted_aqi": 160}]
    });
    match prepare(&sparse) {
        ReportView::Ready(report) => print_report(&report),
        ReportView::Failure { message } => println!("❌ {message}"),
    }

    println!();

    // Example 3: Classification lookups
    println!("📊 Example 3: AQI Classification");
    println!("================================");

    for aqi in [12.0, 50.0, 51.0, 150.0, 151.0, 300.0, 301.0] {
        let class = classify_aqi(aqi);
        println!(
            "  AQI {:>5.0} → {:<32} risk {:<9} tone {:?}",
            aqi,
            class.category,
            class.risk_tier.as_str(),
            class.tone
        );
    }

    println!();

    // Example 4: Serialized report for a frontend
    println!("📦 Example 4: Serialized View");
    println!("=============================");
    let view = prepare(&json!({"status": "error", "error": "dataset has no pm25 column"}));
    println!("{}", serde_json::to_string_pretty(&view)?);

    Ok(())
}

/// Pretty print the sections a report would render
fn print_report(report: &Report) {
    let result = &report.result;

    println!("✅ Report ready:");
    println!("   📊 Summary:");
    match &report.overall {
        Some(overall) => println!(
            "     🎯 Overall AQI: {} ({})",
            format_metric(result.summary.overall_aqi, 0),
            overall.category
        ),
        None => println!("     🎯 Overall AQI: N/A"),
    }
    println!(
        "     🧪 Parameters analyzed: {}",
        result.data_summary.parameters_analyzed
    );
    println!("     🗂️  Data points: {}", result.statistics.total_records);

    if let Some(trend) = &report.trend {
        println!(
            "     {} Trend: {} (slope {})",
            trend.style.icon,
            trend.trend.as_str(),
            format_metric(result.statistics.recent_30_days.trend_slope, 3)
        );
    }
    println!(
        "     📅 Safe days: {} / unhealthy days: {} ({:.1}% unhealthy)",
        report.days.safe_days, report.days.unhealthy_days, report.days.unhealthy_percentage
    );

    if report.sections.show_forecast {
        println!("   🔮 Forecast:");
        for row in &report.forecast {
            let bar = "█".repeat((row.bar_fraction * 20.0).round() as usize);
            println!(
                "     {}  {:>6}  {:<32} {:<20} haze {}/200",
                row.date,
                format_metric(row.predicted_aqi, 1),
                row.category,
                bar,
                row.haze_intensity
            );
        }
    }

    match &report.health_alert {
        Some(alert) => {
            println!("   🚨 Health alert (AQI {:.0}):", alert.aqi);
            for action in alert.actions() {
                println!("     • {action}");
            }
        }
        None => println!("   🏥 No health alert"),
    }

    if report.sections.show_aqi_breakdown {
        println!("   🔬 AQI breakdown:");
        for entry in &report.breakdown {
            println!(
                "     {:<5} {:>4}  {}",
                entry.pollutant.to_uppercase(),
                entry.aqi,
                entry.class.category
            );
        }
    }

    if let (Some(accuracy), Some(fit)) = (report.accuracy, report.fit) {
        println!("   🤖 Model:");
        println!(
            "     Accuracy {}% → {}",
            format_metric(result.model_evaluation.accuracy_percentage, 2),
            accuracy.description()
        );
        println!(
            "     R² {} → {}",
            format_metric(result.model_evaluation.r2_display(), 4),
            fit.description()
        );
    }

    if report.sections.show_ai_panel {
        println!("   🎨 AI visualization available");
        if let Some(prompt) = &result.ai_generation.prompt {
            println!("     📋 Prompt: {prompt}");
        }
    }
}
