//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;
use std::path::Path;

use impulse_core::test_utils::{single_binge, weekend_heavy};
use impulse_core::{BehaviorAnalyzer, ChallengeProposer, Factor, FullAnalysisResponse, Insight};
use tempfile::NamedTempFile;

use crate::commands::{self, render_report};

/// Write content to a temp file with the given suffix
fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn binge_csv() -> NamedTempFile {
    temp_file(
        ".csv",
        "date,merchant,amount,category\n\
         2024-01-08T09:00:00,Cafe Uno,12.00,dining\n\
         2024-01-08T10:00:00,Mall Store,30.00,shopping\n\
         2024-01-08T11:00:00,Bakery,8.50,food\n",
    )
}

/// Explicit config so results never depend on a user override on this machine
fn default_config() -> NamedTempFile {
    temp_file(".toml", "smoothing = 1.0\n")
}

// ========== Input Loading Tests ==========

#[test]
fn test_load_transactions_csv() {
    let file = binge_csv();
    let transactions = commands::load_transactions(file.path()).unwrap();

    assert_eq!(transactions.len(), 3);
    assert_eq!(transactions[0].source, "csv");
    assert_eq!(transactions[1].base_category, "shopping");
}

#[test]
fn test_load_transactions_json_by_extension() {
    let json = serde_json::to_string(&weekend_heavy()).unwrap();
    let file = temp_file(".JSON", &json);

    let transactions = commands::load_transactions(file.path()).unwrap();
    assert_eq!(transactions, weekend_heavy());
}

#[test]
fn test_load_transactions_missing_file() {
    let result = commands::load_transactions(Path::new("/nonexistent/transactions.csv"));
    assert!(result.is_err());
    assert!(format!("{:#}", result.unwrap_err()).contains("Failed to read"));
}

#[test]
fn test_load_transactions_bad_json() {
    let file = temp_file(".json", "{\"not\": \"an array\"}");
    assert!(commands::load_transactions(file.path()).is_err());
}

// ========== Analyze Command Tests ==========

#[test]
fn test_analysis_json_stage_one() {
    let config = default_config();
    let file = binge_csv();
    let output =
        commands::analysis_json(Some(config.path()), file.path(), false, false).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["patterns"].as_array().unwrap().len(), 1);
    assert_eq!(value["patterns"][0]["type"], "binge");
    assert_eq!(
        value["patterns"][0]["period"][0],
        "2024-01-08T09:00:00"
    );
    assert!(value.get("insights").is_none());
}

#[test]
fn test_analysis_json_full_pretty() {
    let config = default_config();
    let file = binge_csv();
    let output = commands::analysis_json(Some(config.path()), file.path(), true, true).unwrap();
    assert!(output.contains('\n'));

    let full: FullAnalysisResponse = serde_json::from_str(&output).unwrap();
    assert_eq!(full.insights.len(), 1);
    assert_eq!(full.challenges[0].goal, "Reduce binge cycles");
}

#[test]
fn test_analysis_uses_config_file() {
    let config = temp_file(".toml", "[binge]\nmin_events = 4\n");
    let file = binge_csv();
    let output =
        commands::analysis_json(Some(config.path()), file.path(), false, false).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert!(value["patterns"].as_array().unwrap().is_empty());
}

#[test]
fn test_analysis_missing_config_fails() {
    let file = binge_csv();
    let result =
        commands::analysis_json(Some(Path::new("/nonexistent/analysis.toml")), file.path(), false, false);
    assert!(result.is_err());
}

#[test]
fn test_summary_json() {
    let config = default_config();
    let file = binge_csv();
    let output = commands::summary_json(Some(config.path()), file.path(), false).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["transactions"], 3);
    assert_eq!(value["patterns"]["binge"], 1);
    assert_eq!(value["insights_count"], 1);
    assert!(value["triggers"].as_array().unwrap().is_empty());
}

// ========== Insight Report Tests ==========

#[test]
fn test_render_report_with_challenges() {
    let analyzer = BehaviorAnalyzer::default();
    let mut transactions = weekend_heavy();
    let full = analyzer.analyze_full(&mut transactions);

    let report = render_report(transactions.len(), &full).unwrap();
    assert!(report.contains("Transactions analyzed: 3"));
    assert!(report.contains("Trigger: weekend (strength 0.99)"));
    assert!(report.contains("[P2] Weekend trigger detected"));
    assert!(report.contains("Cap weekend discretionary spend (1 week) [weekend_cap=50]"));
}

#[test]
fn test_render_report_orders_by_priority() {
    let analyzer = BehaviorAnalyzer::default();
    let mut transactions = single_binge();
    transactions.extend(weekend_heavy());
    // Extra weekend spend so the weekend ratio clears the threshold
    transactions.push(impulse_core::test_utils::tx_at(
        "2024-01-27T15:00:00",
        200.0,
        "travel",
    ));
    let full = analyzer.analyze_full(&mut transactions);

    let report = render_report(transactions.len(), &full).unwrap();
    let binge = report.find("[P1]").unwrap();
    let weekend = report.find("[P2]").unwrap();
    assert!(binge < weekend);
    assert!(report.contains("cooldown_hours=48, max_discretionary_in_window=2"));
}

#[test]
fn test_render_report_empty() {
    let report = render_report(0, &FullAnalysisResponse::default()).unwrap();
    assert!(report.contains("No behavioral patterns detected"));
}

#[test]
fn test_render_report_pairs_repeated_factor_per_insight() {
    let insight = |priority: u8| Insight {
        id: None,
        user_id: None,
        summary: format!("Binge cycle {}", priority),
        detail: String::new(),
        priority,
        linked_patterns: vec![Factor::Binge],
    };
    let insights = vec![insight(1), insight(2)];
    let mut challenges = ChallengeProposer::new().propose(&insights);
    challenges[1].duration = "3 weeks".to_string();
    let full = FullAnalysisResponse {
        insights,
        challenges,
        ..Default::default()
    };

    let report = render_report(0, &full).unwrap();
    assert_eq!(report.matches("🎯").count(), 2);
    let first = report.find("[P1]").unwrap();
    let second = report.find("[P2]").unwrap();
    let two_weeks = report.find("(2 weeks)").unwrap();
    let three_weeks = report.find("(3 weeks)").unwrap();
    assert!(first < two_weeks && two_weeks < second && second < three_weeks);
}

// ========== Config Command Tests ==========

#[test]
fn test_config_report_names_source() {
    let config = temp_file(".toml", "[weekend]\nratio_threshold = 2.5\n");
    let report = commands::config_report(Some(config.path())).unwrap();

    assert!(report.starts_with("# Source: "));
    assert!(report.contains(&config.path().display().to_string()));
    assert!(report.contains("ratio_threshold = 2.5"));
    assert!(report.contains("min_events = 3"));
}

#[test]
fn test_config_report_rejects_invalid() {
    let config = temp_file(".toml", "[binge]\nwindow_hours = 0\n");
    assert!(commands::config_report(Some(config.path())).is_err());
}
