//! Integration tests for impulse-core
//!
//! These tests exercise the full import → tag → detect → propose workflow.

use impulse_core::{
    import::{parse_csv, parse_json},
    AnalysisConfig, BehaviorAnalyzer, DerivedTag, Factor, PatternType, RuleValue, TriggerFactor,
};

/// Friday 2024-03-01 night out followed by a Saturday order
/// - Three discretionary purchases within 2.5 hours (one binge window)
/// - All discretionary spend lands within two days of the 1st
/// - One grocery purchase that is never discretionary
fn payday_binge_csv() -> &'static str {
    r#"Date,Merchant,Amount,Category,Notes
2024-03-01T20:00:00,Cinema City,25.00,Entertainment,
2024-03-01T21:00:00,Bar Central,30.00,dining,with friends
2024-03-01T22:30:00,Late Bites,15.00,food,
2024-03-02T13:00:00,AMAZON MKTPLACE,40.00,,
2024-03-10T12:00:00,Grocer,80.00,groceries,"#
}

/// Late-month weekend splurge, far from either payday anchor
fn weekend_csv() -> &'static str {
    r#"transaction_date,description,debit,category
03/23/2024,Stadium Tickets,90.00,entertainment
03/24/2024,Steakhouse,60.00,dining
03/27/2024,Bookshop,20.00,shopping"#
}

// =============================================================================
// CSV → Analysis Workflow
// =============================================================================

#[test]
fn test_csv_to_full_analysis() {
    let mut transactions =
        parse_csv(payday_binge_csv().as_bytes()).expect("Failed to parse CSV");
    assert_eq!(transactions.len(), 5);
    // Merchant hint fills the empty category
    assert_eq!(transactions[3].base_category, "shopping");

    let analyzer = BehaviorAnalyzer::default();
    let full = analyzer.analyze_full(&mut transactions);

    // Tagging happened in place
    assert!(transactions[0].derived_tags.contains(DerivedTag::Evening));
    assert!(transactions[3].derived_tags.contains(DerivedTag::Weekend));
    assert!(!transactions[4].derived_tags.contains(DerivedTag::Discretionary));

    // One binge window: Friday 20:00 to 22:30
    assert_eq!(full.patterns.len(), 1);
    let binge = &full.patterns[0];
    assert_eq!(binge.pattern_type, PatternType::Binge);
    assert!((binge.confidence - 0.6).abs() < 1e-9);
    assert_eq!(binge.supporting_evidence, vec![0, 1, 2]);
    assert_eq!(binge.period.0, transactions[0].date);
    assert_eq!(binge.period.1, transactions[2].date);

    // Weekend 40 vs weekday 70 stays below the ratio threshold; payday fires
    assert_eq!(full.triggers.len(), 1);
    let payday = &full.triggers[0];
    assert_eq!(payday.factor, TriggerFactor::Payday);
    assert_eq!(payday.correlations["near_payday_spend"], 110.0);
    assert!((payday.signal_strength - 110.0 / 111.0).abs() < 1e-9);

    let priorities: Vec<u8> = full.insights.iter().map(|i| i.priority).collect();
    assert_eq!(priorities, vec![1, 3]);
    assert_eq!(full.insights[1].linked_patterns, vec![Factor::Payday]);

    let goals: Vec<&str> = full.challenges.iter().map(|c| c.goal.as_str()).collect();
    assert_eq!(goals, vec!["Reduce binge cycles", "Post-payday delay"]);

    let summary = analyzer.summarize(&transactions, &full);
    assert_eq!(summary.transactions, 5);
    assert_eq!(summary.patterns[&PatternType::Binge], 1);
    assert_eq!(summary.triggers, vec![TriggerFactor::Payday]);
    assert_eq!(summary.insights_count, 2);
}

#[test]
fn test_weekend_trigger_from_bank_export() {
    let mut transactions = parse_csv(weekend_csv().as_bytes()).unwrap();
    assert_eq!(transactions.len(), 3);

    let full = BehaviorAnalyzer::default().analyze_full(&mut transactions);

    assert!(full.patterns.is_empty());
    assert_eq!(full.triggers.len(), 1);
    let weekend = &full.triggers[0];
    assert_eq!(weekend.factor, TriggerFactor::Weekend);
    // (150 + 1) / (20 + 1) / 2 is well above 1
    assert_eq!(weekend.signal_strength, 1.0);
    assert_eq!(weekend.correlations["weekend_spend"], 150.0);
    assert_eq!(weekend.correlations["weekday_spend"], 20.0);

    assert_eq!(full.challenges.len(), 1);
    assert_eq!(
        full.challenges[0].rules["weekend_cap"],
        RuleValue::Integer(50)
    );
}

#[test]
fn test_config_override_changes_outcome() {
    let config = AnalysisConfig::from_toml(
        r#"
[weekend]
ratio_threshold = 8.0
"#,
    )
    .unwrap();

    let mut transactions = parse_csv(weekend_csv().as_bytes()).unwrap();
    let full = BehaviorAnalyzer::new(config).analyze_full(&mut transactions);

    assert!(full.triggers.is_empty());
    assert!(full.insights.is_empty());
    assert!(full.challenges.is_empty());
}

#[test]
fn test_tight_binge_window_from_config() {
    let config = AnalysisConfig::from_toml(
        r#"
[binge]
window_hours = 1.5
min_events = 2
"#,
    )
    .unwrap();

    let mut transactions = parse_csv(payday_binge_csv().as_bytes()).unwrap();
    let result = BehaviorAnalyzer::new(config).analyze(&mut transactions);

    // 20:00 + 21:00 and 21:00 + 22:30 each fit in 1.5 hours
    assert_eq!(result.patterns.len(), 2);
    assert!(result.patterns.iter().all(|p| p.supporting_evidence == vec![0, 1]));
}

// =============================================================================
// JSON Round Trip
// =============================================================================

#[test]
fn test_json_export_reanalyzes_identically() {
    let analyzer = BehaviorAnalyzer::default();
    let mut transactions = parse_csv(payday_binge_csv().as_bytes()).unwrap();
    let first = analyzer.analyze_full(&mut transactions);

    // Tagged transactions survive export and re-analysis without changing
    let json = serde_json::to_string(&transactions).unwrap();
    let mut reloaded = parse_json(json.as_bytes()).unwrap();
    assert_eq!(reloaded, transactions);

    let second = analyzer.analyze_full(&mut reloaded);
    assert_eq!(first, second);
}

#[test]
fn test_owner_flows_through_to_artifacts() {
    let json = r#"[
        {"user_id": 7, "date": "2024-03-01T20:00:00", "amount": 25, "base_category": "entertainment"},
        {"user_id": 7, "date": "2024-03-01T21:00:00", "amount": 30, "base_category": "dining"},
        {"user_id": 7, "date": "2024-03-01T22:30:00", "amount": 15, "base_category": "food"}
    ]"#;
    let mut transactions = parse_json(json.as_bytes()).unwrap();
    let full = BehaviorAnalyzer::default().analyze_full(&mut transactions);

    assert!(!full.patterns.is_empty());
    assert!(full.patterns.iter().all(|p| p.user_id == Some(7)));
    assert!(full.triggers.iter().all(|t| t.user_id == Some(7)));
    assert!(full.insights.iter().all(|i| i.user_id == Some(7)));
    assert!(full.challenges.iter().all(|c| c.user_id == Some(7)));
}
