//! Analysis command implementations

use std::fmt::{self, Write as _};
use std::path::Path;

use anyhow::Result;
use impulse_core::{FullAnalysisResponse, RuleValue};

use super::{load_analyzer, load_transactions, to_json};

/// Run stage 1 (or stage 2 with `full`) and render the result as JSON
pub fn analysis_json(
    config_path: Option<&Path>,
    file: &Path,
    full: bool,
    pretty: bool,
) -> Result<String> {
    let analyzer = load_analyzer(config_path)?;
    let mut transactions = load_transactions(file)?;

    if full {
        to_json(&analyzer.analyze_full(&mut transactions), pretty)
    } else {
        to_json(&analyzer.analyze(&mut transactions), pretty)
    }
}

/// Run the full analysis and render the reporting summary as JSON
pub fn summary_json(config_path: Option<&Path>, file: &Path, pretty: bool) -> Result<String> {
    let analyzer = load_analyzer(config_path)?;
    let mut transactions = load_transactions(file)?;
    let full = analyzer.analyze_full(&mut transactions);
    to_json(&analyzer.summarize(&transactions, &full), pretty)
}

pub fn cmd_analyze(config_path: Option<&Path>, file: &Path, full: bool, pretty: bool) -> Result<()> {
    println!("{}", analysis_json(config_path, file, full, pretty)?);
    Ok(())
}

pub fn cmd_summary(config_path: Option<&Path>, file: &Path, pretty: bool) -> Result<()> {
    println!("{}", summary_json(config_path, file, pretty)?);
    Ok(())
}

pub fn cmd_insights(config_path: Option<&Path>, file: &Path) -> Result<()> {
    let analyzer = load_analyzer(config_path)?;
    let mut transactions = load_transactions(file)?;
    let full = analyzer.analyze_full(&mut transactions);

    print!("{}", render_report(transactions.len(), &full)?);
    Ok(())
}

/// Human-readable insight report
///
/// Insights arrive in priority order. Challenges are proposed one per linked
/// factor in insight order, so each insight takes the next run of them.
pub fn render_report(
    transaction_count: usize,
    full: &FullAnalysisResponse,
) -> Result<String, fmt::Error> {
    let mut out = String::new();

    writeln!(out, "🧠 Behavior Report")?;
    writeln!(out, "   ─────────────────────────────")?;
    writeln!(out, "   Transactions analyzed: {}", transaction_count)?;
    writeln!(out, "   Binge windows: {}", full.patterns.len())?;
    for trigger in &full.triggers {
        writeln!(
            out,
            "   Trigger: {} (strength {:.2})",
            trigger.factor, trigger.signal_strength
        )?;
    }

    if full.insights.is_empty() {
        writeln!(out)?;
        writeln!(out, "✅ No behavioral patterns detected.")?;
        return Ok(out);
    }

    let mut challenges = full.challenges.iter();
    for insight in &full.insights {
        writeln!(out)?;
        writeln!(out, "[P{}] {}", insight.priority, insight.summary)?;
        writeln!(out, "     {}", insight.detail)?;

        for challenge in challenges.by_ref().take(insight.linked_factors().count()) {
            let rules = challenge
                .rules
                .iter()
                .map(|(name, value)| format!("{}={}", name, format_rule(value)))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(
                out,
                "     🎯 {} ({}) [{}]",
                challenge.goal, challenge.duration, rules
            )?;
        }
    }

    Ok(out)
}

fn format_rule(value: &RuleValue) -> String {
    match value {
        RuleValue::Integer(n) => n.to_string(),
        RuleValue::Number(n) => n.to_string(),
        RuleValue::Flag(b) => b.to_string(),
        RuleValue::Text(s) => s.clone(),
    }
}
