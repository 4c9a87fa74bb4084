//! Reporting aggregate over one analysis run

use crate::models::{BehaviorPattern, Insight, Summary, Transaction, Trigger};

/// Fold transactions and derived artifacts into counts for export
pub fn make_summary(
    transactions: &[Transaction],
    patterns: &[BehaviorPattern],
    triggers: &[Trigger],
    insights: &[Insight],
) -> Summary {
    let mut summary = Summary {
        transactions: transactions.len(),
        insights_count: insights.len(),
        ..Default::default()
    };

    for pattern in patterns {
        *summary.patterns.entry(pattern.pattern_type).or_insert(0) += 1;
    }

    summary.triggers = triggers.iter().map(|t| t.factor).collect();
    summary.triggers.sort_by_key(|f| f.as_str());
    summary.triggers.dedup();

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PatternType, TriggerFactor};
    use crate::test_utils::{single_binge, ts};
    use std::collections::BTreeMap;

    fn trigger(factor: TriggerFactor) -> Trigger {
        Trigger {
            id: None,
            user_id: None,
            factor,
            signal_strength: 0.4,
            correlations: BTreeMap::new(),
        }
    }

    #[test]
    fn test_counts() {
        let at = ts("2024-01-08T09:00:00");
        let pattern = BehaviorPattern {
            id: None,
            user_id: None,
            pattern_type: PatternType::Binge,
            confidence: 0.6,
            period: (at, at),
            supporting_evidence: vec![0, 1, 2],
        };

        let summary = make_summary(
            &single_binge(),
            &[pattern.clone(), pattern],
            &[
                trigger(TriggerFactor::Weekend),
                trigger(TriggerFactor::Payday),
                trigger(TriggerFactor::Weekend),
            ],
            &[],
        );

        assert_eq!(summary.transactions, 3);
        assert_eq!(summary.patterns[&PatternType::Binge], 2);
        assert_eq!(
            summary.triggers,
            vec![TriggerFactor::Payday, TriggerFactor::Weekend]
        );
        assert_eq!(summary.insights_count, 0);
    }

    #[test]
    fn test_empty() {
        let summary = make_summary(&[], &[], &[], &[]);
        assert_eq!(summary, Summary::default());
    }
}
