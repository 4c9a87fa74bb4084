//! Maps detected factors to insights in priority order

use std::collections::BTreeSet;

use tracing::debug;

use crate::models::{BehaviorPattern, Factor, Insight, Trigger};

use super::templates::insight_template;

#[derive(Debug, Clone, Copy, Default)]
pub struct InsightSynthesizer;

impl InsightSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// One insight per detected factor, ordered binge, weekend, payday
    pub fn synthesize(&self, patterns: &[BehaviorPattern], triggers: &[Trigger]) -> Vec<Insight> {
        let present: BTreeSet<Factor> = patterns
            .iter()
            .map(|p| p.pattern_type.factor())
            .chain(triggers.iter().map(|t| t.factor.factor()))
            .collect();

        // BTreeSet iterates in Factor order, which is priority order
        let insights: Vec<Insight> = present.into_iter().map(Self::insight_for).collect();

        debug!(insights = insights.len(), "Insight synthesis complete");
        insights
    }

    pub fn insight_for(factor: Factor) -> Insight {
        let template = insight_template(factor);
        Insight {
            id: None,
            user_id: None,
            summary: template.summary.to_string(),
            detail: template.detail.to_string(),
            priority: factor.priority(),
            linked_patterns: vec![factor],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PatternType, TriggerFactor};
    use crate::test_utils::ts;
    use std::collections::BTreeMap;

    fn binge() -> BehaviorPattern {
        let at = ts("2024-01-08T09:00:00");
        BehaviorPattern {
            id: None,
            user_id: None,
            pattern_type: PatternType::Binge,
            confidence: 0.6,
            period: (at, at),
            supporting_evidence: vec![0, 1, 2],
        }
    }

    fn trigger(factor: TriggerFactor) -> Trigger {
        Trigger {
            id: None,
            user_id: None,
            factor,
            signal_strength: 0.5,
            correlations: BTreeMap::new(),
        }
    }

    #[test]
    fn test_priority_order_independent_of_detection_order() {
        let insights = InsightSynthesizer::new().synthesize(
            &[binge()],
            &[trigger(TriggerFactor::Payday), trigger(TriggerFactor::Weekend)],
        );

        let priorities: Vec<u8> = insights.iter().map(|i| i.priority).collect();
        assert_eq!(priorities, vec![1, 2, 3]);
        assert_eq!(insights[0].linked_patterns, vec![Factor::Binge]);
        assert_eq!(insights[1].linked_patterns, vec![Factor::Weekend]);
        assert_eq!(insights[2].linked_patterns, vec![Factor::Payday]);
        assert_eq!(insights[2].summary, "Post-payday spike");
    }

    #[test]
    fn test_many_patterns_one_insight() {
        let insights = InsightSynthesizer::new().synthesize(&[binge(), binge(), binge()], &[]);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].summary, "Detected binge spending cycles");
    }

    #[test]
    fn test_absent_factors_emit_nothing() {
        assert!(InsightSynthesizer::new().synthesize(&[], &[]).is_empty());

        let insights =
            InsightSynthesizer::new().synthesize(&[], &[trigger(TriggerFactor::Weekend)]);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].priority, 2);
        assert_eq!(insights[0].summary, "Weekend trigger detected");
    }
}
