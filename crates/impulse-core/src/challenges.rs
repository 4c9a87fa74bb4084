//! Challenge proposal
//!
//! Each factor an insight links to maps to one intervention template.
//! Challenges are proposed per insight with no deduplication, so two insights
//! linking the same factor yield two challenges.

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{Challenge, ChallengeStatus, Factor, Insight, RuleValue};

/// Intervention template for one factor
#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeTemplate {
    pub goal: &'static str,
    pub rules: &'static [(&'static str, i64)],
    pub duration: &'static str,
}

pub fn challenge_template(factor: Factor) -> ChallengeTemplate {
    match factor {
        Factor::Binge => ChallengeTemplate {
            goal: "Reduce binge cycles",
            rules: &[("cooldown_hours", 48), ("max_discretionary_in_window", 2)],
            duration: "2 weeks",
        },
        Factor::Weekend => ChallengeTemplate {
            goal: "Cap weekend discretionary spend",
            rules: &[("weekend_cap", 50)],
            duration: "1 week",
        },
        Factor::Payday => ChallengeTemplate {
            goal: "Post-payday delay",
            rules: &[("purchase_delay_hours", 48)],
            duration: "1 week",
        },
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChallengeProposer;

impl ChallengeProposer {
    pub fn new() -> Self {
        Self
    }

    /// Propose challenges for insights in input order
    ///
    /// Within one insight, challenges follow factor order (binge, weekend,
    /// payday) regardless of how `linked_patterns` is ordered.
    pub fn propose(&self, insights: &[Insight]) -> Vec<Challenge> {
        let challenges: Vec<Challenge> = insights
            .iter()
            .flat_map(|insight| insight.linked_factors().map(Self::challenge_for))
            .collect();

        debug!(
            insights = insights.len(),
            challenges = challenges.len(),
            "Challenge proposal complete"
        );
        challenges
    }

    pub fn challenge_for(factor: Factor) -> Challenge {
        let template = challenge_template(factor);
        let rules: BTreeMap<String, RuleValue> = template
            .rules
            .iter()
            .map(|(name, value)| (name.to_string(), RuleValue::from(*value)))
            .collect();

        Challenge {
            id: None,
            user_id: None,
            goal: template.goal.to_string(),
            rules,
            duration: template.duration.to_string(),
            status: ChallengeStatus::Proposed,
        }
    }
}
