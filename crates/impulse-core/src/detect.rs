//! Binge-cycle detection
//!
//! A binge cycle is a run of discretionary purchases packed into a short
//! window. The detector slides a window start across the time-sorted
//! discretionary purchases one position at a time, so a long run reports one
//! pattern per qualifying start offset rather than a single merged cycle.

use tracing::debug;

use crate::config::BingeConfig;
use crate::models::{BehaviorPattern, PatternType, Transaction};
use crate::tags::DerivedTag;

/// Scans tagged transactions for binge cycles
#[derive(Debug, Clone, Default)]
pub struct PatternDetector {
    config: BingeConfig,
}

impl PatternDetector {
    pub fn new(config: BingeConfig) -> Self {
        Self { config }
    }

    /// Confidence for a window of `size` purchases
    pub fn confidence(&self, size: usize) -> f64 {
        (self.config.base_confidence + self.config.confidence_step * size as f64).min(1.0)
    }

    /// Detect binge cycles among transactions tagged discretionary
    ///
    /// Transactions must already be tagged. Ties on timestamp keep their input
    /// order, which fixes the evidence indices of each window.
    pub fn detect(&self, transactions: &[Transaction]) -> Vec<BehaviorPattern> {
        let mut discretionary: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| t.derived_tags.contains(DerivedTag::Discretionary))
            .collect();
        discretionary.sort_by_key(|t| t.date);

        let n = discretionary.len();
        let mut patterns = Vec::new();
        let mut end = 0;

        for start in 0..n {
            // Window ends only move forward as the start advances
            end = end.max(start);
            while end < n && discretionary[end].date - discretionary[start].date <= self.config.window
            {
                end += 1;
            }

            let window = &discretionary[start..end];
            if window.len() < self.config.min_events {
                continue;
            }

            let (first, last) = match (window.first(), window.last()) {
                (Some(first), Some(last)) => (first.date, last.date),
                _ => continue,
            };

            patterns.push(BehaviorPattern {
                id: None,
                user_id: None,
                pattern_type: PatternType::Binge,
                confidence: self.confidence(window.len()),
                period: (first, last),
                supporting_evidence: (0..window.len()).collect(),
            });
        }

        debug!(
            discretionary = n,
            patterns = patterns.len(),
            "Binge detection complete"
        );
        patterns
    }
}
