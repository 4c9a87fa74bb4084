//! Temporal trigger scoring
//!
//! Two heuristics run on every analysis, each yielding at most one trigger:
//! - Weekend: smoothed ratio of weekend to weekday discretionary spend
//! - Payday: discretionary spend close to the 1st or 15th of the month

use std::collections::BTreeMap;

use chrono::Datelike;
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::models::{Transaction, Trigger, TriggerFactor};
use crate::tags::DerivedTag;

/// Discretionary spend totals the trigger heuristics are built on
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpendBreakdown {
    pub weekend_spend: f64,
    pub weekday_spend: f64,
    pub near_payday_spend: f64,
}

impl SpendBreakdown {
    pub fn total(&self) -> f64 {
        self.weekend_spend + self.weekday_spend
    }
}

/// Computes weekend and payday signal strengths
#[derive(Debug, Clone, Default)]
pub struct TriggerScorer {
    config: AnalysisConfig,
}

impl TriggerScorer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Sum discretionary spend by weekend and payday proximity
    pub fn breakdown(&self, transactions: &[Transaction]) -> SpendBreakdown {
        let payday = &self.config.payday;
        let mut spend = SpendBreakdown::default();

        for tx in transactions
            .iter()
            .filter(|t| t.derived_tags.contains(DerivedTag::Discretionary))
        {
            if tx.derived_tags.contains(DerivedTag::Weekend) {
                spend.weekend_spend += tx.amount;
            } else {
                spend.weekday_spend += tx.amount;
            }

            let day = tx.date.day();
            if day.abs_diff(payday.anchor_for(day)) <= payday.proximity_days {
                spend.near_payday_spend += tx.amount;
            }
        }

        spend
    }

    /// Score all trigger factors, weekend first
    pub fn score(&self, transactions: &[Transaction]) -> Vec<Trigger> {
        let spend = self.breakdown(transactions);
        let triggers: Vec<Trigger> = [self.weekend(&spend), self.payday(&spend)]
            .into_iter()
            .flatten()
            .collect();

        debug!(
            weekend_spend = spend.weekend_spend,
            weekday_spend = spend.weekday_spend,
            near_payday_spend = spend.near_payday_spend,
            triggers = triggers.len(),
            "Trigger scoring complete"
        );
        triggers
    }

    /// Weekend trigger from a precomputed breakdown
    pub fn weekend(&self, spend: &SpendBreakdown) -> Option<Trigger> {
        let smoothing = self.config.smoothing;
        let denominator = spend.weekday_spend + smoothing;
        // Refunds can push the weekday side to or below zero
        if denominator <= 0.0 {
            return None;
        }
        let ratio = (spend.weekend_spend + smoothing) / denominator;

        if !(ratio > self.config.weekend.ratio_threshold && spend.weekend_spend > 0.0) {
            return None;
        }

        let mut correlations = BTreeMap::new();
        correlations.insert("weekend_spend".to_string(), spend.weekend_spend);
        correlations.insert("weekday_spend".to_string(), spend.weekday_spend);

        Some(Trigger {
            id: None,
            user_id: None,
            factor: TriggerFactor::Weekend,
            signal_strength: clamp_strength(ratio / self.config.weekend.strength_divisor),
            correlations,
        })
    }

    /// Payday trigger from a precomputed breakdown
    pub fn payday(&self, spend: &SpendBreakdown) -> Option<Trigger> {
        let near = spend.near_payday_spend;
        let total = spend.total();

        let denominator = total + self.config.smoothing;
        if denominator <= 0.0 || !(near > 0.0 && near > total * self.config.payday.share_threshold)
        {
            return None;
        }

        let mut correlations = BTreeMap::new();
        correlations.insert("near_payday_spend".to_string(), near);

        Some(Trigger {
            id: None,
            user_id: None,
            factor: TriggerFactor::Payday,
            signal_strength: clamp_strength(near / denominator),
            correlations,
        })
    }
}

/// Cap at 1.0; the lower bound only matters for refund-heavy inputs
fn clamp_strength(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
