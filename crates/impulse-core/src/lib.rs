//! Impulse Core Library
//!
//! Behavioral spending analysis over batches of transactions:
//! - CSV and JSON transaction ingestion
//! - Time-of-day, weekend, and discretionary tagging
//! - Binge cluster detection over a sliding time window
//! - Weekend and payday trigger scoring
//! - Insight synthesis and challenge proposal
//! - Layered threshold configuration (explicit file, user override, built-in defaults)

pub mod challenges;
pub mod config;
pub mod detect;
pub mod error;
pub mod import;
pub mod insights;
pub mod models;
pub mod pipeline;
pub mod summary;
pub mod tags;
pub mod triggers;

/// Transaction builders and fixtures shared by tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use challenges::{challenge_template, ChallengeProposer, ChallengeTemplate};
pub use config::{
    default_config_path, AnalysisConfig, BingeConfig, ConfigSource, PaydayConfig, WeekendConfig,
};
pub use detect::PatternDetector;
pub use error::{Error, Result};
pub use import::{guess_category, parse_csv, parse_csv_bytes, parse_json};
pub use insights::{insight_template, InsightSynthesizer, InsightTemplate};
pub use models::{
    AnalysisResult, BehaviorPattern, Challenge, ChallengeStatus, Factor, FullAnalysisResponse,
    Insight, PatternType, RuleValue, Summary, Transaction, Trigger, TriggerFactor,
};
pub use pipeline::{common_owner, BehaviorAnalyzer};
pub use summary::make_summary;
pub use tags::{is_weekend, DerivedTag, DiscretionaryCategory, TagSet, Tagger, TimeBucket};
pub use triggers::{SpendBreakdown, TriggerScorer};
