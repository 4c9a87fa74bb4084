//! Domain models for Impulse
//!
//! Field names here are the wire contract shared by the CLI, the HTTP server,
//! and any downstream consumer that stores or exports analysis artifacts.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::tags::TagSet;

/// One financial event as supplied by ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Storage-assigned identifier
    #[serde(default)]
    pub id: Option<i64>,
    /// Owner of the transaction
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Wall-clock timestamp of the purchase
    #[serde(with = "datetime_format")]
    pub date: NaiveDateTime,
    /// Signed amount in the account currency
    pub amount: f64,
    #[serde(default)]
    pub merchant: String,
    /// Lowercase category assigned upstream (e.g. "dining")
    #[serde(default)]
    pub base_category: String,
    /// Where the record came from (e.g. "csv", "manual")
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub notes: String,
    /// Tags derived by the analysis pipeline
    #[serde(default)]
    pub derived_tags: TagSet,
}

fn default_source() -> String {
    "manual".to_string()
}

impl Transaction {
    /// Create an untagged transaction with empty text fields
    pub fn new(date: NaiveDateTime, amount: f64, base_category: impl Into<String>) -> Self {
        Self {
            id: None,
            user_id: None,
            date,
            amount,
            merchant: String::new(),
            base_category: base_category.into(),
            source: default_source(),
            notes: String::new(),
            derived_tags: TagSet::new(),
        }
    }

    pub fn with_merchant(mut self, merchant: impl Into<String>) -> Self {
        self.merchant = merchant.into();
        self
    }

    pub fn with_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

/// Behavioral factors that insights and challenges are keyed on
///
/// Variant order is insight priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Factor {
    Binge,
    Weekend,
    Payday,
}

impl Factor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Binge => "binge",
            Self::Weekend => "weekend",
            Self::Payday => "payday",
        }
    }

    /// Insight priority (lower = more urgent)
    pub fn priority(&self) -> u8 {
        match self {
            Self::Binge => 1,
            Self::Weekend => 2,
            Self::Payday => 3,
        }
    }

    pub fn all() -> &'static [Factor] {
        &[Self::Binge, Self::Weekend, Self::Payday]
    }
}

impl std::str::FromStr for Factor {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "binge" => Ok(Self::Binge),
            "weekend" => Ok(Self::Weekend),
            "payday" => Ok(Self::Payday),
            _ => Err(format!("Unknown factor: {}", s)),
        }
    }
}

impl std::fmt::Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kinds of recurring behavior the detector reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternType {
    /// Cluster of discretionary purchases in a short window
    Binge,
}

impl PatternType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Binge => "binge",
        }
    }

    pub fn factor(&self) -> Factor {
        match self {
            Self::Binge => Factor::Binge,
        }
    }
}

impl std::fmt::Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A detected recurring behavior instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorPattern {
    pub id: Option<i64>,
    pub user_id: Option<i64>,
    #[serde(rename = "type")]
    pub pattern_type: PatternType,
    /// Window-size based score in [0.3, 1.0]
    pub confidence: f64,
    /// (first, last) timestamp of the contributing window
    pub period: (NaiveDateTime, NaiveDateTime),
    /// Positional indices within the contributing window
    pub supporting_evidence: Vec<usize>,
}

/// Temporal factors the trigger scorer evaluates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerFactor {
    Weekend,
    Payday,
}

impl TriggerFactor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekend => "weekend",
            Self::Payday => "payday",
        }
    }

    pub fn factor(&self) -> Factor {
        match self {
            Self::Weekend => Factor::Weekend,
            Self::Payday => Factor::Payday,
        }
    }
}

impl std::fmt::Display for TriggerFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A scored temporal driver of spending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub id: Option<i64>,
    pub user_id: Option<i64>,
    pub factor: TriggerFactor,
    /// Normalized score in [0, 1]
    pub signal_strength: f64,
    /// Intermediate metrics behind the score, for explainability
    pub correlations: BTreeMap<String, f64>,
}

/// A narrative explanation derived from patterns and triggers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub id: Option<i64>,
    pub user_id: Option<i64>,
    pub summary: String,
    pub detail: String,
    /// Lower = more urgent
    pub priority: u8,
    pub linked_patterns: Vec<Factor>,
}

impl Insight {
    /// Distinct linked factors in factor order
    ///
    /// One challenge is proposed per factor yielded here.
    pub fn linked_factors(&self) -> impl Iterator<Item = Factor> + '_ {
        Factor::all()
            .iter()
            .copied()
            .filter(|f| self.linked_patterns.contains(f))
    }
}

/// Lifecycle of a proposed challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeStatus {
    /// Suggested by the analysis, not yet accepted
    #[default]
    Proposed,
    Active,
    Completed,
    Abandoned,
}

impl ChallengeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Proposed => "proposed",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        }
    }
}

impl std::str::FromStr for ChallengeStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "proposed" => Ok(Self::Proposed),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "abandoned" => Ok(Self::Abandoned),
            _ => Err(format!("Unknown challenge status: {}", s)),
        }
    }
}

impl std::fmt::Display for ChallengeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single parameter of a challenge rule set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Integer(i64),
    Number(f64),
    Flag(bool),
    Text(String),
}

impl From<i64> for RuleValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// A proposed behavioral intervention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: Option<i64>,
    pub user_id: Option<i64>,
    pub goal: String,
    pub rules: BTreeMap<String, RuleValue>,
    /// Human-readable length, e.g. "2 weeks"
    pub duration: String,
    pub status: ChallengeStatus,
}

/// Stage 1 output: what was detected
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub patterns: Vec<BehaviorPattern>,
    pub triggers: Vec<Trigger>,
}

/// Stage 2 output: detections plus narrative and interventions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FullAnalysisResponse {
    pub patterns: Vec<BehaviorPattern>,
    pub triggers: Vec<Trigger>,
    pub insights: Vec<Insight>,
    pub challenges: Vec<Challenge>,
}

/// Reporting aggregate for export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of transactions analyzed
    pub transactions: usize,
    /// Occurrences per pattern type
    pub patterns: BTreeMap<PatternType, usize>,
    /// Distinct trigger factors, sorted by name
    pub triggers: Vec<TriggerFactor>,
    pub insights_count: usize,
}

/// Lenient timestamp (de)serialization for transaction dates
///
/// Accepts RFC 3339 (offset is dropped, wall-clock kept), naive ISO 8601
/// datetimes, and bare `YYYY-MM-DD` dates (midnight). Always writes naive
/// ISO 8601.
pub mod datetime_format {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).ok_or_else(|| serde::de::Error::custom(format!("Invalid date: {}", s)))
    }

    /// Parse an ISO 8601 / RFC 3339 timestamp or a bare date
    pub fn parse(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.naive_local());
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(dt);
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }
}
