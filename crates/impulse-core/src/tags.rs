//! Derived transaction tags and the tagging stage
//!
//! Tags form a closed vocabulary stored as a bitset on each transaction.
//! Tagging only ever adds tags, so running it twice is the same as once.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::models::Transaction;

/// A semantic label the pipeline attaches to a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivedTag {
    LateNight,
    Morning,
    Afternoon,
    Evening,
    Weekend,
    Discretionary,
}

impl DerivedTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LateNight => "late-night",
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Weekend => "weekend",
            Self::Discretionary => "discretionary",
        }
    }

    pub fn all() -> &'static [DerivedTag] {
        &[
            Self::LateNight,
            Self::Morning,
            Self::Afternoon,
            Self::Evening,
            Self::Weekend,
            Self::Discretionary,
        ]
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl FromStr for DerivedTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "late-night" => Ok(Self::LateNight),
            "morning" => Ok(Self::Morning),
            "afternoon" => Ok(Self::Afternoon),
            "evening" => Ok(Self::Evening),
            "weekend" => Ok(Self::Weekend),
            "discretionary" => Ok(Self::Discretionary),
            _ => Err(format!("Unknown tag: {}", s)),
        }
    }
}

impl fmt::Display for DerivedTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Segment of the day a transaction falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBucket {
    /// 00:00 - 04:59
    LateNight,
    /// 05:00 - 11:59
    Morning,
    /// 12:00 - 16:59
    Afternoon,
    /// 17:00 - 23:59
    Evening,
}

impl TimeBucket {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=4 => Self::LateNight,
            5..=11 => Self::Morning,
            12..=16 => Self::Afternoon,
            _ => Self::Evening,
        }
    }

    pub fn tag(&self) -> DerivedTag {
        match self {
            Self::LateNight => DerivedTag::LateNight,
            Self::Morning => DerivedTag::Morning,
            Self::Afternoon => DerivedTag::Afternoon,
            Self::Evening => DerivedTag::Evening,
        }
    }
}

/// Base categories that count as non-essential spending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscretionaryCategory {
    Shopping,
    Entertainment,
    Dining,
    Food,
    Travel,
}

impl DiscretionaryCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shopping => "shopping",
            Self::Entertainment => "entertainment",
            Self::Dining => "dining",
            Self::Food => "food",
            Self::Travel => "travel",
        }
    }

    pub fn all() -> &'static [DiscretionaryCategory] {
        &[
            Self::Shopping,
            Self::Entertainment,
            Self::Dining,
            Self::Food,
            Self::Travel,
        ]
    }
}

impl FromStr for DiscretionaryCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shopping" => Ok(Self::Shopping),
            "entertainment" => Ok(Self::Entertainment),
            "dining" => Ok(Self::Dining),
            "food" => Ok(Self::Food),
            "travel" => Ok(Self::Travel),
            _ => Err(format!("Unknown discretionary category: {}", s)),
        }
    }
}

impl fmt::Display for DiscretionaryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Add-only set of derived tags
///
/// Serialized as a list of tag names in declaration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TagSet(u8);

impl TagSet {
    pub fn new() -> Self {
        Self(0)
    }

    /// Add a tag; returns true if it was not already present
    pub fn insert(&mut self, tag: DerivedTag) -> bool {
        let was_present = self.contains(tag);
        self.0 |= tag.bit();
        !was_present
    }

    pub fn contains(&self, tag: DerivedTag) -> bool {
        self.0 & tag.bit() != 0
    }

    pub fn union(&self, other: TagSet) -> TagSet {
        TagSet(self.0 | other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = DerivedTag> + '_ {
        DerivedTag::all()
            .iter()
            .copied()
            .filter(move |t| self.contains(*t))
    }
}

impl FromIterator<DerivedTag> for TagSet {
    fn from_iter<I: IntoIterator<Item = DerivedTag>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

impl Serialize for TagSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|t| t.as_str()))
    }
}

/// Names outside the tag vocabulary are dropped, not rejected
impl<'de> Deserialize<'de> for TagSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        Ok(names
            .iter()
            .filter_map(|n| match n.parse::<DerivedTag>() {
                Ok(tag) => Some(tag),
                Err(_) => {
                    debug!(tag = %n, "Ignoring unknown derived tag");
                    None
                }
            })
            .collect())
    }
}

/// Whether a timestamp falls on Saturday or Sunday
pub fn is_weekend(date: &NaiveDateTime) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Annotates transactions with time bucket, weekend, and discretionary tags
#[derive(Debug, Clone)]
pub struct Tagger {
    discretionary: Vec<DiscretionaryCategory>,
}

impl Default for Tagger {
    fn default() -> Self {
        Self {
            discretionary: DiscretionaryCategory::all().to_vec(),
        }
    }
}

impl Tagger {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            discretionary: config.discretionary_categories.clone(),
        }
    }

    /// Whether a base category is treated as discretionary
    pub fn is_discretionary(&self, base_category: &str) -> bool {
        base_category
            .parse::<DiscretionaryCategory>()
            .map(|c| self.discretionary.contains(&c))
            .unwrap_or(false)
    }

    /// Tags this transaction would receive, independent of existing tags
    pub fn derive(&self, tx: &Transaction) -> TagSet {
        let mut tags = TagSet::new();
        tags.insert(TimeBucket::from_hour(tx.date.hour()).tag());
        if is_weekend(&tx.date) {
            tags.insert(DerivedTag::Weekend);
        }
        if self.is_discretionary(&tx.base_category) {
            tags.insert(DerivedTag::Discretionary);
        }
        tags
    }

    /// Merge derived tags into a single transaction
    pub fn tag(&self, tx: &mut Transaction) {
        tx.derived_tags = tx.derived_tags.union(self.derive(tx));
    }

    /// Tag every transaction in place
    pub fn tag_all(&self, transactions: &mut [Transaction]) {
        for tx in transactions.iter_mut() {
            self.tag(tx);
        }

        let discretionary = transactions
            .iter()
            .filter(|t| t.derived_tags.contains(DerivedTag::Discretionary))
            .count();
        debug!(
            total = transactions.len(),
            discretionary, "Tagged transactions"
        );
    }
}
