//! Analysis thresholds
//!
//! Every heuristic constant the pipeline uses lives here so it can be tuned
//! without code changes.
//!
//! ## Configuration Resolution
//!
//! 1. Explicit path (`--config` / `IMPULSE_CONFIG`), which must exist
//! 2. User override in data dir (~/.local/share/impulse/config/analysis.toml)
//! 3. Embedded defaults (compiled into binary)
//!
//! Keys missing from a file keep their default values.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::tags::DiscretionaryCategory;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/analysis.toml");

/// Binge-cycle detection thresholds
#[derive(Debug, Clone, PartialEq)]
pub struct BingeConfig {
    /// Maximum span from the first purchase of a window
    pub window: Duration,
    /// Minimum window size to report
    pub min_events: usize,
    pub base_confidence: f64,
    pub confidence_step: f64,
}

impl Default for BingeConfig {
    fn default() -> Self {
        Self {
            window: Duration::hours(6),
            min_events: 3,
            base_confidence: 0.3,
            confidence_step: 0.1,
        }
    }
}

/// Weekend trigger thresholds
#[derive(Debug, Clone, PartialEq)]
pub struct WeekendConfig {
    pub ratio_threshold: f64,
    pub strength_divisor: f64,
}

impl Default for WeekendConfig {
    fn default() -> Self {
        Self {
            ratio_threshold: 1.3,
            strength_divisor: 2.0,
        }
    }
}

/// Payday trigger thresholds
#[derive(Debug, Clone, PartialEq)]
pub struct PaydayConfig {
    /// Days of month <= this anchor on `early_anchor`, later days on `late_anchor`
    pub anchor_split_day: u32,
    pub early_anchor: u32,
    pub late_anchor: u32,
    pub proximity_days: u32,
    /// Share of total discretionary spend near-payday spend must exceed
    pub share_threshold: f64,
}

impl Default for PaydayConfig {
    fn default() -> Self {
        Self {
            anchor_split_day: 8,
            early_anchor: 1,
            late_anchor: 15,
            proximity_days: 2,
            share_threshold: 0.2,
        }
    }
}

impl PaydayConfig {
    /// Payday the given day of month is measured against
    pub fn anchor_for(&self, day: u32) -> u32 {
        if day <= self.anchor_split_day {
            self.early_anchor
        } else {
            self.late_anchor
        }
    }
}

/// Full set of pipeline thresholds
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub binge: BingeConfig,
    pub weekend: WeekendConfig,
    pub payday: PaydayConfig,
    /// Added to numerator and denominator of spend ratios
    pub smoothing: f64,
    pub discretionary_categories: Vec<DiscretionaryCategory>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            binge: BingeConfig::default(),
            weekend: WeekendConfig::default(),
            payday: PaydayConfig::default(),
            smoothing: 1.0,
            discretionary_categories: DiscretionaryCategory::all().to_vec(),
        }
    }
}

/// Where the active configuration was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Path passed explicitly by the caller
    Explicit(PathBuf),
    /// Override file in the user data directory
    UserOverride(PathBuf),
    /// Defaults compiled into the binary
    Embedded,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(path) => write!(f, "{}", path.display()),
            Self::UserOverride(path) => write!(f, "{} (user override)", path.display()),
            Self::Embedded => write!(f, "built-in defaults"),
        }
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("impulse").join("config").join("analysis.toml"))
}

impl AnalysisConfig {
    /// Load configuration following the resolution order above
    pub fn load(explicit: Option<&Path>) -> Result<(Self, ConfigSource)> {
        if let Some(path) = explicit {
            let content = fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read config {}: {}", path.display(), e))
            })?;
            let config = Self::from_toml(&content)?;
            return Ok((config, ConfigSource::Explicit(path.to_path_buf())));
        }

        if let Some(path) = default_config_path() {
            if path.exists() {
                let content = fs::read_to_string(&path)
                    .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;
                let config = Self::from_toml(&content)?;
                debug!(path = %path.display(), "Loaded analysis config override");
                return Ok((config, ConfigSource::UserOverride(path)));
            }
        }

        Ok((Self::from_toml(DEFAULT_CONFIG)?, ConfigSource::Embedded))
    }

    /// Parse TOML content, applying it over the defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

        let mut config = Self::default();

        if let Some(smoothing) = raw.smoothing {
            config.smoothing = smoothing;
        }

        if let Some(names) = raw.discretionary_categories {
            config.discretionary_categories = names
                .iter()
                .map(|n| n.parse::<DiscretionaryCategory>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(Error::Config)?;
        }

        if let Some(binge) = raw.binge {
            if let Some(hours) = binge.window_hours {
                if !(hours > 0.0) {
                    return Err(Error::Config(format!(
                        "binge.window_hours must be positive, got {}",
                        hours
                    )));
                }
                config.binge.window = Duration::milliseconds((hours * 3_600_000.0).round() as i64);
            }
            if let Some(min_events) = binge.min_events {
                config.binge.min_events = min_events;
            }
            if let Some(base) = binge.base_confidence {
                config.binge.base_confidence = base;
            }
            if let Some(step) = binge.confidence_step {
                config.binge.confidence_step = step;
            }
        }

        if let Some(weekend) = raw.weekend {
            if let Some(threshold) = weekend.ratio_threshold {
                config.weekend.ratio_threshold = threshold;
            }
            if let Some(divisor) = weekend.strength_divisor {
                config.weekend.strength_divisor = divisor;
            }
        }

        if let Some(payday) = raw.payday {
            if let Some(split) = payday.anchor_split_day {
                config.payday.anchor_split_day = split;
            }
            if let Some(early) = payday.early_anchor {
                config.payday.early_anchor = early;
            }
            if let Some(late) = payday.late_anchor {
                config.payday.late_anchor = late;
            }
            if let Some(days) = payday.proximity_days {
                config.payday.proximity_days = days;
            }
            if let Some(share) = payday.share_threshold {
                config.payday.share_threshold = share;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Check values that would make the heuristics meaningless
    pub fn validate(&self) -> Result<()> {
        if self.binge.window <= Duration::zero() {
            return Err(Error::Config("binge window must be positive".into()));
        }
        if self.binge.min_events < 1 {
            return Err(Error::Config("binge.min_events must be at least 1".into()));
        }
        if self.smoothing < 0.0 {
            return Err(Error::Config(format!(
                "smoothing must not be negative, got {}",
                self.smoothing
            )));
        }
        if self.weekend.strength_divisor <= 0.0 {
            return Err(Error::Config(
                "weekend.strength_divisor must be positive".into(),
            ));
        }
        for (key, day) in [
            ("payday.anchor_split_day", self.payday.anchor_split_day),
            ("payday.early_anchor", self.payday.early_anchor),
            ("payday.late_anchor", self.payday.late_anchor),
        ] {
            if !(1..=31).contains(&day) {
                return Err(Error::Config(format!(
                    "{} must be a day of month (1-31), got {}",
                    key, day
                )));
            }
        }
        Ok(())
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        let raw = RawConfig {
            smoothing: Some(self.smoothing),
            discretionary_categories: Some(
                self.discretionary_categories
                    .iter()
                    .map(|c| c.as_str().to_string())
                    .collect(),
            ),
            binge: Some(RawBinge {
                window_hours: Some(self.binge.window.num_milliseconds() as f64 / 3_600_000.0),
                min_events: Some(self.binge.min_events),
                base_confidence: Some(self.binge.base_confidence),
                confidence_step: Some(self.binge.confidence_step),
            }),
            weekend: Some(RawWeekend {
                ratio_threshold: Some(self.weekend.ratio_threshold),
                strength_divisor: Some(self.weekend.strength_divisor),
            }),
            payday: Some(RawPayday {
                anchor_split_day: Some(self.payday.anchor_split_day),
                early_anchor: Some(self.payday.early_anchor),
                late_anchor: Some(self.payday.late_anchor),
                proximity_days: Some(self.payday.proximity_days),
                share_threshold: Some(self.payday.share_threshold),
            }),
        };
        toml::to_string_pretty(&raw)
            .map_err(|e| Error::Config(format!("Failed to render config: {}", e)))
    }
}

/// Raw config structure for TOML parsing
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    smoothing: Option<f64>,
    discretionary_categories: Option<Vec<String>>,
    binge: Option<RawBinge>,
    weekend: Option<RawWeekend>,
    payday: Option<RawPayday>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBinge {
    window_hours: Option<f64>,
    min_events: Option<usize>,
    base_confidence: Option<f64>,
    confidence_step: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawWeekend {
    ratio_threshold: Option<f64>,
    strength_divisor: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPayday {
    anchor_split_day: Option<u32>,
    early_anchor: Option<u32>,
    late_anchor: Option<u32>,
    proximity_days: Option<u32>,
    share_threshold: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_config_matches_defaults() {
        let config = AnalysisConfig::from_toml(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = AnalysisConfig::from_toml(
            r#"
            [binge]
            window_hours = 2.5

            [weekend]
            ratio_threshold = 1.8
            "#,
        )
        .unwrap();

        assert_eq!(config.binge.window, Duration::minutes(150));
        assert_eq!(config.binge.min_events, 3);
        assert_eq!(config.weekend.ratio_threshold, 1.8);
        assert_eq!(config.payday, PaydayConfig::default());
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(AnalysisConfig::from_toml("[binge]\nwindow_hours = 0.0").is_err());
        assert!(AnalysisConfig::from_toml("[binge]\nmin_events = 0").is_err());
        assert!(AnalysisConfig::from_toml("smoothing = -1.0").is_err());
        assert!(AnalysisConfig::from_toml("[payday]\nlate_anchor = 40").is_err());
        assert!(AnalysisConfig::from_toml(r#"discretionary_categories = ["rent"]"#).is_err());
        assert!(AnalysisConfig::from_toml("[binge]\nwindow = 6").is_err());
    }

    #[test]
    fn test_anchor_for() {
        let payday = PaydayConfig::default();
        assert_eq!(payday.anchor_for(1), 1);
        assert_eq!(payday.anchor_for(8), 1);
        assert_eq!(payday.anchor_for(9), 15);
        assert_eq!(payday.anchor_for(31), 15);
    }

    #[test]
    fn test_to_toml_round_trips() {
        let config = AnalysisConfig {
            smoothing: 0.5,
            ..Default::default()
        };
        let rendered = config.to_toml().unwrap();
        assert_eq!(AnalysisConfig::from_toml(&rendered).unwrap(), config);
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[payday]\nproximity_days = 3").unwrap();

        let (config, source) = AnalysisConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.payday.proximity_days, 3);
        assert_eq!(source, ConfigSource::Explicit(file.path().to_path_buf()));
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let result = AnalysisConfig::load(Some(Path::new("/nonexistent/analysis.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
