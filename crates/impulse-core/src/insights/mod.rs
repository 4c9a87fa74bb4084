//! Insight synthesis
//!
//! Turns detected patterns and triggers into short narrative insights. Each
//! factor maps to one fixed template; the wording never depends on the
//! amounts involved, only on which factors were detected.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use impulse_core::insights::InsightSynthesizer;
//!
//! let insights = InsightSynthesizer::new().synthesize(&result.patterns, &result.triggers);
//! ```

pub mod synthesizer;
pub mod templates;

pub use synthesizer::InsightSynthesizer;
pub use templates::{insight_template, InsightTemplate};
