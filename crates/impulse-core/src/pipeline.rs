//! Analysis pipeline
//!
//! Composes the stages in order: tag, then detect patterns and score
//! triggers, then synthesize insights and propose challenges. Each call is an
//! independent batch over the slice it is given; the analyzer holds only
//! configuration and can be shared across threads.

use tracing::info;

use crate::challenges::ChallengeProposer;
use crate::config::AnalysisConfig;
use crate::detect::PatternDetector;
use crate::insights::InsightSynthesizer;
use crate::models::{AnalysisResult, FullAnalysisResponse, Summary, Transaction};
use crate::summary::make_summary;
use crate::tags::Tagger;
use crate::triggers::TriggerScorer;

/// Runs the behavioral analysis stages with one configuration
#[derive(Debug, Clone)]
pub struct BehaviorAnalyzer {
    config: AnalysisConfig,
    tagger: Tagger,
    detector: PatternDetector,
    scorer: TriggerScorer,
    synthesizer: InsightSynthesizer,
    proposer: ChallengeProposer,
}

impl Default for BehaviorAnalyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl BehaviorAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            tagger: Tagger::new(&config),
            detector: PatternDetector::new(config.binge.clone()),
            scorer: TriggerScorer::new(config.clone()),
            synthesizer: InsightSynthesizer::new(),
            proposer: ChallengeProposer::new(),
            config,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Tag transactions in place without running detection
    pub fn tag(&self, transactions: &mut [Transaction]) {
        self.tagger.tag_all(transactions);
    }

    /// Stage 1: tag, then detect patterns and score triggers
    pub fn analyze(&self, transactions: &mut [Transaction]) -> AnalysisResult {
        self.tagger.tag_all(transactions);

        let mut result = AnalysisResult {
            patterns: self.detector.detect(transactions),
            triggers: self.scorer.score(transactions),
        };

        if let Some(user_id) = common_owner(transactions) {
            stamp_analysis(&mut result, user_id);
        }
        result
    }

    /// Stage 2: stage 1 plus insights and challenges
    pub fn analyze_full(&self, transactions: &mut [Transaction]) -> FullAnalysisResponse {
        let owner = common_owner(transactions);
        self.analyze_full_for(transactions, owner)
    }

    /// Stage 2 with an explicit owner stamped on every artifact
    pub fn analyze_full_for(
        &self,
        transactions: &mut [Transaction],
        user_id: Option<i64>,
    ) -> FullAnalysisResponse {
        let AnalysisResult { patterns, triggers } = self.analyze(transactions);
        let insights = self.synthesizer.synthesize(&patterns, &triggers);
        let challenges = self.proposer.propose(&insights);

        info!(
            transactions = transactions.len(),
            patterns = patterns.len(),
            triggers = triggers.len(),
            insights = insights.len(),
            challenges = challenges.len(),
            "Behavior analysis complete"
        );

        let mut response = FullAnalysisResponse {
            patterns,
            triggers,
            insights,
            challenges,
        };
        if let Some(user_id) = user_id {
            stamp_full(&mut response, user_id);
        }
        response
    }

    /// Reporting counts for a completed analysis
    pub fn summarize(&self, transactions: &[Transaction], analysis: &FullAnalysisResponse) -> Summary {
        make_summary(
            transactions,
            &analysis.patterns,
            &analysis.triggers,
            &analysis.insights,
        )
    }
}

/// The user id shared by every transaction, if there is exactly one
pub fn common_owner(transactions: &[Transaction]) -> Option<i64> {
    let first = transactions.first()?.user_id?;
    transactions
        .iter()
        .all(|t| t.user_id == Some(first))
        .then_some(first)
}

fn stamp_analysis(result: &mut AnalysisResult, user_id: i64) {
    for pattern in &mut result.patterns {
        pattern.user_id = Some(user_id);
    }
    for trigger in &mut result.triggers {
        trigger.user_id = Some(user_id);
    }
}

fn stamp_full(response: &mut FullAnalysisResponse, user_id: i64) {
    for pattern in &mut response.patterns {
        pattern.user_id = Some(user_id);
    }
    for trigger in &mut response.triggers {
        trigger.user_id = Some(user_id);
    }
    for insight in &mut response.insights {
        insight.user_id = Some(user_id);
    }
    for challenge in &mut response.challenges {
        challenge.user_id = Some(user_id);
    }
}
