//! Analysis handlers
//!
//! Each handler takes a JSON batch of transactions, tags it, and returns the
//! requested stage of the pipeline.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::AppState;
use impulse_core::{
    common_owner, AnalysisResult, FullAnalysisResponse, Summary, Transaction,
};

/// Export request: transactions plus an optional owner for the artifacts
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub user_id: Option<i64>,
    pub transactions: Vec<Transaction>,
}

/// Export response: full analysis plus its reporting summary
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportResponse {
    pub summary: Summary,
    pub analysis: FullAnalysisResponse,
}

/// POST /api/analyze - Patterns and triggers
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(mut transactions): Json<Vec<Transaction>>,
) -> Json<AnalysisResult> {
    debug!(transactions = transactions.len(), "Analyze request");
    Json(state.analyzer.analyze(&mut transactions))
}

/// POST /api/analyze_full - Patterns, triggers, insights, and challenges
pub async fn analyze_full(
    State(state): State<Arc<AppState>>,
    Json(mut transactions): Json<Vec<Transaction>>,
) -> Json<FullAnalysisResponse> {
    debug!(transactions = transactions.len(), "Full analysis request");
    Json(state.analyzer.analyze_full(&mut transactions))
}

/// POST /api/summary - Reporting counts for a batch
pub async fn summary(
    State(state): State<Arc<AppState>>,
    Json(mut transactions): Json<Vec<Transaction>>,
) -> Json<Summary> {
    let full = state.analyzer.analyze_full(&mut transactions);
    Json(state.analyzer.summarize(&transactions, &full))
}

/// POST /api/analyze_export - Full analysis and summary in one response
///
/// An explicit `user_id` is stamped on every artifact; otherwise the shared
/// owner of the transactions, if any, is used.
pub async fn analyze_export(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExportRequest>,
) -> Json<ExportResponse> {
    let ExportRequest {
        user_id,
        mut transactions,
    } = request;

    let owner = user_id.or_else(|| common_owner(&transactions));
    let analysis = state.analyzer.analyze_full_for(&mut transactions, owner);
    let summary = state.analyzer.summarize(&transactions, &analysis);

    debug!(
        transactions = transactions.len(),
        owner = ?owner,
        "Export analysis complete"
    );
    Json(ExportResponse { summary, analysis })
}
