//! Impulse Web Server
//!
//! Axum-based REST API exposing the behavioral analysis pipeline.
//!
//! Every request is an independent batch: transactions come in with the
//! request and artifacts go out with the response. Nothing is stored.
//!
//! Security features:
//! - Restrictive CORS policy
//! - Request body size limits
//! - Security response headers
//! - Sanitized error responses

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::info;

use impulse_core::{AnalysisConfig, BehaviorAnalyzer, ConfigSource};

mod handlers;

/// Maximum request body and upload size (10 MB)
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Environment variable naming an analysis config file
pub const CONFIG_ENV: &str = "IMPULSE_CONFIG";

/// Environment variable with comma-separated allowed CORS origins
pub const ORIGINS_ENV: &str = "IMPULSE_ALLOWED_ORIGINS";

/// Server configuration
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Thresholds for every analysis the server runs
    pub analysis: AnalysisConfig,
}

impl ServerConfig {
    /// Build configuration from the environment
    ///
    /// An `explicit` config path wins over `IMPULSE_CONFIG`; allowed origins
    /// come from `IMPULSE_ALLOWED_ORIGINS`.
    pub fn from_env(explicit: Option<&Path>) -> anyhow::Result<(Self, ConfigSource)> {
        let config_path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        let (analysis, source) = AnalysisConfig::load(config_path.as_deref())
            .context("Failed to load analysis config")?;
        info!(source = %source, "Analysis config loaded");

        let config = Self {
            allowed_origins: origins_from_env(),
            analysis,
        };
        Ok((config, source))
    }
}

/// Split a comma-separated origin list, dropping blanks
pub fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Allowed origins from `IMPULSE_ALLOWED_ORIGINS`
pub fn origins_from_env() -> Vec<String> {
    parse_origins(&std::env::var(ORIGINS_ENV).unwrap_or_default())
}

/// Shared application state
pub struct AppState {
    pub analyzer: BehaviorAnalyzer,
}

/// Create the application router
pub fn create_router(config: ServerConfig) -> Router {
    let state = Arc::new(AppState {
        analyzer: BehaviorAnalyzer::new(config.analysis),
    });

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        // CSV ingestion
        .route("/ingest", post(handlers::ingest))
        // Analysis
        .route("/analyze", post(handlers::analyze))
        .route("/analyze_full", post(handlers::analyze_full))
        .route("/summary", post(handlers::summary))
        .route("/analyze_export", post(handlers::analyze_export));

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        // Allow specified origins
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        // Body size is enforced by the tower layer instead of axum's 2 MB default
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_UPLOAD_SIZE))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
        ))
}

/// Start the server with custom configuration
pub async fn serve_with_config(host: &str, port: u16, config: ServerConfig) -> anyhow::Result<()> {
    let app = create_router(config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Client-facing error with an HTTP status
///
/// The analysis routes are total; only request decoding can fail.
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}
