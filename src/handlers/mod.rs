pub mod detect;
pub mod health;

pub use detect::*;
pub use health::*;

use axum::{
    extract::DefaultBodyLimit,
    response::Html,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::error::AppResult;
use crate::middleware::{logging_middleware, rate_limit_middleware, RequestLimiter};
use crate::presentation::{DetectionPipeline, INDEX_HTML};
use crate::services::{DetectionClient, DocumentExtractor, GeminiClient};

// Room for multipart boundaries and headers on top of the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared, request-independent components.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<DetectionPipeline>,
    pub limiter: Arc<RequestLimiter>,
    pub started_at: Instant,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let detector: Arc<dyn DetectionClient> = Arc::new(GeminiClient::new(config)?);
        Ok(Self::with_components(
            Arc::new(DocumentExtractor::new()),
            detector,
            config,
        ))
    }

    pub fn with_components(
        extractor: Arc<DocumentExtractor>,
        detector: Arc<dyn DetectionClient>,
        config: &Config,
    ) -> Self {
        Self {
            pipeline: Arc::new(DetectionPipeline::new(
                extractor,
                detector,
                config.max_file_size_bytes(),
            )),
            limiter: Arc::new(RequestLimiter::new(config.max_concurrent_requests)),
            started_at: Instant::now(),
            max_body_bytes: config.max_file_size_bytes().saturating_add(MULTIPART_OVERHEAD_BYTES),
        }
    }
}

pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/api/v1/detect/text", post(detect_text_handler))
        .route("/api/v1/detect/file", post(detect_file_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(state.max_body_bytes))
                .layer(axum::middleware::from_fn(logging_middleware))
                .layer(axum::middleware::from_fn_with_state(state.clone(), rate_limit_middleware)),
        )
        .with_state(state)
}
