use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use std::time::SystemTime;
use tracing::info;

use crate::error::AppResult;
use crate::handlers::AppState;

/// Health check endpoint
pub async fn health_handler(State(state): State<AppState>) -> AppResult<Json<Value>> {
    info!("Health check requested");

    let timestamp = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    // PDF rendering is optional: text and DOCX detection still work without it
    let pdf_renderer = state.pipeline.extractor().is_available();
    let model = state.pipeline.detector().model_name().to_string();
    let rate_limit = state.limiter.metrics();

    let status = if pdf_renderer { "healthy" } else { "degraded" };

    let response = json!({
        "status": status,
        "timestamp": timestamp,
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "pdf_renderer": pdf_renderer,
            "docx_reader": true,
            "detection_model": model
        },
        "rate_limiting": {
            "total_requests": rate_limit.total_requests,
            "rejected_requests": rate_limit.rejected_requests,
            "available_permits": rate_limit.available_permits,
            "rejection_rate": rate_limit.rejection_rate()
        },
        "uptime_seconds": state.started_at.elapsed().as_secs()
    });

    info!(
        status = status,
        pdf_available = pdf_renderer,
        "Health check completed"
    );

    Ok(Json(response))
}

/// Readiness check endpoint
pub async fn ready_handler(State(state): State<AppState>) -> Result<StatusCode, StatusCode> {
    if state.limiter.metrics().available_permits > 0 {
        info!("Readiness check passed");
        Ok(StatusCode::OK)
    } else {
        info!("Readiness check failed - no request capacity left");
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}
