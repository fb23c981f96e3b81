use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::{info, warn, debug};

use crate::error::AppError;
use crate::handlers::AppState;

/// Caps the number of detections in flight. Requests over the cap are
/// rejected, not queued.
#[derive(Debug)]
pub struct RequestLimiter {
    semaphore: Semaphore,
    total_requests: AtomicU64,
    rejected_requests: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateLimitMetrics {
    pub total_requests: u64,
    pub rejected_requests: u64,
    pub available_permits: usize,
}

impl RateLimitMetrics {
    pub fn rejection_rate(&self) -> f64 {
        if self.total_requests > 0 {
            (self.rejected_requests as f64 / self.total_requests as f64 * 100.0).round() / 100.0
        } else {
            0.0
        }
    }
}

impl RequestLimiter {
    pub fn new(max_concurrent_requests: usize) -> Self {
        info!(
            max_concurrent_requests = max_concurrent_requests,
            "Initializing request semaphore"
        );
        Self {
            semaphore: Semaphore::new(max_concurrent_requests),
            total_requests: AtomicU64::new(0),
            rejected_requests: AtomicU64::new(0),
        }
    }

    pub fn try_acquire(&self) -> Result<SemaphorePermit<'_>, AppError> {
        let total_requests = self.total_requests.fetch_add(1, Ordering::Relaxed) + 1;

        self.semaphore.try_acquire().map_err(|_| {
            let rejected = self.rejected_requests.fetch_add(1, Ordering::Relaxed) + 1;
            warn!(
                total_requests = total_requests,
                rejected_requests = rejected,
                "Rate limit exceeded - too many concurrent requests"
            );
            AppError::RateLimitExceeded
        })
    }

    pub fn metrics(&self) -> RateLimitMetrics {
        RateLimitMetrics {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            rejected_requests: self.rejected_requests.load(Ordering::Relaxed),
            available_permits: self.semaphore.available_permits(),
        }
    }
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    // Only detection endpoints are limited
    if !path.starts_with("/api/") {
        return Ok(next.run(request).await);
    }

    let _permit = state.limiter.try_acquire()?;

    debug!(
        path = path,
        available_permits = state.limiter.semaphore.available_permits(),
        "Request permit acquired"
    );

    let response = next.run(request).await;

    debug!(path = path, "Request completed, permit released");

    Ok(response)
}
