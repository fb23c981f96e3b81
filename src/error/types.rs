use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;
use chrono;

use crate::middleware::current_request_id;

const MEGABYTE: usize = 1024 * 1024;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("{message}")]
    ValidationError { message: String },

    #[error("Unsupported file format: {mime_type}. Please upload a PDF or DOCX document")]
    UnsupportedFormat { mime_type: String },

    #[error("Could not decode {format} document: {message}")]
    DecodeError { format: String, message: String },

    #[error("Detection service error: {message}")]
    ServiceError { message: String },

    /// Sizes in bytes. `size` is unknown when the body limit cut the upload short.
    #[error("File too large: {} exceeds the {} limit", upload_size(.size), megabytes(.limit))]
    FileTooLarge { size: Option<usize>, limit: usize },

    #[error("Rate limit exceeded: maximum concurrent requests reached")]
    RateLimitExceeded,

    #[error("Invalid upload: {message}")]
    InvalidUpload { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::ConfigError { .. } => "CONFIG_ERROR",
            AppError::ValidationError { .. } => "VALIDATION_ERROR",
            AppError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            AppError::DecodeError { .. } => "DECODE_ERROR",
            AppError::ServiceError { .. } => "SERVICE_ERROR",
            AppError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            AppError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            AppError::InvalidUpload { .. } => "INVALID_UPLOAD",
            AppError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ConfigError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            AppError::UnsupportedFormat { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::DecodeError { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ServiceError { .. } => StatusCode::BAD_GATEWAY,
            AppError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            AppError::InvalidUpload { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the user can fix the problem and submit again.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AppError::ConfigError { .. } | AppError::Internal { .. })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();
        let request_id = current_request_id().unwrap_or_else(|| Uuid::new_v4().to_string());
        let timestamp = chrono::Utc::now().to_rfc3339();

        // Structured logging with context
        tracing::error!(
            error_code = error_code,
            status_code = %status,
            request_id = %request_id,
            error_message = %message,
            "API error occurred"
        );

        let body = Json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message,
                "request_id": request_id,
                "timestamp": timestamp
            },
            "data": null
        }));

        (status, body).into_response()
    }
}

/// Whole megabytes print as-is; anything else rounds up to one decimal.
fn megabytes(bytes: &usize) -> String {
    if bytes % MEGABYTE == 0 {
        format!("{}MB", bytes / MEGABYTE)
    } else {
        let tenths = (*bytes as u128 * 10).div_ceil(MEGABYTE as u128);
        format!("{}.{}MB", tenths / 10, tenths % 10)
    }
}

fn upload_size(size: &Option<usize>) -> String {
    match size {
        Some(bytes) => megabytes(bytes),
        None => "upload".to_string(),
    }
}

// Convert common errors to AppError
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal {
            message: format!("IO error: {}", err),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal {
            message: format!("Background task failed: {}", err),
        }
    }
}

// Helper methods for creating specific errors
impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::ValidationError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        AppError::ConfigError {
            message: message.into(),
        }
    }

    pub fn unsupported(mime_type: impl Into<String>) -> Self {
        AppError::UnsupportedFormat {
            mime_type: mime_type.into(),
        }
    }

    pub fn decode(format: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::DecodeError {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn service(message: impl Into<String>) -> Self {
        AppError::ServiceError {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Internal {
            message: message.into(),
        }
    }
}
