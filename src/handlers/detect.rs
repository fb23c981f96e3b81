use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Multipart, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::Json,
};
use std::time::Instant;
use tracing::{info, debug, error, warn};

use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use crate::middleware::request_id;
use crate::models::{DetectionResponse, TextDetectionRequest, UploadedFile};
use crate::presentation::{PipelineRun, ResultView};

pub async fn detect_text_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<TextDetectionRequest>, JsonRejection>,
) -> AppResult<Json<DetectionResponse>> {
    let start = Instant::now();
    let request_id = request_id(&headers);

    let Json(payload) = payload.map_err(|rejection| {
        warn!(
            request_id = %request_id,
            status = %rejection.status(),
            error = %rejection.body_text(),
            "Rejected text detection body"
        );
        AppError::validation(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    info!(
        request_id = %request_id,
        text_length = payload.text.len(),
        "Starting text detection request"
    );

    let run = state.pipeline.run_text(&request_id, &payload.text).await;
    respond(run, start)
}

pub async fn detect_file_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<DetectionResponse>> {
    let start = Instant::now();
    let request_id = request_id(&headers);

    let mut multipart = multipart.map_err(|rejection| {
        warn!(request_id = %request_id, error = %rejection.body_text(), "Rejected multipart body");
        AppError::InvalidUpload {
            message: rejection.body_text(),
        }
    })?;

    info!(request_id = %request_id, "Starting file detection request");

    let limits = UploadLimits {
        max_file_bytes: state.pipeline.max_file_size_bytes(),
        declared_bytes: headers
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok()),
    };

    let file = match extract_file_from_multipart(&mut multipart, &limits).await {
        Ok(file) => {
            if let Some(file) = &file {
                info!(
                    request_id = %request_id,
                    file_name = %file.name,
                    file_size = file.size,
                    "File extracted from multipart form"
                );
            }
            file
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "Failed to extract file from multipart");
            return Err(e);
        }
    };

    let run = state.pipeline.run_file(&request_id, file).await;
    respond(run, start)
}

fn respond(run: PipelineRun, start: Instant) -> AppResult<Json<DetectionResponse>> {
    let (result, tracker) = run.into_result();

    let verdict = match result {
        Ok(verdict) => verdict,
        Err(e) => {
            error!(
                request_id = %tracker.request_id(),
                mode = ?tracker.mode(),
                stages = ?tracker.history(),
                error_code = e.error_code(),
                error = %e,
                "Detection request failed"
            );
            return Err(e);
        }
    };

    let total_time = start.elapsed().as_millis() as u64;
    let request_id = tracker.request_id().to_string();
    let mode = tracker.mode();

    info!(
        request_id = %request_id,
        total_time_ms = total_time,
        "Request completed successfully"
    );

    Ok(Json(DetectionResponse::new(
        request_id,
        mode,
        tracker.into_history(),
        ResultView::render(&verdict),
        total_time,
    )))
}

struct UploadLimits {
    max_file_bytes: usize,
    declared_bytes: Option<usize>,
}

impl UploadLimits {
    /// Body-limit failures become `FileTooLarge`; anything else is a broken upload.
    fn upload_error(&self, e: MultipartError, context: &str) -> AppError {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::FileTooLarge {
                size: self.declared_bytes,
                limit: self.max_file_bytes,
            }
        } else {
            AppError::InvalidUpload {
                message: format!("{}: {}", context, e),
            }
        }
    }
}

/// Reads the `file` field. `Ok(None)` when the form carries no file.
async fn extract_file_from_multipart(
    multipart: &mut Multipart,
    limits: &UploadLimits,
) -> AppResult<Option<UploadedFile>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| limits.upload_error(e, "Failed to read multipart field"))?
    {
        let field_name = field.name().unwrap_or("");

        if field_name == "file" {
            let file_name = field.file_name().unwrap_or("").to_string();

            // Browsers send an empty part when nothing was picked
            if file_name.is_empty() {
                debug!("Multipart file field has no file name, treating as no upload");
                continue;
            }

            let content_type = field.content_type().map(|ct| ct.to_string());

            let data = field
                .bytes()
                .await
                .map_err(|e| limits.upload_error(e, "Failed to read file data"))?;

            let mut file = UploadedFile::new(file_name, data);

            if let Some(mime_type) = content_type {
                file = file.with_mime_type(mime_type);
            }

            debug!(
                "Extracted file: {} ({} bytes, type: {:?})",
                file.name,
                file.size,
                file.mime_type
            );

            return Ok(Some(file));
        }
    }

    Ok(None)
}
