use serde::{Deserialize, Serialize};

use crate::presentation::{Mode, ResultView, Stage};

#[derive(Debug, Serialize, Deserialize)]
pub struct DetectionResponse {
    pub success: bool,
    pub data: DetectionData,
    pub processing_time_ms: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DetectionData {
    pub request_id: String,
    pub mode: Mode,
    pub message: String,
    pub stages: Vec<Stage>,
    pub result: ResultView,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
    pub timestamp: Option<String>,
}

impl DetectionResponse {
    pub fn new(
        request_id: String,
        mode: Mode,
        stages: Vec<Stage>,
        result: ResultView,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            success: true,
            data: DetectionData {
                request_id,
                mode,
                message: "Analysis complete".to_string(),
                stages,
                result,
            },
            processing_time_ms,
        }
    }
}
