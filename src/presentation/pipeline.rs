use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{InputContent, UploadedFile};
use crate::presentation::state::{Mode, RequestTracker, Stage};
use crate::presentation::view::Verdict;
use crate::services::{parse_score, DetectionClient, DocumentExtractor, Extraction};

pub const EMPTY_TEXT_MESSAGE: &str = "Please enter some text.";
pub const MISSING_FILE_MESSAGE: &str = "Please upload a file.";
pub const EMPTY_FILE_MESSAGE: &str = "The uploaded file is empty.";

/// Typed result of one submission.
#[derive(Debug)]
pub enum Outcome {
    Done(Verdict),
    Error(AppError),
}

#[derive(Debug)]
pub struct PipelineRun {
    pub outcome: Outcome,
    pub tracker: RequestTracker,
}

impl PipelineRun {
    pub fn into_result(self) -> (AppResult<Verdict>, RequestTracker) {
        let result = match self.outcome {
            Outcome::Done(verdict) => Ok(verdict),
            Outcome::Error(e) => Err(e),
        };
        (result, self.tracker)
    }
}

/// Runs extract → detect → parse for one submission.
pub struct DetectionPipeline {
    extractor: Arc<DocumentExtractor>,
    detector: Arc<dyn DetectionClient>,
    max_file_size_bytes: usize,
}

impl DetectionPipeline {
    pub fn new(
        extractor: Arc<DocumentExtractor>,
        detector: Arc<dyn DetectionClient>,
        max_file_size_bytes: usize,
    ) -> Self {
        Self {
            extractor,
            detector,
            max_file_size_bytes,
        }
    }

    pub fn extractor(&self) -> &DocumentExtractor {
        &self.extractor
    }

    pub fn detector(&self) -> &dyn DetectionClient {
        self.detector.as_ref()
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_bytes
    }

    pub async fn run_text(&self, request_id: &str, text: &str) -> PipelineRun {
        let mut tracker = RequestTracker::new(Mode::Text, request_id);
        let result = self.text_steps(&mut tracker, text).await;
        finish(tracker, result)
    }

    pub async fn run_file(&self, request_id: &str, file: Option<UploadedFile>) -> PipelineRun {
        let mut tracker = RequestTracker::new(Mode::File, request_id);
        let result = self.file_steps(&mut tracker, file).await;
        finish(tracker, result)
    }

    async fn text_steps(&self, tracker: &mut RequestTracker, text: &str) -> AppResult<Verdict> {
        tracker.advance(Stage::AwaitingInput)?;

        if text.trim().is_empty() {
            return Err(AppError::validation(EMPTY_TEXT_MESSAGE));
        }

        tracker.advance(Stage::Analyzing)?;
        self.analyze(tracker, InputContent::PlainText(text.to_string())).await
    }

    async fn file_steps(&self, tracker: &mut RequestTracker, file: Option<UploadedFile>) -> AppResult<Verdict> {
        tracker.advance(Stage::AwaitingFile)?;

        let file = file.ok_or_else(|| AppError::validation(MISSING_FILE_MESSAGE))?;
        if file.size == 0 {
            return Err(AppError::validation(EMPTY_FILE_MESSAGE));
        }
        if file.size > self.max_file_size_bytes {
            warn!(
                request_id = %tracker.request_id(),
                file_size = file.size,
                max_size = self.max_file_size_bytes,
                "File size exceeds limit"
            );
            return Err(AppError::FileTooLarge {
                size: Some(file.size),
                limit: self.max_file_size_bytes,
            });
        }

        tracker.advance(Stage::Extracting)?;
        let content = match self.extractor.extract(file).await? {
            Extraction::Content(content) => content,
            Extraction::Unsupported { declared_type } => {
                return Err(AppError::unsupported(declared_type));
            }
        };

        tracker.advance(Stage::Analyzing)?;
        self.analyze(tracker, content).await
    }

    async fn analyze(&self, tracker: &mut RequestTracker, content: InputContent) -> AppResult<Verdict> {
        let response = self.detector.detect(&content).await?;
        let verdict = Verdict::from(parse_score(&response));

        info!(
            request_id = %tracker.request_id(),
            verdict = ?verdict,
            "Detection verdict ready"
        );

        tracker.advance(Stage::Done)?;
        Ok(verdict)
    }
}

fn finish(mut tracker: RequestTracker, result: AppResult<Verdict>) -> PipelineRun {
    let outcome = match result {
        Ok(verdict) => Outcome::Done(verdict),
        Err(e) => {
            if let Err(transition) = tracker.advance(Stage::Error) {
                warn!(error = %transition, "Could not record error stage");
            }
            Outcome::Error(e)
        }
    };
    PipelineRun { outcome, tracker }
}
