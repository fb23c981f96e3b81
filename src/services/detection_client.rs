use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::InputContent;

/// Instruction sent alongside every piece of content.
pub const DETECTION_PROMPT: &str =
    "Detect how much percentage of the given text is AI-generated. Provide a numeric value.";

const MAX_ATTEMPTS: u32 = 2;
const RETRY_BACKOFF: Duration = Duration::from_millis(500);
const ERROR_BODY_LIMIT: usize = 300;

/// Anything that can ask a model how much of some content is AI-generated.
#[async_trait]
pub trait DetectionClient: Send + Sync {
    /// Returns the model's answer verbatim.
    async fn detect(&self, content: &InputContent) -> AppResult<String>;

    fn model_name(&self) -> &str;
}

// Wire types for the generateContent endpoint.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

/// Variant order matters for untagged decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl From<&InputContent> for Part {
    fn from(content: &InputContent) -> Self {
        match content {
            InputContent::PlainText(text) | InputContent::ExtractedText(text) => Part::Text {
                text: text.clone(),
            },
            InputContent::ImagePayload { mime_type, data } => Part::InlineData {
                inline_data: InlineData {
                    mime_type: mime_type.clone(),
                    data: data.clone(),
                },
            },
        }
    }
}

/// Content first, instruction second.
pub fn build_request(content: &InputContent) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![
                Part::from(content),
                Part::Text {
                    text: DETECTION_PROMPT.to_string(),
                },
            ],
        }],
    }
}

impl GenerateContentResponse {
    /// Text of the first candidate. Empty when the model returned none.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

enum AttemptError {
    Transient(String),
    Fatal(AppError),
}

impl GeminiClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {}", e)))?;

        let endpoint = format!("{}/models/{}:generateContent", config.api_base, config.model);
        info!(model = %config.model, endpoint = %endpoint, "Detection client ready");

        Ok(Self {
            http,
            api_key: config.google_api_key.clone(),
            model: config.model.clone(),
            endpoint,
        })
    }

    async fn attempt(&self, body: &GenerateContentRequest) -> Result<String, AttemptError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    AttemptError::Transient(format!("HTTP request failed: {}", e))
                } else {
                    AttemptError::Fatal(AppError::service(format!("HTTP request failed: {}", e)))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(ERROR_BODY_LIMIT).collect();
            let message = format!("API error {}: {}", status, excerpt);
            return Err(if is_transient_status(status) {
                AttemptError::Transient(message)
            } else {
                AttemptError::Fatal(AppError::service(message))
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AttemptError::Fatal(AppError::service(format!("Failed to parse response: {}", e))))?;

        let text = parsed.text();
        if text.is_empty() {
            warn!(model = %self.model, "Model returned no text");
        }
        Ok(text)
    }
}

fn is_transient_status(status: StatusCode) -> bool {
    status.is_server_error()
}

#[async_trait]
impl DetectionClient for GeminiClient {
    async fn detect(&self, content: &InputContent) -> AppResult<String> {
        let body = build_request(content);
        let start = Instant::now();

        debug!(
            model = %self.model,
            content_kind = content.kind(),
            content_bytes = content.len(),
            "Sending detection request"
        );

        let mut attempt = 1;
        loop {
            match self.attempt(&body).await {
                Ok(text) => {
                    info!(
                        model = %self.model,
                        attempt,
                        response_chars = text.chars().count(),
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Detection response received"
                    );
                    return Ok(text);
                }
                Err(AttemptError::Transient(message)) if attempt < MAX_ATTEMPTS => {
                    warn!(model = %self.model, attempt, error = %message, "Transient detection failure, retrying");
                    tokio::time::sleep(RETRY_BACKOFF).await;
                    attempt += 1;
                }
                Err(AttemptError::Transient(message)) => {
                    error!(model = %self.model, attempt, error = %message, "Detection service unavailable");
                    return Err(AppError::service(message));
                }
                Err(AttemptError::Fatal(e)) => {
                    error!(model = %self.model, attempt, error = %e, "Detection request failed");
                    return Err(e);
                }
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
