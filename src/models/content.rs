use std::fmt;

/// Content submitted to the detection model for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputContent {
    /// Text typed directly by the user.
    PlainText(String),
    /// A rendered document page, base64-encoded.
    ImagePayload { mime_type: String, data: String },
    /// Text pulled out of an uploaded document.
    ExtractedText(String),
}

impl InputContent {
    pub fn kind(&self) -> &'static str {
        match self {
            InputContent::PlainText(_) => "plain_text",
            InputContent::ImagePayload { .. } => "image",
            InputContent::ExtractedText(_) => "extracted_text",
        }
    }

    /// Size of the payload in bytes, for logging.
    pub fn len(&self) -> usize {
        match self {
            InputContent::PlainText(text) | InputContent::ExtractedText(text) => text.len(),
            InputContent::ImagePayload { data, .. } => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Percentage parsed out of the model's answer. Not clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score(pub u64);

impl Score {
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Fill fraction for a progress bar, held to `0.0..=1.0`.
    pub fn progress_fraction(&self) -> f64 {
        (self.0.min(100) as f64) / 100.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
