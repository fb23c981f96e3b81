use serde::{Deserialize, Serialize};

use crate::models::Score;

pub const METRIC_LABEL: &str = "AI-Generated Percentage";
pub const SCORE_HEADING: &str = "AI Detection Score";
pub const NOT_AI_MESSAGE: &str = "The content is not AI-generated.";

/// Outcome of a completed analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Scored(Score),
    /// The model's answer held no number.
    NotAiGenerated,
}

impl From<Option<Score>> for Verdict {
    fn from(score: Option<Score>) -> Self {
        score.map(Verdict::Scored).unwrap_or(Verdict::NotAiGenerated)
    }
}

/// What the result area shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultView {
    Metric {
        heading: String,
        label: String,
        value: String,
        percentage: u64,
        progress: f64,
    },
    Message {
        text: String,
    },
}

impl ResultView {
    pub fn render(verdict: &Verdict) -> Self {
        match verdict {
            Verdict::Scored(score) => ResultView::Metric {
                heading: SCORE_HEADING.to_string(),
                label: METRIC_LABEL.to_string(),
                value: score.to_string(),
                percentage: score.value(),
                progress: score.progress_fraction(),
            },
            Verdict::NotAiGenerated => ResultView::Message {
                text: NOT_AI_MESSAGE.to_string(),
            },
        }
    }

    pub fn is_metric(&self) -> bool {
        matches!(self, ResultView::Metric { .. })
    }
}
