//! Request state machine, pipeline driver and result rendering for the
//! two entry modes (typed text and uploaded document).

pub mod pipeline;
pub mod state;
pub mod view;

pub use pipeline::{DetectionPipeline, Outcome, PipelineRun};
pub use state::{Mode, RequestTracker, Stage};
pub use view::{ResultView, Verdict};

/// Single-page UI served at `/`.
pub const INDEX_HTML: &str = include_str!("index.html");
