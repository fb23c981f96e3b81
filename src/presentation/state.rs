use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Text,
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    AwaitingInput,
    AwaitingFile,
    Extracting,
    Analyzing,
    Done,
    Error,
}

impl Mode {
    /// Stage a request of this mode waits in for user input.
    pub fn awaiting(&self) -> Stage {
        match self {
            Mode::Text => Stage::AwaitingInput,
            Mode::File => Stage::AwaitingFile,
        }
    }

    pub fn allows(&self, from: Stage, to: Stage) -> bool {
        use Stage::*;

        match (self, from, to) {
            (_, Idle, next) => next == self.awaiting(),
            (_, Done | Error, next) => next == self.awaiting(),
            (_, Analyzing, Done | Error) => true,
            (Mode::Text, AwaitingInput, Analyzing | Error) => true,
            (Mode::File, AwaitingFile, Extracting | Error) => true,
            (Mode::File, Extracting, Analyzing | Error) => true,
            _ => false,
        }
    }
}

/// Walks one request through its stages and remembers the path taken.
#[derive(Debug, Clone)]
pub struct RequestTracker {
    mode: Mode,
    request_id: String,
    history: Vec<Stage>,
}

impl RequestTracker {
    pub fn new(mode: Mode, request_id: impl Into<String>) -> Self {
        Self {
            mode,
            request_id: request_id.into(),
            history: vec![Stage::Idle],
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn stage(&self) -> Stage {
        self.history.last().copied().unwrap_or(Stage::Idle)
    }

    pub fn advance(&mut self, next: Stage) -> AppResult<()> {
        let current = self.stage();
        if !self.mode.allows(current, next) {
            return Err(AppError::internal(format!(
                "invalid {:?} mode transition {:?} -> {:?}",
                self.mode, current, next
            )));
        }

        tracing::debug!(
            request_id = %self.request_id,
            from = ?current,
            to = ?next,
            "Request stage changed"
        );
        self.history.push(next);
        Ok(())
    }

    pub fn history(&self) -> &[Stage] {
        &self.history
    }

    pub fn into_history(self) -> Vec<Stage> {
        self.history
    }
}
