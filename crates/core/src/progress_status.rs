//! Lifecycle status of one in-flight analysis.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default message recorded when an analysis starts.
pub const MSG_ANALYSIS_STARTED: &str = "Analysis started";

/// Message recorded when an analysis completes successfully.
pub const MSG_ANALYSIS_COMPLETED: &str = "Analysis complete";

/// Upper bound for the `progress` percentage.
pub const MAX_PROGRESS: u8 = 100;

/// `analyzing -> completed` or `analyzing -> failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    Analyzing,
    Completed,
    Failed,
}

impl ProgressStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProgressStatus::Analyzing => "analyzing",
            ProgressStatus::Completed => "completed",
            ProgressStatus::Failed => "failed",
        }
    }

    /// Whether no further transition is expected from this status.
    pub fn is_terminal(self) -> bool {
        matches!(self, ProgressStatus::Completed | ProgressStatus::Failed)
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Narrow a client-supplied percentage to `0..=MAX_PROGRESS`.
pub fn validate_progress(progress: i64) -> Result<u8, CoreError> {
    match u8::try_from(progress) {
        Ok(value) if value <= MAX_PROGRESS => Ok(value),
        _ => Err(CoreError::Validation(format!(
            "progress must be between 0 and {MAX_PROGRESS}, got {progress}"
        ))),
    }
}
