//! Result model for a diff run.
//!
//! The pipeline's sole output: one [`DiffResult`] per comparison engine, in
//! launch order, wrapped in a [`DiffReport`]. Formatting, printing and exit
//! codes belong to consumers.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::capture::Engine;

/// How a single engine comparison ended
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComparisonOutcome {
    /// The comparison ran to completion
    Completed {
        /// Pixels whose delta exceeded the threshold
        pixel_change_count: u64,

        /// `pixel_change_count / (W * H) * 100` over the normalized canvas
        pixel_change_percentage: f64,

        /// Where the diff image was persisted, when persistence is on
        diff_artifact: Option<PathBuf>,
    },

    /// The comparison could not run because a source capture is unavailable
    Skipped {
        /// Which capture(s) were unavailable and why
        reason: String,
    },
}

/// Result of diffing one comparison engine against the baseline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffResult {
    /// Engine compared against the baseline
    pub engine: Engine,

    /// Outcome of the comparison
    pub comparison: ComparisonOutcome,
}

impl DiffResult {
    pub fn completed(
        engine: Engine,
        pixel_change_count: u64,
        pixel_change_percentage: f64,
        diff_artifact: Option<PathBuf>,
    ) -> Self {
        Self {
            engine,
            comparison: ComparisonOutcome::Completed {
                pixel_change_count,
                pixel_change_percentage,
                diff_artifact,
            },
        }
    }

    pub fn skipped(engine: Engine, reason: impl Into<String>) -> Self {
        Self {
            engine,
            comparison: ComparisonOutcome::Skipped {
                reason: reason.into(),
            },
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.comparison, ComparisonOutcome::Skipped { .. })
    }
}

/// Final report for a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffReport {
    /// The run this report belongs to
    pub run_id: String,

    /// URL that was captured
    pub url: String,

    /// Engine all results are measured against
    pub baseline: Engine,

    /// One result per comparison engine, in launch order
    pub results: Vec<DiffResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_result_carries_status_tag() {
        let completed = DiffResult::completed(Engine::Webkit, 42, 0.26, None);
        let json = serde_json::to_value(&completed).unwrap();
        assert_eq!(json["engine"], "webkit");
        assert_eq!(json["comparison"]["status"], "completed");
        assert_eq!(json["comparison"]["pixel_change_count"], 42);

        let skipped = DiffResult::skipped(Engine::Firefox, "source capture unavailable: firefox");
        let json = serde_json::to_value(&skipped).unwrap();
        assert_eq!(json["comparison"]["status"], "skipped");
        assert!(skipped.is_skipped());
    }
}
