//! End-to-end pipeline: capture → normalize → diff → report.
//!
//! Data flows strictly forward. Capture failures degrade the report (the
//! affected comparisons are skipped); only decode and artifact I/O failures
//! fail the run itself.

use std::sync::Arc;
use tracing::debug;

use crate::capture::{Engine, EngineDriver, capture_all};
use crate::context::RunContext;
use crate::diff::{DiffError, diff_pair};
use crate::report::DiffReport;
use crate::workspace;

/// Result type for pipeline runs
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Error types for an unrecovered pipeline failure
#[derive(Debug)]
pub enum PipelineError {
    /// A comparison failed for a reason other than a missing capture
    Diff(DiffError),

    /// Workspace cleanup failed
    Io(std::io::Error),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Diff(err) => write!(f, "Diff error: {}", err),
            PipelineError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Diff(err) => Some(err),
            PipelineError::Io(err) => Some(err),
        }
    }
}

impl From<DiffError> for PipelineError {
    fn from(err: DiffError) -> Self {
        PipelineError::Diff(err)
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Io(err)
    }
}

/// Run the full diff pipeline for one URL.
///
/// Captures the page in every engine concurrently, diffs each comparison
/// engine against the baseline, and assembles the report. When persistence
/// is disabled the run's workspace (and the base folder, if it ends up
/// empty) is removed before returning.
pub async fn run_diff<D>(driver: Arc<D>, url: &str, ctx: &RunContext) -> PipelineResult<DiffReport>
where
    D: EngineDriver + 'static,
{
    debug!(run_id = %ctx.run_id, url, "starting diff run");
    let outcomes = capture_all(driver, url, ctx).await;

    let mut results = Vec::with_capacity(Engine::comparisons().len());
    if let Some((baseline_outcome, comparison_outcomes)) = outcomes.split_first() {
        for compared in comparison_outcomes {
            results.push(diff_pair(baseline_outcome, compared, ctx)?);
        }
    }

    if !ctx.options.persist_artifacts {
        debug!(run_id = %ctx.run_id, "persistence disabled, removing workspace");
        workspace::cleanup(ctx)?;
    }

    Ok(DiffReport {
        run_id: ctx.run_id.clone(),
        url: url.to_string(),
        baseline: Engine::BASELINE,
        results,
    })
}
