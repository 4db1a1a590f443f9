//! Diff engine adapter.
//!
//! Turns a pair of capture outcomes into a [`DiffResult`]: decodes both
//! screenshots, normalizes them onto a shared canvas, runs the pixel
//! comparison with the run's threshold, and conditionally persists the
//! annotated diff image. When either side of the pair has no successful
//! capture the comparison is skipped with an explicit reason — never
//! reported as a silent zero diff.

use std::io;
use tracing::debug;

use crate::canvas::{CanvasError, RawImage};
use crate::capture::CaptureOutcome;
use crate::context::RunContext;
use crate::pixelmatch;
use crate::report::DiffResult;
use crate::workspace;

/// Result type for diff operations
pub type DiffOutcome<T> = Result<T, DiffError>;

/// Error types for the diff adapter
#[derive(Debug)]
pub enum DiffError {
    /// Screenshot bytes could not be decoded, or the diff image could not
    /// be encoded
    Canvas(CanvasError),

    /// Diff artifact could not be written
    Io(io::Error),
}

impl std::fmt::Display for DiffError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiffError::Canvas(err) => write!(f, "Canvas error: {}", err),
            DiffError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for DiffError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiffError::Canvas(err) => Some(err),
            DiffError::Io(err) => Some(err),
        }
    }
}

impl From<CanvasError> for DiffError {
    fn from(err: CanvasError) -> Self {
        DiffError::Canvas(err)
    }
}

impl From<io::Error> for DiffError {
    fn from(err: io::Error) -> Self {
        DiffError::Io(err)
    }
}

/// Diff one comparison engine's capture against the baseline's.
///
/// The percentage is always computed over the normalized canvas area, so
/// results stay comparable across engines that render at different native
/// sizes.
pub fn diff_pair(
    baseline: &CaptureOutcome,
    compared: &CaptureOutcome,
    ctx: &RunContext,
) -> DiffOutcome<DiffResult> {
    let engine = compared.engine();

    let (baseline_bytes, compared_bytes) = match (baseline.image_data(), compared.image_data()) {
        (Some(a), Some(b)) => (a, b),
        (None, None) => {
            return Ok(DiffResult::skipped(
                engine,
                format!(
                    "source captures unavailable: {} and {}",
                    baseline.engine(),
                    engine
                ),
            ));
        }
        (None, Some(_)) => {
            return Ok(DiffResult::skipped(
                engine,
                format!("source capture unavailable: {}", baseline.engine()),
            ));
        }
        (Some(_), None) => {
            return Ok(DiffResult::skipped(
                engine,
                format!("source capture unavailable: {}", engine),
            ));
        }
    };

    let baseline_image = RawImage::from_png_bytes(baseline_bytes)?;
    let compared_image = RawImage::from_png_bytes(compared_bytes)?;
    let (baseline_canvas, compared_canvas) =
        RawImage::normalize_pair(baseline_image, compared_image);

    let comparison = pixelmatch::compare(&baseline_canvas, &compared_canvas, ctx.options.threshold);

    let canvas_area = u64::from(baseline_canvas.width()) * u64::from(baseline_canvas.height());
    let percentage = if canvas_area == 0 {
        0.0
    } else {
        comparison.diff_count as f64 / canvas_area as f64 * 100.0
    };

    let diff_artifact = if ctx.options.persist_artifacts {
        let bytes = comparison.diff_image.to_png()?;
        let file_name = format!("diff-{}-{}.png", baseline.engine(), engine);
        Some(workspace::write_artifact(ctx, &file_name, &bytes)?)
    } else {
        None
    };

    debug!(
        engine = %engine,
        pixels = comparison.diff_count,
        percentage,
        "comparison complete"
    );
    Ok(DiffResult::completed(
        engine,
        comparison.diff_count,
        percentage,
        diff_artifact,
    ))
}
