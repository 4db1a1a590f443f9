//! Cross-browser visual regression diffing.
//!
//! This crate provides:
//! - Concurrent page capture in three browser engines (Chromium as the
//!   baseline, WebKit and Firefox as comparison targets) with per-engine
//!   failure isolation
//! - Canvas normalization by padding when engines render at different sizes
//! - Threshold-driven pixel comparison with annotated diff images
//! - A run-scoped artifact workspace with conditional persistence and
//!   idempotent cleanup
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use browser_diff::capture::PlaywrightDriver;
//! use browser_diff::context::{RunContext, RunOptions};
//! use browser_diff::pipeline::run_diff;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = RunContext::new(RunOptions::default());
//! let driver = Arc::new(PlaywrightDriver::new());
//! let report = run_diff(driver, "https://example.com", &ctx).await?;
//! for result in &report.results {
//!     println!("{}: {:?}", result.engine, result.comparison);
//! }
//! # Ok(())
//! # }
//! ```

pub mod canvas;
pub mod capture;
pub mod context;
pub mod diff;
pub mod pipeline;
pub mod pixelmatch;
pub mod report;
pub mod workspace;

// Re-export image and canvas types
pub use canvas::{CanvasError, RawImage};

// Re-export capture types and drivers
pub use capture::{
    CaptureError, CaptureOutcome, CaptureRequest, Cookie, Engine, EngineDriver, MockDriver,
    PlaywrightDriver, capture_all, parse_cookie_spec,
};

// Re-export run configuration
pub use context::{RunContext, RunOptions, looks_like_url};

// Re-export the diff adapter and result model
pub use diff::{DiffError, diff_pair};
pub use report::{ComparisonOutcome, DiffReport, DiffResult};

// Re-export the pipeline entry point
pub use pipeline::{PipelineError, run_diff};
