//! Run configuration and per-invocation context.
//!
//! Every pipeline component receives its configuration through a
//! [`RunContext`] created once per invocation:
//! - `RunOptions`: fully typed options, validated once at the boundary
//! - A time-derived run id that never changes for the life of the run
//! - The run-scoped workspace path, `<base_folder>/<run_id>`

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default pixel sensitivity threshold
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Default base folder for run workspaces
pub const DEFAULT_BASE_FOLDER: &str = "./browser-diff";

/// Options for a diff run, immutable after construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOptions {
    /// Pixel sensitivity in `[0, 1]`; lower flags smaller color deltas
    pub threshold: f64,

    /// Base folder under which per-run workspaces are created
    pub base_folder: PathBuf,

    /// Whether per-engine screenshots and diff images are kept on disk
    pub persist_artifacts: bool,

    /// CSS selector to capture instead of the viewport (None = whole page)
    pub element_selector: Option<String>,

    /// Capture the full scrollable page rather than the viewport
    pub full_page: bool,

    /// Cookie specification, `key=value;key2=value2` (may be empty)
    pub cookie_spec: String,

    /// Enable debug-level logging
    pub verbose: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            base_folder: PathBuf::from(DEFAULT_BASE_FOLDER),
            persist_artifacts: false,
            element_selector: None,
            full_page: false,
            cookie_spec: String::new(),
            verbose: false,
        }
    }
}

impl RunOptions {
    /// Check every field constraint once, before the pipeline starts
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !(0.0..=1.0).contains(&self.threshold) || self.threshold.is_nan() {
            return Err(OptionsError::ThresholdOutOfRange(self.threshold));
        }
        Ok(())
    }
}

/// Errors raised by option validation at the invocation boundary
#[derive(Debug)]
pub enum OptionsError {
    /// Threshold outside `[0, 1]`
    ThresholdOutOfRange(f64),
}

impl std::fmt::Display for OptionsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionsError::ThresholdOutOfRange(t) => {
                write!(f, "threshold must be between 0 and 1, got {}", t)
            }
        }
    }
}

impl std::error::Error for OptionsError {}

/// Immutable context for one pipeline invocation
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Unique, time-derived run identifier
    pub run_id: String,

    /// Workspace directory for this run: `<base_folder>/<run_id>`
    pub workspace: PathBuf,

    /// Options the run was started with
    pub options: RunOptions,
}

impl RunContext {
    /// Create a context for a new run; the id and workspace path are fixed
    /// for the run's lifetime
    pub fn new(options: RunOptions) -> Self {
        let run_id = generate_run_id();
        let workspace = options.base_folder.join(&run_id);
        Self {
            run_id,
            workspace,
            options,
        }
    }
}

/// Generate a run id in YYYYMMDDHHMMSS format
fn generate_run_id() -> String {
    Local::now().format("%Y%m%d%H%M%S").to_string()
}

/// Cheap structural check that a string is plausibly a URL.
///
/// Accepts localhost, dotted hostnames, optional scheme, port, path, query
/// and fragment. Rejects empty hosts (e.g. a bare scheme).
pub fn looks_like_url(candidate: &str) -> bool {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return false;
    }
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or("");
    let host = authority.split(':').next().unwrap_or("");
    if host.is_empty() {
        return false;
    }
    host == "localhost" || (host.contains('.') && !host.starts_with('.') && !host.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_is_timestamp_shaped() {
        let id = generate_run_id();
        assert_eq!(id.len(), 14);
        assert!(id.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_workspace_is_under_base_folder() {
        let options = RunOptions {
            base_folder: PathBuf::from("/tmp/diff-runs"),
            ..RunOptions::default()
        };
        let ctx = RunContext::new(options);
        assert_eq!(ctx.workspace, PathBuf::from("/tmp/diff-runs").join(&ctx.run_id));
    }

    #[test]
    fn test_validate_threshold_range() {
        let mut options = RunOptions::default();
        assert!(options.validate().is_ok());

        options.threshold = 0.0;
        assert!(options.validate().is_ok());
        options.threshold = 1.0;
        assert!(options.validate().is_ok());

        options.threshold = -0.1;
        assert!(options.validate().is_err());
        options.threshold = 1.5;
        assert!(options.validate().is_err());
        options.threshold = f64::NAN;
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_looks_like_url_accepts_common_shapes() {
        assert!(looks_like_url("http://localhost:3000"));
        assert!(looks_like_url("https://example.dev"));
        assert!(looks_like_url("https://example.dev/about"));
        assert!(looks_like_url("https://example.dev/about?foo=bar"));
        assert!(looks_like_url("https://example.dev/about#foo"));
        assert!(looks_like_url("https://example.dev:3000/about"));
        assert!(looks_like_url("example.dev"));
    }

    #[test]
    fn test_looks_like_url_rejects_hostless_input() {
        assert!(!looks_like_url("https://"));
        assert!(!looks_like_url(""));
        assert!(!looks_like_url("   "));
        assert!(!looks_like_url("not a url"));
    }
}
