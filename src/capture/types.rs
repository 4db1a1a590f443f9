// Core types for multi-engine capture

use serde::{Deserialize, Serialize};

use crate::context::RunContext;

/// One of the browser rendering engines under comparison.
///
/// The set is closed: one baseline engine plus two comparison targets.
/// Engine names flow unchanged into artifact filenames and the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Chromium,
    Webkit,
    Firefox,
}

impl Engine {
    /// The engine every other engine is diffed against
    pub const BASELINE: Engine = Engine::Chromium;

    /// All engines in launch order, baseline first
    pub fn all() -> [Engine; 3] {
        [Engine::Chromium, Engine::Webkit, Engine::Firefox]
    }

    /// The non-baseline engines, in launch order
    pub fn comparisons() -> [Engine; 2] {
        [Engine::Webkit, Engine::Firefox]
    }

    /// Stable lowercase name, also the Playwright launcher module name
    pub fn name(&self) -> &'static str {
        match self {
            Engine::Chromium => "chromium",
            Engine::Webkit => "webkit",
            Engine::Firefox => "firefox",
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A cookie to inject into the browsing context before navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

/// Parse a `key=value;key2=value2` cookie specification.
///
/// Tolerant of whitespace around names, values and separators; values may
/// themselves contain `=`. Pairs without a name or without any `=` are
/// dropped. An empty spec yields no cookies.
pub fn parse_cookie_spec(spec: &str) -> Vec<Cookie> {
    spec.split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some(Cookie {
                name: name.to_string(),
                value: value.trim().to_string(),
            })
        })
        .collect()
}

/// Everything a driver needs for one capture
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    /// Target URL
    pub url: String,

    /// CSS selector to capture instead of the viewport
    pub element_selector: Option<String>,

    /// Capture the full scrollable page (ignored when a selector is set)
    pub full_page: bool,

    /// Cookies to apply to the context before navigation (best-effort)
    pub cookies: Vec<Cookie>,
}

impl CaptureRequest {
    /// Build a request from the run's options
    pub fn from_context(url: &str, ctx: &RunContext) -> Self {
        Self {
            url: url.to_string(),
            element_selector: ctx.options.element_selector.clone(),
            full_page: ctx.options.full_page,
            cookies: parse_cookie_spec(&ctx.options.cookie_spec),
        }
    }
}

/// Error types for capture operations
#[derive(Debug)]
pub enum CaptureError {
    /// Engine could not be launched or is unavailable
    Launch(String),

    /// Navigation to the target URL failed
    Navigation(String),

    /// Screenshot failed (selector not found, capture aborted)
    Capture(String),

    /// I/O error while running the driver or persisting the snapshot
    Io(std::io::Error),
}

impl std::fmt::Display for CaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureError::Launch(msg) => write!(f, "Launch error: {}", msg),
            CaptureError::Navigation(msg) => write!(f, "Navigation error: {}", msg),
            CaptureError::Capture(msg) => write!(f, "Capture error: {}", msg),
            CaptureError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for CaptureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CaptureError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::Io(err)
    }
}

/// Terminal state of one engine's capture task.
///
/// Exactly one outcome exists per engine; an outcome is either a success
/// carrying PNG bytes or a failure carrying the error cause, never both.
#[derive(Debug)]
pub enum CaptureOutcome {
    Success {
        engine: Engine,
        /// PNG-encoded screenshot bytes
        image_data: Vec<u8>,
    },
    Failure {
        engine: Engine,
        error: CaptureError,
    },
}

impl CaptureOutcome {
    /// The engine this outcome belongs to
    pub fn engine(&self) -> Engine {
        match self {
            CaptureOutcome::Success { engine, .. } => *engine,
            CaptureOutcome::Failure { engine, .. } => *engine,
        }
    }

    /// Captured PNG bytes, if the capture succeeded
    pub fn image_data(&self) -> Option<&[u8]> {
        match self {
            CaptureOutcome::Success { image_data, .. } => Some(image_data),
            CaptureOutcome::Failure { .. } => None,
        }
    }
}
