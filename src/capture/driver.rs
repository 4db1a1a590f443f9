//! Engine driver abstraction.
//!
//! A driver owns everything browser-specific: launching an engine, applying
//! cookies, navigating, and producing PNG screenshot bytes. The pipeline
//! only sees this seam, which keeps the capture orchestrator testable
//! without any browser installed:
//! - `PlaywrightDriver` (in [`super::playwright`]) drives real engines
//! - [`MockDriver`] serves programmed responses for tests and smoke runs

use std::collections::HashMap;

use crate::canvas::RawImage;

use super::types::{CaptureError, CaptureRequest, Engine};

/// Trait for browser engine drivers.
///
/// A capture opens a fresh session for `engine`, applies the request's
/// cookies to the browsing context (best-effort), navigates to the URL, and
/// screenshots either the configured element or the viewport/full page.
pub trait EngineDriver: Send + Sync {
    /// Capture the request in the given engine, returning PNG bytes
    fn capture(&self, engine: Engine, request: &CaptureRequest) -> Result<Vec<u8>, CaptureError>;
}

#[derive(Debug, Clone)]
enum MockResponse {
    Png(Vec<u8>),
    Fail(String),
}

/// A programmable driver for tests and offline smoke runs.
///
/// Each engine can be given a canned PNG response or an injected failure;
/// engines without a response fail with a launch error.
#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    responses: HashMap<Engine, MockResponse>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve these PNG bytes for `engine`
    pub fn with_png(mut self, engine: Engine, bytes: Vec<u8>) -> Self {
        self.responses.insert(engine, MockResponse::Png(bytes));
        self
    }

    /// Serve a solid-color PNG of the given dimensions for `engine`
    pub fn with_solid_color(self, engine: Engine, width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = rgba.repeat(width as usize * height as usize);
        let encoded = RawImage::from_raw_rgba(width, height, pixels)
            .and_then(|image| image.to_png());
        match encoded {
            Ok(bytes) => self.with_png(engine, bytes),
            Err(e) => self.with_failure(engine, &e.to_string()),
        }
    }

    /// Make `engine` fail with the given message
    pub fn with_failure(mut self, engine: Engine, message: &str) -> Self {
        self.responses
            .insert(engine, MockResponse::Fail(message.to_string()));
        self
    }
}

impl EngineDriver for MockDriver {
    fn capture(&self, engine: Engine, _request: &CaptureRequest) -> Result<Vec<u8>, CaptureError> {
        match self.responses.get(&engine) {
            Some(MockResponse::Png(bytes)) => Ok(bytes.clone()),
            Some(MockResponse::Fail(message)) => Err(CaptureError::Launch(message.clone())),
            None => Err(CaptureError::Launch(format!(
                "no mock response configured for {}",
                engine
            ))),
        }
    }
}
