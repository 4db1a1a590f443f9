//! Playwright-backed engine driver.
//!
//! Drives real browser engines through Node Playwright, the one ecosystem
//! stack that launches Chromium, WebKit and Firefox behind a single API.
//! Each capture generates a small script, runs it with `node -e`, and reads
//! the screenshot back base64-encoded on stdout. Requires `node` on PATH
//! and the `playwright` npm package resolvable from the working directory.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::json;
use std::process::Command;
use tracing::debug;

use super::driver::EngineDriver;
use super::types::{CaptureError, CaptureRequest, Engine};

/// Driver that shells out to Node Playwright for each capture
#[derive(Debug, Clone)]
pub struct PlaywrightDriver {
    node_binary: String,
}

impl Default for PlaywrightDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaywrightDriver {
    pub fn new() -> Self {
        Self {
            node_binary: "node".to_string(),
        }
    }

    /// Use a specific Node binary instead of `node` from PATH
    pub fn node_binary(mut self, binary: impl Into<String>) -> Self {
        self.node_binary = binary.into();
        self
    }
}

impl EngineDriver for PlaywrightDriver {
    fn capture(&self, engine: Engine, request: &CaptureRequest) -> Result<Vec<u8>, CaptureError> {
        let script = build_script(engine, request);
        debug!(engine = %engine, url = %request.url, "launching playwright capture");

        let output = Command::new(&self.node_binary)
            .arg("-e")
            .arg(&script)
            .output()?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            return Err(classify_failure(engine, stderr));
        }
        if !stderr.is_empty() {
            // Best-effort noise, e.g. a failed cookie injection.
            debug!(engine = %engine, stderr = %stderr, "capture stderr");
        }

        let encoded = String::from_utf8_lossy(&output.stdout);
        let bytes = BASE64
            .decode(encoded.trim().as_bytes())
            .map_err(|e| CaptureError::Capture(format!("invalid screenshot payload: {}", e)))?;
        if bytes.is_empty() {
            return Err(CaptureError::Capture("empty screenshot".to_string()));
        }
        Ok(bytes)
    }
}

/// Generate the per-capture Playwright script.
///
/// All request values are embedded as JSON literals so selectors and cookie
/// content cannot break out of the script. Cookie injection is wrapped in a
/// try/catch that logs and continues: a bad cookie never aborts the capture.
fn build_script(engine: Engine, request: &CaptureRequest) -> String {
    let launcher = engine.name();
    let url = json!(request.url).to_string();
    let cookies = json!(
        request
            .cookies
            .iter()
            .map(|c| json!({ "name": c.name, "value": c.value, "url": request.url }))
            .collect::<Vec<_>>()
    )
    .to_string();
    let screenshot = match &request.element_selector {
        Some(selector) => format!(
            "await page.locator({}).screenshot()",
            json!(selector)
        ),
        None => format!(
            "await page.screenshot({{ fullPage: {} }})",
            request.full_page
        ),
    };

    format!(
        r#"const {{ {launcher} }} = require('playwright');
(async () => {{
  const browser = await {launcher}.launch();
  try {{
    const context = await browser.newContext();
    const cookies = {cookies};
    if (cookies.length > 0) {{
      try {{ await context.addCookies(cookies); }}
      catch (err) {{ console.error('cookie injection failed: ' + err.message); }}
    }}
    const page = await context.newPage();
    await page.goto({url});
    const image = {screenshot};
    process.stdout.write(image.toString('base64'));
  }} finally {{
    await browser.close();
  }}
}})().catch((err) => {{ console.error(err.message || String(err)); process.exit(1); }});
"#
    )
}

/// Map a failed capture process to an error category by its stderr
fn classify_failure(engine: Engine, stderr: String) -> CaptureError {
    let message = if stderr.is_empty() {
        format!("{} capture process failed without output", engine)
    } else {
        stderr
    };
    let lower = message.to_lowercase();
    if lower.contains("net::") || lower.contains("goto") || lower.contains("navigat") {
        CaptureError::Navigation(message)
    } else if lower.contains("locator") || lower.contains("selector") || lower.contains("screenshot")
    {
        CaptureError::Capture(message)
    } else {
        CaptureError::Launch(message)
    }
}
