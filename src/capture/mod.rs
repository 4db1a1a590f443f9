//! Multi-engine page capture: engine set, driver seam, settle-all fan-out.

pub mod driver;
pub mod orchestrator;
pub mod playwright;
pub mod types;

pub use driver::{EngineDriver, MockDriver};
pub use orchestrator::capture_all;
pub use playwright::PlaywrightDriver;
pub use types::{
    CaptureError, CaptureOutcome, CaptureRequest, Cookie, Engine, parse_cookie_spec,
};
