//! Settle-all capture fan-out across engines.
//!
//! One concurrent task per engine, every task driven to a terminal state
//! before any result is used, and every error converted into data at the
//! task boundary. A slow or unreachable engine degrades the report; it
//! never crashes the run or cancels its siblings.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::context::RunContext;
use crate::workspace;

use super::driver::EngineDriver;
use super::types::{CaptureError, CaptureOutcome, CaptureRequest, Engine};

/// Capture `url` in every engine concurrently.
///
/// Returns one outcome per engine in `Engine::all()` order (baseline
/// first). A driver error or a panicking task becomes a `Failure` outcome.
/// When persistence is enabled, each successful capture writes its bytes to
/// `<workspace>/<engine>.png` before its outcome is recorded; a failed
/// snapshot write turns that capture into a failure as well.
pub async fn capture_all<D>(driver: Arc<D>, url: &str, ctx: &RunContext) -> Vec<CaptureOutcome>
where
    D: EngineDriver + 'static,
{
    let request = Arc::new(CaptureRequest::from_context(url, ctx));

    let handles: Vec<(Engine, JoinHandle<Result<Vec<u8>, CaptureError>>)> = Engine::all()
        .into_iter()
        .map(|engine| {
            let driver = Arc::clone(&driver);
            let request = Arc::clone(&request);
            let handle = tokio::task::spawn_blocking(move || driver.capture(engine, &request));
            (engine, handle)
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for (engine, handle) in handles {
        let outcome = match handle.await {
            Ok(Ok(image_data)) => {
                debug!(engine = %engine, bytes = image_data.len(), "capture succeeded");
                persist_snapshot(ctx, engine, image_data)
            }
            Ok(Err(error)) => {
                warn!(engine = %engine, error = %error, "capture failed");
                CaptureOutcome::Failure { engine, error }
            }
            Err(join_error) => {
                warn!(engine = %engine, error = %join_error, "capture task aborted");
                CaptureOutcome::Failure {
                    engine,
                    error: CaptureError::Capture(format!("capture task aborted: {}", join_error)),
                }
            }
        };
        outcomes.push(outcome);
    }
    outcomes
}

/// Write the per-engine snapshot when persistence is enabled
fn persist_snapshot(ctx: &RunContext, engine: Engine, image_data: Vec<u8>) -> CaptureOutcome {
    if ctx.options.persist_artifacts {
        let file_name = format!("{}.png", engine);
        if let Err(error) = workspace::write_artifact(ctx, &file_name, &image_data) {
            warn!(engine = %engine, error = %error, "failed to persist snapshot");
            return CaptureOutcome::Failure {
                engine,
                error: CaptureError::Io(error),
            };
        }
    }
    CaptureOutcome::Success { engine, image_data }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::driver::MockDriver;
    use crate::context::RunOptions;
    use tempfile::TempDir;

    fn context_in(tmp: &TempDir, persist: bool) -> RunContext {
        RunContext::new(RunOptions {
            base_folder: tmp.path().join("runs"),
            persist_artifacts: persist,
            ..RunOptions::default()
        })
    }

    fn all_engines_driver() -> MockDriver {
        MockDriver::new()
            .with_solid_color(Engine::Chromium, 4, 4, [255, 255, 255, 255])
            .with_solid_color(Engine::Webkit, 4, 4, [255, 255, 255, 255])
            .with_solid_color(Engine::Firefox, 4, 4, [255, 255, 255, 255])
    }

    #[tokio::test]
    async fn test_outcomes_follow_launch_order() {
        let tmp = TempDir::new().unwrap();
        let ctx = context_in(&tmp, false);
        let outcomes = capture_all(Arc::new(all_engines_driver()), "http://localhost", &ctx).await;
        let engines: Vec<Engine> = outcomes.iter().map(|o| o.engine()).collect();
        assert_eq!(engines, Engine::all().to_vec());
        assert!(outcomes.iter().all(|o| o.image_data().is_some()));
    }

    #[tokio::test]
    async fn test_one_failure_never_aborts_siblings() {
        let tmp = TempDir::new().unwrap();
        let ctx = context_in(&tmp, false);
        let driver = MockDriver::new()
            .with_solid_color(Engine::Chromium, 4, 4, [0, 0, 0, 255])
            .with_failure(Engine::Webkit, "engine unreachable")
            .with_solid_color(Engine::Firefox, 4, 4, [0, 0, 0, 255]);

        let outcomes = capture_all(Arc::new(driver), "http://localhost", &ctx).await;
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].image_data().is_some());
        assert!(outcomes[1].image_data().is_none());
        assert!(outcomes[2].image_data().is_some());
    }

    #[tokio::test]
    async fn test_persistence_writes_per_engine_snapshots() {
        let tmp = TempDir::new().unwrap();
        let ctx = context_in(&tmp, true);
        capture_all(Arc::new(all_engines_driver()), "http://localhost", &ctx).await;
        for engine in Engine::all() {
            assert!(
                ctx.workspace.join(format!("{}.png", engine)).exists(),
                "missing snapshot for {}",
                engine
            );
        }
    }

    #[tokio::test]
    async fn test_no_persistence_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let ctx = context_in(&tmp, false);
        capture_all(Arc::new(all_engines_driver()), "http://localhost", &ctx).await;
        assert!(!ctx.workspace.exists());
    }
}
