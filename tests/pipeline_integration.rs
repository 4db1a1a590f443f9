//! Integration tests for the capture-normalize-diff-report pipeline

use std::sync::Arc;

use browser_diff::canvas::RawImage;
use browser_diff::capture::{Engine, MockDriver};
use browser_diff::context::{RunContext, RunOptions};
use browser_diff::pipeline::run_diff;
use browser_diff::report::ComparisonOutcome;
use tempfile::TempDir;

const URL: &str = "http://localhost:3000";

fn context_in(tmp: &TempDir, persist: bool) -> RunContext {
    RunContext::new(RunOptions {
        base_folder: tmp.path().join("runs"),
        persist_artifacts: persist,
        ..RunOptions::default()
    })
}

fn white_driver() -> MockDriver {
    MockDriver::new()
        .with_solid_color(Engine::Chromium, 40, 30, [255, 255, 255, 255])
        .with_solid_color(Engine::Webkit, 40, 30, [255, 255, 255, 255])
        .with_solid_color(Engine::Firefox, 40, 30, [255, 255, 255, 255])
}

#[tokio::test]
async fn test_identical_pages_report_zero_change() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_in(&tmp, false);

    let report = run_diff(Arc::new(white_driver()), URL, &ctx).await.unwrap();

    assert_eq!(report.run_id, ctx.run_id);
    assert_eq!(report.baseline, Engine::Chromium);
    assert_eq!(report.results.len(), 2);
    for result in &report.results {
        match &result.comparison {
            ComparisonOutcome::Completed {
                pixel_change_count,
                pixel_change_percentage,
                diff_artifact,
            } => {
                assert_eq!(*pixel_change_count, 0);
                assert_eq!(*pixel_change_percentage, 0.0);
                assert!(diff_artifact.is_none());
            }
            other => panic!("expected completed comparison, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_failed_engine_is_skipped_not_absent() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_in(&tmp, false);
    let driver = MockDriver::new()
        .with_solid_color(Engine::Chromium, 40, 30, [255, 255, 255, 255])
        .with_failure(Engine::Webkit, "engine unreachable")
        .with_solid_color(Engine::Firefox, 40, 30, [255, 255, 255, 255]);

    let report = run_diff(Arc::new(driver), URL, &ctx).await.unwrap();

    // The report still has one entry per comparison engine, in launch order.
    assert_eq!(report.results.len(), 2);
    assert_eq!(report.results[0].engine, Engine::Webkit);
    assert_eq!(report.results[1].engine, Engine::Firefox);

    match &report.results[0].comparison {
        ComparisonOutcome::Skipped { reason } => assert!(reason.contains("webkit")),
        other => panic!("expected skipped webkit comparison, got {:?}", other),
    }
    assert!(!report.results[1].is_skipped());
}

#[tokio::test]
async fn test_baseline_failure_skips_every_comparison() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_in(&tmp, false);
    let driver = MockDriver::new()
        .with_failure(Engine::Chromium, "engine unreachable")
        .with_solid_color(Engine::Webkit, 40, 30, [255, 255, 255, 255])
        .with_solid_color(Engine::Firefox, 40, 30, [255, 255, 255, 255]);

    let report = run_diff(Arc::new(driver), URL, &ctx).await.unwrap();

    assert_eq!(report.results.len(), 2);
    for result in &report.results {
        match &result.comparison {
            ComparisonOutcome::Skipped { reason } => assert!(reason.contains("chromium")),
            other => panic!("expected skipped comparison, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_size_mismatch_is_padded_not_stretched() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_in(&tmp, false);
    // A fully static white page rendered 100x200 by the baseline and
    // 100x150 by firefox: padding is transparent, which compares equal to
    // white content, so nothing is flagged.
    let driver = MockDriver::new()
        .with_solid_color(Engine::Chromium, 100, 200, [255, 255, 255, 255])
        .with_solid_color(Engine::Webkit, 100, 200, [255, 255, 255, 255])
        .with_solid_color(Engine::Firefox, 100, 150, [255, 255, 255, 255]);

    let report = run_diff(Arc::new(driver), URL, &ctx).await.unwrap();

    match &report.results[1].comparison {
        ComparisonOutcome::Completed {
            pixel_change_count, ..
        } => assert_eq!(*pixel_change_count, 0),
        other => panic!("expected completed comparison, got {:?}", other),
    }
}

#[tokio::test]
async fn test_genuine_content_difference_is_counted() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_in(&tmp, false);

    // Webkit renders a 10x10 black square on the otherwise white page.
    let mut pixels = [255u8, 255, 255, 255].repeat(40 * 30);
    for y in 5..15 {
        for x in 5..15 {
            let idx = (y * 40 + x) * 4;
            pixels[idx..idx + 4].copy_from_slice(&[0, 0, 0, 255]);
        }
    }
    let webkit_png = RawImage::from_raw_rgba(40, 30, pixels)
        .unwrap()
        .to_png()
        .unwrap();
    let driver = white_driver().with_png(Engine::Webkit, webkit_png);

    let report = run_diff(Arc::new(driver), URL, &ctx).await.unwrap();

    match &report.results[0].comparison {
        ComparisonOutcome::Completed {
            pixel_change_count,
            pixel_change_percentage,
            ..
        } => {
            assert_eq!(*pixel_change_count, 100);
            let expected = 100.0 / (40.0 * 30.0) * 100.0;
            assert!((pixel_change_percentage - expected).abs() < 1e-9);
        }
        other => panic!("expected completed comparison, got {:?}", other),
    }
    // Firefox matched the baseline exactly.
    match &report.results[1].comparison {
        ComparisonOutcome::Completed {
            pixel_change_count, ..
        } => assert_eq!(*pixel_change_count, 0),
        other => panic!("expected completed comparison, got {:?}", other),
    }
}

#[tokio::test]
async fn test_no_persistence_leaves_no_residue() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_in(&tmp, false);

    run_diff(Arc::new(white_driver()), URL, &ctx).await.unwrap();

    assert!(!ctx.workspace.exists());
    assert!(
        !ctx.options.base_folder.exists(),
        "empty base folder should be removed with the workspace"
    );
}

#[tokio::test]
async fn test_persistence_leaves_exactly_the_artifacts() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_in(&tmp, true);

    run_diff(Arc::new(white_driver()), URL, &ctx).await.unwrap();

    let mut files: Vec<String> = std::fs::read_dir(&ctx.workspace)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    files.sort();
    assert_eq!(
        files,
        vec![
            "chromium.png",
            "diff-chromium-firefox.png",
            "diff-chromium-webkit.png",
            "firefox.png",
            "webkit.png",
        ]
    );
}

#[tokio::test]
async fn test_persistence_with_failed_engine_omits_its_files() {
    let tmp = TempDir::new().unwrap();
    let ctx = context_in(&tmp, true);
    let driver = MockDriver::new()
        .with_solid_color(Engine::Chromium, 40, 30, [255, 255, 255, 255])
        .with_failure(Engine::Webkit, "engine unreachable")
        .with_solid_color(Engine::Firefox, 40, 30, [255, 255, 255, 255]);

    run_diff(Arc::new(driver), URL, &ctx).await.unwrap();

    assert!(ctx.workspace.join("chromium.png").exists());
    assert!(ctx.workspace.join("firefox.png").exists());
    assert!(ctx.workspace.join("diff-chromium-firefox.png").exists());
    assert!(!ctx.workspace.join("webkit.png").exists());
    assert!(!ctx.workspace.join("diff-chromium-webkit.png").exists());
}
