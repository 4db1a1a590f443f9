use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use browser_diff::capture::PlaywrightDriver;
use browser_diff::context::{RunContext, RunOptions, looks_like_url};
use browser_diff::pipeline::run_diff;
use browser_diff::report::{ComparisonOutcome, DiffReport};

/// browser-diff - cross-browser visual regression testing
#[derive(Parser, Debug)]
#[command(
    name = "browser-diff",
    about = "Capture a page in Chromium, WebKit and Firefox and diff the pixels",
    after_help = "ENVIRONMENT VARIABLES:\n\
        BROWSER_DIFF_THRESHOLD   Default pixel sensitivity (0..1)\n\
        BROWSER_DIFF_FOLDER      Default base folder for run artifacts"
)]
struct Args {
    /// URL to capture and compare
    url: String,

    /// CSS selector: capture just this element instead of the viewport
    #[arg(short, long)]
    element: Option<String>,

    /// Capture the full scrollable page instead of the viewport
    #[arg(long)]
    full_page: bool,

    /// Save per-engine screenshots and diff images under the run folder
    #[arg(short, long)]
    save_diff: bool,

    /// Pixel sensitivity in [0,1]; lower flags smaller color deltas
    #[arg(short, long, env = "BROWSER_DIFF_THRESHOLD", default_value_t = 0.1)]
    threshold: f64,

    /// Base folder for run artifacts
    #[arg(short, long, env = "BROWSER_DIFF_FOLDER", default_value = "./browser-diff")]
    folder: PathBuf,

    /// Cookies to set before navigation: "key=value;key2=value2"
    #[arg(short, long, default_value = "")]
    cookie: String,

    /// Output the report as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    if !looks_like_url(&args.url) {
        return Err(format!("'{}' does not look like a valid URL", args.url).into());
    }

    let options = RunOptions {
        threshold: args.threshold,
        base_folder: args.folder,
        persist_artifacts: args.save_diff,
        element_selector: args.element,
        full_page: args.full_page,
        cookie_spec: args.cookie,
        verbose: args.verbose,
    };
    options.validate()?;

    let ctx = RunContext::new(options);
    let driver = Arc::new(PlaywrightDriver::new());
    let report = run_diff(driver, &args.url, &ctx).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Print the per-engine tree summary
fn print_report(report: &DiffReport) {
    for result in &report.results {
        println!("┌─ {}", result.engine);
        match &result.comparison {
            ComparisonOutcome::Completed {
                pixel_change_count,
                pixel_change_percentage,
                diff_artifact,
            } => {
                let branch = if diff_artifact.is_some() { "├─" } else { "└─" };
                println!(
                    "{} {:.2}% pixel change compared to {} ({}px)",
                    branch, pixel_change_percentage, report.baseline, pixel_change_count
                );
                if let Some(path) = diff_artifact {
                    println!("└─ visual diff stored at {}", path.display());
                }
            }
            ComparisonOutcome::Skipped { reason } => {
                println!("└─ comparison skipped: {}", reason);
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "browser_diff=debug"
    } else {
        "browser_diff=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}
