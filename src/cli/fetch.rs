//! CLI handler for fetching and summarizing captions for a single video.
//!
//! Runs the same pipeline as the HTTP endpoint, then prints the cleaned text.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::args::FetchCliArgs;
use crate::config::Config;
use crate::pipeline::{PipelineRequest, SubtitlePipeline};
use crate::retrieval::{CookieSource, RetrievalRequest};

const SEPARATOR: &str = "==================================================";

/// Handle the fetch CLI command.
pub async fn handle_fetch_command(args: FetchCliArgs) -> Result<()> {
    let config = Config::load()?;
    config.ensure_dirs()?;

    // Without credentials the CLI just skips the workflow instead of failing
    let send_to_workflow = !args.no_workflow && config.is_workflow_configured();
    if !args.no_workflow && !send_to_workflow {
        eprintln!(
            "Hint: set a workflow id and token with `capsum config set` to get a summary"
        );
    }

    let pipeline = SubtitlePipeline::from_config(&config)?;
    let retrieval = RetrievalRequest::new(&args.url, &args.lang)
        .with_cookies(CookieSource::from_options(args.browser, args.cookies_file));
    let request = PipelineRequest {
        retrieval,
        clean_text: !args.no_clean,
        send_to_workflow,
        workflow_id: None,
        token: None,
    };

    let pb = (!args.no_progress).then(|| {
        let pb = create_spinner();
        pb.set_message(if send_to_workflow {
            "Downloading captions and running workflow..."
        } else {
            "Downloading captions..."
        });
        pb
    });

    let result = pipeline.run(request).await;

    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }

    let outcome = result.context("Failed to fetch captions")?;
    eprintln!("Captions saved to: {}", outcome.subtitle_file.display());

    let text = outcome
        .cleaned_text
        .as_deref()
        .unwrap_or(&outcome.original_content);

    match &args.output {
        Some(output_path) => {
            std::fs::write(output_path, text).context("Failed to write output file")?;
            eprintln!("Text saved to: {}", output_path.display());
        }
        None => {
            println!("{}", SEPARATOR);
            println!("{}", text);
            println!("{}", SEPARATOR);
        }
    }

    if let Some(summary_file) = &outcome.summary_file {
        eprintln!("Workflow summary saved to: {}", summary_file.display());
    } else if outcome.workflow_response.is_some() {
        eprintln!("Workflow finished but returned no data to summarize");
    }

    Ok(())
}

/// Create a styled spinner.
fn create_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {elapsed} {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
