//! Scene splitting command-line runner.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use scenesplit_analysis::{GeminiConfig, GeminiFilesClient};
use scenesplit_media::FfmpegSlicer;
use scenesplit_models::SourceRequest;
use scenesplit_worker::{PipelineConfig, PipelineError, PipelineOutcome, ScenePipeline};

/// Split a video into one clip per detected scene.
#[derive(Parser, Debug)]
#[command(name = "scenesplit", version, about)]
struct Cli {
    /// Video URL (fetched with yt-dlp) or local file path
    source: String,

    /// Directory for the working input and produced clips
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Minimum scene duration in seconds
    #[arg(long)]
    min_scene_duration: Option<f64>,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,
}

fn init_tracing() -> anyhow::Result<()> {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env().add_directive("scenesplit=info".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
    Ok(())
}

fn report(outcome: &PipelineOutcome, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    for clip in &outcome.clips {
        println!("{}\t{}", clip.path.display(), clip.segment);
    }
    println!("{}", outcome.status);
    Ok(())
}

fn exit_code(outcome: &PipelineOutcome) -> ExitCode {
    if outcome.succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Already installed is fine
    let _ = rustls::crypto::ring::default_provider().install_default();

    dotenvy::dotenv().ok();
    init_tracing()?;

    let cli = Cli::parse();

    let mut config = PipelineConfig::from_env();
    if let Some(work_dir) = cli.work_dir {
        config.work_dir = work_dir;
    }
    if let Some(min_scene_duration) = cli.min_scene_duration {
        config.min_scene_duration = min_scene_duration;
    }
    info!("Pipeline config: {:?}", config);

    let service = match GeminiConfig::from_env().and_then(GeminiFilesClient::new) {
        Ok(service) => service,
        Err(e) => {
            error!("Failed to create analysis client: {}", e);
            let outcome = PipelineOutcome::from_error(&PipelineError::from(e));
            report(&outcome, cli.json)?;
            return Ok(exit_code(&outcome));
        }
    };

    let slicer = FfmpegSlicer::new().with_timeout(config.slice_timeout);

    let pipeline = match ScenePipeline::new(config, service, slicer) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            let outcome = PipelineOutcome::from_error(&e);
            report(&outcome, cli.json)?;
            return Ok(exit_code(&outcome));
        }
    };

    info!(work_dir = %pipeline.config().work_dir.display(), "Pipeline ready");

    let outcome = pipeline.process(&SourceRequest::parse(&cli.source)).await;
    report(&outcome, cli.json)?;

    Ok(exit_code(&outcome))
}
