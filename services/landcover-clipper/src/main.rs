//! Land-cover clipping service.
//!
//! Clips annual land-cover rasters to the configured study areas and
//! stores the results in the pipeline workspace.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use pipeline::PipelineConfig;

#[derive(Parser, Debug)]
#[command(name = "landcover-clipper")]
#[command(about = "Clips land-cover rasters to the study areas")]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = "PIPELINE_CONFIG", default_value = "pipeline.yaml")]
    config: PathBuf,

    /// Input directory override
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Workspace directory override
    #[arg(short, long)]
    workspace: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let mut config = PipelineConfig::from_yaml(&args.config)?;
    if let Some(input) = args.input {
        config.landcover.input_dir = Some(input);
    }
    if let Some(workspace) = args.workspace {
        config.workspace = workspace;
    }

    info!(workspace = %config.workspace.display(), "starting land-cover clipping");

    let summary = pipeline::landcover::run(&config)?;

    info!(
        processed = summary.processed,
        skipped = summary.skipped,
        rasters = summary.outputs.len(),
        "land-cover clipping complete"
    );

    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
