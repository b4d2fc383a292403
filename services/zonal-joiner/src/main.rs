//! Zonal statistics and join service.
//!
//! Computes per-tract statistics of every workspace raster and writes
//! the statistics joined onto tract geometry as shapefiles.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use pipeline::PipelineConfig;

#[derive(Parser, Debug)]
#[command(name = "zonal-joiner")]
#[command(about = "Joins zonal statistics of workspace rasters onto tract geometry")]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = "PIPELINE_CONFIG", default_value = "pipeline.yaml")]
    config: PathBuf,

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
    if let Some(workspace) = args.workspace {
        config.workspace = workspace;
    }

    info!(workspace = %config.workspace.display(), "starting zonal statistics");

    let summary = pipeline::zonal::run(&config)?;

    info!(
        processed = summary.processed,
        skipped = summary.skipped,
        outputs = summary.outputs.len(),
        "zonal statistics complete"
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
