use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use print_canvas::config::{CanvasConfig, ConfigError};
use print_canvas::engine::EngineCore;
use print_canvas::geom::Boundary;
use print_canvas::metrics::MonospaceMetrics;
use print_canvas::snapshot::{DesignSnapshot, SnapshotError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("boundary must have a positive width and height")]
    EmptyBoundary,
}

#[derive(Parser, Debug)]
#[command(name = "print-canvas", about = "Design canvas tools for print-on-demand layouts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clamp a saved design into a print boundary and shrink overflowing text.
    Fit(FitArgs),
}

#[derive(Args, Debug)]
struct FitArgs {
    /// Snapshot JSON file.
    snapshot: PathBuf,
    #[arg(long, env = "CANVAS_BOUNDARY_LEFT", default_value_t = 0.0)]
    left: f64,
    #[arg(long, env = "CANVAS_BOUNDARY_TOP", default_value_t = 0.0)]
    top: f64,
    #[arg(long, env = "CANVAS_BOUNDARY_WIDTH")]
    width: f64,
    #[arg(long, env = "CANVAS_BOUNDARY_HEIGHT")]
    height: f64,
    /// Stop after this many auto-fit frames even if work remains.
    #[arg(long, default_value_t = 1000)]
    frames: usize,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Fit(args) => fit(&args),
    };
    match result {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "print-canvas failed");
            ExitCode::FAILURE
        }
    }
}

fn fit(args: &FitArgs) -> Result<String, CliError> {
    if !(args.width > 0.0 && args.height > 0.0) {
        return Err(CliError::EmptyBoundary);
    }
    let raw = std::fs::read_to_string(&args.snapshot)
        .map_err(|source| CliError::Read { path: args.snapshot.clone(), source })?;
    let snapshot = DesignSnapshot::from_json(&raw)?;

    let config = CanvasConfig::from_env()?;
    let mut engine = EngineCore::with_config(config, Box::new(MonospaceMetrics::default()));
    engine.load_snapshot(snapshot)?;
    engine.set_boundary(Boundary::new(args.left, args.top, args.width, args.height));

    let mut frames = 0;
    while engine.needs_frame() && frames < args.frames {
        engine.on_frame();
        frames += 1;
    }
    tracing::info!(frames, settled = !engine.needs_frame(), "auto-fit finished");

    Ok(engine.snapshot().to_json()?)
}
