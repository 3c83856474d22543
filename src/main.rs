use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vignette::{AppConfig, AppError, FirstTick, demos};

#[derive(Parser)]
#[command(name = "vignette", about = "Animated 3D demo scenes")]
struct Cli {
    /// Demo to run
    #[arg(default_value = "first-scene")]
    demo: String,

    /// Window width in logical pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Window height in logical pixels
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Report the time since launch as the first frame's delta instead of zero
    #[arg(long)]
    since_start: bool,

    /// Print the available demos and exit
    #[arg(long)]
    list: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list {
        for name in demos::NAMES {
            println!("{name}");
        }
        return Ok(());
    }

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let (demo, scene) =
        demos::by_name(&cli.demo).ok_or_else(|| AppError::UnknownDemo(cli.demo.clone()))?;

    let first_tick = if cli.since_start {
        FirstTick::SinceStart
    } else {
        FirstTick::Zero
    };
    let config = AppConfig::new()
        .size(cli.width, cli.height)
        .first_tick(first_tick);

    tracing::info!(demo = %cli.demo, "vignette starting");
    vignette::run(config, demo, scene)?;

    Ok(())
}
