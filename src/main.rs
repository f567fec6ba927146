use anyhow::{Context, Result};
use clap::Parser;
use motile_lib::model::init_logging;
use motile_lib::runner::{load_config, HeadlessRunner};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path (defaults are used when it does not exist)
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Ticks to simulate per run
    #[arg(short, long, default_value_t = 3600)]
    ticks: u64,

    /// Seconds per tick (capped at 1/30)
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,

    /// Seed of the first run; overrides the config seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of independent runs, seeded consecutively
    #[arg(short, long, default_value_t = 1)]
    runs: usize,

    /// Write the JSON summaries here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Population trace interval in ticks (0 keeps first and last only)
    #[arg(long, default_value_t = 60)]
    sample_every: u64,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let config = load_config(&args.config)?;
    let base_seed = args.seed.or(config.world.seed).unwrap_or(0);
    tracing::info!(
        fingerprint = %config.fingerprint(),
        runs = args.runs,
        ticks = args.ticks,
        base_seed,
        "starting headless runs"
    );

    let runner = HeadlessRunner::new(config, args.ticks, args.dt, args.sample_every)?;
    let summaries = runner.run_batch(base_seed, args.runs.max(1))?;
    let json = serde_json::to_string_pretty(&summaries)?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "summaries written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
