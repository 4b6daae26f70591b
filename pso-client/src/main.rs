use anyhow::{Context, Result};
use clap::Parser;
use pso_client::driver::Driver;
use pso_client::script::GoalScript;
use pso_client::settings;
use pso_shared::SwarmSettings;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless particle swarm driver", long_about = None)]
struct Args {
    /// JSON settings file; built-in defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 1000)]
    frames: u64,

    /// Seed for the random source
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// JSON-lines file of goal relocations
    #[arg(short, long)]
    goal_script: Option<PathBuf>,

    /// Write a snapshot every N frames (0 disables snapshots)
    #[arg(long, default_value_t = 1)]
    snapshot_every: u64,

    /// Snapshot destination; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let settings = match &args.config {
        Some(path) => settings::load(path)?,
        None => SwarmSettings::default(),
    };

    let mut script = match &args.goal_script {
        Some(path) => GoalScript::from_path(path)?,
        None => GoalScript::default(),
    };
    log::info!("Loaded {} goal relocations", script.len());

    let mut sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create output {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut driver = Driver::new(&settings, args.seed);
    let summary = driver
        .run(args.frames, &mut script, args.snapshot_every, &mut sink)
        .context("Simulation run failed")?;

    log::info!("Run finished: {}", serde_json::to_string(&summary)?);

    Ok(())
}
