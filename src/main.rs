//! Phyre 2D headless runner
//!
//! Loads a level (or the built-in one), places the action objects and runs
//! one episode.
//!
//! Example:
//!   phyre2d --level levels/DefaultLevel.json --action 3.0,2.5
//!   phyre2d --seed 7 --max-steps 600 --record trace.json

use std::cell::RefCell;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use phyre2d::renderer::MeshRecorder;
use phyre2d::sim::{Level, PhyreEnv};
use phyre2d::{EnvConfig, Result};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run one episode of a 2D physics puzzle", long_about = None)]
struct Args {
    /// Level file (JSON); defaults to the built-in level
    #[arg(long)]
    level: Option<PathBuf>,
    /// Environment config file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Position for the next action object, as `x,y` in meters
    #[arg(long = "action", value_parser = parse_point, allow_hyphen_values = true)]
    actions: Vec<Vec2>,
    /// Seed for sampling positions of action objects left unspecified
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long)]
    max_steps: Option<u32>,
    /// Success region inset beyond the target radius (meters)
    #[arg(long)]
    tolerance: Option<f32>,
    /// Write the level as loaded to this path before running
    #[arg(long)]
    save_level: Option<PathBuf>,
    /// Write a per-step body trace (JSON) to this path
    #[arg(long)]
    record: Option<PathBuf>,
}

fn parse_point(s: &str) -> std::result::Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x in `{s}`: {e}"))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad y in `{s}`: {e}"))?;
    Ok(Vec2::new(x, y))
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => EnvConfig::load(path)?,
        None => EnvConfig::headless(),
    };
    if let Some(max_steps) = args.max_steps {
        config.max_steps = max_steps;
    }
    if let Some(tolerance) = args.tolerance {
        config.tolerance = tolerance;
    }

    let level = match &args.level {
        Some(path) => Level::load(path)?,
        None => Level::default_level(),
    };
    if let Some(path) = &args.save_level {
        level.save(path)?;
    }

    let recorder = (config.render || args.record.is_some())
        .then(|| Rc::new(RefCell::new(MeshRecorder::new(&config))));
    let mut env = PhyreEnv::new(level, config)?;
    if let Some(recorder) = &recorder {
        env = env.with_frontend(Box::new(recorder.clone()));
    }

    // Fill unspecified actions from the seeded action space
    let mut rng = Pcg32::seed_from_u64(args.seed);
    let sampled = env.action_space().sample_points(&mut rng);
    let actions: Vec<Vec2> = sampled
        .iter()
        .enumerate()
        .map(|(i, p)| args.actions.get(i).copied().unwrap_or(*p))
        .collect();
    if args.actions.len() > actions.len() {
        log::warn!(
            "Ignoring {} extra action positions",
            args.actions.len() - actions.len()
        );
    }
    for (name, pos) in env.level().actions.iter().zip(&actions) {
        log::info!("Placing {} at ({:.3}, {:.3})", name, pos.x, pos.y);
    }

    let outcome = env.step(&actions)?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    env.close();

    if let (Some(recorder), Some(path)) = (&recorder, &args.record) {
        recorder.borrow().save(path)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    log::info!("Phyre 2D starting...");

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
