//! Colliding Polygons 2D headless runner
//!
//! Usage: `polygons2d [config.json] [steps]`
//!
//! Seeds a world from the config (defaults when omitted), runs it at a fixed
//! timestep and logs diagnostics. Set `RUST_LOG=debug` for per-step output.

use std::process::ExitCode;

use polygons2d::consts::SIM_DT;
use polygons2d::sim::{StepSummary, World};
use polygons2d::{SimConfig, SimResult};

/// Steps to run when none are given (ten seconds of simulated time)
const DEFAULT_STEPS: u64 = 600;
/// Log a progress line every this many steps
const REPORT_INTERVAL: u64 = 60;

fn run(config_path: Option<String>, steps: u64) -> SimResult<()> {
    let config = match config_path {
        Some(path) => SimConfig::load(path)?,
        None => {
            log::info!("Using default config");
            SimConfig::default()
        }
    };

    let mut world = World::new(config)?;
    let start_energy = world.kinetic_energy();
    let mut totals = StepSummary::default();

    for _ in 0..steps {
        let summary = world.step(SIM_DT);
        totals += summary;

        if world.steps() % REPORT_INTERVAL == 0 {
            let p = world.total_momentum();
            log::info!(
                "t={:.2}s momentum=({:.1}, {:.1}) energy={:.1}",
                world.steps() as f64 * SIM_DT,
                p.x,
                p.y,
                world.kinetic_energy()
            );
        }
    }

    log::info!(
        "Ran {} steps: {} candidate pairs, {} resolved, {} skipped, {} degenerate, {} wall hits",
        world.steps(),
        totals.candidate_pairs,
        totals.resolved,
        totals.skipped,
        totals.degenerate,
        totals.wall_hits
    );
    log::info!(
        "Kinetic energy {:.1} -> {:.1}",
        start_energy,
        world.kinetic_energy()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Colliding Polygons 2D (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config_path = args.next();
    let steps = match args.next().map(|s| s.parse::<u64>()) {
        None => DEFAULT_STEPS,
        Some(Ok(steps)) => steps,
        Some(Err(e)) => {
            log::error!("Invalid step count: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(config_path, steps) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
