//! Hopblade headless runner
//!
//! Runs the simulation without a window (scripted demo with a replay
//! determinism check) and converts save files.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, Args};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use hopblade::{
    DEFAULT_TICK_RATE, VERSION,
    game::{
        config::{PhysicsConfig, Profile},
        events::SimEventData,
        input::{InputRecording, InputSampler, RawButtons},
        state::SimulationState,
        tick::{replay_recording, tick},
        timing::TimingConstants,
    },
    save,
};

#[derive(Parser)]
#[command(name = "hopblade", version, about = "Hopblade headless simulation and save tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a scripted session, then replay it and compare state hashes
    Demo(DemoArgs),

    /// Convert save files between JSON and binary
    #[command(subcommand)]
    Save(SaveCommand),
}

#[derive(Args)]
struct DemoArgs {
    /// Simulation tick rate in Hz
    #[arg(long, default_value_t = DEFAULT_TICK_RATE)]
    tick_rate: u32,

    /// Physics profile (classic, floaty, snappy)
    #[arg(long, default_value_t = Profile::Classic)]
    profile: Profile,

    /// JSON physics config; overrides --profile
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u32,
}

#[derive(Subcommand)]
enum SaveCommand {
    /// JSON save -> binary save
    ToBinary {
        json: PathBuf,
        bin: PathBuf,
    },
    /// Binary save -> JSON save
    ToJson {
        bin: PathBuf,
        json: PathBuf,
    },
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Demo(args) => run_demo(&args),
        Command::Save(command) => run_save(command),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_save(command: SaveCommand) -> Result<bool> {
    match command {
        SaveCommand::ToBinary { json, bin } => save::json_to_binary(&json, &bin)
            .with_context(|| format!("converting {} to binary", json.display()))?,
        SaveCommand::ToJson { bin, json } => save::binary_to_json(&bin, &json)
            .with_context(|| format!("converting {} to JSON", bin.display()))?,
    }
    Ok(true)
}

/// Buttons held on tick `t` of the demo script.
///
/// Repeats every 300 ticks: walk right, short hop, full jump, swing, then
/// walk left while mashing swing.
fn scripted_buttons(t: u32, max_jump_frames: u32) -> RawButtons {
    let phase = t % 300;

    RawButtons {
        confirm: t == 0,
        right: (1..60).contains(&phase),
        left: (200..260).contains(&phase),
        jump: (60..64).contains(&phase) || (100..100 + max_jump_frames + 10).contains(&phase),
        swing: phase == 180 || (210..240).contains(&phase),
    }
}

/// Scripted session plus replay verification. Returns whether hashes matched.
fn run_demo(args: &DemoArgs) -> Result<bool> {
    info!("Hopblade v{}", VERSION);

    if args.tick_rate == 0 {
        bail!("tick rate must be at least 1 Hz");
    }
    if args.ticks == 0 {
        bail!("nothing to simulate: --ticks must be at least 1");
    }

    let config = match &args.config {
        Some(path) => PhysicsConfig::from_json_file(path)
            .with_context(|| format!("loading physics config {}", path.display()))?,
        None => args.profile.config(),
    };
    let timing = TimingConstants::calibrate(args.tick_rate, &config);

    match &args.config {
        Some(path) => info!("Physics: {}", path.display()),
        None => info!("Physics: {} profile", args.profile),
    }
    info!(
        "Tick Rate: {} Hz -> max jump {} frames, swing {} frames, cooldown {} frames",
        timing.tick_rate, timing.max_jump_frames, timing.swing_duration, timing.swing_cooldown
    );

    info!("=== Starting Demo Session ===");

    let initial = SimulationState::new(&config);
    let mut state = initial.clone();
    let mut sampler = InputSampler::new();
    let mut recording = InputRecording::new();

    let mut total_events = 0usize;
    let mut landings = 0u32;
    let mut highest = state.position.y;

    for t in 0..args.ticks {
        let input = sampler.sample(scripted_buttons(t, timing.max_jump_frames));
        recording.record(t, input);

        let result = tick(&mut state, &input, &timing, &config);
        total_events += result.events.len();
        highest = highest.min(state.position.y);

        for event in &result.events {
            match event.data {
                SimEventData::ModeChanged { .. } | SimEventData::Landed { .. } => info!("{}", event),
                _ => debug!("{}", event),
            }
            if matches!(event.data, SimEventData::Landed { .. }) {
                landings += 1;
            }
        }
    }
    recording.finalize(args.ticks.saturating_sub(1));

    info!("=== Session Results ===");
    info!("Ticks played: {}", state.tick);
    info!("Final position: {}", state.position);
    info!("Highest point: y = {:.2}", highest);
    info!("Landings: {}", landings);
    info!("Total events: {}", total_events);
    info!(
        "Recording: {} changes over {} ticks, hash {}",
        recording.delta_count(),
        recording.tick_count(),
        hex::encode(recording.compute_hash())
    );

    let hash = state.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));

    info!("=== Verifying Determinism ===");
    let (replayed, _) = replay_recording(initial, &recording, &timing, &config);
    let replay_hash = replayed.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash == replay_hash {
        info!("DETERMINISM VERIFIED: Hashes match!");
        Ok(true)
    } else {
        warn!("DETERMINISM FAILURE: Hashes differ!");
        Ok(false)
    }
}
