//! Game module - drives the deterministic simulation from Bevy
//!
//! The simulation owns all game state. Bevy samples the keyboard once per
//! fixed tick, steps the simulation, and draws what it reports.

use bevy::prelude::*;
use bevy::window::{Monitor, PrimaryMonitor};

use hopblade::game::input::RawButtons;
use hopblade::{
    tick, InputSampler, Mode, PhysicsConfig, SimulationState, TimingConstants, DEFAULT_TICK_RATE,
};

use crate::AppState;

pub mod components;
pub mod visuals;

pub use components::*;
pub use visuals::*;

// ============================================================================
// GAME PLUGIN
// ============================================================================

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app
            // Resources
            .init_resource::<Simulation>()
            .insert_resource(Time::<Fixed>::from_hz(f64::from(DEFAULT_TICK_RATE)))

            .add_systems(Startup, log_timing)

            // Tick rate follows the monitor once it is known
            .add_systems(PreUpdate, calibrate_from_monitor)

            // Core simulation (fixed timestep, both states: the menu gate
            // lives in the simulation)
            .add_systems(FixedUpdate, step_simulation)

            // World setup/cleanup
            .add_systems(OnEnter(AppState::Playing), setup_world)
            .add_systems(OnExit(AppState::Playing), cleanup_world)

            // Visual updates (variable timestep)
            .add_systems(Update, (
                sync_character,
                sync_weapon,
            ).run_if(in_state(AppState::Playing)));
    }
}

// ============================================================================
// RESOURCES
// ============================================================================

/// The simulation and everything needed to step it
#[derive(Resource)]
pub struct Simulation {
    pub state: SimulationState,
    pub timing: TimingConstants,
    pub config: PhysicsConfig,
    pub sampler: InputSampler,
}

impl Default for Simulation {
    fn default() -> Self {
        let config = PhysicsConfig::default();
        Self {
            state: SimulationState::new(&config),
            timing: TimingConstants::calibrate(DEFAULT_TICK_RATE, &config),
            config,
            sampler: InputSampler::new(),
        }
    }
}

// ============================================================================
// TIMING
// ============================================================================

fn log_timing(sim: Res<Simulation>) {
    let timing = &sim.timing;
    info!(
        "Tick rate {} Hz: max jump {} frames, swing {} frames, cooldown {} frames",
        timing.tick_rate, timing.max_jump_frames, timing.swing_duration, timing.swing_cooldown
    );
}

/// Refresh rate in whole Hz, rounded (59.94 Hz -> 60).
pub fn refresh_rate_hz(millihertz: u32) -> u32 {
    millihertz.saturating_add(500) / 1000
}

/// Match the fixed timestep to the primary monitor, once.
fn calibrate_from_monitor(
    monitors: Query<&Monitor, With<PrimaryMonitor>>,
    mut fixed_time: ResMut<Time<Fixed>>,
    mut sim: ResMut<Simulation>,
    mut calibrated: Local<bool>,
) {
    if *calibrated {
        return;
    }
    let Ok(monitor) = monitors.get_single() else {
        return;
    };
    let Some(millihertz) = monitor.refresh_rate_millihertz else {
        return;
    };

    *calibrated = true;

    let hz = refresh_rate_hz(millihertz);
    if hz == 0 {
        warn!("Monitor reports a 0 Hz refresh rate, keeping {} Hz", sim.timing.tick_rate);
        return;
    }

    fixed_time.set_timestep_hz(f64::from(hz));
    let timing = TimingConstants::calibrate(hz, &sim.config);
    sim.timing = timing;

    info!(
        "Calibrated to {} Hz: max jump {} frames, swing {} frames, cooldown {} frames",
        hz, timing.max_jump_frames, timing.swing_duration, timing.swing_cooldown
    );
}

// ============================================================================
// SIMULATION STEP
// ============================================================================

/// Current button levels
fn read_buttons(keyboard: &ButtonInput<KeyCode>) -> RawButtons {
    RawButtons {
        left: keyboard.pressed(KeyCode::ArrowLeft),
        right: keyboard.pressed(KeyCode::ArrowRight),
        jump: keyboard.pressed(KeyCode::KeyZ),
        swing: keyboard.pressed(KeyCode::KeyX),
        confirm: keyboard.pressed(KeyCode::Enter),
    }
}

/// One simulation tick per fixed step
fn step_simulation(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut sim: ResMut<Simulation>,
    app_state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let Simulation { state, timing, config, sampler } = &mut *sim;

    let input = sampler.sample(read_buttons(&keyboard));
    let result = tick(state, &input, timing, config);

    for event in &result.events {
        debug!("{}", event);
    }

    // Mirror the simulation's mode into the Bevy state
    let wanted = match state.mode {
        Mode::MainMenu => AppState::MainMenu,
        Mode::Playing => AppState::Playing,
    };
    if *app_state.get() != wanted {
        next_state.set(wanted);
    }
}
