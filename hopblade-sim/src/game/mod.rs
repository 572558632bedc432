//! Game Logic Module
//!
//! All game simulation code. Deterministic for a fixed tick rate and
//! physics profile.
//!
//! ## Module Structure
//!
//! - `config`: Physics constants and profiles
//! - `timing`: Tick-rate calibration of frame counts
//! - `input`: Input snapshots, edge detection, recordings
//! - `state`: Character state, jump and swing phases
//! - `tick`: Fixed-timestep simulation step
//! - `collision`: Platform, bounds and weapon geometry
//! - `menu`: Main menu buttons and commands
//! - `events`: Simulation events for logging/replay

pub mod config;
pub mod timing;
pub mod input;
pub mod state;
pub mod tick;
pub mod collision;
pub mod menu;
pub mod events;

// Re-export key types
pub use config::{PhysicsConfig, Profile, ConfigError};
pub use timing::TimingConstants;
pub use input::{InputSnapshot, InputSampler, RawButtons, InputRecording, InputDelta};
pub use state::{SimulationState, Mode, Facing, JumpPhase, SwingPhase};
pub use tick::{tick, replay, replay_recording, TickResult};
pub use menu::{MenuButton, MenuCommand, main_menu_buttons, hit_test};
pub use events::{SimEvent, SimEventData};
