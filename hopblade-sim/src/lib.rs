//! # Hopblade Simulation
//!
//! Deterministic core of Hopblade, a single-character 2D platformer with a
//! variable-height jump and a melee swing.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     HOPBLADE SIMULATION                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Shared primitives                         │
//! │  ├── vec2.rs     - 2D vector (f64)                           │
//! │  ├── rect.rs     - Axis-aligned rectangles                   │
//! │  └── hash.rs     - State hashing for replay verification     │
//! │                                                              │
//! │  game/           - Game logic (deterministic)                │
//! │  ├── config.rs   - Physics constants and profiles            │
//! │  ├── timing.rs   - Tick-rate calibration                     │
//! │  ├── input.rs    - Input snapshots and recordings            │
//! │  ├── state.rs    - Character, jump and swing state           │
//! │  ├── tick.rs     - Fixed-timestep simulation step            │
//! │  ├── collision.rs- Platform and bounds                       │
//! │  ├── menu.rs     - Main menu commands                        │
//! │  └── events.rs   - Simulation events                         │
//! │                                                              │
//! │  save.rs         - JSON <-> binary save converter            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Timing
//!
//! Every duration in the game is a frame count derived once from the tick
//! rate (see [`TimingConstants::calibrate`]), so a 60 Hz host and a 144 Hz
//! host agree on wall-clock durations: a swing lasts a quarter second on both.
//!
//! ## Determinism
//!
//! For a fixed tick rate and physics profile, [`tick`] is a pure function of
//! the state and one [`InputSnapshot`]: no clock, no randomness, no I/O.
//! Replaying a recording on the same platform yields the same state hash.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod save;

// Re-export commonly used types
pub use core::vec2::Vec2;
pub use core::rect::Rect;
pub use core::hash::StateHash;
pub use game::config::{PhysicsConfig, Profile};
pub use game::timing::TimingConstants;
pub use game::input::{InputSnapshot, InputSampler, RawButtons, InputRecording};
pub use game::state::{SimulationState, Mode};
pub use game::tick::{tick, replay, TickResult};
pub use game::menu::MenuCommand;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tick rate used until the host knows the real one (Hz)
pub const DEFAULT_TICK_RATE: u32 = 60;
