//! Simulation State
//!
//! The single mutable entity of the game, plus the derived phase enums the
//! tick dispatches on.

use serde::{Serialize, Deserialize};

use crate::core::hash::{StateHash, compute_state_hash};
use crate::core::vec2::Vec2;
use crate::game::config::PhysicsConfig;
use crate::game::menu::MenuCommand;
use crate::game::timing::TimingConstants;

// =============================================================================
// MODE
// =============================================================================

/// Coarse top-level state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Mode {
    /// Main menu shown, physics frozen
    #[default]
    MainMenu = 0,
    /// In the world
    Playing = 1,
}

/// Horizontal facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Facing {
    /// Toward x = 0
    Left = 0,
    /// Toward the right edge
    #[default]
    Right = 1,
}

// =============================================================================
// JUMP
// =============================================================================

/// In-progress variable-height jump.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JumpState {
    /// A jump is in progress and the button has not been released yet
    pub active: bool,
    /// Jump button still held since the jump began
    pub held: bool,
    /// Ticks the jump has been held since it began
    pub elapsed_frames: u32,
}

impl JumpState {
    /// Clear everything (landing, or a fresh state).
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Jump phase derived from the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JumpPhase {
    /// Standing on the platform
    Grounded,
    /// Held, upward thrust still decaying
    JumpRising,
    /// Held past the boost window; gravity alone acts
    JumpHeld,
    /// Airborne with no active jump (button released)
    Released,
}

// =============================================================================
// SWING
// =============================================================================

/// Melee swing timers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SwingState {
    /// Weapon out
    pub active: bool,
    /// Ticks since the swing began
    pub elapsed_frames: u32,
    /// Ticks left before a new swing may start
    pub cooldown_remaining: u32,
}

/// Swing phase derived from the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SwingPhase {
    /// Ready to swing
    Idle,
    /// Weapon out
    Swinging,
    /// Waiting for the cooldown to run out
    Cooldown,
}

impl SwingState {
    /// Current phase.
    #[inline]
    pub fn phase(&self) -> SwingPhase {
        if self.active {
            SwingPhase::Swinging
        } else if self.cooldown_remaining > 0 {
            SwingPhase::Cooldown
        } else {
            SwingPhase::Idle
        }
    }
}

// =============================================================================
// SIMULATION STATE
// =============================================================================

/// Complete simulation state.
///
/// Mutated only by [`tick`](crate::game::tick::tick) and
/// [`apply_menu_command`](Self::apply_menu_command).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Playing ticks simulated so far
    pub tick: u32,

    /// Top-left of the character's bounding box
    pub position: Vec2,

    /// Vertical velocity, positive = downward
    pub vertical_velocity: f64,

    /// Lower edge rests on the platform
    pub grounded: bool,

    /// Last nonzero horizontal direction
    pub facing: Facing,

    /// Variable-height jump
    pub jump: JumpState,

    /// Melee swing
    pub swing: SwingState,

    /// Menu or world
    pub mode: Mode,
}

impl SimulationState {
    /// Fresh state: on the platform at the spawn point, in the main menu.
    pub fn new(config: &PhysicsConfig) -> Self {
        Self {
            tick: 0,
            position: config.spawn_position(),
            vertical_velocity: 0.0,
            grounded: true,
            facing: Facing::Right,
            jump: JumpState::default(),
            swing: SwingState::default(),
            mode: Mode::MainMenu,
        }
    }

    /// Same as [`new`](Self::new) but already playing.
    pub fn new_playing(config: &PhysicsConfig) -> Self {
        Self {
            mode: Mode::Playing,
            ..Self::new(config)
        }
    }

    /// Is the world running?
    #[inline]
    pub fn is_playing(&self) -> bool {
        self.mode == Mode::Playing
    }

    /// Current jump phase.
    pub fn jump_phase(&self, timing: &TimingConstants) -> JumpPhase {
        if self.grounded {
            JumpPhase::Grounded
        } else if self.jump.active && self.jump.held {
            if self.jump.elapsed_frames < timing.max_jump_frames {
                JumpPhase::JumpRising
            } else {
                JumpPhase::JumpHeld
            }
        } else {
            JumpPhase::Released
        }
    }

    /// Current swing phase.
    #[inline]
    pub fn swing_phase(&self) -> SwingPhase {
        self.swing.phase()
    }

    /// Apply a command issued by the main menu.
    ///
    /// Only `StartGame` affects the core, and only from the main menu.
    /// Returns true if the mode changed.
    pub fn apply_menu_command(&mut self, command: MenuCommand) -> bool {
        match command {
            MenuCommand::StartGame if self.mode == Mode::MainMenu => {
                self.mode = Mode::Playing;
                true
            }
            _ => false,
        }
    }

    /// Hash the full state for replay verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, |hasher| {
            hasher.update_vec2(self.position);
            hasher.update_f64(self.vertical_velocity);
            hasher.update_bool(self.grounded);
            hasher.update_u8(self.facing as u8);
            hasher.update_bool(self.jump.active);
            hasher.update_bool(self.jump.held);
            hasher.update_u32(self.jump.elapsed_frames);
            hasher.update_bool(self.swing.active);
            hasher.update_u32(self.swing.elapsed_frames);
            hasher.update_u32(self.swing.cooldown_remaining);
            hasher.update_u8(self.mode as u8);
        })
    }
}
