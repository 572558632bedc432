//! Simulation Events
//!
//! Emitted by the tick for logging and replay checks. The state is
//! authoritative; events only describe transitions that happened.

use std::fmt;

use serde::{Serialize, Deserialize};
use crate::game::state::Mode;

/// Event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SimEventData {
    /// Top-level mode changed
    ModeChanged {
        /// Mode before the change
        old_mode: Mode,
        /// Mode after the change
        new_mode: Mode,
    },

    /// Character left the ground
    JumpStarted {
        /// Upward launch velocity
        velocity: f64,
    },

    /// Jump button released during an active jump
    JumpReleased {
        /// Upward velocity was cut to the short-hop cap
        clamped: bool,
        /// Ticks the jump was held before release
        held_frames: u32,
    },

    /// Character came back down onto the platform
    Landed {
        /// Downward speed just before the snap
        fall_speed: f64,
    },

    /// Swing began
    SwingStarted,

    /// Swing finished and cooldown began
    SwingEnded {
        /// Cooldown length in frames
        cooldown: u32,
    },

    /// Cooldown elapsed; a new swing may start
    SwingReady,
}

/// An event with the tick it occurred on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Event data
    pub data: SimEventData,
}

impl SimEvent {
    /// Create a new event.
    pub fn new(tick: u32, data: SimEventData) -> Self {
        Self { tick, data }
    }

    /// Mode change event.
    pub fn mode_changed(tick: u32, old_mode: Mode, new_mode: Mode) -> Self {
        Self::new(tick, SimEventData::ModeChanged { old_mode, new_mode })
    }

    /// Jump start event.
    pub fn jump_started(tick: u32, velocity: f64) -> Self {
        Self::new(tick, SimEventData::JumpStarted { velocity })
    }

    /// Jump release event.
    pub fn jump_released(tick: u32, clamped: bool, held_frames: u32) -> Self {
        Self::new(tick, SimEventData::JumpReleased { clamped, held_frames })
    }

    /// Landing event.
    pub fn landed(tick: u32, fall_speed: f64) -> Self {
        Self::new(tick, SimEventData::Landed { fall_speed })
    }

    /// Swing start event.
    pub fn swing_started(tick: u32) -> Self {
        Self::new(tick, SimEventData::SwingStarted)
    }

    /// Swing end event.
    pub fn swing_ended(tick: u32, cooldown: u32) -> Self {
        Self::new(tick, SimEventData::SwingEnded { cooldown })
    }

    /// Swing ready event.
    pub fn swing_ready(tick: u32) -> Self {
        Self::new(tick, SimEventData::SwingReady)
    }
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            SimEventData::ModeChanged { old_mode, new_mode } => {
                write!(f, "[{}] mode {:?} -> {:?}", self.tick, old_mode, new_mode)
            }
            SimEventData::JumpStarted { velocity } => {
                write!(f, "[{}] jump (vy {:.2})", self.tick, velocity)
            }
            SimEventData::JumpReleased { clamped, held_frames } => {
                write!(
                    f,
                    "[{}] jump released after {} frames{}",
                    self.tick,
                    held_frames,
                    if *clamped { " (short hop)" } else { "" }
                )
            }
            SimEventData::Landed { fall_speed } => {
                write!(f, "[{}] landed (fall speed {:.2})", self.tick, fall_speed)
            }
            SimEventData::SwingStarted => write!(f, "[{}] swing", self.tick),
            SimEventData::SwingEnded { cooldown } => {
                write!(f, "[{}] swing ended, cooldown {}", self.tick, cooldown)
            }
            SimEventData::SwingReady => write!(f, "[{}] swing ready", self.tick),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_constructors() {
        let event = SimEvent::jump_released(12, true, 3);
        assert_eq!(event.tick, 12);
        assert_eq!(
            event.data,
            SimEventData::JumpReleased { clamped: true, held_frames: 3 }
        );

        let event = SimEvent::mode_changed(0, Mode::MainMenu, Mode::Playing);
        assert!(matches!(
            event.data,
            SimEventData::ModeChanged { new_mode: Mode::Playing, .. }
        ));
    }

    #[test]
    fn test_event_display() {
        assert_eq!(
            SimEvent::jump_released(7, true, 2).to_string(),
            "[7] jump released after 2 frames (short hop)"
        );
        assert_eq!(SimEvent::swing_ended(30, 15).to_string(), "[30] swing ended, cooldown 15");
        assert_eq!(SimEvent::swing_started(1).to_string(), "[1] swing");
    }

    #[test]
    fn test_event_serialization() {
        let event = SimEvent::landed(40, 9.3);
        let json = serde_json::to_string(&event).unwrap();
        let restored: SimEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, event);
    }
}
