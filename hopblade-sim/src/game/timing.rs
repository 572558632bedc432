//! Timing Calibration
//!
//! Converts real-world durations into frame counts for a given tick rate,
//! so a 0.25s swing stays 0.25s on a 60 Hz and on a 144 Hz display.

use serde::{Serialize, Deserialize};

use crate::game::config::PhysicsConfig;

/// Frame-count constants derived once from the tick rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimingConstants {
    /// Tick rate these constants were derived from (ticks per second)
    pub tick_rate: u32,
    /// Ticks of held jump during which upward thrust decays (>= 1)
    pub max_jump_frames: u32,
    /// Ticks a swing stays active (>= 1)
    pub swing_duration: u32,
    /// Ticks after a swing before the next one may start
    pub swing_cooldown: u32,
}

impl TimingConstants {
    /// Derive frame counts for `tick_rate` ticks per second.
    ///
    /// `max_jump_frames` and `swing_duration` never drop below 1, including
    /// for a tick rate of 0; the jump decay divides by `max_jump_frames`.
    pub fn calibrate(tick_rate: u32, config: &PhysicsConfig) -> Self {
        let rate = f64::from(tick_rate);

        Self {
            tick_rate,
            max_jump_frames: frames(rate, config.jump_hold_divisor).max(1),
            swing_duration: frames(rate, config.swing_duration_divisor).max(1),
            swing_cooldown: frames(rate, config.swing_cooldown_divisor),
        }
    }
}

impl Default for TimingConstants {
    fn default() -> Self {
        Self::calibrate(crate::DEFAULT_TICK_RATE, &PhysicsConfig::default())
    }
}

/// `round(rate / divisor)` as a frame count; non-finite results give 0.
#[inline]
fn frames(rate: f64, divisor: f64) -> u32 {
    let value = (rate / divisor).round();
    if value.is_finite() && value > 0.0 {
        // Saturating float-to-int cast
        value as u32
    } else {
        0
    }
}
