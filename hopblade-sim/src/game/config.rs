//! Physics Configuration and Profiles
//!
//! Every tunable constant of the simulation lives in [`PhysicsConfig`].
//! Historical game variants differ only in their constants, so each one
//! is a named [`Profile`] rather than a separate state machine.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;

/// Tunable simulation constants.
///
/// Distances are pixels, speeds are pixels per tick, gravity is pixels per
/// tick squared. Divisors turn the tick rate into frame counts (see
/// [`TimingConstants`](crate::game::timing::TimingConstants)).
///
/// Deserialization fills missing fields from the classic profile, so a
/// config file only needs the values it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Logical screen width
    pub screen_width: f64,
    /// Logical screen height
    pub screen_height: f64,
    /// Character bounding box width
    pub character_width: f64,
    /// Character bounding box height
    pub character_height: f64,
    /// Platform thickness; the platform surface sits this far above the screen bottom
    pub platform_height: f64,
    /// Downward acceleration added every tick
    pub gravity: f64,
    /// Initial vertical velocity of a jump (negative = up)
    pub jump_speed: f64,
    /// Upward velocity cap applied when the jump button is released early
    pub min_jump_speed: f64,
    /// Horizontal displacement per tick while a direction is held
    pub move_speed: f64,
    /// Weapon hitbox width
    pub weapon_width: f64,
    /// Weapon hitbox height
    pub weapon_height: f64,
    /// `max_jump_frames = round(tick_rate / jump_hold_divisor)`
    pub jump_hold_divisor: f64,
    /// `swing_duration = round(tick_rate / swing_duration_divisor)`
    pub swing_duration_divisor: f64,
    /// `swing_cooldown = round(tick_rate / swing_cooldown_divisor)`
    pub swing_cooldown_divisor: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Profile::Classic.config()
    }
}

impl PhysicsConfig {
    /// Y coordinate of the platform's top surface.
    #[inline]
    pub fn platform_y(&self) -> f64 {
        self.screen_height - self.platform_height
    }

    /// Largest legal `position.x`.
    #[inline]
    pub fn max_x(&self) -> f64 {
        self.screen_width - self.character_width
    }

    /// Character size as a vector.
    #[inline]
    pub fn character_size(&self) -> Vec2 {
        Vec2::new(self.character_width, self.character_height)
    }

    /// Spawn point: horizontally centred, standing on the platform.
    pub fn spawn_position(&self) -> Vec2 {
        Vec2::new(
            self.screen_width / 2.0,
            self.platform_y() - self.character_height,
        )
    }

    /// Load a config from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the simulation cannot run sensibly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("character_width", self.character_width),
            ("character_height", self.character_height),
            ("weapon_width", self.weapon_width),
            ("weapon_height", self.weapon_height),
            ("jump_hold_divisor", self.jump_hold_divisor),
            ("swing_duration_divisor", self.swing_duration_divisor),
            ("swing_cooldown_divisor", self.swing_cooldown_divisor),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }

        let finite = [
            ("platform_height", self.platform_height),
            ("gravity", self.gravity),
            ("jump_speed", self.jump_speed),
            ("min_jump_speed", self.min_jump_speed),
            ("move_speed", self.move_speed),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("{name} must be finite")));
            }
        }

        if self.character_width > self.screen_width {
            return Err(ConfigError::Invalid(
                "character is wider than the screen".to_string(),
            ));
        }
        if self.platform_y() < self.character_height {
            return Err(ConfigError::Invalid(
                "platform leaves no room for the character".to_string(),
            ));
        }
        if !(self.jump_speed <= self.min_jump_speed && self.min_jump_speed <= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "min_jump_speed ({}) must lie between jump_speed ({}) and 0",
                self.min_jump_speed, self.jump_speed
            )));
        }

        Ok(())
    }
}

/// Named constant sets, one per historical game variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// The shipped game: long 0.83s boost window.
    #[default]
    Classic,
    /// 0.67s boost window.
    Floaty,
    /// Short 0.33s boost window.
    Snappy,
}

impl Profile {
    /// All profiles, in declaration order.
    pub const ALL: [Profile; 3] = [Profile::Classic, Profile::Floaty, Profile::Snappy];

    /// Lowercase profile name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Profile::Classic => "classic",
            Profile::Floaty => "floaty",
            Profile::Snappy => "snappy",
        }
    }

    /// Build the full constant set for this profile.
    pub fn config(self) -> PhysicsConfig {
        let jump_hold_divisor = match self {
            Profile::Classic => 1.2,
            Profile::Floaty => 1.5,
            Profile::Snappy => 3.0,
        };

        PhysicsConfig {
            screen_width: 1280.0,
            screen_height: 720.0,
            character_width: 50.0,
            character_height: 80.0,
            platform_height: 20.0,
            gravity: 0.9,
            jump_speed: -12.0,
            min_jump_speed: -3.0,
            move_speed: 5.0,
            weapon_width: 80.0,
            weapon_height: 20.0,
            jump_hold_divisor,
            swing_duration_divisor: 4.0,
            swing_cooldown_divisor: 4.0,
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Profile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Profile::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownProfile(s.to_string()))
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read config file {path:?}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for a physics config
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range
    #[error("invalid config: {0}")]
    Invalid(String),

    /// Profile name not recognised
    #[error("unknown profile '{0}' (expected classic, floaty or snappy)")]
    UnknownProfile(String),
}
