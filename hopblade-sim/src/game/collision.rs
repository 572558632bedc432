//! Collision and Geometry
//!
//! One static platform spanning the screen width, axis-aligned boxes only.
//! No slopes, no side collision.

use crate::core::rect::Rect;
use crate::core::vec2::Vec2;
use crate::game::config::PhysicsConfig;
use crate::game::state::{Facing, SimulationState};

/// Character bounding box.
#[inline]
pub fn character_rect(state: &SimulationState, config: &PhysicsConfig) -> Rect {
    Rect::from_pos_size(state.position, config.character_size())
}

/// The platform: full screen width, from `platform_y` down by `platform_height`.
#[inline]
pub fn platform_rect(config: &PhysicsConfig) -> Rect {
    Rect::new(0.0, config.platform_y(), config.screen_width, config.platform_height)
}

/// Weapon hitbox while swinging.
///
/// Adjacent to the character on the facing side, vertically centred.
pub fn weapon_rect(state: &SimulationState, config: &PhysicsConfig) -> Option<Rect> {
    if !state.swing.active {
        return None;
    }

    let x = match state.facing {
        Facing::Right => state.position.x + config.character_width,
        Facing::Left => state.position.x - config.weapon_width,
    };
    let y = state.position.y + config.character_height / 2.0 - config.weapon_height / 2.0;

    Some(Rect::new(x, y, config.weapon_width, config.weapon_height))
}

/// Lower edge at or below the platform surface.
#[inline]
pub fn touches_ground(position: Vec2, config: &PhysicsConfig) -> bool {
    position.y + config.character_height >= config.platform_y()
}

/// Snap onto the platform if touching it.
///
/// Returns true on contact. On contact the character stands exactly on the
/// surface with zero vertical velocity and no active jump.
pub fn resolve_ground(state: &mut SimulationState, config: &PhysicsConfig) -> bool {
    if !touches_ground(state.position, config) {
        state.grounded = false;
        return false;
    }

    state.position.y = config.platform_y() - config.character_height;
    state.vertical_velocity = 0.0;
    state.grounded = true;
    state.jump.reset();
    true
}

/// Clamp X into `[0, screen_width - character_width]`.
#[inline]
pub fn clamp_to_screen(state: &mut SimulationState, config: &PhysicsConfig) {
    state.position.x = state.position.x.max(0.0).min(config.max_x());
}
