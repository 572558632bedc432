//! World components
//!
//! Rendering only: every entity here mirrors part of the simulation state,
//! which lives in the [`Simulation`](super::Simulation) resource.

use bevy::prelude::*;

// ============================================================================
// WORLD
// ============================================================================

/// Anything spawned for the Playing state; despawned on exit
#[derive(Component)]
pub struct WorldEntity;

/// The character's body rectangle
#[derive(Component)]
pub struct CharacterSprite;

/// Weapon rectangle, visible only while swinging
#[derive(Component)]
pub struct WeaponSprite;

/// The static platform
#[derive(Component)]
pub struct PlatformSprite;

// ============================================================================
// COLORS
// ============================================================================

/// Character fill
pub const CHARACTER_COLOR: Color = Color::srgb(0.0, 1.0, 0.0);

/// Weapon fill
pub const WEAPON_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);

/// Platform fill
pub const PLATFORM_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);

/// Background
pub const CLEAR_COLOR: Color = Color::srgb(0.05, 0.05, 0.08);
