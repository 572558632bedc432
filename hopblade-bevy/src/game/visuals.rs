//! Visuals - rectangles that mirror the simulation
//!
//! The simulation uses screen coordinates (origin top-left, y down); the
//! camera shows the screen centred on the world origin with y up.

use bevy::prelude::*;
use hopblade::core::rect::Rect;
use hopblade::game::collision::{character_rect, platform_rect, weapon_rect};
use hopblade::PhysicsConfig;

use super::{
    Simulation, WorldEntity, CharacterSprite, WeaponSprite, PlatformSprite,
    CHARACTER_COLOR, WEAPON_COLOR, PLATFORM_COLOR,
};

/// Draw order (higher is in front)
const PLATFORM_Z: f32 = 0.0;
const CHARACTER_Z: f32 = 10.0;
const WEAPON_Z: f32 = 11.0;

// ============================================================================
// COORDINATES
// ============================================================================

/// World-space centre of a simulation rectangle.
pub fn rect_to_world(rect: &Rect, config: &PhysicsConfig) -> Vec2 {
    let center = rect.center();
    Vec2::new(
        (center.x - config.screen_width / 2.0) as f32,
        (config.screen_height / 2.0 - center.y) as f32,
    )
}

/// Sprite size of a simulation rectangle.
pub fn rect_size(rect: &Rect) -> Vec2 {
    Vec2::new(rect.w as f32, rect.h as f32)
}

// ============================================================================
// SETUP / CLEANUP
// ============================================================================

/// Spawn the platform, character and (hidden) weapon
pub fn setup_world(mut commands: Commands, sim: Res<Simulation>) {
    let config = &sim.config;

    let platform = platform_rect(config);
    commands.spawn((
        Sprite::from_color(PLATFORM_COLOR, rect_size(&platform)),
        Transform::from_translation(rect_to_world(&platform, config).extend(PLATFORM_Z)),
        PlatformSprite,
        WorldEntity,
    ));

    let body = character_rect(&sim.state, config);
    commands.spawn((
        Sprite::from_color(CHARACTER_COLOR, rect_size(&body)),
        Transform::from_translation(rect_to_world(&body, config).extend(CHARACTER_Z)),
        CharacterSprite,
        WorldEntity,
        Name::new("Character"),
    ));

    commands.spawn((
        Sprite::from_color(
            WEAPON_COLOR,
            Vec2::new(config.weapon_width as f32, config.weapon_height as f32),
        ),
        Transform::from_xyz(0.0, 0.0, WEAPON_Z),
        Visibility::Hidden,
        WeaponSprite,
        WorldEntity,
    ));

    info!("World ready");
}

pub fn cleanup_world(mut commands: Commands, entities: Query<Entity, With<WorldEntity>>) {
    for entity in entities.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

// ============================================================================
// SYNC
// ============================================================================

/// Move the character rectangle to the simulated position
pub fn sync_character(
    sim: Res<Simulation>,
    mut query: Query<&mut Transform, With<CharacterSprite>>,
) {
    let Ok(mut transform) = query.get_single_mut() else {
        return;
    };

    let body = character_rect(&sim.state, &sim.config);
    let pos = rect_to_world(&body, &sim.config);
    transform.translation.x = pos.x;
    transform.translation.y = pos.y;
}

/// Show the weapon on the facing side while a swing is active
pub fn sync_weapon(
    sim: Res<Simulation>,
    mut query: Query<(&mut Transform, &mut Visibility), With<WeaponSprite>>,
) {
    let Ok((mut transform, mut visibility)) = query.get_single_mut() else {
        return;
    };

    match weapon_rect(&sim.state, &sim.config) {
        Some(rect) => {
            let pos = rect_to_world(&rect, &sim.config);
            transform.translation.x = pos.x;
            transform.translation.y = pos.y;
            *visibility = Visibility::Inherited;
        }
        None => *visibility = Visibility::Hidden,
    }
}
