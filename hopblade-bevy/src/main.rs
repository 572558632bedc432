//! Hopblade - 2D platformer client
//!
//! One character, one platform: walk, jump higher the longer Z is held,
//! swing a blade with X. All game logic runs in the `hopblade` simulation.

mod game;
mod ui;

use bevy::prelude::*;
use bevy::window::WindowMode;
use bevy::render::camera::ScalingMode;

use game::{GamePlugin, Simulation, CLEAR_COLOR};
use ui::UiPlugin;

/// Game states
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    #[default]
    MainMenu,
    Playing,
}

fn main() {
    App::new()
        // Bevy defaults with custom window
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Hopblade".into(),
                resolution: (1280., 720.).into(),
                mode: WindowMode::Windowed,
                ..default()
            }),
            ..default()
        }))
        // Game state
        .init_state::<AppState>()
        // Our plugins
        .add_plugins((
            GamePlugin,
            UiPlugin,
        ))
        // Startup
        .add_systems(Startup, setup_2d_camera)
        .run();
}

/// 2D camera showing exactly the simulated screen
fn setup_2d_camera(mut commands: Commands, sim: Res<Simulation>) {
    commands.spawn((
        Camera2d,
        Camera {
            clear_color: ClearColorConfig::Custom(CLEAR_COLOR),
            ..default()
        },
        OrthographicProjection {
            scaling_mode: ScalingMode::Fixed {
                width: sim.config.screen_width as f32,
                height: sim.config.screen_height as f32,
            },
            ..OrthographicProjection::default_2d()
        },
    ));

    info!("Hopblade initialized!");
}
