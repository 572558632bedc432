//! UI module - main menu
//!
//! Buttons are laid out from the simulation's menu model; a press resolves
//! to a [`MenuCommand`] which is applied here, outside the button.

use bevy::prelude::*;
use hopblade::game::menu::{main_menu_buttons, MenuCommand};

use crate::AppState;
use crate::game::Simulation;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app
            .add_systems(OnEnter(AppState::MainMenu), setup_main_menu)
            .add_systems(OnExit(AppState::MainMenu), cleanup_main_menu)
            .add_systems(Update, handle_menu_buttons.run_if(in_state(AppState::MainMenu)));
    }
}

/// Marker for main menu UI
#[derive(Component)]
struct MainMenuUI;

/// Command issued by a button
#[derive(Component)]
struct MenuAction(MenuCommand);

const BUTTON_IDLE: Color = Color::srgb(0.15, 0.2, 0.35);
const BUTTON_HOVER: Color = Color::srgb(0.2, 0.35, 0.6);
const BUTTON_PRESSED: Color = Color::srgb(0.3, 0.5, 0.8);
const BORDER_IDLE: Color = Color::srgb(0.3, 0.5, 0.8);
const BORDER_HOVER: Color = Color::srgb(0.5, 0.7, 1.0);

/// Setup main menu UI
fn setup_main_menu(mut commands: Commands) {
    info!("Setting up main menu...");

    // Root container
    commands.spawn((
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        },
        BackgroundColor(Color::srgba(0.02, 0.02, 0.05, 0.98)),
        MainMenuUI,
    )).with_children(|parent| {
        // Title
        parent.spawn((
            Text::new("HOPBLADE"),
            TextFont {
                font_size: 72.0,
                ..default()
            },
            TextColor(Color::srgb(0.4, 0.8, 1.2)),
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(400.0),
                top: Val::Px(100.0),
                ..default()
            },
        ));

        for button in main_menu_buttons() {
            spawn_menu_button(parent, &button);
        }

        // Instructions
        parent.spawn((
            Text::new("Arrows to move | Z jump (hold for height) | X swing | Enter to start"),
            TextFont {
                font_size: 16.0,
                ..default()
            },
            TextColor(Color::srgb(0.4, 0.4, 0.5)),
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(100.0),
                top: Val::Px(420.0),
                ..default()
            },
        ));
    });
}

/// Spawn a menu button at its layout rectangle
fn spawn_menu_button(parent: &mut ChildBuilder, button: &hopblade::game::menu::MenuButton) {
    let rect = button.rect;

    parent.spawn((
        Button,
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(rect.x as f32),
            top: Val::Px(rect.y as f32),
            width: Val::Px(rect.w as f32),
            height: Val::Px(rect.h as f32),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            border: UiRect::all(Val::Px(2.0)),
            ..default()
        },
        BorderColor(BORDER_IDLE),
        BackgroundColor(BUTTON_IDLE),
        MenuAction(button.command),
    )).with_children(|parent| {
        parent.spawn((
            Text::new(button.label.clone()),
            TextFont {
                font_size: 26.0,
                ..default()
            },
            TextColor(Color::WHITE),
        ));
    });
}

/// Handle menu button clicks
fn handle_menu_buttons(
    mut interaction_query: Query<
        (&Interaction, &MenuAction, &mut BackgroundColor, &mut BorderColor),
        Changed<Interaction>,
    >,
    mut sim: ResMut<Simulation>,
    mut app_state: ResMut<NextState<AppState>>,
    mut exit: EventWriter<AppExit>,
) {
    for (interaction, action, mut bg_color, mut border_color) in interaction_query.iter_mut() {
        match *interaction {
            Interaction::Pressed => {
                match action.0 {
                    MenuCommand::StartGame => {
                        info!("Play clicked!");
                        if sim.state.apply_menu_command(MenuCommand::StartGame) {
                            app_state.set(AppState::Playing);
                        }
                    }
                    MenuCommand::OpenSettings => {
                        info!("Settings clicked (no settings screen yet)");
                    }
                    MenuCommand::Quit => {
                        info!("Quit clicked!");
                        exit.send(AppExit::Success);
                    }
                    MenuCommand::None => {}
                }
                *bg_color = BackgroundColor(BUTTON_PRESSED);
            }
            Interaction::Hovered => {
                *bg_color = BackgroundColor(BUTTON_HOVER);
                *border_color = BorderColor(BORDER_HOVER);
            }
            Interaction::None => {
                *bg_color = BackgroundColor(BUTTON_IDLE);
                *border_color = BorderColor(BORDER_IDLE);
            }
        }
    }
}

/// Cleanup main menu
fn cleanup_main_menu(
    mut commands: Commands,
    query: Query<Entity, With<MainMenuUI>>,
) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
