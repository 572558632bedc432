//! Main Menu Commands
//!
//! Buttons do not capture the game; a click resolves to a [`MenuCommand`]
//! value and the host loop decides what to do with it.

use serde::{Serialize, Deserialize};

use crate::core::rect::Rect;
use crate::core::vec2::Vec2;

/// What a menu click asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MenuCommand {
    /// Click hit nothing
    #[default]
    None,
    /// Enter the world
    StartGame,
    /// Settings screen (not implemented; hosts log it)
    OpenSettings,
    /// Leave the program
    Quit,
}

/// A labeled clickable region.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MenuButton {
    /// Screen-space region, edges inclusive
    pub rect: Rect,
    /// Caption
    pub label: String,
    /// Issued on click
    pub command: MenuCommand,
}

impl MenuButton {
    /// Create a button.
    pub fn new(rect: Rect, label: impl Into<String>, command: MenuCommand) -> Self {
        Self {
            rect,
            label: label.into(),
            command,
        }
    }

    /// Pointer is over this button.
    #[inline]
    pub fn is_hovered(&self, pointer: Vec2) -> bool {
        self.rect.contains(pointer)
    }
}

/// Main menu layout: Play, Settings, Quit stacked at x=100.
pub fn main_menu_buttons() -> Vec<MenuButton> {
    const X: f64 = 100.0;
    const WIDTH: f64 = 200.0;
    const HEIGHT: f64 = 50.0;

    [
        ("Play", MenuCommand::StartGame),
        ("Settings", MenuCommand::OpenSettings),
        ("Quit", MenuCommand::Quit),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (label, command))| {
        let y = 100.0 + 100.0 * i as f64;
        MenuButton::new(Rect::new(X, y, WIDTH, HEIGHT), label, command)
    })
    .collect()
}

/// Command of the first button under the pointer.
pub fn hit_test(buttons: &[MenuButton], pointer: Vec2) -> MenuCommand {
    buttons
        .iter()
        .find(|b| b.is_hovered(pointer))
        .map(|b| b.command)
        .unwrap_or(MenuCommand::None)
}
