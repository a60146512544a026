//! UI rendering

pub mod components;
pub mod layout;
pub mod screens;
pub mod theme;

pub use theme::Theme;

use std::time::Instant;

use pinlock_core::ViewState;
use ratatui::prelude::*;

use crate::app::App;

/// Main render function - delegates to the screen the gate is showing
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    match app.gate.screen() {
        ViewState::PinEntry => {
            app.state.keypad_area = Some(screens::pin_entry::layout(area).keypad);
            screens::pin_entry::render(frame, area, app);
        }
        ViewState::Dashboard => {
            app.state.keypad_area = None;
            screens::dashboard::render(frame, area, app, Instant::now());
        }
    }
}
