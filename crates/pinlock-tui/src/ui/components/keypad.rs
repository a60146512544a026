//! On-screen keypad
//!
//! A 4x3 grid of buttons, clickable with the mouse. Rendering and hit testing
//! share [`button_areas`] so a click always lands on the button drawn there.

use pinlock_core::KeypadKey;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::ui::Theme;

/// Button labels, row by row
pub const KEYPAD_LABELS: [[&str; 3]; 4] = [
    ["1", "2", "3"],
    ["4", "5", "6"],
    ["7", "8", "9"],
    ["clear", "0", "delete"],
];

/// Width of one button in cells
pub const BUTTON_WIDTH: u16 = 9;

/// Height of one button in cells
pub const BUTTON_HEIGHT: u16 = 3;

/// Size of the whole keypad
pub const KEYPAD_WIDTH: u16 = BUTTON_WIDTH * 3;
pub const KEYPAD_HEIGHT: u16 = BUTTON_HEIGHT * 4;

/// Every button with the area it occupies, for a keypad anchored at `area`
pub fn button_areas(area: Rect) -> Vec<(Rect, KeypadKey)> {
    let mut buttons = Vec::with_capacity(12);
    for (row, labels) in KEYPAD_LABELS.iter().enumerate() {
        for (col, label) in labels.iter().enumerate() {
            let Some(key) = KeypadKey::from_label(label) else {
                continue;
            };
            let rect = Rect::new(
                area.x + col as u16 * BUTTON_WIDTH,
                area.y + row as u16 * BUTTON_HEIGHT,
                BUTTON_WIDTH,
                BUTTON_HEIGHT,
            );
            // Buttons that do not fit are not drawn and cannot be clicked
            if rect.right() <= area.right() && rect.bottom() <= area.bottom() {
                buttons.push((rect, key));
            }
        }
    }
    buttons
}

/// Which button, if any, sits at a terminal cell
pub fn hit_test(area: Rect, column: u16, row: u16) -> Option<KeypadKey> {
    button_areas(area).into_iter().find_map(|(rect, key)| {
        let inside = column >= rect.x
            && column < rect.right()
            && row >= rect.y
            && row < rect.bottom();
        inside.then_some(key)
    })
}

/// Text drawn on a button
pub fn display_label(key: KeypadKey) -> String {
    match key {
        KeypadKey::Digit(c) => c.to_string(),
        KeypadKey::Clear => "Clear".to_string(),
        KeypadKey::Delete => "Del".to_string(),
    }
}

/// Render the keypad
pub fn render(frame: &mut Frame, area: Rect, theme: &Theme) {
    for (rect, key) in button_areas(area) {
        let style = match key {
            KeypadKey::Digit(_) => theme.key_button(),
            KeypadKey::Clear | KeypadKey::Delete => theme.text_secondary(),
        };
        let button = Paragraph::new(display_label(key))
            .style(style)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.border()),
            );
        frame.render_widget(button, rect);
    }
}
