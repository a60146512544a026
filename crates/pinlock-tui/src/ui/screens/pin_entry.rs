//! PIN entry screen for authentication

use pinlock_core::{IndicatorTone, ViewSnapshot};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;
use crate::ui::components::keypad::{self, KEYPAD_HEIGHT, KEYPAD_WIDTH};
use crate::ui::layout::{centered_rect_fixed, offset_x, render_footer};

/// Dialog size
const DIALOG_WIDTH: u16 = 45;
const DIALOG_HEIGHT: u16 = 26;

/// Horizontal travel of the shake effect
const SHAKE_OFFSET: i16 = 2;

/// Areas of the PIN screen
pub struct PinEntryLayout {
    pub dialog: Rect,
    pub title: Rect,
    pub instructions: Rect,
    pub indicators: Rect,
    pub error: Rect,
    pub keypad: Rect,
    pub footer: Rect,
}

/// Compute the PIN screen layout for the full terminal area
pub fn layout(area: Rect) -> PinEntryLayout {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(DIALOG_HEIGHT), Constraint::Length(2)])
        .split(area);

    let dialog = centered_rect_fixed(DIALOG_WIDTH, DIALOG_HEIGHT, outer[0]);
    let inner = Block::default().borders(Borders::ALL).inner(dialog);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2),             // Title
            Constraint::Length(2),             // Instructions
            Constraint::Length(2),             // PIN display
            Constraint::Length(2),             // Error message
            Constraint::Length(KEYPAD_HEIGHT), // Keypad
            Constraint::Min(0),                // Spacer
        ])
        .split(inner);

    PinEntryLayout {
        dialog,
        title: chunks[0],
        instructions: chunks[1],
        indicators: chunks[2],
        error: chunks[3],
        keypad: centered_rect_fixed(KEYPAD_WIDTH, KEYPAD_HEIGHT, chunks[4]),
        footer: outer[1],
    }
}

/// Indicator slots as styled spans
fn indicator_line<'a>(snapshot: &ViewSnapshot, app: &App) -> Line<'a> {
    let theme = &app.theme;
    let filled_style = match snapshot.tone {
        IndicatorTone::Normal => theme.pin_dot(),
        IndicatorTone::Success => theme.pin_success(),
    };

    let mut spans = Vec::with_capacity(snapshot.indicators.len() * 2);
    for (i, filled) in snapshot.indicators.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("   "));
        }
        if *filled {
            spans.push(Span::styled("●", filled_style));
        } else {
            spans.push(Span::styled("○", theme.pin_placeholder()));
        }
    }
    Line::from(spans)
}

/// Draw the PIN entry screen
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let snapshot = app.gate.snapshot();
    let areas = layout(area);

    // Dialog box
    let block = Block::default()
        .title(" Authentication Required ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border_focused());
    frame.render_widget(block, areas.dialog);

    // Logo/title
    let title = Paragraph::new("◆ SECUREBANK")
        .style(theme.title())
        .alignment(Alignment::Center);
    frame.render_widget(title, areas.title);

    // Instructions
    let instructions = Paragraph::new(format!(
        "Enter your {}-digit PIN",
        snapshot.indicators.len()
    ))
    .style(theme.text_secondary())
    .alignment(Alignment::Center);
    frame.render_widget(instructions, areas.instructions);

    // PIN display, shaken after a wrong PIN
    let indicators_area = if snapshot.shaking {
        let dx = if app.tick % 2 == 0 {
            SHAKE_OFFSET
        } else {
            -SHAKE_OFFSET
        };
        offset_x(areas.indicators, dx, areas.dialog)
    } else {
        areas.indicators
    };
    let pin_widget = Paragraph::new(indicator_line(&snapshot, app)).alignment(Alignment::Center);
    frame.render_widget(pin_widget, indicators_area);

    // Error message
    if !snapshot.error_text.is_empty() {
        let error_widget = Paragraph::new(snapshot.error_text.as_str())
            .style(theme.danger())
            .alignment(Alignment::Center);
        frame.render_widget(error_widget, areas.error);
    }

    keypad::render(frame, areas.keypad, theme);

    render_footer(
        frame,
        areas.footer,
        &[
            ("0-9", "Digit"),
            ("Backspace", "Delete"),
            ("Esc", "Clear"),
            ("Enter", "Unlock"),
            ("Ctrl+C", "Quit"),
        ],
        theme,
    );
}
