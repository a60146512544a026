//! Visual theme and color palette

use ratatui::style::{Color, Modifier, Style};

/// Pinlock color palette
pub struct Theme {
    // Primary branding colors
    pub brand: Color,
    pub brand_dark: Color,
    pub surface: Color,

    // Status colors
    pub success: Color,
    pub danger: Color,

    // UI element colors
    pub border: Color,
    pub border_focused: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub selection: Color,

    // Amounts
    pub credit: Color,
    pub debit: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            // Primary branding - SecureBank indigo
            brand: Color::Rgb(102, 126, 234),     // #667EEA
            brand_dark: Color::Rgb(118, 75, 162), // #764BA2
            surface: Color::Rgb(26, 32, 44),      // #1A202C

            // Status colors
            success: Color::Rgb(56, 161, 105), // #38A169 - Green
            danger: Color::Rgb(229, 62, 62),   // #E53E3E - Red

            // UI elements
            border: Color::Rgb(74, 85, 104),           // #4A5568
            border_focused: Color::Rgb(102, 126, 234), // #667EEA
            text_primary: Color::Rgb(247, 250, 252),   // #F7FAFC
            text_secondary: Color::Rgb(203, 213, 224), // #CBD5E0
            text_muted: Color::Rgb(113, 128, 150),     // #718096
            selection: Color::Rgb(45, 55, 72),         // #2D3748

            credit: Color::Rgb(56, 161, 105),
            debit: Color::Rgb(229, 62, 62),
        }
    }
}

impl Theme {
    /// Get default text style
    pub fn text(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    /// Get secondary text style
    pub fn text_secondary(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }

    /// Get muted text style
    pub fn text_muted(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    /// Get highlighted text style
    pub fn text_highlight(&self) -> Style {
        Style::default().fg(self.brand).add_modifier(Modifier::BOLD)
    }

    /// Get title style
    pub fn title(&self) -> Style {
        Style::default().fg(self.brand).add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn border_focused(&self) -> Style {
        Style::default().fg(self.border_focused)
    }

    pub fn danger(&self) -> Style {
        Style::default().fg(self.danger).add_modifier(Modifier::BOLD)
    }

    /// Get menu item style
    pub fn menu_item(&self, selected: bool) -> Style {
        if selected {
            Style::default()
                .bg(self.selection)
                .fg(self.brand)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.text_primary)
        }
    }

    /// Pressed action card
    pub fn pressed(&self) -> Style {
        Style::default()
            .bg(self.brand_dark)
            .fg(self.text_primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for a signed amount
    pub fn amount(&self, amount: i64) -> Style {
        if amount < 0 {
            Style::default().fg(self.debit)
        } else {
            Style::default().fg(self.credit)
        }
    }

    /// Get PIN dot style
    pub fn pin_dot(&self) -> Style {
        Style::default().fg(self.brand).add_modifier(Modifier::BOLD)
    }

    /// Get PIN placeholder style
    pub fn pin_placeholder(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    /// PIN dots after a correct PIN
    pub fn pin_success(&self) -> Style {
        Style::default().fg(self.success).add_modifier(Modifier::BOLD)
    }

    /// Keypad button
    pub fn key_button(&self) -> Style {
        Style::default().fg(self.text_primary).bg(self.surface)
    }

    /// Create a high-contrast theme variant
    pub fn high_contrast() -> Self {
        Self {
            text_primary: Color::White,
            text_secondary: Color::White,
            text_muted: Color::Gray,
            border: Color::White,
            border_focused: Color::Yellow,
            brand: Color::Yellow,
            ..Self::default()
        }
    }
}
