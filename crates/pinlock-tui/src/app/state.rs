//! Application state

use std::time::Instant;

use pinlock_core::ViewState;
use ratatui::layout::Rect;

use crate::dashboard::DashboardState;

/// UI state that lives beside the gate
#[derive(Debug)]
pub struct AppState {
    /// Dashboard selections and animations
    pub dashboard: DashboardState,

    /// Where the keypad was last drawn, for mouse hit testing
    pub keypad_area: Option<Rect>,

    /// Screen shown on the previous frame
    pub last_screen: ViewState,
}

impl AppState {
    /// Create the state for a gate currently showing `screen`
    pub fn new(screen: ViewState, now: Instant) -> Self {
        Self {
            dashboard: DashboardState::new(now),
            keypad_area: None,
            last_screen: screen,
        }
    }
}
