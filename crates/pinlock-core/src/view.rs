//! Observable view state

use serde::{Deserialize, Serialize};

use crate::events::GateEvent;
use crate::verifier::Verdict;
use crate::{CODE_LENGTH, INCORRECT_PIN_MESSAGE};

/// Which screen is visible. Exactly one of the two is shown at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    #[default]
    PinEntry,
    Dashboard,
}

/// Colouring of the indicator slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorTone {
    #[default]
    Normal,
    /// Shown between a successful verification and the screen switch
    Success,
}

/// Everything a front-end needs to draw the gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub screen: ViewState,
    /// One entry per code position, `true` when filled
    pub indicators: Vec<bool>,
    pub tone: IndicatorTone,
    /// Empty, or the incorrect PIN message
    pub error_text: String,
    pub shaking: bool,
}

impl ViewSnapshot {
    pub fn filled(&self) -> usize {
        self.indicators.iter().filter(|filled| **filled).count()
    }

    pub fn is_visible(&self, screen: ViewState) -> bool {
        self.screen == screen
    }
}

/// Reacts to gate events and keeps the display state.
#[derive(Debug, Clone)]
pub struct ViewController {
    screen: ViewState,
    filled: usize,
    tone: IndicatorTone,
    error: Option<&'static str>,
    shaking: bool,
}

impl ViewController {
    pub fn new(screen: ViewState) -> Self {
        Self {
            screen,
            filled: 0,
            tone: IndicatorTone::Normal,
            error: None,
            shaking: false,
        }
    }

    pub fn apply(&mut self, event: &GateEvent) {
        match event {
            GateEvent::BufferChanged { len } => {
                self.filled = (*len).min(CODE_LENGTH);
            }
            GateEvent::UserEdit => {
                self.error = None;
            }
            GateEvent::Verified(Verdict::Success) => {
                self.error = None;
                self.tone = IndicatorTone::Success;
            }
            GateEvent::Verified(Verdict::Failure) => {
                self.error = Some(INCORRECT_PIN_MESSAGE);
                self.shaking = true;
            }
            GateEvent::ShakeEnded => {
                self.shaking = false;
            }
            GateEvent::ScreenChanged(screen) => {
                self.screen = *screen;
                self.reset_feedback();
            }
            GateEvent::LoggedOut => {
                self.screen = ViewState::PinEntry;
                self.reset_feedback();
            }
        }
    }

    fn reset_feedback(&mut self) {
        self.tone = IndicatorTone::Normal;
        self.error = None;
        self.shaking = false;
    }

    pub fn screen(&self) -> ViewState {
        self.screen
    }

    pub fn error_text(&self) -> &str {
        self.error.unwrap_or("")
    }

    pub fn is_shaking(&self) -> bool {
        self.shaking
    }

    pub fn tone(&self) -> IndicatorTone {
        self.tone
    }

    pub fn indicators(&self) -> Vec<bool> {
        (0..CODE_LENGTH).map(|i| i < self.filled).collect()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            screen: self.screen,
            indicators: self.indicators(),
            tone: self.tone,
            error_text: self.error_text().to_string(),
            shaking: self.shaking,
        }
    }
}
