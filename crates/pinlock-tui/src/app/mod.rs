//! Application state and event handling

pub mod config;
pub mod keys;
mod state;

pub use config::{ConfigError, SecretSource, TuiConfig};
pub use state::AppState;

use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use pinlock_core::{PinGate, SessionStore, ViewState};
use ratatui::prelude::*;

use crate::ui::{self, components::keypad, Theme};

/// Redraw interval, also drives the shake animation
const TICK_RATE: Duration = Duration::from_millis(50);

/// Main application struct
pub struct App {
    /// The PIN gate
    pub gate: PinGate,

    /// UI state
    pub state: AppState,

    /// Colour palette
    pub theme: Theme,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Tick counter for animations
    pub tick: u64,

    /// Last tick time
    last_tick: Instant,
}

impl App {
    /// Create the application from its configuration and session store
    pub fn new(config: &TuiConfig, store: Box<dyn SessionStore>) -> anyhow::Result<Self> {
        let provider = config
            .secret
            .provider()
            .context("Invalid secret configuration")?;

        let gate = PinGate::from_provider(config.gate_config(), provider.as_ref(), store)
            .with_context(|| match &config.secret {
                SecretSource::Env { var } => format!(
                    "No PIN configured: set {} to a 6-digit PIN or configure the secret in config.json",
                    var
                ),
                SecretSource::Inline { .. } => "Invalid PIN in config.json".to_string(),
            })?;

        let theme = if config.high_contrast {
            Theme::high_contrast()
        } else {
            Theme::default()
        };

        Ok(Self::with_gate(gate, theme))
    }

    /// Create the application around an existing gate
    pub fn with_gate(gate: PinGate, theme: Theme) -> Self {
        let now = Instant::now();
        let state = AppState::new(gate.screen(), now);
        Self {
            gate,
            state,
            theme,
            should_quit: false,
            tick: 0,
            last_tick: now,
        }
    }

    /// Run the application main loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        tracing::info!(screen = ?self.gate.screen(), "Starting event loop");

        while !self.should_quit {
            terminal.draw(|frame| ui::render(frame, self))?;

            let now = Instant::now();
            let mut timeout = TICK_RATE
                .checked_sub(self.last_tick.elapsed())
                .unwrap_or(Duration::ZERO);
            if let Some(deadline) = self.gate.next_deadline() {
                timeout = timeout.min(deadline.saturating_duration_since(now));
            }

            if event::poll(timeout)? {
                let event = event::read()?;
                self.handle_event(event, Instant::now());
            }

            let now = Instant::now();
            self.on_tick(now);

            if self.last_tick.elapsed() >= TICK_RATE {
                self.tick = self.tick.wrapping_add(1);
                self.last_tick = now;
            }
        }

        tracing::info!("Event loop finished");
        Ok(())
    }

    /// Handle one terminal event
    pub fn handle_event(&mut self, event: Event, now: Instant) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key, now),
            Event::Mouse(mouse) => self.handle_mouse(mouse, now),
            _ => {}
        }
        self.sync_screen(now);
    }

    /// Run expired gate timers
    pub fn on_tick(&mut self, now: Instant) {
        self.gate.tick(now);
        self.sync_screen(now);
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        // Global quit handler
        if keys::is_quit(&key) {
            self.should_quit = true;
            return;
        }

        match self.gate.screen() {
            ViewState::PinEntry => self.handle_pin_key(key, now),
            ViewState::Dashboard => self.handle_dashboard_key(key, now),
        }
    }

    fn handle_pin_key(&mut self, key: KeyEvent, now: Instant) {
        let translation = self.gate.key_down(keys::physical_key(&key), now);
        if translation.prevent_default {
            tracing::trace!(code = ?key.code, "Key consumed by the gate");
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent, now: Instant) {
        let dashboard = &mut self.state.dashboard;
        match key.code {
            KeyCode::Left => dashboard.prev_nav(),
            KeyCode::Right => dashboard.next_nav(),
            KeyCode::Up | KeyCode::Char('k') => dashboard.select_prev_transaction(),
            KeyCode::Down | KeyCode::Char('j') => dashboard.select_next_transaction(),
            KeyCode::Tab => dashboard.focus_next_action(),
            KeyCode::Char(' ') => dashboard.press_action(now),
            KeyCode::Char('l') => {
                tracing::info!("Logging out");
                self.gate.logout();
            }
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left)
            || self.gate.screen() != ViewState::PinEntry
        {
            return;
        }

        let Some(area) = self.state.keypad_area else {
            return;
        };
        if let Some(key) = keypad::hit_test(area, mouse.column, mouse.row) {
            self.gate.press_keypad(key, now);
        }
    }

    /// Restart the dashboard whenever it comes into view
    fn sync_screen(&mut self, now: Instant) {
        let screen = self.gate.screen();
        if screen == self.state.last_screen {
            return;
        }

        tracing::debug!(from = ?self.state.last_screen, to = ?screen, "Screen changed");
        if screen == ViewState::Dashboard {
            self.state.dashboard.reset(now);
        }
        self.state.last_screen = screen;
    }
}
