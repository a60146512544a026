//! The PIN gate: input, verification, session and view wired together
//!
//! Single-threaded and clock-agnostic. A front-end calls [`PinGate::key_down`]
//! or [`PinGate::press_keypad`] for input, [`PinGate::tick`] whenever time
//! passes, and renders [`PinGate::snapshot`].

use std::time::{Duration, Instant};

use crate::buffer::DigitBuffer;
use crate::error::Result;
use crate::events::{event_bus, publish, EventReceiver, EventSender, GateEvent};
use crate::input::{Command, InputAdapter, KeypadKey, PhysicalKey, Translation};
use crate::secret::SecretProvider;
use crate::session::{SessionGate, SessionStore};
use crate::timer::{TimerHandle, TimerKind, TimerQueue};
use crate::verifier::{Verdict, Verifier};
use crate::view::{ViewController, ViewSnapshot, ViewState};
use crate::{AUTO_SUBMIT_DELAY, CODE_LENGTH, SHAKE_DURATION, SUCCESS_DELAY};

/// Delays used by the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateConfig {
    /// Between the last digit and automatic verification
    pub auto_submit_delay: Duration,
    /// Between a successful verification and the dashboard
    pub success_delay: Duration,
    /// How long the shake effect lasts
    pub shake_duration: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            auto_submit_delay: AUTO_SUBMIT_DELAY,
            success_delay: SUCCESS_DELAY,
            shake_duration: SHAKE_DURATION,
        }
    }
}

/// Owns every component of the gate
pub struct PinGate {
    config: GateConfig,
    buffer: DigitBuffer,
    adapter: InputAdapter,
    verifier: Verifier,
    session: SessionGate,
    view: ViewController,
    timers: TimerQueue<TimerKind>,
    events: EventSender,
    inbox: EventReceiver,
    auto_submit: Option<TimerHandle>,
    success_transition: Option<TimerHandle>,
    shake: Option<TimerHandle>,
}

impl PinGate {
    /// Build the gate, restoring the session flag from `store`.
    ///
    /// Starts on the dashboard when the store says the session is already
    /// authenticated.
    pub fn new(config: GateConfig, verifier: Verifier, store: Box<dyn SessionStore>) -> Self {
        let (events, inbox) = event_bus();
        let session = SessionGate::restore(store);
        let screen = if session.is_authenticated() {
            ViewState::Dashboard
        } else {
            ViewState::PinEntry
        };

        Self {
            config,
            buffer: DigitBuffer::new(events.clone()),
            adapter: InputAdapter::new(),
            verifier,
            session,
            view: ViewController::new(screen),
            timers: TimerQueue::new(),
            events,
            inbox,
            auto_submit: None,
            success_transition: None,
            shake: None,
        }
    }

    /// Build the gate with the secret taken from `provider`
    pub fn from_provider(
        config: GateConfig,
        provider: &dyn SecretProvider,
        store: Box<dyn SessionStore>,
    ) -> Result<Self> {
        Ok(Self::new(config, Verifier::from_provider(provider)?, store))
    }

    /// Handle a press on the on-screen keypad
    pub fn press_keypad(&mut self, key: KeypadKey, now: Instant) -> Translation {
        let translation = self
            .adapter
            .keypad(key, self.buffer.len(), self.view.screen());
        self.execute(translation.command, now);
        self.dispatch();
        translation
    }

    /// Handle a physical key press.
    ///
    /// The returned translation tells the caller whether to skip its own
    /// handling of the key.
    pub fn key_down(&mut self, key: PhysicalKey, now: Instant) -> Translation {
        let translation = self
            .adapter
            .physical(key, self.buffer.len(), self.view.screen());
        self.execute(translation.command, now);
        self.dispatch();
        translation
    }

    /// Verify right away, dropping any pending automatic verification
    pub fn submit(&mut self, now: Instant) {
        if let Some(handle) = self.auto_submit.take() {
            self.timers.cancel(handle);
        }
        self.verify(now);
        self.dispatch();
    }

    /// End the session and go back to the PIN screen
    pub fn logout(&mut self) {
        self.timers.clear();
        self.auto_submit = None;
        self.success_transition = None;
        self.shake = None;
        self.adapter.set_accepting(true);

        self.session.logout();
        publish(&self.events, GateEvent::LoggedOut);
        self.buffer.clear();
        self.dispatch();
    }

    /// Run every timer due at `now`
    pub fn tick(&mut self, now: Instant) {
        for (handle, kind) in self.timers.expired(now) {
            match kind {
                TimerKind::AutoSubmit => {
                    if self.auto_submit == Some(handle) {
                        self.auto_submit = None;
                        self.verify(now);
                    }
                }
                TimerKind::SuccessTransition => {
                    if self.success_transition == Some(handle) {
                        self.success_transition = None;
                        self.show_dashboard();
                    }
                }
                TimerKind::ShakeEnd => {
                    if self.shake == Some(handle) {
                        self.shake = None;
                        publish(&self.events, GateEvent::ShakeEnded);
                    }
                }
            }
        }
        self.dispatch();
    }

    fn execute(&mut self, command: Option<Command>, now: Instant) {
        let Some(command) = command else {
            return;
        };

        let changed = match command {
            Command::AppendDigit(digit) => match self.buffer.append(digit) {
                Ok(len) => {
                    if len == CODE_LENGTH {
                        self.schedule_auto_submit(now);
                    }
                    true
                }
                Err(rejection) => {
                    tracing::trace!(%rejection, "append ignored");
                    false
                }
            },
            Command::DeleteLast => match self.buffer.delete_last() {
                Ok(_) => true,
                Err(rejection) => {
                    tracing::trace!(%rejection, "delete ignored");
                    false
                }
            },
            Command::Clear => {
                self.buffer.clear();
                true
            }
            Command::Submit => {
                if let Some(handle) = self.auto_submit.take() {
                    self.timers.cancel(handle);
                }
                self.verify(now);
                false
            }
        };

        // An empty delete leaves the error alone; clear always resets it
        if changed && command.is_user_edit() {
            publish(&self.events, GateEvent::UserEdit);
        }
    }

    fn schedule_auto_submit(&mut self, now: Instant) {
        if let Some(previous) = self.auto_submit.take() {
            self.timers.cancel(previous);
        }
        let handle = self
            .timers
            .schedule(TimerKind::AutoSubmit, self.config.auto_submit_delay, now);
        self.auto_submit = Some(handle);
        tracing::debug!("auto-submit scheduled");
    }

    fn verify(&mut self, now: Instant) {
        if self.success_transition.is_some() || self.view.screen() != ViewState::PinEntry {
            return;
        }

        let code = self.buffer.snapshot();
        let Some(verdict) = self.verifier.judge(&code) else {
            tracing::trace!(len = code.len(), "verification skipped on partial code");
            return;
        };

        publish(&self.events, GateEvent::Verified(verdict));
        match verdict {
            Verdict::Success => {
                self.session.login();
                self.adapter.set_accepting(false);
                let handle = self.timers.schedule(
                    TimerKind::SuccessTransition,
                    self.config.success_delay,
                    now,
                );
                self.success_transition = Some(handle);
            }
            Verdict::Failure => {
                tracing::info!("Incorrect PIN entered");
                if let Some(previous) = self.shake.take() {
                    self.timers.cancel(previous);
                }
                let handle =
                    self.timers
                        .schedule(TimerKind::ShakeEnd, self.config.shake_duration, now);
                self.shake = Some(handle);
                self.buffer.clear();
            }
        }
    }

    fn show_dashboard(&mut self) {
        self.adapter.set_accepting(true);
        publish(&self.events, GateEvent::ScreenChanged(ViewState::Dashboard));
        self.buffer.clear();
        tracing::info!("Dashboard unlocked");
    }

    fn dispatch(&mut self) {
        while let Ok(event) = self.inbox.try_recv() {
            self.view.apply(&event);
        }
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.view.snapshot()
    }

    pub fn screen(&self) -> ViewState {
        self.view.screen()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn session(&self) -> &SessionGate {
        &self.session
    }

    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether a success is waiting for the screen switch
    pub fn is_transition_pending(&self) -> bool {
        self.success_transition.is_some()
    }

    /// When [`Self::tick`] next has something to do
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }
}

impl std::fmt::Debug for PinGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinGate")
            .field("screen", &self.view.screen())
            .field("buffer", &self.buffer)
            .field("session", &self.session)
            .field("pending_timers", &self.timers.len())
            .finish_non_exhaustive()
    }
}
