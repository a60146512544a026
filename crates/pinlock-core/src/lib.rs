//! # pinlock-core
//!
//! The PIN entry state machine behind the pinlock gate. Keystrokes from an
//! on-screen keypad or a physical keyboard accumulate into a fixed-length
//! code, the code is judged against an injected secret, and the outcome is
//! turned into observable view state (indicator slots, error text, shake
//! effect, active screen) plus a session-scoped "authenticated" flag.
//!
//! This crate has no UI dependency. Front-ends feed it input and a clock
//! (`Instant`), then render [`ViewSnapshot`]s.
//!
//! ## Components
//!
//! - [`DigitBuffer`]: owns the code being typed, bounded to [`CODE_LENGTH`]
//! - [`InputAdapter`]: maps keypad and keyboard input to buffer commands
//! - [`Verifier`]: compares a full code with the [`Secret`]
//! - [`SessionGate`]: the authenticated flag and its [`SessionStore`]
//! - [`ViewController`]: reacts to [`GateEvent`]s and owns what is displayed
//! - [`TimerQueue`]: fire-once deadlines for the auto-submit, success and
//!   shake delays
//! - [`PinGate`]: wires everything together

pub mod buffer;
pub mod error;
pub mod events;
pub mod gate;
pub mod input;
pub mod secret;
pub mod session;
pub mod timer;
pub mod verifier;
pub mod view;

use std::time::Duration;

pub use buffer::{BufferRejection, DigitBuffer};
pub use error::{GateError, Result};
pub use events::{event_bus, EventReceiver, EventSender, GateEvent};
pub use gate::{GateConfig, PinGate};
pub use input::{Command, InputAdapter, KeypadKey, PhysicalKey, Translation};
pub use secret::{EnvSecret, Secret, SecretProvider, StaticSecret, DEFAULT_SECRET_VAR};
pub use session::{FileSessionStore, MemorySessionStore, SessionGate, SessionStore};
pub use timer::{TimerHandle, TimerKind, TimerQueue};
pub use verifier::{Verdict, Verifier};
pub use view::{IndicatorTone, ViewController, ViewSnapshot, ViewState};

/// Number of digits in a complete code
pub const CODE_LENGTH: usize = 6;

/// Delay between the final digit landing and automatic verification
pub const AUTO_SUBMIT_DELAY: Duration = Duration::from_millis(300);

/// Delay between a successful verification and the switch to the dashboard
pub const SUCCESS_DELAY: Duration = Duration::from_millis(500);

/// How long the shake effect stays on after a failed attempt
pub const SHAKE_DURATION: Duration = Duration::from_millis(500);

/// Message shown after a failed attempt
pub const INCORRECT_PIN_MESSAGE: &str = "Incorrect PIN. Please try again.";

/// Session storage key holding the authenticated flag
pub const SESSION_KEY: &str = "authenticated";

/// Value stored under [`SESSION_KEY`] while authenticated
pub const SESSION_VALUE: &str = "true";
