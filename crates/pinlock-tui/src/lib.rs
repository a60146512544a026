//! Pinlock TUI Library
//!
//! Terminal front-end for the pinlock PIN gate: the PIN entry screen with its
//! on-screen keypad, and the mock banking dashboard shown once unlocked.

pub mod app;
pub mod dashboard;
pub mod ui;

pub use app::App;
