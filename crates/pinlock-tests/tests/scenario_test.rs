//! End-to-end scenarios for the PIN gate
//!
//! These drive a `PinGate` the way the terminal front-end does, with a
//! file-backed session store, and check what a user would see.

use std::time::Instant;

use pinlock_core::{
    FileSessionStore, GateConfig, IndicatorTone, PhysicalKey, PinGate, Secret, SessionStore,
    StaticSecret, ViewState, INCORRECT_PIN_MESSAGE, SESSION_KEY, SESSION_VALUE,
};
use tempfile::TempDir;

const SECRET: &str = "534271";

fn store_in(dir: &TempDir) -> FileSessionStore {
    FileSessionStore::for_session(Some(dir.path().to_path_buf()), "scenario").unwrap()
}

fn gate_with(store: FileSessionStore) -> PinGate {
    let provider = StaticSecret::new(Secret::parse(SECRET).unwrap());
    PinGate::from_provider(GateConfig::default(), &provider, Box::new(store)).unwrap()
}

fn type_code(gate: &mut PinGate, code: &str, now: Instant) {
    for c in code.chars() {
        gate.key_down(PhysicalKey::Char(c), now);
    }
}

/// Correct PIN unlocks the dashboard after the success delay
#[test]
fn test_correct_pin_reaches_dashboard() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let mut gate = gate_with(store.clone());
    let config = *gate.config();
    let start = Instant::now();

    // ==========================================
    // STEP 1: Type the PIN, auto-submit fires
    // ==========================================
    type_code(&mut gate, SECRET, start);
    assert_eq!(gate.buffer_len(), 6);
    assert_eq!(gate.screen(), ViewState::PinEntry);

    let verified_at = start + config.auto_submit_delay;
    gate.tick(verified_at);

    assert!(gate.is_authenticated());
    assert_eq!(gate.snapshot().tone, IndicatorTone::Success);
    assert_eq!(
        store.get(SESSION_KEY).unwrap().as_deref(),
        Some(SESSION_VALUE)
    );

    // ==========================================
    // STEP 2: Still on the PIN screen until the success delay passes
    // ==========================================
    gate.tick(verified_at + config.success_delay / 2);
    assert_eq!(gate.screen(), ViewState::PinEntry);

    gate.tick(verified_at + config.success_delay);
    assert_eq!(gate.screen(), ViewState::Dashboard);
    assert!(gate.snapshot().is_visible(ViewState::Dashboard));
    assert!(!gate.snapshot().is_visible(ViewState::PinEntry));
}

/// Wrong PIN shows the error and empties the buffer
#[test]
fn test_wrong_pin_shows_error() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let mut gate = gate_with(store.clone());
    let now = Instant::now();

    type_code(&mut gate, "111111", now);
    gate.tick(now + gate.config().auto_submit_delay);

    let snapshot = gate.snapshot();
    assert_eq!(snapshot.error_text, INCORRECT_PIN_MESSAGE);
    assert!(snapshot.shaking);
    assert_eq!(snapshot.filled(), 0);
    assert_eq!(gate.buffer_len(), 0);
    assert_eq!(gate.screen(), ViewState::PinEntry);
    assert!(!gate.is_authenticated());
    assert_eq!(store.get(SESSION_KEY).unwrap(), None);
}

/// Typing keeps the error, Escape clears it, and the right PIN still works
#[test]
fn test_retry_after_wrong_pin() {
    let dir = TempDir::new().unwrap();
    let mut gate = gate_with(store_in(&dir));
    let now = Instant::now();

    type_code(&mut gate, "000000", now);
    gate.key_down(PhysicalKey::Enter, now);
    assert_eq!(gate.snapshot().error_text, INCORRECT_PIN_MESSAGE);

    gate.key_down(PhysicalKey::Char('9'), now);
    assert_eq!(gate.snapshot().error_text, INCORRECT_PIN_MESSAGE);

    gate.key_down(PhysicalKey::Escape, now);
    assert!(gate.snapshot().error_text.is_empty());
    assert_eq!(gate.buffer_len(), 0);

    type_code(&mut gate, SECRET, now);
    gate.key_down(PhysicalKey::Enter, now);
    assert!(gate.is_authenticated());
}

/// An authenticated session survives a reload
#[test]
fn test_reload_with_authenticated_session() {
    let dir = TempDir::new().unwrap();
    let now = Instant::now();

    {
        let mut gate = gate_with(store_in(&dir));
        type_code(&mut gate, SECRET, now);
        gate.key_down(PhysicalKey::Enter, now);
        assert!(gate.is_authenticated());
    }

    // Fresh load against the same store, no input at all
    let gate = gate_with(store_in(&dir));
    assert_eq!(gate.screen(), ViewState::Dashboard);
    assert!(gate.is_authenticated());
    assert_eq!(gate.buffer_len(), 0);
}

/// A flag written by another process is honoured on load
#[test]
fn test_preexisting_flag_starts_on_dashboard() {
    let dir = TempDir::new().unwrap();
    let mut store = store_in(&dir);
    store.set(SESSION_KEY, SESSION_VALUE).unwrap();

    let gate = gate_with(store);
    assert_eq!(gate.screen(), ViewState::Dashboard);
}

/// Any other stored value is not a session
#[test]
fn test_non_true_flag_is_ignored() {
    let dir = TempDir::new().unwrap();
    let mut store = store_in(&dir);
    store.set(SESSION_KEY, "yes").unwrap();

    let gate = gate_with(store);
    assert_eq!(gate.screen(), ViewState::PinEntry);
    assert!(!gate.is_authenticated());
}

/// Logout returns to the PIN screen and forgets the session
#[test]
fn test_logout_from_dashboard() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let mut gate = gate_with(store.clone());
    let now = Instant::now();

    type_code(&mut gate, SECRET, now);
    gate.key_down(PhysicalKey::Enter, now);
    gate.tick(now + gate.config().success_delay);
    assert_eq!(gate.screen(), ViewState::Dashboard);

    gate.logout();

    assert_eq!(gate.screen(), ViewState::PinEntry);
    assert!(!gate.is_authenticated());
    assert_eq!(gate.buffer_len(), 0);
    assert_eq!(store.get(SESSION_KEY).unwrap(), None);
    assert!(!store.path().exists());

    let snapshot = gate.snapshot();
    assert_eq!(snapshot.filled(), 0);
    assert_eq!(snapshot.tone, IndicatorTone::Normal);
    assert!(snapshot.error_text.is_empty());

    // A reload stays logged out
    let reloaded = gate_with(store_in(&dir));
    assert_eq!(reloaded.screen(), ViewState::PinEntry);
}

/// Backspace empties the buffer without touching the error line
#[test]
fn test_backspace_twice_empties_buffer() {
    let dir = TempDir::new().unwrap();
    let mut gate = gate_with(store_in(&dir));
    let now = Instant::now();

    type_code(&mut gate, "12", now);
    assert_eq!(gate.snapshot().filled(), 2);

    let first = gate.key_down(PhysicalKey::Backspace, now);
    let second = gate.key_down(PhysicalKey::Backspace, now);

    assert!(first.prevent_default);
    assert!(second.prevent_default);
    assert_eq!(gate.buffer_len(), 0);
    assert_eq!(gate.snapshot().filled(), 0);
    assert!(gate.snapshot().error_text.is_empty());
    assert!(!gate.snapshot().shaking);
}

/// Escape clears the buffer and Enter on a short buffer does nothing
#[test]
fn test_escape_and_short_enter() {
    let dir = TempDir::new().unwrap();
    let mut gate = gate_with(store_in(&dir));
    let now = Instant::now();

    type_code(&mut gate, "5342", now);
    gate.key_down(PhysicalKey::Enter, now);
    assert_eq!(gate.buffer_len(), 4);
    assert!(gate.snapshot().error_text.is_empty());

    gate.key_down(PhysicalKey::Escape, now);
    assert_eq!(gate.buffer_len(), 0);
    assert!(gate.next_deadline().is_none());
}
