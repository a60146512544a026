#![no_main]

use std::time::{Duration, Instant};

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pinlock_core::{
    GateConfig, KeypadKey, MemorySessionStore, PhysicalKey, PinGate, Secret, Verifier, ViewState,
    CODE_LENGTH,
};

#[derive(Debug, Arbitrary)]
enum Action {
    Digit(u8),
    Char(char),
    Backspace,
    Escape,
    Enter,
    KeypadDelete,
    KeypadClear,
    Submit,
    Logout,
    Wait(u16),
}

fuzz_target!(|actions: Vec<Action>| {
    let verifier = Verifier::new(Secret::parse("534271").unwrap());
    let mut gate = PinGate::new(
        GateConfig::default(),
        verifier,
        Box::new(MemorySessionStore::new()),
    );
    let mut now = Instant::now();

    for action in actions {
        match action {
            Action::Digit(d) => {
                let c = char::from(b'0' + d % 10);
                gate.press_keypad(KeypadKey::Digit(c), now);
            }
            Action::Char(c) => {
                gate.key_down(PhysicalKey::Char(c), now);
            }
            Action::Backspace => {
                gate.key_down(PhysicalKey::Backspace, now);
            }
            Action::Escape => {
                gate.key_down(PhysicalKey::Escape, now);
            }
            Action::Enter => {
                gate.key_down(PhysicalKey::Enter, now);
            }
            Action::KeypadDelete => {
                gate.press_keypad(KeypadKey::Delete, now);
            }
            Action::KeypadClear => {
                gate.press_keypad(KeypadKey::Clear, now);
            }
            Action::Submit => gate.submit(now),
            Action::Logout => gate.logout(),
            Action::Wait(ms) => {
                now += Duration::from_millis(u64::from(ms));
                gate.tick(now);
            }
        }

        let snapshot = gate.snapshot();
        assert!(gate.buffer_len() <= CODE_LENGTH);
        assert_eq!(snapshot.indicators.len(), CODE_LENGTH);
        assert_eq!(snapshot.filled(), gate.buffer_len());
        assert!(snapshot.is_visible(ViewState::PinEntry) != snapshot.is_visible(ViewState::Dashboard));
        if gate.screen() == ViewState::Dashboard {
            assert!(gate.is_authenticated());
        }
    }
});
