//! Terminal key events to gate keys

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pinlock_core::PhysicalKey;

/// Map a crossterm key event to the key the gate understands
pub fn physical_key(key: &KeyEvent) -> PhysicalKey {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return PhysicalKey::Other;
    }

    match key.code {
        KeyCode::Char(c) => PhysicalKey::Char(c),
        KeyCode::Backspace => PhysicalKey::Backspace,
        KeyCode::Esc => PhysicalKey::Escape,
        KeyCode::Enter => PhysicalKey::Enter,
        _ => PhysicalKey::Other,
    }
}

/// Ctrl+C quits from any screen
pub fn is_quit(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(KeyCode::Char('7'), KeyModifiers::NONE, PhysicalKey::Char('7'))]
    #[case(KeyCode::Char('x'), KeyModifiers::NONE, PhysicalKey::Char('x'))]
    #[case(KeyCode::Char('7'), KeyModifiers::SHIFT, PhysicalKey::Char('7'))]
    #[case(KeyCode::Backspace, KeyModifiers::NONE, PhysicalKey::Backspace)]
    #[case(KeyCode::Esc, KeyModifiers::NONE, PhysicalKey::Escape)]
    #[case(KeyCode::Enter, KeyModifiers::NONE, PhysicalKey::Enter)]
    #[case(KeyCode::Tab, KeyModifiers::NONE, PhysicalKey::Other)]
    #[case(KeyCode::Char('1'), KeyModifiers::CONTROL, PhysicalKey::Other)]
    #[case(KeyCode::Char('1'), KeyModifiers::ALT, PhysicalKey::Other)]
    fn test_physical_key(
        #[case] code: KeyCode,
        #[case] modifiers: KeyModifiers,
        #[case] expected: PhysicalKey,
    ) {
        assert_eq!(physical_key(&KeyEvent::new(code, modifiers)), expected);
    }

    #[rstest]
    #[case(KeyCode::Char('c'), KeyModifiers::CONTROL, true)]
    #[case(KeyCode::Char('c'), KeyModifiers::NONE, false)]
    #[case(KeyCode::Char('q'), KeyModifiers::CONTROL, false)]
    fn test_is_quit(#[case] code: KeyCode, #[case] modifiers: KeyModifiers, #[case] expected: bool) {
        assert_eq!(is_quit(&KeyEvent::new(code, modifiers)), expected);
    }
}
