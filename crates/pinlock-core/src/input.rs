//! Keypad and keyboard normalization
//!
//! Two input sources feed the buffer: the on-screen keypad, whose buttons are
//! identified by a label, and the physical keyboard. Both are reduced to the
//! same small set of [`Command`]s here.

use std::str::FromStr;

use crate::view::ViewState;
use crate::CODE_LENGTH;

/// A button on the on-screen keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypadKey {
    /// `0` through `9`
    Digit(char),
    /// Remove the last digit
    Delete,
    /// Remove all digits
    Clear,
}

impl KeypadKey {
    /// Parse a button label (`0`-`9`, `delete`, `clear`)
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "delete" => Some(Self::Delete),
            "clear" => Some(Self::Clear),
            _ => {
                let mut chars = label.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_digit() => Some(Self::Digit(c)),
                    _ => None,
                }
            }
        }
    }

    /// The label this button carries
    pub fn label(&self) -> String {
        match self {
            Self::Digit(c) => c.to_string(),
            Self::Delete => "delete".to_string(),
            Self::Clear => "clear".to_string(),
        }
    }
}

impl FromStr for KeypadKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("unknown keypad label {:?}", s))
    }
}

/// A key pressed on the physical keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalKey {
    Char(char),
    Backspace,
    Escape,
    Enter,
    /// Anything the gate does not care about
    Other,
}

/// What the buffer should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    AppendDigit(char),
    DeleteLast,
    Clear,
    /// Verify right away (Enter on a full buffer)
    Submit,
}

impl Command {
    /// Whether the command removes digits at the user's request
    pub fn is_user_edit(&self) -> bool {
        matches!(self, Self::DeleteLast | Self::Clear)
    }
}

/// Result of translating one key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Translation {
    /// Command to apply, if the key means anything right now
    pub command: Option<Command>,
    /// The front-end must not apply its own handling of this key
    pub prevent_default: bool,
}

impl Translation {
    fn ignored() -> Self {
        Self::default()
    }

    fn command(command: Command) -> Self {
        Self {
            command: Some(command),
            prevent_default: false,
        }
    }
}

/// Maps input to commands.
///
/// Stateless apart from whether it is accepting input. The gate turns it off
/// while a successful verification is waiting for the screen switch.
#[derive(Debug, Clone)]
pub struct InputAdapter {
    accepting: bool,
}

impl Default for InputAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl InputAdapter {
    pub fn new() -> Self {
        Self { accepting: true }
    }

    pub fn set_accepting(&mut self, accepting: bool) {
        self.accepting = accepting;
    }

    fn active(&self, view: ViewState) -> bool {
        self.accepting && view == ViewState::PinEntry
    }

    /// Translate an on-screen keypad press given the current buffer length
    pub fn keypad(&self, key: KeypadKey, len: usize, view: ViewState) -> Translation {
        if !self.active(view) {
            return Translation::ignored();
        }

        match key {
            KeypadKey::Delete => Translation::command(Command::DeleteLast),
            KeypadKey::Clear => Translation::command(Command::Clear),
            KeypadKey::Digit(c) if len < CODE_LENGTH => {
                Translation::command(Command::AppendDigit(c))
            }
            KeypadKey::Digit(_) => Translation::ignored(),
        }
    }

    /// Translate a physical key press given the current buffer length.
    ///
    /// Keyboard input only counts on the PIN screen.
    pub fn physical(&self, key: PhysicalKey, len: usize, view: ViewState) -> Translation {
        if !self.active(view) {
            return Translation::ignored();
        }

        match key {
            PhysicalKey::Char(c) if c.is_ascii_digit() && len < CODE_LENGTH => {
                Translation::command(Command::AppendDigit(c))
            }
            PhysicalKey::Backspace => Translation {
                command: Some(Command::DeleteLast),
                prevent_default: true,
            },
            PhysicalKey::Escape => Translation::command(Command::Clear),
            PhysicalKey::Enter if len == CODE_LENGTH => Translation::command(Command::Submit),
            _ => Translation::ignored(),
        }
    }
}
