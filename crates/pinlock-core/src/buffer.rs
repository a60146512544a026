//! Bounded digit buffer

use zeroize::Zeroizing;

use crate::events::{publish, EventSender, GateEvent};
use crate::CODE_LENGTH;

/// Why a buffer edit was ignored.
///
/// These are not failures the user sees. The adapter drops them after
/// logging at trace level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BufferRejection {
    #[error("buffer already holds {0} digits")]
    Overflow(usize),

    #[error("buffer is empty")]
    Underflow,

    #[error("{0:?} is not a digit")]
    NotADigit(char),
}

/// Accumulates the code as it is typed.
///
/// Holds at most [`CODE_LENGTH`] ASCII digits and wipes its contents on drop.
/// Every mutation that succeeds publishes [`GateEvent::BufferChanged`].
pub struct DigitBuffer {
    digits: Zeroizing<String>,
    events: EventSender,
}

impl DigitBuffer {
    /// Create an empty buffer publishing to `events`
    pub fn new(events: EventSender) -> Self {
        Self {
            digits: Zeroizing::new(String::with_capacity(CODE_LENGTH)),
            events,
        }
    }

    /// Append one digit, returning the new length
    pub fn append(&mut self, digit: char) -> Result<usize, BufferRejection> {
        if !digit.is_ascii_digit() {
            return Err(BufferRejection::NotADigit(digit));
        }
        if self.is_full() {
            return Err(BufferRejection::Overflow(self.len()));
        }

        self.digits.push(digit);
        self.changed();
        Ok(self.len())
    }

    /// Remove the last digit, returning the new length
    pub fn delete_last(&mut self) -> Result<usize, BufferRejection> {
        if self.digits.pop().is_none() {
            return Err(BufferRejection::Underflow);
        }
        self.changed();
        Ok(self.len())
    }

    /// Empty the buffer. Always publishes, even when already empty.
    pub fn clear(&mut self) {
        self.digits.clear();
        self.changed();
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.len() >= CODE_LENGTH
    }

    /// Copy of the current code, wiped when dropped
    pub fn snapshot(&self) -> Zeroizing<String> {
        self.digits.clone()
    }

    fn changed(&self) {
        tracing::trace!(len = self.len(), "digit buffer changed");
        publish(&self.events, GateEvent::BufferChanged { len: self.len() });
    }
}

impl std::fmt::Debug for DigitBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigitBuffer")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::event_bus;

    fn drain(rx: &mut crate::EventReceiver) -> Vec<GateEvent> {
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    #[test]
    fn test_append_until_full() {
        let (tx, mut rx) = event_bus();
        let mut buffer = DigitBuffer::new(tx);

        for (i, digit) in "123456".chars().enumerate() {
            assert_eq!(buffer.append(digit), Ok(i + 1));
        }
        assert!(buffer.is_full());
        assert_eq!(buffer.append('7'), Err(BufferRejection::Overflow(6)));
        assert_eq!(buffer.snapshot().as_str(), "123456");

        // Six changes, the rejected append is silent
        assert_eq!(drain(&mut rx).len(), 6);
    }

    #[test]
    fn test_append_rejects_non_digits() {
        let (tx, mut rx) = event_bus();
        let mut buffer = DigitBuffer::new(tx);

        assert_eq!(buffer.append('a'), Err(BufferRejection::NotADigit('a')));
        assert!(buffer.is_empty());
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_delete_last() {
        let (tx, mut rx) = event_bus();
        let mut buffer = DigitBuffer::new(tx);

        assert_eq!(buffer.delete_last(), Err(BufferRejection::Underflow));
        assert!(drain(&mut rx).is_empty());

        buffer.append('1').unwrap();
        buffer.append('2').unwrap();
        assert_eq!(buffer.delete_last(), Ok(1));
        assert_eq!(buffer.snapshot().as_str(), "1");

        let events = drain(&mut rx);
        assert_eq!(events.last(), Some(&GateEvent::BufferChanged { len: 1 }));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (tx, mut rx) = event_bus();
        let mut buffer = DigitBuffer::new(tx);

        buffer.append('9').unwrap();
        buffer.clear();
        buffer.clear();
        assert_eq!(buffer.len(), 0);

        assert_eq!(
            drain(&mut rx),
            vec![
                GateEvent::BufferChanged { len: 1 },
                GateEvent::BufferChanged { len: 0 },
                GateEvent::BufferChanged { len: 0 },
            ]
        );
    }

    #[test]
    fn test_debug_hides_digits() {
        let (tx, _rx) = event_bus();
        let mut buffer = DigitBuffer::new(tx);
        buffer.append('4').unwrap();

        let debug = format!("{:?}", buffer);
        assert!(!debug.contains('4'));
        assert!(debug.contains("len: 1"));
    }
}
