//! Event bus between the gate components

use tokio::sync::mpsc;

use crate::verifier::Verdict;
use crate::view::ViewState;

/// Events published by the buffer and the gate, consumed by the view
/// controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateEvent {
    /// The digit buffer changed; carries the new length
    BufferChanged { len: usize },
    /// The user deleted or cleared digits (keypad or keyboard)
    UserEdit,
    /// A full code was judged
    Verified(Verdict),
    /// The shake effect ran its course
    ShakeEnded,
    /// The visible screen switched
    ScreenChanged(ViewState),
    /// The session was ended explicitly
    LoggedOut,
}

pub type EventSender = mpsc::UnboundedSender<GateEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<GateEvent>;

/// Create a connected sender/receiver pair.
///
/// The channel is only ever used synchronously (`send` / `try_recv`), so no
/// async runtime is needed.
pub fn event_bus() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Publish an event, ignoring a dropped receiver.
pub(crate) fn publish(sender: &EventSender, event: GateEvent) {
    if sender.send(event).is_err() {
        tracing::trace!("event bus closed, dropping event");
    }
}
