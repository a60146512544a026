//! Fire-once timers driven by an external clock
//!
//! The queue never reads the system clock itself. Callers pass `now` in,
//! which keeps the event loop single-threaded and lets tests step time.

use std::time::{Duration, Instant};

/// The delayed effects the gate schedules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Verify the buffer once the last digit has been drawn
    AutoSubmit,
    /// Switch to the dashboard after a successful verification
    SuccessTransition,
    /// Turn the shake effect off again
    ShakeEnd,
}

/// Identifies one scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Entry<K> {
    handle: TimerHandle,
    kind: K,
    deadline: Instant,
}

/// Pending fire-once timers
#[derive(Debug)]
pub struct TimerQueue<K> {
    entries: Vec<Entry<K>>,
    next_id: u64,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> TimerQueue<K> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Schedule `kind` to fire `delay` after `now`
    pub fn schedule(&mut self, kind: K, delay: Duration, now: Instant) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push(Entry {
            handle,
            kind,
            deadline: now + delay,
        });
        handle
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    /// Cancel everything
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    /// Remove and return every timer due at `now`, earliest first
    pub fn expired(&mut self, now: Instant) -> Vec<(TimerHandle, K)> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].deadline <= now {
                due.push(self.entries.remove(i));
            } else {
                i += 1;
            }
        }
        // Stable sort keeps scheduling order for equal deadlines
        due.sort_by_key(|e| e.deadline);
        due.into_iter().map(|e| (e.handle, e.kind)).collect()
    }
}
