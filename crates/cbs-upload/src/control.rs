//! Cooperative pause/resume/cancel signalling.
//!
//! One writer (the driving loop) and any number of external controllers.
//! The flags are the only cross-thread mutable state; waits go through a
//! Condvar so pausing never spins and cancel wakes sleepers early.

use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug, Default, Clone, Copy)]
struct Flags {
    paused: bool,
    cancelled: bool,
}

/// Shared pause/resume/cancel state for one upload session.
#[derive(Debug, Default)]
pub struct SessionControl {
    flags: Mutex<Flags>,
    signal: Condvar,
}

impl SessionControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a pause. Idempotent; observed at the next record boundary.
    pub fn pause(&self) {
        self.flags.lock().unwrap().paused = true;
        self.signal.notify_all();
    }

    /// Clear a pause. Idempotent.
    pub fn resume(&self) {
        self.flags.lock().unwrap().paused = false;
        self.signal.notify_all();
    }

    /// Request cancellation. Idempotent; observed once per record
    /// boundary, never mid-retry of an in-flight call.
    pub fn cancel(&self) {
        self.flags.lock().unwrap().cancelled = true;
        self.signal.notify_all();
    }

    pub fn is_paused(&self) -> bool {
        self.flags.lock().unwrap().paused
    }

    pub fn is_cancelled(&self) -> bool {
        self.flags.lock().unwrap().cancelled
    }

    /// Clear both flags at the start of a fresh session.
    pub(crate) fn reset(&self) {
        *self.flags.lock().unwrap() = Flags::default();
    }

    /// Block while paused, waking on resume or cancel (bounded waits at
    /// `poll` cadence). Returns false when cancelled.
    pub(crate) fn wait_while_paused(&self, poll: Duration) -> bool {
        let mut flags = self.flags.lock().unwrap();
        while flags.paused && !flags.cancelled {
            let (next, _timeout) = self.signal.wait_timeout(flags, poll).unwrap();
            flags = next;
        }
        !flags.cancelled
    }

    /// Cancellable sleep for the inter-request interval. Returns false
    /// when the wait ended early because of cancellation.
    pub(crate) fn rest(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let mut flags = self.flags.lock().unwrap();
        loop {
            if flags.cancelled {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            let (next, _timeout) = self
                .signal
                .wait_timeout(flags, deadline - now)
                .unwrap();
            flags = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn flags_are_idempotent() {
        let control = SessionControl::new();
        control.pause();
        control.pause();
        assert!(control.is_paused());
        control.resume();
        assert!(!control.is_paused());
        control.cancel();
        control.cancel();
        assert!(control.is_cancelled());
        control.reset();
        assert!(!control.is_cancelled());
    }

    #[test]
    fn cancel_wakes_a_paused_wait() {
        let control = Arc::new(SessionControl::new());
        control.pause();
        let handle = {
            let control = Arc::clone(&control);
            thread::spawn(move || control.wait_while_paused(Duration::from_millis(10)))
        };
        thread::sleep(Duration::from_millis(30));
        control.cancel();
        assert!(!handle.join().unwrap(), "cancel should end the wait");
    }

    #[test]
    fn rest_completes_when_not_cancelled() {
        let control = SessionControl::new();
        assert!(control.rest(Duration::from_millis(5)));
    }

    #[test]
    fn rest_is_cut_short_by_cancel() {
        let control = Arc::new(SessionControl::new());
        let handle = {
            let control = Arc::clone(&control);
            thread::spawn(move || control.rest(Duration::from_secs(5)))
        };
        thread::sleep(Duration::from_millis(20));
        control.cancel();
        assert!(!handle.join().unwrap());
    }
}
