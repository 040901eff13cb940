//! The shared armed flag.

use std::sync::atomic::{AtomicBool, Ordering};

/// Process-wide armed/disarmed state.
///
/// Written from the button interrupt thread, the monitor and the web
/// handlers. Last writer wins.
#[derive(Debug, Default)]
pub struct AlarmState {
    armed: AtomicBool,
}

impl AlarmState {
    pub fn new(armed: bool) -> Self {
        Self {
            armed: AtomicBool::new(armed),
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }

    /// Flip the flag and return the new value.
    pub fn toggle(&self) -> bool {
        !self.armed.fetch_xor(true, Ordering::SeqCst)
    }

    /// Move to `armed`, returning `true` if the flag changed.
    pub fn set(&self, armed: bool) -> bool {
        self.armed
            .compare_exchange(!armed, armed, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}
