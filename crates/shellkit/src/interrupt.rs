//! Process-wide interrupt flag.
//!
//! A console interrupt (Ctrl-C) may fire on any execution context; the
//! handler is restricted to a single atomic store. All substantive work
//! (dropping a partially typed line, reprompting) happens on the main loop
//! when it polls the flag between prompt iterations. A command that is
//! already running is never preempted.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloneable handle to the interrupt flag.
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag {
    flag: Arc<AtomicBool>,
}

impl InterruptFlag {
    /// Create a new, unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request an interrupt. Safe to call from a signal-delivery context.
    pub fn set(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// True if an interrupt was requested since the last `take`.
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Consume a pending interrupt, returning whether one was pending.
    pub fn take(&self) -> bool {
        self.flag.swap(false, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_take() {
        let flag = InterruptFlag::new();
        assert!(!flag.is_set());
        flag.set();
        assert!(flag.is_set());
        assert!(flag.take());
        assert!(!flag.is_set());
        assert!(!flag.take());
    }

    #[test]
    fn test_clones_share_state() {
        let flag = InterruptFlag::new();
        let other = flag.clone();
        other.set();
        assert!(flag.take());
        assert!(!other.is_set());
    }
}
