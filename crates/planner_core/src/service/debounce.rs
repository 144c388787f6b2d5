//! Trailing-edge debounce as an explicit deferred task.
//!
//! # Invariants
//! - At most one deadline is pending; scheduling replaces it.
//! - Nothing fires on its own: the owner polls with the current instant.

use std::time::{Duration, Instant};

/// Delay between the last edit and the autosave write.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Cancels any pending deadline and starts a new one from `now`.
    pub fn restart(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Drops the pending deadline. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Consumes the deadline when it has passed at `now`.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::Debouncer;
    use std::time::{Duration, Instant};

    #[test]
    fn restart_pushes_deadline_forward() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        debouncer.restart(start);
        debouncer.restart(start + Duration::from_millis(400));

        assert!(!debouncer.fire_if_due(start + Duration::from_millis(600)));
        assert!(debouncer.fire_if_due(start + Duration::from_millis(900)));
        assert!(!debouncer.is_pending());
        assert!(!debouncer.fire_if_due(start + Duration::from_millis(5_000)));
    }

    #[test]
    fn cancel_reports_whether_pending() {
        let mut debouncer = Debouncer::default();
        assert!(!debouncer.cancel());
        debouncer.restart(Instant::now());
        assert!(debouncer.cancel());
        assert_eq!(debouncer.deadline(), None);
    }
}
