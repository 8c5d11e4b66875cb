use std::time::Duration;

use tokio::time::Instant;

pub const DEFAULT_AUTO_SAVE_INTERVAL: Duration = Duration::from_secs(30);

/// Debounced auto-save deadline.
///
/// Armed by an edit, re-armed by every further edit, and disarmed once it
/// fires or a save leaves the document clean. Only the quiet period after
/// the last edit counts.
#[derive(Debug, Clone)]
pub struct AutoSaveTimer {
    interval: Duration,
    deadline: Option<Instant>,
}

impl AutoSaveTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Record an edit at `now`.
    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.interval);
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    /// If the deadline has passed, disarm and report that a save is due.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for AutoSaveTimer {
    fn default() -> Self {
        Self::new(DEFAULT_AUTO_SAVE_INTERVAL)
    }
}
