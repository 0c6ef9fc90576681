use std::time::{Duration, Instant};

/// How long a transient notification stays visible.
pub const NOTIFICATION_DURATION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub duration: Duration,
    dismiss_at: Instant,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.dismiss_at
    }
}

/// Holds at most one transient message together with its pending dismissal.
///
/// Dismissal is a deadline checked by whoever polls, so the control thread
/// never sleeps. Showing a new message cancels the previous dismissal.
#[derive(Debug, Default)]
pub struct Notifier {
    pending: Option<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, message: impl Into<String>) {
        self.show_at(message, Instant::now());
    }

    pub fn show_at(&mut self, message: impl Into<String>, now: Instant) {
        self.show_for(message, NOTIFICATION_DURATION, now);
    }

    pub fn show_for(&mut self, message: impl Into<String>, duration: Duration, now: Instant) {
        self.pending = Some(Notification {
            message: message.into(),
            duration,
            dismiss_at: now + duration,
        });
    }

    /// The message to display at `now`, if any. Expired messages are dropped.
    pub fn current(&mut self, now: Instant) -> Option<&str> {
        if self.pending.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.pending = None;
        }
        self.pending.as_ref().map(|n| n.message.as_str())
    }

    pub fn dismiss(&mut self) {
        self.pending = None;
    }
}
