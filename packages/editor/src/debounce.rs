//! Coalesces bursts of text edits into one sync.
//!
//! Time is passed in by the caller, so the debouncer never sleeps or spawns.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    pending: Option<(String, Instant)>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Record the latest text. Restarts the quiet period.
    pub fn push(&mut self, text: impl Into<String>, now: Instant) {
        self.pending = Some((text.into(), now));
    }

    /// The latest text, once `window` has passed since the last push.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let (_, last) = self.pending.as_ref()?;
        if now.saturating_duration_since(*last) < self.window {
            return None;
        }
        self.pending.take().map(|(text, _)| text)
    }

    /// The pending text regardless of timing.
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|(text, _)| text)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}
