//! Quiet-period debouncing for search input.

use std::time::Duration;

use tokio::time::{Instant, sleep_until};

pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Holds the latest input until no new input arrives for `delay`.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record new input, restarting the quiet period.
    pub fn input(&mut self, text: impl Into<String>) {
        self.pending = Some((text.into(), Instant::now() + self.delay));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the input if its quiet period has elapsed.
    pub fn ready(&mut self) -> Option<String> {
        let due = matches!(&self.pending, Some((_, deadline)) if *deadline <= Instant::now());
        if due {
            self.pending.take().map(|(text, _)| text)
        } else {
            None
        }
    }

    /// Wait out the quiet period and take the settled input.
    pub async fn settled(&mut self) -> Option<String> {
        let deadline = self.pending.as_ref()?.1;
        sleep_until(deadline).await;
        self.pending.take().map(|(text, _)| text)
    }
}
