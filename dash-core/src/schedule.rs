//! Cancellable scheduled tasks driven by caller-supplied time.
//!
//! Nothing here sleeps or spawns. The host passes `now` into every call and
//! asks for [`Debouncer::deadline`] / [`RefreshTimer::deadline`] to know when
//! to wake up, which keeps tests free of real delays.

use std::time::{Duration, Instant};

/// Quiet interval before a suggestion lookup fires.
pub const SUGGEST_DEBOUNCE: Duration = Duration::from_millis(300);

/// Auto-refresh period of the dashboard view.
pub const REFRESH_PERIOD: Duration = Duration::from_secs(10 * 60);

/// Longest refresh period a timer accepts; longer ones are clamped.
pub const MAX_REFRESH_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

/// Holds at most one pending trigger; scheduling again replaces it.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self { quiet, pending: None }
    }

    /// Cancel whatever is pending and arm a new trigger at `now + quiet`.
    pub fn schedule(&mut self, now: Instant, value: T) {
        self.pending = Some((now + self.quiet, value));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(at, _)| *at)
    }

    /// Take the pending value once its quiet window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((at, _)) if *at <= now => self.pending.take().map(|(_, value)| value),
            _ => None,
        }
    }
}

/// Fixed-period timer that re-arms from the instant it fires.
///
/// A deadline past the end of `Instant`'s range disarms the timer.
#[derive(Debug, Clone)]
pub struct RefreshTimer {
    period: Duration,
    next: Option<Instant>,
}

impl RefreshTimer {
    pub fn new(period: Duration, now: Instant) -> Self {
        let period = period.min(MAX_REFRESH_PERIOD);
        Self { period, next: now.checked_add(period) }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.next
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next {
            Some(at) if at <= now => {
                self.next = now.checked_add(self.period);
                true
            }
            _ => false,
        }
    }
}
