use std::time::{Duration, Instant};

/// Delays a changing value until it has been stable for `delay`.
///
/// The clock is passed in by the caller, so the event loop decides when to poll and tests
/// can drive time explicitly. Every `set` restarts the delay; intermediate values are
/// dropped, only the last one before a quiet period is adopted.
#[derive(Debug, Clone)]
pub struct Debounced<T> {
    delay: Duration,
    current: T,
    pending: Option<(T, Instant)>,
}

impl<T: Clone + PartialEq> Debounced<T> {
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            delay,
            current: initial,
            pending: None,
        }
    }

    /// The last adopted value.
    #[cfg(test)]
    pub fn current(&self) -> &T {
        &self.current
    }

    /// Record a new input value, restarting the delay.
    pub fn set(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Instant at which the pending value settles, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Adopts the pending value once its deadline has passed.
    ///
    /// Returns the new value only when it differs from the previously adopted one.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.pending.take() {
            Some((value, deadline)) if now >= deadline => {
                if value == self.current {
                    None
                } else {
                    self.current = value.clone();
                    Some(value)
                }
            }
            pending => {
                self.pending = pending;
                None
            }
        }
    }
}
