use std::time::Duration;

/// Single pending action that fires once its delay elapses.
///
/// Scheduling while another action is pending replaces it, so at most one
/// action is ever in flight per owner. Owners advance the timer from their
/// tick handler and dispatch whatever [`Deferred::advance`] hands back.
#[derive(Clone, Debug)]
pub struct Deferred<T> {
    pending: Option<Pending<T>>,
}

#[derive(Clone, Debug)]
struct Pending<T> {
    remaining: Duration,
    action: T,
}

impl<T> Deferred<T> {
    /// Creates a timer with nothing scheduled.
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Schedules `action` to fire after `delay`, returning the action it superseded.
    pub fn schedule(&mut self, delay: Duration, action: T) -> Option<T> {
        self.pending
            .replace(Pending {
                remaining: delay,
                action,
            })
            .map(|pending| pending.action)
    }

    /// Cancels the pending action, returning it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|pending| pending.action)
    }

    /// Reports whether an action is waiting to fire.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left before the pending action fires.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.pending.as_ref().map(|pending| pending.remaining)
    }

    /// Advances the timer and returns the action once its delay has elapsed.
    ///
    /// An action scheduled with a zero delay fires on the next advance, even
    /// when `elapsed` is zero.
    pub fn advance(&mut self, elapsed: Duration) -> Option<T> {
        let pending = self.pending.as_mut()?;
        pending.remaining = pending.remaining.saturating_sub(elapsed);
        if pending.remaining.is_zero() {
            self.cancel()
        } else {
            None
        }
    }
}

impl<T> Default for Deferred<T> {
    fn default() -> Self {
        Self::new()
    }
}
