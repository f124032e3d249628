// Wake-up plumbing shared by every queue operation.

use std::sync::{Condvar, MutexGuard};
use std::time::Duration;

use super::WakePolicy;

/// `Side` names the predicate a thread waits on or a state change satisfies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    /// `len < capacity`, producers wait here.
    NotFull,

    /// `len > 0`, consumers wait here.
    NotEmpty,
}

pub(crate) enum NotifyDirective {
    One,
    All,
}

/// `Signals` holds the condition variables of a queue.
///
/// With [`WakePolicy::Broadcast`] both sides share one condition and every
/// notification wakes every waiter, who then re-check their own predicate.
/// With [`WakePolicy::Targeted`] each side owns its condition and only the
/// side whose predicate just became true is woken.
pub(crate) enum Signals {
    Broadcast {
        changed: Condvar,
    },
    Targeted {
        not_full: Condvar,
        not_empty: Condvar,
    },
}

impl Signals {
    pub(crate) fn new(policy: WakePolicy) -> Self {
        match policy {
            WakePolicy::Broadcast => Signals::Broadcast {
                changed: Condvar::new(),
            },
            WakePolicy::Targeted => Signals::Targeted {
                not_full: Condvar::new(),
                not_empty: Condvar::new(),
            },
        }
    }

    fn condition(&self, side: Side) -> &Condvar {
        match self {
            Signals::Broadcast { changed } => changed,
            Signals::Targeted {
                not_full,
                not_empty,
            } => match side {
                Side::NotFull => not_full,
                Side::NotEmpty => not_empty,
            },
        }
    }

    /// Blocks until notified, releasing the guard while asleep.
    ///
    /// Spurious wake-ups are possible, callers must re-check their predicate.
    pub(crate) fn wait<'a, S>(&self, side: Side, guard: MutexGuard<'a, S>) -> MutexGuard<'a, S> {
        match self.condition(side).wait(guard) {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Blocks until notified or until `timeout` elapsed.
    pub(crate) fn wait_timeout<'a, S>(
        &self,
        side: Side,
        guard: MutexGuard<'a, S>,
        timeout: Duration,
    ) -> MutexGuard<'a, S> {
        match self.condition(side).wait_timeout(guard, timeout) {
            Ok((guard, _)) => guard,
            Err(poisoned) => poisoned.into_inner().0,
        }
    }

    /// Announces that `side` just became true.
    ///
    /// Must be called after the queue lock was released.
    pub(crate) fn signal(&self, side: Side, directive: NotifyDirective) {
        match self {
            Signals::Broadcast { changed } => changed.notify_all(),
            Signals::Targeted { .. } => match directive {
                NotifyDirective::One => self.condition(side).notify_one(),
                NotifyDirective::All => self.condition(side).notify_all(),
            },
        }
    }

    pub(crate) fn signal_one(&self, side: Side) {
        self.signal(side, NotifyDirective::One);
    }

    pub(crate) fn signal_all(&self, side: Side) {
        self.signal(side, NotifyDirective::All);
    }

    /// Wakes every waiter on every side.
    pub(crate) fn wake_everyone(&self) {
        match self {
            Signals::Broadcast { changed } => changed.notify_all(),
            Signals::Targeted {
                not_full,
                not_empty,
            } => {
                not_full.notify_all();
                not_empty.notify_all();
            }
        }
    }
}
