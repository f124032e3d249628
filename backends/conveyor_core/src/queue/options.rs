use core::str::FromStr;

use super::{QueueError, QueueResult};

/// Capacity used when nothing else was configured.
pub const DEFAULT_CAPACITY: usize = 10;

/// `OrderPolicy` decides which buffered item a `take` hands out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OrderPolicy {
    /// Most recently added item first (stack discipline).
    #[default]
    Lifo,

    /// Oldest item first.
    Fifo,
}

impl OrderPolicy {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderPolicy::Lifo => "lifo",
            OrderPolicy::Fifo => "fifo",
        }
    }
}

impl core::fmt::Display for OrderPolicy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lifo" | "stack" => Ok(OrderPolicy::Lifo),
            "fifo" | "queue" => Ok(OrderPolicy::Fifo),
            other => Err(format!("unknown order policy: {other} (expected lifo or fifo)")),
        }
    }
}

/// `WakePolicy` decides which waiters a state change wakes up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WakePolicy {
    /// One condition shared by producers and consumers, every change
    /// wakes every waiter.
    #[default]
    Broadcast,

    /// Separate not-full and not-empty conditions, every change wakes
    /// a single waiter on the matching side.
    Targeted,
}

impl WakePolicy {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            WakePolicy::Broadcast => "broadcast",
            WakePolicy::Targeted => "targeted",
        }
    }
}

impl core::fmt::Display for WakePolicy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WakePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "broadcast" | "all" => Ok(WakePolicy::Broadcast),
            "targeted" | "one" => Ok(WakePolicy::Targeted),
            other => Err(format!(
                "unknown wake policy: {other} (expected broadcast or targeted)"
            )),
        }
    }
}

/// Construction options for a [`super::BoundedQueue`].
///
/// ```
/// use conveyor_core::queue::{OrderPolicy, QueueOptions, WakePolicy};
///
/// let options = QueueOptions::new(4)
///     .order(OrderPolicy::Fifo)
///     .wake(WakePolicy::Targeted);
///
/// assert_eq!(options.get_capacity(), 4);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueOptions {
    capacity: usize,
    order: OrderPolicy,
    wake: WakePolicy,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl QueueOptions {
    #[must_use]
    pub const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            order: OrderPolicy::Lifo,
            wake: WakePolicy::Broadcast,
        }
    }

    #[must_use]
    pub const fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    #[must_use]
    pub const fn order(mut self, order: OrderPolicy) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub const fn wake(mut self, wake: WakePolicy) -> Self {
        self.wake = wake;
        self
    }

    #[must_use]
    pub const fn get_capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub const fn get_order(&self) -> OrderPolicy {
        self.order
    }

    #[must_use]
    pub const fn get_wake(&self) -> WakePolicy {
        self.wake
    }

    /// Fails with [`QueueError::InvalidCapacity`] for a zero capacity.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidCapacity`] when `capacity` is `0`.
    pub fn validate(&self) -> QueueResult<()> {
        if self.capacity == 0 {
            return Err(QueueError::InvalidCapacity(0));
        }
        Ok(())
    }
}
