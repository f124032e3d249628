use derive_more::derive::From;

pub type QueueResult<T> = core::result::Result<T, QueueError>;

/// `QueueError` is raised when a [`super::BoundedQueue`] cannot be built
/// from the provided options.
#[derive(Debug, Clone, PartialEq, Eq, From)]
pub enum QueueError {
    /// The capacity was zero or negative.
    InvalidCapacity(i64),
}

impl core::error::Error for QueueError {}

impl core::fmt::Display for QueueError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            QueueError::InvalidCapacity(value) => write!(
                f,
                "QueueError::InvalidCapacity({value}): capacity must be a positive integer"
            ),
        }
    }
}

/// `PutError` hands the rejected item back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutError<T> {
    /// The queue was at capacity and the caller asked not to wait.
    Full(T),

    /// The queue stayed at capacity for the whole wait duration.
    Timeout(T),

    /// The queue was closed before the item could be enqueued.
    Closed(T),
}

impl<T> PutError<T> {
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, PutError::Closed(_))
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, PutError::Timeout(_))
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        matches!(self, PutError::Full(_))
    }

    /// Recovers the item that could not be enqueued.
    pub fn into_inner(self) -> T {
        match self {
            PutError::Full(item) | PutError::Timeout(item) | PutError::Closed(item) => item,
        }
    }
}

impl<T: core::fmt::Debug> core::error::Error for PutError<T> {}

impl<T: core::fmt::Debug> core::fmt::Display for PutError<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PutError::Full(item) => write!(f, "PutError::Full({item:?})"),
            PutError::Timeout(item) => write!(f, "PutError::Timeout({item:?})"),
            PutError::Closed(item) => write!(f, "PutError::Closed({item:?})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TakeError {
    Empty,
    Timeout,

    /// The queue was closed and every buffered item was already taken.
    Closed,
}

impl TakeError {
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, TakeError::Closed)
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, TakeError::Timeout)
    }
}

impl core::error::Error for TakeError {}

impl core::fmt::Display for TakeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TakeError::Empty => write!(f, "TakeError::Empty"),
            TakeError::Timeout => write!(f, "TakeError::Timeout"),
            TakeError::Closed => write!(f, "TakeError::Closed"),
        }
    }
}
