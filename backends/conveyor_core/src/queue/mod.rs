//! Bounded blocking queue shared by producer and consumer threads.
//!
//! A [`BoundedQueue`] keeps at most `capacity` items behind a single
//! [`std::sync::Mutex`]. Producers calling [`BoundedQueue::put`] sleep while
//! the queue is full, consumers calling [`BoundedQueue::take`] sleep while it
//! is empty. Nobody spins: waiting threads park on a [`std::sync::Condvar`]
//! which atomically releases the lock and re-acquires it on wake-up.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//!
//! use conveyor_core::queue::BoundedQueue;
//!
//! let queue = Arc::new(BoundedQueue::new(2).expect("positive capacity"));
//!
//! let producer_queue = Arc::clone(&queue);
//! let producer = thread::spawn(move || {
//!     for value in 0..5 {
//!         producer_queue.put(value).expect("queue is open");
//!     }
//! });
//!
//! let mut taken: Vec<i32> = (0..5).map(|_| queue.take().expect("queue is open")).collect();
//! producer.join().expect("producer finished");
//!
//! taken.sort_unstable();
//! assert_eq!(taken, vec![0, 1, 2, 3, 4]);
//! ```

mod errors;
mod options;
mod signals;

pub use errors::*;
pub use options::*;

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use signals::{Side, Signals};

struct State<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// `BoundedQueue` is a fixed capacity container handing items from
/// producers to consumers.
///
/// The queue owns its lock and conditions, two queues never contend with
/// each other. Share it between threads through an [`std::sync::Arc`].
pub struct BoundedQueue<T> {
    state: Mutex<State<T>>,
    signals: Signals,
    capacity: usize,
    order: OrderPolicy,
    wake: WakePolicy,
}

impl<T> BoundedQueue<T> {
    /// Creates a queue holding at most `capacity` items with the default
    /// [`OrderPolicy::Lifo`] and [`WakePolicy::Broadcast`].
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidCapacity`] if `capacity` is `0`.
    pub fn new(capacity: usize) -> QueueResult<Self> {
        Self::with_options(QueueOptions::new(capacity))
    }

    /// Creates a queue from fully specified options.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidCapacity`] if the capacity is `0`.
    pub fn with_options(options: QueueOptions) -> QueueResult<Self> {
        options.validate()?;

        let capacity = options.get_capacity();
        tracing::debug!(
            capacity,
            order = %options.get_order(),
            wake = %options.get_wake(),
            "creating bounded queue"
        );

        Ok(Self {
            state: Mutex::new(State {
                items: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            signals: Signals::new(options.get_wake()),
            capacity,
            order: options.get_order(),
            wake: options.get_wake(),
        })
    }

    // A panicking thread can only poison the lock between whole push/pop
    // calls, the buffered items stay consistent so the guard is reused.
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn remove(&self, state: &mut State<T>) -> Option<T> {
        match self.order {
            OrderPolicy::Lifo => state.items.pop_back(),
            OrderPolicy::Fifo => state.items.pop_front(),
        }
    }

    /// Adds `item`, sleeping while the queue is at capacity.
    ///
    /// On an open queue this only returns once the item was enqueued.
    ///
    /// # Errors
    ///
    /// Returns [`PutError::Closed`] with the item if the queue is or gets
    /// closed before a slot frees up.
    pub fn put(&self, item: T) -> Result<(), PutError<T>> {
        let mut state = self.lock();
        while !state.closed && state.items.len() >= self.capacity {
            tracing::trace!("queue is full, producer waiting");
            state = self.signals.wait(Side::NotFull, state);
        }
        self.push_locked(state, item)
    }

    /// Adds `item` only if a slot is free right now.
    ///
    /// # Errors
    ///
    /// Returns [`PutError::Full`] or [`PutError::Closed`] with the item.
    pub fn try_put(&self, item: T) -> Result<(), PutError<T>> {
        let state = self.lock();
        if !state.closed && state.items.len() >= self.capacity {
            return Err(PutError::Full(item));
        }
        self.push_locked(state, item)
    }

    /// Adds `item`, waiting at most `timeout` for a free slot.
    ///
    /// # Errors
    ///
    /// Returns [`PutError::Timeout`] if no slot freed up in time and
    /// [`PutError::Closed`] if the queue got closed.
    pub fn put_timeout(&self, item: T, timeout: Duration) -> Result<(), PutError<T>> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.put(item);
        };

        let mut state = self.lock();
        while !state.closed && state.items.len() >= self.capacity {
            let now = Instant::now();
            if now >= deadline {
                tracing::trace!(?timeout, "producer gave up waiting for a free slot");
                return Err(PutError::Timeout(item));
            }
            state = self
                .signals
                .wait_timeout(Side::NotFull, state, deadline - now);
        }
        self.push_locked(state, item)
    }

    fn push_locked(&self, mut state: MutexGuard<'_, State<T>>, item: T) -> Result<(), PutError<T>> {
        if state.closed {
            return Err(PutError::Closed(item));
        }

        state.items.push_back(item);
        let len = state.items.len();
        drop(state);

        tracing::trace!(len, capacity = self.capacity, "item added");
        self.signals.signal_one(Side::NotEmpty);
        Ok(())
    }

    /// Removes an item, sleeping while the queue is empty.
    ///
    /// Which item comes out is decided by the queue's [`OrderPolicy`].
    ///
    /// # Errors
    ///
    /// Returns [`TakeError::Closed`] once the queue is closed and every
    /// buffered item was handed out. Items added before closing are still
    /// delivered.
    pub fn take(&self) -> Result<T, TakeError> {
        let mut state = self.lock();
        loop {
            if let Some(item) = self.remove(&mut state) {
                return Ok(self.release_taken(state, item));
            }
            if state.closed {
                return Err(TakeError::Closed);
            }
            tracing::trace!("queue is empty, consumer waiting");
            state = self.signals.wait(Side::NotEmpty, state);
        }
    }

    /// Removes an item only if one is buffered right now.
    ///
    /// # Errors
    ///
    /// Returns [`TakeError::Empty`] or, once drained, [`TakeError::Closed`].
    pub fn try_take(&self) -> Result<T, TakeError> {
        let mut state = self.lock();
        match self.remove(&mut state) {
            Some(item) => Ok(self.release_taken(state, item)),
            None if state.closed => Err(TakeError::Closed),
            None => Err(TakeError::Empty),
        }
    }

    /// Removes an item, waiting at most `timeout` for one to arrive.
    ///
    /// # Errors
    ///
    /// Returns [`TakeError::Timeout`] if nothing arrived in time and
    /// [`TakeError::Closed`] once the queue is closed and drained.
    pub fn take_timeout(&self, timeout: Duration) -> Result<T, TakeError> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.take();
        };

        let mut state = self.lock();
        loop {
            if let Some(item) = self.remove(&mut state) {
                return Ok(self.release_taken(state, item));
            }
            if state.closed {
                return Err(TakeError::Closed);
            }

            let now = Instant::now();
            if now >= deadline {
                tracing::trace!(?timeout, "consumer gave up waiting for an item");
                return Err(TakeError::Timeout);
            }
            state = self
                .signals
                .wait_timeout(Side::NotEmpty, state, deadline - now);
        }
    }

    fn release_taken(&self, state: MutexGuard<'_, State<T>>, item: T) -> T {
        let len = state.items.len();
        drop(state);

        tracing::trace!(len, capacity = self.capacity, "item taken");
        self.signals.signal_one(Side::NotFull);
        item
    }

    /// Removes every buffered item in [`OrderPolicy`] order without waiting.
    pub fn drain(&self) -> Vec<T> {
        let mut state = self.lock();
        let mut drained = Vec::with_capacity(state.items.len());
        while let Some(item) = self.remove(&mut state) {
            drained.push(item);
        }
        drop(state);

        if !drained.is_empty() {
            tracing::trace!(count = drained.len(), "queue drained");
            self.signals.signal_all(Side::NotFull);
        }
        drained
    }

    /// Closes the queue and wakes every waiting thread.
    ///
    /// Blocked and future `put` calls fail with [`PutError::Closed`],
    /// `take` keeps handing out buffered items and then fails with
    /// [`TakeError::Closed`].
    ///
    /// Returns `true` if this call closed the queue, `false` if it was
    /// already closed.
    pub fn close(&self) -> bool {
        let mut state = self.lock();
        if state.closed {
            return false;
        }
        state.closed = true;
        let pending = state.items.len();
        drop(state);

        tracing::debug!(pending, "queue closed");
        self.signals.wake_everyone();
        true
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Number of buffered items at the time of the call.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.lock().items.len() >= self.capacity
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn order(&self) -> OrderPolicy {
        self.order
    }

    #[must_use]
    pub fn wake_policy(&self) -> WakePolicy {
        self.wake
    }
}

impl<T> core::fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.lock();
        f.debug_struct("BoundedQueue")
            .field("capacity", &self.capacity)
            .field("len", &state.items.len())
            .field("closed", &state.closed)
            .field("order", &self.order)
            .field("wake", &self.wake)
            .finish()
    }
}
