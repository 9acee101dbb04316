//! Unbounded multi-sender channel with a doorbell and cooperative cancellation.
//!
//! Senders ring the doorbell on every message so an idle receiver wakes
//! immediately. Cancelling the channel wakes every wait and makes further
//! sends fail.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use embassy_time::Duration;

/// Error returned when the receiving side is gone or the channel is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendError<T>(pub T);

/// Error returned when trying to receive from an empty channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TryReceiveError;

/// Why a blocking wait returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// At least one message is waiting
    Message,
    TimedOut,
    Cancelled,
}

struct State<T> {
    queue: VecDeque<T>,
    cancelled: bool,
    closed: bool,
}

struct Shared<T> {
    state: Mutex<State<T>>,
    doorbell: Condvar,
}

impl<T> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cancel(&self) {
        self.lock().cancelled = true;
        self.doorbell.notify_all();
    }
}

/// Create a new channel.
pub fn channel<T>() -> (Sender<T>, Receiver<T>) {
    let shared = Arc::new(Shared {
        state: Mutex::new(State {
            queue: VecDeque::new(),
            cancelled: false,
            closed: false,
        }),
        doorbell: Condvar::new(),
    });
    (
        Sender {
            shared: Arc::clone(&shared),
        },
        Receiver { shared },
    )
}

/// A sender handle for a channel.
///
/// Cloning is cheap; all clones feed the same queue.
pub struct Sender<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Sender<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Sender<T> {
    /// Queue a value and wake the receiver.
    ///
    /// Returns `Err(SendError(value))` once the channel is cancelled or the
    /// receiver is dropped.
    pub fn send(&self, value: T) -> Result<(), SendError<T>> {
        let mut state = self.shared.lock();
        if state.cancelled || state.closed {
            return Err(SendError(value));
        }
        state.queue.push_back(value);
        drop(state);
        self.shared.doorbell.notify_all();
        Ok(())
    }

    /// Ask the receiving side to stop
    pub fn cancel(&self) {
        self.shared.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.lock().cancelled
    }
}

/// The receiving half of a channel.
pub struct Receiver<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Receiver<T> {
    /// Try to receive a value from the channel.
    ///
    /// Returns `Err(TryReceiveError)` if the channel is empty.
    pub fn try_receive(&self) -> Result<T, TryReceiveError> {
        self.shared.lock().queue.pop_front().ok_or(TryReceiveError)
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.lock().cancelled
    }

    pub fn cancel(&self) {
        self.shared.cancel();
    }

    /// Get another sender handle for this channel.
    pub fn sender(&self) -> Sender<T> {
        Sender {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Block until a message arrives, the channel is cancelled, or `timeout` passes
    pub fn wait(&self, timeout: Duration) -> Wake {
        let state = self.shared.lock();
        let (state, _) = self
            .shared
            .doorbell
            .wait_timeout_while(state, to_std(timeout), |state| {
                !state.cancelled && state.queue.is_empty()
            })
            .unwrap_or_else(PoisonError::into_inner);
        if state.cancelled {
            Wake::Cancelled
        } else if state.queue.is_empty() {
            Wake::TimedOut
        } else {
            Wake::Message
        }
    }

    /// Sleep for `duration`, returning early only on cancellation
    ///
    /// Returns `true` when the channel was cancelled.
    pub fn sleep(&self, duration: Duration) -> bool {
        let state = self.shared.lock();
        let (state, _) = self
            .shared
            .doorbell
            .wait_timeout_while(state, to_std(duration), |state| !state.cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        state.cancelled
    }
}

impl<T> Drop for Receiver<T> {
    fn drop(&mut self) {
        let mut state = self.shared.lock();
        state.closed = true;
        state.queue.clear();
    }
}

fn to_std(duration: Duration) -> std::time::Duration {
    std::time::Duration::from_micros(duration.as_micros())
}
