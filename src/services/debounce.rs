//! Debounced delivery of rapidly changing values.
//!
//! [`DebounceTimer`] is the cancellable primitive (`schedule` / `cancel`);
//! [`Debouncer`] layers the usual "restart the wait on every input" policy
//! on top of it. Settled values arrive on an unbounded channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::trace;

/// Identifies one scheduled delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

struct Pending {
    handle: TimerHandle,
    task: JoinHandle<()>,
}

/// Single-slot timer: delivers a value on its channel once a delay expires.
///
/// Scheduling a new value supersedes any earlier one still waiting; only the
/// most recent schedule can deliver. Dropping the timer cancels it.
pub struct DebounceTimer<T> {
    tx: mpsc::UnboundedSender<T>,
    generation: Arc<AtomicU64>,
    pending: Option<Pending>,
}

impl<T: Send + 'static> DebounceTimer<T> {
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let timer = Self {
            tx,
            generation: Arc::new(AtomicU64::new(0)),
            pending: None,
        };
        (timer, rx)
    }

    /// Delivers `value` after `after` unless cancelled or superseded first.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule(&mut self, value: T, after: Duration) -> TimerHandle {
        let id = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let handle = TimerHandle(id);
        let deadline = Instant::now() + after;

        let generation = Arc::clone(&self.generation);
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if generation.load(Ordering::SeqCst) == id {
                // Receiver gone means the consumer shut down.
                let _ = tx.send(value);
            }
        });

        if let Some(previous) = self.pending.replace(Pending { handle, task }) {
            previous.task.abort();
        }

        handle
    }

    /// Cancels `handle` if it is the live schedule. Returns whether it was.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match &self.pending {
            Some(p) if p.handle == handle => {
                self.cancel_pending();
                true
            }
            _ => false,
        }
    }

    /// Whether a scheduled value is still waiting to be delivered.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| !p.task.is_finished())
    }

    fn cancel_pending(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(pending) = self.pending.take() {
            pending.task.abort();
        }
    }
}

impl<T> Drop for DebounceTimer<T> {
    fn drop(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(pending) = self.pending.take() {
            pending.task.abort();
        }
    }
}

/// Collapses a stream of raw values into settled values.
///
/// A value settles once `delay` passes without another [`push`](Self::push).
pub struct Debouncer<T> {
    timer: DebounceTimer<T>,
    delay: Duration,
    last: Option<TimerHandle>,
}

impl<T: Send + 'static> Debouncer<T> {
    #[must_use]
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (timer, rx) = DebounceTimer::new();
        let debouncer = Self {
            timer,
            delay,
            last: None,
        };
        (debouncer, rx)
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    pub fn push(&mut self, value: T) {
        if let Some(previous) = self.last.take() {
            if self.timer.cancel(previous) {
                trace!("Debounce restarted");
            }
        }
        self.last = Some(self.timer.schedule(value, self.delay));
    }

    /// Drops any value still waiting to settle.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.last.take() {
            self.timer.cancel(handle);
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }
}
