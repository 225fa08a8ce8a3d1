#![forbid(unsafe_code)]

//! Cancellable delayed tasks on a cooperative, host-driven clock.
//!
//! [`TimerQueue`] holds payloads scheduled to fire after a delay. The host
//! pumps it with [`advance`](TimerQueue::advance) from its frame or timer
//! loop; nothing runs on a background thread and nothing blocks.
//!
//! Every scheduled task returns a [`TaskHandle`]. Cancelling a handle removes
//! the task so it can never fire, which is how the engine guarantees that a
//! measurement pass for a superseded step never writes a stale position.
//!
//! # Invariants
//!
//! 1. A cancelled task never fires.
//! 2. Due tasks fire in deadline order; ties fire in scheduling order.
//! 3. A task scheduled with a longer delay never fires before one scheduled
//!    earlier with a shorter delay.
//! 4. Handles are never reused within one queue.
//!
//! # Example
//!
//! ```
//! use tour_runtime::schedule::TimerQueue;
//! use web_time::Duration;
//!
//! let mut timers = TimerQueue::new();
//! let a = timers.schedule(Duration::from_millis(150), "refine step 0");
//! let _b = timers.schedule(Duration::from_millis(150), "refine step 1");
//! timers.cancel(a);
//!
//! let fired: Vec<_> = timers
//!     .advance(Duration::from_millis(200))
//!     .into_iter()
//!     .map(|(_, payload)| payload)
//!     .collect();
//! assert_eq!(fired, vec!["refine step 1"]);
//! ```

use web_time::Duration;

/// Identifies one scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

impl TaskHandle {
    /// Raw id, for logging.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
struct Scheduled<T> {
    handle: TaskHandle,
    deadline: Duration,
    payload: T,
}

/// Delayed tasks keyed by [`TaskHandle`], fired by advancing a virtual clock.
#[derive(Debug)]
pub struct TimerQueue<T> {
    now: Duration,
    next_id: u64,
    tasks: Vec<Scheduled<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Create an empty queue with its clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 1,
            tasks: Vec::new(),
        }
    }

    /// Schedule `payload` to fire once `delay` has elapsed.
    pub fn schedule(&mut self, delay: Duration, payload: T) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        let deadline = self.now.checked_add(delay).unwrap_or(Duration::MAX);
        self.tasks.push(Scheduled {
            handle,
            deadline,
            payload,
        });
        handle
    }

    /// Cancel a pending task. Returns `false` if it already fired or was
    /// already cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.handle != handle);
        self.tasks.len() != before
    }

    /// Whether `handle` is still waiting to fire.
    #[must_use]
    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|t| t.handle == handle)
    }

    /// Number of pending tasks.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Time until the earliest pending task is due, if any.
    ///
    /// Hosts backed by a real timer can sleep for this long before calling
    /// [`advance`](Self::advance).
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.tasks
            .iter()
            .map(|t| t.deadline.saturating_sub(self.now))
            .min()
    }

    /// Move the clock forward and return every task that became due.
    ///
    /// Returned tasks are removed from the queue and ordered by deadline,
    /// then by scheduling order.
    pub fn advance(&mut self, delta: Duration) -> Vec<(TaskHandle, T)> {
        self.now = self.now.checked_add(delta).unwrap_or(Duration::MAX);
        let now = self.now;

        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.tasks.drain(..).partition(|t| t.deadline <= now);
        self.tasks = waiting;

        due.sort_by_key(|t| (t.deadline, t.handle));
        due.into_iter().map(|t| (t.handle, t.payload)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn nothing_fires_before_deadline() {
        let mut q = TimerQueue::new();
        q.schedule(ms(100), 1);
        assert!(q.advance(ms(99)).is_empty());
        assert_eq!(q.pending(), 1);
        let fired = q.advance(ms(1));
        assert_eq!(fired.len(), 1);
        assert_eq!(q.pending(), 0);
    }

    #[test]
    fn fires_in_deadline_then_schedule_order() {
        let mut q = TimerQueue::new();
        q.schedule(ms(150), "b");
        q.schedule(ms(50), "a");
        q.schedule(ms(150), "c");
        let fired: Vec<_> = q.advance(ms(500)).into_iter().map(|(_, p)| p).collect();
        assert_eq!(fired, vec!["a", "b", "c"]);
    }

    #[test]
    fn cancelled_task_never_fires() {
        let mut q = TimerQueue::new();
        let h = q.schedule(ms(10), ());
        assert!(q.is_pending(h));
        assert!(q.cancel(h));
        assert!(!q.is_pending(h));
        assert!(q.advance(ms(100)).is_empty());
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut q = TimerQueue::new();
        let h = q.schedule(ms(10), ());
        assert!(q.cancel(h));
        assert!(!q.cancel(h));
    }

    #[test]
    fn cancel_after_fire_returns_false() {
        let mut q = TimerQueue::new();
        let h = q.schedule(ms(10), ());
        q.advance(ms(10));
        assert!(!q.cancel(h));
    }

    #[test]
    fn handles_are_unique() {
        let mut q = TimerQueue::new();
        let a = q.schedule(ms(1), ());
        q.advance(ms(1));
        let b = q.schedule(ms(1), ());
        assert_ne!(a, b);
    }

    #[test]
    fn delays_are_relative_to_current_clock() {
        let mut q = TimerQueue::new();
        q.advance(ms(1000));
        q.schedule(ms(50), ());
        assert_eq!(q.next_deadline(), Some(ms(50)));
        assert!(q.advance(ms(49)).is_empty());
        assert_eq!(q.next_deadline(), Some(ms(1)));
        assert_eq!(q.advance(ms(1)).len(), 1);
        assert_eq!(q.next_deadline(), None);
    }

    #[test]
    fn zero_delay_fires_on_next_advance() {
        let mut q = TimerQueue::new();
        q.schedule(Duration::ZERO, ());
        assert_eq!(q.advance(Duration::ZERO).len(), 1);
    }

    #[test]
    fn huge_delay_saturates() {
        let mut q = TimerQueue::new();
        q.advance(ms(5));
        q.schedule(Duration::MAX, ());
        assert!(q.advance(ms(1_000_000)).is_empty());
        assert_eq!(q.pending(), 1);
    }
}
