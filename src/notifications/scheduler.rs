// SPDX-License-Identifier: MPL-2.0
//! Clock substrate for toast timers.
//!
//! A [`Scheduler`] runs a callback once after a delay and can forget a
//! scheduled callback by handle. Two implementations are provided:
//!
//! - [`TickScheduler`]: a virtual clock the host advances, e.g. from a
//!   periodic UI tick. Deterministic, which also makes it the test clock.
//! - [`TokioScheduler`]: real time on a tokio `LocalSet`.
//!
//! Callbacks always run from the scheduler's own call stack, never from
//! inside [`Scheduler::schedule`].

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Identifies one scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduleHandle(u64);

/// Callback run when a scheduled delay elapses.
pub type Callback = Box<dyn FnOnce()>;

/// Single-shot delayed execution.
pub trait Scheduler {
    /// Runs `callback` once after `delay`.
    fn schedule(&self, delay: Duration, callback: Callback) -> ScheduleHandle;

    /// Forgets a scheduled callback. Unknown or already fired handles are
    /// ignored.
    fn unschedule(&self, handle: ScheduleHandle);
}

// =============================================================================
// TickScheduler
// =============================================================================

#[derive(Default)]
struct TickState {
    now: Duration,
    next_handle: u64,
    /// Keyed by (due time, handle) so equal deadlines fire in schedule order.
    pending: BTreeMap<(Duration, u64), Callback>,
    /// Only kept by clocks built with [`TickScheduler::recording`].
    requested: Option<Vec<Duration>>,
}

/// Virtual clock advanced explicitly by the host.
///
/// Clones share the same clock.
#[derive(Clone, Default)]
pub struct TickScheduler {
    state: Rc<RefCell<TickState>>,
}

impl TickScheduler {
    /// Creates a clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock at time zero that also remembers every requested
    /// delay. Intended for tests; the log is never trimmed.
    #[must_use]
    pub fn recording() -> Self {
        let clock = Self::new();
        clock.state.borrow_mut().requested = Some(Vec::new());
        clock
    }

    /// Time elapsed on this clock.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    /// Moves the clock forward, running every callback that falls due.
    ///
    /// Callbacks run in deadline order and may schedule further callbacks;
    /// those run too if they fall due within the same advance. Returns the
    /// number of callbacks run.
    pub fn advance(&self, elapsed: Duration) -> usize {
        let target = self.now() + elapsed;
        let mut fired = 0;

        loop {
            let callback = {
                let mut state = self.state.borrow_mut();
                let next_due = state.pending.keys().next().map(|&(due, _)| due);
                match next_due {
                    Some(due) if due <= target => {
                        state.now = due;
                        state.pending.pop_first().map(|(_, callback)| callback)
                    }
                    _ => None,
                }
            };
            // Borrow released: the callback may schedule or unschedule.
            match callback {
                Some(callback) => {
                    callback();
                    fired += 1;
                }
                None => break,
            }
        }

        self.state.borrow_mut().now = target;
        fired
    }

    /// Number of callbacks waiting to fire.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Every delay passed to [`Scheduler::schedule`], in call order.
    ///
    /// Always empty unless the clock was built with
    /// [`TickScheduler::recording`].
    #[must_use]
    pub fn requested_delays(&self) -> Vec<Duration> {
        self.state.borrow().requested.clone().unwrap_or_default()
    }
}

impl Scheduler for TickScheduler {
    fn schedule(&self, delay: Duration, callback: Callback) -> ScheduleHandle {
        let mut state = self.state.borrow_mut();
        let handle = state.next_handle;
        state.next_handle += 1;
        let due = state.now + delay;
        state.pending.insert((due, handle), callback);
        if let Some(requested) = state.requested.as_mut() {
            requested.push(delay);
        }
        ScheduleHandle(handle)
    }

    fn unschedule(&self, handle: ScheduleHandle) {
        self.state
            .borrow_mut()
            .pending
            .retain(|&(_, id), _| id != handle.0);
    }
}

impl fmt::Debug for TickScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("TickScheduler")
            .field("now", &state.now)
            .field("pending", &state.pending.len())
            .finish()
    }
}

// =============================================================================
// TokioScheduler
// =============================================================================

/// Real-time scheduler backed by `tokio::task::spawn_local`.
///
/// Must be used from within a [`tokio::task::LocalSet`]; scheduling outside
/// one panics, as `spawn_local` does.
#[derive(Clone, Default)]
pub struct TokioScheduler {
    tasks: Rc<RefCell<HashMap<u64, JoinHandle<()>>>>,
    next_handle: Rc<Cell<u64>>,
}

impl TokioScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks waiting to fire.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.tasks.borrow().len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, callback: Callback) -> ScheduleHandle {
        let handle = self.next_handle.get();
        self.next_handle.set(handle + 1);

        let tasks = Rc::clone(&self.tasks);
        let task = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            tasks.borrow_mut().remove(&handle);
            callback();
        });
        self.tasks.borrow_mut().insert(handle, task);
        ScheduleHandle(handle)
    }

    fn unschedule(&self, handle: ScheduleHandle) {
        if let Some(task) = self.tasks.borrow_mut().remove(&handle.0) {
            task.abort();
        }
    }
}

impl fmt::Debug for TokioScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokioScheduler")
            .field("pending", &self.pending_count())
            .finish()
    }
}
