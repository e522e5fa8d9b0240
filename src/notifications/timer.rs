// SPDX-License-Identifier: MPL-2.0
//! Per-toast auto-dismiss timer.
//!
//! A [`Timer`] wraps a scheduler handle with an explicit state so that a
//! late expiry, a double cancel, or a cancel after expiry are all harmless:
//!
//! ```text
//! Idle ──start(positive delay)──▶ Running ──fires──▶ Expired
//!                                    │
//!                                    └──cancel──▶ Cancelled
//! ```
//!
//! `Expired` and `Cancelled` are terminal. A timer started with
//! [`Timeout::Never`] stays `Idle`.

use super::resolver::Timeout;
use super::scheduler::{ScheduleHandle, Scheduler};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// No timer was created.
    Idle,
    /// Scheduled and not yet fired.
    Running,
    /// Fired; the expiry callback ran exactly once.
    Expired,
    /// Cancelled before firing; the expiry callback never runs.
    Cancelled,
}

/// Owned auto-dismiss timer. Dropping a running timer cancels it.
pub struct Timer {
    state: Rc<Cell<TimerState>>,
    scheduled: Option<(Rc<dyn Scheduler>, ScheduleHandle)>,
}

impl Timer {
    /// A timer that never runs.
    #[must_use]
    pub fn idle() -> Self {
        Self {
            state: Rc::new(Cell::new(TimerState::Idle)),
            scheduled: None,
        }
    }

    /// Starts a timer for `timeout`, or returns an idle timer for
    /// [`Timeout::Never`].
    pub fn start(
        scheduler: &Rc<dyn Scheduler>,
        timeout: Timeout,
        on_expire: impl FnOnce() + 'static,
    ) -> Self {
        let Some(delay) = timeout.duration() else {
            return Self::idle();
        };

        let state = Rc::new(Cell::new(TimerState::Running));
        let fire_state = Rc::clone(&state);
        let handle = scheduler.schedule(
            delay,
            Box::new(move || {
                if fire_state.get() == TimerState::Running {
                    fire_state.set(TimerState::Expired);
                    on_expire();
                }
            }),
        );

        Self {
            state,
            scheduled: Some((Rc::clone(scheduler), handle)),
        }
    }

    /// Cancels a running timer. No-op in any other state.
    pub fn cancel(&mut self) {
        if self.state.get() != TimerState::Running {
            return;
        }
        self.state.set(TimerState::Cancelled);
        if let Some((scheduler, handle)) = self.scheduled.take() {
            scheduler.unschedule(handle);
        }
    }

    #[must_use]
    pub fn state(&self) -> TimerState {
        self.state.get()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state() == TimerState::Running
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("state", &self.state.get())
            .field("handle", &self.scheduled.as_ref().map(|(_, handle)| *handle))
            .finish()
    }
}
