#![forbid(unsafe_code)]

//! Delayed-callback scheduling.
//!
//! The navigation layer never sleeps or spawns threads. It hands closures to
//! a [`Scheduler`] supplied by the host (a UI event loop, a test harness) and
//! cancels them by [`TaskHandle`].
//!
//! [`ManualScheduler`] is a deterministic implementation driven by a virtual
//! clock: nothing runs until the owner calls [`ManualScheduler::advance`].
//!
//! # Invariants
//!
//! 1. `schedule` never runs the task synchronously.
//! 2. Tasks run in due-time order; ties run in scheduling order.
//! 3. A cancelled task never runs; cancelling twice (or after it ran) is a
//!    no-op returning `false`.
//! 4. The scheduler's internal borrow is released before a task runs, so a
//!    task may schedule or cancel other tasks.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Duration;

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce()>;

/// Handle identifying one scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

impl TaskHandle {
    /// Raw numeric id, useful for diagnostics.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Host scheduler for delayed callbacks.
pub trait Scheduler {
    /// Run `task` once, `delay` from now.
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle;

    /// Cancel a pending task. Returns `true` if it was still pending.
    fn cancel(&self, handle: TaskHandle) -> bool;
}

/// Deterministic scheduler driven by an explicit virtual clock.
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<Duration>,
    next_id: Cell<u64>,
    queue: RefCell<BTreeMap<(Duration, u64), Task>>,
    due_by_id: RefCell<HashMap<u64, Duration>>,
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("now", &self.now.get())
            .field("pending", &self.pending())
            .finish()
    }
}

impl ManualScheduler {
    /// Create a scheduler with its clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Number of tasks waiting to run.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Whether `handle` is still waiting to run.
    #[must_use]
    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.due_by_id.borrow().contains_key(&handle.0)
    }

    /// Due time of the earliest pending task.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.borrow().keys().next().map(|(due, _)| *due)
    }

    /// Move the clock forward by `by`, running every task that falls due.
    ///
    /// Returns the number of tasks that ran. Tasks scheduled by running
    /// tasks also run if they fall due within the window.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now.get() + by;
        let mut ran = 0;
        while let Some(task) = self.pop_due(target) {
            task();
            ran += 1;
        }
        self.now.set(target);
        ran
    }

    /// Run tasks until none remain, jumping the clock to each due time.
    ///
    /// Returns the number of tasks that ran.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while let Some(due) = self.next_due() {
            let step = due.saturating_sub(self.now.get());
            ran += self.advance(step);
        }
        ran
    }

    fn pop_due(&self, target: Duration) -> Option<Task> {
        let mut queue = self.queue.borrow_mut();
        let (&(due, id), _) = queue.iter().next()?;
        if due > target {
            return None;
        }
        let task = queue.remove(&(due, id))?;
        self.due_by_id.borrow_mut().remove(&id);
        self.now.set(due);
        Some(task)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let due = self.now.get() + delay;
        self.queue.borrow_mut().insert((due, id), task);
        self.due_by_id.borrow_mut().insert(id, due);
        TaskHandle(id)
    }

    fn cancel(&self, handle: TaskHandle) -> bool {
        let Some(due) = self.due_by_id.borrow_mut().remove(&handle.0) else {
            return false;
        };
        self.queue.borrow_mut().remove(&(due, handle.0)).is_some()
    }
}
