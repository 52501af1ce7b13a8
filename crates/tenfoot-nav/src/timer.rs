#![forbid(unsafe_code)]

//! Auto-trigger timers.
//!
//! A [`Timer`] binds one [`TimerTarget`] and one [`TimerOp`]. Starting it
//! schedules the operation on the host [`Scheduler`] after half the
//! configured delay; cancelling drops the pending task.
//!
//! # Invariants
//!
//! 1. A timer without a target or an operation is never enabled.
//! 2. The target is held weakly; a dropped target turns firing into a no-op.
//! 3. The pending handle is cleared before the operation runs, so the
//!    operation may restart the timer.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Start while disabled | No target/op, or switched off | `start_timer` → `false` |
//! | Start while pending | Caller restarts without cancel | Earlier task stays scheduled; only the latest handle is tracked |
//! | Cancel while idle | Nothing pending | `cancel_timer` → `false` |
//! | Target dropped | Owner went away | Task runs, does nothing |

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tenfoot_core::{Scheduler, TaskHandle};

use crate::focusable::Selectable;

/// Default delay for select timers.
pub const DEFAULT_SELECT_DELAY: Duration = Duration::from_millis(700);
/// Default delay for focus timers.
pub const DEFAULT_FOCUS_DELAY: Duration = Duration::from_millis(1500);
/// Default delay for timers without an operation.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// Operation a timer triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerOp {
    /// Give the target focus.
    Focus,
    /// Select the target.
    Select,
}

impl TimerOp {
    /// Lowercase name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TimerOp::Focus => "focus",
            TimerOp::Select => "select",
        }
    }

    /// Delay used when none is configured.
    #[must_use]
    pub const fn default_delay(self) -> Duration {
        match self {
            TimerOp::Focus => DEFAULT_FOCUS_DELAY,
            TimerOp::Select => DEFAULT_SELECT_DELAY,
        }
    }
}

/// Something a timer can trigger.
pub trait TimerTarget {
    /// Run `op`. Returns whether it took effect.
    fn trigger(&self, op: TimerOp) -> bool;
}

impl<P: Selectable> TimerTarget for RefCell<P> {
    fn trigger(&self, op: TimerOp) -> bool {
        let (done, deferred) = {
            let mut payload = self.borrow_mut();
            let done = match op {
                TimerOp::Focus => payload.focus(),
                TimerOp::Select => payload.select(),
            };
            (done, payload.take_deferred())
        };
        if let Some(run) = deferred {
            run();
        }
        done
    }
}

/// Construction options for [`Timer`].
#[derive(Clone, Default)]
pub struct TimerOptions {
    /// Object the operation runs on.
    pub target: Option<Weak<dyn TimerTarget>>,
    /// Operation to trigger.
    pub op: Option<TimerOp>,
    /// Configured delay; the task is scheduled after half of it.
    pub delay: Option<Duration>,
    /// Label used in logs.
    pub name: String,
    /// Requested state; ignored without target and operation.
    pub enabled: bool,
}

impl fmt::Debug for TimerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerOptions")
            .field("target", &self.target.is_some())
            .field("op", &self.op)
            .field("delay", &self.delay)
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl TimerOptions {
    /// Options with only a name; the timer they build stays disabled.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder: bind the target and operation.
    #[must_use]
    pub fn with_target(mut self, target: Weak<dyn TimerTarget>, op: TimerOp) -> Self {
        self.target = Some(target);
        self.op = Some(op);
        self
    }

    /// Builder: override the operation's default delay.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Builder: request the timer on or off.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Cancellable delayed trigger of one operation on one target.
pub struct Timer {
    name: String,
    op: Option<TimerOp>,
    delay: Duration,
    enabled: Cell<bool>,
    target: Option<Weak<dyn TimerTarget>>,
    scheduler: Rc<dyn Scheduler>,
    pending: Rc<Cell<Option<TaskHandle>>>,
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("name", &self.name)
            .field("op", &self.op)
            .field("delay", &self.delay)
            .field("enabled", &self.enabled.get())
            .field("pending", &self.pending.get())
            .finish()
    }
}

impl Timer {
    /// Build a timer that schedules on `scheduler`.
    #[must_use]
    pub fn new(options: TimerOptions, scheduler: Rc<dyn Scheduler>) -> Self {
        let TimerOptions {
            target,
            op,
            delay,
            name,
            enabled,
        } = options;
        let delay = delay.unwrap_or_else(|| op.map_or(DEFAULT_DELAY, TimerOp::default_delay));
        let enabled = enabled && target.is_some() && op.is_some();
        Self {
            name,
            op,
            delay,
            enabled: Cell::new(enabled),
            target,
            scheduler,
            pending: Rc::new(Cell::new(None)),
        }
    }

    /// Label used in logs.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bound operation.
    #[must_use]
    pub fn op(&self) -> Option<TimerOp> {
        self.op
    }

    /// Configured delay (the task runs after half of it).
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether `start_timer` schedules anything.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Switch the timer on or off. A timer without target or operation
    /// stays off. Returns the resulting state.
    pub fn set_enabled(&self, enabled: bool) -> bool {
        let enabled = enabled && self.target.is_some() && self.op.is_some();
        self.enabled.set(enabled);
        enabled
    }

    /// Whether a started task is still tracked.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }

    /// Schedule the bound operation after half the delay.
    ///
    /// Starting again before the task runs does not cancel the earlier task.
    pub fn start_timer(&self, tag: Option<&str>) -> bool {
        if !self.enabled.get() {
            return false;
        }

        let target = self.target.clone();
        let op = self.op;
        let pending = Rc::clone(&self.pending);
        let name = self.name.clone();
        let handle = self.scheduler.schedule(
            self.delay / 2,
            Box::new(move || {
                pending.set(None);
                trigger(target.as_ref(), op, &name);
            }),
        );
        self.pending.set(Some(handle));

        tracing::debug!(
            timer = %self.name,
            op = self.op.map(TimerOp::as_str),
            tag = tag.unwrap_or(""),
            task = handle.id(),
            "timer.start"
        );
        true
    }

    /// Cancel the tracked task. Returns `false` when nothing was pending.
    pub fn cancel_timer(&self, tag: Option<&str>) -> bool {
        let Some(handle) = self.pending.take() else {
            return false;
        };
        self.scheduler.cancel(handle);
        tracing::trace!(
            timer = %self.name,
            tag = tag.unwrap_or(""),
            task = handle.id(),
            "timer.cancel"
        );
        true
    }

    /// Run the bound operation now.
    ///
    /// Returns `false` when the target is gone or no operation is bound.
    pub fn fire(&self) -> bool {
        trigger(self.target.as_ref(), self.op, &self.name)
    }
}

fn trigger(target: Option<&Weak<dyn TimerTarget>>, op: Option<TimerOp>, name: &str) -> bool {
    let (Some(target), Some(op)) = (target.and_then(Weak::upgrade), op) else {
        tracing::trace!(timer = name, "timer.fire skipped");
        return false;
    };
    tracing::debug!(timer = name, op = op.as_str(), "timer.fire");
    target.trigger(op);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::{Button, Transition};
    use crate::focusable::NavState;
    use tenfoot_core::ManualScheduler;

    struct Counter {
        hits: Cell<u32>,
        last: Cell<Option<TimerOp>>,
    }

    impl TimerTarget for Counter {
        fn trigger(&self, op: TimerOp) -> bool {
            self.hits.set(self.hits.get() + 1);
            self.last.set(Some(op));
            true
        }
    }

    fn counter() -> Rc<Counter> {
        Rc::new(Counter {
            hits: Cell::new(0),
            last: Cell::new(None),
        })
    }

    fn timer_for(target: &Rc<Counter>, op: TimerOp, sched: &Rc<ManualScheduler>) -> Timer {
        let weak: Weak<dyn TimerTarget> = Rc::downgrade(target) as Weak<dyn TimerTarget>;
        Timer::new(
            TimerOptions::new("t").with_target(weak, op).with_enabled(true),
            Rc::clone(sched) as Rc<dyn Scheduler>,
        )
    }

    #[test]
    fn default_delays() {
        let sched = Rc::new(ManualScheduler::new());
        let target = counter();
        assert_eq!(timer_for(&target, TimerOp::Select, &sched).delay(), DEFAULT_SELECT_DELAY);
        assert_eq!(timer_for(&target, TimerOp::Focus, &sched).delay(), DEFAULT_FOCUS_DELAY);
        let bare = Timer::new(TimerOptions::new("bare"), sched);
        assert_eq!(bare.delay(), DEFAULT_DELAY);
    }

    #[test]
    fn enabled_requires_target_and_op() {
        let sched: Rc<dyn Scheduler> = Rc::new(ManualScheduler::new());
        let timer = Timer::new(TimerOptions::new("t").with_enabled(true), Rc::clone(&sched));
        assert!(!timer.is_enabled());
        assert!(!timer.set_enabled(true));
        assert!(!timer.start_timer(None));
    }

    #[test]
    fn fires_after_half_the_delay() {
        let sched = Rc::new(ManualScheduler::new());
        let target = counter();
        let timer = timer_for(&target, TimerOp::Select, &sched);

        assert!(timer.start_timer(Some("onRight")));
        assert!(timer.is_pending());
        sched.advance(Duration::from_millis(349));
        assert_eq!(target.hits.get(), 0);
        sched.advance(Duration::from_millis(1));
        assert_eq!(target.hits.get(), 1);
        assert_eq!(target.last.get(), Some(TimerOp::Select));
        assert!(!timer.is_pending());
    }

    #[test]
    fn cancel_before_due_prevents_run() {
        let sched = Rc::new(ManualScheduler::new());
        let target = counter();
        let timer = timer_for(&target, TimerOp::Select, &sched);

        timer.start_timer(None);
        sched.advance(Duration::from_millis(100));
        assert!(timer.cancel_timer(None));
        assert!(!timer.cancel_timer(None));
        sched.run_until_idle();
        assert_eq!(target.hits.get(), 0);
    }

    #[test]
    fn double_start_leaks_the_first_task() {
        let sched = Rc::new(ManualScheduler::new());
        let target = counter();
        let timer = timer_for(&target, TimerOp::Focus, &sched);

        assert!(timer.start_timer(None));
        assert!(timer.start_timer(None));
        assert_eq!(sched.pending(), 2);

        // Only the latest task is tracked; the first still runs.
        assert!(timer.cancel_timer(None));
        sched.run_until_idle();
        assert_eq!(target.hits.get(), 1);
    }

    #[test]
    fn disabled_timer_does_not_schedule() {
        let sched = Rc::new(ManualScheduler::new());
        let target = counter();
        let timer = timer_for(&target, TimerOp::Select, &sched);
        timer.set_enabled(false);
        assert!(!timer.start_timer(None));
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn dropped_target_makes_fire_a_noop() {
        let sched = Rc::new(ManualScheduler::new());
        let target = counter();
        let timer = timer_for(&target, TimerOp::Select, &sched);
        timer.start_timer(None);
        drop(target);
        assert!(!timer.fire());
        assert_eq!(sched.run_until_idle(), 1);
    }

    #[test]
    fn fire_runs_immediately() {
        let sched = Rc::new(ManualScheduler::new());
        let target = counter();
        let timer = timer_for(&target, TimerOp::Focus, &sched);
        assert!(timer.fire());
        assert_eq!(target.hits.get(), 1);
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn payload_cell_is_a_target() {
        let sched: Rc<dyn Scheduler> = Rc::new(ManualScheduler::new());
        let payload = Rc::new(RefCell::new(NavState::new()));
        let weak: Weak<dyn TimerTarget> = Rc::downgrade(&payload) as Weak<dyn TimerTarget>;
        let timer = Timer::new(
            TimerOptions::new("p").with_target(weak, TimerOp::Focus).with_enabled(true),
            sched,
        );
        assert!(timer.fire());
        assert!(payload.borrow().is_focused());
    }

    #[test]
    fn payload_hook_may_read_its_cell() {
        let sched: Rc<dyn Scheduler> = Rc::new(ManualScheduler::new());
        let seen = Rc::new(Cell::new(None));
        let slot: Rc<RefCell<Option<Weak<RefCell<Button>>>>> = Rc::new(RefCell::new(None));
        let (sink, back) = (Rc::clone(&seen), Rc::clone(&slot));
        let payload = Rc::new(RefCell::new(Button::new("b").with_hook(move |_: &str, t| {
            let button = back.borrow().as_ref().and_then(Weak::upgrade);
            let selected = button.map(|b| b.borrow().is_selected());
            sink.set(Some((t, selected)));
        })));
        *slot.borrow_mut() = Some(Rc::downgrade(&payload));

        let weak: Weak<dyn TimerTarget> = Rc::downgrade(&payload) as Weak<dyn TimerTarget>;
        let timer = Timer::new(
            TimerOptions::new("p").with_target(weak, TimerOp::Select).with_enabled(true),
            sched,
        );
        assert!(timer.fire());
        assert_eq!(seen.get(), Some((Transition::Selected, Some(true))));
    }
}
