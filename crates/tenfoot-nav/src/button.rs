#![forbid(unsafe_code)]

//! A ready-made selectable payload.
//!
//! Transitions are queued while the payload changes state and delivered to
//! the hook later: a [`Handler`](crate::Handler) delivers them once it has
//! released the map, so a hook may read the map or drive the handler.
//! Outside a handler, [`Button::flush_hooks`] delivers them.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::focusable::{Deferred, Focusable, NavState, Selectable};

/// State change reported to a [`Button`] hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Focused,
    Blurred,
    Selected,
    Deselected,
}

/// Hook invoked with the button name on every transition.
pub type TransitionHook = Box<dyn FnMut(&str, Transition)>;

struct HookSlot {
    name: String,
    hook: RefCell<TransitionHook>,
    queue: RefCell<VecDeque<Transition>>,
}

impl HookSlot {
    /// Deliver queued transitions in order. A hook that causes further
    /// transitions of its own button has them delivered by the outer drain.
    fn drain(&self) {
        let Ok(mut guard) = self.hook.try_borrow_mut() else {
            return;
        };
        let hook = &mut *guard;
        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(transition) = next else { break };
            hook(&self.name, transition);
        }
    }
}

/// Named selectable payload with an optional transition hook.
pub struct Button {
    name: String,
    state: NavState,
    slot: Option<Rc<HookSlot>>,
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("hook", &self.slot.is_some())
            .finish()
    }
}

impl Button {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: NavState::new(),
            slot: None,
        }
    }

    /// Builder: install a transition hook.
    ///
    /// The hook never runs inside a state change; see the module docs.
    #[must_use]
    pub fn with_hook(mut self, hook: impl FnMut(&str, Transition) + 'static) -> Self {
        self.slot = Some(Rc::new(HookSlot {
            name: self.name.clone(),
            hook: RefCell::new(Box::new(hook)),
            queue: RefCell::new(VecDeque::new()),
        }));
        self
    }

    /// Builder: start disabled.
    #[must_use]
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.state.set_disabled(disabled);
        self
    }

    /// Button label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Deliver queued transitions now.
    pub fn flush_hooks(&mut self) {
        if let Some(slot) = &self.slot {
            slot.drain();
        }
    }

    fn notify(&mut self, transition: Transition) {
        if let Some(slot) = &self.slot {
            slot.queue.borrow_mut().push_back(transition);
        }
    }
}

impl Focusable for Button {
    fn nav_state(&self) -> &NavState {
        &self.state
    }

    fn nav_state_mut(&mut self) -> &mut NavState {
        &mut self.state
    }

    fn on_focused(&mut self) {
        self.notify(Transition::Focused);
    }

    fn on_blurred(&mut self) {
        self.notify(Transition::Blurred);
    }

    fn take_deferred(&mut self) -> Option<Deferred> {
        let slot = self.slot.as_ref()?;
        if slot.queue.borrow().is_empty() {
            return None;
        }
        let slot = Rc::clone(slot);
        Some(Box::new(move || slot.drain()))
    }
}

impl Selectable for Button {
    fn on_selected(&mut self) {
        self.notify(Transition::Selected);
    }

    fn on_deselected(&mut self) {
        self.notify(Transition::Deselected);
    }
}
