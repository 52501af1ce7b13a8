#![forbid(unsafe_code)]

//! Named-event publish/subscribe with synchronous, ordered dispatch.
//!
//! # Design
//!
//! [`EventTarget<A>`] keeps one listener list per event type name. Listeners
//! are reference-counted closures (`Rc<dyn Fn(&mut Event<A>)>`), so the
//! caller keeps a clone of the `Rc` it registered and removes exactly that
//! listener later by pointer identity.
//!
//! # Invariants
//!
//! 1. Listeners for a type run in registration order.
//! 2. `fire` never holds the listener table borrow while a listener runs, so
//!    listeners may add or remove listeners (changes apply to the next fire).
//! 3. An exclusive registration leaves exactly one listener for its type.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Empty type name | Caller error | `add_listener` → `false`, `fire` → `None` |
//! | Listener panics | Listener bug | Panic propagates to the caller of `fire` |
//! | Unknown listener | Never registered | `remove_listener` → `false` |

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A listener callback. Keep a clone to remove it later.
pub type Listener<A> = Rc<dyn Fn(&mut Event<A>)>;

/// Completion callback carried by an event record. Dispatch does not call it;
/// listeners decide whether to.
pub type Callback<A> = Rc<dyn Fn(&A)>;

/// Event record handed to every listener of one `fire` call.
pub struct Event<A> {
    /// Event type name.
    pub kind: String,
    /// Event arguments.
    pub args: A,
    /// Optional completion callback supplied by the emitter.
    pub callback: Option<Callback<A>>,
    /// Set by listeners to signal cancellation to the emitter.
    pub cancel: bool,
    /// Name of the emitting target, if it was given one.
    pub target: Option<Rc<str>>,
}

impl<A> Event<A> {
    /// Invoke the completion callback, if any.
    pub fn complete(&self) -> bool {
        match &self.callback {
            Some(callback) => {
                callback(&self.args);
                true
            }
            None => false,
        }
    }
}

impl<A: fmt::Debug> fmt::Debug for Event<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("kind", &self.kind)
            .field("args", &self.args)
            .field("has_callback", &self.callback.is_some())
            .field("cancel", &self.cancel)
            .field("target", &self.target)
            .finish()
    }
}

/// Named event emitter.
pub struct EventTarget<A> {
    name: Option<Rc<str>>,
    listeners: RefCell<HashMap<String, Vec<Listener<A>>>>,
}

impl<A> Default for EventTarget<A> {
    fn default() -> Self {
        Self {
            name: None,
            listeners: RefCell::new(HashMap::new()),
        }
    }
}

impl<A> fmt::Debug for EventTarget<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.borrow();
        let mut counts: Vec<_> = listeners.iter().map(|(k, v)| (k.clone(), v.len())).collect();
        counts.sort();
        f.debug_struct("EventTarget")
            .field("name", &self.name)
            .field("listeners", &counts)
            .finish()
    }
}

impl<A> EventTarget<A> {
    /// Create an emitter with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an emitter whose events carry `name` as their target.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(Rc::from(name)),
            ..Self::default()
        }
    }

    /// Name stamped on emitted events.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Register `listener` for `kind`.
    ///
    /// With `exclusive`, every listener already registered for `kind` is
    /// dropped first. Returns `false` (and registers nothing) if `kind` is
    /// empty.
    pub fn add_listener(&self, kind: &str, listener: Listener<A>, exclusive: bool) -> bool {
        if kind.is_empty() {
            return false;
        }
        let mut listeners = self.listeners.borrow_mut();
        let list = listeners.entry(kind.to_owned()).or_default();
        if exclusive {
            list.clear();
        }
        list.push(listener);
        true
    }

    /// Dispatch an event to every listener of `kind`, in registration order.
    ///
    /// Returns the event record after all listeners ran, or `None` if `kind`
    /// is empty.
    pub fn fire(&self, kind: &str, args: A, callback: Option<Callback<A>>) -> Option<Event<A>> {
        if kind.is_empty() {
            return None;
        }

        let mut event = Event {
            kind: kind.to_owned(),
            args,
            callback,
            cancel: false,
            target: self.name.clone(),
        };

        // Snapshot first so listeners can re-enter the table.
        let snapshot: Vec<Listener<A>> = self
            .listeners
            .borrow()
            .get(kind)
            .map(|list| list.to_vec())
            .unwrap_or_default();

        for listener in &snapshot {
            listener(&mut event);
        }

        Some(event)
    }

    /// Remove a listener.
    ///
    /// With `None`, clears every listener of `kind` and reports whether any
    /// existed. Otherwise removes the first listener that is the same `Rc` as
    /// `listener` and reports whether one was found.
    pub fn remove_listener(&self, kind: &str, listener: Option<&Listener<A>>) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let Some(list) = listeners.get_mut(kind) else {
            return false;
        };
        match listener {
            None => {
                let found = !list.is_empty();
                list.clear();
                found
            }
            Some(target) => match list.iter().position(|l| Rc::ptr_eq(l, target)) {
                Some(idx) => {
                    list.remove(idx);
                    true
                }
                None => false,
            },
        }
    }

    /// Remove every listener of `kind`.
    pub fn remove_listeners(&self, kind: &str) -> bool {
        self.remove_listener(kind, None)
    }

    /// Number of listeners registered for `kind`.
    #[must_use]
    pub fn size(&self, kind: &str) -> usize {
        self.listeners.borrow().get(kind).map_or(0, Vec::len)
    }

    /// Whether `listener` is currently registered for `kind`.
    #[must_use]
    pub fn contains(&self, kind: &str, listener: &Listener<A>) -> bool {
        self.listeners
            .borrow()
            .get(kind)
            .is_some_and(|list| list.iter().any(|l| Rc::ptr_eq(l, listener)))
    }
}
