#![forbid(unsafe_code)]

//! Navigation handler: focus and selection state over one map.
//!
//! A [`Handler`] owns a shared [`NavigationGraph`], the currently focused
//! and selected nodes, and two [`Timer`]s (auto-focus and auto-select). While
//! the handler holds input focus it is subscribed to
//! [`ON_KEY_DOWN`] on the [`InputService`]; arrow keys walk the map and
//! ENTER selects.
//!
//! ```text
//!            focus()                       blur()
//! Unfocused ─────────► Focused (listening) ─────────► Unfocused
//!                       │  ▲
//!        up/down/left/  │  │  move focus, restart timers
//!        right/select   └──┘
//! ```
//!
//! Handlers are created as `Rc<Handler<P>>`; the input listener and the
//! timers hold weak references back to it.
//!
//! # Invariants
//!
//! 1. Operations that move focus or selection cancel both timers first.
//! 2. At most one node of the map is focused and at most one is selected
//!    as a result of handler operations.
//! 3. No internal borrow is held while handler events fire or while
//!    deferred payload work runs, so listeners and payload hooks may call
//!    back into the handler or read the map.
//! 4. The handler is subscribed to input exactly while `is_focused()`.
//!
//! # Failure Modes
//!
//! Operations return [`NavResult`]; failures change nothing except where
//! noted on the method. With `debug` on, failures are logged.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tenfoot_core::{
    Event, EventTarget, InputService, KeyDown, KeyMap, Listener, NavKey, ON_KEY_DOWN, Scheduler,
};

use crate::error::{NavError, NavResult};
use crate::focusable::Selectable;
use crate::map::{Direction, NavigationGraph, NodeKey};
use crate::timer::{Timer, TimerOp, TimerOptions, TimerTarget};

/// Handler event names.
pub mod events {
    pub const ON_FOCUS: &str = "onFocus";
    pub const ON_BLUR: &str = "onBlur";
    pub const ON_UP: &str = "onUp";
    pub const ON_DOWN: &str = "onDown";
    pub const ON_RIGHT: &str = "onRight";
    pub const ON_LEFT: &str = "onLeft";
    pub const ON_SELECT: &str = "onSelect";
}

use events::{ON_BLUR, ON_DOWN, ON_FOCUS, ON_LEFT, ON_RIGHT, ON_SELECT, ON_UP};

/// A map shared between the host and a handler.
pub type SharedMap<P> = Rc<RefCell<NavigationGraph<P>>>;

/// Wrap a graph for use with [`Handler::set_map`].
#[must_use]
pub fn shared<P>(map: NavigationGraph<P>) -> SharedMap<P> {
    Rc::new(RefCell::new(map))
}

const fn direction_event(dir: Direction) -> &'static str {
    match dir {
        Direction::Up => ON_UP,
        Direction::Down => ON_DOWN,
        Direction::Left => ON_LEFT,
        Direction::Right => ON_RIGHT,
    }
}

/// Arguments of every handler event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerEventArgs {
    /// Focused node when the event fired.
    pub current_focused: Option<NodeKey>,
    /// Selected node when the event fired.
    pub current_selected: Option<NodeKey>,
}

/// Handler construction settings.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HandlerConfig {
    /// Handler name, used for lookup and logs.
    pub name: String,
    /// Host-assigned id.
    pub id: u32,
    /// Take input focus right after construction.
    pub is_focused: bool,
    /// Log diagnostics.
    pub debug: bool,
    /// Select the focused node after it has been focused for a while.
    pub auto_select: bool,
    /// Re-apply handler focus after a while.
    pub auto_focus: bool,
    /// Dwell before auto-select; the operation default when unset.
    pub auto_select_delay: Option<Duration>,
    /// Dwell before auto-focus; the operation default when unset.
    pub auto_focus_delay: Option<Duration>,
    /// Key codes this handler reacts to.
    pub key_map: KeyMap,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            name: "Handler".to_string(),
            id: 0,
            is_focused: false,
            debug: true,
            auto_select: false,
            auto_focus: false,
            auto_select_delay: None,
            auto_focus_delay: None,
            key_map: KeyMap::default(),
        }
    }
}

impl HandlerConfig {
    /// Default settings under `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder: set the id.
    #[must_use]
    pub fn with_id(mut self, id: u32) -> Self {
        self.id = id;
        self
    }

    /// Builder: focus on construction.
    #[must_use]
    pub fn with_focused(mut self, is_focused: bool) -> Self {
        self.is_focused = is_focused;
        self
    }

    /// Builder: switch diagnostics on or off.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Builder: take the debug flag from `TENFOOT_DEBUG`.
    #[must_use]
    pub fn with_debug_from_env(self) -> Self {
        self.with_debug(tenfoot_core::logging::debug_from_env())
    }

    /// Builder: enable auto-select.
    #[must_use]
    pub fn with_auto_select(mut self, enabled: bool) -> Self {
        self.auto_select = enabled;
        self
    }

    /// Builder: enable auto-focus.
    #[must_use]
    pub fn with_auto_focus(mut self, enabled: bool) -> Self {
        self.auto_focus = enabled;
        self
    }

    /// Builder: set the auto-select dwell.
    #[must_use]
    pub fn with_auto_select_delay(mut self, delay: Duration) -> Self {
        self.auto_select_delay = Some(delay);
        self
    }

    /// Builder: set the auto-focus dwell.
    #[must_use]
    pub fn with_auto_focus_delay(mut self, delay: Duration) -> Self {
        self.auto_focus_delay = Some(delay);
        self
    }

    /// Builder: use a custom key table.
    #[must_use]
    pub fn with_key_map(mut self, key_map: KeyMap) -> Self {
        self.key_map = key_map;
        self
    }
}

/// Options for [`Handler::focus`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusOptions {
    /// Run even when already focused.
    pub forced: bool,
    /// Move focus to the map head.
    pub first_node: bool,
    /// Move focus onto the current selection.
    pub focus_current_selected: bool,
    /// Only valid while focused: re-apply focus to the current node.
    pub refocus: bool,
}

impl FocusOptions {
    /// Focus even when already focused.
    #[must_use]
    pub fn forced() -> Self {
        Self {
            forced: true,
            ..Self::default()
        }
    }

    /// Focus the map head.
    #[must_use]
    pub fn first_node() -> Self {
        Self {
            first_node: true,
            ..Self::default()
        }
    }

    /// Focus the current selection.
    #[must_use]
    pub fn current_selected() -> Self {
        Self {
            focus_current_selected: true,
            ..Self::default()
        }
    }
}

/// Options for [`Handler::blur`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlurOptions {
    /// Also blur the focused node's payload.
    pub blur_current_focused: bool,
    /// Cancel the auto-select timer (the auto-focus timer is always
    /// cancelled).
    pub cancel_timer: bool,
}

impl Default for BlurOptions {
    fn default() -> Self {
        Self {
            blur_current_focused: false,
            cancel_timer: true,
        }
    }
}

/// Options for [`Handler::select`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectOptions {
    /// Select this node instead of the focused one.
    pub select_on_node: Option<NodeKey>,
}

/// Options for [`Handler::set_map`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetMapOptions {
    /// Focus this node of the new map.
    pub focus_on_node: Option<NodeKey>,
    /// Clear focus and selection first. Defaults to `true` when the new
    /// map is absent or has no head.
    pub reset: Option<bool>,
}

struct Cursor<P> {
    is_focused: bool,
    map: Option<SharedMap<P>>,
    current_focused: Option<NodeKey>,
    current_selected: Option<NodeKey>,
}

/// Focus/selection state machine over one map.
pub struct Handler<P> {
    name: String,
    id: u32,
    debug: bool,
    key_map: KeyMap,
    cursor: RefCell<Cursor<P>>,
    events: EventTarget<HandlerEventArgs>,
    auto_focus: Timer,
    auto_select: Timer,
    input: Rc<InputService>,
    listener: Listener<KeyDown>,
}

impl<P> fmt::Debug for Handler<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cursor = self.cursor.borrow();
        f.debug_struct("Handler")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("is_focused", &cursor.is_focused)
            .field("has_map", &cursor.map.is_some())
            .field("current_focused", &cursor.current_focused)
            .field("current_selected", &cursor.current_selected)
            .field("auto_focus", &self.auto_focus)
            .field("auto_select", &self.auto_select)
            .finish()
    }
}

impl<P> fmt::Display for Handler<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl<P> Drop for Handler<P> {
    fn drop(&mut self) {
        self.input.remove_listener(ON_KEY_DOWN, Some(&self.listener));
    }
}

impl<P: Selectable + 'static> Handler<P> {
    /// Create a handler listening on `input` and timing on `scheduler`.
    ///
    /// With `config.is_focused` the handler focuses immediately.
    pub fn new(
        config: HandlerConfig,
        input: Rc<InputService>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Rc<Self> {
        let handler = Rc::new_cyclic(|weak: &Weak<Self>| {
            let target: Weak<dyn TimerTarget> = weak.clone();
            let auto_select = Timer::new(
                TimerOptions {
                    target: Some(target.clone()),
                    op: Some(TimerOp::Select),
                    delay: config.auto_select_delay,
                    name: config.name.clone(),
                    enabled: config.auto_select,
                },
                Rc::clone(&scheduler),
            );
            let auto_focus = Timer::new(
                TimerOptions {
                    target: Some(target),
                    op: Some(TimerOp::Focus),
                    delay: config.auto_focus_delay,
                    name: config.name.clone(),
                    enabled: config.auto_focus,
                },
                Rc::clone(&scheduler),
            );

            let routed = weak.clone();
            let listener: Listener<KeyDown> = Rc::new(move |event: &mut Event<KeyDown>| {
                if let Some(handler) = routed.upgrade() {
                    let _ = handler.handle_key(event.args.key_code);
                }
            });

            Self {
                name: config.name.clone(),
                id: config.id,
                debug: config.debug,
                key_map: config.key_map,
                cursor: RefCell::new(Cursor {
                    is_focused: false,
                    map: None,
                    current_focused: None,
                    current_selected: None,
                }),
                events: EventTarget::named(&config.name),
                auto_focus,
                auto_select,
                input,
                listener,
            }
        });

        if handler.debug {
            tracing::info!(handler = %handler.name, id = handler.id, "handler.new");
        }
        if config.is_focused {
            let _ = handler.focus(FocusOptions::default());
        }
        handler
    }

    // --- accessors ---

    /// Handler name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Host-assigned id.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Whether this handler is called `name`.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// Whether diagnostics are logged.
    #[must_use]
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Key codes this handler reacts to.
    #[must_use]
    pub fn key_map(&self) -> &KeyMap {
        &self.key_map
    }

    /// Whether the handler holds input focus.
    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.cursor.borrow().is_focused
    }

    /// Node the handler considers focused.
    #[must_use]
    pub fn current_focused(&self) -> Option<NodeKey> {
        self.cursor.borrow().current_focused
    }

    /// Node the handler considers selected.
    #[must_use]
    pub fn current_selected(&self) -> Option<NodeKey> {
        self.cursor.borrow().current_selected
    }

    /// Attached map.
    #[must_use]
    pub fn map(&self) -> Option<SharedMap<P>> {
        self.cursor.borrow().map.clone()
    }

    /// Whether a map with a head is attached.
    #[must_use]
    pub fn has_map(&self) -> bool {
        self.head().is_some()
    }

    /// Timer that re-applies handler focus.
    #[must_use]
    pub fn auto_focus_timer(&self) -> &Timer {
        &self.auto_focus
    }

    /// Timer that selects the focused node.
    #[must_use]
    pub fn auto_select_timer(&self) -> &Timer {
        &self.auto_select
    }

    /// Whether `node` belongs to the attached map.
    #[must_use]
    pub fn exists(&self, node: NodeKey) -> bool {
        let found = self.has_map()
            && self.map().is_some_and(|map| {
                let graph = map.borrow();
                graph.contains(node)
            });
        if !found && self.debug {
            tracing::error!(handler = %self.name, node = node.id().get(), "exists: node not found in map");
        }
        found
    }

    // --- handler events ---

    /// Subscribe to a handler event (see [`events`]).
    pub fn add_listener(
        &self,
        kind: &str,
        listener: Listener<HandlerEventArgs>,
        exclusive: bool,
    ) -> bool {
        self.events.add_listener(kind, listener, exclusive)
    }

    /// Unsubscribe `listener` (or every listener of `kind` with `None`).
    pub fn remove_listener(&self, kind: &str, listener: Option<&Listener<HandlerEventArgs>>) -> bool {
        self.events.remove_listener(kind, listener)
    }

    /// Number of listeners for `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: &str) -> usize {
        self.events.size(kind)
    }

    // --- input focus ---

    /// Take input focus and (re)apply focus to a node.
    ///
    /// The node is the current selection with `focus_current_selected`, the
    /// map head with `first_node`, else the current focus, else the head.
    pub fn focus(&self, options: FocusOptions) -> NavResult {
        let already = self.is_focused();
        if already && !options.forced && !options.refocus {
            return Err(self.fail("focus", NavError::AlreadyFocused));
        }
        if options.refocus && !already {
            return Err(self.fail("focus", NavError::NotFocused));
        }

        if self.debug {
            tracing::info!(handler = %self.name, "focus.YES.listening");
        }
        self.cursor.borrow_mut().is_focused = true;

        let (focused, selected) = self.current();
        match (focused, selected) {
            _ if options.first_node => {
                let _ = self.set_focus_to_first_node();
            }
            (previous, Some(selected)) if options.focus_current_selected => {
                if let Some(previous) = previous {
                    self.with_value(previous, |v| v.blur());
                }
                self.cursor.borrow_mut().current_focused = Some(selected);
                self.with_value(selected, |v| v.focus());
            }
            (Some(focused), _) => {
                self.with_value(focused, |v| v.focus());
            }
            (None, _) => {
                let _ = self.set_focus_to_first_node();
            }
        }

        if let Some(node) = self.current_focused()
            && self.with_value(node, |v| v.is_focused()).unwrap_or(false)
        {
            self.restart_auto_focus(ON_FOCUS);
        }

        self.input.remove_listener(ON_KEY_DOWN, Some(&self.listener));
        self.input
            .add_listener(ON_KEY_DOWN, Rc::clone(&self.listener), false);
        self.emit(ON_FOCUS);
        Ok(())
    }

    /// Re-apply focus while already focused.
    pub fn refocus(&self) -> NavResult {
        self.focus(FocusOptions {
            refocus: true,
            ..FocusOptions::default()
        })
    }

    /// Re-apply focus, but only while already focused. Returns whether the
    /// handler was focused.
    pub fn fix_focus(&self) -> bool {
        if self.debug {
            tracing::info!(handler = %self.name, "fix_focus");
        }
        if !self.is_focused() {
            return false;
        }
        let _ = self.focus(FocusOptions::forced());
        true
    }

    /// Release input focus. Succeeds without side effects (besides timer
    /// cancellation) when already unfocused.
    pub fn blur(&self, options: BlurOptions) -> NavResult {
        self.auto_focus.cancel_timer(Some(ON_BLUR));
        if options.cancel_timer {
            self.auto_select.cancel_timer(Some(ON_BLUR));
        }
        if !self.is_focused() {
            return Ok(());
        }

        if self.debug {
            tracing::info!(handler = %self.name, "blur.NOT.listening");
        }
        self.cursor.borrow_mut().is_focused = false;
        self.input.remove_listener(ON_KEY_DOWN, Some(&self.listener));

        if options.blur_current_focused
            && let Some(node) = self.current_focused()
        {
            self.with_value(node, |v| v.blur());
        }
        self.emit(ON_BLUR);
        Ok(())
    }

    // --- navigation ---

    /// Move up.
    pub fn up(&self) -> NavResult {
        self.navigate(Direction::Up)
    }

    /// Move down.
    pub fn down(&self) -> NavResult {
        self.navigate(Direction::Down)
    }

    /// Move left.
    pub fn left(&self) -> NavResult {
        self.navigate(Direction::Left)
    }

    /// Move right.
    ///
    /// Unlike the other directions, the current node is blurred before the
    /// link is resolved: a link that points outside the map drops focus and
    /// still returns `Ok`.
    pub fn right(&self) -> NavResult {
        self.navigate(Direction::Right)
    }

    /// Move focus one step in `dir`.
    ///
    /// The direction event fires on every attempt, before the move.
    pub fn navigate(&self, dir: Direction) -> NavResult {
        let event = direction_event(dir);
        if self.debug {
            tracing::info!(handler = %self.name, direction = dir.as_str(), "handler.navigate");
        }
        self.emit(event);

        let Some(current) = self.current_focused() else {
            return Err(self.fail(event, NavError::NoFocusedNode));
        };
        let Some(map) = self.map() else {
            return Err(self.fail(event, NavError::NoMap));
        };
        let (link, target) = {
            let graph = map.borrow();
            (graph.raw_link(current, dir), graph.neighbor(current, dir))
        };
        if link.is_none() || (dir != Direction::Right && target.is_none()) {
            return Err(self.fail(event, NavError::NoNeighbor(dir)));
        }

        self.auto_select.cancel_timer(Some(event));
        self.auto_focus.cancel_timer(Some(event));
        self.with_value(current, |v| v.blur());

        if let Some(next) = target {
            self.cursor.borrow_mut().current_focused = Some(next);
            self.with_value(next, |v| v.focus());
            self.auto_focus.start_timer(Some(event));
            self.auto_select.start_timer(Some(event));
        }
        Ok(())
    }

    // --- selection ---

    /// Select the focused node, or `select_on_node` when given.
    pub fn select(&self, options: SelectOptions) -> NavResult {
        self.auto_select.cancel_timer(Some(ON_SELECT));
        self.auto_focus.cancel_timer(Some(ON_SELECT));
        if self.debug {
            tracing::info!(handler = %self.name, "handler.select");
        }

        let target = match options.select_on_node {
            Some(node) if !self.exists(node) => {
                return Err(self.fail(ON_SELECT, NavError::NotInMap));
            }
            Some(node) => node,
            None => match self.current_focused() {
                Some(node) => node,
                None => return Err(self.fail(ON_SELECT, NavError::NothingToSelect)),
            },
        };

        self.replace_selection(ON_SELECT, target)?;
        self.emit(ON_SELECT);
        Ok(())
    }

    /// Deselect the current selection's payload. The selection record is
    /// kept.
    pub fn deselect(&self) -> NavResult {
        if let Some(node) = self.current_selected() {
            self.with_value(node, |v| v.deselect());
        }
        Ok(())
    }

    // --- map ---

    /// Attach `map` (or detach with `None`).
    ///
    /// When resetting, the previous focus is blurred and the previous
    /// selection deselected. On a map with a head, focus comes from
    /// `focus_on_node` or from payloads already flagged focused/selected;
    /// the handler takes input focus when a focused node was found. A
    /// previous node of the same map that loses its role is blurred or
    /// deselected, so the map keeps one focused and one selected node.
    pub fn set_map(&self, map: Option<SharedMap<P>>, options: SetMapOptions) -> NavResult {
        if let (Some(node), Some(map)) = (options.focus_on_node, map.as_ref())
            && !map.borrow().contains(node)
        {
            return Err(self.fail("set_map", NavError::NotInMap));
        }

        let has_head = map
            .as_ref()
            .is_some_and(|map| map.borrow().head().is_some());
        let reset = options.reset.unwrap_or(!has_head);

        if reset {
            let (focused, selected) = self.current();
            if let Some(node) = focused {
                self.with_value(node, |v| v.blur());
            }
            if let Some(node) = selected {
                self.with_value(node, |v| v.deselect());
            }
            let mut cursor = self.cursor.borrow_mut();
            cursor.current_focused = None;
            cursor.current_selected = None;
        }

        self.cursor.borrow_mut().map = map.clone();

        if let Some(map) = map.filter(|_| has_head) {
            let (previous_focused, previous_selected) = self.current();
            let (focused, selected) = match options.focus_on_node {
                Some(node) => (Some(node), previous_selected),
                None => {
                    let graph = map.borrow();
                    (graph.find_focused(), graph.find_selected())
                }
            };

            // The previous nodes only resolve when they belong to this map.
            if let Some(previous) = previous_focused
                && focused.is_some()
                && focused != Some(previous)
            {
                self.with_value(previous, |v| {
                    if v.is_focused() {
                        v.blur();
                    }
                });
            }
            if let Some(previous) = previous_selected
                && selected.is_some()
                && selected != Some(previous)
            {
                self.with_value(previous, |v| {
                    if v.is_selected() {
                        v.deselect();
                    }
                });
            }
            {
                let mut cursor = self.cursor.borrow_mut();
                cursor.current_focused = focused;
                cursor.current_selected = selected;
            }
            if focused.is_some() {
                self.claim_focus(FocusOptions::default())?;
            }
        }
        Ok(())
    }

    /// Move focus to `node`, taking input focus if needed.
    pub fn set_focus_to_node(&self, node: NodeKey, options: FocusOptions) -> NavResult {
        if !self.exists(node) {
            return Err(self.fail("set_focus_to_node", NavError::NotInMap));
        }
        if let Some(previous) = self.current_focused() {
            self.with_value(previous, |v| v.blur());
        }
        self.cursor.borrow_mut().current_focused = Some(node);
        self.claim_focus(options)
    }

    /// Move the selection to `node`.
    pub fn set_selected_to_node(&self, node: NodeKey) -> NavResult {
        if !self.exists(node) {
            return Err(self.fail("set_selected_to_node", NavError::NotInMap));
        }
        self.replace_selection("set_selected_to_node", node)
    }

    /// Move focus to the map head and start the auto-focus timer.
    pub fn set_focus_to_first_node(&self) -> NavResult {
        if self.debug {
            tracing::info!(handler = %self.name, "set_focus_to_first_node");
        }
        let Some(head) = self.head() else {
            return Err(self.fail("set_focus_to_first_node", NavError::NoMap));
        };
        if let Some(previous) = self.current_focused() {
            self.with_value(previous, |v| v.blur());
        }
        self.cursor.borrow_mut().current_focused = Some(head);
        self.with_value(head, |v| v.focus());
        self.restart_auto_focus(ON_FOCUS);
        Ok(())
    }

    /// Move the selection to the map head.
    pub fn set_selected_to_first_node(&self) -> NavResult {
        let Some(head) = self.head() else {
            return Err(self.fail("set_selected_to_first_node", NavError::NoMap));
        };
        self.replace_selection("set_selected_to_first_node", head)
    }

    // --- input routing ---

    /// Route a raw key code: arrows navigate, ENTER selects.
    ///
    /// Returns `None` for codes this handler does not map.
    pub fn handle_key(&self, key_code: u32) -> Option<NavResult> {
        let key = self.key_map.decode(key_code)?;
        Some(match key {
            NavKey::Up => self.up(),
            NavKey::Down => self.down(),
            NavKey::Left => self.left(),
            NavKey::Right => self.right(),
            NavKey::Enter => self.select(SelectOptions::default()),
        })
    }

    // --- internals ---

    fn current(&self) -> (Option<NodeKey>, Option<NodeKey>) {
        let cursor = self.cursor.borrow();
        (cursor.current_focused, cursor.current_selected)
    }

    fn head(&self) -> Option<NodeKey> {
        let map = self.map()?;
        map.borrow().head()
    }

    fn args(&self) -> HandlerEventArgs {
        let (current_focused, current_selected) = self.current();
        HandlerEventArgs {
            current_focused,
            current_selected,
        }
    }

    fn emit(&self, kind: &str) {
        let args = self.args();
        self.events.fire(kind, args, None);
    }

    /// Run `f` on the payload behind `node`, then the payload's deferred
    /// work once the map is released. `None` when there is no map or the
    /// node is not in it.
    fn with_value<R>(&self, node: NodeKey, f: impl FnOnce(&mut P) -> R) -> Option<R> {
        let map = self.map()?;
        let (result, deferred) = {
            let mut graph = map.borrow_mut();
            let value = graph.value_mut(node)?;
            let result = f(value);
            (result, value.take_deferred())
        };
        if let Some(run) = deferred {
            run();
        }
        Some(result)
    }

    fn replace_selection(&self, op: &str, node: NodeKey) -> NavResult {
        match self.with_value(node, |v| v.is_disabled()) {
            None => return Err(self.fail(op, NavError::NotInMap)),
            Some(true) => return Err(self.fail(op, NavError::Disabled)),
            Some(false) => {}
        }
        if let Some(previous) = self.current_selected() {
            self.with_value(previous, |v| v.deselect());
        }
        self.cursor.borrow_mut().current_selected = Some(node);
        self.with_value(node, |v| v.select());
        Ok(())
    }

    /// Focus the handler; when it already holds input focus, focus the
    /// current node directly instead.
    fn claim_focus(&self, options: FocusOptions) -> NavResult {
        match self.focus(options) {
            Err(NavError::AlreadyFocused) => {
                if let Some(node) = self.current_focused() {
                    self.with_value(node, |v| v.focus());
                    self.restart_auto_focus(ON_FOCUS);
                }
                Ok(())
            }
            other => other,
        }
    }

    fn restart_auto_focus(&self, tag: &str) {
        self.auto_focus.cancel_timer(Some(tag));
        self.auto_focus.start_timer(Some(tag));
    }

    fn fail(&self, op: &str, err: NavError) -> NavError {
        if self.debug {
            tracing::info!(handler = %self.name, op, error = %err, "handler operation failed");
        }
        err
    }
}

impl<P: Selectable + 'static> TimerTarget for Handler<P> {
    fn trigger(&self, op: TimerOp) -> bool {
        match op {
            TimerOp::Focus => self.focus(FocusOptions::default()).is_ok(),
            TimerOp::Select => self.select(SelectOptions::default()).is_ok(),
        }
    }
}
