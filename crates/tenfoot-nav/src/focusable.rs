#![forbid(unsafe_code)]

//! Focus and selection capabilities for navigable payloads.
//!
//! A payload embeds a [`NavState`] and implements [`Focusable`] (and usually
//! [`Selectable`]) by exposing it. The default methods flip the flags and
//! then call the `on_*` hooks, which payloads override to react (restyle,
//! play a sound, load a preview).
//!
//! # Invariants
//!
//! 1. `select` never sets the selected flag on a disabled payload.
//! 2. `disable`/`enable` never touch the selected flag.
//! 3. Hooks run after the flag changes.
//! 4. Work returned by [`Focusable::take_deferred`] runs after the handler
//!    releases the map borrow, so it may read or drive the map.
//!
//! Hooks themselves run while the handler holds the map mutably borrowed:
//! a hook must not touch the shared map. Anything that needs the map goes
//! through [`Focusable::take_deferred`].
//!
//! The setters on [`NavState`] change flags without running hooks; hosts use
//! them to pre-flag payloads before handing a map to a handler.

use bitflags::bitflags;

/// Hook work queued by a payload, run outside the map borrow.
pub type Deferred = Box<dyn FnOnce()>;

use crate::map::NodeId;

bitflags! {
    /// Navigation flags of one payload.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NavFlags: u8 {
        const FOCUSED  = 0b001;
        const SELECTED = 0b010;
        const DISABLED = 0b100;
    }
}

/// Flags plus the id of the node wrapping the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavState {
    flags: NavFlags,
    node_id: Option<NodeId>,
}

impl NavState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: start disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.flags.insert(NavFlags::DISABLED);
        self
    }

    #[must_use]
    pub fn flags(&self) -> NavFlags {
        self.flags
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.flags.contains(NavFlags::FOCUSED)
    }

    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.flags.contains(NavFlags::SELECTED)
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.flags.contains(NavFlags::DISABLED)
    }

    /// Id stamped by the graph on insertion.
    #[must_use]
    pub fn node_id(&self) -> Option<NodeId> {
        self.node_id
    }

    pub fn set_focused(&mut self, on: bool) {
        self.flags.set(NavFlags::FOCUSED, on);
    }

    pub fn set_selected(&mut self, on: bool) {
        self.flags.set(NavFlags::SELECTED, on);
    }

    pub fn set_disabled(&mut self, on: bool) {
        self.flags.set(NavFlags::DISABLED, on);
    }

    pub(crate) fn set_node_id(&mut self, id: NodeId) {
        self.node_id = Some(id);
    }
}

/// A payload that can hold focus.
pub trait Focusable {
    fn nav_state(&self) -> &NavState;
    fn nav_state_mut(&mut self) -> &mut NavState;

    fn is_focused(&self) -> bool {
        self.nav_state().is_focused()
    }

    /// Id of the node wrapping this payload.
    fn node_id(&self) -> Option<NodeId> {
        self.nav_state().node_id()
    }

    /// Called by the graph when the payload is wrapped in a node.
    fn set_node_id(&mut self, id: NodeId) {
        self.nav_state_mut().set_node_id(id);
    }

    /// Mark focused and run [`on_focused`](Self::on_focused).
    fn focus(&mut self) -> bool {
        self.nav_state_mut().set_focused(true);
        self.on_focused();
        true
    }

    /// Clear focus and run [`on_blurred`](Self::on_blurred).
    fn blur(&mut self) -> bool {
        self.nav_state_mut().set_focused(false);
        self.on_blurred();
        true
    }

    /// Runs with the map mutably borrowed.
    fn on_focused(&mut self) {}

    /// Runs with the map mutably borrowed.
    fn on_blurred(&mut self) {}

    /// Hand over work queued by the hooks. The handler calls this after every
    /// payload operation and runs the result once the map is released.
    fn take_deferred(&mut self) -> Option<Deferred> {
        None
    }
}

/// A focusable payload that can also be selected and disabled.
pub trait Selectable: Focusable {
    fn is_selected(&self) -> bool {
        self.nav_state().is_selected()
    }

    fn is_disabled(&self) -> bool {
        self.nav_state().is_disabled()
    }

    /// Mark selected and run [`on_selected`](Self::on_selected).
    ///
    /// Returns `false` without any change when disabled.
    fn select(&mut self) -> bool {
        if self.is_disabled() {
            return false;
        }
        self.nav_state_mut().set_selected(true);
        self.on_selected();
        true
    }

    /// Clear selection and run [`on_deselected`](Self::on_deselected).
    fn deselect(&mut self) -> bool {
        self.nav_state_mut().set_selected(false);
        self.on_deselected();
        true
    }

    fn disable(&mut self) -> bool {
        self.nav_state_mut().set_disabled(true);
        true
    }

    fn enable(&mut self) -> bool {
        self.nav_state_mut().set_disabled(false);
        true
    }

    /// Runs with the map mutably borrowed.
    fn on_selected(&mut self) {}

    /// Runs with the map mutably borrowed.
    fn on_deselected(&mut self) {}
}

impl Focusable for NavState {
    fn nav_state(&self) -> &NavState {
        self
    }

    fn nav_state_mut(&mut self) -> &mut NavState {
        self
    }
}

impl Selectable for NavState {}

impl<T: Focusable + ?Sized> Focusable for Box<T> {
    fn nav_state(&self) -> &NavState {
        (**self).nav_state()
    }

    fn nav_state_mut(&mut self) -> &mut NavState {
        (**self).nav_state_mut()
    }

    fn is_focused(&self) -> bool {
        (**self).is_focused()
    }

    fn node_id(&self) -> Option<NodeId> {
        (**self).node_id()
    }

    fn set_node_id(&mut self, id: NodeId) {
        (**self).set_node_id(id);
    }

    fn focus(&mut self) -> bool {
        (**self).focus()
    }

    fn blur(&mut self) -> bool {
        (**self).blur()
    }

    fn on_focused(&mut self) {
        (**self).on_focused();
    }

    fn on_blurred(&mut self) {
        (**self).on_blurred();
    }

    fn take_deferred(&mut self) -> Option<Deferred> {
        (**self).take_deferred()
    }
}

impl<T: Selectable + ?Sized> Selectable for Box<T> {
    fn is_selected(&self) -> bool {
        (**self).is_selected()
    }

    fn is_disabled(&self) -> bool {
        (**self).is_disabled()
    }

    fn select(&mut self) -> bool {
        (**self).select()
    }

    fn deselect(&mut self) -> bool {
        (**self).deselect()
    }

    fn disable(&mut self) -> bool {
        (**self).disable()
    }

    fn enable(&mut self) -> bool {
        (**self).enable()
    }

    fn on_selected(&mut self) {
        (**self).on_selected();
    }

    fn on_deselected(&mut self) {
        (**self).on_deselected();
    }
}
