#![forbid(unsafe_code)]

//! Focus navigation for remote-control ("10-foot") interfaces.
//!
//! # Role in tenfoot
//! `tenfoot-nav` is where focus lives. It builds navigation maps out of
//! on-screen payloads and runs the handler state machine that walks them in
//! response to D-pad input from `tenfoot-core`.
//!
//! # Primary responsibilities
//! - **Maps**: [`NavigationGraph`] arena with four-way links, plus the
//!   [`create_linear_map`] and [`create_grid_map`] factories.
//! - **Payloads**: [`Focusable`] / [`Selectable`] capabilities and the
//!   ready-made [`Button`].
//! - **Timers**: [`Timer`] auto-focus / auto-select triggers.
//! - **Handlers**: [`Handler`] focus and selection over one map, and
//!   [`HandlerRegistry`] to move input focus between handlers.
//!
//! # Example
//! ```
//! use std::rc::Rc;
//! use tenfoot_core::{InputService, ManualScheduler, Scheduler, key_code};
//! use tenfoot_nav::{
//!     Button, FocusOptions, GridMapOptions, Handler, HandlerConfig, SetMapOptions,
//!     create_grid_map, shared,
//! };
//!
//! let input = Rc::new(InputService::new());
//! let scheduler: Rc<dyn Scheduler> = Rc::new(ManualScheduler::new());
//! let handler = Handler::<Button>::new(HandlerConfig::new("grid"), Rc::clone(&input), scheduler);
//!
//! let buttons: Vec<Button> = (0..8).map(|i| Button::new(format!("button_{i}"))).collect();
//! let map = shared(create_grid_map(GridMapOptions::new(buttons)));
//! handler.set_map(Some(Rc::clone(&map)), SetMapOptions::default()).unwrap();
//! handler.focus(FocusOptions::default()).unwrap();
//!
//! input.on_key_down(key_code::DOWN);
//! let focused = handler.current_focused().unwrap();
//! assert_eq!(map.borrow().value(focused).unwrap().name(), "button_4");
//! ```

pub mod button;
pub mod error;
pub mod focusable;
pub mod handler;
pub mod map;
pub mod registry;
pub mod timer;

pub use button::{Button, Transition, TransitionHook};
pub use error::{NavError, NavResult};
pub use focusable::{Deferred, Focusable, NavFlags, NavState, Selectable};
pub use handler::{
    BlurOptions, FocusOptions, Handler, HandlerConfig, HandlerEventArgs, SelectOptions,
    SetMapOptions, SharedMap, events, shared,
};
pub use map::{
    Direction, GraphId, GridMapOptions, LinearMapOptions, NavigationGraph, Node, NodeId, NodeKey,
    create_grid_map, create_linear_map,
};
pub use registry::{HandlerRegistry, HandlerState, RegistryFocusOptions};
pub use timer::{Timer, TimerOp, TimerOptions, TimerTarget};
