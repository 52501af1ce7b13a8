#![forbid(unsafe_code)]

//! Core: key codes, event targets, the key-down input source, and schedulers.
//!
//! # Role in tenfoot
//! `tenfoot-core` is the input and timing layer. It owns the remote-control
//! key table, the synchronous publish/subscribe primitive every component
//! emits through, and the scheduler abstraction that auto-trigger timers
//! run on.
//!
//! # Primary responsibilities
//! - **EventTarget**: named event types, ordered listeners, synchronous dispatch.
//! - **InputService**: the key-down source handlers subscribe to.
//! - **KeyMap / NavKey**: the D-pad key table (DOM key codes by default).
//! - **Scheduler**: delayed callbacks, with a deterministic manual clock.
//!
//! # How it fits in the system
//! `tenfoot-nav` builds navigation graphs and handler state machines on top
//! of these primitives. Nothing here knows about focus or selection.

pub mod event;
pub mod event_target;
pub mod input;
pub mod logging;
pub mod scheduler;

pub use event::{KeyDown, KeyMap, NavKey, key_code};
pub use event_target::{Callback, Event, EventTarget, Listener};
pub use input::{INPUT_SERVICE, InputService, ON_KEY_DOWN};
pub use scheduler::{ManualScheduler, Scheduler, Task, TaskHandle};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
