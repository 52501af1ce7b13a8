#![forbid(unsafe_code)]

//! Multiplexes input focus between several handlers.
//!
//! Screens usually carry more than one map (a menu, a grid, a dialog). The
//! registry creates their handlers on one shared input source and
//! scheduler and hands input focus from one to another. [`blur_all`] and
//! [`undo_blur`] suspend every handler (for an overlay the host draws
//! itself) and restore the ones that were focused.
//!
//! [`blur_all`]: HandlerRegistry::blur_all
//! [`undo_blur`]: HandlerRegistry::undo_blur

use std::fmt;
use std::rc::Rc;

use tenfoot_core::{InputService, Scheduler};

use crate::error::NavResult;
use crate::focusable::Selectable;
use crate::handler::{BlurOptions, FocusOptions, Handler, HandlerConfig, SelectOptions};

/// Snapshot of one handler's input focus.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandlerState {
    pub name: String,
    pub is_focused: bool,
}

/// Options for [`HandlerRegistry::focus`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryFocusOptions {
    /// Select the focused node after focusing.
    pub select: bool,
    /// Leave the current handler focused.
    pub skip_blur_current: bool,
    /// Options passed to [`Handler::focus`].
    pub focus: FocusOptions,
}

/// Owner of a screen's handlers.
pub struct HandlerRegistry<P> {
    input: Rc<InputService>,
    scheduler: Rc<dyn Scheduler>,
    handlers: Vec<Rc<Handler<P>>>,
    current: Option<Rc<Handler<P>>>,
    states: Vec<HandlerState>,
}

impl<P> fmt::Debug for HandlerRegistry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field(
                "handlers",
                &self.handlers.iter().map(|h| h.to_string()).collect::<Vec<_>>(),
            )
            .field("current", &self.current.as_ref().map(|h| h.to_string()))
            .field("states", &self.states)
            .finish()
    }
}

impl<P: Selectable + 'static> HandlerRegistry<P> {
    #[must_use]
    pub fn new(input: Rc<InputService>, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            input,
            scheduler,
            handlers: Vec::new(),
            current: None,
            states: Vec::new(),
        }
    }

    #[must_use]
    pub fn input(&self) -> &Rc<InputService> {
        &self.input
    }

    /// Create and register a handler on the shared input and scheduler.
    pub fn create_handler(&mut self, config: HandlerConfig) -> Rc<Handler<P>> {
        let handler = Handler::new(config, Rc::clone(&self.input), Rc::clone(&self.scheduler));
        self.handlers.push(Rc::clone(&handler));
        handler
    }

    #[must_use]
    pub fn handlers(&self) -> &[Rc<Handler<P>>] {
        &self.handlers
    }

    /// First handler called `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<Rc<Handler<P>>> {
        self.handlers.iter().find(|h| h.is(name)).cloned()
    }

    /// Handler that last received focus through the registry.
    #[must_use]
    pub fn current(&self) -> Option<&Rc<Handler<P>>> {
        self.current.as_ref()
    }

    /// Give input focus to `handler`.
    ///
    /// The previously current handler is blurred first (together with its
    /// focused node when it is a different handler), unless
    /// `skip_blur_current` is set.
    ///
    /// # Errors
    ///
    /// Only the optional selection can fail; focusing an already focused
    /// handler is not an error here.
    pub fn focus(&mut self, handler: &Rc<Handler<P>>, options: RegistryFocusOptions) -> NavResult {
        if let Some(current) = self.current.as_ref()
            && !options.skip_blur_current
        {
            let switching = current.name() != handler.name();
            let _ = current.blur(BlurOptions {
                blur_current_focused: switching,
                ..BlurOptions::default()
            });
            tracing::info!(from = %current, to = %handler, "registry.focus transition");
        }

        self.current = Some(Rc::clone(handler));
        let _ = handler.focus(options.focus);
        if options.select {
            handler.select(SelectOptions::default())?;
        }
        Ok(())
    }

    /// Record and return every handler's input-focus state.
    pub fn handler_states(&mut self) -> &[HandlerState] {
        self.states = self
            .handlers
            .iter()
            .map(|h| HandlerState {
                name: h.name().to_string(),
                is_focused: h.is_focused(),
            })
            .collect();
        &self.states
    }

    /// Record states, then blur every handler.
    pub fn blur_all(&mut self) {
        self.handler_states();
        for handler in &self.handlers {
            let _ = handler.blur(BlurOptions::default());
        }
        tracing::debug!(handlers = self.handlers.len(), "registry.blur_all");
    }

    /// Re-focus the handlers recorded as focused by the last
    /// [`blur_all`](Self::blur_all) or [`handler_states`](Self::handler_states).
    pub fn undo_blur(&mut self) {
        for handler in &self.handlers {
            let was_focused = self
                .states
                .iter()
                .any(|state| state.is_focused && handler.is(&state.name));
            if was_focused {
                let _ = handler.focus(FocusOptions::default());
            }
        }
        tracing::debug!(handlers = self.handlers.len(), "registry.undo_blur");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::Button;
    use crate::focusable::Focusable;
    use crate::handler::{SetMapOptions, shared};
    use crate::map::{LinearMapOptions, create_linear_map};
    use tenfoot_core::{ManualScheduler, ON_KEY_DOWN};

    fn registry() -> HandlerRegistry<Button> {
        HandlerRegistry::new(
            Rc::new(InputService::new()),
            Rc::new(ManualScheduler::new()) as Rc<dyn Scheduler>,
        )
    }

    fn config(name: &str) -> HandlerConfig {
        HandlerConfig::new(name).with_debug(false)
    }

    fn with_map(handler: &Rc<Handler<Button>>, names: &[&str]) {
        let objects: Vec<Button> = names.iter().map(|n| Button::new(*n)).collect();
        let map = shared(create_linear_map(LinearMapOptions::new(objects)));
        handler.set_map(Some(map), SetMapOptions::default()).unwrap();
    }

    #[test]
    fn create_and_find() {
        let mut reg = registry();
        reg.create_handler(config("menu"));
        reg.create_handler(config("grid"));
        assert_eq!(reg.handlers().len(), 2);
        assert!(reg.find("grid").is_some_and(|h| h.is("grid")));
        assert!(reg.find("dialog").is_none());
    }

    #[test]
    fn focus_switches_input_between_handlers() {
        let mut reg = registry();
        let menu = reg.create_handler(config("menu"));
        let grid = reg.create_handler(config("grid"));
        with_map(&menu, &["home", "search"]);
        with_map(&grid, &["a", "b"]);

        reg.focus(&menu, RegistryFocusOptions::default()).unwrap();
        assert!(menu.is_focused());

        reg.focus(&grid, RegistryFocusOptions::default()).unwrap();
        assert!(!menu.is_focused());
        assert!(grid.is_focused());
        assert_eq!(reg.input().size(ON_KEY_DOWN), 1);
        assert!(reg.current().is_some_and(|h| h.is("grid")));

        // Switching away blurs the old handler's node too.
        let map = menu.map().unwrap();
        assert!(map.borrow().nodes().all(|n| !n.value().is_focused()));
    }

    #[test]
    fn focus_with_select() {
        let mut reg = registry();
        let menu = reg.create_handler(config("menu"));
        with_map(&menu, &["home"]);
        reg.focus(
            &menu,
            RegistryFocusOptions {
                select: true,
                ..RegistryFocusOptions::default()
            },
        )
        .unwrap();
        assert_eq!(menu.current_selected(), menu.current_focused());
    }

    #[test]
    fn skip_blur_current_keeps_both_focused() {
        let mut reg = registry();
        let menu = reg.create_handler(config("menu"));
        let grid = reg.create_handler(config("grid"));
        reg.focus(&menu, RegistryFocusOptions::default()).unwrap();
        reg.focus(
            &grid,
            RegistryFocusOptions {
                skip_blur_current: true,
                ..RegistryFocusOptions::default()
            },
        )
        .unwrap();
        assert!(menu.is_focused());
        assert!(grid.is_focused());
    }

    #[test]
    fn blur_all_then_undo() {
        let mut reg = registry();
        let menu = reg.create_handler(config("menu"));
        let grid = reg.create_handler(config("grid"));
        reg.focus(&grid, RegistryFocusOptions::default()).unwrap();

        reg.blur_all();
        assert!(!menu.is_focused());
        assert!(!grid.is_focused());

        reg.undo_blur();
        assert!(!menu.is_focused());
        assert!(grid.is_focused());
    }

    #[test]
    fn handler_states_snapshot() {
        let mut reg = registry();
        reg.create_handler(config("menu"));
        reg.create_handler(config("grid").with_focused(true));
        let states = reg.handler_states().to_vec();
        assert_eq!(
            states,
            vec![
                HandlerState {
                    name: "menu".into(),
                    is_focused: false
                },
                HandlerState {
                    name: "grid".into(),
                    is_focused: true
                },
            ]
        );
    }
}
