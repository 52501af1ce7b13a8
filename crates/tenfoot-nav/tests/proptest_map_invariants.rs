//! Property-based invariant tests for navigation maps and handlers.
//!
//! 1. Grid rows: the right-chain from a row start spans the row.
//! 2. Grid columns: `up` and `down` are inverse between adjacent rows.
//! 3. Circular lines return to the head after `n` steps.
//! 4. Open lines end with an empty link.
//! 5. Any sequence of handler operations leaves at most one focused and at
//!    most one selected node.
//! 6. A move followed by its inverse on an open line restores focus.

use std::rc::Rc;

use proptest::prelude::*;
use tenfoot_core::{InputService, ManualScheduler, Scheduler};
use tenfoot_nav::{
    BlurOptions, Direction, FocusOptions, GridMapOptions, Handler, HandlerConfig, LinearMapOptions,
    NavState, NavigationGraph, NodeKey, SelectOptions, SetMapOptions, SharedMap, create_grid_map,
    create_linear_map, shared,
};

// ── Helpers ─────────────────────────────────────────────────────────────

fn states(n: usize) -> Vec<NavState> {
    (0..n).map(|_| NavState::new()).collect()
}

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Move(Direction),
    Select,
    Deselect,
    Focus,
    Blur,
    BlurNode,
    FocusSelected,
    FirstNode,
    SelectFirst,
    Disable(usize),
    SetFocusTo(usize),
    SetSelectedTo(usize),
    SetMap {
        focus_on: Option<usize>,
        reset: Option<bool>,
    },
    Advance(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => direction_strategy().prop_map(Op::Move),
        2 => Just(Op::Select),
        1 => Just(Op::Deselect),
        1 => Just(Op::Focus),
        1 => Just(Op::Blur),
        1 => Just(Op::BlurNode),
        1 => Just(Op::FocusSelected),
        1 => Just(Op::FirstNode),
        1 => Just(Op::SelectFirst),
        1 => (0usize..32).prop_map(Op::Disable),
        1 => (0usize..32).prop_map(Op::SetFocusTo),
        1 => (0usize..32).prop_map(Op::SetSelectedTo),
        1 => (
            proptest::option::of(0usize..32),
            proptest::option::of(any::<bool>()),
        )
            .prop_map(|(focus_on, reset)| Op::SetMap { focus_on, reset }),
        1 => (0u64..2000).prop_map(Op::Advance),
    ]
}

fn row_chain_len(map: &NavigationGraph<NavState>, start: NodeKey) -> usize {
    let mut steps = 0;
    let mut at = start;
    while let Some(next) = map.neighbor(at, Direction::Right) {
        steps += 1;
        at = next;
    }
    steps
}

// ═════════════════════════════════════════════════════════════════════════
// 1–2. Grid shape
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn grid_rows_span_their_width(n in 0usize..60, columns in 1usize..8) {
        let map = create_grid_map(GridMapOptions::new(states(n)).with_rows_size(columns));
        let keys: Vec<_> = map.keys().collect();
        prop_assert_eq!(map.size(), n);
        prop_assert_eq!(map.head(), keys.first().copied());

        for (row, start) in keys.iter().step_by(columns).enumerate() {
            let remaining = n - row * columns;
            prop_assert_eq!(row_chain_len(&map, *start), remaining.min(columns) - 1);
            prop_assert_eq!(map.neighbor(*start, Direction::Left), None);
        }
    }

    #[test]
    fn grid_columns_link_both_ways(n in 0usize..60, columns in 1usize..8) {
        let map = create_grid_map(GridMapOptions::new(states(n)).with_rows_size(columns));
        let keys: Vec<_> = map.keys().collect();

        for (i, key) in keys.iter().enumerate() {
            prop_assert_eq!(map.node(*key).map(|node| node.column()), Some(i % columns));
            let above = i.checked_sub(columns).map(|j| keys[j]);
            prop_assert_eq!(map.neighbor(*key, Direction::Up), above);
            if let Some(above) = above {
                prop_assert_eq!(map.neighbor(above, Direction::Down), Some(*key));
            }
            if i + columns >= n {
                prop_assert_eq!(map.neighbor(*key, Direction::Down), None);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3–4. Linear shape
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn circular_line_returns_to_head(n in 2usize..40, direction in direction_strategy()) {
        let map = create_linear_map(
            LinearMapOptions::new(states(n))
                .with_direction(direction)
                .with_circular(true),
        );
        let head = map.head().unwrap();
        let mut at = head;
        for _ in 0..n {
            at = map.neighbor(at, direction).unwrap();
        }
        prop_assert_eq!(at, head);

        let mut back = head;
        for _ in 0..n {
            back = map.neighbor(back, direction.opposite()).unwrap();
        }
        prop_assert_eq!(back, head);
    }

    #[test]
    fn open_line_ends_empty(n in 1usize..40, direction in direction_strategy()) {
        let map = create_linear_map(LinearMapOptions::new(states(n)).with_direction(direction));
        let mut at = map.head().unwrap();
        let mut steps = 0;
        while let Some(next) = map.neighbor(at, direction) {
            at = next;
            steps += 1;
        }
        prop_assert_eq!(steps, n - 1);
        prop_assert_eq!(Some(at), map.current());
        prop_assert_eq!(map.neighbor(map.head().unwrap(), direction.opposite()), None);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Single focus / single selection
// ═════════════════════════════════════════════════════════════════════════

fn run(handler: &Handler<NavState>, map: &SharedMap<NavState>, sched: &ManualScheduler, op: Op) {
    let nth = |i: usize| {
        let graph = map.borrow();
        let count = graph.node_count();
        graph.keys().nth(i % count.max(1))
    };
    let _ = match op {
        Op::Move(dir) => handler.navigate(dir),
        Op::Select => handler.select(SelectOptions::default()),
        Op::Deselect => handler.deselect(),
        Op::Focus => handler.focus(FocusOptions::default()),
        Op::Blur => handler.blur(BlurOptions::default()),
        Op::BlurNode => handler.blur(BlurOptions {
            blur_current_focused: true,
            ..BlurOptions::default()
        }),
        Op::FocusSelected => handler.focus(FocusOptions {
            forced: true,
            focus_current_selected: true,
            ..FocusOptions::default()
        }),
        Op::FirstNode => handler.set_focus_to_first_node(),
        Op::SelectFirst => handler.set_selected_to_first_node(),
        Op::Disable(i) => {
            if let Some(key) = nth(i)
                && let Some(value) = map.borrow_mut().value_mut(key)
            {
                value.set_disabled(true);
            }
            Ok(())
        }
        Op::SetFocusTo(i) => match nth(i) {
            Some(key) => handler.set_focus_to_node(key, FocusOptions::default()),
            None => Ok(()),
        },
        Op::SetSelectedTo(i) => match nth(i) {
            Some(key) => handler.set_selected_to_node(key),
            None => Ok(()),
        },
        Op::SetMap { focus_on, reset } => handler.set_map(
            Some(Rc::clone(map)),
            SetMapOptions {
                focus_on_node: focus_on.and_then(nth),
                reset,
            },
        ),
        Op::Advance(ms) => {
            sched.advance(std::time::Duration::from_millis(ms));
            Ok(())
        }
    };
}

proptest! {
    #[test]
    fn at_most_one_focused_and_selected(
        n in 1usize..24,
        columns in 1usize..6,
        auto_select in any::<bool>(),
        auto_focus in any::<bool>(),
        ops in proptest::collection::vec(op_strategy(), 0..60),
    ) {
        let input = Rc::new(InputService::new());
        let sched = Rc::new(ManualScheduler::new());
        let handler = Handler::new(
            HandlerConfig::new("prop")
                .with_debug(false)
                .with_auto_select(auto_select)
                .with_auto_focus(auto_focus),
            input,
            Rc::clone(&sched) as Rc<dyn Scheduler>,
        );
        let map = shared(create_grid_map(GridMapOptions::new(states(n)).with_rows_size(columns)));
        handler.set_map(Some(Rc::clone(&map)), SetMapOptions::default()).unwrap();

        for op in ops {
            run(&handler, &map, &sched, op);
            let graph = map.borrow();
            let focused = graph.nodes().filter(|node| node.value().is_focused()).count();
            let selected = graph.nodes().filter(|node| node.value().is_selected()).count();
            prop_assert!(focused <= 1, "{} focused after {:?}", focused, op);
            prop_assert!(selected <= 1, "{} selected after {:?}", selected, op);
            if let Some(key) = handler.current_selected() {
                prop_assert!(graph.contains(key));
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Inverse moves
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn move_then_inverse_restores_focus(
        n in 2usize..20,
        start in 0usize..20,
        direction in direction_strategy(),
    ) {
        let input = Rc::new(InputService::new());
        let sched: Rc<dyn Scheduler> = Rc::new(ManualScheduler::new());
        let handler = Handler::new(HandlerConfig::new("line").with_debug(false), input, sched);
        let map = shared(create_linear_map(
            LinearMapOptions::new(states(n)).with_direction(direction),
        ));
        handler.set_map(Some(Rc::clone(&map)), SetMapOptions::default()).unwrap();

        // Stay off the last node so the forward move exists.
        let origin = map.borrow().keys().nth(start % (n - 1)).unwrap();
        handler.set_focus_to_node(origin, FocusOptions::default()).unwrap();

        prop_assert_eq!(handler.navigate(direction), Ok(()));
        prop_assert_ne!(handler.current_focused(), Some(origin));
        prop_assert_eq!(handler.navigate(direction.opposite()), Ok(()));
        prop_assert_eq!(handler.current_focused(), Some(origin));
        prop_assert!(map.borrow().value(origin).unwrap().is_focused());
    }
}
