#![forbid(unsafe_code)]

//! Map factories: build a [`NavigationGraph`] from a flat list of payloads.

use super::{Direction, NavigationGraph, NodeId};
use crate::focusable::Focusable;

/// Row width used when [`GridMapOptions::rows_size`] is zero.
pub const DEFAULT_ROWS_SIZE: usize = 4;

/// Options for [`create_linear_map`].
#[derive(Debug, Clone)]
pub struct LinearMapOptions<P> {
    /// Payloads in chain order.
    pub objects: Vec<P>,
    /// Direction each object is appended in.
    pub direction: Direction,
    /// Link the last node back to the head.
    pub is_circular: bool,
}

impl<P> Default for LinearMapOptions<P> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<P> LinearMapOptions<P> {
    /// A non-circular chain running right.
    #[must_use]
    pub fn new(objects: Vec<P>) -> Self {
        Self {
            objects,
            direction: Direction::Right,
            is_circular: false,
        }
    }

    /// Builder: set the chain direction.
    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Builder: wrap the ends together.
    #[must_use]
    pub fn with_circular(mut self, is_circular: bool) -> Self {
        self.is_circular = is_circular;
        self
    }
}

/// Options for [`create_grid_map`].
#[derive(Debug, Clone)]
pub struct GridMapOptions<P> {
    /// Payloads in row-major order.
    pub objects: Vec<P>,
    /// Columns per row; 0 selects [`DEFAULT_ROWS_SIZE`].
    pub rows_size: usize,
}

impl<P> Default for GridMapOptions<P> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<P> GridMapOptions<P> {
    /// A grid with the default row width.
    #[must_use]
    pub fn new(objects: Vec<P>) -> Self {
        Self {
            objects,
            rows_size: DEFAULT_ROWS_SIZE,
        }
    }

    /// Builder: set the row width.
    #[must_use]
    pub fn with_rows_size(mut self, rows_size: usize) -> Self {
        self.rows_size = rows_size;
        self
    }

    fn columns(&self) -> usize {
        if self.rows_size == 0 {
            DEFAULT_ROWS_SIZE
        } else {
            self.rows_size
        }
    }
}

/// Chain `objects` along `direction`, optionally wrapping around.
///
/// Wrapping needs at least two nodes; a single node is never linked to
/// itself.
pub fn create_linear_map<P: Focusable>(options: LinearMapOptions<P>) -> NavigationGraph<P> {
    let LinearMapOptions {
        objects,
        direction,
        is_circular,
    } = options;
    let count = objects.len();

    let mut map = NavigationGraph::new();
    for object in objects {
        map.push_from_current(direction, object);
    }

    if is_circular
        && count >= 2
        && let (Some(head), Some(last)) = (map.head, map.current)
    {
        map.link_pair(last, direction, head);
    }

    tracing::trace!(count, ?direction, is_circular, "map.linear");
    map
}

/// Lay `objects` out in rows of `rows_size` columns.
///
/// Cells link left/right within their row and up/down to the same column
/// of the adjacent rows. A short last row links up to the leading columns
/// of the row above it. The head is the first cell; the cursor is the last.
pub fn create_grid_map<P: Focusable>(options: GridMapOptions<P>) -> NavigationGraph<P> {
    let columns = options.columns();
    let count = options.objects.len();

    let mut map = NavigationGraph::new();
    let mut previous_row: Vec<NodeId> = Vec::new();
    let mut row: Vec<NodeId> = Vec::with_capacity(columns);

    for (i, object) in options.objects.into_iter().enumerate() {
        let id = map.create_node(object).id();
        let column = row.len();
        if let Some(node) = map.nodes.get_mut(id.index()) {
            node.column = column;
        }

        if let Some(&above) = previous_row.get(column) {
            map.link_pair(above, Direction::Down, id);
        }
        if let Some(&left) = row.last() {
            map.link_pair(left, Direction::Right, id);
        }
        row.push(id);

        if row.len() == columns || i + 1 == count {
            previous_row = std::mem::replace(&mut row, Vec::with_capacity(columns));
        }
    }

    map.head = map.nodes.first().map(|node| node.id());
    map.current = map.nodes.last().map(|node| node.id());
    map.length = count;

    tracing::trace!(count, columns, "map.grid");
    map
}
