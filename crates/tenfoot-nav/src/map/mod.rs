#![forbid(unsafe_code)]

//! Navigation maps: an arena of nodes linked in four directions.
//!
//! A [`NavigationGraph`] owns every [`Node`]; neighbor links are node ids
//! into the same arena, never references. Callers address nodes through
//! [`NodeKey`], which also records the owning graph so a key from one map is
//! rejected by every other map.
//!
//! Maps are usually produced by the builders in [`builder`]
//! ([`create_linear_map`], [`create_grid_map`]) or assembled by hand with
//! the `push*` family.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

pub mod builder;
pub mod graph;

pub use builder::{GridMapOptions, LinearMapOptions, create_grid_map, create_linear_map};
pub use graph::{NavigationGraph, Node};

/// Direction of a navigation link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Direction {
    /// All four directions.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The direction that undoes this one.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Lowercase name (`"up"`, `"down"`, `"left"`, `"right"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    pub(crate) const fn slot(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Graph-scoped node identifier. Ids start at 1 and are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Raw id value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    pub(crate) const fn index(self) -> usize {
        (self.0 as usize).wrapping_sub(1)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Process-unique identity of one [`NavigationGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GraphId(u64);

impl GraphId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Handle to a node of a specific graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeKey {
    graph: GraphId,
    id: NodeId,
}

impl NodeKey {
    pub(crate) const fn new(graph: GraphId, id: NodeId) -> Self {
        Self { graph, id }
    }

    /// The node's id within its graph.
    #[must_use]
    pub const fn id(self) -> NodeId {
        self.id
    }

    /// The graph this key belongs to.
    #[must_use]
    pub const fn graph(self) -> GraphId {
        self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_involution() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.opposite(), dir);
        }
    }

    #[test]
    fn slots_are_distinct() {
        let mut slots: Vec<_> = Direction::ALL.iter().map(|d| d.slot()).collect();
        slots.sort_unstable();
        assert_eq!(slots, vec![0, 1, 2, 3]);
    }

    #[test]
    fn default_direction_is_right() {
        assert_eq!(Direction::default(), Direction::Right);
        assert_eq!(Direction::Right.to_string(), "right");
    }

    #[test]
    fn graph_ids_are_unique() {
        assert_ne!(GraphId::next(), GraphId::next());
    }

    #[test]
    fn id_zero_has_no_index() {
        assert_eq!(NodeId(1).index(), 0);
        assert_eq!(NodeId(0).index(), usize::MAX);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn direction_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Direction::Up).unwrap(), r#""up""#);
    }
}
