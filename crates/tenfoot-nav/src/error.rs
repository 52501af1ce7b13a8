#![forbid(unsafe_code)]

use crate::map::Direction;

/// Why a handler operation did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavError {
    /// No node currently holds focus.
    NoFocusedNode,
    /// The focused node has no usable link in this direction.
    NoNeighbor(Direction),
    /// No map, or a map without a head.
    NoMap,
    /// The node does not belong to the handler's map.
    NotInMap,
    /// The handler already holds input focus.
    AlreadyFocused,
    /// A refocus was requested while the handler is unfocused.
    NotFocused,
    /// Nothing is focused and no explicit target was given.
    NothingToSelect,
    /// The target payload is disabled.
    Disabled,
}

impl std::fmt::Display for NavError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoFocusedNode => write!(f, "no focused node"),
            Self::NoNeighbor(dir) => write!(f, "no neighbor {dir}"),
            Self::NoMap => write!(f, "no map"),
            Self::NotInMap => write!(f, "node not found in map"),
            Self::AlreadyFocused => write!(f, "handler already focused"),
            Self::NotFocused => write!(f, "handler not focused"),
            Self::NothingToSelect => write!(f, "nothing to select"),
            Self::Disabled => write!(f, "node is disabled"),
        }
    }
}

impl std::error::Error for NavError {}

/// Result of a handler operation.
pub type NavResult<T = ()> = Result<T, NavError>;
