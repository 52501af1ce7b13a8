#![forbid(unsafe_code)]

//! Arena-backed navigation graph.
//!
//! Nodes are stored in insertion order; node `n` lives at index `n - 1`.
//! Neighbor links are [`NodeId`]s into the same arena. The graph keeps an
//! append cursor (`current`) and a `length` that counts nodes placed through
//! `init`/`push*`; nodes created with [`NavigationGraph::create_node`] alone
//! are not counted until a builder accounts for them.
//!
//! # Invariants
//!
//! 1. Node ids are unique, start at 1, and are assigned in creation order.
//! 2. `head` and `current` are either `None` or members of this graph.
//! 3. Links written through [`NavigationGraph::link`] and the `push*`
//!    family only ever reference nodes of this graph.
//! 4. A [`NodeKey`] minted by another graph is never resolved.
//!
//! # Complexity
//!
//! | Operation | Time |
//! |-----------|------|
//! | create_node / push | O(1) amortized |
//! | neighbor / value | O(1) |
//! | find_focused / find_selected | O(n) |

use std::fmt;

use super::{Direction, GraphId, NodeId, NodeKey};
use crate::focusable::{Focusable, Selectable};

/// One navigable cell: a payload plus four optional neighbor links.
pub struct Node<P> {
    id: NodeId,
    value: P,
    pub(crate) links: [Option<NodeId>; 4],
    pub(crate) column: usize,
}

impl<P> Node<P> {
    fn new(id: NodeId, value: P) -> Self {
        Self {
            id,
            value,
            links: [None; 4],
            column: 0,
        }
    }

    /// Node id (unique within its graph).
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Wrapped payload.
    #[must_use]
    pub fn value(&self) -> &P {
        &self.value
    }

    /// Mutable payload.
    pub fn value_mut(&mut self) -> &mut P {
        &mut self.value
    }

    /// Raw link in `dir`. The id is not guaranteed to resolve.
    #[must_use]
    pub fn link(&self, dir: Direction) -> Option<NodeId> {
        self.links[dir.slot()]
    }

    #[must_use]
    pub fn up(&self) -> Option<NodeId> {
        self.link(Direction::Up)
    }

    #[must_use]
    pub fn down(&self) -> Option<NodeId> {
        self.link(Direction::Down)
    }

    #[must_use]
    pub fn left(&self) -> Option<NodeId> {
        self.link(Direction::Left)
    }

    #[must_use]
    pub fn right(&self) -> Option<NodeId> {
        self.link(Direction::Right)
    }

    /// Column hint set by the grid builder (0 otherwise).
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }
}

impl<P: fmt::Debug> fmt::Debug for Node<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("up", &self.up())
            .field("down", &self.down())
            .field("left", &self.left())
            .field("right", &self.right())
            .field("column", &self.column)
            .field("value", &self.value)
            .finish()
    }
}

/// A set of nodes linked up/down/left/right.
pub struct NavigationGraph<P> {
    id: GraphId,
    pub(crate) nodes: Vec<Node<P>>,
    pub(crate) head: Option<NodeId>,
    pub(crate) current: Option<NodeId>,
    pub(crate) length: usize,
}

impl<P> Default for NavigationGraph<P> {
    fn default() -> Self {
        Self {
            id: GraphId::next(),
            nodes: Vec::new(),
            head: None,
            current: None,
            length: 0,
        }
    }
}

impl<P: fmt::Debug> fmt::Debug for NavigationGraph<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationGraph")
            .field("id", &self.id)
            .field("head", &self.head)
            .field("current", &self.current)
            .field("length", &self.length)
            .field("nodes", &self.nodes)
            .finish()
    }
}

impl<P> NavigationGraph<P> {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity of this graph; every key it hands out carries it.
    #[must_use]
    pub fn graph_id(&self) -> GraphId {
        self.id
    }

    /// Number of nodes placed through `init`/`push*` or a map builder.
    #[must_use]
    pub fn size(&self) -> usize {
        self.length
    }

    /// Number of nodes in the arena, placed or not.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Anchor node (the first node placed).
    #[must_use]
    pub fn head(&self) -> Option<NodeKey> {
        self.head.map(|id| self.key(id))
    }

    /// Move the anchor. Returns `false` (and changes nothing) for a key
    /// that does not belong to this graph.
    pub fn set_head(&mut self, head: Option<NodeKey>) -> bool {
        match head {
            Some(key) if !self.contains(key) => false,
            _ => {
                self.head = head.map(NodeKey::id);
                true
            }
        }
    }

    /// Append cursor: the most recently placed node.
    #[must_use]
    pub fn current(&self) -> Option<NodeKey> {
        self.current.map(|id| self.key(id))
    }

    /// Whether `key` names a node of this graph.
    #[must_use]
    pub fn contains(&self, key: NodeKey) -> bool {
        key.graph() == self.id && self.nodes.get(key.id().index()).is_some()
    }

    /// Key for `id` if such a node exists.
    #[must_use]
    pub fn find(&self, id: NodeId) -> Option<NodeKey> {
        self.nodes.get(id.index()).map(|node| self.key(node.id))
    }

    /// Node behind `key`.
    #[must_use]
    pub fn node(&self, key: NodeKey) -> Option<&Node<P>> {
        if key.graph() != self.id {
            return None;
        }
        self.nodes.get(key.id().index())
    }

    fn node_mut(&mut self, key: NodeKey) -> Option<&mut Node<P>> {
        if key.graph() != self.id {
            return None;
        }
        self.nodes.get_mut(key.id().index())
    }

    /// Payload behind `key`.
    #[must_use]
    pub fn value(&self, key: NodeKey) -> Option<&P> {
        self.node(key).map(Node::value)
    }

    /// Mutable payload behind `key`.
    pub fn value_mut(&mut self, key: NodeKey) -> Option<&mut P> {
        self.node_mut(key).map(Node::value_mut)
    }

    /// Neighbor of `key` in `dir`, if the link resolves to a node of this
    /// graph.
    #[must_use]
    pub fn neighbor(&self, key: NodeKey, dir: Direction) -> Option<NodeKey> {
        let target = self.node(key)?.link(dir)?;
        self.find(target)
    }

    /// Raw link of `key` in `dir`, resolved or not.
    pub(crate) fn raw_link(&self, key: NodeKey, dir: Direction) -> Option<NodeId> {
        self.node(key)?.link(dir)
    }

    /// Point `from.<dir>` at `to` (one direction only).
    ///
    /// Returns `false` if either key is foreign to this graph.
    pub fn link(&mut self, from: NodeKey, dir: Direction, to: NodeKey) -> bool {
        if !self.contains(to) {
            return false;
        }
        match self.node_mut(from) {
            Some(node) => {
                node.links[dir.slot()] = Some(to.id());
                true
            }
            None => false,
        }
    }

    /// Clear `from.<dir>`. Returns the link that was removed.
    pub fn unlink(&mut self, from: NodeKey, dir: Direction) -> Option<NodeId> {
        self.node_mut(from)?.links[dir.slot()].take()
    }

    /// Link `a.<dir> = b` and `b.<opposite> = a`.
    pub(crate) fn link_pair(&mut self, a: NodeId, dir: Direction, b: NodeId) {
        if let Some(node) = self.nodes.get_mut(a.index()) {
            node.links[dir.slot()] = Some(b);
        }
        if let Some(node) = self.nodes.get_mut(b.index()) {
            node.links[dir.opposite().slot()] = Some(a);
        }
    }

    /// Nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node<P>> {
        self.nodes.iter()
    }

    /// Keys in creation order.
    pub fn keys(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.nodes.iter().map(|node| self.key(node.id))
    }

    fn key(&self, id: NodeId) -> NodeKey {
        NodeKey::new(self.id, id)
    }
}

impl<P: Focusable> NavigationGraph<P> {
    /// Allocate a node for `value` and stamp its id onto the payload.
    ///
    /// The node is not linked and does not move `head`, `current` or
    /// `length`.
    pub fn create_node(&mut self, mut value: P) -> NodeKey {
        let id = NodeId(self.nodes.len() as u32 + 1);
        value.set_node_id(id);
        self.nodes.push(Node::new(id, value));
        self.key(id)
    }

    /// Place the first node of an empty graph.
    pub fn init(&mut self, value: P) -> NodeKey {
        let key = self.create_node(value);
        self.place_first(key.id());
        key
    }

    /// Make an already created node the head and cursor of the graph.
    ///
    /// Returns `None` for a key that does not belong to this graph.
    pub fn init_node(&mut self, node: NodeKey) -> Option<NodeKey> {
        if !self.contains(node) {
            return None;
        }
        self.place_first(node.id());
        Some(node)
    }

    fn place_first(&mut self, id: NodeId) {
        self.current = Some(id);
        self.head = Some(id);
        self.length += 1;
    }

    /// Append in `dir` from the cursor, writing only the forward link.
    pub fn push(&mut self, dir: Direction, value: P) -> NodeKey {
        let key = self.create_node(value);
        match self.current.filter(|_| self.length > 0) {
            None => self.place_first(key.id()),
            Some(current) => {
                if let Some(node) = self.nodes.get_mut(current.index()) {
                    node.links[dir.slot()] = Some(key.id());
                }
                self.advance(key.id());
            }
        }
        key
    }

    /// Append in `dir` from the cursor, linking both ways.
    pub fn push_from_current(&mut self, dir: Direction, value: P) -> NodeKey {
        let key = self.create_node(value);
        match self.current.filter(|_| self.length > 0) {
            None => self.place_first(key.id()),
            Some(current) => {
                self.link_pair(current, dir, key.id());
                self.advance(key.id());
            }
        }
        key
    }

    /// Append in `dir` from `anchor`, linking both ways.
    ///
    /// Falls back to [`push_from_current`](Self::push_from_current) when
    /// `anchor` is `None` or foreign to this graph.
    pub fn push_from_node(&mut self, dir: Direction, value: P, anchor: Option<NodeKey>) -> NodeKey {
        match anchor.filter(|key| self.contains(*key)) {
            None => self.push_from_current(dir, value),
            Some(anchor) => {
                let key = self.create_node(value);
                if self.length == 0 {
                    self.place_first(key.id());
                } else {
                    self.link_pair(anchor.id(), dir, key.id());
                    self.advance(key.id());
                }
                key
            }
        }
    }

    fn advance(&mut self, id: NodeId) {
        self.current = Some(id);
        self.length += 1;
    }

    /// Append `values` as a vertical chain below the cursor.
    ///
    /// Returns the keys in order.
    pub fn init_array_up_down<I>(&mut self, values: I) -> Vec<NodeKey>
    where
        I: IntoIterator<Item = P>,
    {
        self.chain(Direction::Down, values)
    }

    /// Append `values` as a horizontal chain right of the cursor.
    ///
    /// Returns the keys in order.
    pub fn init_array_left_right<I>(&mut self, values: I) -> Vec<NodeKey>
    where
        I: IntoIterator<Item = P>,
    {
        self.chain(Direction::Right, values)
    }

    fn chain<I>(&mut self, dir: Direction, values: I) -> Vec<NodeKey>
    where
        I: IntoIterator<Item = P>,
    {
        let mut keys = Vec::new();
        for value in values {
            let anchor = keys.last().copied();
            keys.push(self.push_from_node(dir, value, anchor));
        }
        keys
    }

    /// First node whose payload reports focus.
    #[must_use]
    pub fn find_focused(&self) -> Option<NodeKey> {
        self.nodes
            .iter()
            .find(|node| node.value.is_focused())
            .map(|node| self.key(node.id))
    }
}

impl<P: Selectable> NavigationGraph<P> {
    /// First node whose payload reports selection.
    #[must_use]
    pub fn find_selected(&self) -> Option<NodeKey> {
        self.nodes
            .iter()
            .find(|node| node.value.is_selected())
            .map(|node| self.key(node.id))
    }
}
