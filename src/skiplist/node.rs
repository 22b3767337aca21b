// Copyright (c) Skipsort Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use std::fmt;

/// Position of a node inside its engine's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

impl NodeId {
    #[inline]
    pub(crate) fn new(idx: usize) -> Self {
        NodeId(idx)
    }

    #[inline]
    pub(crate) fn idx(self) -> usize {
        self.0
    }
}

/// A link to the next node at some level. `None` terminates the level.
pub(crate) type Link = Option<NodeId>;

/// A single distinct key and how many times it was inserted.
///
/// The tower is sized once at creation and never grows; `forward[0]` is the
/// bottom level, which every node takes part in.
#[derive(Debug)]
pub(crate) struct Node<K> {
    pub(crate) key: K,
    pub(crate) count: usize,
    pub(crate) forward: Box<[Link]>,
}

impl<K> Node<K> {
    pub(crate) fn new(key: K, height: usize) -> Self {
        debug_assert!(height > 0, "nodes must take part in level 0");
        Node {
            key,
            count: 1,
            forward: vec![None; height].into_boxed_slice(),
        }
    }

    #[inline]
    pub(crate) fn height(&self) -> usize {
        self.forward.len()
    }
}

impl<K: fmt::Display> fmt::Display for Node<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count > 1 {
            write!(f, "{}x{}", self.key, self.count)
        } else {
            write!(f, "{}", self.key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node() {
        let node = Node::new(42, 3);
        assert_eq!(node.height(), 3);
        assert_eq!(node.count, 1);
        assert!(node.forward.iter().all(Option::is_none));
        assert_eq!(node.to_string(), "42");
    }

    #[test]
    fn test_display_with_count() {
        let mut node = Node::new("a", 1);
        node.count = 3;
        assert_eq!(node.to_string(), "ax3");
    }

    #[test]
    fn test_node_id() {
        assert_eq!(NodeId::new(17).idx(), 17);
    }
}
