// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Index paths into a layer tree.

use alloc::vec::Vec;
use core::fmt;

use super::layer::LayerNode;

/// An immutable sequence of child indices leading from a root to a node.
///
/// The empty path addresses the root itself. Paths are only meaningful for
/// the tree they were produced from; a path taken before a tree was rebuilt
/// may point somewhere else (or nowhere) afterwards.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// The path addressing a root.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns the child indices, outermost first.
    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Returns the depth of the addressed node (0 for a root).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether this path addresses a root.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the path of the `index`-th child of the addressed node.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut indices = Vec::with_capacity(self.0.len() + 1);
        indices.extend_from_slice(&self.0);
        indices.push(index);
        Self(indices)
    }

    /// Returns the path of the parent, or `None` for a root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, head) = self.0.split_last()?;
        Some(Self(head.to_vec()))
    }

    /// Returns the last index, or `None` for a root.
    #[must_use]
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Returns whether `other` equals this path or lies below it.
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl From<&[usize]> for NodePath {
    fn from(indices: &[usize]) -> Self {
        Self(indices.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for NodePath {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.to_vec())
    }
}

impl fmt::Debug for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodePath({self})")
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for idx in &self.0 {
            write!(f, "/{idx}")?;
        }
        Ok(())
    }
}

impl LayerNode {
    /// Returns the node at `path`, or `None` if the path leaves the tree.
    #[must_use]
    pub fn get(&self, path: &NodePath) -> Option<&Self> {
        let mut node = self;
        for &idx in path.indices() {
            node = node.children().get(idx)?;
        }
        Some(node)
    }

    /// Returns the node at `path`.
    ///
    /// # Panics
    ///
    /// Panics if `path` indexes past the children of a node on the way down.
    #[must_use]
    pub fn node_at(&self, path: &NodePath) -> &Self {
        let mut node = self;
        for (depth, &idx) in path.indices().iter().enumerate() {
            let children = node.children();
            assert!(
                idx < children.len(),
                "path {path} out of bounds at depth {depth}: index {idx}, {} children",
                children.len()
            );
            node = &children[idx];
        }
        node
    }

    /// Returns a copy of this tree with the node at `path` replaced.
    ///
    /// Only the nodes along `path` are copied; sibling subtrees are cloned
    /// unchanged. Identifiers are preserved.
    ///
    /// # Panics
    ///
    /// Panics if `path` indexes past the children of a node on the way down.
    #[must_use]
    pub fn replaced_at(&self, path: &NodePath, replacement: Self) -> Self {
        let Some((&first, rest)) = path.indices().split_first() else {
            return replacement;
        };
        let children = self.children();
        assert!(
            first < children.len(),
            "path {path} out of bounds: index {first}, {} children",
            children.len()
        );
        let mut copy = self.clone();
        let rest = NodePath::from(rest);
        if let Some(sublayers) = copy.sublayers.as_mut() {
            sublayers[first] = children[first].replaced_at(&rest, replacement);
        }
        copy
    }
}
