// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flattening a set of roots into drawing order.
//!
//! [`explode`] walks each root depth-first, pre-order, and emits one
//! [`ExplodedEntry`] per leaf. The resulting order (root order, then
//! traversal order within each root) is the canonical drawing order that
//! [`reorder`](crate::reorder), [`edit`](crate::edit) and
//! [`restore`](crate::restore) manipulate.
//!
//! Entries borrow the roots they were produced from, so the borrow checker
//! rejects using an entry list after its source tree was replaced.

use alloc::vec;
use alloc::vec::Vec;

use crate::node::{LayerNode, NodePath};
use crate::trace::{ExplodeEvent, Tracer};

/// One leaf of an exploded tree, with the root and path that lead to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExplodedEntry<'a> {
    /// The root the leaf was found under.
    pub root: &'a LayerNode,
    /// Child indices from `root` to the leaf; empty for a root-level leaf.
    pub path: NodePath,
    /// A copy of the leaf. Edits to it are carried into the imploded tree.
    pub leaf: LayerNode,
}

impl<'a> ExplodedEntry<'a> {
    /// Returns whether this entry was produced from `root`.
    ///
    /// Roots are told apart by instance identifier.
    #[inline]
    #[must_use]
    pub fn is_from(&self, root: &LayerNode) -> bool {
        self.root.uuid() == root.uuid()
    }

    /// Returns whether this entry is the leaf at `path` under `root`.
    #[must_use]
    pub fn is_at(&self, root: &LayerNode, path: &NodePath) -> bool {
        self.is_from(root) && self.path == *path
    }

    /// Rebuilds the single-branch tree from the root down to the leaf.
    ///
    /// Every group along the path is copied without its other children and
    /// keeps its identifiers. The leaf is `self.leaf` as edited.
    ///
    /// # Panics
    ///
    /// Panics if the path does not lead from the root to a node, which means
    /// the entry did not come from [`explode`].
    #[must_use]
    pub fn into_branch(self) -> LayerNode {
        let Self { root, path, leaf } = self;
        let mut chain = Vec::with_capacity(path.len());
        let mut node = root;
        for (depth, &idx) in path.indices().iter().enumerate() {
            let children = node.children();
            assert!(
                idx < children.len(),
                "path {path} out of bounds at depth {depth}: index {idx}, {} children",
                children.len()
            );
            chain.push(node.shallow_clone());
            node = &children[idx];
        }
        let mut branch = leaf;
        while let Some(mut parent) = chain.pop() {
            parent.sublayers = Some(vec![branch]);
            branch = parent;
        }
        branch
    }

    /// Returns the root, keeping the entry's lifetime.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &'a LayerNode {
        self.root
    }
}

/// Flattens `roots` into one entry per leaf, in drawing order.
///
/// A root-level leaf yields one entry with an empty path; a group with no
/// leaves below it yields nothing.
#[must_use]
pub fn explode(roots: &[LayerNode]) -> Vec<ExplodedEntry<'_>> {
    let mut entries = Vec::new();
    let mut path = Vec::new();
    for root in roots {
        collect(root, root, &mut path, &mut entries);
    }
    entries
}

/// Like [`explode`], reporting the result to `tracer`.
pub fn explode_traced<'a>(
    roots: &'a [LayerNode],
    tracer: &mut Tracer<'_>,
) -> Vec<ExplodedEntry<'a>> {
    let entries = explode(roots);
    tracer.explode(&ExplodeEvent {
        roots: roots.len(),
        entries: entries.len(),
    });
    #[cfg(feature = "trace-rich")]
    for (index, entry) in entries.iter().enumerate() {
        tracer.entry(&crate::trace::EntryEvent {
            index,
            depth: entry.path.len(),
            name: &entry.leaf.name,
        });
    }
    entries
}

fn collect<'a>(
    root: &'a LayerNode,
    node: &'a LayerNode,
    path: &mut Vec<usize>,
    out: &mut Vec<ExplodedEntry<'a>>,
) {
    match node.sublayers() {
        None => out.push(ExplodedEntry {
            root,
            path: NodePath::from(path.as_slice()),
            leaf: node.clone(),
        }),
        Some(children) => {
            for (idx, child) in children.iter().enumerate() {
                path.push(idx);
                collect(root, child, path, out);
                path.pop();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use super::*;
    use crate::node::SequentialIds;

    fn names(entries: &[ExplodedEntry<'_>]) -> Vec<String> {
        entries.iter().map(|e| e.leaf.name.clone()).collect()
    }

    #[test]
    fn flat_group_yields_one_entry_per_leaf() {
        let mut ids = SequentialIds::new();
        let x = LayerNode::leaf("x", &mut ids);
        let y = LayerNode::leaf("y", &mut ids).with_opacity(128);
        let root = LayerNode::group("g", vec![x, y], &mut ids);
        let roots = [root];
        let entries = explode(&roots);

        assert_eq!(names(&entries), ["x", "y"]);
        assert_eq!(entries[0].path, NodePath::from([0]));
        assert_eq!(entries[1].path, NodePath::from([1]));
        assert_eq!(entries[1].leaf.opacity, 128);
        assert!(entries.iter().all(|e| e.is_from(&roots[0])), "same root");
    }

    #[test]
    fn order_is_root_order_then_pre_order() {
        let mut ids = SequentialIds::new();
        let a = LayerNode::leaf("a", &mut ids);
        let b = LayerNode::leaf("b", &mut ids);
        let c = LayerNode::leaf("c", &mut ids);
        let d = LayerNode::leaf("d", &mut ids);
        let inner = LayerNode::group("inner", vec![b, c], &mut ids);
        let first = LayerNode::group("first", vec![a, inner], &mut ids);
        let roots = [first, d];
        let entries = explode(&roots);

        assert_eq!(names(&entries), ["a", "b", "c", "d"]);
        assert_eq!(entries[2].path, NodePath::from([1, 1]));
        assert!(entries[3].path.is_empty(), "root-level leaf has empty path");
        assert!(entries[3].is_from(&roots[1]), "d is its own root");
    }

    #[test]
    fn empty_inputs_yield_nothing() {
        let mut ids = SequentialIds::new();
        assert!(explode(&[]).is_empty(), "no roots");
        let empty = [LayerNode::group("empty", vec![], &mut ids)];
        assert!(explode(&empty).is_empty(), "empty group");
    }

    #[test]
    fn into_branch_keeps_only_the_path() {
        let mut ids = SequentialIds::new();
        let a = LayerNode::leaf("a", &mut ids);
        let b = LayerNode::leaf("b", &mut ids);
        let inner = LayerNode::group("inner", vec![a, b], &mut ids);
        let root = LayerNode::group("root", vec![inner], &mut ids);
        let roots = [root];
        let mut entry = explode(&roots).remove(1);
        entry.leaf.visibility = false;

        let branch = entry.into_branch();
        assert_eq!(branch.uuid(), roots[0].uuid(), "groups keep identifiers");
        assert_eq!(branch.children().len(), 1);
        let inner = &branch.children()[0];
        assert_eq!(inner.name, "inner");
        assert_eq!(inner.children().len(), 1);
        assert_eq!(inner.children()[0].name, "b");
        assert!(!inner.children()[0].visibility, "leaf edits are kept");
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn into_branch_rejects_foreign_path() {
        let mut ids = SequentialIds::new();
        let root = LayerNode::group("root", vec![LayerNode::leaf("a", &mut ids)], &mut ids);
        let leaf = LayerNode::leaf("z", &mut ids);
        let entry = ExplodedEntry {
            root: &root,
            path: NodePath::from([3]),
            leaf,
        };
        let _ = entry.into_branch();
    }
}
