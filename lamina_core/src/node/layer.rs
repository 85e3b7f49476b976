// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layer node type.

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;

use super::id::{IdSource, InstanceId, RefId};
use super::path::NodePath;

/// Opacity of a fully opaque layer.
pub const OPAQUE: u8 = 255;

/// A node in a layer configuration tree.
///
/// A node is a *group* when it has a sublayer list (possibly empty) and a
/// *leaf* otherwise. Content fields (`name`, `visibility`, `opacity`,
/// `queryable`, `drawing_order`) are public; the shape of the tree and the
/// identifiers are not, so that any change of shape goes through an
/// operation that also maintains identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerNode {
    /// Identifier used in persisted state and server requests. Not
    /// necessarily unique across a tree.
    pub name: String,
    /// Whether the node is switched on. A hidden group hides its subtree.
    pub visibility: bool,
    /// Opacity in `0..=255`.
    pub opacity: u8,
    /// Whether feature queries may target this leaf.
    pub queryable: bool,
    /// Explicit server-side drawing order (leaf names, bottom first).
    ///
    /// Only consulted on roots by
    /// [`build_params`](crate::params::build_params); empty means none.
    pub drawing_order: Vec<String>,
    pub(crate) sublayers: Option<Vec<Self>>,
    pub(crate) uuid: InstanceId,
    pub(crate) refid: RefId,
}

impl LayerNode {
    /// Creates a visible, opaque, non-queryable leaf with fresh identifiers.
    #[must_use]
    pub fn leaf(name: impl Into<String>, ids: &mut dyn IdSource) -> Self {
        Self {
            name: name.into(),
            visibility: true,
            opacity: OPAQUE,
            queryable: false,
            drawing_order: Vec::new(),
            sublayers: None,
            uuid: ids.instance_id(),
            refid: ids.ref_id(),
        }
    }

    /// Creates a visible group with fresh identifiers.
    ///
    /// The children keep their own identifiers.
    #[must_use]
    pub fn group(name: impl Into<String>, sublayers: Vec<Self>, ids: &mut dyn IdSource) -> Self {
        Self {
            sublayers: Some(sublayers),
            ..Self::leaf(name, ids)
        }
    }

    /// Sets [`visibility`](Self::visibility).
    #[must_use]
    pub fn with_visibility(mut self, visibility: bool) -> Self {
        self.visibility = visibility;
        self
    }

    /// Sets [`opacity`](Self::opacity).
    #[must_use]
    pub fn with_opacity(mut self, opacity: u8) -> Self {
        self.opacity = opacity;
        self
    }

    /// Sets [`queryable`](Self::queryable).
    #[must_use]
    pub fn with_queryable(mut self, queryable: bool) -> Self {
        self.queryable = queryable;
        self
    }

    /// Sets [`drawing_order`](Self::drawing_order).
    #[must_use]
    pub fn with_drawing_order<S: Into<String>>(
        mut self,
        order: impl IntoIterator<Item = S>,
    ) -> Self {
        self.drawing_order = order.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the sublayer list, making this node a group.
    ///
    /// Identifiers are kept; use this to put the result of a restore back
    /// under its root.
    #[must_use]
    pub fn with_sublayers(mut self, sublayers: Vec<Self>) -> Self {
        self.sublayers = Some(sublayers);
        self
    }

    /// Returns the instance identifier (*uuid*).
    #[inline]
    #[must_use]
    pub fn uuid(&self) -> InstanceId {
        self.uuid
    }

    /// Returns the lineage identifier (*refid*).
    #[inline]
    #[must_use]
    pub fn refid(&self) -> RefId {
        self.refid
    }

    /// Returns whether this node is a group.
    #[inline]
    #[must_use]
    pub fn is_group(&self) -> bool {
        self.sublayers.is_some()
    }

    /// Returns whether this node is a leaf.
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.sublayers.is_none()
    }

    /// Returns the sublayer list, or `None` for a leaf.
    #[inline]
    #[must_use]
    pub fn sublayers(&self) -> Option<&[Self]> {
        self.sublayers.as_deref()
    }

    /// Returns the children, empty for a leaf.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[Self] {
        self.sublayers.as_deref().unwrap_or(&[])
    }

    /// Consumes the node and returns its children, empty for a leaf.
    #[must_use]
    pub fn into_children(self) -> Vec<Self> {
        self.sublayers.unwrap_or_default()
    }

    /// Returns the number of leaves in this subtree (1 for a leaf).
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match &self.sublayers {
            None => 1,
            Some(children) => children.iter().map(Self::leaf_count).sum(),
        }
    }

    /// Returns the first leaf named `name` in pre-order, with its path.
    #[must_use]
    pub fn find_leaf(&self, name: &str) -> Option<(NodePath, &Self)> {
        match &self.sublayers {
            None => (self.name == name).then(|| (NodePath::root(), self)),
            Some(children) => children.iter().enumerate().find_map(|(idx, child)| {
                child.find_leaf(name).map(|(path, leaf)| {
                    let mut indices = Vec::with_capacity(path.len() + 1);
                    indices.push(idx);
                    indices.extend_from_slice(path.indices());
                    (NodePath::from(indices), leaf)
                })
            }),
        }
    }

    /// Returns the fraction of this subtree that is switched on.
    ///
    /// A leaf or a hidden node counts as all-or-nothing; a visible group
    /// averages its children, recursing into visible subgroups.
    #[must_use]
    pub fn visible_fraction(&self) -> f64 {
        let children = self.children();
        if children.is_empty() || !self.visibility {
            return if self.visibility { 1.0 } else { 0.0 };
        }
        let sum: f64 = children
            .iter()
            .map(|child| match (&child.sublayers, child.visibility) {
                (Some(_), true) => child.visible_fraction(),
                (_, visible) => f64::from(u8::from(visible)),
            })
            .sum();
        sum / children.len() as f64
    }

    /// Returns whether two trees have the same shape and content.
    ///
    /// Identifiers are ignored.
    #[must_use]
    pub fn same_structure(&self, other: &Self) -> bool {
        self.name == other.name
            && self.visibility == other.visibility
            && self.opacity == other.opacity
            && self.queryable == other.queryable
            && self.drawing_order == other.drawing_order
            && match (&self.sublayers, &other.sublayers) {
                (None, None) => true,
                (Some(a), Some(b)) => {
                    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_structure(y))
                }
                _ => false,
            }
    }

    /// Copies this node without its children.
    ///
    /// A group stays a group (with an empty sublayer list). Identifiers are
    /// preserved.
    pub(crate) fn shallow_clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            visibility: self.visibility,
            opacity: self.opacity,
            queryable: self.queryable,
            drawing_order: self.drawing_order.clone(),
            sublayers: self.sublayers.as_ref().map(|_| Vec::new()),
            uuid: self.uuid,
            refid: self.refid,
        }
    }
}

/// Assigns fresh lineage and instance identifiers to `node` and every
/// descendant, top-down.
///
/// Run this before an explode/implode cycle that should be able to regroup
/// leaves only by the lineage they have *now*.
pub fn add_sublayer_ids(node: &mut LayerNode, ids: &mut dyn IdSource) {
    node.refid = ids.ref_id();
    node.uuid = ids.instance_id();
    if let Some(children) = node.sublayers.as_mut() {
        for child in children {
            add_sublayer_ids(child, ids);
        }
    }
}

/// Makes the instance identifiers of `node`'s groups unique with respect to
/// `used`.
///
/// A group keeps its identifier unless it is already in `used`, in which case
/// a fresh one is drawn. Every group identifier ends up in `used`. Leaves are
/// not touched.
pub fn assign_unique_uuids(
    node: &mut LayerNode,
    used: &mut BTreeSet<InstanceId>,
    ids: &mut dyn IdSource,
) {
    let Some(children) = node.sublayers.as_mut() else {
        return;
    };
    if !used.insert(node.uuid) {
        node.uuid = ids.instance_id();
        used.insert(node.uuid);
    }
    for child in children {
        assign_unique_uuids(child, used, ids);
    }
}

/// Gives every group in `node`'s subtree a fresh instance identifier and
/// records it in `used`. Leaves are not touched.
pub(crate) fn refresh_group_uuids(
    node: &mut LayerNode,
    used: &mut BTreeSet<InstanceId>,
    ids: &mut dyn IdSource,
) {
    let Some(children) = node.sublayers.as_mut() else {
        return;
    };
    node.uuid = ids.instance_id();
    used.insert(node.uuid);
    for child in children {
        refresh_group_uuids(child, used, ids);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::node::SequentialIds;

    #[test]
    fn leaf_defaults() {
        let mut ids = SequentialIds::new();
        let leaf = LayerNode::leaf("roads", &mut ids);
        assert!(leaf.is_leaf());
        assert!(leaf.visibility);
        assert_eq!(leaf.opacity, OPAQUE);
        assert!(!leaf.queryable);
        assert!(leaf.children().is_empty());
    }

    #[test]
    fn empty_group_is_still_a_group() {
        let mut ids = SequentialIds::new();
        let group = LayerNode::group("empty", vec![], &mut ids);
        assert!(group.is_group());
        assert_eq!(group.sublayers(), Some(&[][..]));
        assert_eq!(group.leaf_count(), 0);
    }

    #[test]
    fn find_leaf_returns_path() {
        let mut ids = SequentialIds::new();
        let a = LayerNode::leaf("a", &mut ids);
        let b = LayerNode::leaf("b", &mut ids);
        let inner = LayerNode::group("inner", vec![b], &mut ids);
        let root = LayerNode::group("root", vec![a, inner], &mut ids);

        let (path, leaf) = root.find_leaf("b").expect("leaf b exists");
        assert_eq!(path, NodePath::from([1, 0]));
        assert_eq!(leaf.name, "b");
        assert!(root.find_leaf("inner").is_none(), "groups are not leaves");
    }

    #[test]
    fn visible_fraction_recurses() {
        let mut ids = SequentialIds::new();
        let leaves: Vec<_> = (0..4)
            .map(|i| LayerNode::leaf(alloc::format!("l{i}"), &mut ids))
            .collect();
        let [a, b, c, d]: [LayerNode; 4] = leaves.try_into().expect("four leaves");
        let deepest = LayerNode::group("deepest", vec![c, d.with_visibility(false)], &mut ids);
        let mid = LayerNode::group("mid", vec![b, deepest], &mut ids);
        let root = LayerNode::group("root", vec![a, mid], &mut ids);
        assert_eq!(root.visible_fraction(), 0.875);

        let hidden = root.clone().with_visibility(false);
        assert_eq!(hidden.visible_fraction(), 0.0);
    }

    #[test]
    fn same_structure_ignores_ids() {
        let mut ids = SequentialIds::new();
        let a = LayerNode::group("g", vec![LayerNode::leaf("x", &mut ids)], &mut ids);
        let b = LayerNode::group("g", vec![LayerNode::leaf("x", &mut ids)], &mut ids);
        assert_ne!(a, b, "identifiers differ");
        assert!(a.same_structure(&b));
        assert!(!a.same_structure(&b.clone().with_opacity(3)));
    }

    #[test]
    fn add_sublayer_ids_reassigns_everything() {
        let mut ids = SequentialIds::new();
        let mut root = LayerNode::group("g", vec![LayerNode::leaf("x", &mut ids)], &mut ids);
        let before = root.clone();
        add_sublayer_ids(&mut root, &mut ids);
        assert_ne!(root.uuid(), before.uuid());
        assert_ne!(root.refid(), before.refid());
        assert_ne!(root.children()[0].refid(), before.children()[0].refid());
        assert!(root.same_structure(&before));
    }

    #[test]
    fn assign_unique_uuids_keeps_unused_ids() {
        let mut ids = SequentialIds::new();
        let mut root = LayerNode::group("g", vec![LayerNode::leaf("x", &mut ids)], &mut ids);
        let original = root.uuid();
        let mut used = BTreeSet::new();
        assign_unique_uuids(&mut root, &mut used, &mut ids);
        assert_eq!(root.uuid(), original);

        let mut copy = root.clone();
        assign_unique_uuids(&mut copy, &mut used, &mut ids);
        assert_ne!(copy.uuid(), original, "duplicate group id is replaced");
        assert_eq!(
            copy.children()[0].uuid(),
            root.children()[0].uuid(),
            "leaves keep their ids"
        );
    }
}
