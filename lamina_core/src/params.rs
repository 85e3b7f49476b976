// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render request parameters.
//!
//! A map server draws the layers named in `LAYERS` bottom first, with the
//! parallel `OPACITIES`. [`build_params`] derives both from a root by a
//! visibility-pruned pre-order walk, independent of
//! [`explode`](crate::explode).

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write as _;

use crate::node::LayerNode;
use crate::trace::{ParamsEvent, Tracer};

/// Leaf names and opacities for a render request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderParams {
    /// Leaf names, bottom first.
    pub layers: Vec<String>,
    /// Opacities parallel to `layers`.
    pub opacities: Vec<u8>,
    /// Names of visible queryable leaves, in display order, without
    /// duplicates.
    pub queryable: Vec<String>,
}

impl RenderParams {
    /// Returns the `LAYERS` value.
    #[must_use]
    pub fn layers_param(&self) -> String {
        self.layers.join(",")
    }

    /// Returns the `OPACITIES` value.
    #[must_use]
    pub fn opacities_param(&self) -> String {
        let mut out = String::new();
        for (i, opacity) in self.opacities.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            let _ = write!(out, "{opacity}");
        }
        out
    }

    /// Returns the query-layer list value.
    #[must_use]
    pub fn query_layers_param(&self) -> String {
        self.queryable.join(",")
    }

    /// Returns the map request parameters as key/value pairs.
    ///
    /// `QUERY_LAYERS` is not part of a map request; see
    /// [`feature_info_pairs`](Self::feature_info_pairs).
    #[must_use]
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("LAYERS", self.layers_param()),
            ("OPACITIES", self.opacities_param()),
        ]
    }

    /// Returns the feature query parameters as key/value pairs: the map
    /// request pairs plus `QUERY_LAYERS`.
    #[must_use]
    pub fn feature_info_pairs(&self) -> [(&'static str, String); 3] {
        let [layers, opacities] = self.query_pairs();
        [layers, opacities, ("QUERY_LAYERS", self.query_layers_param())]
    }

    /// Returns whether no leaf is drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Builds render parameters for `root`.
///
/// Only visible nodes contribute, and a hidden group, the root included,
/// hides everything below it (see [`visible_leaves`]). The walk yields display
/// order (top first); names and opacities are then reversed into drawing
/// order. If `root` has a non-empty
/// [`drawing_order`](LayerNode::drawing_order), it selects and orders the
/// collected leaves instead: each listed name picks the first collected leaf
/// of that name, names that were not collected are skipped, and collected
/// leaves that are not listed are dropped.
#[must_use]
pub fn build_params(root: &LayerNode) -> RenderParams {
    let leaves = visible_leaves(root);

    let mut queryable: Vec<String> = Vec::new();
    for leaf in &leaves {
        if leaf.queryable && !queryable.contains(&leaf.name) {
            queryable.push(leaf.name.clone());
        }
    }

    let mut layers: Vec<String> = leaves.iter().rev().map(|leaf| leaf.name.clone()).collect();
    let mut opacities: Vec<u8> = leaves.iter().rev().map(|leaf| leaf.opacity).collect();

    if !root.drawing_order.is_empty() {
        let indices: Vec<usize> = root
            .drawing_order
            .iter()
            .filter_map(|name| layers.iter().position(|l| l == name))
            .collect();
        layers = indices.iter().map(|&i| layers[i].clone()).collect();
        opacities = indices.iter().map(|&i| opacities[i]).collect();
    }

    RenderParams {
        layers,
        opacities,
        queryable,
    }
}

/// Like [`build_params`], reporting the result to `tracer`.
pub fn build_params_traced(root: &LayerNode, tracer: &mut Tracer<'_>) -> RenderParams {
    let params = build_params(root);
    tracer.params(&ParamsEvent {
        layers: params.layers.len(),
        queryable: params.queryable.len(),
        drawing_order: !root.drawing_order.is_empty(),
    });
    params
}

/// Returns the leaves of `root` that are drawn, in display order.
///
/// A node is drawn when it and all its ancestors, the root included, are
/// visible. A hidden root therefore draws nothing.
#[must_use]
pub fn visible_leaves(root: &LayerNode) -> Vec<&LayerNode> {
    let mut out = Vec::new();
    collect_visible(root, &mut out);
    out
}

fn collect_visible<'a>(node: &'a LayerNode, out: &mut Vec<&'a LayerNode>) {
    if !node.visibility {
        return;
    }
    match node.sublayers() {
        None => out.push(node),
        Some(children) => {
            for child in children {
                collect_visible(child, out);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::node::SequentialIds;

    #[test]
    fn flat_group_is_reversed() {
        let mut ids = SequentialIds::new();
        let a = LayerNode::leaf("A", &mut ids).with_opacity(10);
        let b = LayerNode::leaf("B", &mut ids).with_opacity(20);
        let c = LayerNode::leaf("C", &mut ids).with_opacity(30);
        let root = LayerNode::group("root", vec![a, b, c], &mut ids);
        let params = build_params(&root);
        assert_eq!(params.layers, ["C", "B", "A"]);
        assert_eq!(params.opacities, [30, 20, 10]);
        assert_eq!(params.layers_param(), "C,B,A");
        assert_eq!(params.opacities_param(), "30,20,10");
    }

    #[test]
    fn hidden_group_prunes_subtree() {
        let mut ids = SequentialIds::new();
        let a = LayerNode::leaf("a", &mut ids);
        let b = LayerNode::leaf("b", &mut ids).with_visibility(false);
        let c = LayerNode::leaf("c", &mut ids);
        let off = LayerNode::group("off", vec![c], &mut ids).with_visibility(false);
        let root = LayerNode::group("root", vec![a, b, off], &mut ids);
        assert_eq!(build_params(&root).layers, ["a"]);

        let hidden_root = root.with_visibility(false);
        let params = build_params(&hidden_root);
        assert!(params.is_empty(), "hidden root group prunes its subtree");
        assert!(params.queryable.is_empty(), "nothing to query either");
        let mut ids = SequentialIds::new();
        let hidden_leaf = LayerNode::leaf("solo", &mut ids).with_visibility(false);
        assert!(build_params(&hidden_leaf).is_empty(), "hidden leaf root draws nothing");
    }

    #[test]
    fn drawing_order_selects_and_permutes() {
        let mut ids = SequentialIds::new();
        let b = LayerNode::leaf("B", &mut ids).with_opacity(2);
        let a = LayerNode::leaf("A", &mut ids).with_opacity(1);
        // Display order B, A; reversed A, B.
        let root = LayerNode::group("root", vec![b, a], &mut ids).with_drawing_order(["B", "A"]);
        let params = build_params(&root);
        assert_eq!(params.layers, ["B", "A"]);
        assert_eq!(params.opacities, [2, 1]);
    }

    #[test]
    fn drawing_order_drops_unlisted_and_unknown() {
        let mut ids = SequentialIds::new();
        let leaves = ["a", "b", "c"].map(|n| LayerNode::leaf(n, &mut ids));
        let root = LayerNode::group("root", leaves.into(), &mut ids)
            .with_drawing_order(["c", "ghost", "a"]);
        assert_eq!(build_params(&root).layers, ["c", "a"]);
    }

    #[test]
    fn queryable_names_are_unique() {
        let mut ids = SequentialIds::new();
        let a = LayerNode::leaf("a", &mut ids).with_queryable(true);
        let b = LayerNode::leaf("b", &mut ids);
        let again = LayerNode::leaf("a", &mut ids).with_queryable(true);
        let hidden = LayerNode::leaf("h", &mut ids)
            .with_queryable(true)
            .with_visibility(false);
        let root = LayerNode::group("root", vec![a, b, again, hidden], &mut ids);
        let params = build_params(&root);
        assert_eq!(params.queryable, ["a"]);
        assert_eq!(params.query_layers_param(), "a");
        assert_eq!(params.layers, ["a", "b", "a"]);
    }

    #[test]
    fn query_pairs_name_the_keys() {
        let mut ids = SequentialIds::new();
        let root = LayerNode::leaf("solo", &mut ids).with_opacity(128);
        let [(k1, v1), (k2, v2)] = build_params(&root).query_pairs();
        assert_eq!((k1, v1.as_str()), ("LAYERS", "solo"));
        assert_eq!((k2, v2.as_str()), ("OPACITIES", "128"));
    }

    #[test]
    fn feature_info_pairs_add_query_layers() {
        let mut ids = SequentialIds::new();
        let a = LayerNode::leaf("a", &mut ids).with_queryable(true);
        let b = LayerNode::leaf("b", &mut ids);
        let root = LayerNode::group("root", vec![a, b], &mut ids);
        let pairs = build_params(&root).feature_info_pairs();
        let keys = pairs.each_ref().map(|(k, _)| *k);
        assert_eq!(keys, ["LAYERS", "OPACITIES", "QUERY_LAYERS"]);
        assert_eq!(pairs[0].1, "b,a");
        assert_eq!(pairs[2].1, "a", "only queryable leaves");
    }
}
