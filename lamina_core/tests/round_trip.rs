// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for explode/implode and the edits built on them.

use std::collections::BTreeSet;

use lamina_core::EditContext;
use lamina_core::config::LayerConfig;
use lamina_core::explode::explode;
use lamina_core::implode::implode;
use lamina_core::node::{InstanceId, LayerNode, SequentialIds};
use lamina_core::reorder::reorder;
use lamina_core::restore::restore_reordered_visible;
use proptest::prelude::*;

fn leaf_config() -> impl Strategy<Value = LayerConfig> {
    ("[a-e]", any::<bool>(), any::<u8>(), any::<bool>()).prop_map(
        |(name, visibility, opacity, queryable)| LayerConfig {
            visibility,
            opacity,
            queryable,
            ..LayerConfig::leaf(name)
        },
    )
}

/// Trees without empty groups; an empty group has no entries to rebuild it
/// from.
fn tree_config() -> impl Strategy<Value = LayerConfig> {
    leaf_config().prop_recursive(4, 32, 4, |inner| {
        ("[g-k]", any::<bool>(), prop::collection::vec(inner, 1..4)).prop_map(
            |(name, visibility, sublayers)| LayerConfig {
                visibility,
                ..LayerConfig::group(name, sublayers)
            },
        )
    })
}

fn build(configs: &[LayerConfig], ids: &mut SequentialIds) -> Vec<LayerNode> {
    configs
        .iter()
        .map(|config| LayerNode::from_config(config, ids))
        .collect()
}

fn leaf_ids(layers: &[LayerNode]) -> Vec<InstanceId> {
    explode(layers).into_iter().map(|e| e.leaf.uuid()).collect()
}

fn group_ids(node: &LayerNode, out: &mut Vec<InstanceId>) {
    if node.is_group() {
        out.push(node.uuid());
        for child in node.children() {
            group_ids(child, out);
        }
    }
}

fn group_ids_unique(layers: &[LayerNode]) -> bool {
    let mut ids = Vec::new();
    for layer in layers {
        group_ids(layer, &mut ids);
    }
    let distinct: BTreeSet<_> = ids.iter().collect();
    distinct.len() == ids.len()
}

proptest! {
    #[test]
    fn implode_inverts_explode(configs in prop::collection::vec(tree_config(), 1..4)) {
        let mut ids = SequentialIds::new();
        let roots = build(&configs, &mut ids);
        let mut ctx = EditContext::new(&mut ids);
        let rebuilt = implode(explode(&roots), &mut ctx);

        prop_assert_eq!(rebuilt.len(), roots.len());
        for (a, b) in rebuilt.iter().zip(&roots) {
            prop_assert!(a.same_structure(b));
            prop_assert_eq!(a.to_config(), b.to_config());
        }
        prop_assert_eq!(leaf_ids(&rebuilt), leaf_ids(&roots));
    }

    #[test]
    fn reorder_sequence_matches_list_model(
        configs in prop::collection::vec(tree_config(), 1..4),
        moves in prop::collection::vec((any::<prop::sample::Index>(), -3_isize..=3), 0..12),
    ) {
        let mut ids = SequentialIds::new();
        let mut layers = build(&configs, &mut ids);
        let mut model = leaf_ids(&layers);
        let mut ctx = EditContext::new(&mut ids);

        for (pick, delta) in moves {
            let from = pick.index(model.len());
            let next = {
                let entries = explode(&layers);
                let entry = &entries[from];
                reorder(&layers, |_| false, entry.root(), &entry.path, delta, &mut ctx)
            };
            if let Some(to) = from.checked_add_signed(delta).filter(|&to| to < model.len()) {
                let moved = model.remove(from);
                model.insert(to, moved);
            } else {
                prop_assert_eq!(&next, &layers);
            }
            layers = next;
            prop_assert_eq!(leaf_ids(&layers), model.clone());
            prop_assert!(group_ids_unique(&layers));
        }
    }

    #[test]
    fn reordered_restore_puts_listed_leaves_first(
        config in tree_config(),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..6),
    ) {
        let mut ids = SequentialIds::new();
        let root = LayerNode::from_config(&config, &mut ids);
        let sublayers = root.children().to_vec();
        let leaves: Vec<String> = explode(&sublayers).into_iter().map(|e| e.leaf.name).collect();
        prop_assume!(!leaves.is_empty());
        let names: Vec<&str> = picks.iter().map(|p| leaves[p.index(leaves.len())].as_str()).collect();

        let mut ctx = EditContext::new(&mut ids);
        let restored = restore_reordered_visible(&sublayers, &names, &[], &mut ctx);
        let order: Vec<_> = explode(&restored)
            .into_iter()
            .map(|e| (e.leaf.name, e.leaf.visibility))
            .collect();

        prop_assert_eq!(order.len(), leaves.len());
        let visible = order.iter().take_while(|(_, visible)| *visible).count();
        prop_assert!(order[visible..].iter().all(|(_, visible)| !visible));
        // Each listed name is taken once per leaf of that name.
        let mut expected = Vec::new();
        let mut remaining = leaves.clone();
        for name in &names {
            if let Some(i) = remaining.iter().position(|l| l == name) {
                remaining.remove(i);
                expected.push((*name).to_string());
            }
        }
        let front: Vec<_> = order[..visible].iter().map(|(n, _)| n.clone()).collect();
        prop_assert_eq!(front, expected);
    }
}
