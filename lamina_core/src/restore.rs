// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Restoring visibility, opacity and order from a name list.
//!
//! A persisted link names the leaves of a tree, top first, with an opacity
//! and a visibility state each. Two variants apply such a list to the
//! sublayers of a root:
//!
//! - [`restore_visible`] switches leaves on or off and sets their opacity,
//!   leaving the shape of the tree alone.
//! - [`restore_reordered_visible`] additionally moves the listed leaves to
//!   the top in the listed order, regrouping the tree as needed, and then
//!   derives group visibility from the leaves ([`update_group_visibility`]).
//!
//! Names that match no leaf are ignored and reported to the tracer.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use crate::config::ViewerConfig;
use crate::context::EditContext;
use crate::error::LinkError;
use crate::explode::{ExplodedEntry, explode_traced};
use crate::implode::implode;
use crate::link::{LinkEntry, LinkVisibility, decode_link_param};
use crate::node::{InstanceId, LayerNode, add_sublayer_ids};
use crate::trace::{RestoreEvent, RestoreKind, Tracer};

/// One requested leaf.
struct Wanted<'a> {
    name: &'a str,
    opacity: Option<u8>,
    visibility: LinkVisibility,
}

impl<'a> From<&'a LinkEntry> for Wanted<'a> {
    fn from(entry: &'a LinkEntry) -> Self {
        Self {
            name: &entry.name,
            opacity: Some(entry.opacity),
            visibility: entry.visibility,
        }
    }
}

fn wanted_from_names<'a, S: AsRef<str>>(names: &'a [S], opacities: &[u8]) -> Vec<Wanted<'a>> {
    names
        .iter()
        .enumerate()
        .map(|(idx, name)| Wanted {
            name: name.as_ref(),
            opacity: opacities.get(idx).copied(),
            visibility: LinkVisibility::Visible,
        })
        .collect()
}

/// Instance identifiers of leaves restored as [`LinkVisibility::Partial`].
type PartialLeaves = BTreeSet<InstanceId>;

// ---------------------------------------------------------------------------
// Shape-preserving restore
// ---------------------------------------------------------------------------

/// Applies a name list to `sublayers` without changing their shape.
///
/// Each leaf is made visible exactly when its name is listed, and then takes
/// the opacity paired with the first occurrence of its name. A listed name
/// with no paired opacity keeps the leaf's current opacity. Group visibility
/// is not changed.
pub fn restore_visible<S: AsRef<str>>(
    sublayers: &[LayerNode],
    names: &[S],
    opacities: &[u8],
    tracer: &mut Tracer<'_>,
) -> Vec<LayerNode> {
    let wanted = wanted_from_names(names, opacities);
    restore_wanted_visible(sublayers, &wanted, tracer).0
}

fn restore_wanted_visible(
    sublayers: &[LayerNode],
    wanted: &[Wanted<'_>],
    tracer: &mut Tracer<'_>,
) -> (Vec<LayerNode>, PartialLeaves) {
    let mut matched = BTreeSet::new();
    let mut partial = PartialLeaves::new();
    let restored = sublayers
        .iter()
        .map(|node| restore_node(node, wanted, &mut matched, &mut partial))
        .collect();

    if tracer.is_active() {
        for (idx, w) in wanted.iter().enumerate() {
            // Only the first occurrence of a name can match.
            let first = !wanted[..idx].iter().any(|o| o.name == w.name);
            if first && !matched.contains(&idx) {
                tracer.unknown_name(w.name);
            }
        }
    }
    tracer.restore(&RestoreEvent {
        kind: RestoreKind::Visible,
        requested: wanted.len(),
        matched: matched.len(),
    });
    (restored, partial)
}

fn restore_node(
    node: &LayerNode,
    wanted: &[Wanted<'_>],
    matched: &mut BTreeSet<usize>,
    partial: &mut PartialLeaves,
) -> LayerNode {
    let mut copy = node.shallow_clone();
    match node.sublayers() {
        Some(children) => {
            copy.sublayers = Some(
                children
                    .iter()
                    .map(|child| restore_node(child, wanted, matched, partial))
                    .collect(),
            );
        }
        None => match wanted.iter().position(|w| w.name == node.name) {
            Some(idx) => {
                matched.insert(idx);
                let w = &wanted[idx];
                copy.visibility = w.visibility.leaf_visible();
                copy.opacity = w.opacity.unwrap_or(node.opacity);
                if w.visibility == LinkVisibility::Partial {
                    partial.insert(copy.uuid);
                }
            }
            None => copy.visibility = false,
        },
    }
    copy
}

// ---------------------------------------------------------------------------
// Reordering restore
// ---------------------------------------------------------------------------

/// Applies a name list to `sublayers`, moving the listed leaves to the top.
///
/// The tree is exploded after giving every node fresh identifiers. For each
/// name in turn, the first leaf of that name not yet taken is moved to the
/// front, after the leaves taken before it, and made visible with the paired
/// opacity (or its own if none is paired). All remaining leaves follow in
/// their original order, hidden. The list is then imploded, so groups whose
/// leaves were pulled apart are split, and every non-empty group is made
/// visible exactly when one of its children is.
pub fn restore_reordered_visible<S: AsRef<str>>(
    sublayers: &[LayerNode],
    names: &[S],
    opacities: &[u8],
    ctx: &mut EditContext<'_>,
) -> Vec<LayerNode> {
    let wanted = wanted_from_names(names, opacities);
    restore_wanted_reordered(sublayers, &wanted, ctx)
}

fn restore_wanted_reordered(
    sublayers: &[LayerNode],
    wanted: &[Wanted<'_>],
    ctx: &mut EditContext<'_>,
) -> Vec<LayerNode> {
    let mut root = LayerNode::group("", sublayers.to_vec(), ctx.ids);
    add_sublayer_ids(&mut root, ctx.ids);
    let roots = [root];

    let mut pending: Vec<Option<ExplodedEntry<'_>>> = explode_traced(&roots, &mut ctx.tracer)
        .into_iter()
        .map(Some)
        .collect();
    let mut ordered = Vec::with_capacity(pending.len());
    let mut partial = PartialLeaves::new();

    for w in wanted {
        let taken = pending
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|e| e.leaf.name == w.name))
            .and_then(Option::take);
        match taken {
            Some(mut entry) => {
                entry.leaf.visibility = w.visibility.leaf_visible();
                entry.leaf.opacity = w.opacity.unwrap_or(entry.leaf.opacity);
                if w.visibility == LinkVisibility::Partial {
                    partial.insert(entry.leaf.uuid());
                }
                ordered.push(entry);
            }
            None => ctx.tracer.unknown_name(w.name),
        }
    }
    let matched = ordered.len();

    ordered.extend(pending.into_iter().flatten().map(|mut entry| {
        entry.leaf.visibility = false;
        entry
    }));

    let rebuilt = implode(ordered, ctx);
    ctx.tracer.restore(&RestoreEvent {
        kind: RestoreKind::Reordered,
        requested: wanted.len(),
        matched,
    });
    let mut restored = rebuilt
        .into_iter()
        .next()
        .map(LayerNode::into_children)
        .unwrap_or_default();
    sync_group_visibility(&mut restored, &partial);
    restored
}

// ---------------------------------------------------------------------------
// Group visibility
// ---------------------------------------------------------------------------

/// Derives the visibility of every non-empty group in `layers` from its
/// children, bottom-up.
///
/// A group is visible when at least one child is. Leaves and empty groups
/// are left alone. Returns whether any of `layers` is visible.
pub fn update_group_visibility(layers: &mut [LayerNode]) -> bool {
    sync_group_visibility(layers, &PartialLeaves::new())
}

/// Like [`update_group_visibility`], except that a group directly holding a
/// leaf in `partial` is hidden regardless of its other children.
fn sync_group_visibility(layers: &mut [LayerNode], partial: &PartialLeaves) -> bool {
    let mut any_visible = false;
    let mut any_partial = false;
    for layer in layers {
        if let Some(children) = layer.sublayers.as_mut()
            && !children.is_empty()
        {
            layer.visibility = sync_group_visibility(children, partial);
        }
        any_partial |= layer.is_leaf() && partial.contains(&layer.uuid);
        any_visible |= layer.visibility;
    }
    any_visible && !any_partial
}

// ---------------------------------------------------------------------------
// Link restore
// ---------------------------------------------------------------------------

/// Decodes a persisted-link layer parameter and applies it to `sublayers`.
///
/// With [`ViewerConfig::allow_reordering_layers`] set the order is restored
/// too, as by [`restore_reordered_visible`]; otherwise only visibility and
/// opacity are, as by [`restore_visible`]. Leaves not in the parameter are
/// hidden. Token suffixes are honored: a `!` leaf is hidden but keeps its
/// listed place, a `~` leaf is shown and hides the group holding it. Group
/// visibility is then derived from the leaves in both cases.
///
/// # Errors
///
/// Returns a [`LinkError`] if the parameter is malformed; `sublayers` are
/// then left as they are.
pub fn restore_from_link(
    sublayers: &[LayerNode],
    param: &str,
    config: &ViewerConfig,
    ctx: &mut EditContext<'_>,
) -> Result<Vec<LayerNode>, LinkError> {
    let entries = decode_link_param(param, config)?;
    let wanted: Vec<Wanted<'_>> = entries.iter().map(Wanted::from).collect();
    Ok(if config.allow_reordering_layers {
        restore_wanted_reordered(sublayers, &wanted, ctx)
    } else {
        let (mut restored, partial) = restore_wanted_visible(sublayers, &wanted, &mut ctx.tracer);
        sync_group_visibility(&mut restored, &partial);
        restored
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
