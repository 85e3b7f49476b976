// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Removing and inserting layers in drawing order.

use alloc::vec::Vec;

use crate::context::EditContext;
use crate::explode::{explode, explode_traced};
use crate::implode::implode;
use crate::node::{LayerNode, NodePath};
use crate::reorder::split_background;
use crate::trace::{EditEvent, EditKind};

/// Removes the node at `path` under `root`, with everything below it.
///
/// `path` may address a leaf or a group; an empty path removes the whole
/// root. The foreground is rebuilt with [`implode`], so a group emptied by
/// the removal disappears. Background layers are appended unchanged.
#[must_use]
pub fn remove(
    layers: &[LayerNode],
    is_background: impl Fn(&LayerNode) -> bool,
    root: &LayerNode,
    path: &NodePath,
    ctx: &mut EditContext<'_>,
) -> Vec<LayerNode> {
    let (foreground, background) = split_background(layers, is_background);
    let mut entries = explode_traced(&foreground, &mut ctx.tracer);
    let before = entries.len();
    entries.retain(|e| !(e.is_from(root) && path.is_prefix_of(&e.path)));
    let after = entries.len();

    let mut result = implode(entries, ctx);
    result.extend(background);
    ctx.tracer.edit(&EditEvent {
        kind: EditKind::Remove,
        entries_before: before,
        entries_after: after,
    });
    result
}

/// Inserts `layer` before the first leaf matching `before`.
///
/// The leaves of `layer` are spliced into drawing order in front of the
/// match and the list is rebuilt with [`implode`]. When no leaf matches, the
/// returned layers equal `layers`.
#[must_use]
pub fn insert_before(
    layers: &[LayerNode],
    layer: &LayerNode,
    before: impl Fn(&LayerNode) -> bool,
    ctx: &mut EditContext<'_>,
) -> Vec<LayerNode> {
    let mut entries = explode_traced(layers, &mut ctx.tracer);
    let before_len = entries.len();
    let Some(index) = entries.iter().position(|e| before(&e.leaf)) else {
        return layers.to_vec();
    };
    let tail = entries.split_off(index);
    entries.extend(explode(core::slice::from_ref(layer)));
    entries.extend(tail);
    let after_len = entries.len();

    let result = implode(entries, ctx);
    ctx.tracer.edit(&EditEvent {
        kind: EditKind::Insert,
        entries_before: before_len,
        entries_after: after_len,
    });
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
