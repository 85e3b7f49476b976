// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Moving a leaf or a whole group in drawing order.
//!
//! Background layers (as told by a caller-supplied predicate) never take part
//! in reordering: they are set aside, and appended unchanged after the
//! rebuilt foreground.

use alloc::vec::Vec;

use crate::context::EditContext;
use crate::error::ReorderError;
use crate::explode::{ExplodedEntry, explode_traced};
use crate::implode::implode;
use crate::node::{InstanceId, LayerNode, NodePath};
use crate::trace::{ReorderEvent, ReorderOutcome};

/// Whether a move may carry entries out of their group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GroupSplitting {
    /// Entries move one slot per step and may leave their group, splitting
    /// it on implode.
    #[default]
    Allow,
    /// Entries stay inside their parent group, and each step skips a whole
    /// sibling (leaf or group) so no sibling group is split.
    Prevent,
}

/// Moves the node at `path` under `root` by `delta` places in drawing order.
///
/// Negative deltas move towards the top (the front of the list). A path that
/// names a group moves all of its leaves as one block. On success the
/// foreground is rebuilt with [`implode`] and the background layers are
/// appended unchanged.
///
/// # Errors
///
/// - [`ReorderError::NotFound`] if no foreground entry belongs to `root` at
///   or below `path`. Roots are matched by instance identifier, paths by
///   value.
/// - [`ReorderError::OutOfRange`] if the destination is outside the list.
pub fn try_reorder(
    layers: &[LayerNode],
    is_background: impl Fn(&LayerNode) -> bool,
    root: &LayerNode,
    path: &NodePath,
    delta: isize,
    ctx: &mut EditContext<'_>,
) -> Result<Vec<LayerNode>, ReorderError> {
    try_reorder_with(
        layers,
        is_background,
        root,
        path,
        delta,
        GroupSplitting::Allow,
        ctx,
    )
}

/// Like [`try_reorder`], with an explicit [`GroupSplitting`] mode.
///
/// With [`GroupSplitting::Prevent`] each unit of `delta` steps over one
/// sibling of the moved node, however many leaves that sibling holds.
///
/// # Errors
///
/// As [`try_reorder`], plus [`ReorderError::LeavesGroup`] when
/// [`GroupSplitting::Prevent`] is set and the move would take the node out
/// of its parent group.
pub fn try_reorder_with(
    layers: &[LayerNode],
    is_background: impl Fn(&LayerNode) -> bool,
    root: &LayerNode,
    path: &NodePath,
    delta: isize,
    splitting: GroupSplitting,
    ctx: &mut EditContext<'_>,
) -> Result<Vec<LayerNode>, ReorderError> {
    let (foreground, background) = split_background(layers, is_background);
    let entries = explode_traced(&foreground, &mut ctx.tracer);
    let len = entries.len();

    let mut event = ReorderEvent {
        from: None,
        delta,
        entries: len,
        outcome: ReorderOutcome::NotFound,
    };
    let Some(from) = entries
        .iter()
        .position(|e| e.is_from(root) && path.is_prefix_of(&e.path))
    else {
        ctx.tracer.reorder(&event);
        return Err(ReorderError::NotFound { path: path.clone() });
    };
    event.from = Some(from);

    let (block, rest): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .partition(|e| e.is_from(root) && path.is_prefix_of(&e.path));
    let target = match splitting {
        GroupSplitting::Allow => from
            .checked_add_signed(delta)
            .filter(|&to| to <= rest.len())
            .ok_or(ReorderOutcome::OutOfRange),
        GroupSplitting::Prevent => step_over_siblings(&rest, from, root, path, delta),
    };
    let at = match target {
        Ok(at) => at,
        Err(outcome) => {
            event.outcome = outcome;
            ctx.tracer.reorder(&event);
            return Err(match outcome {
                ReorderOutcome::LeavesGroup => ReorderError::LeavesGroup { path: path.clone() },
                _ => ReorderError::OutOfRange { from, delta, len },
            });
        }
    };

    let mut entries = rest;
    entries.splice(at..at, block);
    let mut result = implode(entries, ctx);
    result.extend(background);

    event.outcome = ReorderOutcome::Moved;
    ctx.tracer.reorder(&event);
    Ok(result)
}

/// Moves the node at `path` under `root` by `delta` places in drawing order.
///
/// Like [`try_reorder`], except that a request that cannot be honored is a
/// no-op: the returned layers equal `layers`. Dragging past the first or
/// last slot, or acting on a node that has since disappeared, thus does
/// nothing. The outcome is still reported to the tracer.
#[must_use]
pub fn reorder(
    layers: &[LayerNode],
    is_background: impl Fn(&LayerNode) -> bool,
    root: &LayerNode,
    path: &NodePath,
    delta: isize,
    ctx: &mut EditContext<'_>,
) -> Vec<LayerNode> {
    reorder_with(
        layers,
        is_background,
        root,
        path,
        delta,
        GroupSplitting::Allow,
        ctx,
    )
}

/// Like [`reorder`], with an explicit [`GroupSplitting`] mode.
#[must_use]
pub fn reorder_with(
    layers: &[LayerNode],
    is_background: impl Fn(&LayerNode) -> bool,
    root: &LayerNode,
    path: &NodePath,
    delta: isize,
    splitting: GroupSplitting,
    ctx: &mut EditContext<'_>,
) -> Vec<LayerNode> {
    try_reorder_with(layers, is_background, root, path, delta, splitting, ctx)
        .unwrap_or_else(|_| layers.to_vec())
}

/// Finds the insertion index in `rest` after stepping over `|delta|`
/// siblings of the node at `path`, starting from slot `at`.
///
/// Fails with [`ReorderOutcome::OutOfRange`] at either end of the list and
/// with [`ReorderOutcome::LeavesGroup`] when the next neighbor lies outside
/// the parent group.
fn step_over_siblings(
    rest: &[ExplodedEntry<'_>],
    mut at: usize,
    root: &LayerNode,
    path: &NodePath,
    delta: isize,
) -> Result<usize, ReorderOutcome> {
    for _ in 0..delta.unsigned_abs() {
        let neighbor = if delta < 0 {
            at.checked_sub(1).and_then(|i| rest.get(i))
        } else {
            rest.get(at)
        };
        let neighbor = neighbor.ok_or(ReorderOutcome::OutOfRange)?;
        let key = sibling_key(neighbor, root, path).ok_or(ReorderOutcome::LeavesGroup)?;
        if delta < 0 {
            while let Some(i) = at.checked_sub(1)
                && sibling_key(&rest[i], root, path) == Some(key)
            {
                at = i;
            }
        } else {
            while at < rest.len() && sibling_key(&rest[at], root, path) == Some(key) {
                at += 1;
            }
        }
    }
    Ok(at)
}

/// Identifies the sibling of the node at `path` that `entry` belongs to, or
/// `None` if `entry` lies outside that node's parent.
///
/// Top-level nodes are siblings of one another; each root is one sibling.
fn sibling_key<'e>(
    entry: &'e ExplodedEntry<'_>,
    root: &LayerNode,
    path: &NodePath,
) -> Option<(InstanceId, &'e [usize])> {
    let level = path.len();
    let Some(parent) = level.checked_sub(1) else {
        return Some((entry.root.uuid(), &[]));
    };
    let indices = entry.path.indices();
    (entry.is_from(root) && indices.len() >= level && indices[..parent] == path.indices()[..parent])
        .then(|| (entry.root.uuid(), &indices[..level]))
}

/// Splits `layers` into foreground and background, keeping relative order.
pub(crate) fn split_background(
    layers: &[LayerNode],
    is_background: impl Fn(&LayerNode) -> bool,
) -> (Vec<LayerNode>, Vec<LayerNode>) {
    layers.iter().cloned().partition(|layer| !is_background(layer))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
