// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rebuilding the minimal tree from a flat list of entries.
//!
//! Each entry is first turned back into a single-branch tree
//! ([`ExplodedEntry::into_branch`]). Branches are then folded left to right:
//! a branch whose lineage matches the last root built so far is merged into
//! it by [`merge_or_append`], otherwise it starts a new root. Adjacent
//! entries of the same lineage thus collapse into one group, while entries
//! that were split apart by an edit end up in separate copies of their
//! group.
//!
//! Identity is maintained as follows:
//!
//! - Groups on a merged branch get fresh instance identifiers; leaves never
//!   do.
//! - Group identifiers of new roots are kept unless another group of the
//!   result already uses them.
//! - Lineage identifiers are always kept.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use crate::context::EditContext;
use crate::explode::ExplodedEntry;
use crate::node::{IdSource, InstanceId, LayerNode, assign_unique_uuids, refresh_group_uuids};
use crate::trace::ImplodeEvent;

/// Folds `entries` back into root layers, preserving their order.
///
/// # Panics
///
/// Panics if an entry's path does not lead from its root to a node.
pub fn implode<'a>(
    entries: impl IntoIterator<Item = ExplodedEntry<'a>>,
    ctx: &mut EditContext<'_>,
) -> Vec<LayerNode> {
    let mut roots: Vec<LayerNode> = Vec::new();
    let mut used = BTreeSet::new();
    let mut count = 0;
    let mut merged = 0;

    for entry in entries {
        count += 1;
        let branch = entry.into_branch();
        let rejected = match roots.last_mut() {
            Some(target) => merge_or_append(target, branch, &mut used, ctx.ids).err(),
            None => Some(branch),
        };
        match rejected {
            Some(mut branch) => {
                assign_unique_uuids(&mut branch, &mut used, ctx.ids);
                roots.push(branch);
            }
            None => merged += 1,
        }
    }

    ctx.tracer.implode(&ImplodeEvent {
        entries: count,
        roots: roots.len(),
        merged,
    });
    roots
}

/// Merges a single-branch tree into `target`.
///
/// Both must be groups of the same lineage; otherwise the branch is handed
/// back unchanged as `Err`. Below the top level, the two are descended in
/// lockstep for as long as the target's last child and the branch's child
/// are groups of the same lineage. The rest of the branch is appended as a
/// new last child there, with fresh instance identifiers on its groups
/// (recorded in `used`).
pub fn merge_or_append(
    target: &mut LayerNode,
    branch: LayerNode,
    used: &mut BTreeSet<InstanceId>,
    ids: &mut dyn IdSource,
) -> Result<(), LayerNode> {
    if !mergeable(target, &branch) {
        return Err(branch);
    }
    append_below(target, branch, used, ids);
    Ok(())
}

fn mergeable(target: &LayerNode, branch: &LayerNode) -> bool {
    target.is_group() && branch.is_group() && target.refid() == branch.refid()
}

fn append_below(
    target: &mut LayerNode,
    branch: LayerNode,
    used: &mut BTreeSet<InstanceId>,
    ids: &mut dyn IdSource,
) {
    let Some(mut child) = branch.into_children().into_iter().next() else {
        return;
    };
    let children = target.sublayers.get_or_insert_with(Vec::new);
    if let Some(last) = children.last_mut()
        && mergeable(last, &child)
    {
        append_below(last, child, used, ids);
    } else {
        refresh_group_uuids(&mut child, used, ids);
        children.push(child);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
