// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer tree data model.
//!
//! A *layer node* is either a leaf (one renderable map layer) or a group with
//! an ordered list of child nodes. Each node has:
//!
//! - Content: `name`, `visibility`, `opacity`, `queryable`, and, on roots,
//!   an optional explicit `drawing_order`.
//! - Shape: the sublayer list. Its order is the on-screen order within the
//!   group (top first).
//! - Identity: an [`InstanceId`] (*uuid*) and a [`RefId`] (*refid*). The
//!   first changes whenever a node is rebuilt; the second follows the node's
//!   lineage and drives regrouping.
//!
//! Trees are values. Every operation in this crate takes its input by
//! reference and returns a new tree; a caller that still holds the old tree
//! observes no change.
//!
//! Nodes are addressed by [`NodePath`], a list of child indices from a root.
//! [`LayerNode::get`], [`LayerNode::node_at`] and [`LayerNode::replaced_at`]
//! are the get/set-at-path primitives.

mod id;
mod layer;
mod path;

pub use id::{IdSource, InstanceId, RandomIds, RefId, SequentialIds};
pub use layer::{LayerNode, OPAQUE, add_sublayer_ids, assign_unique_uuids};
pub use path::NodePath;

pub(crate) use layer::refresh_group_uuids;
