// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer-tree linearization for map viewers.
//!
//! `lamina_core` manages the shape and order of a map viewer's layer
//! configuration tree: nested groups of map layers, each leaf one renderable
//! server layer. It is `no_std` compatible (with `alloc`). Trees are values;
//! every operation takes its input by reference and returns a new tree.
//!
//! # Architecture
//!
//! Most operations flatten a tree into its drawing order, edit the flat list,
//! and fold the list back into the smallest tree that reproduces it:
//!
//! ```text
//!   roots ──► explode() ──► [ExplodedEntry] ──► edit ──► implode() ──► roots
//!                                                 │
//!                          reorder / remove / insert / restore
//!
//!   root ──► build_params() ──► RenderParams (LAYERS, OPACITIES)
//!
//!   "a,b[25]" ──► link::parse_layer_param() ──► restore ──► sublayers
//! ```
//!
//! **[`node`]**: [`LayerNode`](node::LayerNode), the two identifier types
//! and [`NodePath`](node::NodePath) addressing.
//!
//! **[`explode`]** / **[`implode`]**: Flatten a set of roots into drawing
//! order and rebuild the minimal tree from a flat list. Regrouping is driven
//! by lineage identifiers.
//!
//! **[`reorder`]** and **[`edit`]**: Move leaves or whole groups, remove and
//! insert leaves in drawing order, keeping background layers fixed at the
//! end.
//!
//! **[`restore`]**: Reapply visibility, opacity and optionally order from a
//! persisted name list, then bring group visibility in line with the leaves.
//!
//! **[`params`]**: Aggregate visible leaves into render request parameters.
//!
//! **[`link`]**: The persisted-link layer parameter codec.
//!
//! **[`config`]**: Serializable input tree and viewer settings.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types,
//! with the zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-entry
//!   explode events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod config;
pub mod context;
pub mod edit;
pub mod error;
pub mod explode;
pub mod implode;
pub mod link;
pub mod node;
pub mod params;
pub mod reorder;
pub mod restore;
pub mod trace;

pub use context::EditContext;
pub use node::{LayerNode, NodePath};
