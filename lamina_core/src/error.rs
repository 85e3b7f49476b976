// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use alloc::string::String;

use crate::node::NodePath;

/// Why a reorder request left the tree unchanged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReorderError {
    /// No entry of the given root lies at or below the given path.
    #[error("no leaf at {path} under the given root")]
    NotFound {
        /// The requested path.
        path: NodePath,
    },
    /// The destination lies outside the list of entries.
    #[error("cannot move entry {from} by {delta}: {len} entries")]
    OutOfRange {
        /// Index of the entry in drawing order.
        from: usize,
        /// Requested signed offset.
        delta: isize,
        /// Number of foreground entries.
        len: usize,
    },
    /// The move would take the node out of its parent group while group
    /// splitting is prevented.
    #[error("cannot move {path} out of its group")]
    LeavesGroup {
        /// The requested path.
        path: NodePath,
    },
}

/// A malformed token in a persisted-link layer parameter.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    /// The token has no layer name.
    #[error("empty layer name in token {0:?}")]
    EmptyName(String),
    /// The bracketed suffix is not an integer.
    #[error("invalid transparency in token {0:?}")]
    InvalidTransparency(String),
    /// The bracketed transparency exceeds 100 percent.
    #[error("transparency {percent} out of range in token {token:?}")]
    TransparencyOutOfRange {
        /// The offending token.
        token: String,
        /// The parsed percentage.
        percent: u32,
    },
}
