// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node identity types.
//!
//! Every [`LayerNode`](super::LayerNode) carries two identifiers that are
//! never derived from its content:
//!
//! - [`InstanceId`] (the node's *uuid*): unique per node instance. Display
//!   code treats a changed `InstanceId` as "needs re-render".
//! - [`RefId`] (the node's *refid*): structural lineage. Nodes that came
//!   from the same place in a template tree share a `RefId`, and
//!   [`implode`](crate::implode::implode) only re-merges adjacent entries
//!   whose lineage matches.
//!
//! The two are distinct types so that one can never be compared against the
//! other by accident.

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-instance identifier of a node (its *uuid*).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(Uuid);

impl InstanceId {
    /// Wraps a raw [`Uuid`].
    #[inline]
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the raw [`Uuid`].
    #[inline]
    #[must_use]
    pub const fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl fmt::Debug for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceId({})", self.0.as_simple())
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Structural lineage identifier of a node (its *refid*).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefId(Uuid);

impl RefId {
    /// Wraps a raw [`Uuid`].
    #[inline]
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the raw [`Uuid`].
    #[inline]
    #[must_use]
    pub const fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl fmt::Debug for RefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RefId({})", self.0.as_simple())
    }
}

/// A source of fresh node identifiers.
///
/// Operations that regenerate identity ([`implode`](crate::implode::implode),
/// [`add_sublayer_ids`](crate::node::add_sublayer_ids), the reordering
/// restore) draw from an `IdSource` instead of a global generator, so a
/// caller can make them fully deterministic with [`SequentialIds`].
pub trait IdSource {
    /// Returns an instance identifier not handed out before.
    fn instance_id(&mut self) -> InstanceId;

    /// Returns a lineage identifier not handed out before.
    fn ref_id(&mut self) -> RefId;
}

/// Random (version 4) identifiers.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn instance_id(&mut self) -> InstanceId {
        InstanceId(Uuid::new_v4())
    }

    fn ref_id(&mut self) -> RefId {
        RefId(Uuid::new_v4())
    }
}

/// Counter-based identifiers.
///
/// Each call returns the next value of a single shared counter, so instance
/// and lineage identifiers never collide with each other either. Intended for
/// tests and for reproducible diagnostics output.
#[derive(Clone, Debug, Default)]
pub struct SequentialIds {
    next: u128,
}

impl SequentialIds {
    /// Creates a generator whose first identifier is `1`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many identifiers have been handed out.
    #[must_use]
    pub fn issued(&self) -> u128 {
        self.next
    }

    fn bump(&mut self) -> Uuid {
        self.next += 1;
        Uuid::from_u128(self.next)
    }
}

impl IdSource for SequentialIds {
    fn instance_id(&mut self) -> InstanceId {
        InstanceId(self.bump())
    }

    fn ref_id(&mut self) -> RefId {
        RefId(self.bump())
    }
}
