// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for layer-tree operations.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! operations in this crate call as they run. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`EntryEvent`], one event per
//!   exploded leaf, plus the corresponding `TraceSink` method.

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// How a reorder request was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReorderOutcome {
    /// The entry moved and the tree was rebuilt.
    Moved,
    /// No entry matched the requested root and path; input returned as is.
    NotFound,
    /// The destination fell outside the list; input returned as is.
    OutOfRange,
    /// The move would have left the parent group while group splitting was
    /// prevented; input returned as is.
    LeavesGroup,
}

/// Which restore variant ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RestoreKind {
    /// Visibility and opacity only; tree shape untouched.
    Visible,
    /// Visibility, opacity and order; tree regrouped.
    Reordered,
}

/// Which list edit ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditKind {
    /// Entries were removed.
    Remove,
    /// Entries were inserted.
    Insert,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after a set of roots was flattened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExplodeEvent {
    /// Number of roots flattened.
    pub roots: usize,
    /// Number of entries produced.
    pub entries: usize,
}

/// Emitted after a list of entries was folded back into roots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImplodeEvent {
    /// Number of entries consumed.
    pub entries: usize,
    /// Number of roots produced.
    pub roots: usize,
    /// Number of entries merged into an existing root.
    pub merged: usize,
}

/// Emitted once per reorder request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReorderEvent {
    /// Index of the first moved entry in drawing order, if it was found.
    pub from: Option<usize>,
    /// Requested signed offset.
    pub delta: isize,
    /// Number of foreground entries.
    pub entries: usize,
    /// How the request was resolved.
    pub outcome: ReorderOutcome,
}

/// Emitted after a remove or insert edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditEvent {
    /// Which edit ran.
    pub kind: EditKind,
    /// Foreground entries before the edit.
    pub entries_before: usize,
    /// Foreground entries after the edit.
    pub entries_after: usize,
}

/// Emitted after visibility was restored from a name list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RestoreEvent {
    /// Which variant ran.
    pub kind: RestoreKind,
    /// Number of names requested.
    pub requested: usize,
    /// Number of requested names that matched a leaf.
    pub matched: usize,
}

/// Emitted after render parameters were built for a root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParamsEvent {
    /// Number of leaves collected.
    pub layers: usize,
    /// Number of queryable leaves collected.
    pub queryable: usize,
    /// Whether an explicit drawing order was applied.
    pub drawing_order: bool,
}

/// A single exploded leaf.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntryEvent<'a> {
    /// Position in drawing order.
    pub index: usize,
    /// Depth below the root.
    pub depth: usize,
    /// Leaf name.
    pub name: &'a str,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from layer-tree operations.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after a set of roots was flattened.
    fn on_explode(&mut self, e: &ExplodeEvent) {
        _ = e;
    }

    /// Called after entries were folded back into roots.
    fn on_implode(&mut self, e: &ImplodeEvent) {
        _ = e;
    }

    /// Called once per reorder request.
    fn on_reorder(&mut self, e: &ReorderEvent) {
        _ = e;
    }

    /// Called after a remove or insert edit.
    fn on_edit(&mut self, e: &EditEvent) {
        _ = e;
    }

    /// Called after visibility was restored from a name list.
    fn on_restore(&mut self, e: &RestoreEvent) {
        _ = e;
    }

    /// Called for each requested name that matched no leaf.
    fn on_unknown_name(&mut self, name: &str) {
        _ = name;
    }

    /// Called after render parameters were built.
    fn on_params(&mut self, e: &ParamsEvent) {
        _ = e;
    }

    /// Called for each exploded leaf (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_entry(&mut self, e: &EntryEvent<'_>) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl Default for Tracer<'_> {
    fn default() -> Self {
        Self::none()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits an [`ExplodeEvent`].
    #[inline]
    pub fn explode(&mut self, e: &ExplodeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_explode(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`ImplodeEvent`].
    #[inline]
    pub fn implode(&mut self, e: &ImplodeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_implode(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ReorderEvent`].
    #[inline]
    pub fn reorder(&mut self, e: &ReorderEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_reorder(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`EditEvent`].
    #[inline]
    pub fn edit(&mut self, e: &EditEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_edit(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RestoreEvent`].
    #[inline]
    pub fn restore(&mut self, e: &RestoreEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_restore(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Reports a requested name that matched no leaf.
    #[inline]
    pub fn unknown_name(&mut self, name: &str) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_unknown_name(name);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = name;
        }
    }

    /// Emits a [`ParamsEvent`].
    #[inline]
    pub fn params(&mut self, e: &ParamsEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_params(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`EntryEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn entry(&mut self, e: &EntryEvent<'_>) {
        if let Some(s) = &mut self.sink {
            s.on_entry(e);
        }
    }

    /// Returns whether events reach a sink.
    ///
    /// Lets callers skip building events that are costly to produce.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        #[cfg(feature = "trace")]
        {
            self.sink.is_some()
        }
        #[cfg(not(feature = "trace"))]
        {
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
