// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-call state for tree edits.

use crate::node::IdSource;
use crate::trace::{TraceSink, Tracer};

/// The identifier source and tracer an edit draws on.
///
/// Operations that rebuild trees mint identifiers for new groups and report
/// what they did. Both are borrowed from the caller for the duration of one
/// call:
///
/// ```
/// use lamina_core::EditContext;
/// use lamina_core::node::SequentialIds;
///
/// let mut ids = SequentialIds::new();
/// let mut ctx = EditContext::new(&mut ids);
/// let entries = lamina_core::explode::explode(&[]);
/// let roots = lamina_core::implode::implode(entries, &mut ctx);
/// assert!(roots.is_empty());
/// ```
pub struct EditContext<'a> {
    /// Source of fresh identifiers.
    pub ids: &'a mut dyn IdSource,
    /// Event sink wrapper.
    pub tracer: Tracer<'a>,
}

impl core::fmt::Debug for EditContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EditContext")
            .field("tracer", &self.tracer)
            .finish_non_exhaustive()
    }
}

impl<'a> EditContext<'a> {
    /// Creates a context that does not trace.
    #[must_use]
    pub fn new(ids: &'a mut dyn IdSource) -> Self {
        Self {
            ids,
            tracer: Tracer::none(),
        }
    }

    /// Creates a context that reports events to `sink`.
    ///
    /// Events only reach the sink when the `trace` feature is enabled.
    #[must_use]
    pub fn with_sink(ids: &'a mut dyn IdSource, sink: &'a mut dyn TraceSink) -> Self {
        Self {
            ids,
            tracer: Tracer::new(sink),
        }
    }
}
