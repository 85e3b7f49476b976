// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use lamina_core::trace::{
    EditEvent, EditKind, EntryEvent, ExplodeEvent, ImplodeEvent, ParamsEvent, ReorderEvent,
    ReorderOutcome, RestoreEvent, RestoreKind, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    entries: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            entries: false,
        }
    }

    /// Also prints one line per exploded leaf.
    #[must_use]
    pub fn with_entries(mut self, entries: bool) -> Self {
        self.entries = entries;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn outcome_name(outcome: ReorderOutcome) -> &'static str {
    match outcome {
        ReorderOutcome::Moved => "moved",
        ReorderOutcome::NotFound => "not-found",
        ReorderOutcome::OutOfRange => "out-of-range",
        ReorderOutcome::LeavesGroup => "leaves-group",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_explode(&mut self, e: &ExplodeEvent) {
        let _ = writeln!(
            self.writer,
            "[explode] roots={} entries={}",
            e.roots, e.entries,
        );
    }

    fn on_implode(&mut self, e: &ImplodeEvent) {
        let _ = writeln!(
            self.writer,
            "[implode] entries={} roots={} merged={}",
            e.entries, e.roots, e.merged,
        );
    }

    fn on_reorder(&mut self, e: &ReorderEvent) {
        let from = e
            .from
            .map_or_else(|| "?".to_string(), |from| from.to_string());
        let _ = writeln!(
            self.writer,
            "[reorder] from={from} delta={:+} entries={} {}",
            e.delta,
            e.entries,
            outcome_name(e.outcome),
        );
    }

    fn on_edit(&mut self, e: &EditEvent) {
        let kind = match e.kind {
            EditKind::Remove => "remove",
            EditKind::Insert => "insert",
        };
        let _ = writeln!(
            self.writer,
            "[edit:{kind}] entries={}->{}",
            e.entries_before, e.entries_after,
        );
    }

    fn on_restore(&mut self, e: &RestoreEvent) {
        let kind = match e.kind {
            RestoreKind::Visible => "visible",
            RestoreKind::Reordered => "reordered",
        };
        let _ = writeln!(
            self.writer,
            "[restore:{kind}] matched={}/{}",
            e.matched, e.requested,
        );
    }

    fn on_unknown_name(&mut self, name: &str) {
        let _ = writeln!(self.writer, "[restore] unknown layer {name:?}");
    }

    fn on_params(&mut self, e: &ParamsEvent) {
        let order = if e.drawing_order { " drawing-order" } else { "" };
        let _ = writeln!(
            self.writer,
            "[params] layers={} queryable={}{order}",
            e.layers, e.queryable,
        );
    }

    fn on_entry(&mut self, e: &EntryEvent<'_>) {
        if !self.entries {
            return;
        }
        let _ = writeln!(
            self.writer,
            "  [entry] #{} depth={} {}",
            e.index, e.depth, e.name,
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_print_reorder() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_reorder(&ReorderEvent {
            from: Some(2),
            delta: -1,
            entries: 4,
            outcome: ReorderOutcome::Moved,
        });
        sink.on_unknown_name("ghost");
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("[reorder] from=2 delta=-1"), "got: {output}");
        assert!(output.contains("moved"), "got: {output}");
        assert!(output.contains("unknown layer \"ghost\""), "got: {output}");
    }

    #[test]
    fn entries_are_opt_in() {
        let event = EntryEvent {
            index: 0,
            depth: 1,
            name: "roads",
        };
        let mut quiet = PrettyPrintSink::with_writer(Vec::<u8>::new());
        quiet.on_entry(&event);
        assert!(quiet.into_inner().is_empty(), "entries off by default");

        let mut loud = PrettyPrintSink::with_writer(Vec::<u8>::new()).with_entries(true);
        loud.on_entry(&event);
        let output = String::from_utf8(loud.into_inner()).unwrap();
        assert!(output.contains("[entry] #0 depth=1 roads"), "got: {output}");
    }
}
