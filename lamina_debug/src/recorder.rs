// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as little-endian records, one tag byte followed by fixed-size
//! fields. Layer names are stored as a `u32` byte length and UTF-8 bytes.
//! [`decode`] reads them back as an iterator of [`RecordedEvent`].

use lamina_core::trace::{
    EditEvent, EditKind, EntryEvent, ExplodeEvent, ImplodeEvent, ParamsEvent, ReorderEvent,
    ReorderOutcome, RestoreEvent, RestoreKind, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_EXPLODE: u8 = 1;
const TAG_IMPLODE: u8 = 2;
const TAG_REORDER: u8 = 3;
const TAG_EDIT: u8 = 4;
const TAG_RESTORE: u8 = 5;
const TAG_UNKNOWN_NAME: u8 = 6;
const TAG_PARAMS: u8 = 7;
const TAG_ENTRY: u8 = 8;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Counts saturate at `u32::MAX`.
    fn write_count(&mut self, v: usize) {
        self.write_u32(u32::try_from(v).unwrap_or(u32::MAX));
    }

    fn write_option_count(&mut self, v: Option<usize>) {
        match v {
            Some(val) => {
                self.write_u8(1);
                self.write_count(val);
            }
            None => {
                self.write_u8(0);
                self.write_u32(0);
            }
        }
    }

    fn write_str(&mut self, s: &str) {
        let len = u32::try_from(s.len()).unwrap_or(u32::MAX);
        let end = usize::try_from(len).unwrap_or(s.len());
        self.write_u32(len);
        self.buf.extend_from_slice(&s.as_bytes()[..end]);
    }
}

impl TraceSink for RecorderSink {
    fn on_explode(&mut self, e: &ExplodeEvent) {
        self.write_u8(TAG_EXPLODE);
        self.write_count(e.roots);
        self.write_count(e.entries);
    }

    fn on_implode(&mut self, e: &ImplodeEvent) {
        self.write_u8(TAG_IMPLODE);
        self.write_count(e.entries);
        self.write_count(e.roots);
        self.write_count(e.merged);
    }

    fn on_reorder(&mut self, e: &ReorderEvent) {
        self.write_u8(TAG_REORDER);
        self.write_option_count(e.from);
        self.write_i64(i64::try_from(e.delta).unwrap_or(i64::MAX));
        self.write_count(e.entries);
        self.write_u8(match e.outcome {
            ReorderOutcome::Moved => 0,
            ReorderOutcome::NotFound => 1,
            ReorderOutcome::OutOfRange => 2,
            ReorderOutcome::LeavesGroup => 3,
        });
    }

    fn on_edit(&mut self, e: &EditEvent) {
        self.write_u8(TAG_EDIT);
        self.write_u8(match e.kind {
            EditKind::Remove => 0,
            EditKind::Insert => 1,
        });
        self.write_count(e.entries_before);
        self.write_count(e.entries_after);
    }

    fn on_restore(&mut self, e: &RestoreEvent) {
        self.write_u8(TAG_RESTORE);
        self.write_u8(match e.kind {
            RestoreKind::Visible => 0,
            RestoreKind::Reordered => 1,
        });
        self.write_count(e.requested);
        self.write_count(e.matched);
    }

    fn on_unknown_name(&mut self, name: &str) {
        self.write_u8(TAG_UNKNOWN_NAME);
        self.write_str(name);
    }

    fn on_params(&mut self, e: &ParamsEvent) {
        self.write_u8(TAG_PARAMS);
        self.write_count(e.layers);
        self.write_count(e.queryable);
        self.write_u8(u8::from(e.drawing_order));
    }

    fn on_entry(&mut self, e: &EntryEvent<'_>) {
        self.write_u8(TAG_ENTRY);
        self.write_count(e.index);
        self.write_count(e.depth);
        self.write_str(e.name);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// An [`ExplodeEvent`].
    Explode(ExplodeEvent),
    /// An [`ImplodeEvent`].
    Implode(ImplodeEvent),
    /// A [`ReorderEvent`].
    Reorder(ReorderEvent),
    /// An [`EditEvent`].
    Edit(EditEvent),
    /// A [`RestoreEvent`].
    Restore(RestoreEvent),
    /// A requested name that matched no leaf.
    UnknownName(String),
    /// A [`ParamsEvent`].
    Params(ParamsEvent),
    /// An exploded leaf.
    Entry {
        /// Position in drawing order.
        index: usize,
        /// Depth below the root.
        depth: usize,
        /// Leaf name.
        name: String,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_bytes(&mut self, len: usize) -> Option<&[u8]> {
        if self.remaining() < len {
            return None;
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        Some(self.read_bytes(1)?[0])
    }

    fn read_u32(&mut self) -> Option<u32> {
        Some(u32::from_le_bytes(self.read_bytes(4)?.try_into().ok()?))
    }

    fn read_i64(&mut self) -> Option<i64> {
        Some(i64::from_le_bytes(self.read_bytes(8)?.try_into().ok()?))
    }

    fn read_count(&mut self) -> Option<usize> {
        usize::try_from(self.read_u32()?).ok()
    }

    fn read_option_count(&mut self) -> Option<Option<usize>> {
        let present = self.read_u8()?;
        let val = self.read_count()?;
        Some(if present != 0 { Some(val) } else { None })
    }

    fn read_string(&mut self) -> Option<String> {
        let len = self.read_count()?;
        let bytes = self.read_bytes(len)?;
        Some(String::from_utf8_lossy(bytes).into_owned())
    }

    fn decode_reorder(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Reorder(ReorderEvent {
            from: self.read_option_count()?,
            delta: isize::try_from(self.read_i64()?).ok()?,
            entries: self.read_count()?,
            outcome: match self.read_u8()? {
                0 => ReorderOutcome::Moved,
                1 => ReorderOutcome::NotFound,
                2 => ReorderOutcome::OutOfRange,
                _ => ReorderOutcome::LeavesGroup,
            },
        }))
    }

    fn decode_edit(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Edit(EditEvent {
            kind: match self.read_u8()? {
                0 => EditKind::Remove,
                _ => EditKind::Insert,
            },
            entries_before: self.read_count()?,
            entries_after: self.read_count()?,
        }))
    }

    fn decode_restore(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Restore(RestoreEvent {
            kind: match self.read_u8()? {
                0 => RestoreKind::Visible,
                _ => RestoreKind::Reordered,
            },
            requested: self.read_count()?,
            matched: self.read_count()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_EXPLODE => Some(RecordedEvent::Explode(ExplodeEvent {
                roots: self.read_count()?,
                entries: self.read_count()?,
            })),
            TAG_IMPLODE => Some(RecordedEvent::Implode(ImplodeEvent {
                entries: self.read_count()?,
                roots: self.read_count()?,
                merged: self.read_count()?,
            })),
            TAG_REORDER => self.decode_reorder(),
            TAG_EDIT => self.decode_edit(),
            TAG_RESTORE => self.decode_restore(),
            TAG_UNKNOWN_NAME => Some(RecordedEvent::UnknownName(self.read_string()?)),
            TAG_PARAMS => Some(RecordedEvent::Params(ParamsEvent {
                layers: self.read_count()?,
                queryable: self.read_count()?,
                drawing_order: self.read_u8()? != 0,
            })),
            TAG_ENTRY => Some(RecordedEvent::Entry {
                index: self.read_count()?,
                depth: self.read_count()?,
                name: self.read_string()?,
            }),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
