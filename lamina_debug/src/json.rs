// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON export of recordings and layer trees.
//!
//! [`export`] reads recorded bytes from a
//! [`RecorderSink`](super::recorder::RecorderSink) and writes a JSON array
//! with one object per event. Every object has an `"event"` key naming the
//! event and a `"seq"` key with its position in the recording.
//!
//! [`export_tree`] writes a list of roots in their configuration form.

use std::io::{self, Write};

use lamina_core::node::LayerNode;
use lamina_core::trace::{EditKind, ReorderOutcome, RestoreKind};
use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as a JSON array.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let events: Vec<Value> = decode(bytes)
        .enumerate()
        .map(|(seq, recorded)| event_json(seq, &recorded))
        .collect();
    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn event_json(seq: usize, recorded: &RecordedEvent) -> Value {
    match recorded {
        RecordedEvent::Explode(e) => json!({
            "event": "explode",
            "seq": seq,
            "roots": e.roots,
            "entries": e.entries,
        }),
        RecordedEvent::Implode(e) => json!({
            "event": "implode",
            "seq": seq,
            "entries": e.entries,
            "roots": e.roots,
            "merged": e.merged,
        }),
        RecordedEvent::Reorder(e) => json!({
            "event": "reorder",
            "seq": seq,
            "from": e.from,
            "delta": e.delta,
            "entries": e.entries,
            "outcome": match e.outcome {
                ReorderOutcome::Moved => "moved",
                ReorderOutcome::NotFound => "not-found",
                ReorderOutcome::OutOfRange => "out-of-range",
                ReorderOutcome::LeavesGroup => "leaves-group",
            },
        }),
        RecordedEvent::Edit(e) => json!({
            "event": match e.kind {
                EditKind::Remove => "remove",
                EditKind::Insert => "insert",
            },
            "seq": seq,
            "entries_before": e.entries_before,
            "entries_after": e.entries_after,
        }),
        RecordedEvent::Restore(e) => json!({
            "event": "restore",
            "seq": seq,
            "kind": match e.kind {
                RestoreKind::Visible => "visible",
                RestoreKind::Reordered => "reordered",
            },
            "requested": e.requested,
            "matched": e.matched,
        }),
        RecordedEvent::UnknownName(name) => json!({
            "event": "unknown_name",
            "seq": seq,
            "name": name,
        }),
        RecordedEvent::Params(e) => json!({
            "event": "params",
            "seq": seq,
            "layers": e.layers,
            "queryable": e.queryable,
            "drawing_order": e.drawing_order,
        }),
        RecordedEvent::Entry { index, depth, name } => json!({
            "event": "entry",
            "seq": seq,
            "index": index,
            "depth": depth,
            "name": name,
        }),
    }
}

/// Writes `roots` as a JSON array of layer configurations.
///
/// Identifiers are not part of the output.
pub fn export_tree(roots: &[LayerNode], writer: &mut dyn Write) -> io::Result<()> {
    let configs: Vec<_> = roots.iter().map(LayerNode::to_config).collect();
    serde_json::to_writer_pretty(writer, &configs)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use lamina_core::node::SequentialIds;
    use lamina_core::trace::{ExplodeEvent, ReorderEvent, TraceSink};

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_explode(&ExplodeEvent {
            roots: 1,
            entries: 3,
        });
        rec.on_reorder(&ReorderEvent {
            from: Some(2),
            delta: 1,
            entries: 3,
            outcome: ReorderOutcome::OutOfRange,
        });
        rec.on_unknown_name("ghost");

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        // Should parse as a JSON array.
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 3);

        assert_eq!(parsed[0]["event"], "explode");
        assert_eq!(parsed[0]["entries"], 3);

        assert_eq!(parsed[1]["event"], "reorder");
        assert_eq!(parsed[1]["outcome"], "out-of-range");
        assert_eq!(parsed[1]["seq"], 1);

        assert_eq!(parsed[2]["name"], "ghost");
    }

    #[test]
    fn export_tree_omits_ids() {
        let mut ids = SequentialIds::new();
        let root = LayerNode::group(
            "g",
            vec![LayerNode::leaf("a", &mut ids).with_opacity(10)],
            &mut ids,
        );
        let mut out = Vec::new();
        export_tree(&[root], &mut out).unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["name"], "g");
        assert_eq!(parsed[0]["sublayers"][0]["opacity"], 10);
        assert!(parsed[0].get("uuid").is_none(), "no identifiers");
    }
}
