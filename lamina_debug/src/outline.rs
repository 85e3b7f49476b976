// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Indented text rendering of layer trees.
//!
//! ```text
//! + city
//!   - roads
//!   + base (hidden)
//!     - parcels [op=128]
//! ```
//!
//! Groups are marked `+`, leaves `-`. Hidden nodes, non-opaque leaves and
//! queryable leaves are annotated.

use std::fmt::Write as _;
use std::io::{self, Write};

use lamina_core::node::{LayerNode, OPAQUE};

/// Options for [`write_outline`].
#[derive(Clone, Copy, Debug, Default)]
pub struct OutlineOptions {
    /// Append each node's instance identifier.
    pub ids: bool,
}

/// Renders `roots` as an indented outline.
#[must_use]
pub fn to_outline(roots: &[LayerNode], options: OutlineOptions) -> String {
    let mut out = String::new();
    for root in roots {
        line(&mut out, root, 0, options);
    }
    out
}

/// Writes `roots` as an indented outline.
pub fn write_outline(
    roots: &[LayerNode],
    options: OutlineOptions,
    writer: &mut dyn Write,
) -> io::Result<()> {
    writer.write_all(to_outline(roots, options).as_bytes())
}

fn line(out: &mut String, node: &LayerNode, depth: usize, options: OutlineOptions) {
    let marker = if node.is_group() { '+' } else { '-' };
    let _ = write!(out, "{:indent$}{marker} {}", "", node.name, indent = depth * 2);
    if !node.visibility {
        out.push_str(" (hidden)");
    }
    if node.is_leaf() {
        if node.opacity != OPAQUE {
            let _ = write!(out, " [op={}]", node.opacity);
        }
        if node.queryable {
            out.push_str(" [q]");
        }
    }
    if options.ids {
        let _ = write!(out, " #{}", node.uuid());
    }
    out.push('\n');
    for child in node.children() {
        line(out, child, depth + 1, options);
    }
}
