// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Restores a theme from a shared link and edits it, tracing every step.
//!
//! Usage: `link_demo [THEME.json] [LAYERS-PARAM]`
//!
//! Loads a theme (a built-in one by default), restores visibility, opacity
//! and order from the link parameter, moves and removes a few leaves, and
//! prints the tree and the render parameters after each step. Events go to a
//! [`PrettyPrintSink`](lamina_debug::pretty::PrettyPrintSink) on stdout and
//! to a [`RecorderSink`](lamina_debug::recorder::RecorderSink), which is
//! exported as JSON at the end.

use std::fs::File;
use std::io::BufWriter;

use lamina_core::EditContext;
use lamina_core::config::{LayerConfig, ViewerConfig};
use lamina_core::edit::remove;
use lamina_core::explode::explode;
use lamina_core::link::encode_link_param;
use lamina_core::node::{LayerNode, NodePath, RandomIds};
use lamina_core::params::build_params_traced;
use lamina_core::reorder::{GroupSplitting, reorder, reorder_with};
use lamina_core::restore::restore_from_link;
use lamina_core::trace::{
    EditEvent, EntryEvent, ExplodeEvent, ImplodeEvent, ParamsEvent, ReorderEvent, RestoreEvent,
    TraceSink,
};

use lamina_debug::outline::{OutlineOptions, to_outline};
use lamina_debug::pretty::PrettyPrintSink;
use lamina_debug::recorder::RecorderSink;

const THEME: &str = r#"{
    "name": "city",
    "sublayers": [
        { "name": "labels", "queryable": true },
        { "name": "transport", "sublayers": [
            { "name": "roads", "queryable": true },
            { "name": "rail" },
            { "name": "tram", "visibility": false }
        ] },
        { "name": "cadastre", "sublayers": [
            { "name": "parcels", "queryable": true },
            { "name": "buildings" }
        ] },
        { "name": "rivers" }
    ]
}"#;

const LINK: &str = "parcels[25],roads,rivers[50],ferries";

/// Forwards every event to two sinks.
struct Tee<'a> {
    pretty: &'a mut PrettyPrintSink,
    recorder: &'a mut RecorderSink,
}

impl TraceSink for Tee<'_> {
    fn on_explode(&mut self, e: &ExplodeEvent) {
        self.pretty.on_explode(e);
        self.recorder.on_explode(e);
    }

    fn on_implode(&mut self, e: &ImplodeEvent) {
        self.pretty.on_implode(e);
        self.recorder.on_implode(e);
    }

    fn on_reorder(&mut self, e: &ReorderEvent) {
        self.pretty.on_reorder(e);
        self.recorder.on_reorder(e);
    }

    fn on_edit(&mut self, e: &EditEvent) {
        self.pretty.on_edit(e);
        self.recorder.on_edit(e);
    }

    fn on_restore(&mut self, e: &RestoreEvent) {
        self.pretty.on_restore(e);
        self.recorder.on_restore(e);
    }

    fn on_unknown_name(&mut self, name: &str) {
        self.pretty.on_unknown_name(name);
        self.recorder.on_unknown_name(name);
    }

    fn on_params(&mut self, e: &ParamsEvent) {
        self.pretty.on_params(e);
        self.recorder.on_params(e);
    }

    fn on_entry(&mut self, e: &EntryEvent<'_>) {
        self.pretty.on_entry(e);
        self.recorder.on_entry(e);
    }
}

fn main() {
    let mut args = std::env::args().skip(1);
    let theme = match args.next() {
        Some(path) => std::fs::read_to_string(&path).expect("failed to read theme file"),
        None => THEME.to_string(),
    };
    let link = args.next().unwrap_or_else(|| LINK.to_string());

    let config: LayerConfig = serde_json::from_str(&theme).expect("invalid theme JSON");
    let viewer = ViewerConfig {
        allow_reordering_layers: true,
        ..ViewerConfig::default()
    };

    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut recorder = RecorderSink::new();
    let mut ids = RandomIds;

    let root = LayerNode::from_config(&config, &mut ids);
    println!(
        "-- loaded theme\n{}",
        to_outline(std::slice::from_ref(&root), OutlineOptions::default())
    );

    {
        let mut tee = Tee {
            pretty: &mut pretty,
            recorder: &mut recorder,
        };
        let mut ctx = EditContext::with_sink(&mut ids, &mut tee);

        // -- restore from link ---------------------------------------------
        println!("-- restoring from {link:?}");
        let sublayers = restore_from_link(root.children(), &link, &viewer, &mut ctx)
            .expect("invalid link parameter");
        let root = root.with_sublayers(sublayers);
        show(&root, &viewer, &mut ctx);

        // -- move the top leaf down two places -----------------------------
        let layers = vec![root];
        let entries = explode(&layers);
        let top = &entries[0];
        println!("-- moving {} down by 2", top.leaf.name);
        let layers = reorder(&layers, |_| false, top.root(), &top.path, 2, &mut ctx);
        show(&layers[0], &viewer, &mut ctx);

        // -- a move past the end does nothing ------------------------------
        let entries = explode(&layers);
        let last = &entries[entries.len() - 1];
        println!("-- moving {} down past the end", last.leaf.name);
        let layers = reorder(&layers, |_| false, last.root(), &last.path, 1, &mut ctx);

        // -- move the first group up one sibling, keeping groups whole -----
        let group = layers[0]
            .children()
            .iter()
            .position(LayerNode::is_group)
            .expect("theme has a group");
        println!("-- moving group {} up", layers[0].children()[group].name);
        let layers = reorder_with(
            &layers,
            |_| false,
            &layers[0],
            &NodePath::from([group]),
            -1,
            GroupSplitting::Prevent,
            &mut ctx,
        );
        show(&layers[0], &viewer, &mut ctx);

        // -- remove the first group ----------------------------------------
        let group = layers[0]
            .children()
            .iter()
            .position(LayerNode::is_group)
            .expect("theme has a group");
        println!("-- removing {}", layers[0].children()[group].name);
        let layers = remove(&layers, |_| false, &layers[0], &NodePath::from([group]), &mut ctx);
        show(&layers[0], &viewer, &mut ctx);
    }

    // -- export recording --------------------------------------------------
    let path = "lamina-trace.json";
    let file = File::create(path).expect("failed to create lamina-trace.json");
    let mut writer = BufWriter::new(file);
    lamina_debug::json::export(recorder.as_bytes(), &mut writer).expect("failed to write trace");

    println!("Wrote {path}");
}

fn show(root: &LayerNode, viewer: &ViewerConfig, ctx: &mut EditContext<'_>) {
    print!("{}", to_outline(std::slice::from_ref(root), OutlineOptions::default()));
    let params = build_params_traced(root, &mut ctx.tracer);
    for (key, value) in params.query_pairs() {
        println!("   {key}={value}");
    }
    println!("   link={}\n", encode_link_param(root, viewer));
}
