// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Serializable configuration.
//!
//! [`LayerConfig`] is the layer tree as a theme or capabilities loader
//! supplies it: nested groups and leaves with optional fields. Unknown fields
//! (titles, legend URLs, ...) are ignored. [`ViewerConfig`] holds the viewer
//! settings that change how layer links are read and written.

use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::node::{IdSource, LayerNode, OPAQUE};

/// A layer tree node as configured.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerConfig {
    /// Layer name.
    pub name: String,
    /// Defaults to `true`.
    #[serde(default = "default_visibility")]
    pub visibility: bool,
    /// Defaults to fully opaque.
    #[serde(default = "default_opacity")]
    pub opacity: u8,
    /// Defaults to `false`.
    #[serde(default)]
    pub queryable: bool,
    /// Present (possibly empty) for groups only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sublayers: Option<Vec<Self>>,
    /// Explicit server drawing order; only meaningful on roots.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drawing_order: Vec<String>,
}

fn default_visibility() -> bool {
    true
}

fn default_opacity() -> u8 {
    OPAQUE
}

impl LayerConfig {
    /// Creates a leaf configuration with default fields.
    #[must_use]
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: true,
            opacity: OPAQUE,
            queryable: false,
            sublayers: None,
            drawing_order: Vec::new(),
        }
    }

    /// Creates a group configuration with default fields.
    #[must_use]
    pub fn group(name: impl Into<String>, sublayers: Vec<Self>) -> Self {
        Self {
            sublayers: Some(sublayers),
            ..Self::leaf(name)
        }
    }
}

/// Viewer settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerConfig {
    /// Whether users may reorder layers. When set, restoring from a link also
    /// restores the order of the listed layers.
    pub allow_reordering_layers: bool,
    /// Whether link layer parameters list layers bottom first.
    pub url_reverse_layer_order: bool,
}

impl LayerNode {
    /// Builds a tree from its configuration.
    ///
    /// Every node gets fresh identifiers, parents before children.
    #[must_use]
    pub fn from_config(config: &LayerConfig, ids: &mut dyn IdSource) -> Self {
        let mut node = Self::leaf(config.name.clone(), ids)
            .with_visibility(config.visibility)
            .with_opacity(config.opacity)
            .with_queryable(config.queryable)
            .with_drawing_order(config.drawing_order.iter().cloned());
        if let Some(sublayers) = &config.sublayers {
            node.sublayers = Some(
                sublayers
                    .iter()
                    .map(|child| Self::from_config(child, ids))
                    .collect(),
            );
        }
        node
    }

    /// Returns the configuration of this tree. Identifiers are dropped.
    #[must_use]
    pub fn to_config(&self) -> LayerConfig {
        LayerConfig {
            name: self.name.clone(),
            visibility: self.visibility,
            opacity: self.opacity,
            queryable: self.queryable,
            sublayers: self
                .sublayers()
                .map(|children| children.iter().map(Self::to_config).collect()),
            drawing_order: self.drawing_order.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::node::SequentialIds;

    const THEME: &str = r#"{
        "name": "city",
        "title": "City map",
        "drawingOrder": ["parcels", "roads"],
        "sublayers": [
            { "name": "roads", "queryable": true },
            { "name": "base", "visibility": false, "sublayers": [
                { "name": "parcels", "opacity": 128 }
            ] },
            { "name": "empty", "sublayers": [] }
        ]
    }"#;

    #[test]
    fn missing_fields_take_defaults() {
        let config: LayerConfig = serde_json::from_str(THEME).expect("valid theme");
        let subs = config.sublayers.as_deref().expect("root is a group");
        assert_eq!(subs[0].opacity, OPAQUE);
        assert!(subs[0].visibility, "visible by default");
        assert!(subs[0].queryable);
        assert!(subs[0].sublayers.is_none(), "roads is a leaf");
        assert!(!subs[1].visibility);
        assert_eq!(subs[2].sublayers, Some(vec![]), "empty group stays a group");
        assert_eq!(config.drawing_order, ["parcels", "roads"]);
    }

    #[test]
    fn node_round_trip() {
        let config: LayerConfig = serde_json::from_str(THEME).expect("valid theme");
        let mut ids = SequentialIds::new();
        let root = LayerNode::from_config(&config, &mut ids);
        assert!(root.is_group());
        assert_eq!(root.leaf_count(), 2);
        assert_eq!(root.children()[1].children()[0].opacity, 128);
        assert!(root.children()[2].is_group(), "empty group stays a group");
        assert_eq!(root.to_config(), config);
    }

    #[test]
    fn ids_are_assigned_top_down() {
        let config = LayerConfig::group("g", vec![LayerConfig::leaf("a")]);
        let mut ids = SequentialIds::new();
        let root = LayerNode::from_config(&config, &mut ids);
        assert!(root.uuid().as_uuid() < root.children()[0].uuid().as_uuid());
        assert_eq!(ids.issued(), 4, "two ids per node");
    }

    #[test]
    fn viewer_config_is_camel_case_and_defaulted() {
        let config: ViewerConfig =
            serde_json::from_str(r#"{ "allowReorderingLayers": true }"#).expect("valid config");
        assert!(config.allow_reordering_layers);
        assert!(!config.url_reverse_layer_order, "defaulted");
        let empty: ViewerConfig = serde_json::from_str("{}").expect("valid config");
        assert_eq!(empty, ViewerConfig::default());
    }

    #[test]
    fn serialization_omits_defaults_that_are_absent() {
        let json = serde_json::to_value(LayerConfig::leaf("a")).expect("serializable");
        assert!(json.get("sublayers").is_none(), "leaf has no sublayers");
        assert!(json.get("drawingOrder").is_none(), "no drawing order");
    }
}
