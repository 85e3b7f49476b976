// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The persisted-link layer parameter.
//!
//! A shared map link carries the leaves of a tree as a comma-separated list
//! of names in display order (top first). A name may carry a bracketed
//! transparency percentage, `name[p]` with `p` in `0..=100`; no suffix means
//! fully opaque. A trailing `!` marks a leaf that is switched off, a trailing
//! `~` a leaf that is switched on below a group that is switched off:
//!
//! ```text
//!   roads,buildings[25],parcels[100]!,rivers~
//! ```
//!
//! Transparency and opacity convert with rounding half up, so `25` decodes to
//! opacity `191` and `191` encodes back to `25`.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::config::ViewerConfig;
use crate::error::LinkError;
use crate::node::{LayerNode, OPAQUE};

/// Visibility state carried by a link token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LinkVisibility {
    /// Drawn. No suffix.
    #[default]
    Visible,
    /// Switched off. Suffix `!`.
    Hidden,
    /// Switched on, but below a hidden group. Suffix `~`.
    ///
    /// Restoring such a leaf switches it on and its group off.
    Partial,
}

impl LinkVisibility {
    fn suffix(self) -> &'static str {
        match self {
            Self::Visible => "",
            Self::Hidden => "!",
            Self::Partial => "~",
        }
    }

    /// Returns whether the leaf itself is switched on.
    #[must_use]
    pub fn leaf_visible(self) -> bool {
        self != Self::Hidden
    }
}

/// One token of a persisted-link layer parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LinkEntry {
    /// Leaf name.
    pub name: String,
    /// Opacity in `0..=255`.
    pub opacity: u8,
    /// Visibility suffix.
    pub visibility: LinkVisibility,
}

impl LinkEntry {
    /// Creates a visible entry.
    #[must_use]
    pub fn new(name: impl Into<String>, opacity: u8) -> Self {
        Self {
            name: name.into(),
            opacity,
            visibility: LinkVisibility::Visible,
        }
    }

    /// Sets [`visibility`](Self::visibility).
    #[must_use]
    pub fn with_visibility(mut self, visibility: LinkVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Returns the transparency percentage written for this entry.
    #[must_use]
    pub fn transparency(&self) -> u8 {
        transparency_from_opacity(self.opacity)
    }
}

impl FromStr for LinkEntry {
    type Err = LinkError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let (body, visibility) = if let Some(body) = token.strip_suffix('!') {
            (body, LinkVisibility::Hidden)
        } else if let Some(body) = token.strip_suffix('~') {
            (body, LinkVisibility::Partial)
        } else {
            (token, LinkVisibility::Visible)
        };
        let (name, percent) = match body.strip_suffix(']').and_then(|t| t.rsplit_once('[')) {
            Some((name, digits)) => {
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(LinkError::InvalidTransparency(token.into()));
                }
                let percent: u32 = digits
                    .parse()
                    .map_err(|_| LinkError::InvalidTransparency(token.into()))?;
                (name, Some(percent))
            }
            None => (body, None),
        };
        if name.is_empty() {
            return Err(LinkError::EmptyName(token.into()));
        }
        let opacity = match percent {
            None => OPAQUE,
            Some(percent) => {
                let percent = u8::try_from(percent)
                    .ok()
                    .filter(|&p| p <= 100)
                    .ok_or_else(|| LinkError::TransparencyOutOfRange {
                        token: token.into(),
                        percent,
                    })?;
                opacity_from_transparency(percent)
            }
        };
        Ok(Self::new(name, opacity).with_visibility(visibility))
    }
}

impl fmt::Display for LinkEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        match self.transparency() {
            0 => {}
            p => write!(f, "[{p}]")?,
        }
        f.write_str(self.visibility.suffix())
    }
}

/// Converts a transparency percentage (`0..=100`) to an opacity.
///
/// Percentages above 100 saturate to fully transparent.
#[must_use]
pub fn opacity_from_transparency(percent: u8) -> u8 {
    let percent = u32::from(percent.min(100));
    // round(255 - p * 255 / 100), in hundredths.
    let opacity = (25_500 - 255 * percent + 50) / 100;
    u8::try_from(opacity).unwrap_or(OPAQUE)
}

/// Converts an opacity to the transparency percentage written in links.
#[must_use]
pub fn transparency_from_opacity(opacity: u8) -> u8 {
    // 100 - round(opacity * 100 / 255)
    let visible = (u32::from(opacity) * 200 + 255) / 510;
    100 - u8::try_from(visible).unwrap_or(100)
}

/// Decodes a layer parameter into entries, in the order written.
///
/// An empty parameter yields no entries.
///
/// # Errors
///
/// Returns the first [`LinkError`] encountered.
pub fn parse_layer_param(param: &str) -> Result<Vec<LinkEntry>, LinkError> {
    if param.is_empty() {
        return Ok(Vec::new());
    }
    param.split(',').map(LinkEntry::from_str).collect()
}

/// Encodes entries as a layer parameter.
#[must_use]
pub fn format_layer_param(entries: &[LinkEntry]) -> String {
    use core::fmt::Write as _;

    let mut out = String::new();
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{entry}");
    }
    out
}

/// Decodes a layer parameter into entries in display order (top first).
///
/// With [`ViewerConfig::url_reverse_layer_order`] set, the parameter is read
/// bottom first.
///
/// # Errors
///
/// Returns the first [`LinkError`] encountered.
pub fn decode_link_param(param: &str, config: &ViewerConfig) -> Result<Vec<LinkEntry>, LinkError> {
    let mut entries = parse_layer_param(param)?;
    if config.url_reverse_layer_order {
        entries.reverse();
    }
    Ok(entries)
}

/// Returns one entry per leaf of `root`, in display order.
///
/// A hidden leaf is [`Hidden`](LinkVisibility::Hidden). A visible leaf below
/// a hidden group, the root included, is
/// [`Partial`](LinkVisibility::Partial).
#[must_use]
pub fn link_entries(root: &LayerNode) -> Vec<LinkEntry> {
    let mut out = Vec::new();
    collect_entries(root, true, &mut out);
    out
}

fn collect_entries(node: &LayerNode, parent_visible: bool, out: &mut Vec<LinkEntry>) {
    match node.sublayers() {
        Some(children) => {
            let visible = parent_visible && node.visibility;
            for child in children {
                collect_entries(child, visible, out);
            }
        }
        None => {
            let visibility = match (node.visibility, parent_visible) {
                (false, _) => LinkVisibility::Hidden,
                (true, false) => LinkVisibility::Partial,
                (true, true) => LinkVisibility::Visible,
            };
            out.push(LinkEntry::new(node.name.clone(), node.opacity).with_visibility(visibility));
        }
    }
}

/// Encodes the leaves of `root` as a layer parameter.
///
/// Every leaf is written, with the suffix of its visibility state (see
/// [`link_entries`]). Tokens are in display order, or bottom first with
/// [`ViewerConfig::url_reverse_layer_order`] set.
#[must_use]
pub fn encode_link_param(root: &LayerNode, config: &ViewerConfig) -> String {
    let mut entries = link_entries(root);
    if config.url_reverse_layer_order {
        entries.reverse();
    }
    format_layer_param(&entries)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::*;
    use crate::node::SequentialIds;

    #[test]
    fn bracket_decodes_to_opacity() {
        let entry: LinkEntry = "layerX[25]".parse().expect("valid token");
        assert_eq!(entry, LinkEntry::new("layerX", 191));
        assert_eq!(entry.to_string(), "layerX[25]");
    }

    #[test]
    fn missing_bracket_means_opaque() {
        let entry: LinkEntry = "roads".parse().expect("valid token");
        assert_eq!(entry.opacity, OPAQUE);
        assert_eq!(entry.to_string(), "roads");
    }

    #[test]
    fn conversion_edges() {
        assert_eq!(opacity_from_transparency(0), 255);
        assert_eq!(opacity_from_transparency(100), 0);
        assert_eq!(opacity_from_transparency(10), 230, "229.5 rounds up");
        assert_eq!(transparency_from_opacity(255), 0);
        assert_eq!(transparency_from_opacity(0), 100);
        assert_eq!(transparency_from_opacity(128), 50);
        assert_eq!(transparency_from_opacity(254), 0, "nearly opaque encodes bare");
    }

    #[test]
    fn every_percentage_survives_a_round_trip() {
        for p in 0..=100_u8 {
            let opacity = opacity_from_transparency(p);
            assert_eq!(transparency_from_opacity(opacity), p, "p = {p}");
        }
    }

    #[test]
    fn malformed_tokens() {
        assert_eq!(
            "".parse::<LinkEntry>(),
            Err(LinkError::EmptyName(String::new()))
        );
        assert_eq!(
            "[20]".parse::<LinkEntry>(),
            Err(LinkError::EmptyName("[20]".to_string()))
        );
        assert_eq!(
            "a[x]".parse::<LinkEntry>(),
            Err(LinkError::InvalidTransparency("a[x]".to_string()))
        );
        assert_eq!(
            "a[]".parse::<LinkEntry>(),
            Err(LinkError::InvalidTransparency("a[]".to_string()))
        );
        assert_eq!(
            "a[101]".parse::<LinkEntry>(),
            Err(LinkError::TransparencyOutOfRange {
                token: "a[101]".to_string(),
                percent: 101
            })
        );
        assert!(
            matches!(
                "a[99999999999]".parse::<LinkEntry>(),
                Err(LinkError::InvalidTransparency(_))
            ),
            "overflow is not a number"
        );
    }

    #[test]
    fn param_splits_on_commas() {
        let entries = parse_layer_param("a,b[50],c").expect("valid param");
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(entries[1].opacity, 128, "127.5 rounds up");
        assert!(parse_layer_param("").expect("empty is fine").is_empty());
        assert!(parse_layer_param("a,,b").is_err(), "empty token");
        assert_eq!(format_layer_param(&entries), "a,b[50],c");
    }

    #[test]
    fn visibility_suffixes() {
        let entries = parse_layer_param("a!,b~,c[50]").expect("valid param");
        assert_eq!(
            entries,
            [
                LinkEntry::new("a", 255).with_visibility(LinkVisibility::Hidden),
                LinkEntry::new("b", 255).with_visibility(LinkVisibility::Partial),
                LinkEntry::new("c", 128),
            ]
        );
        let entry: LinkEntry = "d[25]!".parse().expect("suffix after bracket");
        assert_eq!(entry.opacity, 191);
        assert_eq!(entry.visibility, LinkVisibility::Hidden);
        assert_eq!(entry.to_string(), "d[25]!");
        assert_eq!(
            "!".parse::<LinkEntry>(),
            Err(LinkError::EmptyName("!".to_string())),
            "suffix alone has no name"
        );
    }

    #[test]
    fn encode_marks_hidden_and_honors_reversal() {
        let mut ids = SequentialIds::new();
        let a = LayerNode::leaf("a", &mut ids).with_opacity(191);
        let b = LayerNode::leaf("b", &mut ids).with_visibility(false);
        let c = LayerNode::leaf("c", &mut ids);
        let d = LayerNode::leaf("d", &mut ids);
        let hidden = LayerNode::group("hidden", vec![d], &mut ids).with_visibility(false);
        let root = LayerNode::group("root", vec![a, b, c, hidden], &mut ids);

        let config = ViewerConfig::default();
        assert_eq!(encode_link_param(&root, &config), "a[25],b!,c,d~");

        let reversed = ViewerConfig {
            url_reverse_layer_order: true,
            ..ViewerConfig::default()
        };
        assert_eq!(encode_link_param(&root, &reversed), "d~,c,b!,a[25]");
        let decoded = decode_link_param("c,a[25]", &reversed).expect("valid param");
        assert_eq!(decoded, [LinkEntry::new("a", 191), LinkEntry::new("c", 255)]);
    }

    #[test]
    fn hidden_root_marks_every_leaf() {
        let mut ids = SequentialIds::new();
        let a = LayerNode::leaf("a", &mut ids);
        let b = LayerNode::leaf("b", &mut ids).with_visibility(false);
        let root = LayerNode::group("root", vec![a, b], &mut ids).with_visibility(false);
        assert_eq!(encode_link_param(&root, &ViewerConfig::default()), "a~,b!");

        let solo = LayerNode::leaf("solo", &mut ids).with_visibility(false);
        assert_eq!(encode_link_param(&solo, &ViewerConfig::default()), "solo!");
    }
}
