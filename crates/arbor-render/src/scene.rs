#![forbid(unsafe_code)]

//! Scene graph handed to the host.
//!
//! A [`Scene`] is a flat snapshot: one transform for pan/zoom, a link layer
//! and a node layer, every element carrying its current interpolated
//! attributes. Hosts composite it however they like; [`crate::svg`] turns it
//! into an SVG document.

use arbor_core::geometry::{Point, Transform, ViewBox};
use arbor_layout::NodeId;

use crate::path::LinkPath;
use crate::style::{GlyphShape, Rgb};

/// Average glyph advance as a fraction of the font size, used to estimate
/// label boxes for hit testing.
const LABEL_ADVANCE: f64 = 0.6;

/// Serial number of one visual element instance.
///
/// Two elements with the same key but different serials are different
/// instances: the old one was destroyed and a new one created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) u64);

impl ElementId {
    /// Raw serial.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Where an element is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Newly visible, growing out of the anchor.
    Entering,
    /// Visible before and after, moving to its new position.
    Updating,
    /// No longer visible, shrinking into the anchor; removed when done.
    Exiting,
    /// At rest.
    Settled,
}

/// Horizontal label alignment relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    Start,
    End,
}

impl TextAnchor {
    /// SVG `text-anchor` value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

/// Node label.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    /// Horizontal offset from the node position.
    pub dx: f64,
    /// Vertical offset in ems, centring the text on the row.
    pub dy_em: f64,
    pub anchor: TextAnchor,
    pub halo: Rgb,
    pub halo_width: f64,
}

/// One node as drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeElement {
    pub key: NodeId,
    pub element: ElementId,
    pub phase: Phase,
    /// Scene-space position of the glyph anchor.
    pub position: Point,
    /// Fill and stroke opacity.
    pub opacity: f64,
    pub glyph: GlyphShape,
    pub fill: Rgb,
    /// Whether the node has children, shown or hidden.
    pub expandable: bool,
    pub label: Label,
}

/// One parent-to-child connector as drawn, keyed by the child.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkElement {
    pub key: NodeId,
    pub element: ElementId,
    pub phase: Phase,
    pub source: Point,
    pub target: Point,
    pub path: LinkPath,
}

/// Shared stroke settings of the link layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkLayer {
    pub stroke: Rgb,
    pub opacity: f64,
    pub width: f64,
}

/// Everything the host needs to paint one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Surface width in pixels.
    pub width: f64,
    /// Surface height in pixels.
    pub height: f64,
    pub view_box: ViewBox,
    /// Pan/zoom transform wrapping both layers.
    pub transform: Transform,
    pub font_size: f64,
    /// Invisible stroke width around glyphs that still catches the pointer.
    pub hit_stroke_width: f64,
    pub link_layer: LinkLayer,
    /// Links in paint order.
    pub links: Vec<LinkElement>,
    /// Nodes in paint order (last is on top).
    pub nodes: Vec<NodeElement>,
}

impl Scene {
    /// Node element by key.
    #[must_use]
    pub fn node(&self, key: NodeId) -> Option<&NodeElement> {
        self.nodes.iter().find(|n| n.key == key)
    }

    /// Link element by child key.
    #[must_use]
    pub fn link(&self, key: NodeId) -> Option<&LinkElement> {
        self.links.iter().find(|l| l.key == key)
    }

    /// Keys of nodes that are not on their way out, in ascending order.
    #[must_use]
    pub fn present_keys(&self) -> Vec<NodeId> {
        let mut keys: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|n| n.phase != Phase::Exiting)
            .map(|n| n.key)
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Topmost non-exiting node whose glyph or label contains `point`, given
    /// in content space (inside the pan/zoom transform).
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<NodeId> {
        let slop = self.hit_stroke_width / 2.0;
        self.nodes
            .iter()
            .rev()
            .filter(|n| n.phase != Phase::Exiting)
            .find(|n| glyph_contains(n, point, slop) || self.label_contains(n, point))
            .map(|n| n.key)
    }

    fn label_contains(&self, node: &NodeElement, point: Point) -> bool {
        let width = node.label.text.chars().count() as f64 * self.font_size * LABEL_ADVANCE;
        let x0 = node.position.x + node.label.dx;
        let (left, right) = match node.label.anchor {
            TextAnchor::Start => (x0, x0 + width),
            TextAnchor::End => (x0 - width, x0),
        };
        let half = self.font_size / 2.0;
        (left..=right).contains(&point.x)
            && (node.position.y - half..=node.position.y + half).contains(&point.y)
    }
}

fn glyph_contains(node: &NodeElement, point: Point, slop: f64) -> bool {
    match node.glyph {
        GlyphShape::Circle { radius } => node.position.distance(point) <= radius + slop,
        GlyphShape::Box { width, height } => {
            let p = node.position;
            (p.x - slop..=p.x + width + slop).contains(&point.x)
                && (p.y - height / 2.0 - slop..=p.y + height / 2.0 + slop).contains(&point.y)
        }
    }
}
