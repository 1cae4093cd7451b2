#![forbid(unsafe_code)]

//! SVG export.
//!
//! Serialises a [`Scene`] into a standalone SVG document:
//!
//! ```text
//! <svg viewBox=..>
//!   <g transform=pan/zoom>
//!     <g link layer>  <path/>*  </g>
//!     <g node layer>  <g><glyph/><text/></g>*  </g>
//!   </g>
//! </svg>
//! ```

use std::fmt::Write;

use crate::scene::{Phase, Scene};
use crate::style::GlyphShape;

/// Configuration for SVG export.
#[derive(Debug, Clone)]
pub struct SvgExporter {
    /// Font family for labels.
    pub font_family: String,
    /// Emit `data-key`/`data-phase` attributes on node groups.
    pub data_attributes: bool,
}

impl Default for SvgExporter {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".into(),
            data_attributes: false,
        }
    }
}

impl SvgExporter {
    /// Export a scene to an SVG string.
    pub fn export(&self, scene: &Scene) -> String {
        let mut out = String::with_capacity(256 + scene.nodes.len() * 240);
        let vb = scene.view_box;

        let _ = write!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" \
             width=\"{}\" height=\"{}\" viewBox=\"{} {} {} {}\" \
             style=\"max-width: 100%; height: auto; font: {}px ",
            scene.width,
            scene.height,
            vb.min_x,
            vb.min_y,
            vb.width,
            vb.height,
            scene.font_size,
        );
        svg_escape_into(&mut out, &self.font_family);
        out.push_str("; user-select: none;\">");

        let _ = write!(out, "<g transform=\"{}\">", scene.transform.to_svg());

        let layer = scene.link_layer;
        let _ = write!(
            out,
            "<g fill=\"none\" stroke=\"{}\" stroke-opacity=\"{}\" stroke-width=\"{}\">",
            layer.stroke, layer.opacity, layer.width
        );
        for link in &scene.links {
            let _ = write!(out, "<path d=\"{}\"/>", link.path);
        }
        out.push_str("</g>");

        out.push_str("<g cursor=\"pointer\" pointer-events=\"all\">");
        for node in &scene.nodes {
            let _ = write!(
                out,
                "<g transform=\"translate({},{})\" fill-opacity=\"{}\" stroke-opacity=\"{}\"",
                node.position.x, node.position.y, node.opacity, node.opacity
            );
            if self.data_attributes {
                let _ = write!(
                    out,
                    " data-key=\"{}\" data-phase=\"{}\"",
                    node.key.index(),
                    phase_name(node.phase)
                );
            }
            out.push('>');

            match node.glyph {
                GlyphShape::Circle { radius } => {
                    let _ = write!(
                        out,
                        "<circle r=\"{radius}\" fill=\"{}\" stroke-width=\"{}\"/>",
                        node.fill, scene.hit_stroke_width
                    );
                }
                GlyphShape::Box { width, height } => {
                    let _ = write!(
                        out,
                        "<rect width=\"{width}\" height=\"{height}\" y=\"{}\" fill=\"{}\"/>",
                        -height / 2.0,
                        node.fill
                    );
                }
            }

            let label = &node.label;
            let _ = write!(
                out,
                "<text dy=\"{}em\" x=\"{}\" text-anchor=\"{}\" stroke-linejoin=\"round\" \
                 stroke-width=\"{}\" stroke=\"{}\" paint-order=\"stroke\">",
                label.dy_em,
                label.dx,
                label.anchor.as_str(),
                label.halo_width,
                label.halo
            );
            svg_escape_into(&mut out, &label.text);
            out.push_str("</text></g>");
        }
        out.push_str("</g></g></svg>");
        out
    }
}

fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::Entering => "enter",
        Phase::Updating => "update",
        Phase::Exiting => "exit",
        Phase::Settled => "settled",
    }
}

/// SVG-escape a string into the output buffer.
fn svg_escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::LinkShape;
    use crate::scene::{ElementId, Label, LinkElement, LinkLayer, NodeElement, TextAnchor};
    use crate::style::Rgb;
    use arbor_core::geometry::{Point, Transform, ViewBox};
    use arbor_layout::NodeId;

    fn scene() -> Scene {
        let source = Point::new(0.0, 0.0);
        let target = Point::new(100.0, 20.0);
        Scene {
            width: 400.0,
            height: 40.0,
            view_box: ViewBox::new(-40.0, -10.0, 400.0, 40.0),
            transform: Transform::new(1.5, 3.0, 4.0),
            font_size: 10.0,
            hit_stroke_width: 10.0,
            link_layer: LinkLayer {
                stroke: Rgb::DARK_GREY,
                opacity: 0.4,
                width: 1.5,
            },
            links: vec![LinkElement {
                key: NodeId::new(1),
                element: ElementId(1),
                phase: Phase::Settled,
                source,
                target,
                path: LinkShape::Curve.path(source, target),
            }],
            nodes: vec![NodeElement {
                key: NodeId::new(1),
                element: ElementId(0),
                phase: Phase::Settled,
                position: target,
                opacity: 1.0,
                glyph: GlyphShape::Circle { radius: 2.5 },
                fill: Rgb::LIGHT_GREY,
                expandable: false,
                label: Label {
                    text: "a<b & c>".into(),
                    dx: 6.0,
                    dy_em: 0.31,
                    anchor: TextAnchor::Start,
                    halo: Rgb::WHITE,
                    halo_width: 3.0,
                },
            }],
        }
    }

    #[test]
    fn svg_basic_structure() {
        let svg = SvgExporter::default().export(&scene());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("xmlns"));
        assert!(svg.contains("viewBox=\"-40 -10 400 40\""));
        assert!(svg.contains("<g transform=\"translate(3,4) scale(1.5)\">"));
    }

    #[test]
    fn svg_link_layer() {
        let svg = SvgExporter::default().export(&scene());
        assert!(svg.contains("stroke=\"#555555\" stroke-opacity=\"0.4\" stroke-width=\"1.5\""));
        assert!(svg.contains("<path d=\"M0,0C50,0,50,20,100,20\"/>"));
    }

    #[test]
    fn svg_node_group() {
        let svg = SvgExporter::default().export(&scene());
        assert!(svg.contains("translate(100,20)"));
        assert!(svg.contains("<circle r=\"2.5\" fill=\"#999999\" stroke-width=\"10\"/>"));
        assert!(svg.contains("text-anchor=\"start\""));
        assert!(!svg.contains("data-key"));
    }

    #[test]
    fn svg_escapes_labels() {
        let svg = SvgExporter::default().export(&scene());
        assert!(svg.contains(">a&lt;b &amp; c&gt;</text>"));
    }

    #[test]
    fn svg_escapes_font_family() {
        let exporter = SvgExporter {
            font_family: "a\"b<c".into(),
            ..SvgExporter::default()
        };
        let svg = exporter.export(&scene());
        assert!(svg.contains("px a&quot;b&lt;c; user-select: none;\">"));
        assert!(!svg.contains("a\"b"));

        let plain = SvgExporter::default().export(&scene());
        assert!(plain.contains("px sans-serif; user-select: none;\">"));
    }

    #[test]
    fn svg_data_attributes() {
        let exporter = SvgExporter {
            data_attributes: true,
            ..SvgExporter::default()
        };
        let svg = exporter.export(&scene());
        assert!(svg.contains("data-key=\"1\" data-phase=\"settled\""));
    }

    #[test]
    fn svg_box_glyph() {
        let mut s = scene();
        s.nodes[0].glyph = GlyphShape::Box {
            width: 3.0,
            height: 1.0,
        };
        let svg = SvgExporter::default().export(&s);
        assert!(svg.contains("<rect width=\"3\" height=\"1\" y=\"-0.5\""));
    }
}
