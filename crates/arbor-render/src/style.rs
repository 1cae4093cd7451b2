#![forbid(unsafe_code)]

//! Visual styling and transition timing.

use std::fmt;
use std::time::Duration;

use arbor_core::animation::{EasingFn, ease_in_out_cubic};
use arbor_core::event::Modifiers;

use crate::path::LinkShape;

/// Opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Self = Self::new(0xff, 0xff, 0xff);
    pub const DARK_GREY: Self = Self::new(0x55, 0x55, 0x55);
    pub const LIGHT_GREY: Self = Self::new(0x99, 0x99, 0x99);

    /// Create a color from components.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Node glyph shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GlyphShape {
    /// Dot centred on the node position.
    Circle { radius: f64 },
    /// Rectangle starting at the node position and extending right, centred
    /// vertically on the row.
    Box { width: f64, height: f64 },
}

impl Default for GlyphShape {
    fn default() -> Self {
        Self::Circle { radius: 2.5 }
    }
}

/// Everything about how the scene looks, none of it about where things are.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    pub link_shape: LinkShape,
    pub glyph: GlyphShape,
    /// Fill for nodes that have children (shown or hidden).
    pub expandable_fill: Rgb,
    /// Fill for leaves.
    pub leaf_fill: Rgb,
    pub link_stroke: Rgb,
    pub link_opacity: f64,
    pub link_width: f64,
    /// Horizontal gap between the glyph centre and the label.
    pub label_offset: f64,
    pub halo_color: Rgb,
    pub halo_width: f64,
    /// Invisible stroke around the glyph that still catches the pointer.
    pub hit_stroke_width: f64,
    pub font_size: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            link_shape: LinkShape::default(),
            glyph: GlyphShape::default(),
            expandable_fill: Rgb::DARK_GREY,
            leaf_fill: Rgb::LIGHT_GREY,
            link_stroke: Rgb::DARK_GREY,
            link_opacity: 0.4,
            link_width: 1.5,
            label_offset: 6.0,
            halo_color: Rgb::WHITE,
            halo_width: 3.0,
            hit_stroke_width: 10.0,
            font_size: 10.0,
        }
    }
}

impl RenderStyle {
    /// Boxed-label look: rectangular glyphs with links leaving the box's
    /// right edge.
    #[must_use]
    pub fn boxed(box_width: f64, box_height: f64) -> Self {
        Self {
            link_shape: LinkShape::Boxed { box_width },
            glyph: GlyphShape::Box {
                width: box_width,
                height: box_height,
            },
            ..Self::default()
        }
    }

    /// Set the link shape.
    #[must_use]
    pub fn with_link_shape(mut self, shape: LinkShape) -> Self {
        self.link_shape = shape;
        self
    }

    /// Set the glyph shape.
    #[must_use]
    pub fn with_glyph(mut self, glyph: GlyphShape) -> Self {
        self.glyph = glyph;
        self
    }
}

/// How long transitions take.
#[derive(Debug, Clone, Copy)]
pub struct TransitionTiming {
    pub fast: Duration,
    pub slow: Duration,
    /// Any of these keys held on the triggering interaction selects `slow`.
    pub slow_modifier: Modifiers,
    pub easing: EasingFn,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            fast: Duration::from_millis(250),
            slow: Duration::from_millis(2500),
            slow_modifier: Modifiers::ALT,
            easing: ease_in_out_cubic,
        }
    }
}

impl TransitionTiming {
    /// Duration for an interaction carrying `modifiers`.
    #[must_use]
    pub fn duration_for(&self, modifiers: Modifiers) -> Duration {
        if modifiers.intersects(self.slow_modifier) {
            self.slow
        } else {
            self.fast
        }
    }

    /// Set both durations.
    #[must_use]
    pub fn with_durations(mut self, fast: Duration, slow: Duration) -> Self {
        self.fast = fast;
        self.slow = slow;
        self
    }

    /// Set the easing curve.
    #[must_use]
    pub fn with_easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }
}
