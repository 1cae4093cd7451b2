#![forbid(unsafe_code)]

//! Viewport framing.
//!
//! The drawing surface is always as wide as the container. Its height and
//! view box track the row extent of the visible nodes plus margins, so the
//! frame grows and shrinks with the content while the pan/zoom transform,
//! applied inside it, is left alone.

use arbor_core::animation::Interpolate;
use arbor_core::geometry::{Extent, Margins, Size, ViewBox};

/// Container width and margins, fixed at mount time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub margins: Margins,
}

impl Viewport {
    /// Create a viewport.
    #[must_use]
    pub fn new(width: f64, margins: Margins) -> Self {
        Self { width, margins }
    }

    /// Width left for columns once the side margins are taken off.
    #[must_use]
    pub fn available_width(&self) -> f64 {
        self.width - self.margins.horizontal_sum()
    }

    /// Frame enclosing `extent`.
    #[must_use]
    pub fn frame_for(&self, extent: Extent) -> Frame {
        let height = extent.span() + self.margins.vertical_sum();
        Frame {
            height,
            view_box: ViewBox::new(
                -self.margins.left,
                extent.min - self.margins.top,
                self.width,
                height,
            ),
        }
    }

    /// Frame shown before the first layout pass: one row tall.
    #[must_use]
    pub fn initial_frame(&self, row_height: f64) -> Frame {
        Frame {
            height: row_height,
            view_box: ViewBox::new(-self.margins.left, -self.margins.top, self.width, row_height),
        }
    }
}

/// Surface height plus the user-space rectangle mapped onto it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub height: f64,
    pub view_box: ViewBox,
}

impl Frame {
    /// Surface size for a given width.
    #[must_use]
    pub fn size(&self, width: f64) -> Size {
        Size::new(width, self.height)
    }
}

impl Interpolate for Frame {
    fn interpolate(self, to: Self, t: f64) -> Self {
        Self {
            height: self.height.interpolate(to.height, t),
            view_box: self.view_box.interpolate(to.view_box, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_wraps_extent_with_margins() {
        let viewport = Viewport::new(800.0, Margins::default());
        let frame = viewport.frame_for(Extent { min: -40.0, max: 60.0 });
        assert_eq!(frame.height, 120.0);
        assert_eq!(frame.view_box, ViewBox::new(-40.0, -50.0, 800.0, 120.0));
        assert_eq!(frame.size(800.0), Size::new(800.0, 120.0));
    }

    #[test]
    fn initial_frame_is_one_row() {
        let viewport = Viewport::new(640.0, Margins::default());
        let frame = viewport.initial_frame(20.0);
        assert_eq!(frame.view_box, ViewBox::new(-40.0, -10.0, 640.0, 20.0));
        assert_eq!(viewport.available_width(), 590.0);
    }

    #[test]
    fn single_node_frame() {
        let viewport = Viewport::new(300.0, Margins::all(5.0));
        let frame = viewport.frame_for(Extent::point(0.0));
        assert_eq!(frame.height, 10.0);
        assert_eq!(frame.view_box.min_y, -5.0);
    }
}
