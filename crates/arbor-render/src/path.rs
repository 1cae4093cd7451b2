#![forbid(unsafe_code)]

//! Link connector geometry.
//!
//! Links run left to right from a parent to a child. All points here are in
//! scene space (horizontal = column, vertical = row).

use std::fmt;

use arbor_core::geometry::Point;

/// Connector style between a parent and a child.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LinkShape {
    /// Horizontal cubic Bézier: both control points sit at the horizontal
    /// midpoint, one on each endpoint's row.
    #[default]
    Curve,
    /// Like `Curve`, but the connector leaves from the right edge of a box of
    /// `box_width` drawn at the parent.
    Boxed { box_width: f64 },
    /// Straight stubs of `offset` at both ends joined by a curve.
    Elbow { offset: f64 },
}

impl LinkShape {
    /// Path from `source` (parent) to `target` (child).
    #[must_use]
    pub fn path(&self, source: Point, target: Point) -> LinkPath {
        match *self {
            Self::Curve => LinkPath::horizontal_curve(source, target),
            Self::Boxed { box_width } => {
                LinkPath::horizontal_curve(source.offset(box_width, 0.0), target)
            }
            Self::Elbow { offset } => {
                let start = source.offset(offset, 0.0);
                let end = target.offset(-offset, 0.0);
                let mut path = LinkPath::horizontal_curve(start, end);
                path.commands.insert(0, PathCommand::MoveTo(source));
                path.commands[1] = PathCommand::LineTo(start);
                path.commands.push(PathCommand::LineTo(target));
                path
            }
        }
    }
}

/// One drawing instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    /// Cubic Bézier through two control points to an end point.
    CubicTo(Point, Point, Point),
}

/// A connector as a list of commands; `Display` yields SVG path data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinkPath {
    pub commands: Vec<PathCommand>,
}

impl LinkPath {
    /// Horizontal link from `s` to `t`.
    #[must_use]
    pub fn horizontal_curve(s: Point, t: Point) -> Self {
        let mid = (s.x + t.x) / 2.0;
        Self {
            commands: vec![
                PathCommand::MoveTo(s),
                PathCommand::CubicTo(Point::new(mid, s.y), Point::new(mid, t.y), t),
            ],
        }
    }

    /// First point of the path.
    #[must_use]
    pub fn start(&self) -> Option<Point> {
        self.commands.first().map(|c| c.end())
    }

    /// Last point of the path.
    #[must_use]
    pub fn end(&self) -> Option<Point> {
        self.commands.last().map(|c| c.end())
    }
}

impl PathCommand {
    /// Where the pen is after this command.
    #[must_use]
    pub fn end(&self) -> Point {
        match *self {
            Self::MoveTo(p) | Self::LineTo(p) | Self::CubicTo(_, _, p) => p,
        }
    }
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MoveTo(p) => write!(f, "M{},{}", p.x, p.y),
            Self::LineTo(p) => write!(f, "L{},{}", p.x, p.y),
            Self::CubicTo(c1, c2, p) => {
                write!(f, "C{},{},{},{},{},{}", c1.x, c1.y, c2.x, c2.y, p.x, p.y)
            }
        }
    }
}

impl fmt::Display for LinkPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for command in &self.commands {
            write!(f, "{command}")?;
        }
        Ok(())
    }
}
