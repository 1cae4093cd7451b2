#![forbid(unsafe_code)]

//! Scene graph, link paths, viewport framing and reconciliation.
//!
//! [`Reconciler`] owns everything that changes over time: which elements
//! exist, where they are heading and how far along they are. Each call to
//! [`Reconciler::scene`] produces an immutable [`Scene`] for the host.

pub mod path;
pub mod reconcile;
pub mod scene;
pub mod style;
pub mod svg;
pub mod viewport;

pub use path::{LinkPath, LinkShape, PathCommand};
pub use reconcile::{Reconciler, RenderReport};
pub use scene::{ElementId, Label, LinkElement, LinkLayer, NodeElement, Phase, Scene, TextAnchor};
pub use style::{GlyphShape, RenderStyle, Rgb, TransitionTiming};
pub use svg::SvgExporter;
pub use viewport::{Frame, Viewport};
