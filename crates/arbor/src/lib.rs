#![forbid(unsafe_code)]

//! Arbor public facade crate.
//!
//! Re-exports the types a host needs to mount and drive a collapsible tree
//! diagram, plus a prelude for day-to-day usage.
//!
//! ```ignore
//! use arbor::prelude::*;
//!
//! let mut viewer = arbor::load_json(json, Size::new(928.0, 600.0), ViewerConfig::default())?;
//! viewer.push_event(PointerEvent::click(40.0, 10.0).into());
//! viewer.step()?;
//! let svg = viewer.svg(&SvgExporter::default());
//! ```

// --- Core re-exports -------------------------------------------------------

pub use arbor_core::animation::EasingFn;
pub use arbor_core::error::{ArborError, HierarchyFault};
pub use arbor_core::event::{
    Event, Modifiers, PinchEvent, PointerButton, PointerEvent, PointerEventKind, WheelDeltaMode,
    WheelEvent,
};
pub use arbor_core::geometry::{Margins, Point, Size, Transform, ViewBox};

// --- Layout re-exports -----------------------------------------------------

pub use arbor_layout::{
    Expansion, ExpansionPolicy, FlatHierarchy, HierarchySource, LayoutConfig, NodeId,
    SourceRecord, ToggleOutcome, Tree, TreeNode,
};

// --- Render re-exports -----------------------------------------------------

pub use arbor_render::{
    GlyphShape, LinkShape, Phase, RenderStyle, Rgb, Scene, SvgExporter, TransitionTiming,
};

// --- Viewer re-exports -----------------------------------------------------

pub use arbor_web::{
    EventResponse, FrameOutput, HostCapabilities, StepResult, ToggleTrigger, TreeViewer,
    ViewerConfig, ZoomConfig,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for arbor hosts.
pub type Error = ArborError;

/// Standard result type for arbor APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Parse a JSON hierarchy and mount a viewer on `container`.
pub fn load_json(json: &str, container: Size, config: ViewerConfig) -> Result<TreeViewer> {
    let record = SourceRecord::from_json_str(json)?;
    TreeViewer::mount(&record, Some(container), config)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Error, Event, ExpansionPolicy, Modifiers, NodeId, PointerEvent, Result, Size,
        SourceRecord, SvgExporter, TreeViewer, ViewerConfig, WheelEvent,
    };

    pub use crate::{core, layout, render, web};
}

pub use arbor_core as core;
pub use arbor_layout as layout;
pub use arbor_render as render;
pub use arbor_web as web;

#[cfg(test)]
mod tests {
    use super::*;

    const FLARE: &str = r#"{
        "name": "flare",
        "children": [
            {"name": "analytics", "children": [{"name": "cluster", "value": 3}]},
            {"name": "animate", "children": []},
            {"name": "data"}
        ]
    }"#;

    #[test]
    fn load_json_mounts() {
        let mut viewer = load_json(FLARE, Size::new(928.0, 600.0), ViewerConfig::default()).unwrap();
        assert_eq!(viewer.tree().len(), 5);
        // Root open, "analytics" closed.
        assert_eq!(viewer.frame().scene.present_keys().len(), 4);
    }

    #[test]
    fn load_json_reports_parse_errors() {
        let err = load_json("{\"name\": ", Size::new(928.0, 600.0), ViewerConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSource { line: 1, .. }));
    }

    #[test]
    fn load_json_requires_container() {
        let err = load_json(FLARE, Size::new(928.0, -1.0), ViewerConfig::default()).unwrap_err();
        assert!(matches!(err, Error::MissingContainer { .. }));
    }
}
