#![forbid(unsafe_code)]

//! Host-driven tree viewer.
//!
//! [`TreeViewer`] ties the tree, the reconciler and the pan/zoom controller to
//! a container handed over by the host. The host owns the loop:
//!
//! 1. [`TreeViewer::mount`] once, with the container size read at start.
//! 2. Push input via [`TreeViewer::push_event`].
//! 3. Advance time via [`TreeViewer::advance_time`].
//! 4. Call [`TreeViewer::step`] to run the transition up to now and then
//!    dispatch the queued events.
//! 5. Read the frame via [`TreeViewer::frame`] and paint it.
//!
//! # Example
//!
//! ```ignore
//! use arbor_web::{TreeViewer, ViewerConfig};
//! use arbor_core::event::PointerEvent;
//! use arbor_core::geometry::Size;
//! use std::time::Duration;
//!
//! let mut viewer = TreeViewer::mount(&record, Some(Size::new(928.0, 600.0)), ViewerConfig::default())?;
//!
//! viewer.push_event(PointerEvent::click(40.0, 10.0).into());
//! viewer.advance_time(Duration::from_millis(16));
//! let result = viewer.step()?;
//! if result.toggled > 0 || result.animating {
//!     let frame = viewer.frame();
//!     // Hand frame.scene to the compositor...
//! }
//! ```
//!
//! Only pan/zoom gestures change the transform. Expanding or collapsing a node
//! moves the frame to fit the new content but leaves the transform exactly as
//! the user left it.

use std::time::Duration;

use arbor_core::error::{ArborError, Result};
use arbor_core::event::{Event, Modifiers, PointerButton, PointerEventKind};
use arbor_core::geometry::{Point, Size, Transform};
use arbor_layout::{HierarchySource, NodeId, TidyLayout, ToggleOutcome, Tree};
use arbor_render::{Frame, Reconciler, Scene, SvgExporter, Viewport};

use crate::config::{HostCapabilities, ToggleTrigger, ViewerConfig};
use crate::zoom::ZoomController;
use crate::{DeterministicClock, EventQueue};

/// Result of a single [`TreeViewer::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepResult {
    /// Number of events processed during this step.
    pub events_processed: u32,
    /// Number of those events that changed a node's expansion.
    pub toggled: u32,
    /// Whether any of those events moved the pan/zoom transform.
    pub zoom_changed: bool,
    /// Whether a transition is still running after this step.
    pub animating: bool,
    /// Current frame index (monotonically increasing).
    pub frame_idx: u64,
}

/// What the viewer did with one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventResponse {
    /// The host should cancel its default handling (context menu, page
    /// scroll).
    pub prevent_default: bool,
    /// The node whose expansion changed, if any.
    pub toggled: Option<NodeId>,
    /// The pan/zoom transform moved.
    pub zoom_changed: bool,
}

/// One frame for the host.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub scene: Scene,
    /// Surface size or view box differ from the previously delivered frame.
    /// Only raised for hosts that do not animate the viewport themselves.
    pub viewport_changed: bool,
}

/// A mounted, interactive tree diagram.
#[derive(Debug, Clone)]
pub struct TreeViewer {
    tree: Tree,
    reconciler: Reconciler,
    zoom: ZoomController,
    trigger: ToggleTrigger,
    capabilities: HostCapabilities,
    container: Size,
    clock: DeterministicClock,
    ticked_at: Duration,
    events: EventQueue,
    frame_idx: u64,
    delivered: Option<Frame>,
}

impl TreeViewer {
    /// Build the tree from `source`, lay it out for `container` and render the
    /// initial state without animation.
    ///
    /// The container is read once; later resizes are not observed. A missing
    /// container, one without a positive finite size, or one no wider than
    /// the horizontal margins is rejected with
    /// [`ArborError::MissingContainer`] and nothing is rendered. A zoom scale
    /// extent outside `0 < min <= max` is rejected with
    /// [`ArborError::InvalidConfig`].
    pub fn mount<S: HierarchySource + ?Sized>(
        source: &S,
        container: Option<Size>,
        config: ViewerConfig,
    ) -> Result<Self> {
        let container = match container {
            Some(size) if size.is_measurable() => size,
            other => {
                let err = ArborError::MissingContainer {
                    width: other.map(|size| size.width),
                    height: other.map(|size| size.height),
                };
                arbor_core::error!(error = %err, "mount failed");
                return Err(err);
            }
        };

        let ViewerConfig {
            layout,
            expansion,
            margins,
            style,
            timing,
            zoom,
            trigger,
            capabilities,
        } = config;

        if let Err(err) = zoom.validate() {
            arbor_core::error!(error = %err, "mount failed");
            return Err(err);
        }

        let viewport = Viewport::new(container.width, margins);
        let available = viewport.available_width();
        if available.is_nan() || available <= 0.0 {
            let err = ArborError::MissingContainer {
                width: Some(container.width),
                height: Some(container.height),
            };
            arbor_core::error!(
                error = %err,
                margins = margins.horizontal_sum(),
                "mount failed"
            );
            return Err(err);
        }

        let mut tree = Tree::build(source, &expansion)?;
        let layout = TidyLayout::for_width(layout, available, &tree);
        let mut reconciler = Reconciler::new(layout, viewport)
            .with_style(style)
            .with_timing(timing);
        let root = tree.root();
        reconciler.render(&mut tree, root, None)?;

        arbor_core::info!(
            nodes = tree.len(),
            width = container.width,
            height = container.height,
            "viewer mounted"
        );

        Ok(Self {
            tree,
            reconciler,
            zoom: ZoomController::new(zoom),
            trigger,
            capabilities,
            container,
            clock: DeterministicClock::new(),
            ticked_at: Duration::ZERO,
            events: EventQueue::new(),
            frame_idx: 0,
            delivered: None,
        })
    }

    // ------------------------------------------------------------------
    // Host loop
    // ------------------------------------------------------------------

    /// Queue an input event for the next [`step`](Self::step).
    pub fn push_event(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Advance the deterministic clock by `dt`.
    pub fn advance_time(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    /// Set the deterministic clock to an absolute time.
    pub fn set_time(&mut self, now: Duration) {
        self.clock.set(now);
    }

    /// Bring the running transition up to the clock, then dispatch every
    /// queued event in order.
    ///
    /// Transitions started by this step's events begin at the current time.
    /// If an event fails, the events after it stay queued.
    pub fn step(&mut self) -> Result<StepResult> {
        let now = self.clock.now();
        self.reconciler.tick(now.saturating_sub(self.ticked_at));
        self.ticked_at = now;

        let mut result = StepResult::default();
        while let Some(event) = self.events.pop() {
            let response = self.handle_event(event)?;
            result.events_processed += 1;
            result.toggled += u32::from(response.toggled.is_some());
            result.zoom_changed |= response.zoom_changed;
        }

        self.frame_idx += 1;
        result.animating = self.reconciler.is_animating();
        result.frame_idx = self.frame_idx;
        Ok(result)
    }

    /// Dispatch one event immediately.
    ///
    /// Pan/zoom sees every event first. A primary click (or double click,
    /// per [`ToggleTrigger`]) on a node toggles it unless it ended a drag. A
    /// context-menu gesture on a node asks the host to suppress its menu.
    pub fn handle_event(&mut self, event: Event) -> Result<EventResponse> {
        let frame = self.reconciler.current_frame();
        let surface = frame.size(self.reconciler.viewport().width);
        let zoom = self
            .zoom
            .handle(&event, |p| frame.view_box.surface_to_user(surface, p));

        let mut response = EventResponse {
            prevent_default: zoom.prevent_default,
            toggled: None,
            zoom_changed: zoom.changed,
        };
        let Event::Pointer(pointer) = event else {
            return Ok(response);
        };

        let toggles = match pointer.kind {
            PointerEventKind::Click(PointerButton::Primary) => {
                self.trigger == ToggleTrigger::Click && !zoom.suppressed_click
            }
            PointerEventKind::DoubleClick(PointerButton::Primary) => {
                self.trigger == ToggleTrigger::DoubleClick
            }
            PointerEventKind::ContextMenu => {
                response.prevent_default |= self.node_at(pointer.position).is_some();
                false
            }
            _ => false,
        };
        if !toggles {
            return Ok(response);
        }

        if let Some(id) = self.node_at(pointer.position)
            && self.toggle(id, pointer.modifiers)?.changed()
        {
            response.toggled = Some(id);
        }
        Ok(response)
    }

    // ------------------------------------------------------------------
    // Programmatic control
    // ------------------------------------------------------------------

    /// Toggle a node as if it had been clicked with `modifiers` held.
    pub fn toggle(&mut self, id: NodeId, modifiers: Modifiers) -> Result<ToggleOutcome> {
        let outcome = self.tree.toggle(id)?;
        if outcome.changed() {
            self.reconciler.render(&mut self.tree, id, Some(modifiers))?;
        }
        Ok(outcome)
    }

    /// Expand every node. Returns whether anything changed.
    pub fn expand_all(&mut self, modifiers: Modifiers) -> Result<bool> {
        let changed = self.tree.expand_all();
        self.rerender_from_root(changed, modifiers)
    }

    /// Collapse every node but the root. Returns whether anything changed.
    pub fn collapse_all(&mut self, modifiers: Modifiers) -> Result<bool> {
        let changed = self.tree.collapse_all();
        self.rerender_from_root(changed, modifiers)
    }

    fn rerender_from_root(&mut self, changed: bool, modifiers: Modifiers) -> Result<bool> {
        if changed {
            let root = self.tree.root();
            self.reconciler.render(&mut self.tree, root, Some(modifiers))?;
        }
        Ok(changed)
    }

    /// Return pan/zoom to the identity transform. Returns whether anything
    /// changed.
    pub fn reset_zoom(&mut self) -> bool {
        self.zoom.reset()
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    /// Snapshot of the current frame.
    pub fn frame(&mut self) -> FrameOutput {
        let current = self.reconciler.current_frame();
        let viewport_changed =
            !self.capabilities.animates_viewport && self.delivered != Some(current);
        self.delivered = Some(current);
        FrameOutput {
            scene: self.reconciler.scene(self.zoom.transform()),
            viewport_changed,
        }
    }

    /// Current frame serialised as an SVG document.
    #[must_use]
    pub fn svg(&self, exporter: &SvgExporter) -> String {
        exporter.export(&self.reconciler.scene(self.zoom.transform()))
    }

    /// Topmost node under a surface position, if any.
    #[must_use]
    pub fn node_at(&self, surface_point: Point) -> Option<NodeId> {
        let frame = self.reconciler.current_frame();
        let surface = frame.size(self.reconciler.viewport().width);
        let user = frame.view_box.surface_to_user(surface, surface_point);
        let transform = self.zoom.transform();
        self.reconciler
            .scene(transform)
            .hit_test(transform.invert(user))
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Current pan/zoom transform.
    #[must_use]
    pub fn transform(&self) -> Transform {
        self.zoom.transform()
    }

    /// The tree with its current expansion state and layout.
    #[must_use]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The reconciler driving transitions.
    #[must_use]
    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Container size read at mount time.
    #[must_use]
    pub fn container(&self) -> Size {
        self.container
    }

    /// The deterministic clock.
    #[must_use]
    pub fn clock(&self) -> &DeterministicClock {
        &self.clock
    }

    /// Whether a transition is running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.reconciler.is_animating()
    }

    /// Number of steps taken so far.
    #[must_use]
    pub fn frame_idx(&self) -> u64 {
        self.frame_idx
    }

    /// Number of events waiting for the next step.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::event::{PointerEvent, WheelEvent};
    use arbor_layout::{Expansion, ExpansionPolicy, SourceRecord};
    use arbor_render::Phase;
    use crate::config::ZoomConfig;
    use pretty_assertions::assert_eq;

    const CONTAINER: Size = Size::new(400.0, 300.0);

    fn pair() -> SourceRecord {
        SourceRecord::new("a").child(SourceRecord::new("b"))
    }

    fn five() -> SourceRecord {
        // a ─┬─ b ─┬─ c
        //    │     ├─ d
        //    │     └─ e
        SourceRecord::new("a").child(
            SourceRecord::new("b")
                .child(SourceRecord::new("c"))
                .child(SourceRecord::new("d"))
                .child(SourceRecord::new("e")),
        )
    }

    fn mount(source: &SourceRecord) -> TreeViewer {
        TreeViewer::mount(source, Some(CONTAINER), ViewerConfig::default()).unwrap()
    }

    /// Surface position of a node's glyph under the current frame and
    /// transform.
    fn surface_of(viewer: &TreeViewer, id: NodeId) -> Point {
        let frame = viewer.reconciler().current_frame();
        let content = viewer.reconciler().scene(Transform::IDENTITY).node(id).unwrap().position;
        let user = viewer.transform().apply(content);
        let scale = CONTAINER.width / frame.view_box.width;
        Point::new(
            (user.x - frame.view_box.min_x) * scale,
            (user.y - frame.view_box.min_y) * scale,
        )
    }

    fn click(viewer: &mut TreeViewer, id: NodeId) -> StepResult {
        let at = surface_of(viewer, id);
        viewer.push_event(PointerEvent::click(at.x, at.y).into());
        viewer.step().unwrap()
    }

    fn settle(viewer: &mut TreeViewer) {
        viewer.advance_time(Duration::from_secs(3));
        viewer.step().unwrap();
    }

    #[test]
    fn mount_requires_container() {
        let err = TreeViewer::mount(&pair(), None, ViewerConfig::default()).unwrap_err();
        assert_eq!(
            err,
            ArborError::MissingContainer {
                width: None,
                height: None
            }
        );

        let err = TreeViewer::mount(&pair(), Some(Size::new(0.0, 300.0)), ViewerConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            ArborError::MissingContainer {
                width: Some(0.0),
                height: Some(300.0)
            }
        );

        let nan = Size::new(f64::NAN, 300.0);
        assert!(TreeViewer::mount(&pair(), Some(nan), ViewerConfig::default()).is_err());
    }

    #[test]
    fn container_narrower_than_margins_is_rejected() {
        let chain = SourceRecord::new("a")
            .child(SourceRecord::new("b").child(SourceRecord::new("c")));
        let config = ViewerConfig::default().with_expansion(ExpansionPolicy::All);
        for width in [40.0, 50.0] {
            let err = TreeViewer::mount(&chain, Some(Size::new(width, 300.0)), config.clone())
                .unwrap_err();
            assert_eq!(
                err,
                ArborError::MissingContainer {
                    width: Some(width),
                    height: Some(300.0)
                }
            );
        }

        let viewer = TreeViewer::mount(&chain, Some(Size::new(51.0, 300.0)), config).unwrap();
        let scene = viewer.reconciler().scene(Transform::IDENTITY);
        let columns: Vec<f64> = (0..3)
            .map(|id| scene.node(NodeId::new(id)).unwrap().position.x)
            .collect();
        assert!(columns.windows(2).all(|w| w[0] < w[1]), "{columns:?}");
    }

    #[test]
    fn invalid_scale_extent_is_rejected_at_mount() {
        for (min, max) in [(4.0, 0.25), (0.0, 4.0), (f64::NAN, 4.0)] {
            let config = ViewerConfig::default()
                .with_zoom(ZoomConfig::default().with_scale_extent(min, max));
            let err = TreeViewer::mount(&pair(), Some(CONTAINER), config).unwrap_err();
            assert!(
                matches!(
                    err,
                    ArborError::InvalidConfig {
                        field: "scale_extent",
                        ..
                    }
                ),
                "{min}..={max}: {err}"
            );
        }
    }

    #[test]
    fn initial_render_is_immediate() {
        let mut viewer = mount(&pair());
        assert!(!viewer.is_animating());
        let frame = viewer.frame();
        assert_eq!(frame.scene.present_keys(), vec![NodeId::ROOT, NodeId::new(1)]);
        assert_eq!(frame.scene.links.len(), 1);
        assert!(frame.scene.nodes.iter().all(|n| n.phase == Phase::Settled));
        assert_eq!(frame.scene.transform, Transform::IDENTITY);
        assert!(!frame.viewport_changed);
    }

    #[test]
    fn collapsed_middle_hides_grandchildren() {
        let mut viewer = mount(&five());
        let scene = viewer.frame().scene;
        assert_eq!(scene.present_keys(), vec![NodeId::new(0), NodeId::new(1)]);
        assert_eq!(viewer.tree().state(NodeId::new(1)), Some(Expansion::Collapsed));
        for hidden in 2..5 {
            assert!(scene.node(NodeId::new(hidden)).is_none());
        }
    }

    #[test]
    fn click_toggles_and_child_grows_out_of_parent() {
        let mut viewer = mount(&pair());
        let a = NodeId::ROOT;
        let b = NodeId::new(1);

        let result = click(&mut viewer, a);
        assert_eq!(result.events_processed, 1);
        assert_eq!(result.toggled, 1);
        assert!(result.animating);
        assert_eq!(viewer.frame().scene.node(b).unwrap().phase, Phase::Exiting);
        settle(&mut viewer);
        assert_eq!(viewer.frame().scene.present_keys(), vec![a]);

        assert_eq!(click(&mut viewer, a).toggled, 1);
        let scene = viewer.frame().scene;
        let entering = scene.node(b).unwrap();
        assert_eq!(entering.phase, Phase::Entering);
        assert_eq!(entering.position, Point::ORIGIN);
        assert_eq!(entering.opacity, 0.0);

        viewer.advance_time(Duration::from_millis(250));
        let result = viewer.step().unwrap();
        assert!(!result.animating);

        let scene = viewer.frame().scene;
        let settled = scene.node(b).unwrap();
        assert_eq!(settled.phase, Phase::Settled);
        assert_eq!(settled.position, viewer.tree().node(b).unwrap().scene_position());
        // Column spacing is (400 - 50) / 2.
        assert_eq!(settled.position, Point::new(175.0, 0.0));
        assert_eq!(scene.link(b).unwrap().target, settled.position);
    }

    #[test]
    fn alt_click_is_slow() {
        let mut viewer = mount(&pair());
        let at = surface_of(&viewer, NodeId::ROOT);
        viewer.push_event(PointerEvent::click(at.x, at.y).with_modifiers(Modifiers::ALT).into());
        viewer.step().unwrap();

        viewer.advance_time(Duration::from_millis(250));
        assert!(viewer.step().unwrap().animating);
        viewer.advance_time(Duration::from_millis(2250));
        assert!(!viewer.step().unwrap().animating);
    }

    #[test]
    fn collapse_removes_descendants_after_transition() {
        let mut viewer = TreeViewer::mount(
            &five(),
            Some(CONTAINER),
            ViewerConfig::default().with_expansion(ExpansionPolicy::All),
        )
        .unwrap();
        assert_eq!(viewer.frame().scene.nodes.len(), 5);

        let b = NodeId::new(1);
        assert_eq!(click(&mut viewer, b).toggled, 1);
        let scene = viewer.frame().scene;
        assert_eq!(scene.nodes.len(), 5);
        assert_eq!(scene.present_keys(), vec![NodeId::new(0), b]);

        settle(&mut viewer);
        let scene = viewer.frame().scene;
        assert_eq!(scene.nodes.len(), 2);
        assert_eq!(scene.links.len(), 1);
    }

    #[test]
    fn leaf_click_changes_nothing() {
        let mut viewer = TreeViewer::mount(
            &pair(),
            Some(CONTAINER),
            ViewerConfig::default().with_expansion(ExpansionPolicy::All),
        )
        .unwrap();
        let before = viewer.frame().scene;
        let result = click(&mut viewer, NodeId::new(1));
        assert_eq!(result.toggled, 0);
        assert!(!result.animating);
        assert_eq!(viewer.frame().scene, before);
    }

    #[test]
    fn clicking_empty_space_does_nothing() {
        let mut viewer = mount(&pair());
        viewer.push_event(PointerEvent::click(390.0, 15.0).into());
        let result = viewer.step().unwrap();
        assert_eq!(result.events_processed, 1);
        assert_eq!(result.toggled, 0);
    }

    #[test]
    fn toggle_leaves_transform_alone() {
        let mut viewer = mount(&five());
        let primary = PointerButton::Primary;
        for event in [
            PointerEvent::new(PointerEventKind::Down(primary), 200.0, 10.0),
            PointerEvent::new(PointerEventKind::Move, 230.0, 40.0),
            PointerEvent::new(PointerEventKind::Up(primary), 230.0, 40.0),
            PointerEvent::click(230.0, 40.0),
        ] {
            viewer.push_event(event.into());
        }
        viewer.push_event(WheelEvent::new(230.0, 40.0, -120.0).into());
        let result = viewer.step().unwrap();
        assert_eq!(result.events_processed, 5);
        assert_eq!(result.toggled, 0);
        assert!(result.zoom_changed);

        let before = viewer.transform();
        assert_eq!(click(&mut viewer, NodeId::new(1)).toggled, 1);
        settle(&mut viewer);
        assert_eq!(click(&mut viewer, NodeId::new(1)).toggled, 1);
        settle(&mut viewer);

        let after = viewer.transform();
        assert_eq!(after.k.to_bits(), before.k.to_bits());
        assert_eq!(after.x.to_bits(), before.x.to_bits());
        assert_eq!(after.y.to_bits(), before.y.to_bits());
    }

    #[test]
    fn click_ending_a_drag_does_not_toggle() {
        let mut viewer = mount(&pair());
        let at = surface_of(&viewer, NodeId::ROOT);
        let primary = PointerButton::Primary;
        for event in [
            PointerEvent::new(PointerEventKind::Down(primary), at.x, at.y),
            PointerEvent::new(PointerEventKind::Move, at.x + 3.0, at.y),
            PointerEvent::new(PointerEventKind::Up(primary), at.x + 3.0, at.y),
            PointerEvent::click(at.x + 3.0, at.y),
        ] {
            viewer.push_event(event.into());
        }
        let result = viewer.step().unwrap();
        assert_eq!(result.toggled, 0);
        assert_eq!(viewer.tree().state(NodeId::ROOT), Some(Expansion::Expanded));
    }

    #[test]
    fn double_click_trigger() {
        let config = ViewerConfig::default().with_trigger(ToggleTrigger::DoubleClick);
        let mut viewer = TreeViewer::mount(&pair(), Some(CONTAINER), config).unwrap();
        let at = surface_of(&viewer, NodeId::ROOT);

        let response = viewer.handle_event(PointerEvent::click(at.x, at.y).into()).unwrap();
        assert_eq!(response.toggled, None);

        let response = viewer
            .handle_event(PointerEvent::double_click(at.x, at.y).into())
            .unwrap();
        assert_eq!(
            response,
            EventResponse {
                prevent_default: false,
                toggled: Some(NodeId::ROOT),
                zoom_changed: false,
            }
        );
        assert_eq!(viewer.transform(), Transform::IDENTITY);
    }

    #[test]
    fn context_menu_on_node_is_suppressed() {
        let mut viewer = mount(&pair());
        let at = surface_of(&viewer, NodeId::ROOT);
        let menu = |x, y| Event::from(PointerEvent::new(PointerEventKind::ContextMenu, x, y));

        let response = viewer.handle_event(menu(at.x, at.y)).unwrap();
        assert!(response.prevent_default);
        assert_eq!(response.toggled, None);

        let response = viewer.handle_event(menu(390.0, 15.0)).unwrap();
        assert!(!response.prevent_default);
    }

    #[test]
    fn programmatic_toggle() {
        let mut viewer = mount(&pair());
        assert_eq!(
            viewer.toggle(NodeId::ROOT, Modifiers::NONE).unwrap(),
            ToggleOutcome::Collapsed
        );
        assert!(viewer.is_animating());
        assert_eq!(
            viewer.toggle(NodeId::new(9), Modifiers::NONE).unwrap_err(),
            ArborError::UnknownNode(9)
        );
    }

    #[test]
    fn expand_and_collapse_all() {
        let mut viewer = mount(&five());
        assert!(viewer.expand_all(Modifiers::NONE).unwrap());
        assert!(!viewer.expand_all(Modifiers::NONE).unwrap());
        settle(&mut viewer);
        assert_eq!(viewer.frame().scene.nodes.len(), 5);

        assert!(viewer.collapse_all(Modifiers::NONE).unwrap());
        settle(&mut viewer);
        assert_eq!(viewer.frame().scene.present_keys(), vec![NodeId::new(0), NodeId::new(1)]);
    }

    #[test]
    fn viewport_changes_are_flagged_without_host_animation() {
        let config = ViewerConfig::default().with_capabilities(HostCapabilities {
            animates_viewport: false,
        });
        let mut viewer = TreeViewer::mount(&five(), Some(CONTAINER), config).unwrap();
        assert!(viewer.frame().viewport_changed);
        assert!(!viewer.frame().viewport_changed);

        viewer.expand_all(Modifiers::NONE).unwrap();
        viewer.advance_time(Duration::from_millis(100));
        viewer.step().unwrap();
        assert!(viewer.frame().viewport_changed);
        assert!(!viewer.frame().viewport_changed);
    }

    #[test]
    fn frame_grows_with_content() {
        let mut viewer = mount(&five());
        let collapsed = viewer.frame().scene.height;
        viewer.expand_all(Modifiers::NONE).unwrap();
        settle(&mut viewer);
        let expanded = viewer.frame().scene.height;
        // Three leaves stacked one row apart.
        assert_eq!(expanded - collapsed, 40.0);
    }

    #[test]
    fn steps_count_frames_and_keep_time() {
        let mut viewer = mount(&pair());
        assert_eq!(viewer.step().unwrap().frame_idx, 1);
        viewer.advance_time(Duration::from_millis(16));
        assert_eq!(viewer.step().unwrap().frame_idx, 2);
        assert_eq!(viewer.clock().now(), Duration::from_millis(16));
        assert_eq!(viewer.frame_idx(), 2);
        assert_eq!(viewer.pending_events(), 0);
    }

    #[test]
    fn svg_carries_transform() {
        let mut viewer = mount(&pair());
        viewer.push_event(WheelEvent::new(40.0, 10.0, -500.0).into());
        viewer.step().unwrap();
        let svg = viewer.svg(&SvgExporter::default());
        assert!(svg.contains(&viewer.transform().to_svg()));
        assert!(viewer.reset_zoom());
        assert_eq!(viewer.transform(), Transform::IDENTITY);
    }
}
