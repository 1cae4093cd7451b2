#![forbid(unsafe_code)]

//! Enter/update/exit reconciliation.
//!
//! The [`Reconciler`] keeps one live element per node key and per link key
//! (the link's child). Each [`Reconciler::render`] pass lays the tree out,
//! sorts every key into entering, updating or exiting, and starts a single
//! shared transition. Elements are never recreated while their key stays in
//! the scene, so a host can rely on [`ElementId`] for identity.
//!
//! # Interrupts
//!
//! A pass started while another transition is in flight restarts every
//! element from the value it is *currently displaying*, so nothing jumps.
//! The previous positions stashed on the tree are the previous pass's layout
//! targets, which is what entering elements grow out of.
//!
//! # Anchors
//!
//! - Entering nodes and links start at the trigger node's previous position.
//! - Exiting nodes and links end at the trigger node's new position.

use std::collections::BTreeMap;
use std::time::Duration;

use arbor_core::animation::{Animation, Track, Tween};
use arbor_core::error::Result;
use arbor_core::event::Modifiers;
use arbor_core::geometry::{Point, Transform};
use arbor_layout::{LayoutSummary, NodeId, TidyLayout, Tree};

use crate::scene::{ElementId, Label, LinkElement, LinkLayer, NodeElement, Phase, Scene, TextAnchor};
use crate::style::{RenderStyle, TransitionTiming};
use crate::viewport::{Frame, Viewport};

/// Label baseline shift that centres text on its row.
const LABEL_DY_EM: f64 = 0.31;

#[derive(Debug, Clone)]
struct LiveNode {
    element: ElementId,
    phase: Phase,
    position: Track<Point>,
    opacity: Track<f64>,
    label: String,
    expandable: bool,
}

#[derive(Debug, Clone)]
struct LiveLink {
    element: ElementId,
    phase: Phase,
    source: Track<Point>,
    target: Track<Point>,
}

/// Counts from one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderReport {
    pub entering: usize,
    pub updating: usize,
    pub exiting: usize,
    pub duration: Duration,
}

/// Diffs successive visible sets and animates between them.
#[derive(Debug, Clone)]
pub struct Reconciler {
    layout: TidyLayout,
    viewport: Viewport,
    style: RenderStyle,
    timing: TransitionTiming,
    nodes: BTreeMap<NodeId, LiveNode>,
    links: BTreeMap<NodeId, LiveLink>,
    frame: Track<Frame>,
    tween: Tween,
    next_element: u64,
    last_summary: Option<LayoutSummary>,
}

impl Reconciler {
    /// Create a reconciler with the default style and timing.
    #[must_use]
    pub fn new(layout: TidyLayout, viewport: Viewport) -> Self {
        let frame = viewport.initial_frame(layout.config().row_height);
        Self {
            layout,
            viewport,
            style: RenderStyle::default(),
            timing: TransitionTiming::default(),
            nodes: BTreeMap::new(),
            links: BTreeMap::new(),
            frame: Track::hold(frame),
            tween: Tween::immediate(),
            next_element: 0,
            last_summary: None,
        }
    }

    /// Set the visual style.
    #[must_use]
    pub fn with_style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the transition timing.
    #[must_use]
    pub fn with_timing(mut self, timing: TransitionTiming) -> Self {
        self.timing = timing;
        self.tween = self.tween.easing(timing.easing);
        self
    }

    /// Layout engine in use.
    #[must_use]
    pub fn layout(&self) -> &TidyLayout {
        &self.layout
    }

    /// Viewport in use.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Style in use.
    #[must_use]
    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Summary of the most recent layout pass.
    #[must_use]
    pub fn last_summary(&self) -> Option<&LayoutSummary> {
        self.last_summary.as_ref()
    }

    /// Whether a transition is still running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        !self.tween.is_complete()
    }

    /// Lay out `tree` and start the transition to its new visible set.
    ///
    /// `trigger` is the node whose toggle caused the pass and supplies the
    /// enter/exit anchors. `modifiers` are the keys held during the
    /// triggering interaction; `None` (the initial render) applies the new
    /// state immediately.
    ///
    /// After scheduling, every visible node's position is stashed as the
    /// previous position for the next pass.
    pub fn render(
        &mut self,
        tree: &mut Tree,
        trigger: NodeId,
        modifiers: Option<Modifiers>,
    ) -> Result<RenderReport> {
        tree.node(trigger)?;
        let summary = self.layout.run(tree)?;
        let duration = modifiers.map_or(Duration::ZERO, |m| self.timing.duration_for(m));

        // Values on screen right now; new tracks start from here.
        let t = self.progress();
        let trigger_node = tree.node(trigger)?;
        let enter_anchor = trigger_node.prev_scene_position();
        let exit_anchor = trigger_node.scene_position();

        let mut report = RenderReport {
            duration,
            ..RenderReport::default()
        };

        let mut present: Vec<NodeId> = Vec::new();
        for node in tree.visible() {
            let id = node.id();
            present.push(id);
            let target = node.scene_position();
            let parent_target = node
                .parent()
                .and_then(|p| tree.get(p))
                .map(|p| p.scene_position());

            match self.nodes.get_mut(&id) {
                Some(live) => {
                    live.position = Track::new(live.position.at(t), target);
                    live.opacity = Track::new(live.opacity.at(t), 1.0);
                    live.phase = Phase::Updating;
                    report.updating += 1;
                }
                None => {
                    let element = self.allocate();
                    self.nodes.insert(
                        id,
                        LiveNode {
                            element,
                            phase: Phase::Entering,
                            position: Track::new(enter_anchor, target),
                            opacity: Track::new(0.0, 1.0),
                            label: node.label().to_owned(),
                            expandable: node.is_expandable(),
                        },
                    );
                    report.entering += 1;
                }
            }

            if let Some(source) = parent_target {
                match self.links.get_mut(&id) {
                    Some(live) => {
                        live.source = Track::new(live.source.at(t), source);
                        live.target = Track::new(live.target.at(t), target);
                        live.phase = Phase::Updating;
                    }
                    None => {
                        let element = self.allocate();
                        self.links.insert(
                            id,
                            LiveLink {
                                element,
                                phase: Phase::Entering,
                                source: Track::new(enter_anchor, source),
                                target: Track::new(enter_anchor, target),
                            },
                        );
                    }
                }
            }
        }

        present.sort_unstable();
        let is_present = |id: &NodeId| present.binary_search(id).is_ok();
        for (id, live) in &mut self.nodes {
            if !is_present(id) {
                live.position = Track::new(live.position.at(t), exit_anchor);
                live.opacity = Track::new(live.opacity.at(t), 0.0);
                live.phase = Phase::Exiting;
                report.exiting += 1;
            }
        }
        for (id, live) in &mut self.links {
            if !is_present(id) {
                live.source = Track::new(live.source.at(t), exit_anchor);
                live.target = Track::new(live.target.at(t), exit_anchor);
                live.phase = Phase::Exiting;
            }
        }

        self.frame = Track::new(self.frame.at(t), self.viewport.frame_for(summary.extent));
        self.tween = Tween::new(duration).easing(self.timing.easing);
        self.last_summary = Some(summary);
        tree.stash_positions();

        arbor_core::debug!(
            trigger = trigger.index(),
            entering = report.entering,
            updating = report.updating,
            exiting = report.exiting,
            duration_ms = duration.as_millis() as u64,
            "reconcile"
        );

        if self.tween.is_complete() {
            self.settle();
        }
        Ok(report)
    }

    /// Advance the running transition by `dt`. Returns whether it is still
    /// running afterwards.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if self.tween.is_complete() {
            return false;
        }
        self.tween.tick(dt);
        if self.tween.is_complete() {
            self.settle();
            return false;
        }
        true
    }

    /// Jump the running transition to its end.
    pub fn finish(&mut self) {
        if !self.tween.is_complete() {
            self.tween.finish();
            self.settle();
        }
    }

    /// Current frame geometry (surface height and view box).
    #[must_use]
    pub fn current_frame(&self) -> Frame {
        self.frame.at(self.progress())
    }

    /// Snapshot of what is on screen now, wrapped in `transform`.
    #[must_use]
    pub fn scene(&self, transform: Transform) -> Scene {
        let t = self.progress();
        let frame = self.frame.at(t);
        let style = &self.style;

        let links = self
            .links
            .iter()
            .map(|(&key, live)| {
                let source = live.source.at(t);
                let target = live.target.at(t);
                LinkElement {
                    key,
                    element: live.element,
                    phase: live.phase,
                    source,
                    target,
                    path: style.link_shape.path(source, target),
                }
            })
            .collect();

        // Deepest pre-order ids first, so ancestors paint over descendants.
        let nodes = self
            .nodes
            .iter()
            .rev()
            .map(|(&key, live)| {
                let (dx, anchor) = if live.expandable {
                    (-style.label_offset, TextAnchor::End)
                } else {
                    (style.label_offset, TextAnchor::Start)
                };
                NodeElement {
                    key,
                    element: live.element,
                    phase: live.phase,
                    position: live.position.at(t),
                    opacity: live.opacity.at(t),
                    glyph: style.glyph,
                    fill: if live.expandable {
                        style.expandable_fill
                    } else {
                        style.leaf_fill
                    },
                    expandable: live.expandable,
                    label: Label {
                        text: live.label.clone(),
                        dx,
                        dy_em: LABEL_DY_EM,
                        anchor,
                        halo: style.halo_color,
                        halo_width: style.halo_width,
                    },
                }
            })
            .collect();

        Scene {
            width: self.viewport.width,
            height: frame.height,
            view_box: frame.view_box,
            transform,
            font_size: style.font_size,
            hit_stroke_width: style.hit_stroke_width,
            link_layer: LinkLayer {
                stroke: style.link_stroke,
                opacity: style.link_opacity,
                width: style.link_width,
            },
            links,
            nodes,
        }
    }

    fn progress(&self) -> f64 {
        self.tween.value()
    }

    fn allocate(&mut self) -> ElementId {
        let id = ElementId(self.next_element);
        self.next_element += 1;
        id
    }

    /// Drop exiting elements and bring everything else to rest.
    fn settle(&mut self) {
        arbor_core::debug!(
            removed = self.nodes.values().filter(|live| live.phase == Phase::Exiting).count(),
            remaining = self
                .nodes
                .values()
                .filter(|live| live.phase != Phase::Exiting)
                .count(),
            "transition complete"
        );
        self.nodes.retain(|_, live| live.phase != Phase::Exiting);
        self.links.retain(|_, live| live.phase != Phase::Exiting);
        for live in self.nodes.values_mut() {
            live.position = Track::hold(live.position.to);
            live.opacity = Track::hold(live.opacity.to);
            live.phase = Phase::Settled;
        }
        for live in self.links.values_mut() {
            live.source = Track::hold(live.source.to);
            live.target = Track::hold(live.target.to);
            live.phase = Phase::Settled;
        }
        self.frame = Track::hold(self.frame.to);
    }
}
