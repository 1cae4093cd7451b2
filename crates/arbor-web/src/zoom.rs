#![forbid(unsafe_code)]

//! Pan/zoom controller.
//!
//! Owns the one affine [`Transform`] wrapping the whole scene. It reacts to
//! drags, wheel steps and pinch steps and to nothing else: layout and
//! reconciliation never touch it, and double-clicks are left alone so they
//! stay free for toggling.
//!
//! Positions arrive in surface pixels; the caller supplies the mapping into
//! the surface's user space (the space the transform lives in).
//!
//! # Drag and click
//!
//! A press starts a gesture. Any pointer travel beyond
//! [`ZoomConfig::click_distance`] turns it into a drag, and the click the host
//! reports after releasing a drag is swallowed so it does not toggle a node.

use arbor_core::event::{Event, Modifiers, PinchEvent, PointerEventKind, WheelEvent};
use arbor_core::geometry::{Point, Transform};

use crate::config::ZoomConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    origin: Point,
    last: Point,
    moved: bool,
}

/// What the controller did with one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZoomResponse {
    /// The transform changed.
    pub changed: bool,
    /// A click was swallowed because it ended a drag.
    pub suppressed_click: bool,
    /// The host should cancel its default handling (page scroll, text
    /// selection).
    pub prevent_default: bool,
}

/// Pan/zoom state machine.
#[derive(Debug, Clone)]
pub struct ZoomController {
    config: ZoomConfig,
    transform: Transform,
    drag: Option<Drag>,
    swallow_click: bool,
}

impl ZoomController {
    /// Create a controller at the identity transform.
    #[must_use]
    pub fn new(config: ZoomConfig) -> Self {
        Self {
            config,
            transform: Transform::IDENTITY,
            drag: None,
            swallow_click: false,
        }
    }

    /// Current transform.
    #[must_use]
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Gesture tuning in use.
    #[must_use]
    pub fn config(&self) -> &ZoomConfig {
        &self.config
    }

    /// Whether a press is being tracked.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Return to the identity transform. Returns whether anything changed.
    pub fn reset(&mut self) -> bool {
        self.drag = None;
        self.swallow_click = false;
        self.set(Transform::IDENTITY)
    }

    /// Feed one event. `to_user` maps surface pixels into user space.
    pub fn handle(&mut self, event: &Event, to_user: impl Fn(Point) -> Point) -> ZoomResponse {
        // Only the event right after a drag's release can be its click.
        let swallow = std::mem::take(&mut self.swallow_click);
        match event {
            Event::Pointer(pointer) => self.pointer(pointer.kind, to_user(pointer.position), swallow),
            Event::Wheel(wheel) => self.wheel(wheel, to_user(wheel.position)),
            Event::Pinch(pinch) => self.pinch(pinch, to_user),
        }
    }

    fn pointer(&mut self, kind: PointerEventKind, at: Point, swallow: bool) -> ZoomResponse {
        match kind {
            PointerEventKind::Down(_) => {
                self.drag = Some(Drag {
                    origin: at,
                    last: at,
                    moved: false,
                });
                ZoomResponse::default()
            }
            PointerEventKind::Move => {
                let Some(mut drag) = self.drag else {
                    return ZoomResponse::default();
                };
                if !drag.moved {
                    drag.moved = drag.origin.distance(at) > self.config.click_distance;
                }
                let next = self.transform.translate_by(at.x - drag.last.x, at.y - drag.last.y);
                drag.last = at;
                self.drag = Some(drag);
                ZoomResponse {
                    changed: self.set(next),
                    prevent_default: true,
                    ..ZoomResponse::default()
                }
            }
            PointerEventKind::Up(_) => {
                if let Some(drag) = self.drag.take() {
                    self.swallow_click = drag.moved;
                }
                ZoomResponse::default()
            }
            PointerEventKind::Click(_) => ZoomResponse {
                suppressed_click: swallow,
                prevent_default: swallow,
                ..ZoomResponse::default()
            },
            // Double-clicks are reserved for toggling.
            PointerEventKind::DoubleClick(_) | PointerEventKind::ContextMenu => ZoomResponse::default(),
        }
    }

    fn wheel(&mut self, wheel: &WheelEvent, at: Point) -> ZoomResponse {
        let mut exponent = -wheel.delta_y * self.config.wheel_factor(wheel.delta_mode);
        if wheel.modifiers.contains(Modifiers::CTRL) {
            exponent *= self.config.ctrl_multiplier;
        }
        let k = self.config.clamp_scale(self.transform.k * exponent.exp2());
        ZoomResponse {
            changed: k != self.transform.k && self.set(self.transform.scale_to_at(k, at)),
            prevent_default: true,
            ..ZoomResponse::default()
        }
    }

    fn pinch(&mut self, pinch: &PinchEvent, to_user: impl Fn(Point) -> Point) -> ZoomResponse {
        if !(pinch.scale.is_finite() && pinch.scale > 0.0) {
            return ZoomResponse::default();
        }
        // Keep the content under the previous midpoint under the current one.
        let previous = to_user(pinch.center.offset(-pinch.pan.x, -pinch.pan.y));
        let current = to_user(pinch.center);
        let content = self.transform.invert(previous);
        let k = self.config.clamp_scale(self.transform.k * pinch.scale);
        let next = Transform::new(k, current.x - content.x * k, current.y - content.y * k);
        ZoomResponse {
            changed: self.set(next),
            prevent_default: true,
            ..ZoomResponse::default()
        }
    }

    fn set(&mut self, next: Transform) -> bool {
        if next == self.transform || !(next.k.is_finite() && next.x.is_finite() && next.y.is_finite()) {
            return false;
        }
        self.transform = next;
        arbor_core::trace!(k = next.k, x = next.x, y = next.y, "zoom");
        true
    }
}

impl Default for ZoomController {
    fn default() -> Self {
        Self::new(ZoomConfig::default())
    }
}
