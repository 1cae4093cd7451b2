#![forbid(unsafe_code)]

//! Canonical interaction events.
//!
//! The host translates its native pointer, wheel and touch input into these
//! types and pushes them into the viewer. Positions are in surface pixels
//! relative to the top-left corner of the mounted container.
//!
//! # Design Notes
//!
//! - `Click` and `DoubleClick` are delivered by the host in addition to the
//!   raw `Down`/`Up` pair, the same way a browser does.
//! - `ContextMenu` is the secondary-interaction gesture; the viewer answers it
//!   with a request to suppress the host menu and nothing else.
//! - `Modifiers` use bitflags for easy combination.

use bitflags::bitflags;

use crate::geometry::Point;

/// Canonical input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// A pointer (mouse, pen, single touch) event.
    Pointer(PointerEvent),

    /// A scroll-wheel event.
    Wheel(WheelEvent),

    /// A two-finger pinch step.
    Pinch(PinchEvent),
}

impl Event {
    /// Modifier keys held during the event.
    #[must_use]
    pub const fn modifiers(&self) -> Modifiers {
        match self {
            Self::Pointer(e) => e.modifiers,
            Self::Wheel(e) => e.modifiers,
            Self::Pinch(_) => Modifiers::NONE,
        }
    }

    /// Surface position the event refers to.
    #[must_use]
    pub const fn position(&self) -> Point {
        match self {
            Self::Pointer(e) => e.position,
            Self::Wheel(e) => e.position,
            Self::Pinch(e) => e.center,
        }
    }
}

impl From<PointerEvent> for Event {
    fn from(e: PointerEvent) -> Self {
        Self::Pointer(e)
    }
}

impl From<WheelEvent> for Event {
    fn from(e: WheelEvent) -> Self {
        Self::Wheel(e)
    }
}

impl From<PinchEvent> for Event {
    fn from(e: PinchEvent) -> Self {
        Self::Pinch(e)
    }
}

bitflags! {
    /// Modifier keys held during an interaction.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// Pointer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Left button, pen tip, or touch contact.
    Primary,
    /// Right button.
    Secondary,
    /// Middle button.
    Auxiliary,
}

/// The type of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Button pressed.
    Down(PointerButton),
    /// Pointer moved, with or without a button held.
    Move,
    /// Button released.
    Up(PointerButton),
    /// Press and release without an intervening gesture.
    Click(PointerButton),
    /// Second click in quick succession.
    DoubleClick(PointerButton),
    /// Secondary interaction that would open the host's context menu.
    ContextMenu,
}

/// A pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// The type of pointer event.
    pub kind: PointerEventKind,

    /// Surface position in pixels.
    pub position: Point,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub const fn new(kind: PointerEventKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            position: Point::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    /// Primary-button click at `(x, y)`.
    #[must_use]
    pub const fn click(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Click(PointerButton::Primary), x, y)
    }

    /// Primary-button double click at `(x, y)`.
    #[must_use]
    pub const fn double_click(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::DoubleClick(PointerButton::Primary), x, y)
    }

    /// Create a pointer event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Whether the Alt/Option key was held.
    #[must_use]
    pub const fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }
}

/// Unit of a wheel delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WheelDeltaMode {
    /// Delta in pixels.
    #[default]
    Pixel,
    /// Delta in lines.
    Line,
    /// Delta in pages.
    Page,
}

/// A scroll-wheel event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    /// Surface position of the pointer.
    pub position: Point,

    /// Vertical delta; positive scrolls down (zooms out).
    pub delta_y: f64,

    /// Unit of `delta_y`.
    pub delta_mode: WheelDeltaMode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl WheelEvent {
    /// Pixel-mode wheel event.
    #[must_use]
    pub const fn new(x: f64, y: f64, delta_y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            delta_y,
            delta_mode: WheelDeltaMode::Pixel,
            modifiers: Modifiers::NONE,
        }
    }

    /// Set the delta unit.
    #[must_use]
    pub const fn with_delta_mode(mut self, mode: WheelDeltaMode) -> Self {
        self.delta_mode = mode;
        self
    }

    /// Create a wheel event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// One step of a two-finger pinch gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchEvent {
    /// Midpoint between the two contacts, in surface pixels.
    pub center: Point,

    /// Ratio of the current finger distance to the previous step's distance.
    pub scale: f64,

    /// Movement of `center` since the previous step.
    pub pan: Point,
}

impl PinchEvent {
    /// Create a pinch step without panning.
    #[must_use]
    pub const fn new(x: f64, y: f64, scale: f64) -> Self {
        Self {
            center: Point::new(x, y),
            scale,
            pan: Point::ORIGIN,
        }
    }

    /// Set the pan delta.
    #[must_use]
    pub const fn with_pan(mut self, dx: f64, dy: f64) -> Self {
        self.pan = Point::new(dx, dy);
        self
    }
}
