#![forbid(unsafe_code)]

//! Animation primitives.
//!
//! A [`Tween`] turns elapsed time into eased progress in `0.0..=1.0`; the
//! [`Interpolate`] trait turns progress into attribute values. Time is always
//! supplied by the caller, never read from a clock, so transitions are fully
//! deterministic under test.

use std::time::Duration;

use crate::geometry::{Point, Size, ViewBox};

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f64) -> f64;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in-out (slow start and end).
#[inline]
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Cubic ease-out (slow end).
#[inline]
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Cubic ease-in-out. The default for tree transitions.
#[inline]
pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A time-based animation producing values in [0.0, 1.0].
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current output value, clamped to [0.0, 1.0].
    fn value(&self) -> f64;

    /// Reset the animation to its initial state.
    fn reset(&mut self);

    /// Time elapsed past completion.
    fn overshoot(&self) -> Duration {
        Duration::ZERO
    }
}

// ---------------------------------------------------------------------------
// Tween
// ---------------------------------------------------------------------------

/// Eased progression from 0.0 to 1.0 over a duration.
///
/// Elapsed time is accumulated as a [`Duration`] so long runs do not drift.
/// A zero-duration tween is complete from the start and reports `1.0`.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Tween {
    /// Create a tween with the given duration and cubic in-out easing.
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration,
            easing: ease_in_out_cubic,
        }
    }

    /// A tween that is already finished.
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Set the easing function.
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Configured duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Time accumulated so far.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Raw linear progress (before easing), in [0.0, 1.0].
    pub fn raw_progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        t.clamp(0.0, 1.0)
    }

    /// Jump straight to the end.
    pub fn finish(&mut self) {
        self.elapsed = self.elapsed.max(self.duration);
    }
}

impl Animation for Tween {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f64 {
        (self.easing)(self.raw_progress())
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    fn overshoot(&self) -> Duration {
        self.elapsed.saturating_sub(self.duration)
    }
}

// ---------------------------------------------------------------------------
// Interpolation
// ---------------------------------------------------------------------------

/// Values that can be blended between two endpoints.
pub trait Interpolate: Copy {
    /// Blend `self` toward `to` by `t` (0 = `self`, 1 = `to`).
    fn interpolate(self, to: Self, t: f64) -> Self;
}

/// Linear blend of two scalars.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

impl Interpolate for f64 {
    #[inline]
    fn interpolate(self, to: Self, t: f64) -> Self {
        lerp(self, to, t)
    }
}

impl Interpolate for Point {
    #[inline]
    fn interpolate(self, to: Self, t: f64) -> Self {
        Point::new(lerp(self.x, to.x, t), lerp(self.y, to.y, t))
    }
}

impl Interpolate for Size {
    #[inline]
    fn interpolate(self, to: Self, t: f64) -> Self {
        Size::new(lerp(self.width, to.width, t), lerp(self.height, to.height, t))
    }
}

impl Interpolate for ViewBox {
    #[inline]
    fn interpolate(self, to: Self, t: f64) -> Self {
        ViewBox::new(
            lerp(self.min_x, to.min_x, t),
            lerp(self.min_y, to.min_y, t),
            lerp(self.width, to.width, t),
            lerp(self.height, to.height, t),
        )
    }
}

/// A value travelling from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track<T> {
    pub from: T,
    pub to: T,
}

impl<T: Interpolate> Track<T> {
    /// Create a track between two values.
    pub const fn new(from: T, to: T) -> Self {
        Self { from, to }
    }

    /// A track that stays put.
    pub const fn hold(value: T) -> Self {
        Self {
            from: value,
            to: value,
        }
    }

    /// Value at progress `t`.
    #[inline]
    pub fn at(&self, t: f64) -> T {
        self.from.interpolate(self.to, t)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
