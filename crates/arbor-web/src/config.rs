#![forbid(unsafe_code)]

//! Viewer configuration.
//!
//! Everything is supplied by the host at mount time. There are no files and
//! no environment variables; [`ViewerConfig::default`] is a complete,
//! working configuration.

use std::ops::RangeInclusive;

use arbor_core::error::{ArborError, Result};
use arbor_core::event::WheelDeltaMode;
use arbor_core::geometry::Margins;
use arbor_layout::{ExpansionPolicy, LayoutConfig};
use arbor_render::{RenderStyle, TransitionTiming};

/// Pan/zoom gesture tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomConfig {
    /// Allowed range of the scale factor.
    pub scale_extent: RangeInclusive<f64>,
    /// Zoom exponent per wheel pixel.
    pub wheel_pixel: f64,
    /// Zoom exponent per wheel line.
    pub wheel_line: f64,
    /// Zoom exponent per wheel page.
    pub wheel_page: f64,
    /// Wheel multiplier while Ctrl is held (trackpad pinch on most hosts).
    pub ctrl_multiplier: f64,
    /// Pointer travel above which a press counts as a drag and swallows the
    /// click that follows it.
    pub click_distance: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            scale_extent: (1.0 / 32.0)..=32.0,
            wheel_pixel: 0.002,
            wheel_line: 0.05,
            wheel_page: 1.0,
            ctrl_multiplier: 10.0,
            click_distance: 0.0,
        }
    }
}

impl ZoomConfig {
    /// Set the allowed scale range.
    #[must_use]
    pub fn with_scale_extent(mut self, min: f64, max: f64) -> Self {
        self.scale_extent = min..=max;
        self
    }

    /// Set the drag threshold.
    #[must_use]
    pub fn with_click_distance(mut self, distance: f64) -> Self {
        self.click_distance = distance;
        self
    }

    /// Zoom exponent per unit of `mode`.
    #[must_use]
    pub fn wheel_factor(&self, mode: WheelDeltaMode) -> f64 {
        match mode {
            WheelDeltaMode::Pixel => self.wheel_pixel,
            WheelDeltaMode::Line => self.wheel_line,
            WheelDeltaMode::Page => self.wheel_page,
        }
    }

    /// Check that the scale extent is finite with `0 < min <= max`.
    ///
    /// # Errors
    ///
    /// Returns [`ArborError::InvalidConfig`] naming `scale_extent`.
    pub fn validate(&self) -> Result<()> {
        let (min, max) = (*self.scale_extent.start(), *self.scale_extent.end());
        let reason = if !min.is_finite() || !max.is_finite() {
            format!("bounds must be finite, got {min}..={max}")
        } else if min <= 0.0 {
            format!("lower bound must be positive, got {min}")
        } else if min > max {
            format!("lower bound {min} exceeds upper bound {max}")
        } else {
            return Ok(());
        };
        Err(ArborError::InvalidConfig {
            field: "scale_extent",
            reason,
        })
    }

    /// Clamp `k` into the scale extent.
    ///
    /// Never panics; an inverted extent resolves to its upper bound.
    #[must_use]
    pub fn clamp_scale(&self, k: f64) -> f64 {
        k.max(*self.scale_extent.start())
            .min(*self.scale_extent.end())
    }
}

/// Which pointer gesture toggles a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToggleTrigger {
    #[default]
    Click,
    DoubleClick,
}

/// What the host can do on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    /// The host animates surface size and view box from the scene it is
    /// given. When false, every frame whose viewport moved is flagged so the
    /// host can re-measure.
    pub animates_viewport: bool,
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self {
            animates_viewport: true,
        }
    }
}

/// Everything a viewer is mounted with.
#[derive(Debug, Clone, Default)]
pub struct ViewerConfig {
    pub layout: LayoutConfig,
    pub expansion: ExpansionPolicy,
    pub margins: Margins,
    pub style: RenderStyle,
    pub timing: TransitionTiming,
    pub zoom: ZoomConfig,
    pub trigger: ToggleTrigger,
    pub capabilities: HostCapabilities,
}

impl ViewerConfig {
    /// Set the layout parameters.
    #[must_use]
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Set the initial expansion policy.
    #[must_use]
    pub fn with_expansion(mut self, expansion: ExpansionPolicy) -> Self {
        self.expansion = expansion;
        self
    }

    /// Set the margins.
    #[must_use]
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
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
        self
    }

    /// Set the pan/zoom tuning.
    #[must_use]
    pub fn with_zoom(mut self, zoom: ZoomConfig) -> Self {
        self.zoom = zoom;
        self
    }

    /// Set the toggle gesture.
    #[must_use]
    pub fn with_trigger(mut self, trigger: ToggleTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    /// Set the host capabilities.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: HostCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.trigger, ToggleTrigger::Click);
        assert!(config.capabilities.animates_viewport);
        assert_eq!(config.layout.row_height, 20.0);
        assert_eq!(config.margins.left, 40.0);
    }

    #[test]
    fn wheel_factor_per_mode() {
        let zoom = ZoomConfig::default();
        assert_eq!(zoom.wheel_factor(WheelDeltaMode::Pixel), 0.002);
        assert_eq!(zoom.wheel_factor(WheelDeltaMode::Line), 0.05);
        assert_eq!(zoom.wheel_factor(WheelDeltaMode::Page), 1.0);
    }

    #[test]
    fn clamp_scale_to_extent() {
        let zoom = ZoomConfig::default().with_scale_extent(0.5, 4.0);
        assert_eq!(zoom.clamp_scale(0.1), 0.5);
        assert_eq!(zoom.clamp_scale(2.0), 2.0);
        assert_eq!(zoom.clamp_scale(10.0), 4.0);
    }

    #[test]
    fn default_extent_is_valid() {
        assert_eq!(ZoomConfig::default().validate(), Ok(()));
        let point = ZoomConfig::default().with_scale_extent(2.0, 2.0);
        assert_eq!(point.validate(), Ok(()));
    }

    #[test]
    fn invalid_extents_are_rejected() {
        for (min, max) in [
            (4.0, 0.25),
            (0.0, 4.0),
            (-1.0, 4.0),
            (f64::NAN, 4.0),
            (0.5, f64::NAN),
            (0.5, f64::INFINITY),
        ] {
            let zoom = ZoomConfig::default().with_scale_extent(min, max);
            assert!(
                matches!(
                    zoom.validate(),
                    Err(ArborError::InvalidConfig {
                        field: "scale_extent",
                        ..
                    })
                ),
                "{min}..={max} accepted"
            );
        }
    }

    #[test]
    fn inverted_extent_clamps_without_panicking() {
        let zoom = ZoomConfig::default().with_scale_extent(4.0, 0.25);
        assert_eq!(zoom.clamp_scale(1.0), 0.25);
        assert_eq!(zoom.clamp_scale(10.0), 0.25);
    }
}
