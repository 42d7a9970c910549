//! Viewport and scale model.
//!
//! Sizes on the radar are specified at a 1024-pixel reference axis and scaled
//! by the smaller window axis, never below [`MIN_SCALE_MULTIPLIER`]. The host
//! must call [`Viewport::resize`] before drawing the next frame after any
//! window size change; everything derived here is recomputed eagerly so a
//! frame never sees a stale scale.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::consts::{
    AGENT_ICON_SIZE, MIN_SCALE_MULTIPLIER, REFERENCE_AXIS_PX, TEXT_SIZE, WEAPON_ICON_HEIGHT, WEAPON_ICON_WIDTH,
};
use crate::geometry::Point;

/// Scale multiplier for a window of `width` × `height` CSS pixels.
///
/// Non-finite or negative sizes fall back to the floor.
#[must_use]
pub fn scale_multiplier(width: f64, height: f64) -> f64 {
    (width.min(height) / REFERENCE_AXIS_PX).max(MIN_SCALE_MULTIPLIER)
}

/// Current window dimensions and the sizes derived from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Canvas center in CSS pixels.
    pub center: Point,
    /// Resolution-independent multiplier, `>= 0.8`.
    pub scale: f64,
    /// Agent icon / marker diameter.
    pub icon_size: f64,
    /// Label text size.
    pub text_size: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(REFERENCE_AXIS_PX, REFERENCE_AXIS_PX)
    }
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        let scale = scale_multiplier(width, height);
        Self {
            width,
            height,
            center: Point::new(width / 2.0, height / 2.0),
            scale,
            icon_size: AGENT_ICON_SIZE * scale,
            text_size: TEXT_SIZE * scale,
        }
    }

    /// Recompute every derived value for a new window size.
    pub fn resize(&mut self, width: f64, height: f64) {
        *self = Self::new(width, height);
    }

    #[must_use]
    pub fn weapon_icon_width(&self) -> f64 {
        WEAPON_ICON_WIDTH * self.scale
    }

    #[must_use]
    pub fn weapon_icon_height(&self) -> f64 {
        WEAPON_ICON_HEIGHT * self.scale
    }
}
