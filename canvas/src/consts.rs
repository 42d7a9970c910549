//! Shared numeric constants for the canvas crate.

// ── Viewport ────────────────────────────────────────────────────

/// Window axis length (CSS pixels) at which the scale multiplier is 1.0.
pub const REFERENCE_AXIS_PX: f64 = 1024.0;

/// Floor for the scale multiplier so icons and text stay legible.
pub const MIN_SCALE_MULTIPLIER: f64 = 0.8;

/// Agent icon and marker diameter at scale 1.0.
pub const AGENT_ICON_SIZE: f64 = 20.0;

/// Label text size at scale 1.0.
pub const TEXT_SIZE: f64 = 12.0;

/// Weapon icon box at scale 1.0.
pub const WEAPON_ICON_WIDTH: f64 = 30.0;
pub const WEAPON_ICON_HEIGHT: f64 = 15.0;

// ── Camera ──────────────────────────────────────────────────────

/// Fixed zoom applied after the camera translation.
pub const MAP_ZOOM: f64 = 1.5;

/// Edge length of every map image, in world units.
pub const MAP_IMAGE_SIZE: f64 = 1024.0;

// ── Markers ─────────────────────────────────────────────────────

/// Facing triangle tip distance, as a fraction of the icon size.
pub const FACING_TIP_RATIO: f64 = 0.89;

/// Facing triangle half-base divisor (`icon / 2.3`).
pub const FACING_HALF_BASE_DIVISOR: f64 = 2.3;

/// Facing triangle base offset divisor (`icon / 4`).
pub const FACING_BASE_DIVISOR: f64 = 4.0;

/// Extra vertical gap under the health label, in CSS pixels.
pub const HEALTH_LABEL_GAP_PX: f64 = 5.0;

// ── HUD ─────────────────────────────────────────────────────────

/// HUD left margin in CSS pixels.
pub const HUD_X: f64 = 20.0;
pub const HUD_FPS_Y: f64 = 50.0;
pub const HUD_ENTITIES_Y: f64 = 60.0;
pub const HUD_WAITING_Y: f64 = 80.0;

// ── Frame clock ─────────────────────────────────────────────────

/// Target display rate the host drives `frame` at.
pub const TARGET_FPS: f64 = 45.0;

/// Weight of the newest sample in the smoothed FPS estimate.
pub const FPS_SMOOTHING: f64 = 0.1;

// ── Masks ───────────────────────────────────────────────────────

/// Side of the offscreen bitmap a circle-masked icon is rendered into.
pub const MASK_BITMAP_PX: u32 = 128;

/// Diameter of the mask circle inside the bitmap.
pub const MASK_CIRCLE_PX: f64 = 120.0;
