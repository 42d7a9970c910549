//! Draw list: the compositor's output, replayed by a backend.
//!
//! Each [`DrawCmd`] carries the full transform it must be drawn under, so a
//! backend sets the matrix and draws; there is no implicit context state to
//! push or pop. Commands are stored in paint order (first = bottom).

use crate::assets::ImageHandle;
use crate::geometry::{Affine, Point};

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS `rgb(r,g,b)` string.
    #[must_use]
    pub fn css(self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }
}

pub const BACKGROUND: Color = Color::rgb(0x22, 0x22, 0x22);
pub const BLACK: Color = Color::rgb(0, 0, 0);
pub const ENEMY: Color = Color::rgb(255, 0, 0);
pub const TEAM: Color = Color::rgb(0, 255, 0);
pub const HUD_TEXT: Color = Color::rgb(0, 255, 0);
pub const HEALTH_TEXT: Color = Color::rgb(0, 255, 0);
pub const UNCERTAIN: Color = Color::rgb(255, 255, 0);
pub const ABILITY_PLACEHOLDER: Color = Color::rgb(0, 180, 255);
pub const ABILITY_LABEL: Color = Color::rgb(0, 125, 255);

/// Which compositing layer a command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Background,
    Hud,
    Map,
    SelfMarker,
    /// Pass 1: uncertainty glyph, health, weapon icon / ability label.
    EntityInfo,
    /// Pass 2: facing triangle, body circle, agent icon.
    EntityBody,
}

/// Outline parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

/// How an image's pixels are clipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mask {
    None,
    Circle,
}

/// A primitive in local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Fill the whole surface, ignoring the transform.
    Clear { color: Color },
    /// Left-aligned text with its alphabetic baseline at `at`.
    Text { text: String, at: Point, size: f64, color: Color },
    /// Image centered on `at`.
    Image { handle: ImageHandle, at: Point, width: f64, height: f64, mask: Mask },
    Circle { at: Point, diameter: f64, fill: Option<Color>, stroke: Option<Stroke> },
    Triangle { points: [Point; 3], fill: Option<Color>, stroke: Option<Stroke> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCmd {
    pub layer: Layer,
    /// Index into `players` for per-entity commands.
    pub entity: Option<usize>,
    pub transform: Affine,
    pub shape: Shape,
}

impl DrawCmd {
    /// The local anchor point mapped through the command's transform.
    #[must_use]
    pub fn screen_anchor(&self) -> Option<Point> {
        let at = match &self.shape {
            Shape::Clear { .. } => return None,
            Shape::Text { at, .. } | Shape::Image { at, .. } | Shape::Circle { at, .. } => *at,
            Shape::Triangle { points, .. } => points[0],
        };
        Some(self.transform.apply(at))
    }
}

/// Ordered sequence of draw commands for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    cmds: Vec<DrawCmd>,
}

impl DrawList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: DrawCmd) {
        self.cmds.push(cmd);
    }

    #[must_use]
    pub fn commands(&self) -> &[DrawCmd] {
        &self.cmds
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DrawCmd> {
        self.cmds.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Commands on `layer`, in paint order.
    pub fn on_layer(&self, layer: Layer) -> impl Iterator<Item = &DrawCmd> {
        self.cmds.iter().filter(move |c| c.layer == layer)
    }

    /// Text of every text command, in paint order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.cmds
            .iter()
            .filter_map(|c| match &c.shape {
                Shape::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a DrawList {
    type Item = &'a DrawCmd;
    type IntoIter = std::slice::Iter<'a, DrawCmd>;

    fn into_iter(self) -> Self::IntoIter {
        self.cmds.iter()
    }
}
