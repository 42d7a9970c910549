//! Radar compositor: turns one snapshot into an ordered draw list.
//!
//! This module is pure. It receives a [`RenderContext`] (snapshot, viewport,
//! asset resolver) and returns a [`DrawList`]; it touches no browser API and
//! mutates no application state. Backends replay the list.
//!
//! Paint order is fixed:
//!
//! 1. background and HUD text
//! 2. map, under the yaw-locked camera
//! 3. self marker at the camera origin
//! 4. pass 1: every entity's info glyphs (uncertainty, health, weapon)
//! 5. pass 2: every entity's facing triangle, body circle and agent icon
//!
//! Running pass 1 to completion before pass 2 keeps every status label
//! beneath every body, so no entity's marker is hidden under another's text
//! and facing indicators sit above all map and info content.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use tracing::debug;
use wire::{Entity, Snapshot, Team, UNKNOWN_WEAPON};

use crate::assets::{AssetError, AssetResolver, ImageHandle};
use crate::consts::{
    FACING_BASE_DIVISOR, FACING_HALF_BASE_DIVISOR, FACING_TIP_RATIO, HEALTH_LABEL_GAP_PX, HUD_ENTITIES_Y, HUD_FPS_Y,
    HUD_WAITING_Y, HUD_X, MAP_IMAGE_SIZE, MAP_ZOOM, TEXT_SIZE,
};
use crate::draw::{
    ABILITY_LABEL, ABILITY_PLACEHOLDER, BACKGROUND, BLACK, Color, DrawCmd, DrawList, ENEMY, HEALTH_TEXT, HUD_TEXT,
    Layer, Mask, Shape, Stroke, TEAM, UNCERTAIN,
};
use crate::geometry::{Point, TransformStack, rotate_point};
use crate::viewport::Viewport;

/// HUD line shown while there is nothing to draw.
pub const WAITING_TEXT: &str = "Waiting for data...";

/// Glyph drawn for uncertain state and unidentified abilities.
pub const PLACEHOLDER_GLYPH: &str = "?";

/// Everything one frame is drawn from.
pub struct RenderContext<'a, R: AssetResolver + ?Sized> {
    pub snapshot: Option<&'a Snapshot>,
    pub viewport: &'a Viewport,
    pub assets: &'a R,
    /// Measured frame rate, shown in the HUD when present.
    pub fps: Option<f64>,
}

/// Compose one frame.
pub fn compose<R: AssetResolver + ?Sized>(ctx: &RenderContext<'_, R>) -> DrawList {
    let mut sink = Sink::new();
    let mut stack = TransformStack::new();

    // Layer 1: background and HUD, in screen space.
    sink.set(Layer::Background, None);
    sink.emit(&stack, Shape::Clear { color: BACKGROUND });

    sink.set(Layer::Hud, None);
    if let Some(fps) = ctx.fps {
        sink.emit(&stack, hud_text(format!("FPS: {fps:.2}"), HUD_FPS_Y));
    }

    let Some(snapshot) = ctx.snapshot.filter(|s| s.is_render()) else {
        sink.emit(&stack, hud_text(WAITING_TEXT.to_owned(), HUD_WAITING_Y));
        return sink.finish();
    };
    sink.emit(&stack, hud_text(format!("Entities: {}", snapshot.entity_count), HUD_ENTITIES_Y));

    let vp = ctx.viewport;
    let yaw = snapshot.local_view_angle_y;
    let (lx, ly) = snapshot.local_position();
    let local = Point::new(lx, ly);

    // Layer 2: camera centered on the viewer, then the map under -yaw.
    stack.translate_to(vp.center);
    stack.scale(MAP_ZOOM);
    draw_map(&mut sink, &mut stack, ctx.assets, snapshot);

    // Layer 3: the viewer sits at the camera origin.
    draw_self(&mut sink, &stack, ctx.assets, vp, snapshot.local_agent_index);

    let positions: Vec<Point> = snapshot
        .players
        .iter()
        .map(|e| camera_relative(local, e, yaw))
        .collect();

    // Layer 4: info glyphs for all entities.
    for (index, (entity, pos)) in snapshot.players.iter().zip(&positions).enumerate() {
        draw_info(&mut sink, &mut stack, ctx.assets, vp, index, entity, *pos);
    }

    // Layer 5: bodies and facings for all entities.
    for (index, (entity, pos)) in snapshot.players.iter().zip(&positions).enumerate() {
        draw_body(&mut sink, &mut stack, ctx.assets, vp, yaw, index, entity, *pos);
    }

    sink.finish()
}

/// Screen offset of `entity` from the viewer, before camera zoom.
#[must_use]
pub fn camera_relative(local: Point, entity: &Entity, yaw_deg: f64) -> Point {
    let (x, y) = entity.position();
    rotate_point(Point::ORIGIN, Point::new(x - local.x, y - local.y), yaw_deg)
}

/// Outward-pointing facing triangle for an icon of diameter `icon`.
#[must_use]
pub fn facing_triangle(icon: f64) -> [Point; 3] {
    let half_base = icon / FACING_HALF_BASE_DIVISOR;
    let base_y = -icon / FACING_BASE_DIVISOR;
    [
        Point::new(0.0, -icon * FACING_TIP_RATIO),
        Point::new(half_base, base_y),
        Point::new(-half_base, base_y),
    ]
}

#[must_use]
pub fn team_color(team: Team) -> Color {
    match team {
        Team::Enemy => ENEMY,
        Team::Ally => TEAM,
    }
}

/// Body fill: black once defeated, team color otherwise.
#[must_use]
pub fn body_color(entity: &Entity) -> Color {
    if entity.is_dead() { BLACK } else { team_color(entity.team) }
}

// =============================================================
// Layers
// =============================================================

fn draw_map<R: AssetResolver + ?Sized>(sink: &mut Sink, stack: &mut TransformStack, assets: &R, snapshot: &Snapshot) {
    sink.set(Layer::Map, None);
    let Some(handle) = assets.map_image(&snapshot.map_name) else {
        return;
    };

    let (lx, ly) = snapshot.local_position();
    let half = MAP_IMAGE_SIZE / 2.0;
    stack.scoped(|s| {
        s.rotate_deg(-snapshot.local_view_angle_y);
        sink.emit(
            s,
            Shape::Image {
                handle,
                at: Point::new(half - lx, half - ly),
                width: MAP_IMAGE_SIZE,
                height: MAP_IMAGE_SIZE,
                mask: Mask::None,
            },
        );
    });
}

fn draw_self<R: AssetResolver + ?Sized>(
    sink: &mut Sink,
    stack: &TransformStack,
    assets: &R,
    vp: &Viewport,
    agent_index: usize,
) {
    sink.set(Layer::SelfMarker, None);
    let outline = Some(Stroke { color: BLACK, width: 1.0 });

    sink.emit(stack, Shape::Triangle { points: facing_triangle(vp.icon_size), fill: Some(BLACK), stroke: outline });
    sink.emit(stack, Shape::Circle { at: Point::ORIGIN, diameter: vp.icon_size, fill: Some(BLACK), stroke: outline });

    if let Some(handle) = checked(assets.agent_icon(agent_index), None) {
        sink.emit(stack, agent_image(handle, vp.icon_size));
    }
}

fn draw_info<R: AssetResolver + ?Sized>(
    sink: &mut Sink,
    stack: &mut TransformStack,
    assets: &R,
    vp: &Viewport,
    index: usize,
    entity: &Entity,
    pos: Point,
) {
    sink.set(Layer::EntityInfo, Some(index));
    let icon = vp.icon_size;
    let text = vp.text_size;

    stack.scoped(|s| {
        s.translate_to(pos);

        if !entity.networkable {
            sink.emit(s, label(PLACEHOLDER_GLYPH, Point::new(icon / 2.0, text / 4.0), text, UNCERTAIN));
        }

        let health_at = Point::new(-(icon / 2.0), icon / 4.0 + text / 2.0 + HEALTH_LABEL_GAP_PX);
        sink.emit(s, label(&entity.health.to_string(), health_at, text * 0.9, HEALTH_TEXT));

        let above = -(icon / 2.0) - text / 3.0;
        if entity.is_ability {
            if entity.weapon_name == UNKNOWN_WEAPON {
                sink.emit(s, label(PLACEHOLDER_GLYPH, Point::new(-2.0, above), text * 0.5, ABILITY_PLACEHOLDER));
            } else {
                sink.emit(s, label(&entity.weapon_name, Point::new(-icon, above), text * 0.8, ABILITY_LABEL));
            }
            return;
        }

        let Some(weapon_index) = entity.weapon_index else {
            debug!(entity = index, "radar: weapon held without weapon_index");
            return;
        };
        if let Some(handle) = checked(assets.weapon_icon(weapon_index), Some(index)) {
            let h = vp.weapon_icon_height();
            sink.emit(
                s,
                Shape::Image {
                    handle,
                    at: Point::new(0.0, h + text),
                    width: vp.weapon_icon_width(),
                    height: h,
                    mask: Mask::None,
                },
            );
        }
    });
}

#[allow(clippy::too_many_arguments)]
fn draw_body<R: AssetResolver + ?Sized>(
    sink: &mut Sink,
    stack: &mut TransformStack,
    assets: &R,
    vp: &Viewport,
    yaw: f64,
    index: usize,
    entity: &Entity,
    pos: Point,
) {
    sink.set(Layer::EntityBody, Some(index));
    let icon = vp.icon_size;

    stack.scoped(|s| {
        s.translate_to(pos);

        s.scoped(|facing| {
            facing.rotate_deg(-yaw);
            facing.rotate_deg(entity.rotation.y);
            sink.emit(
                facing,
                Shape::Triangle {
                    points: facing_triangle(icon),
                    fill: None,
                    stroke: Some(Stroke { color: team_color(entity.team), width: 1.0 }),
                },
            );
        });

        let fill = body_color(entity);
        sink.emit(
            s,
            Shape::Circle { at: Point::ORIGIN, diameter: icon, fill: Some(fill), stroke: Some(Stroke { color: fill, width: 1.0 }) },
        );

        if let Some(handle) = checked(assets.agent_icon(entity.agent_index), Some(index)) {
            sink.emit(s, agent_image(handle, icon));
        }
    });
}

// =============================================================
// Helpers
// =============================================================

/// Collects commands, stamping each with the active layer and entity.
struct Sink {
    list: DrawList,
    layer: Layer,
    entity: Option<usize>,
}

impl Sink {
    fn new() -> Self {
        Self { list: DrawList::new(), layer: Layer::Background, entity: None }
    }

    fn set(&mut self, layer: Layer, entity: Option<usize>) {
        self.layer = layer;
        self.entity = entity;
    }

    fn emit(&mut self, stack: &TransformStack, shape: Shape) {
        self.list.push(DrawCmd { layer: self.layer, entity: self.entity, transform: stack.current(), shape });
    }

    fn finish(self) -> DrawList {
        self.list
    }
}

/// Unwrap a lookup, logging and skipping out-of-range indices.
fn checked(lookup: Result<Option<ImageHandle>, AssetError>, entity: Option<usize>) -> Option<ImageHandle> {
    match lookup {
        Ok(handle) => handle,
        Err(e) => {
            debug!(error = %e, ?entity, "radar: skipping icon");
            None
        }
    }
}

fn agent_image(handle: ImageHandle, icon: f64) -> Shape {
    Shape::Image { handle, at: Point::ORIGIN, width: icon, height: icon, mask: Mask::Circle }
}

fn label(text: &str, at: Point, size: f64, color: Color) -> Shape {
    Shape::Text { text: text.to_owned(), at, size, color }
}

fn hud_text(text: String, y: f64) -> Shape {
    Shape::Text { text, at: Point::new(HUD_X, y), size: TEXT_SIZE, color: HUD_TEXT }
}
