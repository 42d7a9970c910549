//! Browser binding: owns the canvas element and replays draw lists onto it.
//!
//! The host page constructs a [`RadarView`] over a `<canvas>`, forwards
//! websocket text and window resizes, starts the image loads the view asks
//! for, and calls [`RadarView::frame`] from `requestAnimationFrame`.

use std::f64::consts::TAU;

use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};
use wire::{AgentTable, WeaponTable};

use crate::assets::{Generation, ImageHandle, MaskCache};
use crate::consts::{MASK_BITMAP_PX, MASK_CIRCLE_PX, TARGET_FPS};
use crate::draw::{Color, DrawList, Mask, Shape, Stroke};
use crate::engine::EngineCore;
use crate::geometry::{Affine, Point};

#[wasm_bindgen]
pub struct RadarView {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    core: EngineCore<HtmlImageElement>,
    masks: MaskCache<ImageHandle, HtmlCanvasElement>,
    dpr: f64,
}

#[wasm_bindgen]
impl RadarView {
    /// Bind to `canvas`.
    ///
    /// # Errors
    ///
    /// Fails when the element has no 2D context.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<RadarView, JsValue> {
        let ctx = context_2d(&canvas)?;
        Ok(Self { canvas, ctx, core: EngineCore::new(), masks: MaskCache::new(), dpr: 1.0 })
    }

    /// Milliseconds between frames at the target rate.
    #[must_use]
    pub fn frame_interval_ms() -> f64 {
        1000.0 / TARGET_FPS
    }

    /// Feed one websocket text message. Returns whether there is data to draw.
    pub fn on_message(&mut self, raw: &str) -> bool {
        self.core.on_message(raw)
    }

    /// Window resized to `width` × `height` CSS pixels at `dpr` device pixels
    /// per CSS pixel.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn on_resize(&mut self, width: f64, height: f64, dpr: f64) {
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        self.canvas.set_width((width * self.dpr).round().max(1.0) as u32);
        self.canvas.set_height((height * self.dpr).round().max(1.0) as u32);
        self.core.on_resize(width, height);
    }

    /// Install the agent table from `/actors.json`.
    ///
    /// # Errors
    ///
    /// Fails when `raw` is not an agent table.
    pub fn set_agent_table(&mut self, raw: &str) -> Result<(), JsError> {
        let table: AgentTable = serde_json::from_str(raw)?;
        self.core.set_agent_table(table);
        Ok(())
    }

    /// Install the weapon table from `/weapons.json`.
    ///
    /// # Errors
    ///
    /// Fails when `raw` is not a weapon table.
    pub fn set_weapon_table(&mut self, raw: &str) -> Result<(), JsError> {
        let table: WeaponTable = serde_json::from_str(raw)?;
        self.core.set_weapon_table(table);
        Ok(())
    }

    /// Loads to start, as `[generation, path]` pairs.
    pub fn take_pending_loads(&mut self) -> js_sys::Array {
        self.core
            .take_pending_loads()
            .into_iter()
            .map(|load| js_sys::Array::of2(&JsValue::from(load.generation.0), &JsValue::from_str(&load.path)))
            .collect()
    }

    /// An image finished loading. Returns `false` when it was superseded.
    pub fn complete_load(&mut self, generation: u32, image: HtmlImageElement) -> bool {
        let accepted = self.core.complete_load(Generation(generation), image);
        if accepted {
            let assets = &self.core.assets;
            self.masks.retain(|handle| assets.image(*handle).is_some());
        }
        accepted
    }

    pub fn fail_load(&mut self, generation: u32) -> bool {
        self.core.fail_load(Generation(generation))
    }

    /// Draw one frame.
    ///
    /// # Errors
    ///
    /// Propagates canvas API failures.
    pub fn frame(&mut self, now_ms: f64) -> Result<(), JsValue> {
        let list = self.core.frame(now_ms);
        self.paint(&list)
    }
}

impl RadarView {
    fn paint(&mut self, list: &DrawList) -> Result<(), JsValue> {
        for cmd in list {
            self.set_transform(cmd.transform)?;
            match &cmd.shape {
                Shape::Clear { color } => {
                    self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
                    self.ctx.set_fill_style_str(&color.css());
                    self.ctx.fill_rect(0.0, 0.0, f64::from(self.canvas.width()), f64::from(self.canvas.height()));
                }
                Shape::Text { text, at, size, color } => {
                    self.ctx.set_font(&format!("{size}px sans-serif"));
                    self.ctx.set_fill_style_str(&color.css());
                    self.ctx.fill_text(text, at.x, at.y)?;
                }
                Shape::Image { handle, at, width, height, mask } => {
                    self.draw_image(*handle, *at, *width, *height, *mask)?;
                }
                Shape::Circle { at, diameter, fill, stroke } => {
                    self.ctx.begin_path();
                    self.ctx.arc(at.x, at.y, diameter / 2.0, 0.0, TAU)?;
                    self.fill_and_stroke(*fill, *stroke);
                }
                Shape::Triangle { points, fill, stroke } => {
                    let [a, b, c] = points;
                    self.ctx.begin_path();
                    self.ctx.move_to(a.x, a.y);
                    self.ctx.line_to(b.x, b.y);
                    self.ctx.line_to(c.x, c.y);
                    self.ctx.close_path();
                    self.fill_and_stroke(*fill, *stroke);
                }
            }
        }
        self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    fn set_transform(&self, t: Affine) -> Result<(), JsValue> {
        let s = self.dpr;
        self.ctx.set_transform(s * t.a, s * t.b, s * t.c, s * t.d, s * t.e, s * t.f)
    }

    fn fill_and_stroke(&self, fill: Option<Color>, stroke: Option<Stroke>) {
        if let Some(color) = fill {
            self.ctx.set_fill_style_str(&color.css());
            self.ctx.fill();
        }
        if let Some(Stroke { color, width }) = stroke {
            self.ctx.set_stroke_style_str(&color.css());
            self.ctx.set_line_width(width);
            self.ctx.stroke();
        }
    }

    fn draw_image(&mut self, handle: ImageHandle, at: Point, width: f64, height: f64, mask: Mask) -> Result<(), JsValue> {
        let Some(image) = self.core.assets.image(handle) else {
            return Ok(());
        };
        let (x, y) = (at.x - width / 2.0, at.y - height / 2.0);
        match mask {
            Mask::None => self.ctx.draw_image_with_html_image_element_and_dw_and_dh(image, x, y, width, height),
            Mask::Circle => {
                let masked = self.masks.get_or_insert_with(handle, || match circle_masked(image) {
                    Ok(canvas) => Some(canvas),
                    Err(e) => {
                        warn!(error = ?e, handle = handle.id(), "radar: circle mask failed");
                        None
                    }
                });
                match masked {
                    Some(canvas) => self.ctx.draw_image_with_html_canvas_element_and_dw_and_dh(canvas, x, y, width, height),
                    None => Ok(()),
                }
            }
        }
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}

/// Copy `image` into an offscreen bitmap clipped to a centered circle.
/// The source image is left untouched.
fn circle_masked(image: &HtmlImageElement) -> Result<HtmlCanvasElement, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas = document.create_element("canvas")?.dyn_into::<HtmlCanvasElement>()?;
    canvas.set_width(MASK_BITMAP_PX);
    canvas.set_height(MASK_BITMAP_PX);

    let ctx = context_2d(&canvas)?;
    let side = f64::from(MASK_BITMAP_PX);
    ctx.draw_image_with_html_image_element_and_dw_and_dh(image, 0.0, 0.0, side, side)?;
    ctx.set_global_composite_operation("destination-in")?;
    ctx.begin_path();
    ctx.arc(side / 2.0, side / 2.0, MASK_CIRCLE_PX / 2.0, 0.0, TAU)?;
    ctx.set_fill_style_str("#000");
    ctx.fill();
    Ok(canvas)
}
