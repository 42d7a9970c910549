//! Radar view engine for the spectator overlay.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It turns the
//! newest telemetry snapshot into a top-down, yaw-locked radar: the map rotates
//! against the viewer's heading, every entity is placed relative to the viewer,
//! and markers, facings and status labels are composited on top. The host
//! JavaScript layer only forwards websocket text, window resizes and finished
//! image loads, and drives [`web::RadarView::frame`] once per animation frame.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Testable [`engine::EngineCore`] and the frame clock |
//! | [`web`] | `wasm-bindgen` [`web::RadarView`] that replays draw lists on a canvas |
//! | [`render`] | Pure compositor: snapshot + viewport + assets to [`draw::DrawList`] |
//! | [`draw`] | Draw commands, layers and colors |
//! | [`store`] | Latest-snapshot store |
//! | [`assets`] | Generation-tagged image cache and the resolver trait |
//! | [`viewport`] | Window size and derived scale |
//! | [`geometry`] | Point rotation, affine transforms, scoped transform stack |
//! | [`consts`] | Shared numeric constants (sizes, offsets, HUD layout, etc.) |

pub mod assets;
pub mod consts;
pub mod draw;
pub mod engine;
pub mod geometry;
pub mod render;
pub mod store;
pub mod viewport;
pub mod web;

#[cfg(test)]
#[path = "fixtures_test.rs"]
pub(crate) mod fixtures;
