use tracing::{debug, info, warn};
use wire::{AgentTable, WeaponTable};

use crate::assets::{AssetCache, AssetKey, AssetPaths, Generation, PendingLoad};
use crate::consts::FPS_SMOOTHING;
use crate::draw::DrawList;
use crate::render::{RenderContext, compose};
use crate::store::{Ingest, SnapshotStore};
use crate::viewport::Viewport;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Exponentially smoothed frame-rate meter.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
    fps: Option<f64>,
}

impl FrameClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame at `now_ms` and return the smoothed rate.
    ///
    /// The first frame has no rate. Timestamps that do not advance are
    /// ignored so a repeated callback cannot produce an infinite sample.
    pub fn tick(&mut self, now_ms: f64) -> Option<f64> {
        if let Some(last) = self.last_ms {
            let dt = now_ms - last;
            if dt > 0.0 {
                let sample = 1000.0 / dt;
                self.fps = Some(match self.fps {
                    Some(fps) => (sample - fps).mul_add(FPS_SMOOTHING, fps),
                    None => sample,
                });
            }
        }
        if self.last_ms.is_none_or(|last| now_ms > last) {
            self.last_ms = Some(now_ms);
        }
        self.fps
    }

    #[must_use]
    pub fn fps(&self) -> Option<f64> {
        self.fps
    }
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Generic over the host image type so it can be tested without WASM/browser
/// dependencies. Inbound messages and load completions mutate it between
/// frames; [`EngineCore::frame`] reads it.
pub struct EngineCore<T> {
    pub store: SnapshotStore,
    pub viewport: Viewport,
    pub assets: AssetCache<T>,
    pub clock: FrameClock,
    last_map: Option<String>,
}

impl<T> Default for EngineCore<T> {
    fn default() -> Self {
        Self::with_paths(AssetPaths::default())
    }
}

impl<T> EngineCore<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_paths(paths: AssetPaths) -> Self {
        Self {
            store: SnapshotStore::new(),
            viewport: Viewport::default(),
            assets: AssetCache::with_paths(paths),
            clock: FrameClock::new(),
            last_map: None,
        }
    }

    // --- Data inputs ---

    /// Apply one inbound text message. Returns whether a drawable snapshot is
    /// now current.
    pub fn on_message(&mut self, raw: &str) -> bool {
        match self.store.ingest(raw) {
            Ingest::Replaced => {}
            Ingest::Cleared(command) => debug!(%command, "radar: non-render command, cleared"),
            Ingest::Rejected(e) => warn!(error = %e, "radar: rejected message"),
        }
        self.store.current().is_some()
    }

    /// Window size changed; takes effect on the next frame.
    pub fn on_resize(&mut self, width: f64, height: f64) {
        self.viewport.resize(width, height);
    }

    pub fn set_agent_table(&mut self, table: AgentTable) {
        let table = table.normalized();
        info!(count = table.total_agents, "radar: agent table installed");
        self.assets.set_agent_table(table.agents);
    }

    pub fn set_weapon_table(&mut self, table: WeaponTable) {
        let table = table.normalized();
        info!(count = table.total_weapons, "radar: weapon table installed");
        self.assets.set_weapon_table(table.weapons);
    }

    // --- Loads ---

    /// Loads the host should start now.
    pub fn take_pending_loads(&mut self) -> Vec<PendingLoad> {
        self.assets.take_pending()
    }

    /// A host load finished. Returns `false` when the load was superseded.
    pub fn complete_load(&mut self, generation: Generation, image: T) -> bool {
        let accepted = self.assets.complete(generation, image);
        if !accepted {
            debug!(generation = generation.0, "radar: discarded stale load");
        }
        accepted
    }

    pub fn fail_load(&mut self, generation: Generation) -> bool {
        let known = self.assets.fail(generation);
        if known {
            warn!(generation = generation.0, "radar: image load failed");
        }
        known
    }

    // --- Frame ---

    /// Build the draw list for the frame at `now_ms`.
    pub fn frame(&mut self, now_ms: f64) -> DrawList {
        self.sync_map();
        let fps = self.clock.tick(now_ms);
        compose(&RenderContext { snapshot: self.store.current(), viewport: &self.viewport, assets: &self.assets, fps })
    }

    /// Name of the map most recently requested.
    #[must_use]
    pub fn map_name(&self) -> Option<&str> {
        self.last_map.as_deref()
    }

    /// Request the map image when the current snapshot names a new map.
    fn sync_map(&mut self) {
        let Some(snapshot) = self.store.current() else {
            return;
        };
        if self.last_map.as_deref() == Some(snapshot.map_name.as_str()) {
            return;
        }
        let name = snapshot.map_name.clone();
        info!(map = %name, "radar: map changed");
        self.assets.request(AssetKey::Map(name.clone()));
        self.last_map = Some(name);
    }
}
