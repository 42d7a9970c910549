//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! newest published message lives in a single-slot `watch` channel: a publish
//! replaces it wholesale, readers clone an `Arc` and never observe a partial
//! value, and every viewer task is woken to push the replacement.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use crate::config::RelayConfig;
use crate::services::tables::Tables;

// =============================================================================
// PUBLISHED MESSAGE
// =============================================================================

/// One accepted message, stored exactly as it was received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    /// Monotonic sequence number, starting at 1.
    pub seq: u64,
    pub command: String,
    pub raw: String,
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub tables: Arc<Tables>,
    latest: Arc<watch::Sender<Option<Arc<Published>>>>,
    seq: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(config: RelayConfig, tables: Tables) -> Self {
        let (latest, _) = watch::channel(None);
        Self { config: Arc::new(config), tables: Arc::new(tables), latest: Arc::new(latest), seq: Arc::new(AtomicU64::new(0)) }
    }

    /// The newest published message, if any.
    #[must_use]
    pub fn latest(&self) -> Option<Arc<Published>> {
        self.latest.borrow().clone()
    }

    /// Receiver that wakes on every publish.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Published>>> {
        self.latest.subscribe()
    }

    /// Replace the newest message and wake all viewers.
    pub fn store(&self, command: String, raw: String) -> Arc<Published> {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
        let published = Arc::new(Published { seq, command, raw });
        self.latest.send_replace(Some(Arc::clone(&published)));
        published
    }

    /// Number of live viewer subscriptions.
    #[must_use]
    pub fn viewer_count(&self) -> usize {
        self.latest.receiver_count()
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use std::net::SocketAddr;
    use std::time::Duration;

    use wire::{AgentTable, WeaponTable};

    use super::*;

    /// State with small tables and a fast push interval.
    #[must_use]
    pub fn test_app_state() -> AppState {
        test_app_state_with(RelayConfig { push_interval: Duration::from_millis(5), ..RelayConfig::default() })
    }

    #[must_use]
    pub fn test_app_state_with(config: RelayConfig) -> AppState {
        let tables = Tables {
            agents: AgentTable::new(vec!["Astra".into(), "Breach".into(), "Sova".into()]),
            weapons: WeaponTable::new(vec!["Classic".into(), "Vandal".into()]),
        };
        AppState::new(config, tables)
    }

    /// Serve the full router on an ephemeral port.
    pub async fn spawn_app(state: AppState) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        let app = crate::routes::app(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server failed");
        });
        addr
    }

    /// A valid render message with `n` players.
    #[must_use]
    pub fn render_json(map: &str, n: usize) -> String {
        let players: Vec<serde_json::Value> = (0..n)
            .map(|i| {
                serde_json::json!({
                    "map_position_x": 500.0 + i as f64,
                    "map_position_y": 510.0,
                    "networkable": true,
                    "health": 100,
                    "weapon_name": "Vandal",
                    "weapon_index": 1,
                    "is_ability": false,
                    "agent_index": 0,
                    "team": "enemy",
                    "rotation": { "x": 0.0, "y": 90.0, "z": 0.0 },
                })
            })
            .collect();
        serde_json::json!({
            "command": "render",
            "entity_count": n,
            "map_name": map,
            "local_map_coordinate": [512.0, 512.0],
            "local_view_angle_y": 0.0,
            "local_view_angle_x": 0.0,
            "local_agent_index": 0,
            "players": players,
        })
        .to_string()
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
