//! `/actors.json` and `/weapons.json`: icon tables for viewers.

use axum::extract::State;
use axum::response::Json;
use wire::{AgentTable, WeaponTable};

use crate::state::AppState;

/// `GET /actors.json`
pub async fn agents(State(state): State<AppState>) -> Json<AgentTable> {
    Json(state.tables.agents.clone())
}

/// `GET /weapons.json`
pub async fn weapons(State(state): State<AppState>) -> Json<WeaponTable> {
    Json(state.tables.weapons.clone())
}
