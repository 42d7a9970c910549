//! Asset table loading.
//!
//! The agent and weapon tables are small JSON files read once at start-up.
//! A missing or malformed file is logged and replaced by an empty table so
//! the relay still serves snapshots; viewers then draw markers without icons.

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use wire::{AgentTable, WeaponTable};

use crate::config::RelayConfig;

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("read {}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("parse {}: {source}", .path.display())]
    Json { path: PathBuf, source: serde_json::Error },
}

/// Both icon tables, as served to viewers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tables {
    pub agents: AgentTable,
    pub weapons: WeaponTable,
}

impl Tables {
    /// Load both tables named by `config`, falling back to empty tables.
    #[must_use]
    pub fn load(config: &RelayConfig) -> Self {
        let agents = load_or_empty(&config.agent_table, read_agent_table);
        let weapons = load_or_empty(&config.weapon_table, read_weapon_table);
        info!(agents = agents.total_agents, weapons = weapons.total_weapons, "tables loaded");
        Self { agents, weapons }
    }
}

/// Read an agent table; `total_agents` is recomputed from the list.
///
/// # Errors
///
/// Returns [`TableError`] when the file cannot be read or parsed.
pub fn read_agent_table(path: &Path) -> Result<AgentTable, TableError> {
    read_json::<AgentTable>(path).map(AgentTable::normalized)
}

/// Read a weapon table; `total_weapons` is recomputed from the list.
///
/// # Errors
///
/// Returns [`TableError`] when the file cannot be read or parsed.
pub fn read_weapon_table(path: &Path) -> Result<WeaponTable, TableError> {
    read_json::<WeaponTable>(path).map(WeaponTable::normalized)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, TableError> {
    let raw = std::fs::read_to_string(path).map_err(|source| TableError::Io { path: path.to_owned(), source })?;
    serde_json::from_str(&raw).map_err(|source| TableError::Json { path: path.to_owned(), source })
}

fn load_or_empty<T: Default>(path: &Path, read: fn(&Path) -> Result<T, TableError>) -> T {
    match read(path) {
        Ok(table) => table,
        Err(e) => {
            warn!(error = %e, "table unavailable, serving empty table");
            T::default()
        }
    }
}

#[cfg(test)]
#[path = "tables_test.rs"]
mod tests;
