//! Shared wire model for the radar data channel.
//!
//! This crate owns the JSON representation used by the relay, the CLI, and
//! the canvas engine. Every inbound message is a JSON object with a `command`
//! tag; only `"render"` messages carry drawable state and are fully validated
//! into a [`Snapshot`]. Anything else that still carries a `command` string is
//! surfaced as [`Message::Other`] so consumers can fall back to their idle
//! state without treating it as an error.

use serde::{Deserialize, Serialize};

/// The only command whose payload is drawable.
pub const RENDER_COMMAND: &str = "render";

/// Weapon name reported while the held item could not be identified.
pub const UNKNOWN_WEAPON: &str = "Unknown";

/// Error returned by [`classify`] and [`Snapshot::parse`].
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The payload is not JSON, or a render payload is missing required fields.
    #[error("invalid message json: {0}")]
    Json(#[from] serde_json::Error),
    /// The payload is a JSON object without a `command` string.
    #[error("message has no command")]
    MissingCommand,
    /// The payload is well formed but its command is not drawable.
    #[error("command `{0}` is not drawable")]
    NotRenderable(String),
    /// `entity_count` disagrees with the number of `players`.
    #[error("entity_count {declared} does not match {actual} players")]
    CountMismatch { declared: usize, actual: usize },
}

/// Which side of the match an entity is on, relative to the viewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    /// Same team as the viewer.
    #[serde(alias = "self")]
    Ally,
    /// Opposing team.
    Enemy,
}

/// Euler rotation in degrees. Only `y` (yaw) affects the radar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    #[serde(default)]
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

/// One observed actor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// World-space x on the map image grid.
    pub map_position_x: f64,
    /// World-space y on the map image grid.
    pub map_position_y: f64,
    /// `false` when position and state may be stale or synthetic.
    pub networkable: bool,
    /// Remaining health; `<= 0` is the defeated state.
    pub health: i32,
    /// Display name of the held item, or the ability name while `is_ability`.
    #[serde(default)]
    pub weapon_name: String,
    /// Index into the weapon table. Absent while an ability is held.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weapon_index: Option<usize>,
    /// Holding an ability rather than a weapon.
    pub is_ability: bool,
    /// Index into the agent table.
    pub agent_index: usize,
    pub team: Team,
    /// Facing; `rotation.y` is the yaw in degrees.
    pub rotation: Rotation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

impl Entity {
    /// World position as an `(x, y)` pair.
    #[must_use]
    pub fn position(&self) -> (f64, f64) {
        (self.map_position_x, self.map_position_y)
    }

    /// Whether the entity is in the defeated state.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }
}

/// The complete drawable state for one tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub command: String,
    pub entity_count: usize,
    /// Key of the background map asset.
    pub map_name: String,
    /// `[x, y]` world position of the viewer.
    pub local_map_coordinate: [f64; 2],
    /// Viewer yaw in degrees.
    pub local_view_angle_y: f64,
    /// Viewer pitch in degrees. Carried on the wire, unused by the radar.
    #[serde(default)]
    pub local_view_angle_x: f64,
    /// Index into the agent table for the viewer's own icon.
    pub local_agent_index: usize,
    #[serde(default)]
    pub players: Vec<Entity>,
}

impl Snapshot {
    /// Parse a raw message that must be a valid render snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::NotRenderable`] for well-formed messages with any
    /// other command, and the [`classify`] errors otherwise.
    pub fn parse(raw: &str) -> Result<Self, WireError> {
        match classify(raw)? {
            Message::Render(snapshot) => Ok(snapshot),
            Message::Other(command) => Err(WireError::NotRenderable(command)),
        }
    }

    /// Check the structural invariants of a render snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::NotRenderable`] when `command` is not `"render"`
    /// and [`WireError::CountMismatch`] when `entity_count` is inconsistent.
    pub fn validate(&self) -> Result<(), WireError> {
        if !self.is_render() {
            return Err(WireError::NotRenderable(self.command.clone()));
        }
        if self.entity_count != self.players.len() {
            return Err(WireError::CountMismatch { declared: self.entity_count, actual: self.players.len() });
        }
        Ok(())
    }

    #[must_use]
    pub fn is_render(&self) -> bool {
        self.command == RENDER_COMMAND
    }

    /// Viewer world position as an `(x, y)` pair.
    #[must_use]
    pub fn local_position(&self) -> (f64, f64) {
        (self.local_map_coordinate[0], self.local_map_coordinate[1])
    }
}

/// A classified inbound message.
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    /// A validated, drawable snapshot.
    Render(Snapshot),
    /// A well-formed message with a non-drawable command.
    Other(String),
}

#[derive(Deserialize)]
struct Envelope {
    command: Option<String>,
}

/// Classify a raw text message from the data channel.
///
/// # Errors
///
/// Returns [`WireError::Json`] for unparseable input or render messages with
/// missing fields, [`WireError::MissingCommand`] for objects without a
/// `command`, and [`WireError::CountMismatch`] for inconsistent counts.
pub fn classify(raw: &str) -> Result<Message, WireError> {
    let envelope: Envelope = serde_json::from_str(raw)?;
    let Some(command) = envelope.command else {
        return Err(WireError::MissingCommand);
    };
    if command != RENDER_COMMAND {
        return Ok(Message::Other(command));
    }

    let snapshot: Snapshot = serde_json::from_str(raw)?;
    snapshot.validate()?;
    Ok(Message::Render(snapshot))
}

// =============================================================================
// ASSET TABLES
// =============================================================================

/// Ordered agent icon names; `agent_index` values point into `agents`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentTable {
    pub agents: Vec<String>,
    #[serde(default)]
    pub total_agents: usize,
}

impl AgentTable {
    #[must_use]
    pub fn new(agents: Vec<String>) -> Self {
        let total_agents = agents.len();
        Self { agents, total_agents }
    }

    /// Recompute `total_agents` from the list, which is authoritative.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self::new(self.agents)
    }
}

/// Ordered weapon icon names; `weapon_index` values point into `weapons`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponTable {
    pub weapons: Vec<String>,
    #[serde(default)]
    pub total_weapons: usize,
}

impl WeaponTable {
    #[must_use]
    pub fn new(weapons: Vec<String>) -> Self {
        let total_weapons = weapons.len();
        Self { weapons, total_weapons }
    }

    /// Recompute `total_weapons` from the list, which is authoritative.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self::new(self.weapons)
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
