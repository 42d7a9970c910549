//! Builders shared by the unit tests.

use wire::{Entity, Rotation, Snapshot, Team};

use crate::assets::{AssetCache, AssetKey};

pub fn entity(x: f64, y: f64) -> Entity {
    Entity {
        map_position_x: x,
        map_position_y: y,
        networkable: true,
        health: 100,
        weapon_name: "Vandal".into(),
        weapon_index: Some(1),
        is_ability: false,
        agent_index: 1,
        team: Team::Ally,
        rotation: Rotation::default(),
        nickname: None,
    }
}

pub fn enemy(x: f64, y: f64) -> Entity {
    Entity { team: Team::Enemy, ..entity(x, y) }
}

pub fn snapshot(players: Vec<Entity>) -> Snapshot {
    Snapshot {
        command: "render".into(),
        entity_count: players.len(),
        map_name: "Ascent".into(),
        local_map_coordinate: [512.0, 512.0],
        local_view_angle_y: 0.0,
        local_view_angle_x: 0.0,
        local_agent_index: 0,
        players,
    }
}

pub fn to_json(snapshot: &Snapshot) -> String {
    serde_json::to_string(snapshot).unwrap()
}

pub fn names(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{prefix}{i}")).collect()
}

/// Cache with five agents and five weapons, every icon loaded, plus the
/// `Ascent` map.
pub fn loaded_cache() -> AssetCache<()> {
    let mut cache = AssetCache::new();
    cache.set_agent_table(names("agent", 5));
    cache.set_weapon_table(names("weapon", 5));
    cache.request(AssetKey::Map("Ascent".into()));
    for load in cache.take_pending() {
        assert!(cache.complete(load.generation, ()));
    }
    cache
}
