//! Asset resolution: index/name keyed images loaded asynchronously by the host.
//!
//! DESIGN
//! ======
//! The compositor only ever sees opaque [`ImageHandle`]s through the
//! [`AssetResolver`] trait. [`AssetCache`] implements it for any host image
//! type `T`: it queues [`PendingLoad`]s for the host to fetch, and accepts
//! completions tagged with the [`Generation`] they were issued under. Every
//! request gets a fresh, globally unique generation and supersedes any
//! in-flight request for the same key, so a slow load that finishes after a
//! newer one was issued is discarded instead of overwriting it.
//!
//! Indexed tables (agents, weapons) are bounds-checked before lookup: an index
//! past the end of the table is an [`AssetError::OutOfRange`], never a panic.

#[cfg(test)]
#[path = "assets_test.rs"]
mod assets_test;

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;

/// Which indexed icon table a lookup goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Agent,
    Weapon,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Agent => f.write_str("agent"),
            Self::Weapon => f.write_str("weapon"),
        }
    }
}

/// Identifies one loadable image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetKey {
    Agent(usize),
    Weapon(usize),
    Map(String),
}

/// Opaque reference to a loaded image. A new handle is minted for every
/// completed load, so derived data keyed by handle never goes stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageHandle(u32);

impl ImageHandle {
    #[must_use]
    pub fn id(self) -> u32 {
        self.0
    }
}

/// Tag identifying one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(pub u32);

/// A load the host should perform and report back via
/// [`AssetCache::complete`] or [`AssetCache::fail`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLoad {
    pub generation: Generation,
    pub key: AssetKey,
    /// URL path relative to the page.
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetError {
    #[error("{kind} index {index} out of range (table has {len})")]
    OutOfRange { kind: AssetKind, index: usize, len: usize },
}

/// Lookup interface the compositor draws through.
pub trait AssetResolver {
    /// Agent icon by table index.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::OutOfRange`] when `index` is past the table end.
    fn agent_icon(&self, index: usize) -> Result<Option<ImageHandle>, AssetError>;

    /// Weapon icon by table index.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::OutOfRange`] when `index` is past the table end.
    fn weapon_icon(&self, index: usize) -> Result<Option<ImageHandle>, AssetError>;

    /// Map background by name. `None` until loaded.
    fn map_image(&self, name: &str) -> Option<ImageHandle>;
}

/// URL prefixes for each asset family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    pub agents: String,
    pub weapons: String,
    pub maps: String,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self { agents: "assets/agents".into(), weapons: "assets/weapons".into(), maps: "assets/maps".into() }
    }
}

/// Generation-tagged image cache.
#[derive(Debug)]
pub struct AssetCache<T> {
    paths: AssetPaths,
    agents: Vec<String>,
    weapons: Vec<String>,
    ready: HashMap<AssetKey, ImageHandle>,
    images: HashMap<ImageHandle, T>,
    in_flight: HashMap<Generation, AssetKey>,
    latest: HashMap<AssetKey, Generation>,
    pending: Vec<PendingLoad>,
    next_generation: u32,
    next_handle: u32,
}

impl<T> Default for AssetCache<T> {
    fn default() -> Self {
        Self::with_paths(AssetPaths::default())
    }
}

impl<T> AssetCache<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_paths(paths: AssetPaths) -> Self {
        Self {
            paths,
            agents: Vec::new(),
            weapons: Vec::new(),
            ready: HashMap::new(),
            images: HashMap::new(),
            in_flight: HashMap::new(),
            latest: HashMap::new(),
            pending: Vec::new(),
            next_generation: 0,
            next_handle: 0,
        }
    }

    // --- Tables ---

    /// Install the agent table and request every icon in it.
    pub fn set_agent_table(&mut self, names: Vec<String>) {
        self.forget(|key| matches!(key, AssetKey::Agent(_)));
        let count = names.len();
        self.agents = names;
        for index in 0..count {
            self.request(AssetKey::Agent(index));
        }
    }

    /// Install the weapon table and request every icon in it.
    pub fn set_weapon_table(&mut self, names: Vec<String>) {
        self.forget(|key| matches!(key, AssetKey::Weapon(_)));
        let count = names.len();
        self.weapons = names;
        for index in 0..count {
            self.request(AssetKey::Weapon(index));
        }
    }

    #[must_use]
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    #[must_use]
    pub fn weapon_count(&self) -> usize {
        self.weapons.len()
    }

    // --- Requests ---

    /// Issue a load for `key`, superseding any in-flight load for it.
    ///
    /// Returns `None` when `key` indexes past its table. An already loaded
    /// image stays resolvable until the new load completes.
    pub fn request(&mut self, key: AssetKey) -> Option<Generation> {
        let path = self.path_for(&key)?;
        let generation = Generation(self.next_generation);
        self.next_generation = self.next_generation.wrapping_add(1);

        if let Some(previous) = self.latest.insert(key.clone(), generation) {
            self.in_flight.remove(&previous);
            self.pending.retain(|p| p.generation != previous);
        }
        self.in_flight.insert(generation, key.clone());
        self.pending.push(PendingLoad { generation, key, path });
        Some(generation)
    }

    /// Drain loads queued since the last call.
    pub fn take_pending(&mut self) -> Vec<PendingLoad> {
        std::mem::take(&mut self.pending)
    }

    /// Whether `key` has a load outstanding.
    #[must_use]
    pub fn is_in_flight(&self, key: &AssetKey) -> bool {
        self.latest
            .get(key)
            .is_some_and(|g| self.in_flight.contains_key(g))
    }

    /// Accept a finished load. Returns `false` (and drops `image`) when the
    /// generation was superseded or never issued.
    pub fn complete(&mut self, generation: Generation, image: T) -> bool {
        let Some(key) = self.in_flight.remove(&generation) else {
            return false;
        };

        let handle = ImageHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        if let Some(old) = self.ready.insert(key, handle) {
            self.images.remove(&old);
        }
        self.images.insert(handle, image);
        true
    }

    /// Abandon a load. The key stays unresolved until requested again.
    pub fn fail(&mut self, generation: Generation) -> bool {
        self.in_flight.remove(&generation).is_some()
    }

    /// The host image behind `handle`.
    #[must_use]
    pub fn image(&self, handle: ImageHandle) -> Option<&T> {
        self.images.get(&handle)
    }

    /// Resolve a key without bounds checking against the tables.
    #[must_use]
    pub fn handle(&self, key: &AssetKey) -> Option<ImageHandle> {
        self.ready.get(key).copied()
    }

    // --- Helpers ---

    fn path_for(&self, key: &AssetKey) -> Option<String> {
        match key {
            AssetKey::Agent(i) => self.agents.get(*i).map(|n| format!("{}/{n}.png", self.paths.agents)),
            AssetKey::Weapon(i) => self.weapons.get(*i).map(|n| format!("{}/{n}.png", self.paths.weapons)),
            AssetKey::Map(name) => Some(format!("{}/{name}.png", self.paths.maps)),
        }
    }

    fn forget(&mut self, pred: impl Fn(&AssetKey) -> bool) {
        let images = &mut self.images;
        self.ready.retain(|key, handle| {
            let keep = !pred(key);
            if !keep {
                images.remove(handle);
            }
            keep
        });
        self.in_flight.retain(|_, key| !pred(key));
        self.latest.retain(|key, _| !pred(key));
        self.pending.retain(|p| !pred(&p.key));
    }

    fn indexed(&self, kind: AssetKind, index: usize) -> Result<Option<ImageHandle>, AssetError> {
        let (len, key) = match kind {
            AssetKind::Agent => (self.agents.len(), AssetKey::Agent(index)),
            AssetKind::Weapon => (self.weapons.len(), AssetKey::Weapon(index)),
        };
        if index >= len {
            return Err(AssetError::OutOfRange { kind, index, len });
        }
        Ok(self.handle(&key))
    }
}

impl<T> AssetResolver for AssetCache<T> {
    fn agent_icon(&self, index: usize) -> Result<Option<ImageHandle>, AssetError> {
        self.indexed(AssetKind::Agent, index)
    }

    fn weapon_icon(&self, index: usize) -> Result<Option<ImageHandle>, AssetError> {
        self.indexed(AssetKind::Weapon, index)
    }

    fn map_image(&self, name: &str) -> Option<ImageHandle> {
        self.handle(&AssetKey::Map(name.to_owned()))
    }
}

// =============================================================================
// MASK CACHE
// =============================================================================

/// Derived-image cache: builds a value once per key and reuses it.
///
/// Used for circle-masked icons so the source bitmap is never mutated and the
/// mask is applied once per image rather than once per draw.
#[derive(Debug)]
pub struct MaskCache<K, V> {
    entries: HashMap<K, V>,
}

impl<K, V> Default for MaskCache<K, V> {
    fn default() -> Self {
        Self { entries: HashMap::new() }
    }
}

impl<K: Eq + Hash, V> MaskCache<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, building it with `make` on a miss.
    /// A `None` from `make` is not cached, so the next call retries.
    pub fn get_or_insert_with(&mut self, key: K, make: impl FnOnce() -> Option<V>) -> Option<&V> {
        match self.entries.entry(key) {
            Entry::Occupied(entry) => Some(&*entry.into_mut()),
            Entry::Vacant(entry) => Some(&*entry.insert(make()?)),
        }
    }

    /// Drop entries whose key fails `keep`.
    pub fn retain(&mut self, keep: impl Fn(&K) -> bool) {
        self.entries.retain(|k, _| keep(k));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
