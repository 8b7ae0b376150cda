// src/save/src/lib.rs
//! Versioned save snapshots, slot management and storage backends.

use std::collections::HashMap;

use character::Character;
use error::GameError;
use serde::{Deserialize, Serialize};

pub mod assoc;
pub mod store;

pub use crate::store::{FileStore, MemoryStore, SaveStore};

/// Format version written into every snapshot.
pub const SAVE_VERSION: u32 = 1;
/// Slots are numbered `0..MAX_SLOTS`.
pub const MAX_SLOTS: u32 = 3;
/// Slot used by the autosave timer and save shrines.
pub const AUTOSAVE_SLOT: u32 = 0;

/// Quest tracking state in its persisted shape: association lists, sorted
/// by key on export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestSnapshot {
    pub active: Vec<(String, Vec<(String, u32)>)>,
    pub completed: Vec<String>,
}

/// The full serializable game state. Everything needed to reconstruct a
/// session lives here; transient state (combat, pending timers) does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub player: Character,
    pub current_scene: String,
    /// World flags such as opened chests. A real map in memory, pairs on
    /// disk.
    #[serde(with = "assoc")]
    pub game_flags: HashMap<String, String>,
    pub quests: QuestSnapshot,
    /// Unix seconds at the moment of the save.
    pub save_time: u64,
    /// Accumulated in-game seconds.
    pub play_time: u64,
}

impl SaveData {
    /// Structural validation after decoding. Decoding alone accepts any
    /// well-typed snapshot; this rejects ones that would put the game into
    /// an impossible state.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.version != SAVE_VERSION {
            return Err(GameError::VersionMismatch(self.version));
        }
        if self.player.name.trim().is_empty() {
            return Err(GameError::CorruptedSave("player name is empty".into()));
        }
        let stats = &self.player.stats;
        if stats.max_health == 0 {
            return Err(GameError::CorruptedSave("player has no health pool".into()));
        }
        if stats.health > stats.max_health || stats.mana > stats.max_mana {
            return Err(GameError::CorruptedSave(
                "player stats exceed their maximums".into(),
            ));
        }
        if self.current_scene.trim().is_empty() {
            return Err(GameError::CorruptedSave("current scene is empty".into()));
        }
        Ok(())
    }
}

/// Listing entry for the load-game menu, built without deserializing more
/// than the snapshot itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveMetadata {
    pub slot: u32,
    pub player_name: String,
    pub level: u32,
    pub scene: String,
    pub save_time: u64,
    pub play_time: u64,
}

/// Slot-based save manager over a pluggable storage backend.
#[derive(Debug)]
pub struct SaveSystem<S: SaveStore> {
    store: S,
}

impl<S: SaveStore> SaveSystem<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn save(&mut self, slot: u32, data: &SaveData) -> Result<(), GameError> {
        check_slot(slot)?;
        let payload = serde_json::to_string_pretty(data)
            .map_err(|e| GameError::SerializationError(e.to_string()))?;
        self.store.write(slot, &payload)?;
        Ok(())
    }

    pub fn load(&self, slot: u32) -> Result<SaveData, GameError> {
        check_slot(slot)?;
        let payload = self.store.read(slot)?.ok_or(GameError::SaveNotFound)?;
        let data: SaveData = serde_json::from_str(&payload)?;
        data.validate()?;
        Ok(data)
    }

    pub fn delete(&mut self, slot: u32) -> Result<(), GameError> {
        check_slot(slot)?;
        self.store.delete(slot)?;
        Ok(())
    }

    pub fn has_save(&self, slot: u32) -> bool {
        matches!(self.store.read(slot), Ok(Some(_)))
    }

    /// Metadata for every loadable slot. Slots that fail to decode or
    /// validate are skipped rather than poisoning the whole listing.
    pub fn list_saves(&self) -> Vec<SaveMetadata> {
        let Ok(slots) = self.store.occupied_slots() else {
            return Vec::new();
        };
        slots
            .into_iter()
            .filter(|&slot| slot < MAX_SLOTS)
            .filter_map(|slot| {
                let data = self.load(slot).ok()?;
                Some(SaveMetadata {
                    slot,
                    player_name: data.player.name,
                    level: data.player.level,
                    scene: data.current_scene,
                    save_time: data.save_time,
                    play_time: data.play_time,
                })
            })
            .collect()
    }
}

fn check_slot(slot: u32) -> Result<(), GameError> {
    if slot < MAX_SLOTS {
        Ok(())
    } else {
        Err(GameError::InvalidSlot)
    }
}
