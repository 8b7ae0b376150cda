// src/character/src/stats.rs

use serde::{Deserialize, Serialize};

/// Core stat block shared by players and enemies.
///
/// `health` stays within `[0, max_health]` and `mana` within `[0, max_mana]`;
/// the mutators on [`crate::Character`] uphold this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub health: u32,
    pub max_health: u32,
    pub mana: u32,
    pub max_mana: u32,
    pub attack: u32,
    pub defense: u32,
    pub agility: u32,
    pub intelligence: u32,
}

impl Stats {
    /// Full-health stat block.
    pub fn new(
        max_health: u32,
        max_mana: u32,
        attack: u32,
        defense: u32,
        agility: u32,
        intelligence: u32,
    ) -> Self {
        Self {
            health: max_health,
            max_health,
            mana: max_mana,
            max_mana,
            attack,
            defense,
            agility,
            intelligence,
        }
    }

    pub fn health_ratio(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }
}
