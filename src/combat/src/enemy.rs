// src/combat/src/enemy.rs

use character::{AiKind, Character, EnemyProfile, ItemDrop, Stats};
use rand::Rng;
use rand::seq::IndexedRandom;

/// Static description of an enemy kind at its base level.
#[derive(Debug, Clone)]
pub struct EnemyTemplate {
    pub id: String,
    pub name: String,
    pub base_level: u32,
    pub stats: Stats,
    pub experience_reward: u32,
    pub gold_reward: u32,
    pub item_drops: Vec<ItemDrop>,
    pub ai: AiKind,
}

/// Per-level scaling applied when an enemy spawns above its base level.
mod scaling {
    pub const HEALTH: u32 = 8;
    pub const ATTACK: u32 = 2;
    pub const DEFENSE: u32 = 1;
    pub const AGILITY: u32 = 1;
    pub const EXPERIENCE: u32 = 5;
    pub const GOLD: u32 = 3;
}

/// Builds per-encounter enemy [`Character`]s from templates, with level
/// scaling. Spawned enemies are discarded when their combat session ends.
#[derive(Debug, Clone)]
pub struct EnemyFactory {
    templates: Vec<EnemyTemplate>,
}

impl EnemyFactory {
    /// Templates are kept sorted by base level so "weakest" is well defined.
    pub fn from_templates(templates: impl IntoIterator<Item = EnemyTemplate>) -> Self {
        let mut templates: Vec<EnemyTemplate> = templates.into_iter().collect();
        templates.sort_by_key(|t| t.base_level);
        Self { templates }
    }

    pub fn template(&self, id: &str) -> Option<&EnemyTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Spawn a specific enemy kind at `level` (clamped to at least the
    /// template's base level).
    pub fn spawn(&self, id: &str, level: u32) -> Option<Character> {
        let template = self.template(id)?;
        Some(build(template, level.max(template.base_level)))
    }

    /// Spawn a random-encounter enemy near the player's level: a uniform
    /// pick among templates whose base level falls in
    /// `[player_level - 2, player_level + 2]`. When that band is empty, the
    /// weakest template is scaled up toward the player instead.
    pub fn spawn_for_level(&self, player_level: u32, rng: &mut impl Rng) -> Option<Character> {
        let low = player_level.saturating_sub(2);
        let high = player_level + 2;

        let band: Vec<&EnemyTemplate> = self
            .templates
            .iter()
            .filter(|t| t.base_level >= low && t.base_level <= high)
            .collect();

        if let Some(&template) = band.choose(rng) {
            return Some(build(template, template.base_level));
        }

        // Band empty: level-adjusted weakest enemy.
        let weakest = self.templates.first()?;
        Some(build(weakest, player_level.saturating_sub(1).max(weakest.base_level)))
    }
}

fn build(template: &EnemyTemplate, level: u32) -> Character {
    let delta = level - template.base_level;
    let mut stats = template.stats;
    stats.max_health += scaling::HEALTH * delta;
    stats.health = stats.max_health;
    stats.attack += scaling::ATTACK * delta;
    stats.defense += scaling::DEFENSE * delta;
    stats.agility += scaling::AGILITY * delta;

    Character::new_enemy(
        template.name.clone(),
        level,
        stats,
        EnemyProfile {
            experience_reward: template.experience_reward + scaling::EXPERIENCE * delta,
            gold_reward: template.gold_reward + scaling::GOLD * delta,
            item_drops: template.item_drops.clone(),
            ai: template.ai,
        },
    )
}

fn drop_entry(item_id: &str, chance: f64) -> ItemDrop {
    ItemDrop {
        item_id: item_id.to_string(),
        chance,
    }
}

/// The built-in bestiary.
pub fn default_templates() -> Vec<EnemyTemplate> {
    vec![
        EnemyTemplate {
            id: "goblin".to_string(),
            name: "Goblin".to_string(),
            base_level: 1,
            stats: Stats::new(30, 0, 8, 3, 6, 1),
            experience_reward: 15,
            gold_reward: 8,
            item_drops: vec![drop_entry("goblin_ear", 0.5), drop_entry("health_potion", 0.2)],
            ai: AiKind::Aggressive,
        },
        EnemyTemplate {
            id: "wolf".to_string(),
            name: "Grey Wolf".to_string(),
            base_level: 2,
            stats: Stats::new(45, 0, 12, 4, 12, 1),
            experience_reward: 25,
            gold_reward: 5,
            item_drops: vec![drop_entry("wolf_pelt", 0.6)],
            ai: AiKind::Aggressive,
        },
        EnemyTemplate {
            id: "bandit".to_string(),
            name: "Bandit".to_string(),
            base_level: 3,
            stats: Stats::new(60, 10, 14, 6, 9, 4),
            experience_reward: 40,
            gold_reward: 20,
            item_drops: vec![drop_entry("health_potion", 0.3)],
            ai: AiKind::Defensive,
        },
        EnemyTemplate {
            id: "skeleton".to_string(),
            name: "Skeleton Warrior".to_string(),
            base_level: 4,
            stats: Stats::new(70, 0, 16, 8, 7, 1),
            experience_reward: 55,
            gold_reward: 12,
            item_drops: vec![drop_entry("iron_sword", 0.15)],
            ai: AiKind::Aggressive,
        },
        EnemyTemplate {
            id: "cave_troll".to_string(),
            name: "Cave Troll".to_string(),
            base_level: 6,
            stats: Stats::new(120, 0, 20, 10, 4, 1),
            experience_reward: 90,
            gold_reward: 45,
            item_drops: vec![drop_entry("steel_sword", 0.1), drop_entry("health_potion", 0.4)],
            ai: AiKind::Defensive,
        },
    ]
}

impl Default for EnemyFactory {
    fn default() -> Self {
        Self::from_templates(default_templates())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn spawn_scales_stats_and_rewards_with_level() {
        let factory = EnemyFactory::default();
        let base = factory.spawn("goblin", 1).unwrap();
        let scaled = factory.spawn("goblin", 3).unwrap();

        assert_eq!(base.stats.max_health, 30);
        assert_eq!(scaled.stats.max_health, 30 + 16);
        assert_eq!(scaled.stats.health, scaled.stats.max_health);
        assert_eq!(scaled.stats.attack, 8 + 4);
        assert_eq!(scaled.enemy.as_ref().unwrap().experience_reward, 25);
        assert_eq!(scaled.enemy.as_ref().unwrap().gold_reward, 14);
    }

    #[test]
    fn unknown_template_yields_none() {
        let factory = EnemyFactory::default();
        assert!(factory.spawn("dragon", 5).is_none());
    }

    #[test]
    fn encounter_pick_stays_inside_the_level_band() {
        let factory = EnemyFactory::default();
        let mut rng = Pcg64Mcg::seed_from_u64(11);
        for _ in 0..50 {
            let enemy = factory.spawn_for_level(3, &mut rng).unwrap();
            assert!((1..=5).contains(&enemy.level), "level {}", enemy.level);
        }
    }

    #[test]
    fn empty_band_falls_back_to_scaled_weakest() {
        let factory = EnemyFactory::default();
        let mut rng = Pcg64Mcg::seed_from_u64(11);
        // Highest base level is 6; a level-20 player has an empty band.
        let enemy = factory.spawn_for_level(20, &mut rng).unwrap();
        assert_eq!(enemy.name, "Goblin");
        assert_eq!(enemy.level, 19);
    }
}
