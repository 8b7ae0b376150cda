// src/character/src/core.rs

use items::{EffectTarget, Inventory, StatName};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::equipment::Equipment;
use crate::skills::Skill;
use crate::stats::Stats;
use crate::status::{StatusEffect, StatusKind};

/// Experience required to reach level 2.
pub const BASE_EXPERIENCE_TO_NEXT: u32 = 100;
/// Per-level growth factor for the experience curve, floored after scaling.
pub const EXPERIENCE_CURVE: f32 = 1.2;

/// Flat stat increases granted by each level-up.
const LEVEL_UP_HEALTH: u32 = 15;
const LEVEL_UP_MANA: u32 = 8;
const LEVEL_UP_ATTACK: u32 = 3;
const LEVEL_UP_DEFENSE: u32 = 2;
const LEVEL_UP_AGILITY: u32 = 2;
const LEVEL_UP_INTELLIGENCE: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterKind {
    Player,
    Enemy,
    Npc,
}

/// Behavioural tag consumed by the combat AI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiKind {
    Aggressive,
    Defensive,
}

/// One entry in an enemy's drop table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDrop {
    pub item_id: String,
    /// Independent roll probability in `[0, 1]`.
    pub chance: f64,
}

/// Reward data carried only by enemy characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyProfile {
    pub experience_reward: u32,
    pub gold_reward: u32,
    pub item_drops: Vec<ItemDrop>,
    pub ai: AiKind,
}

/// A combat-capable actor: the single long-lived player, or a per-encounter
/// enemy built by the factory and discarded when combat resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub kind: CharacterKind,
    pub level: u32,
    pub experience: u32,
    pub experience_to_next: u32,
    pub stats: Stats,
    pub inventory: Inventory,
    pub equipment: Equipment,
    pub gold: u32,
    pub skills: Vec<String>,
    pub status_effects: Vec<StatusEffect>,
    /// Reward fields; present only on enemies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enemy: Option<EnemyProfile>,
}

impl Character {
    /// The player character created once at new-game time.
    pub fn new_player(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: CharacterKind::Player,
            level: 1,
            experience: 0,
            experience_to_next: BASE_EXPERIENCE_TO_NEXT,
            stats: Stats::new(100, 50, 15, 8, 10, 8),
            inventory: Inventory::default(),
            equipment: Equipment::default(),
            gold: 30,
            skills: vec!["heal".to_string()],
            status_effects: Vec::new(),
            enemy: None,
        }
    }

    pub fn new_enemy(name: impl Into<String>, level: u32, stats: Stats, profile: EnemyProfile) -> Self {
        Self {
            name: name.into(),
            kind: CharacterKind::Enemy,
            level,
            experience: 0,
            experience_to_next: BASE_EXPERIENCE_TO_NEXT,
            stats,
            inventory: Inventory::default(),
            equipment: Equipment::default(),
            gold: 0,
            skills: Vec::new(),
            status_effects: Vec::new(),
            enemy: Some(profile),
        }
    }

    /// A dead character takes no further actions; this is terminal in combat.
    pub fn is_alive(&self) -> bool {
        self.stats.health > 0
    }

    /// Add experience and resolve any level-ups it pays for. Multi-level
    /// gains from one award are handled in a single call. Returns the number
    /// of levels gained.
    pub fn gain_experience(&mut self, amount: u32) -> u32 {
        self.experience += amount;
        let mut levels = 0;
        while self.experience >= self.experience_to_next {
            self.level_up();
            levels += 1;
        }
        levels
    }

    /// One level: carry the experience remainder, steepen the curve, apply
    /// the flat stat increases, and fully restore health and mana.
    fn level_up(&mut self) {
        self.level += 1;
        self.experience -= self.experience_to_next;
        self.experience_to_next =
            (self.experience_to_next as f32 * EXPERIENCE_CURVE).floor() as u32;

        self.stats.max_health += LEVEL_UP_HEALTH;
        self.stats.max_mana += LEVEL_UP_MANA;
        self.stats.attack += LEVEL_UP_ATTACK;
        self.stats.defense += LEVEL_UP_DEFENSE;
        self.stats.agility += LEVEL_UP_AGILITY;
        self.stats.intelligence += LEVEL_UP_INTELLIGENCE;

        self.stats.health = self.stats.max_health;
        self.stats.mana = self.stats.max_mana;
    }

    /// Base attack plus equipped weapon bonus plus any active attack buffs.
    pub fn attack_total(&self) -> u32 {
        self.stats.attack + self.equipment.attack_bonus() + self.buff_total(StatName::Attack)
    }

    /// Base defense plus equipped armor bonus plus any active defense buffs.
    pub fn defense_total(&self) -> u32 {
        self.stats.defense + self.equipment.defense_bonus() + self.buff_total(StatName::Defense)
    }

    fn buff_total(&self, stat: StatName) -> u32 {
        self.status_effects
            .iter()
            .filter(|e| e.kind == StatusKind::Buff && e.stat == Some(stat))
            .map(|e| e.amount as u32)
            .sum()
    }

    /// Apply incoming damage. An active Defending stance multiplies the raw
    /// amount before defense mitigation, and the result is floored at 1 so
    /// combat can never stalemate at zero. Returns the damage actually dealt.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let mut raw = amount as f32;
        if let Some(guard) = self
            .status_effects
            .iter()
            .find(|e| e.kind == StatusKind::Defending)
        {
            raw *= guard.amount;
        }

        let damage = (raw.floor() as u32)
            .saturating_sub(self.defense_total())
            .max(1);
        self.stats.health = self.stats.health.saturating_sub(damage);
        damage
    }

    /// Restore health, capped at maximum. Returns the amount restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let healed = amount.min(self.stats.max_health - self.stats.health);
        self.stats.health += healed;
        healed
    }

    /// Restore mana, capped at remaining capacity. Returns the amount restored.
    pub fn restore_mana(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.stats.max_mana - self.stats.mana);
        self.stats.mana += restored;
        restored
    }

    /// Pay a skill's mana cost. Fails quietly when the skill is unknown or
    /// mana is short; the caller then applies `skill.apply(target)` on success.
    pub fn use_skill(&mut self, skill: &Skill) -> bool {
        if !self.skills.iter().any(|id| id == &skill.id) {
            return false;
        }
        if self.stats.mana < skill.mana_cost {
            return false;
        }
        self.stats.mana -= skill.mana_cost;
        true
    }

    pub fn add_status(&mut self, effect: StatusEffect) {
        self.status_effects.push(effect);
    }

    /// Decrement every status effect once and drop the expired ones.
    /// Returns the effects that just expired, for logging.
    pub fn decay_statuses(&mut self) -> Vec<StatusEffect> {
        for effect in &mut self.status_effects {
            effect.duration = effect.duration.saturating_sub(1);
        }
        let (expired, remaining): (Vec<_>, Vec<_>) = self
            .status_effects
            .drain(..)
            .partition(StatusEffect::is_expired);
        self.status_effects = remaining;
        expired
    }

    /// Roll this enemy's drop table: one independent roll per entry.
    /// The caller decides where the dropped items go.
    pub fn roll_item_drops(&self, rng: &mut impl Rng) -> Vec<String> {
        let Some(profile) = &self.enemy else {
            return Vec::new();
        };
        profile
            .item_drops
            .iter()
            .filter(|drop| rng.random_bool(drop.chance.clamp(0.0, 1.0)))
            .map(|drop| drop.item_id.clone())
            .collect()
    }
}

impl EffectTarget for Character {
    fn heal(&mut self, amount: u32) -> u32 {
        Character::heal(self, amount)
    }

    fn restore_mana(&mut self, amount: u32) -> u32 {
        Character::restore_mana(self, amount)
    }

    fn apply_buff(&mut self, stat: StatName, amount: u32, duration: u32) {
        self.add_status(StatusEffect::buff(stat, amount, duration));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn enemy_profile() -> EnemyProfile {
        EnemyProfile {
            experience_reward: 15,
            gold_reward: 8,
            item_drops: vec![
                ItemDrop {
                    item_id: "goblin_ear".to_string(),
                    chance: 1.0,
                },
                ItemDrop {
                    item_id: "old_key".to_string(),
                    chance: 0.0,
                },
            ],
            ai: AiKind::Aggressive,
        }
    }

    #[test]
    fn single_level_up_applies_flat_gains_and_restores() {
        let mut player = Character::new_player("Aria");
        player.stats.health = 40;
        player.stats.mana = 5;

        let levels = player.gain_experience(100);
        assert_eq!(levels, 1);
        assert_eq!(player.level, 2);
        assert_eq!(player.experience, 0);
        assert_eq!(player.experience_to_next, 120);
        assert_eq!(player.stats.max_health, 115);
        assert_eq!(player.stats.health, 115);
        assert_eq!(player.stats.mana, player.stats.max_mana);
    }

    #[test]
    fn one_award_can_pay_for_multiple_levels() {
        let mut player = Character::new_player("Aria");
        // 100 + 120 + 30 remainder
        let levels = player.gain_experience(250);
        assert_eq!(levels, 2);
        assert_eq!(player.level, 3);
        assert_eq!(player.experience, 30);
        assert_eq!(player.experience_to_next, 144);
    }

    #[test]
    fn damage_is_floored_at_one_against_heavy_armor() {
        let mut tank = Character::new_player("Bastion");
        tank.stats.defense = 500;
        let dealt = tank.take_damage(3);
        assert_eq!(dealt, 1);
        assert_eq!(tank.stats.health, 99);
    }

    #[test]
    fn lethal_damage_zeroes_health_and_ends_life() {
        let mut goblin = Character::new_enemy(
            "Goblin",
            1,
            Stats::new(10, 0, 5, 0, 6, 1),
            enemy_profile(),
        );
        let dealt = goblin.take_damage(50);
        assert_eq!(dealt, 50);
        assert_eq!(goblin.stats.health, 0);
        assert!(!goblin.is_alive());
    }

    #[test]
    fn defending_stance_halves_incoming_damage() {
        let mut player = Character::new_player("Aria");
        player.stats.defense = 0;
        player.add_status(StatusEffect::defending());
        // 40 * 0.5 = 20 raw, no defense
        assert_eq!(player.take_damage(40), 20);
    }

    #[test]
    fn heal_and_mana_are_capped() {
        let mut player = Character::new_player("Aria");
        player.stats.health = 90;
        player.stats.mana = 45;
        assert_eq!(player.heal(100), 10);
        assert_eq!(player.restore_mana(100), 5);
        assert_eq!(player.stats.health, player.stats.max_health);
        assert_eq!(player.stats.mana, player.stats.max_mana);
    }

    #[test]
    fn skill_fails_quietly_without_mana_or_knowledge() {
        use crate::skills::SkillBook;
        let book = SkillBook::default();
        let heal = book.get("heal").unwrap();
        let fireball = book.get("fireball").unwrap();

        let mut player = Character::new_player("Aria");
        player.stats.mana = 5;
        assert!(!player.use_skill(heal));
        assert_eq!(player.stats.mana, 5);

        player.stats.mana = 50;
        // fireball is not in the player's skill list
        assert!(!player.use_skill(fireball));
        assert_eq!(player.stats.mana, 50);

        assert!(player.use_skill(heal));
        assert_eq!(player.stats.mana, 35);
    }

    #[test]
    fn status_decay_removes_expired_effects_once() {
        let mut player = Character::new_player("Aria");
        player.add_status(StatusEffect::buff(StatName::Attack, 5, 1));
        player.add_status(StatusEffect::defending());

        let expired = player.decay_statuses();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].kind, StatusKind::Buff);
        assert_eq!(player.status_effects.len(), 1);

        // The guard stance carries two ticks and survives exactly one decay.
        let expired = player.decay_statuses();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].kind, StatusKind::Defending);
        assert!(player.status_effects.is_empty());
    }

    #[test]
    fn drop_rolls_are_independent_per_entry() {
        use rand::SeedableRng;
        let goblin = Character::new_enemy(
            "Goblin",
            1,
            Stats::new(30, 0, 8, 3, 6, 1),
            enemy_profile(),
        );
        let mut rng = rand_pcg::Pcg64Mcg::seed_from_u64(7);
        let drops = goblin.roll_item_drops(&mut rng);
        // chance 1.0 always drops, chance 0.0 never does
        assert_eq!(drops, vec!["goblin_ear".to_string()]);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Level and the experience curve only move forward, and every
            // level-up leaves the character fully restored.
            #[test]
            fn leveling_is_monotonic(awards in prop::collection::vec(0u32..400, 0..25)) {
                let mut player = Character::new_player("Aria");
                let mut last_level = player.level;
                let mut last_curve = player.experience_to_next;
                for amount in awards {
                    let gained = player.gain_experience(amount);
                    prop_assert!(player.level >= last_level);
                    prop_assert!(player.experience_to_next >= last_curve);
                    if gained > 0 {
                        prop_assert_eq!(player.stats.health, player.stats.max_health);
                        prop_assert_eq!(player.stats.mana, player.stats.max_mana);
                    }
                    last_level = player.level;
                    last_curve = player.experience_to_next;
                }
            }

            // A living target always takes at least 1 damage, however
            // lopsided the attack/defense ratio.
            #[test]
            fn damage_floor_holds(amount in 0u32..1000, defense in 0u32..1000) {
                let mut target = Character::new_player("Bastion");
                target.stats.defense = defense;
                let dealt = target.take_damage(amount);
                prop_assert!(dealt >= 1);
            }
        }
    }
}
