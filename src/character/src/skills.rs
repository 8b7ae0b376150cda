// src/character/src/skills.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::Character;

/// What a skill does when it resolves against a target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillEffect {
    Heal { amount: u32 },
    Damage { amount: u32 },
}

/// A learnable skill. Characters reference skills by id; the definitions
/// live in a [`SkillBook`] the way item definitions live in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub mana_cost: u32,
    pub effect: SkillEffect,
}

impl Skill {
    /// Resolve this skill's effect against `target`, returning a message for
    /// the log. Mana accounting happens in [`Character::use_skill`].
    pub fn apply(&self, target: &mut Character) -> String {
        match self.effect {
            SkillEffect::Heal { amount } => {
                let healed = target.heal(amount);
                format!("{} recovers {} health.", target.name, healed)
            }
            SkillEffect::Damage { amount } => {
                let dealt = target.take_damage(amount);
                format!("{} takes {} damage.", target.name, dealt)
            }
        }
    }
}

/// Static registry of skill definitions keyed by id.
#[derive(Debug, Clone)]
pub struct SkillBook {
    skills: HashMap<String, Skill>,
}

impl SkillBook {
    pub fn from_skills(skills: impl IntoIterator<Item = Skill>) -> Self {
        Self {
            skills: skills.into_iter().map(|s| (s.id.clone(), s)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Skill> {
        self.skills.get(id)
    }
}

impl Default for SkillBook {
    fn default() -> Self {
        Self::from_skills([
            Skill {
                id: "heal".to_string(),
                name: "Healing Light".to_string(),
                mana_cost: 15,
                effect: SkillEffect::Heal { amount: 25 },
            },
            Skill {
                id: "fireball".to_string(),
                name: "Fireball".to_string(),
                mana_cost: 10,
                effect: SkillEffect::Damage { amount: 18 },
            },
        ])
    }
}
