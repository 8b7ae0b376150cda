// src/character/src/lib.rs

pub mod core;
pub mod equipment;
pub mod skills;
pub mod stats;
pub mod status;

pub use crate::core::{AiKind, Character, CharacterKind, EnemyProfile, ItemDrop};
pub use crate::equipment::{EquipError, Equipment};
pub use crate::skills::{Skill, SkillBook, SkillEffect};
pub use crate::stats::Stats;
pub use crate::status::{StatusEffect, StatusKind};
