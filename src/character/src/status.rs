// src/character/src/status.rs

use items::StatName;
use serde::{Deserialize, Serialize};

/// Kinds of timed modifiers a character can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    /// Temporary stat increase from an item or skill.
    Buff,
    /// Guard stance; incoming damage is multiplied by `amount`.
    Defending,
    /// Flat damage absorption granted by shrines.
    Shield,
}

/// A timed modifier. `duration` is decremented once per combat turn and the
/// effect is removed when it reaches zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Stat a buff raises; `None` for defending/shield.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat: Option<StatName>,
    pub amount: f32,
    pub duration: u32,
}

impl StatusEffect {
    pub fn buff(stat: StatName, amount: u32, duration: u32) -> Self {
        Self {
            kind: StatusKind::Buff,
            stat: Some(stat),
            amount: amount as f32,
            duration,
        }
    }

    /// Guard stance: halves incoming damage. Two decay ticks, because the
    /// per-round decay pass runs before the opposing action resolves; one
    /// tick is consumed the same round, the second covers that action.
    pub fn defending() -> Self {
        Self {
            kind: StatusKind::Defending,
            stat: None,
            amount: 0.5,
            duration: 2,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.duration == 0
    }
}
