// src/items/src/item.rs

use serde::{Deserialize, Serialize};
use strum::Display;

/// Broad item grouping used for inventory tabs and catalog filtering.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    #[strum(serialize = "Weapons")]
    Weapons,
    #[strum(serialize = "Armor")]
    Armor,
    #[strum(serialize = "Consumables")]
    Consumables,
    #[strum(serialize = "Misc")]
    Misc,
}

/// Equipment slot an item can occupy.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipSlot {
    #[strum(serialize = "Weapon")]
    Weapon,
    #[strum(serialize = "Armor")]
    Armor,
    #[strum(serialize = "Accessory")]
    Accessory,
}

/// Stat a buff effect can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatName {
    Attack,
    Defense,
    Agility,
    Intelligence,
}

/// Stat bonuses granted while an item is equipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStats {
    #[serde(default)]
    pub attack: u32,
    #[serde(default)]
    pub defense: u32,
    #[serde(default)]
    pub intelligence: u32,
}

/// What happens when a usable item is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Heal,
    RestoreMana,
    Buff,
}

/// Effect payload for usable items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEffect {
    #[serde(rename = "type")]
    pub kind: EffectKind,
    pub amount: u32,
    /// Which stat a buff raises. Ignored for heal/mana effects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat: Option<StatName>,
    /// Buff duration in combat turns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

/// Immutable item definition looked up by id in the [`crate::ItemCatalog`].
///
/// Inventory slots carry a copy of the definition so that display code never
/// needs a catalog reference; the definition itself never changes at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: ItemCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equip_slot: Option<EquipSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<ItemStats>,
    pub value: u32,
    pub stackable: bool,
    pub usable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<ItemEffect>,
}

impl ItemDef {
    /// Attack bonus while equipped (0 for items without stats).
    pub fn attack_bonus(&self) -> u32 {
        self.stats.map_or(0, |s| s.attack)
    }

    /// Defense bonus while equipped (0 for items without stats).
    pub fn defense_bonus(&self) -> u32 {
        self.stats.map_or(0, |s| s.defense)
    }

    pub fn is_equippable(&self) -> bool {
        self.equip_slot.is_some()
    }
}
