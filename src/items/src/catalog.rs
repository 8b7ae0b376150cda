// src/items/src/catalog.rs

use std::collections::HashMap;

use crate::item::{
    EffectKind, EquipSlot, ItemCategory, ItemDef, ItemEffect, ItemStats, StatName,
};

/// Static registry of item definitions keyed by id.
///
/// Pure lookup, no mutable state. Unknown ids return `None` and the caller
/// decides how loudly to complain.
#[derive(Debug, Clone)]
pub struct ItemCatalog {
    defs: HashMap<String, ItemDef>,
}

impl ItemCatalog {
    /// Build a catalog from explicit definitions. Later duplicates win, which
    /// lets content mods override the defaults.
    pub fn from_defs(defs: impl IntoIterator<Item = ItemDef>) -> Self {
        Self {
            defs: defs
                .into_iter()
                .map(|def| (def.id.clone(), def))
                .collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&ItemDef> {
        self.defs.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.defs.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// All definitions in a given category, for shop and inventory screens.
    pub fn by_category(&self, category: ItemCategory) -> Vec<&ItemDef> {
        let mut defs: Vec<&ItemDef> = self
            .defs
            .values()
            .filter(|d| d.category == category)
            .collect();
        defs.sort_by(|a, b| a.id.cmp(&b.id));
        defs
    }
}

impl Default for ItemCatalog {
    fn default() -> Self {
        Self::from_defs(default_defs())
    }
}

fn weapon(id: &str, name: &str, description: &str, attack: u32, value: u32) -> ItemDef {
    ItemDef {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        category: ItemCategory::Weapons,
        equip_slot: Some(EquipSlot::Weapon),
        stats: Some(ItemStats {
            attack,
            ..Default::default()
        }),
        value,
        stackable: false,
        usable: false,
        effect: None,
    }
}

fn armor(id: &str, name: &str, description: &str, defense: u32, value: u32) -> ItemDef {
    ItemDef {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        category: ItemCategory::Armor,
        equip_slot: Some(EquipSlot::Armor),
        stats: Some(ItemStats {
            defense,
            ..Default::default()
        }),
        value,
        stackable: false,
        usable: false,
        effect: None,
    }
}

fn consumable(
    id: &str,
    name: &str,
    description: &str,
    value: u32,
    effect: ItemEffect,
) -> ItemDef {
    ItemDef {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        category: ItemCategory::Consumables,
        equip_slot: None,
        stats: None,
        value,
        stackable: true,
        usable: true,
        effect: Some(effect),
    }
}

/// The built-in item set.
pub fn default_defs() -> Vec<ItemDef> {
    vec![
        weapon("rusty_sword", "Rusty Sword", "A worn blade, better than fists.", 3, 10),
        weapon("iron_sword", "Iron Sword", "A dependable soldier's sword.", 8, 50),
        weapon("steel_sword", "Steel Sword", "Forged steel with a keen edge.", 14, 120),
        armor("leather_armor", "Leather Armor", "Boiled leather over padding.", 4, 40),
        armor("iron_armor", "Iron Armor", "Plates of hammered iron.", 9, 110),
        ItemDef {
            id: "lucky_charm".to_string(),
            name: "Lucky Charm".to_string(),
            description: "A rabbit's foot on a frayed cord.".to_string(),
            category: ItemCategory::Misc,
            equip_slot: Some(EquipSlot::Accessory),
            stats: Some(ItemStats {
                intelligence: 2,
                ..Default::default()
            }),
            value: 60,
            stackable: false,
            usable: false,
            effect: None,
        },
        consumable(
            "health_potion",
            "Health Potion",
            "Restores 30 health.",
            15,
            ItemEffect {
                kind: EffectKind::Heal,
                amount: 30,
                stat: None,
                duration: None,
            },
        ),
        consumable(
            "mana_potion",
            "Mana Potion",
            "Restores 20 mana.",
            15,
            ItemEffect {
                kind: EffectKind::RestoreMana,
                amount: 20,
                stat: None,
                duration: None,
            },
        ),
        consumable(
            "strength_elixir",
            "Strength Elixir",
            "Raises attack for a few turns.",
            45,
            ItemEffect {
                kind: EffectKind::Buff,
                amount: 5,
                stat: Some(StatName::Attack),
                duration: Some(3),
            },
        ),
        ItemDef {
            id: "wolf_pelt".to_string(),
            name: "Wolf Pelt".to_string(),
            description: "A coarse grey pelt. Traders pay for these.".to_string(),
            category: ItemCategory::Misc,
            equip_slot: None,
            stats: None,
            value: 8,
            stackable: true,
            usable: false,
            effect: None,
        },
        ItemDef {
            id: "goblin_ear".to_string(),
            name: "Goblin Ear".to_string(),
            description: "Proof of a goblin slain.".to_string(),
            category: ItemCategory::Misc,
            equip_slot: None,
            stats: None,
            value: 3,
            stackable: true,
            usable: false,
            effect: None,
        },
        ItemDef {
            id: "old_key".to_string(),
            name: "Old Key".to_string(),
            description: "Heavy, cold, and older than the village.".to_string(),
            category: ItemCategory::Misc,
            equip_slot: None,
            stats: None,
            value: 1,
            stackable: false,
            usable: false,
            effect: None,
        },
    ]
}
