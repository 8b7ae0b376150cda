// src/items/src/lib.rs

pub mod catalog;
pub mod inventory;
pub mod item;

pub use crate::catalog::ItemCatalog;
pub use crate::inventory::{EffectTarget, Inventory, InventoryError, ItemStack};
pub use crate::item::{
    EffectKind, EquipSlot, ItemCategory, ItemDef, ItemEffect, ItemStats, StatName,
};
