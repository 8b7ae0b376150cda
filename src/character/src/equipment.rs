// src/character/src/equipment.rs

use items::{EquipSlot, ItemDef};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::Character;

#[derive(Debug, Error, PartialEq)]
pub enum EquipError {
    #[error("You can't equip that.")]
    NotEquippable,
    #[error("You aren't carrying that.")]
    NotCarried,
    #[error("That slot is empty.")]
    EmptySlot,
    #[error("Your inventory is full!")]
    InventoryFull,
}

/// A character's three equipment slots. Equipped items live here, outside
/// the inventory, and contribute their stat bonuses while installed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<ItemDef>,
    pub armor: Option<ItemDef>,
    pub accessory: Option<ItemDef>,
}

impl Equipment {
    pub fn slot(&self, slot: EquipSlot) -> Option<&ItemDef> {
        match slot {
            EquipSlot::Weapon => self.weapon.as_ref(),
            EquipSlot::Armor => self.armor.as_ref(),
            EquipSlot::Accessory => self.accessory.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: EquipSlot) -> &mut Option<ItemDef> {
        match slot {
            EquipSlot::Weapon => &mut self.weapon,
            EquipSlot::Armor => &mut self.armor,
            EquipSlot::Accessory => &mut self.accessory,
        }
    }

    pub fn attack_bonus(&self) -> u32 {
        self.weapon.as_ref().map_or(0, ItemDef::attack_bonus)
    }

    pub fn defense_bonus(&self) -> u32 {
        self.armor.as_ref().map_or(0, ItemDef::defense_bonus)
    }
}

impl Character {
    /// Equip a carried item into its slot. Any displaced item is returned to
    /// the inventory first; if it cannot be (bag full), the whole operation
    /// is rejected and nothing changes, same strict contract as `unequip`.
    pub fn equip(&mut self, item_id: &str) -> Result<String, EquipError> {
        let item = self
            .inventory
            .slots()
            .iter()
            .find(|s| s.item.id == item_id)
            .map(|s| s.item.clone())
            .ok_or(EquipError::NotCarried)?;
        let slot = item.equip_slot.ok_or(EquipError::NotEquippable)?;

        // Take the new item out first so its slot can host the displaced one.
        self.inventory
            .remove_item(item_id, 1)
            .map_err(|_| EquipError::NotCarried)?;

        if let Some(displaced) = self.equipment.slot_mut(slot).take() {
            if self.inventory.add_item(displaced.clone(), 1).is_err() {
                // Roll back: reinstall the displaced item and return the new
                // one to the bag (its old slot is still free).
                *self.equipment.slot_mut(slot) = Some(displaced);
                let _ = self.inventory.add_item(item, 1);
                return Err(EquipError::InventoryFull);
            }
        }

        let name = item.name.clone();
        *self.equipment.slot_mut(slot) = Some(item);
        Ok(format!("You equip the {name}."))
    }

    /// Move the item in `slot` back into the inventory. Fails without
    /// touching the equipment when the bag has no room; capacity is checked
    /// strictly before any mutation.
    pub fn unequip(&mut self, slot: EquipSlot) -> Result<String, EquipError> {
        let item = self.equipment.slot(slot).cloned().ok_or(EquipError::EmptySlot)?;
        if self.inventory.is_full() && !(item.stackable && self.inventory.has_item(&item.id, 1)) {
            return Err(EquipError::InventoryFull);
        }
        self.inventory
            .add_item(item.clone(), 1)
            .map_err(|_| EquipError::InventoryFull)?;
        *self.equipment.slot_mut(slot) = None;
        Ok(format!("You unequip the {}.", item.name))
    }
}
