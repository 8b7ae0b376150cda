// src/items/src/inventory.rs

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::item::{EffectKind, ItemDef, StatName};

pub const DEFAULT_MAX_SLOTS: usize = 20;

#[derive(Debug, Error, PartialEq)]
pub enum InventoryError {
    #[error("Your inventory is full!")]
    Full,
    #[error("You don't have that item.")]
    NotFound,
    #[error("You can't use that.")]
    NotUsable,
}

/// One occupied inventory slot: a definition copy plus a stack count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item: ItemDef,
    pub quantity: u32,
}

/// Something a consumable effect can be applied to. Implemented by the
/// character crate; kept as a trait here so the inventory does not depend on
/// any particular actor type.
pub trait EffectTarget {
    fn heal(&mut self, amount: u32) -> u32;
    /// Restore mana, capped at remaining capacity. Returns the amount
    /// actually restored.
    fn restore_mana(&mut self, amount: u32) -> u32;
    fn apply_buff(&mut self, stat: StatName, amount: u32, duration: u32);
}

/// Per-character bag of stacked item instances.
///
/// Slot order is insertion order and is what the inventory screen displays.
/// Capacity counts occupied slots, not total quantity: topping up an existing
/// stack always succeeds, opening a new slot is all-or-nothing against
/// `max_slots`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<ItemStack>,
    max_slots: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SLOTS)
    }
}

impl Inventory {
    pub fn new(max_slots: usize) -> Self {
        Self {
            slots: Vec::new(),
            max_slots,
        }
    }

    /// Add `quantity` of an item. Stackable items merge into their existing
    /// slot without a capacity check; anything that needs new slots fails
    /// whole if it would exceed capacity, leaving the bag untouched.
    pub fn add_item(&mut self, item: ItemDef, quantity: u32) -> Result<(), InventoryError> {
        if quantity == 0 {
            return Ok(());
        }

        if item.stackable {
            if let Some(slot) = self.slots.iter_mut().find(|s| s.item.id == item.id) {
                slot.quantity += quantity;
                return Ok(());
            }
            if self.slots.len() >= self.max_slots {
                return Err(InventoryError::Full);
            }
            self.slots.push(ItemStack { item, quantity });
            Ok(())
        } else {
            // Non-stackable items occupy one slot each.
            if self.slots.len() + quantity as usize > self.max_slots {
                return Err(InventoryError::Full);
            }
            for _ in 0..quantity {
                self.slots.push(ItemStack {
                    item: item.clone(),
                    quantity: 1,
                });
            }
            Ok(())
        }
    }

    /// Remove `quantity` of an item from its first matching slot. The slot is
    /// deleted when its count reaches zero.
    pub fn remove_item(&mut self, item_id: &str, quantity: u32) -> Result<(), InventoryError> {
        let index = self
            .slots
            .iter()
            .position(|s| s.item.id == item_id)
            .ok_or(InventoryError::NotFound)?;

        let slot = &mut self.slots[index];
        if slot.quantity > quantity {
            slot.quantity -= quantity;
        } else {
            self.slots.remove(index);
        }
        Ok(())
    }

    /// Whether a single slot holds at least `quantity` of the item.
    pub fn has_item(&self, item_id: &str, quantity: u32) -> bool {
        self.slots
            .iter()
            .any(|s| s.item.id == item_id && s.quantity >= quantity)
    }

    /// Total quantity across all slots, for quest bookkeeping.
    pub fn quantity_of(&self, item_id: &str) -> u32 {
        self.slots
            .iter()
            .filter(|s| s.item.id == item_id)
            .map(|s| s.quantity)
            .sum()
    }

    /// Use one unit of a consumable against `target`. The unit is only
    /// removed after the effect applies.
    pub fn use_item(
        &mut self,
        item_id: &str,
        target: &mut impl EffectTarget,
    ) -> Result<String, InventoryError> {
        let slot = self
            .slots
            .iter()
            .find(|s| s.item.id == item_id)
            .ok_or(InventoryError::NotFound)?;

        if !slot.item.usable {
            return Err(InventoryError::NotUsable);
        }
        let effect = slot.item.effect.clone().ok_or(InventoryError::NotUsable)?;
        let name = slot.item.name.clone();

        let message = match effect.kind {
            EffectKind::Heal => {
                let healed = target.heal(effect.amount);
                format!("You use the {name} and recover {healed} health.")
            }
            EffectKind::RestoreMana => {
                let restored = target.restore_mana(effect.amount);
                format!("You use the {name} and recover {restored} mana.")
            }
            EffectKind::Buff => {
                let stat = effect.stat.ok_or(InventoryError::NotUsable)?;
                let duration = effect.duration.unwrap_or(1);
                target.apply_buff(stat, effect.amount, duration);
                format!("You use the {name}. You feel stronger!")
            }
        };

        self.remove_item(item_id, 1)?;
        Ok(message)
    }

    pub fn slots(&self) -> &[ItemStack] {
        &self.slots
    }

    pub fn max_slots(&self) -> usize {
        self.max_slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.max_slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ItemCatalog;
    use pretty_assertions::assert_eq;

    struct Dummy {
        health: u32,
        max_health: u32,
        mana: u32,
        max_mana: u32,
        buffs: Vec<(StatName, u32, u32)>,
    }

    impl Dummy {
        fn new() -> Self {
            Self {
                health: 50,
                max_health: 100,
                mana: 10,
                max_mana: 25,
                buffs: Vec::new(),
            }
        }
    }

    impl EffectTarget for Dummy {
        fn heal(&mut self, amount: u32) -> u32 {
            let healed = amount.min(self.max_health - self.health);
            self.health += healed;
            healed
        }
        fn restore_mana(&mut self, amount: u32) -> u32 {
            let restored = amount.min(self.max_mana - self.mana);
            self.mana += restored;
            restored
        }
        fn apply_buff(&mut self, stat: StatName, amount: u32, duration: u32) {
            self.buffs.push((stat, amount, duration));
        }
    }

    fn def(id: &str) -> ItemDef {
        ItemCatalog::default().get(id).unwrap().clone()
    }

    #[test]
    fn stackable_items_merge_into_one_slot() {
        let mut inv = Inventory::new(20);
        inv.add_item(def("health_potion"), 1).unwrap();
        inv.add_item(def("health_potion"), 3).unwrap();
        assert_eq!(inv.len(), 1);
        assert_eq!(inv.quantity_of("health_potion"), 4);
    }

    #[test]
    fn stack_increment_ignores_capacity() {
        let mut inv = Inventory::new(1);
        inv.add_item(def("health_potion"), 1).unwrap();
        // The bag is at capacity, but topping up an existing stack is fine.
        assert!(inv.is_full());
        inv.add_item(def("health_potion"), 5).unwrap();
        assert_eq!(inv.quantity_of("health_potion"), 6);
    }

    #[test]
    fn full_inventory_rejects_new_slots_without_mutation() {
        let mut inv = Inventory::new(2);
        inv.add_item(def("rusty_sword"), 1).unwrap();
        inv.add_item(def("iron_sword"), 1).unwrap();

        let before = inv.clone();
        assert_eq!(inv.add_item(def("steel_sword"), 1), Err(InventoryError::Full));
        assert_eq!(inv.add_item(def("mana_potion"), 1), Err(InventoryError::Full));
        assert_eq!(inv, before);
    }

    #[test]
    fn non_stackable_multi_add_is_all_or_nothing() {
        let mut inv = Inventory::new(3);
        inv.add_item(def("rusty_sword"), 1).unwrap();
        let before = inv.clone();
        assert_eq!(inv.add_item(def("iron_sword"), 3), Err(InventoryError::Full));
        assert_eq!(inv, before);
        inv.add_item(def("iron_sword"), 2).unwrap();
        assert_eq!(inv.len(), 3);
    }

    #[test]
    fn removing_to_zero_deletes_the_slot() {
        let mut inv = Inventory::new(20);
        inv.add_item(def("wolf_pelt"), 2).unwrap();
        inv.remove_item("wolf_pelt", 1).unwrap();
        assert!(inv.has_item("wolf_pelt", 1));
        inv.remove_item("wolf_pelt", 1).unwrap();
        assert!(inv.is_empty());
        assert_eq!(inv.remove_item("wolf_pelt", 1), Err(InventoryError::NotFound));
    }

    #[test]
    fn use_item_applies_effect_then_consumes_one() {
        let mut inv = Inventory::new(20);
        let mut target = Dummy::new();
        inv.add_item(def("health_potion"), 2).unwrap();

        let msg = inv.use_item("health_potion", &mut target).unwrap();
        assert!(msg.contains("30 health"));
        assert_eq!(target.health, 80);
        assert_eq!(inv.quantity_of("health_potion"), 1);
    }

    #[test]
    fn mana_restoration_is_capped_at_capacity() {
        let mut inv = Inventory::new(20);
        let mut target = Dummy::new();
        inv.add_item(def("mana_potion"), 1).unwrap();

        let msg = inv.use_item("mana_potion", &mut target).unwrap();
        assert!(msg.contains("15 mana"), "{msg}");
        assert_eq!(target.mana, target.max_mana);
    }

    #[test]
    fn buff_items_push_a_status_onto_the_target() {
        let mut inv = Inventory::new(20);
        let mut target = Dummy::new();
        inv.add_item(def("strength_elixir"), 1).unwrap();

        inv.use_item("strength_elixir", &mut target).unwrap();
        assert_eq!(target.buffs, vec![(StatName::Attack, 5, 3)]);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        const IDS: [&str; 6] = [
            "health_potion",
            "mana_potion",
            "wolf_pelt",
            "rusty_sword",
            "iron_sword",
            "steel_sword",
        ];

        proptest! {
            // Slot count never exceeds capacity, whatever sequence of adds
            // and removes is thrown at the bag.
            #[test]
            fn slot_count_never_exceeds_capacity(
                ops in prop::collection::vec((0usize..IDS.len(), 1u32..4, prop::bool::ANY), 0..60),
                capacity in 1usize..8,
            ) {
                let catalog = ItemCatalog::default();
                let mut inv = Inventory::new(capacity);
                for (idx, quantity, is_add) in ops {
                    let id = IDS[idx];
                    if is_add {
                        let _ = inv.add_item(catalog.get(id).unwrap().clone(), quantity);
                    } else {
                        let _ = inv.remove_item(id, quantity);
                    }
                    prop_assert!(inv.len() <= capacity);
                }
            }

            // A rejected add leaves the bag byte-identical.
            #[test]
            fn failed_add_never_partially_mutates(
                seed in prop::collection::vec(0usize..IDS.len(), 0..10),
                extra in 0usize..IDS.len(),
            ) {
                let catalog = ItemCatalog::default();
                let mut inv = Inventory::new(2);
                for idx in seed {
                    let _ = inv.add_item(catalog.get(IDS[idx]).unwrap().clone(), 1);
                }
                let before = inv.clone();
                if inv.add_item(catalog.get(IDS[extra]).unwrap().clone(), 3).is_err() {
                    prop_assert_eq!(inv, before);
                }
            }
        }
    }

    #[test]
    fn unusable_items_are_rejected_and_kept() {
        let mut inv = Inventory::new(20);
        let mut target = Dummy::new();
        inv.add_item(def("rusty_sword"), 1).unwrap();

        assert_eq!(
            inv.use_item("rusty_sword", &mut target),
            Err(InventoryError::NotUsable)
        );
        assert!(inv.has_item("rusty_sword", 1));
    }
}
