//! Loadout - the items a character currently has equipped

use crate::registry::EquipmentRegistry;
use crate::requirement::{check_requirements, RequirementCheck};
use crate::types::{Attributes, EquipmentSlot, ItemStack};
use std::collections::HashMap;

/// Equipped item stacks by slot
#[derive(Debug, Clone, Default)]
pub struct Loadout {
    slots: HashMap<EquipmentSlot, ItemStack>,
}

impl Loadout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put an item in a slot, returning what was there
    pub fn equip(&mut self, slot: EquipmentSlot, item: ItemStack) -> Option<ItemStack> {
        self.slots.insert(slot, item)
    }

    /// Builder form of [`Loadout::equip`]
    pub fn with(mut self, slot: EquipmentSlot, item: ItemStack) -> Self {
        self.equip(slot, item);
        self
    }

    pub fn get(&self, slot: EquipmentSlot) -> Option<&ItemStack> {
        self.slots.get(&slot)
    }

    /// Flat attack contributed by the main-hand weapon
    pub fn weapon_atk(&self, registry: &EquipmentRegistry) -> f64 {
        self.get(EquipmentSlot::MainHand)
            .and_then(|stack| registry.resolve(stack))
            .map(|def| def.stats.atk)
            .unwrap_or(0.0)
    }

    /// Flat defense summed over the armour slots
    pub fn armour_def(&self, registry: &EquipmentRegistry) -> f64 {
        EquipmentSlot::armour()
            .iter()
            .filter_map(|slot| self.get(*slot))
            .filter_map(|stack| registry.resolve(stack))
            .map(|def| def.stats.def)
            .sum()
    }

    /// Requirement check for the main-hand item
    pub fn main_hand_check(
        &self,
        attributes: &Attributes,
        registry: &EquipmentRegistry,
    ) -> RequirementCheck {
        check_requirements(attributes, self.get(EquipmentSlot::MainHand), registry)
    }

    /// Whether any equipped armour piece has an unmet requirement
    ///
    /// The penalty is a single condition for the whole body, not per slot.
    pub fn heavy_armour_penalty(
        &self,
        attributes: &Attributes,
        registry: &EquipmentRegistry,
    ) -> bool {
        EquipmentSlot::armour()
            .iter()
            .any(|slot| !check_requirements(attributes, self.get(*slot), registry).valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Attribute;

    fn knight_set() -> Loadout {
        Loadout::new()
            .with(
                EquipmentSlot::MainHand,
                ItemStack::custom("minecraft:iron_sword", "steel_longsword"),
            )
            .with(
                EquipmentSlot::Head,
                ItemStack::custom("minecraft:iron_helmet", "knight_helm"),
            )
            .with(
                EquipmentSlot::Feet,
                ItemStack::custom("minecraft:iron_boots", "knight_sabatons"),
            )
            .with(EquipmentSlot::Legs, ItemStack::plain("minecraft:leather_leggings"))
    }

    #[test]
    fn test_flat_values() {
        let registry = EquipmentRegistry::builtin().unwrap();
        let loadout = knight_set();
        assert!((loadout.weapon_atk(&registry) - 6.0).abs() < f64::EPSILON);
        // knight_helm 3 + knight_sabatons 2, plain leggings contribute nothing
        assert!((loadout.armour_def(&registry) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_single_unmet_piece_sets_penalty() {
        let registry = EquipmentRegistry::builtin().unwrap();
        let loadout = knight_set();

        let mut attrs = Attributes::new();
        attrs.set(Attribute::Heavy, 15);
        assert!(!loadout.heavy_armour_penalty(&attrs, &registry));

        attrs.set(Attribute::Heavy, 12);
        // Sabatons (10) are fine, helm (15) is not
        assert!(loadout.heavy_armour_penalty(&attrs, &registry));
    }

    #[test]
    fn test_empty_loadout() {
        let registry = EquipmentRegistry::builtin().unwrap();
        let loadout = Loadout::new();
        assert_eq!(loadout.weapon_atk(&registry), 0.0);
        assert!(loadout.main_hand_check(&Attributes::new(), &registry).valid);
        assert!(!loadout.heavy_armour_penalty(&Attributes::new(), &registry));
    }
}
