//! HostView - Read-only queries against the host world

use crate::entity::{EntityId, EntityKind};
use gear_core::{EquipmentSlot, ItemStack, Loadout};

/// What the engine may ask the host about its entities
pub trait HostView {
    fn is_valid(&self, entity: EntityId) -> bool;

    fn kind(&self, entity: EntityId) -> Option<EntityKind>;

    fn native_health(&self, entity: EntityId) -> Option<f64>;

    fn native_max_health(&self, entity: EntityId) -> Option<f64>;

    fn is_sneaking(&self, entity: EntityId) -> bool;

    fn is_submerged(&self, entity: EntityId) -> bool;

    fn equipped(&self, entity: EntityId, slot: EquipmentSlot) -> Option<ItemStack>;

    fn online_players(&self) -> Vec<EntityId>;

    /// Everything the entity has equipped
    fn loadout(&self, entity: EntityId) -> Loadout {
        let mut loadout = Loadout::new();
        let slots = std::iter::once(&EquipmentSlot::MainHand).chain(EquipmentSlot::armour());
        for slot in slots {
            if let Some(item) = self.equipped(entity, *slot) {
                loadout.equip(*slot, item);
            }
        }
        loadout
    }

    fn is_player(&self, entity: EntityId) -> bool {
        self.kind(entity).is_some_and(|k| k.is_player())
    }
}
