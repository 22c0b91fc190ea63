//! World events consumed by the engine

use crate::entity::EntityId;
use gear_core::ItemStack;

/// A notification from the host world
#[derive(Debug, Clone, PartialEq)]
pub enum WorldEvent {
    /// Native damage was applied to `victim`
    DamageDealt {
        victim: EntityId,
        attacker: Option<EntityId>,
        amount: f64,
    },
    EntityDied {
        victim: EntityId,
        attacker: Option<EntityId>,
    },
    EntitySpawned {
        entity: EntityId,
    },
    PlayerLeft {
        player: EntityId,
    },
    ItemUsed {
        actor: EntityId,
        item: ItemStack,
    },
    /// Admin channel message, e.g. `addxp` with message `"500"`
    Signal {
        id: String,
        source: Option<EntityId>,
        message: String,
    },
}

impl WorldEvent {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            WorldEvent::DamageDealt { .. } => "damage_dealt",
            WorldEvent::EntityDied { .. } => "entity_died",
            WorldEvent::EntitySpawned { .. } => "entity_spawned",
            WorldEvent::PlayerLeft { .. } => "player_left",
            WorldEvent::ItemUsed { .. } => "item_used",
            WorldEvent::Signal { .. } => "signal",
        }
    }
}
