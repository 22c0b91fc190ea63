//! Commands produced for the host to execute

use crate::entity::EntityId;
use gear_core::ItemStack;
use stat_core::Presentation;
use tables_core::BossEquipment;

/// Feedback the host renders as sound or particles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Critical,
    Dodge,
    /// Hit with an item whose requirements are unmet
    Penalty,
    Rejected,
    LevelUp,
    TalentGained,
    QuestCompleted,
    SkillReady,
    BossDefeated,
}

/// A follow-up action for the host
///
/// Native damage issued here re-enters the engine as a
/// [`crate::WorldEvent::DamageDealt`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetNativeHealth {
        entity: EntityId,
        value: f64,
    },
    ApplyNativeDamage {
        target: EntityId,
        amount: f64,
        source: Option<EntityId>,
    },
    Feedback {
        entity: EntityId,
        cue: Cue,
    },
    Message {
        entity: EntityId,
        text: String,
    },
    ApplyPresentation {
        entity: EntityId,
        values: Presentation,
    },
    Hud {
        entity: EntityId,
        text: String,
    },
    CastSkill {
        caster: EntityId,
        skill_id: String,
    },
    GiveItem {
        entity: EntityId,
        item: ItemStack,
        count: u32,
    },
    SpawnBoss {
        near: EntityId,
        boss_id: String,
        entity_type: String,
        name: String,
        speed: Option<f64>,
        equipment: BossEquipment,
    },
    /// Spawn an item stack on the ground at an entity's position
    DropItemAt {
        entity: EntityId,
        item: ItemStack,
    },
    /// Drop each inventory stack with probability `rate`
    ScatterInventory {
        entity: EntityId,
        rate: f64,
    },
    Saturate {
        entity: EntityId,
    },
}

impl Command {
    pub fn message(entity: EntityId, text: impl Into<String>) -> Self {
        Command::Message {
            entity,
            text: text.into(),
        }
    }

    pub fn cue(entity: EntityId, cue: Cue) -> Self {
        Command::Feedback { entity, cue }
    }
}
