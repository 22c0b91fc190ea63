//! Engine errors
//!
//! A [`Rejection`] goes back to the acting player as a message and never
//! changes state. An [`EngineError`] is absorbed by the handler that raised it.

use crate::entity::EntityId;
use gear_core::{Attribute, MissingRequirement};
use stat_core::TalentId;
use thiserror::Error;

/// A player action that was refused
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("Not enough XP! Need: {need}, Have: {have}")]
    InsufficientXp { need: u64, have: u64 },
    #[error("{0} is already at its maximum")]
    AttributeMaxed(Attribute),
    #[error("You have reached the absolute limit of your power")]
    FullyMaxed,
    #[error("Requirements not met: {0}")]
    RequirementUnmet(MissingRequirement),
    #[error("No talent draw is pending")]
    NoPendingDraw,
    #[error("{0} was not offered")]
    CardNotOffered(TalentId),
    #[error("Profile slot {0} does not exist")]
    InvalidSlot(u32),
    #[error("Profile {0} is already active")]
    SlotAlreadyActive(u32),
    #[error("Quest not found: {0}")]
    UnknownQuest(String),
    #[error("Already accepted or completed")]
    QuestAlreadyAccepted(String),
    #[error("Item ID not found: {0}")]
    UnknownItem(String),
    #[error("Boss ID not found: {0}")]
    UnknownBoss(String),
    #[error("Skill is on cooldown!")]
    SkillOnCooldown(String),
    #[error("Not enough Ether! ({current} / {cost})")]
    NotEnoughResource { current: f64, cost: f64 },
}

/// Failure inside a handler
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("entity {0} is no longer valid")]
    StaleEntity(EntityId),
    #[error("damage to {victim} at tick {tick} is inside the guard window")]
    DuplicateEvent { victim: EntityId, tick: u64 },
    #[error("profile slot {slot} is corrupt: {source}")]
    CorruptProfile {
        slot: u32,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode {what}: {source}")]
    Encode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Rejected(#[from] Rejection),
}
