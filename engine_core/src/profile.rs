//! ProfileStore - Multi-slot build snapshots
//!
//! Each slot is one JSON blob under `rpg:profile:<slot>`. Loading a slot
//! replaces the whole live build; nothing is merged.

use crate::character::CharacterState;
use crate::entity::EntityId;
use crate::error::{EngineError, Rejection};
use crate::quest::QuestLog;
use crate::store::{keys, PersistentStore, PropertyValue};
use gear_core::Attributes;
use serde::{Deserialize, Serialize};
use stat_core::{GameConstants, TalentSet};
use std::fmt;
use tracing::{info, warn};

/// A saved build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub level: u32,
    pub xp: u64,
    pub invested_points: u32,
    pub pending_draws: u32,
    pub resource: f64,
    pub attributes: Attributes,
    pub talents: TalentSet,
    pub quests: QuestLog,
}

impl ProfileSnapshot {
    /// The build of a brand-new character
    pub fn fresh(constants: &GameConstants) -> Self {
        Self::capture(&CharacterState::new(constants))
    }

    pub fn capture(state: &CharacterState) -> Self {
        ProfileSnapshot {
            level: state.level,
            xp: state.xp,
            invested_points: state.invested_points,
            pending_draws: state.pending_draws,
            resource: state.resource,
            attributes: state.attributes.clone(),
            talents: state.talents.clone(),
            quests: state.quests.clone(),
        }
    }

    /// Overwrite every snapshotted field of the live state
    pub fn restore(self, state: &mut CharacterState) {
        state.level = self.level;
        state.xp = self.xp;
        state.invested_points = self.invested_points;
        state.pending_draws = self.pending_draws;
        state.resource = self.resource;
        state.attributes = self.attributes;
        state.talents = self.talents;
        state.quests = self.quests;
        state.offer = None;
    }
}

/// What the profile menu shows for a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSummary {
    pub slot: u32,
    pub active: bool,
    /// `None` for a slot that was never saved
    pub level: Option<u32>,
    pub talent_count: usize,
}

impl fmt::Display for SlotSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot {}", self.slot)?;
        if self.active {
            write!(f, " (Active)")?;
        }
        match self.level {
            Some(level) => write!(f, "\nLevel: {} / Traits: {}", level, self.talent_count),
            None => write!(f, "\nEmpty"),
        }
    }
}

fn check_slot(slot: u32, constants: &GameConstants) -> Result<(), Rejection> {
    if slot == 0 || slot > constants.progression.max_profiles {
        return Err(Rejection::InvalidSlot(slot));
    }
    Ok(())
}

/// Read a slot; `Ok(None)` if it was never saved
pub fn read_slot<S: PersistentStore + ?Sized>(
    store: &S,
    player: EntityId,
    slot: u32,
) -> Result<Option<ProfileSnapshot>, EngineError> {
    let Some(json) = store.get_text(player, &keys::profile(slot)) else {
        return Ok(None);
    };
    serde_json::from_str(&json)
        .map(Some)
        .map_err(|source| EngineError::CorruptProfile { slot, source })
}

/// Write the live build into its active slot (slot 1 if none is active)
pub fn save<S: PersistentStore + ?Sized>(
    store: &mut S,
    player: EntityId,
    state: &CharacterState,
) -> Result<(), EngineError> {
    let slot = state.active_profile.unwrap_or(1);
    let json = serde_json::to_string(&ProfileSnapshot::capture(state)).map_err(|source| {
        EngineError::Encode {
            what: "profile",
            source,
        }
    })?;
    store.set(player, &keys::profile(slot), PropertyValue::Text(json));
    Ok(())
}

/// Replace the live build with a slot's snapshot and make it active
///
/// A missing slot loads a fresh build; a corrupt one does too, with a warning.
pub fn load<S: PersistentStore + ?Sized>(
    store: &S,
    player: EntityId,
    state: &mut CharacterState,
    slot: u32,
    constants: &GameConstants,
) -> Result<(), Rejection> {
    check_slot(slot, constants)?;
    let snapshot = match read_slot(store, player, slot) {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => ProfileSnapshot::fresh(constants),
        Err(e) => {
            warn!(%player, error = %e, "loading default build instead");
            ProfileSnapshot::fresh(constants)
        }
    };
    snapshot.restore(state);
    state.active_profile = Some(slot);
    Ok(())
}

/// Save the outgoing slot, then load `slot`
pub fn switch<S: PersistentStore + ?Sized>(
    store: &mut S,
    player: EntityId,
    state: &mut CharacterState,
    slot: u32,
    constants: &GameConstants,
) -> Result<(), EngineError> {
    check_slot(slot, constants)?;
    if state.active_profile == Some(slot) {
        return Err(Rejection::SlotAlreadyActive(slot).into());
    }
    save(store, player, state)?;
    load(&*store, player, state, slot, constants)?;
    info!(%player, slot, "switched profile");
    Ok(())
}

/// Delete a slot; resetting the active slot also resets the live build
pub fn reset<S: PersistentStore + ?Sized>(
    store: &mut S,
    player: EntityId,
    state: &mut CharacterState,
    slot: u32,
    constants: &GameConstants,
) -> Result<(), Rejection> {
    check_slot(slot, constants)?;
    store.delete(player, &keys::profile(slot));
    if state.active_profile.unwrap_or(1) == slot {
        store.delete(player, keys::QUESTS);
        load(&*store, player, state, slot, constants)?;
    }
    info!(%player, slot, "reset profile");
    Ok(())
}

pub fn slot_summary<S: PersistentStore + ?Sized>(
    store: &S,
    player: EntityId,
    state: &CharacterState,
    slot: u32,
    constants: &GameConstants,
) -> Result<SlotSummary, Rejection> {
    check_slot(slot, constants)?;
    let snapshot = read_slot(store, player, slot).unwrap_or_else(|e| {
        warn!(%player, error = %e, "unreadable profile in summary");
        None
    });
    Ok(SlotSummary {
        slot,
        active: state.active_profile == Some(slot),
        level: snapshot.as_ref().map(|s| s.level),
        talent_count: snapshot.map(|s| s.talents.len()).unwrap_or(0),
    })
}
