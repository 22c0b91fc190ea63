//! Context handed to event handlers

use crate::character::CharacterState;
use crate::command::{Command, Cue};
use crate::entity::EntityId;
use crate::error::Rejection;
use crate::host::HostView;
use crate::profile;
use crate::scheduler::Scheduler;
use crate::store::{keys, PersistentStore};
use gear_core::EquipmentRegistry;
use rand_chacha::ChaCha8Rng;
use stat_core::{health_ceiling, present, GameConstants, PlayerSheet};
use tables_core::ContentRegistry;
use tracing::warn;

/// A boss that was requested but has not been seen spawning yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingBoss {
    pub boss_id: String,
    pub entity_type: String,
}

/// Everything a handler may read or mutate while processing one event
pub(crate) struct EventContext<'a, S: PersistentStore> {
    pub host: &'a dyn HostView,
    pub store: &'a mut S,
    pub constants: &'a GameConstants,
    pub equipment: &'a EquipmentRegistry,
    pub content: &'a ContentRegistry,
    pub scheduler: &'a mut Scheduler,
    pub rng: &'a mut ChaCha8Rng,
    pub pending_bosses: &'a mut Vec<PendingBoss>,
    pub tick: u64,
}

impl<S: PersistentStore> EventContext<'_, S> {
    pub fn load_character(&self, player: EntityId) -> CharacterState {
        CharacterState::load(&*self.store, player, self.constants)
    }

    /// Persist live state and auto-save the active profile slot
    pub fn commit(&mut self, player: EntityId, state: &CharacterState) {
        state.save(&mut *self.store, player);
        if let Err(e) = profile::save(&mut *self.store, player, state) {
            warn!(%player, error = %e, "auto-save failed");
        }
    }

    /// Derivation inputs for a player as currently equipped
    pub fn sheet(&self, player: EntityId, state: &CharacterState) -> PlayerSheet {
        let loadout = self.host.loadout(player);
        let ceiling = self.health_ceiling(state);
        let health = self.virtual_health(player).unwrap_or(ceiling);
        PlayerSheet::new(state.level, state.attributes.clone())
            .with_talents(state.talents.clone())
            .with_equipment(
                loadout.weapon_atk(self.equipment),
                loadout.armour_def(self.equipment),
            )
            .with_heavy_armour_penalty(
                loadout.heavy_armour_penalty(&state.attributes, self.equipment),
            )
            .with_health_fraction(if ceiling > 0.0 { health / ceiling } else { 1.0 })
            .with_sneaking(self.host.is_sneaking(player))
    }

    pub fn health_ceiling(&self, state: &CharacterState) -> f64 {
        health_ceiling(
            state.attributes.get(gear_core::Attribute::Fortitude),
            &state.talents,
            self.constants,
        )
    }

    pub fn virtual_health(&self, entity: EntityId) -> Option<f64> {
        self.store.get_number(entity, keys::HEALTH)
    }

    pub fn set_virtual_health(&mut self, entity: EntityId, value: f64) {
        self.store.set(entity, keys::HEALTH, value.into());
    }

    /// Presentation values for the host after a progression change
    pub fn presentation(&self, player: EntityId, state: &CharacterState) -> Command {
        Command::ApplyPresentation {
            entity: player,
            values: present(&self.sheet(player, state), self.constants),
        }
    }

    /// Keep virtual health within a possibly lowered ceiling
    pub fn clamp_health(&mut self, player: EntityId, state: &CharacterState) {
        let ceiling = self.health_ceiling(state);
        if let Some(health) = self.virtual_health(player) {
            if health > ceiling {
                self.set_virtual_health(player, ceiling);
            }
        }
    }

    pub fn mark_in_combat(&mut self, player: EntityId) {
        let until = self.tick + self.constants.combat.combat_tag_ticks;
        self.store.set(player, keys::COMBAT_UNTIL, until.into());
    }
}

/// Message and cue telling a player their action was refused
pub(crate) fn reject(player: EntityId, rejection: &Rejection) -> Vec<Command> {
    vec![
        Command::message(player, rejection.to_string()),
        Command::cue(player, Cue::Rejected),
    ]
}
