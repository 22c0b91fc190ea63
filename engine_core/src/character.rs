//! CharacterState - The persistent progression state of one player

use crate::entity::EntityId;
use crate::quest::QuestLog;
use crate::store::{keys, PersistentStore, PropertyValue};
use gear_core::{Attribute, Attributes};
use stat_core::talent::TALENT_TAG_PREFIX;
use stat_core::{GameConstants, TalentId, TalentSet};
use tracing::warn;

/// Live progression state, loaded from and saved to the property store
///
/// Virtual health and the combat guard marker are not part of this
/// aggregate; the combat resolver owns them.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterState {
    pub level: u32,
    pub xp: u64,
    /// Points spent on attributes since the last level-up
    pub invested_points: u32,
    pub pending_draws: u32,
    /// Current resource (Ether); the maximum is derived
    pub resource: f64,
    pub attributes: Attributes,
    pub talents: TalentSet,
    pub quests: QuestLog,
    pub active_profile: Option<u32>,
    /// Cards offered by the outstanding talent draw
    pub offer: Option<Vec<TalentId>>,
    /// Tick until which the player counts as in combat
    pub combat_until: Option<u64>,
}

impl CharacterState {
    /// A fresh level-1 character
    pub fn new(constants: &GameConstants) -> Self {
        CharacterState {
            level: 1,
            xp: 0,
            invested_points: 0,
            pending_draws: 0,
            resource: constants.resource.base,
            attributes: Attributes::new(),
            talents: TalentSet::new(),
            quests: QuestLog::new(),
            active_profile: None,
            offer: None,
            combat_until: None,
        }
    }

    /// Whether the player has ever been initialized
    pub fn exists<S: PersistentStore + ?Sized>(store: &S, player: EntityId) -> bool {
        store.get(player, keys::ACTIVE_PROFILE).is_some()
    }

    /// Read the state, using defaults for anything missing or unreadable
    pub fn load<S: PersistentStore + ?Sized>(
        store: &S,
        player: EntityId,
        constants: &GameConstants,
    ) -> Self {
        let fresh = Self::new(constants);
        let number = |key: &str| store.get_number(player, key);

        let mut attributes = Attributes::new();
        for attribute in Attribute::all() {
            if let Some(value) = number(&keys::attribute(*attribute)) {
                attributes.set(*attribute, value.max(0.0) as u32);
            }
        }

        let talents = store
            .tags_with_prefix(player, TALENT_TAG_PREFIX)
            .iter()
            .filter_map(|tag| TalentId::from_tag(tag))
            .collect();

        let quests = match store.get_text(player, keys::QUESTS) {
            Some(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!(%player, error = %e, "discarding unreadable quest data");
                QuestLog::new()
            }),
            None => QuestLog::new(),
        };

        let offer = store
            .get_text(player, keys::TALENT_OFFER)
            .and_then(|json| serde_json::from_str(&json).ok());

        CharacterState {
            level: number(keys::LEVEL).map(|v| v as u32).unwrap_or(fresh.level).max(1),
            xp: number(keys::XP).map(|v| v.max(0.0) as u64).unwrap_or(0),
            invested_points: number(keys::INVESTED_POINTS).map(|v| v as u32).unwrap_or(0),
            pending_draws: number(keys::PENDING_DRAWS).map(|v| v as u32).unwrap_or(0),
            resource: number(keys::RESOURCE).unwrap_or(fresh.resource),
            attributes,
            talents,
            quests,
            active_profile: number(keys::ACTIVE_PROFILE).map(|v| v as u32),
            offer,
            combat_until: number(keys::COMBAT_UNTIL).map(|v| v as u64),
        }
    }

    /// Write the full state back
    ///
    /// Talent tags are rewritten from scratch so the tag set always mirrors
    /// `talents`.
    pub fn save<S: PersistentStore + ?Sized>(&self, store: &mut S, player: EntityId) {
        store.set(player, keys::LEVEL, self.level.into());
        store.set(player, keys::XP, self.xp.into());
        store.set(player, keys::INVESTED_POINTS, self.invested_points.into());
        store.set(player, keys::PENDING_DRAWS, self.pending_draws.into());
        store.set(player, keys::RESOURCE, self.resource.into());
        for attribute in Attribute::all() {
            let key = keys::attribute(*attribute);
            match self.attributes.get(*attribute) {
                0 => store.delete(player, &key),
                value => store.set(player, &key, value.into()),
            }
        }

        for tag in store.tags_with_prefix(player, TALENT_TAG_PREFIX) {
            store.remove_tag(player, &tag);
        }
        for tag in self.talents.iter().filter_map(|t| t.tag()) {
            store.add_tag(player, &tag);
        }

        match serde_json::to_string(&self.quests) {
            Ok(json) => store.set(player, keys::QUESTS, PropertyValue::Text(json)),
            Err(e) => warn!(%player, error = %e, "failed to encode quest data"),
        }

        match &self.offer {
            Some(offer) => match serde_json::to_string(offer) {
                Ok(json) => store.set(player, keys::TALENT_OFFER, PropertyValue::Text(json)),
                Err(e) => warn!(%player, error = %e, "failed to encode talent offer"),
            },
            None => store.delete(player, keys::TALENT_OFFER),
        }

        match self.active_profile {
            Some(slot) => store.set(player, keys::ACTIVE_PROFILE, slot.into()),
            None => store.delete(player, keys::ACTIVE_PROFILE),
        }
        match self.combat_until {
            Some(tick) => store.set(player, keys::COMBAT_UNTIL, tick.into()),
            None => store.delete(player, keys::COMBAT_UNTIL),
        }
    }

    pub fn in_combat(&self, tick: u64) -> bool {
        self.combat_until.is_some_and(|until| tick < until)
    }
}
