//! PersistentStore - Per-entity properties and tags
//!
//! The host owns durable storage; the engine only sees this trait. Every key
//! the engine writes lives under the `rpg:` namespace (see [`keys`]).

use crate::entity::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// A stored property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl PropertyValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<u64> for PropertyValue {
    fn from(value: u64) -> Self {
        PropertyValue::Number(value as f64)
    }
}

impl From<u32> for PropertyValue {
    fn from(value: u32) -> Self {
        PropertyValue::Number(value as f64)
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

/// Durable key/value properties and string tags per entity
pub trait PersistentStore {
    fn get(&self, entity: EntityId, key: &str) -> Option<PropertyValue>;

    fn set(&mut self, entity: EntityId, key: &str, value: PropertyValue);

    fn delete(&mut self, entity: EntityId, key: &str);

    /// Returns false if the tag was already present
    fn add_tag(&mut self, entity: EntityId, tag: &str) -> bool;

    /// Returns false if the tag was absent
    fn remove_tag(&mut self, entity: EntityId, tag: &str) -> bool;

    fn has_tag(&self, entity: EntityId, tag: &str) -> bool;

    fn tags_with_prefix(&self, entity: EntityId, prefix: &str) -> Vec<String>;

    fn get_number(&self, entity: EntityId, key: &str) -> Option<f64> {
        self.get(entity, key).and_then(|v| v.as_number())
    }

    fn get_text(&self, entity: EntityId, key: &str) -> Option<String> {
        self.get(entity, key)
            .and_then(|v| v.as_text().map(str::to_string))
    }
}

/// Store keys and tags written by the engine
pub mod keys {
    use gear_core::Attribute;

    pub const LEVEL: &str = "rpg:level";
    pub const XP: &str = "rpg:xp";
    pub const INVESTED_POINTS: &str = "rpg:invested_points";
    pub const PENDING_DRAWS: &str = "rpg:pending_draws";
    pub const RESOURCE: &str = "rpg:ether";
    pub const ACTIVE_PROFILE: &str = "rpg:active_profile";
    pub const QUESTS: &str = "rpg:quest_data";
    pub const TALENT_OFFER: &str = "rpg:talent_offer";
    pub const COMBAT_UNTIL: &str = "rpg:combat_until";

    /// Virtual health, for players and mobs alike
    pub const HEALTH: &str = "rpg:health";
    pub const LAST_HIT: &str = "rpg:last_hit_tick";
    pub const BOSS_ID: &str = "rpg:boss_id";

    pub const BOSS_TAG: &str = "rpg:boss";
    /// Set on players who left mid-fight; cleared when they are executed
    pub const COMBAT_LOGGED_TAG: &str = "rpg:combat_logged";

    pub fn attribute(attribute: Attribute) -> String {
        format!("rpg:attr:{}", attribute.key())
    }

    pub fn profile(slot: u32) -> String {
        format!("rpg:profile:{}", slot)
    }
}

/// In-memory store for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    properties: HashMap<EntityId, HashMap<String, PropertyValue>>,
    tags: HashMap<EntityId, BTreeSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of properties stored for an entity
    pub fn property_count(&self, entity: EntityId) -> usize {
        self.properties.get(&entity).map(|p| p.len()).unwrap_or(0)
    }
}

impl PersistentStore for MemoryStore {
    fn get(&self, entity: EntityId, key: &str) -> Option<PropertyValue> {
        self.properties.get(&entity)?.get(key).cloned()
    }

    fn set(&mut self, entity: EntityId, key: &str, value: PropertyValue) {
        self.properties
            .entry(entity)
            .or_default()
            .insert(key.to_string(), value);
    }

    fn delete(&mut self, entity: EntityId, key: &str) {
        if let Some(properties) = self.properties.get_mut(&entity) {
            properties.remove(key);
        }
    }

    fn add_tag(&mut self, entity: EntityId, tag: &str) -> bool {
        self.tags.entry(entity).or_default().insert(tag.to_string())
    }

    fn remove_tag(&mut self, entity: EntityId, tag: &str) -> bool {
        self.tags
            .get_mut(&entity)
            .map(|tags| tags.remove(tag))
            .unwrap_or(false)
    }

    fn has_tag(&self, entity: EntityId, tag: &str) -> bool {
        self.tags
            .get(&entity)
            .map(|tags| tags.contains(tag))
            .unwrap_or(false)
    }

    fn tags_with_prefix(&self, entity: EntityId, prefix: &str) -> Vec<String> {
        self.tags
            .get(&entity)
            .map(|tags| {
                tags.iter()
                    .filter(|t| t.starts_with(prefix))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_properties_are_per_entity() {
        let mut store = MemoryStore::new();
        let a = EntityId(1);
        let b = EntityId(2);

        store.set(a, keys::XP, 120u64.into());
        assert_eq!(store.get_number(a, keys::XP), Some(120.0));
        assert_eq!(store.get_number(b, keys::XP), None);

        store.delete(a, keys::XP);
        assert_eq!(store.get(a, keys::XP), None);
        // Deleting from an unknown entity is fine
        store.delete(b, keys::XP);
    }

    #[test]
    fn test_tags_with_prefix() {
        let mut store = MemoryStore::new();
        let a = EntityId(1);
        assert!(store.add_tag(a, "talent:vampirism"));
        assert!(!store.add_tag(a, "talent:vampirism"));
        store.add_tag(a, "talent:swift_1");
        store.add_tag(a, "cooldown:skill_fireball");

        assert_eq!(
            store.tags_with_prefix(a, "talent:"),
            vec!["talent:swift_1".to_string(), "talent:vampirism".to_string()]
        );
        assert!(store.remove_tag(a, "talent:swift_1"));
        assert!(!store.has_tag(a, "talent:swift_1"));
        assert!(!store.remove_tag(EntityId(9), "talent:swift_1"));
    }

    #[test]
    fn test_typed_getters_reject_other_kinds() {
        let mut store = MemoryStore::new();
        let a = EntityId(1);
        store.set(a, keys::QUESTS, "{}".into());
        assert_eq!(store.get_number(a, keys::QUESTS), None);
        assert_eq!(store.get_text(a, keys::QUESTS).as_deref(), Some("{}"));
    }
}
