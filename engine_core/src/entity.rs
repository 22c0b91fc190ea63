//! Entity identifiers as the host reports them

use serde::{Deserialize, Serialize};
use std::fmt;

/// Host type id of player entities
pub const PLAYER_TYPE: &str = "minecraft:player";

/// Opaque handle of a host entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What kind of entity an id refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    /// Any non-player entity, by host type id
    Mob { entity_type: String },
}

impl EntityKind {
    pub fn mob(entity_type: impl Into<String>) -> Self {
        EntityKind::Mob {
            entity_type: entity_type.into(),
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self, EntityKind::Player)
    }

    /// Host type id, used to match kill quests
    pub fn type_id(&self) -> &str {
        match self {
            EntityKind::Player => PLAYER_TYPE,
            EntityKind::Mob { entity_type } => entity_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ids() {
        assert_eq!(EntityKind::Player.type_id(), "minecraft:player");
        assert_eq!(EntityKind::mob("minecraft:zombie").type_id(), "minecraft:zombie");
        assert!(!EntityKind::mob("minecraft:zombie").is_player());
    }
}
