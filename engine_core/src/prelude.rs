//! Prelude module for convenient imports
//!
//! ```rust
//! use engine_core::prelude::*;
//! ```

pub use crate::character::CharacterState;
pub use crate::command::{Command, Cue};
pub use crate::engine::Engine;
pub use crate::entity::{EntityId, EntityKind};
pub use crate::error::{EngineError, Rejection};
pub use crate::event::WorldEvent;
pub use crate::host::HostView;
pub use crate::store::{MemoryStore, PersistentStore};

// Re-exports from the content crates
pub use gear_core::{Attribute, EquipmentRegistry, EquipmentSlot, ItemStack};
pub use stat_core::{GameConstants, TalentId};
pub use tables_core::ContentRegistry;
