//! engine_core - Event-driven RPG rules over a per-entity property store
//!
//! This library provides:
//! - Engine: Routes world events, ticks and player actions to handlers
//! - Combat guard: Replaces host damage with resolved true damage on virtual health
//! - Progression: XP, attribute upgrades, levels and talent draws
//! - Quests, profile slots, skills with cooldowns and boss drops
//!
//! The host owns the world. It reports [`WorldEvent`]s, answers queries through
//! [`HostView`] and executes the [`Command`]s each call returns.
//!
//! # Quick Start
//!
//! ```rust
//! use engine_core::prelude::*;
//!
//! let engine = Engine::new(
//!     MemoryStore::new(),
//!     GameConstants::default(),
//!     EquipmentRegistry::builtin().unwrap(),
//!     ContentRegistry::builtin().unwrap(),
//! )
//! .with_seed(7);
//!
//! let state = engine.character(EntityId(1));
//! assert_eq!(state.level, 1);
//! ```

mod admin;
pub mod character;
mod combat;
pub mod command;
mod context;
mod cycle;
mod engine;
pub mod entity;
pub mod error;
pub mod event;
pub mod host;
mod lifecycle;
pub mod prelude;
pub mod profile;
pub mod progression;
pub mod quest;
pub mod scheduler;
pub mod skills;
pub mod store;

pub use character::CharacterState;
pub use combat::claim_guard;
pub use command::{Command, Cue};
pub use cycle::hud_line;
pub use engine::Engine;
pub use entity::{EntityId, EntityKind, PLAYER_TYPE};
pub use error::{EngineError, Rejection};
pub use event::WorldEvent;
pub use host::HostView;
pub use profile::{ProfileSnapshot, SlotSummary};
pub use progression::UpgradeOutcome;
pub use quest::{QuestLog, QuestRecord, QuestStatus};
pub use store::{keys, MemoryStore, PersistentStore, PropertyValue};
