//! stat_core - Stat derivation and hit resolution
//!
//! This library provides:
//! - StatBlock: Combat statistics derived from attributes, equipment and talents
//! - Talents: The talent identifiers and their stat effect table
//! - Presentation: Health ceiling, movement and knockback values for the host
//! - Combat resolution: Turning one damage notification into true damage
//!
//! # Quick Start
//!
//! ```rust
//! use stat_core::prelude::*;
//!
//! let constants = GameConstants::default();
//! let mut attributes = Attributes::new();
//! attributes.set(Attribute::Strength, 20);
//!
//! let sheet = PlayerSheet::new(5, attributes).with_equipment(6.0, 0.0);
//! let stats = derive(&sheet, &constants);
//! assert_eq!(stats.atk, 21.0);
//!
//! let outcome = resolve_hit(
//!     Attacker::Player { stats: &stats, talents: &sheet.talents, requirement_met: true },
//!     Defender::NonPlayer,
//!     1.0,
//!     &constants,
//! );
//! assert!(outcome.final_damage >= 21.0);
//! ```

pub mod combat;
pub mod config;
pub mod prelude;
pub mod presentation;
pub mod stat_block;
pub mod talent;

// Core API - what most users need
pub use stat_block::{derive, Combatant, MobSheet, PlayerSheet, StatBlock};
pub use combat::{resolve_hit, resolve_hit_with_rng, Attacker, Defender, HitOutcome};
pub use presentation::{health_ceiling, present, Presentation};
pub use talent::{TalentId, TalentSet};

// Configuration
pub use config::{ConfigError, GameConstants};
