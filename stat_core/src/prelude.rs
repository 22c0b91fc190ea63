//! Prelude module for convenient imports
//!
//! ```rust
//! use stat_core::prelude::*;
//! ```

// Derivation
pub use crate::stat_block::{derive, Combatant, MobSheet, PlayerSheet, StatBlock};
pub use crate::presentation::{present, Presentation};
pub use crate::talent::{TalentId, TalentSet};

// Combat
pub use crate::combat::{resolve_hit, resolve_hit_with_rng, Attacker, Defender, HitOutcome};

// Config
pub use crate::config::GameConstants;

// Re-exports from gear_core
pub use gear_core::{Attribute, Attributes};
