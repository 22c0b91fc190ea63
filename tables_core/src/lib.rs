//! tables_core - Static game content loaded from TOML
//!
//! Talent cards, quests, bosses and skills. Built-in definitions are compiled
//! in; [`ContentRegistry::load`] reads the same layout from a directory.

mod boss;
mod card;
mod config;
mod drop;
mod quest;
mod registry;
mod skill;

pub use boss::{BossDefinition, BossEquipment};
pub use card::{BonusTarget, CardCondition, CardEffect, Rarity, TalentCard};
pub use drop::{Drop, DropKind};
pub use quest::{QuestDefinition, QuestKind, QuestReward};
pub use registry::ContentRegistry;
pub use skill::{cooldown_tag, SkillDefinition, COOLDOWN_TAG_PREFIX};

use std::path::PathBuf;
use thiserror::Error;

/// Error loading content configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading '{path:?}': {error}")]
    Io {
        error: std::io::Error,
        path: Option<PathBuf>,
    },
    #[error("Parse error in '{path}': {error}")]
    Parse {
        error: toml::de::Error,
        path: PathBuf,
    },
    #[error("Validation error in '{path}': {message}")]
    Validation { message: String, path: PathBuf },
}

/// Error turning a parsed entry into a definition
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("Invalid entry type: {0}")]
    InvalidEntryType(String),
    #[error("Missing field: {0}")]
    MissingField(String),
    #[error("Chance {0} outside [0, 1]")]
    InvalidChance(f64),
    #[error("Kill amount must be positive")]
    ZeroAmount,
}
