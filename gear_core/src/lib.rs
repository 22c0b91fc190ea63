//! gear_core - Character attributes, equipment definitions and requirement checks

pub mod item;
pub mod loadout;
pub mod registry;
pub mod requirement;
pub mod types;

pub use item::{EquipmentDefinition, ItemStats};
pub use loadout::Loadout;
pub use registry::EquipmentRegistry;
pub use requirement::{check_definition, check_requirements, MissingRequirement, RequirementCheck};
pub use types::{
    Attribute, Attributes, EquipmentSlot, ItemStack, Requirements, UnknownAttribute, MAX_ATTRIBUTE,
};

use std::path::PathBuf;
use thiserror::Error;

/// Error loading equipment configuration
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
