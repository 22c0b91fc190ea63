use crate::item::EquipmentDefinition;
use crate::types::ItemStack;
use crate::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const BUILTIN_EQUIPMENT: &str = include_str!("../data/equipment.toml");

/// TOML layout of an equipment file
#[derive(Debug, Deserialize)]
struct EquipmentFileConfig {
    #[serde(default)]
    equipment: Vec<EquipmentDefinition>,
}

/// Registry of all custom equipment definitions, keyed by custom id
#[derive(Debug, Clone, Default)]
pub struct EquipmentRegistry {
    items: HashMap<String, EquipmentDefinition>,
}

impl EquipmentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the equipment shipped with the crate
    pub fn builtin() -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        registry.load_str(BUILTIN_EQUIPMENT, Path::new("builtin/equipment.toml"))?;
        Ok(registry)
    }

    /// Load all equipment files from a directory (recursively)
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        registry.load_dir(dir)?;
        Ok(registry)
    }

    fn load_dir(&mut self, dir: &Path) -> Result<(), ConfigError> {
        if !dir.exists() {
            return Ok(());
        }

        let entries = std::fs::read_dir(dir).map_err(|e| ConfigError::Io {
            error: e,
            path: Some(dir.to_path_buf()),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| ConfigError::Io {
                error: e,
                path: Some(dir.to_path_buf()),
            })?;
            let path = entry.path();

            if path.is_dir() {
                self.load_dir(&path)?;
            } else if path.extension().is_some_and(|ext| ext == "toml") {
                let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                    error: e,
                    path: Some(path.clone()),
                })?;
                self.load_str(&content, &path)?;
            }
        }

        Ok(())
    }

    /// Parse equipment definitions from a TOML string and add them
    pub fn load_str(&mut self, content: &str, origin: &Path) -> Result<(), ConfigError> {
        let config: EquipmentFileConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
            error: e,
            path: origin.to_path_buf(),
        })?;

        for item in config.equipment {
            if self.items.contains_key(&item.id) {
                return Err(ConfigError::Validation {
                    message: format!("duplicate equipment id '{}'", item.id),
                    path: origin.to_path_buf(),
                });
            }
            self.register(item);
        }
        Ok(())
    }

    /// Add or replace a definition
    pub fn register(&mut self, item: EquipmentDefinition) {
        self.items.insert(item.id.clone(), item);
    }

    /// Get a definition by custom id
    pub fn get(&self, id: &str) -> Option<&EquipmentDefinition> {
        self.items.get(id)
    }

    /// Resolve the definition behind an item stack, if it has one
    pub fn resolve(&self, stack: &ItemStack) -> Option<&EquipmentDefinition> {
        stack.custom_id.as_deref().and_then(|id| self.get(id))
    }

    /// Check if a definition exists
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// List all equipment ids
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(|s| s.as_str())
    }
}
