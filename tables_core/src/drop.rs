use crate::config::DropConfig;
use crate::DefinitionError;

/// What a boss drop grants
#[derive(Debug, Clone, PartialEq)]
pub enum DropKind {
    /// Experience credited to the killer
    Xp(u64),
    /// A custom equipment item spawned where the boss died
    Item(String),
}

/// One entry of a boss's drop list
#[derive(Debug, Clone, PartialEq)]
pub struct Drop {
    pub kind: DropKind,
    pub chance: Option<f64>,
}

impl Drop {
    /// Parse a drop from config
    pub fn from_config(config: DropConfig) -> Result<Self, DefinitionError> {
        let kind = match config.drop_type.as_str() {
            "xp" => DropKind::Xp(
                config
                    .amount
                    .ok_or_else(|| DefinitionError::MissingField("amount".to_string()))?,
            ),
            "item" => DropKind::Item(
                config
                    .id
                    .ok_or_else(|| DefinitionError::MissingField("id".to_string()))?,
            ),
            other => return Err(DefinitionError::InvalidEntryType(other.to_string())),
        };

        if let Some(chance) = config.chance {
            if !(0.0..=1.0).contains(&chance) {
                return Err(DefinitionError::InvalidChance(chance));
            }
        }

        Ok(Drop {
            kind,
            chance: config.chance,
        })
    }
}
