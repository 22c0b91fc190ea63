use crate::config::BossConfig;
use crate::drop::Drop;
use crate::DefinitionError;
use rand::Rng;
use serde::Deserialize;

/// Items a boss spawns wearing
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BossEquipment {
    /// Custom equipment id or plain host item
    #[serde(default)]
    pub main_hand: Option<String>,
    #[serde(default)]
    pub head: Option<String>,
    #[serde(default)]
    pub chest: Option<String>,
    #[serde(default)]
    pub legs: Option<String>,
    #[serde(default)]
    pub feet: Option<String>,
}

/// A boss definition
#[derive(Debug, Clone, PartialEq)]
pub struct BossDefinition {
    pub id: String,
    pub name: String,
    pub entity_type: String,
    /// Movement speed override
    pub speed: Option<f64>,
    pub equipment: BossEquipment,
    pub drops: Vec<Drop>,
}

impl BossDefinition {
    /// Parse a boss from config
    pub fn from_config(config: BossConfig) -> Result<Self, DefinitionError> {
        let drops = config
            .drops
            .into_iter()
            .map(Drop::from_config)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BossDefinition {
            id: config.id,
            name: config.name,
            entity_type: config.entity_type,
            speed: config.speed,
            equipment: config.equipment,
            drops,
        })
    }

    /// Roll every drop independently against its own chance
    pub fn roll_drops<R: Rng>(&self, rng: &mut R) -> Vec<&Drop> {
        self.drops
            .iter()
            .filter(|drop| match drop.chance {
                Some(chance) => rng.gen::<f64>() < chance,
                None => true,
            })
            .collect()
    }
}
