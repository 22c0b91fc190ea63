use crate::config::QuestConfig;
use crate::DefinitionError;

/// What a quest asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestKind {
    /// Kill `amount` entities of the host type `target`
    Kill { target: String, amount: u32 },
}

/// Reward granted once on claim
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestReward {
    pub xp: Option<u64>,
    /// Plain host item type
    pub item: Option<String>,
    pub count: u32,
}

/// A quest definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: QuestKind,
    pub reward: QuestReward,
}

impl QuestDefinition {
    /// Parse a quest from config
    pub fn from_config(config: QuestConfig) -> Result<Self, DefinitionError> {
        let kind = match config.quest_type.as_str() {
            "kill" => {
                let target = config
                    .target
                    .ok_or_else(|| DefinitionError::MissingField("target".to_string()))?;
                let amount = config
                    .amount
                    .ok_or_else(|| DefinitionError::MissingField("amount".to_string()))?;
                if amount == 0 {
                    return Err(DefinitionError::ZeroAmount);
                }
                QuestKind::Kill { target, amount }
            }
            other => return Err(DefinitionError::InvalidEntryType(other.to_string())),
        };

        Ok(QuestDefinition {
            id: config.id,
            name: config.name,
            description: config.description,
            kind,
            reward: QuestReward {
                xp: config.reward.xp,
                item: config.reward.item,
                count: config.reward.count.unwrap_or(1),
            },
        })
    }

    /// Required progress to complete the quest
    pub fn goal(&self) -> u32 {
        match &self.kind {
            QuestKind::Kill { amount, .. } => *amount,
        }
    }

    /// Whether killing an entity of this type advances the quest
    pub fn counts_kill_of(&self, entity_type: &str) -> bool {
        match &self.kind {
            QuestKind::Kill { target, .. } => target == entity_type,
        }
    }
}
