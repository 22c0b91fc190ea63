use crate::boss::BossEquipment;
use crate::card::TalentCard;
use crate::skill::SkillDefinition;
use serde::Deserialize;

/// TOML layout of a content file
///
/// A file may hold any mix of sections.
#[derive(Debug, Default, Deserialize)]
pub struct ContentFileConfig {
    #[serde(default)]
    pub talents: Vec<TalentCard>,
    #[serde(default)]
    pub quests: Vec<QuestConfig>,
    #[serde(default)]
    pub bosses: Vec<BossConfig>,
    #[serde(default)]
    pub skills: Vec<SkillDefinition>,
}

/// Configuration for a single quest
#[derive(Debug, Deserialize)]
pub struct QuestConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub quest_type: String,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub amount: Option<u32>,
    #[serde(default)]
    pub reward: RewardConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct RewardConfig {
    #[serde(default)]
    pub xp: Option<u64>,
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub count: Option<u32>,
}

/// Configuration for a boss
#[derive(Debug, Deserialize)]
pub struct BossConfig {
    pub id: String,
    pub name: String,
    /// Host entity type the boss is spawned as
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub equipment: BossEquipment,
    #[serde(default)]
    pub drops: Vec<DropConfig>,
}

/// Configuration for a single boss drop
#[derive(Debug, Deserialize)]
pub struct DropConfig {
    #[serde(rename = "type")]
    pub drop_type: String,
    #[serde(default)]
    pub amount: Option<u64>,
    #[serde(default)]
    pub id: Option<String>,
    /// Chance in `[0, 1]`; absent means guaranteed
    #[serde(default)]
    pub chance: Option<f64>,
}
