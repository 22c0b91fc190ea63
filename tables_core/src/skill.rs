use serde::Deserialize;

/// Prefix shared by every skill cooldown tag
pub const COOLDOWN_TAG_PREFIX: &str = "cooldown:skill_";

/// An active skill bound to an equipment item
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkillDefinition {
    pub id: String,
    pub name: String,
    /// Cooldown in seconds
    pub cooldown_secs: f64,
    #[serde(default)]
    pub mana_cost: f64,
}

impl SkillDefinition {
    /// Store tag present while the skill is cooling down
    pub fn cooldown_tag(&self) -> String {
        cooldown_tag(&self.id)
    }
}

/// Cooldown tag for a skill id
pub fn cooldown_tag(skill_id: &str) -> String {
    format!("{}{}", COOLDOWN_TAG_PREFIX, skill_id)
}
