//! Hit outcome - What a single resolved hit did

use serde::{Deserialize, Serialize};

/// Result of resolving one hit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HitOutcome {
    /// Damage before the defender's mitigation
    pub raw_damage: f64,
    /// Damage to subtract from the victim's virtual health (floored)
    pub final_damage: f64,
    pub is_critical: bool,
    pub dodged: bool,
    /// The attacker's main-hand requirements were unmet
    pub penalty: bool,
    /// Virtual health restored to the attacker
    pub lifesteal: f64,
    /// Separate reflected damage applications on the attacker
    pub thorns: Vec<f64>,
}

impl HitOutcome {
    /// Whether the hit changes the victim's health at all
    pub fn landed(&self) -> bool {
        !self.dodged && self.final_damage > 0.0
    }
}
