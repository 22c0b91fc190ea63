//! Values pushed to the host's native health, movement and knockback systems

use crate::config::GameConstants;
use crate::stat_block::{Combatant, PlayerSheet};
use crate::talent::{TalentId, TalentSet};
use gear_core::Attribute;
use serde::{Deserialize, Serialize};

/// Engine-facing values recomputed after every progression change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    /// Maximum virtual health
    pub health_ceiling: f64,
    pub movement_index: i64,
    pub knockback_resistant: bool,
    /// Light-weapon proficiency mirrored for ranged hits
    pub arrow_damage: u32,
}

/// Maximum health for a fortitude level and talent set
pub fn health_ceiling(fortitude: u32, talents: &TalentSet, constants: &GameConstants) -> f64 {
    let p = &constants.presentation;
    let mut health = p.base_health + fortitude as f64 * p.health_per_fortitude;
    if talents.has(TalentId::Vitality1) {
        health += p.vitality_1_health;
    }
    if talents.has(TalentId::Vitality2) {
        health += p.vitality_2_health;
    }
    if talents.has(TalentId::GlassCannon) {
        health = (health * p.glass_cannon_health).floor();
    }
    health.clamp(p.min_health, p.max_health)
}

/// Compute every presentation value for a player
pub fn present(sheet: &PlayerSheet, constants: &GameConstants) -> Presentation {
    let stats = sheet.stat_block(constants);
    Presentation {
        health_ceiling: health_ceiling(
            sheet.attributes.get(Attribute::Fortitude),
            &sheet.talents,
            constants,
        ),
        movement_index: stats
            .speed_index
            .clamp(0, constants.presentation.max_movement),
        knockback_resistant: sheet.talents.has(TalentId::HeavyStance),
        arrow_damage: sheet.attributes.get(Attribute::Light),
    }
}
