//! Talents and their stat effect table

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Prefix of the store tag that marks an owned talent
pub const TALENT_TAG_PREFIX: &str = "talent:";

/// Health fraction under which the low-health talents activate
pub const LOW_HEALTH_THRESHOLD: f64 = 0.3;

/// Every talent a character can own
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TalentId {
    BruteForce,
    GlassCannon,
    SharpBlade,
    Berserker,
    Assassin,
    EagleEye,
    ToughSkin,
    IronWall,
    LastStand,
    #[serde(rename = "swift_1")]
    Swift1,
    Godspeed,
    Vampirism,
    Evasion,
    ThornsAura,
    ThornsMaster,
    ExpBoost,
    Immortal,
    AquaticLife,
    FullBelly,
    #[serde(rename = "vitality_1")]
    Vitality1,
    #[serde(rename = "vitality_2")]
    Vitality2,
    HeavyStance,
    // Cards whose whole effect is applied once on selection
    TitanStrength,
    ScholarsInsight,
    Awakening,
    Windfall,
    /// Filler card offered when nothing else is eligible
    BasicTraining,
}

impl TalentId {
    pub fn all() -> &'static [TalentId] {
        &[
            TalentId::BruteForce,
            TalentId::GlassCannon,
            TalentId::SharpBlade,
            TalentId::Berserker,
            TalentId::Assassin,
            TalentId::EagleEye,
            TalentId::ToughSkin,
            TalentId::IronWall,
            TalentId::LastStand,
            TalentId::Swift1,
            TalentId::Godspeed,
            TalentId::Vampirism,
            TalentId::Evasion,
            TalentId::ThornsAura,
            TalentId::ThornsMaster,
            TalentId::ExpBoost,
            TalentId::Immortal,
            TalentId::AquaticLife,
            TalentId::FullBelly,
            TalentId::Vitality1,
            TalentId::Vitality2,
            TalentId::HeavyStance,
            TalentId::TitanStrength,
            TalentId::ScholarsInsight,
            TalentId::Awakening,
            TalentId::Windfall,
            TalentId::BasicTraining,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            TalentId::BruteForce => "brute_force",
            TalentId::GlassCannon => "glass_cannon",
            TalentId::SharpBlade => "sharp_blade",
            TalentId::Berserker => "berserker",
            TalentId::Assassin => "assassin",
            TalentId::EagleEye => "eagle_eye",
            TalentId::ToughSkin => "tough_skin",
            TalentId::IronWall => "iron_wall",
            TalentId::LastStand => "last_stand",
            TalentId::Swift1 => "swift_1",
            TalentId::Godspeed => "godspeed",
            TalentId::Vampirism => "vampirism",
            TalentId::Evasion => "evasion",
            TalentId::ThornsAura => "thorns_aura",
            TalentId::ThornsMaster => "thorns_master",
            TalentId::ExpBoost => "exp_boost",
            TalentId::Immortal => "immortal",
            TalentId::AquaticLife => "aquatic_life",
            TalentId::FullBelly => "full_belly",
            TalentId::Vitality1 => "vitality_1",
            TalentId::Vitality2 => "vitality_2",
            TalentId::HeavyStance => "heavy_stance",
            TalentId::TitanStrength => "titan_strength",
            TalentId::ScholarsInsight => "scholars_insight",
            TalentId::Awakening => "awakening",
            TalentId::Windfall => "windfall",
            TalentId::BasicTraining => "basic_training",
        }
    }

    pub fn from_key(key: &str) -> Option<TalentId> {
        TalentId::all().iter().copied().find(|t| t.key() == key)
    }

    /// Store tag for this talent, or `None` for cards that grant no tag
    pub fn tag(&self) -> Option<String> {
        match self {
            TalentId::BasicTraining => None,
            other => Some(format!("{}{}", TALENT_TAG_PREFIX, other.key())),
        }
    }

    /// Parse a `talent:<id>` tag
    pub fn from_tag(tag: &str) -> Option<TalentId> {
        tag.strip_prefix(TALENT_TAG_PREFIX).and_then(TalentId::from_key)
    }
}

impl fmt::Display for TalentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Talents owned by one character
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TalentSet(BTreeSet<TalentId>);

impl TalentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, talent: TalentId) -> bool {
        self.0.contains(&talent)
    }

    /// Add a talent, returning false if it was already owned
    pub fn grant(&mut self, talent: TalentId) -> bool {
        self.0.insert(talent)
    }

    pub fn revoke(&mut self, talent: TalentId) -> bool {
        self.0.remove(&talent)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = TalentId> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<TalentId> for TalentSet {
    fn from_iter<I: IntoIterator<Item = TalentId>>(iter: I) -> Self {
        TalentSet(iter.into_iter().collect())
    }
}

/// Derived stat a talent modifier touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatTarget {
    Atk,
    Def,
    CritChance,
    Evasion,
    Speed,
}

/// Character condition a conditional modifier checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Health fraction below [`LOW_HEALTH_THRESHOLD`]
    LowHealth,
    Sneaking,
}

/// Evaluation stage; modifiers apply stage by stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Flat,
    Percent,
    Conditional,
}

/// One stat effect of a talent
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Modifier {
    Add(StatTarget, f64),
    Multiply(StatTarget, f64),
    MultiplyWhen(Condition, StatTarget, f64),
}

impl Modifier {
    pub fn stage(&self) -> Stage {
        match self {
            Modifier::Add(..) => Stage::Flat,
            Modifier::Multiply(..) => Stage::Percent,
            Modifier::MultiplyWhen(..) => Stage::Conditional,
        }
    }
}

/// Stat modifiers granted by a talent
///
/// Talents whose effect lives outside stat derivation (thorns, lifesteal,
/// regen, health ceiling, knockback) have an empty entry here.
pub fn modifiers(talent: TalentId) -> &'static [Modifier] {
    use Modifier::*;
    use StatTarget::*;

    match talent {
        TalentId::BruteForce => &[Add(Atk, 2.0)],
        TalentId::GlassCannon => &[Multiply(Atk, 1.5)],
        TalentId::SharpBlade => &[Multiply(Atk, 1.1)],
        TalentId::Berserker => &[MultiplyWhen(Condition::LowHealth, Atk, 1.5)],
        TalentId::Assassin => &[MultiplyWhen(Condition::Sneaking, Atk, 2.0)],
        TalentId::EagleEye => &[Add(CritChance, 0.1)],
        TalentId::ToughSkin => &[Add(Def, 2.0)],
        TalentId::IronWall => &[Add(Def, 5.0)],
        TalentId::LastStand => &[MultiplyWhen(Condition::LowHealth, Def, 1.5)],
        TalentId::Swift1 => &[Add(Speed, 5.0)],
        TalentId::Godspeed => &[Add(Speed, 15.0)],
        TalentId::Evasion => &[Add(Evasion, 0.15)],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_roundtrip() {
        for talent in TalentId::all() {
            if let Some(tag) = talent.tag() {
                assert_eq!(TalentId::from_tag(&tag), Some(*talent));
            }
        }
        assert_eq!(TalentId::from_tag("talent:unknown"), None);
        assert_eq!(TalentId::from_tag("cooldown:skill_fireball"), None);
    }

    #[test]
    fn test_filler_grants_no_tag() {
        assert!(TalentId::BasicTraining.tag().is_none());
        assert_eq!(TalentId::Swift1.tag().as_deref(), Some("talent:swift_1"));
    }

    #[test]
    fn test_serde_uses_keys() {
        let set: TalentSet = [TalentId::Vitality2, TalentId::ThornsMaster].into_iter().collect();
        let keys = keys_via_toml(&set);
        assert_eq!(keys, vec!["thorns_master", "vitality_2"]);
    }

    #[test]
    fn test_modifier_stages() {
        assert_eq!(modifiers(TalentId::BruteForce)[0].stage(), Stage::Flat);
        assert_eq!(modifiers(TalentId::SharpBlade)[0].stage(), Stage::Percent);
        assert_eq!(modifiers(TalentId::LastStand)[0].stage(), Stage::Conditional);
        assert!(modifiers(TalentId::Vampirism).is_empty());
    }

    fn keys_via_toml(set: &TalentSet) -> Vec<String> {
        // TOML cannot hold a bare array, so wrap it
        #[derive(Serialize)]
        struct Wrap<'a> {
            talents: &'a TalentSet,
        }
        let text = toml::to_string(&Wrap { talents: set }).unwrap();
        let value: toml::Value = toml::from_str(&text).unwrap();
        value["talents"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect()
    }
}
