//! Talent cards offered on level-up

use gear_core::{Attribute, Attributes, UnknownAttribute};
use serde::Deserialize;
use stat_core::{TalentId, TalentSet};
use std::collections::BTreeMap;
use std::fmt;

/// How rare a card is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Epic,
    Legendary,
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rarity::Common => "COMMON",
            Rarity::Rare => "RARE",
            Rarity::Epic => "EPIC",
            Rarity::Legendary => "LEGENDARY",
        };
        f.write_str(name)
    }
}

/// Data predicate deciding whether a card may be offered
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CardCondition {
    #[serde(default)]
    pub min_level: u32,
    /// Attribute minimums
    #[serde(default)]
    pub attributes: BTreeMap<Attribute, u32>,
    /// Talents that must already be owned
    #[serde(default)]
    pub requires: Vec<TalentId>,
}

impl CardCondition {
    pub fn passes(&self, level: u32, attributes: &Attributes, talents: &TalentSet) -> bool {
        level >= self.min_level
            && self
                .attributes
                .iter()
                .all(|(attribute, min)| attributes.get(*attribute) >= *min)
            && self.requires.iter().all(|t| talents.has(*t))
    }

    pub fn is_empty(&self) -> bool {
        self.min_level == 0 && self.attributes.is_empty() && self.requires.is_empty()
    }
}

impl fmt::Display for CardCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("None");
        }
        let mut parts = Vec::new();
        if self.min_level > 0 {
            parts.push(format!("Lv.{}", self.min_level));
        }
        for (attribute, min) in &self.attributes {
            parts.push(format!("{} {}", attribute, min));
        }
        for talent in &self.requires {
            parts.push(format!("Talent {}", talent));
        }
        f.write_str(&parts.join(", "))
    }
}

/// Attributes touched by a stat bonus
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawTarget")]
pub enum BonusTarget {
    All,
    One(Attribute),
    Many(Vec<Attribute>),
}

impl BonusTarget {
    pub fn attributes(&self) -> Vec<Attribute> {
        match self {
            BonusTarget::All => Attribute::all().to_vec(),
            BonusTarget::One(attribute) => vec![*attribute],
            BonusTarget::Many(list) => list.clone(),
        }
    }
}

/// `"all"`, a single attribute key, or a list of keys
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTarget {
    Single(String),
    List(Vec<String>),
}

impl TryFrom<RawTarget> for BonusTarget {
    type Error = UnknownAttribute;

    fn try_from(raw: RawTarget) -> Result<Self, Self::Error> {
        match raw {
            RawTarget::Single(key) if key == "all" => Ok(BonusTarget::All),
            RawTarget::Single(key) => Attribute::try_from(key).map(BonusTarget::One),
            RawTarget::List(keys) => keys
                .into_iter()
                .map(Attribute::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(BonusTarget::Many),
        }
    }
}

/// What selecting a card does beyond granting its tag
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CardEffect {
    Xp { amount: u64 },
    StatBonus { target: BonusTarget, amount: u32 },
    /// Tag only; the talent acts through derivation or combat
    Passive,
}

/// A talent card definition
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TalentCard {
    pub id: TalentId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub condition: CardCondition,
    pub effect: CardEffect,
}

impl TalentCard {
    /// Whether the card may be offered to this character
    pub fn eligible(&self, level: u32, attributes: &Attributes, talents: &TalentSet) -> bool {
        !talents.has(self.id) && self.condition.passes(level, attributes, talents)
    }
}
