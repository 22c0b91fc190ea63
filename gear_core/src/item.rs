use crate::types::{Attribute, Requirements};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Flat combat values granted by a piece of equipment
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemStats {
    #[serde(default)]
    pub atk: f64,
    #[serde(default)]
    pub def: f64,
}

/// Static definition behind a custom item id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentDefinition {
    pub id: String,
    /// Display name
    pub name: String,
    /// Host item type the definition is attached to
    pub base_item: String,
    #[serde(default)]
    pub lore: Vec<String>,
    #[serde(default)]
    pub stats: ItemStats,
    /// Attribute minimums to use the item without penalty
    #[serde(default)]
    pub requirements: Requirements,
    /// Skill triggered when the item is used
    #[serde(default)]
    pub skill_id: Option<String>,
}

impl EquipmentDefinition {
    /// Whether the item carries any attribute requirement
    pub fn has_requirements(&self) -> bool {
        self.requirements.values().any(|min| *min > 0)
    }

    /// Requirements in attribute declaration order
    pub fn requirements_ordered(&self) -> impl Iterator<Item = (Attribute, u32)> + '_ {
        Attribute::all()
            .iter()
            .filter_map(move |a| self.requirements.get(a).map(|min| (*a, *min)))
    }
}

impl fmt::Display for EquipmentDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "══ {} ══", self.name)?;
        write!(f, "{}", self.base_item)?;

        if self.stats.atk > 0.0 || self.stats.def > 0.0 {
            writeln!(f)?;
            if self.stats.atk > 0.0 {
                write!(f, "\n  ATK +{}", self.stats.atk)?;
            }
            if self.stats.def > 0.0 {
                write!(f, "\n  DEF +{}", self.stats.def)?;
            }
        }

        for line in &self.lore {
            write!(f, "\n{}", line)?;
        }

        if let Some(ref skill) = self.skill_id {
            write!(f, "\nSkill: {}", skill)?;
        }

        let reqs: Vec<String> = self
            .requirements_ordered()
            .filter(|(_, min)| *min > 0)
            .map(|(a, min)| format!("{} {}", a, min))
            .collect();
        if !reqs.is_empty() {
            write!(f, "\nRequires: {}", reqs.join(", "))?;
        }

        Ok(())
    }
}
