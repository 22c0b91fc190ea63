use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Highest level any single attribute can reach
pub const MAX_ATTRIBUTE: u32 = 100;

/// Character attributes, including the weapon and element proficiency trees
///
/// Serialized through its storage key so it can be used as a map key in any format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Attribute {
    Strength,
    Fortitude,
    Agility,
    Defense,
    Intelligence,
    Willpower,
    Charisma,
    // Element trees
    Flame,
    Frost,
    Gale,
    Thunder,
    // Armour proficiency trees
    Heavy,
    Medium,
    Light,
}

impl Attribute {
    /// Get all attributes in declaration order
    pub fn all() -> &'static [Attribute] {
        &[
            Attribute::Strength,
            Attribute::Fortitude,
            Attribute::Agility,
            Attribute::Defense,
            Attribute::Intelligence,
            Attribute::Willpower,
            Attribute::Charisma,
            Attribute::Flame,
            Attribute::Frost,
            Attribute::Gale,
            Attribute::Thunder,
            Attribute::Heavy,
            Attribute::Medium,
            Attribute::Light,
        ]
    }

    /// Storage key fragment (`strength`, `fortitude`, ...)
    pub fn key(&self) -> &'static str {
        match self {
            Attribute::Strength => "strength",
            Attribute::Fortitude => "fortitude",
            Attribute::Agility => "agility",
            Attribute::Defense => "defense",
            Attribute::Intelligence => "intelligence",
            Attribute::Willpower => "willpower",
            Attribute::Charisma => "charisma",
            Attribute::Flame => "flame",
            Attribute::Frost => "frost",
            Attribute::Gale => "gale",
            Attribute::Thunder => "thunder",
            Attribute::Heavy => "heavy",
            Attribute::Medium => "medium",
            Attribute::Light => "light",
        }
    }

    /// Parse a storage key back into an attribute
    pub fn from_key(key: &str) -> Option<Attribute> {
        Attribute::all().iter().copied().find(|a| a.key() == key)
    }
}

/// A string that names no known attribute
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown attribute: {0}")]
pub struct UnknownAttribute(pub String);

impl TryFrom<String> for Attribute {
    type Error = UnknownAttribute;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Attribute::from_key(&value).ok_or(UnknownAttribute(value))
    }
}

impl From<Attribute> for String {
    fn from(attribute: Attribute) -> Self {
        attribute.key().to_string()
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Attribute::Strength => "Strength",
            Attribute::Fortitude => "Fortitude",
            Attribute::Agility => "Agility",
            Attribute::Defense => "Defense",
            Attribute::Intelligence => "Intelligence",
            Attribute::Willpower => "Willpower",
            Attribute::Charisma => "Charisma",
            Attribute::Flame => "Flame",
            Attribute::Frost => "Frost",
            Attribute::Gale => "Gale",
            Attribute::Thunder => "Thunder",
            Attribute::Heavy => "Heavy Weapons",
            Attribute::Medium => "Medium Weapons",
            Attribute::Light => "Light Weapons",
        };
        write!(f, "{}", name)
    }
}

/// Attribute levels of one character, each kept within `[0, MAX_ATTRIBUTE]`
///
/// Missing entries read as 0, so a default value is a fresh level-1 build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes {
    values: BTreeMap<Attribute, u32>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current level of an attribute
    pub fn get(&self, attribute: Attribute) -> u32 {
        self.values.get(&attribute).copied().unwrap_or(0)
    }

    /// Set an attribute, clamping to the allowed range
    ///
    /// Zero levels are not stored, so equal builds compare equal.
    pub fn set(&mut self, attribute: Attribute, value: u32) {
        if value == 0 {
            self.values.remove(&attribute);
        } else {
            self.values.insert(attribute, value.min(MAX_ATTRIBUTE));
        }
    }

    /// Add to an attribute, saturating at the cap. Returns the new value.
    pub fn add(&mut self, attribute: Attribute, amount: u32) -> u32 {
        let value = self.get(attribute).saturating_add(amount).min(MAX_ATTRIBUTE);
        self.set(attribute, value);
        value
    }

    /// Whether an attribute already sits at the cap
    pub fn is_maxed(&self, attribute: Attribute) -> bool {
        self.get(attribute) >= MAX_ATTRIBUTE
    }

    /// Set every attribute to the same value
    pub fn fill(&mut self, value: u32) {
        for attribute in Attribute::all() {
            self.set(*attribute, value);
        }
    }

    /// Iterate every attribute with its value (zeros included)
    pub fn iter(&self) -> impl Iterator<Item = (Attribute, u32)> + '_ {
        Attribute::all().iter().map(move |a| (*a, self.get(*a)))
    }

    /// Sum of all attribute levels
    pub fn total(&self) -> u32 {
        self.values.values().sum()
    }
}

/// Equipment slot on a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    MainHand,
    Head,
    Chest,
    Legs,
    Feet,
}

impl EquipmentSlot {
    /// Slots whose items contribute defense and armour requirements
    pub fn armour() -> &'static [EquipmentSlot] {
        &[
            EquipmentSlot::Head,
            EquipmentSlot::Chest,
            EquipmentSlot::Legs,
            EquipmentSlot::Feet,
        ]
    }
}

/// A generic item stack as the host world reports it
///
/// Only stacks carrying a custom id resolve to an [`crate::EquipmentDefinition`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub type_id: String,
    #[serde(default)]
    pub custom_id: Option<String>,
}

impl ItemStack {
    /// A plain host item with no custom definition
    pub fn plain(type_id: impl Into<String>) -> Self {
        ItemStack {
            type_id: type_id.into(),
            custom_id: None,
        }
    }

    /// A host item tagged with a custom equipment id
    pub fn custom(type_id: impl Into<String>, custom_id: impl Into<String>) -> Self {
        ItemStack {
            type_id: type_id.into(),
            custom_id: Some(custom_id.into()),
        }
    }
}

/// Attribute minimums required to use an item effectively
pub type Requirements = BTreeMap<Attribute, u32>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_clamps_to_cap() {
        let mut attrs = Attributes::new();
        attrs.set(Attribute::Strength, 250);
        assert_eq!(attrs.get(Attribute::Strength), MAX_ATTRIBUTE);

        attrs.set(Attribute::Agility, 98);
        assert_eq!(attrs.add(Attribute::Agility, 5), MAX_ATTRIBUTE);
        assert!(attrs.is_maxed(Attribute::Agility));
    }

    #[test]
    fn test_missing_attribute_reads_zero() {
        let attrs = Attributes::new();
        assert_eq!(attrs.get(Attribute::Thunder), 0);
        assert_eq!(attrs.iter().count(), Attribute::all().len());
    }

    #[test]
    fn test_key_roundtrip() {
        for attribute in Attribute::all() {
            assert_eq!(Attribute::from_key(attribute.key()), Some(*attribute));
        }
        assert_eq!(Attribute::from_key("luck"), None);
    }

    #[test]
    fn test_attributes_serialize_as_map() {
        let mut attrs = Attributes::new();
        attrs.set(Attribute::Willpower, 7);
        let toml = toml::to_string(&attrs).unwrap();
        assert!(toml.contains("willpower = 7"));
    }
}
