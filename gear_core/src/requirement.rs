//! Requirement gate - whether a character can use an item properly

use crate::item::EquipmentDefinition;
use crate::registry::EquipmentRegistry;
use crate::types::{Attribute, Attributes, ItemStack};
use std::fmt;

/// The first requirement a character failed to meet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingRequirement {
    pub attribute: Attribute,
    pub required: u32,
    pub current: u32,
}

impl fmt::Display for MissingRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.attribute, self.required)
    }
}

/// Result of checking an item against a character's attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequirementCheck {
    pub valid: bool,
    pub missing: Option<MissingRequirement>,
}

impl RequirementCheck {
    pub fn passed() -> Self {
        RequirementCheck {
            valid: true,
            missing: None,
        }
    }

    pub fn failed(missing: MissingRequirement) -> Self {
        RequirementCheck {
            valid: false,
            missing: Some(missing),
        }
    }
}

/// Check a definition's requirements against attribute levels
///
/// Requirements are scanned in attribute declaration order and the first
/// unmet one is reported.
pub fn check_definition(attributes: &Attributes, item: &EquipmentDefinition) -> RequirementCheck {
    for (attribute, required) in item.requirements_ordered() {
        let current = attributes.get(attribute);
        if current < required {
            return RequirementCheck::failed(MissingRequirement {
                attribute,
                required,
                current,
            });
        }
    }
    RequirementCheck::passed()
}

/// Check an optional item stack
///
/// Empty hands, plain host items and unknown custom ids are always valid.
pub fn check_requirements(
    attributes: &Attributes,
    item: Option<&ItemStack>,
    registry: &EquipmentRegistry,
) -> RequirementCheck {
    match item.and_then(|stack| registry.resolve(stack)) {
        Some(def) => check_definition(attributes, def),
        None => RequirementCheck::passed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemStats;
    use crate::types::Requirements;

    fn registry() -> EquipmentRegistry {
        let mut requirements = Requirements::new();
        requirements.insert(Attribute::Heavy, 20);
        requirements.insert(Attribute::Fortitude, 10);
        let mut registry = EquipmentRegistry::new();
        registry.register(EquipmentDefinition {
            id: "plate".to_string(),
            name: "Plate".to_string(),
            base_item: "minecraft:iron_chestplate".to_string(),
            lore: Vec::new(),
            stats: ItemStats { atk: 0.0, def: 6.0 },
            requirements,
            skill_id: None,
        });
        registry
    }

    #[test]
    fn test_no_item_is_valid() {
        let check = check_requirements(&Attributes::new(), None, &registry());
        assert!(check.valid);
        assert!(check.missing.is_none());
    }

    #[test]
    fn test_plain_item_is_valid() {
        let stack = ItemStack::plain("minecraft:iron_chestplate");
        assert!(check_requirements(&Attributes::new(), Some(&stack), &registry()).valid);
    }

    #[test]
    fn test_first_unmet_requirement_reported() {
        let stack = ItemStack::custom("minecraft:iron_chestplate", "plate");
        let check = check_requirements(&Attributes::new(), Some(&stack), &registry());
        assert!(!check.valid);
        // Fortitude is declared before Heavy
        let missing = check.missing.unwrap();
        assert_eq!(missing.attribute, Attribute::Fortitude);
        assert_eq!(missing.required, 10);
        assert_eq!(missing.to_string(), "Fortitude 10");
    }

    #[test]
    fn test_all_requirements_met() {
        let mut attrs = Attributes::new();
        attrs.set(Attribute::Heavy, 20);
        attrs.set(Attribute::Fortitude, 12);
        let stack = ItemStack::custom("minecraft:iron_chestplate", "plate");
        assert!(check_requirements(&attrs, Some(&stack), &registry()).valid);

        attrs.set(Attribute::Heavy, 19);
        let check = check_requirements(&attrs, Some(&stack), &registry());
        assert_eq!(check.missing.map(|m| m.attribute), Some(Attribute::Heavy));
    }
}
