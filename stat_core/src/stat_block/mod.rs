//! StatBlock - Derived combat statistics
//!
//! A stat block is recomputed from character state whenever it is needed
//! and never stored.

mod aggregator;

pub use aggregator::{ActiveConditions, StatAccumulator};

use crate::config::GameConstants;
use crate::talent::{TalentSet, LOW_HEALTH_THRESHOLD};
use gear_core::{Attribute, Attributes};
use serde::{Deserialize, Serialize};

/// Derived combat statistics of one combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatBlock {
    pub atk: f64,
    pub def: f64,
    pub crit_chance: f64,
    pub crit_mult: f64,
    pub evasion_chance: f64,
    pub speed_index: i64,
    pub max_resource: f64,
    /// Resource regenerated per second
    pub resource_regen: f64,
}

/// Anything that can take part in a hit
pub trait Combatant {
    fn stat_block(&self, constants: &GameConstants) -> StatBlock;
}

/// Derive the stat block of any combatant
pub fn derive(combatant: &dyn Combatant, constants: &GameConstants) -> StatBlock {
    combatant.stat_block(constants)
}

/// Everything about a player that feeds derivation
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSheet {
    pub level: u32,
    pub attributes: Attributes,
    pub talents: TalentSet,
    /// Flat attack of the main-hand item
    pub weapon_atk: f64,
    /// Summed flat defense of the armour slots
    pub armour_def: f64,
    /// Some equipped armour piece has unmet requirements
    pub heavy_armour_penalty: bool,
    /// Current health over maximum health
    pub health_fraction: f64,
    pub sneaking: bool,
}

impl PlayerSheet {
    pub fn new(level: u32, attributes: Attributes) -> Self {
        PlayerSheet {
            level,
            attributes,
            talents: TalentSet::new(),
            weapon_atk: 0.0,
            armour_def: 0.0,
            heavy_armour_penalty: false,
            health_fraction: 1.0,
            sneaking: false,
        }
    }

    pub fn with_talents(mut self, talents: TalentSet) -> Self {
        self.talents = talents;
        self
    }

    pub fn with_equipment(mut self, weapon_atk: f64, armour_def: f64) -> Self {
        self.weapon_atk = weapon_atk;
        self.armour_def = armour_def;
        self
    }

    pub fn with_heavy_armour_penalty(mut self, penalty: bool) -> Self {
        self.heavy_armour_penalty = penalty;
        self
    }

    pub fn with_health_fraction(mut self, fraction: f64) -> Self {
        self.health_fraction = fraction;
        self
    }

    pub fn with_sneaking(mut self, sneaking: bool) -> Self {
        self.sneaking = sneaking;
        self
    }

    fn conditions(&self) -> ActiveConditions {
        ActiveConditions {
            low_health: self.health_fraction < LOW_HEALTH_THRESHOLD,
            sneaking: self.sneaking,
        }
    }

    /// Speed index before presentation clamping
    pub fn speed_index(&self, constants: &GameConstants, acc: &StatAccumulator) -> i64 {
        let combat = &constants.combat;
        let agility = self.attributes.get(Attribute::Agility) as f64;
        let mut speed = combat.speed_base + (agility * combat.speed_per_agility).floor() as i64;
        speed += acc.speed_flat;
        if self.heavy_armour_penalty {
            speed = (speed - combat.heavy_speed_penalty).max(combat.heavy_speed_floor);
        }
        speed
    }
}

impl Combatant for PlayerSheet {
    fn stat_block(&self, constants: &GameConstants) -> StatBlock {
        let combat = &constants.combat;
        let resource = &constants.resource;
        let attr = |a: Attribute| self.attributes.get(a) as f64;

        let acc = StatAccumulator::from_talents(&self.talents, self.conditions());

        let base_atk =
            self.level as f64 + attr(Attribute::Strength) * combat.atk_per_strength + self.weapon_atk;
        let base_def = attr(Attribute::Defense)
            + attr(Attribute::Fortitude) * combat.def_per_fortitude
            + self.armour_def;

        StatBlock {
            atk: acc.atk(base_atk).floor(),
            def: acc.def(base_def).floor(),
            crit_chance: combat.base_crit_chance
                + attr(Attribute::Agility) * combat.crit_per_agility
                + attr(Attribute::Intelligence) * combat.crit_per_intelligence
                + acc.crit_chance_flat,
            crit_mult: combat.base_crit_mult + attr(Attribute::Strength) * combat.crit_mult_per_strength,
            evasion_chance: acc.evasion_flat + attr(Attribute::Agility) * combat.evasion_per_agility,
            speed_index: self.speed_index(constants, &acc),
            max_resource: (resource.base + attr(Attribute::Intelligence) * resource.per_intelligence)
                .floor(),
            resource_regen: resource.regen_base
                + attr(Attribute::Willpower) * resource.regen_per_willpower,
        }
    }
}

/// Non-player combatant with the fixed minimal block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MobSheet;

impl Combatant for MobSheet {
    fn stat_block(&self, constants: &GameConstants) -> StatBlock {
        let combat = &constants.combat;
        StatBlock {
            atk: combat.mob_atk,
            def: combat.mob_def,
            crit_chance: combat.base_crit_chance,
            crit_mult: combat.base_crit_mult,
            evasion_chance: 0.0,
            speed_index: combat.speed_base,
            max_resource: 0.0,
            resource_regen: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::talent::TalentId;
    use proptest::prelude::*;

    fn player(level: u32, pairs: &[(Attribute, u32)]) -> PlayerSheet {
        let mut attrs = Attributes::new();
        for (a, v) in pairs {
            attrs.set(*a, *v);
        }
        PlayerSheet::new(level, attrs)
    }

    #[test]
    fn test_fresh_character() {
        let constants = GameConstants::default();
        let stats = derive(&player(1, &[]), &constants);
        assert_eq!(stats.atk, 1.0);
        assert_eq!(stats.def, 0.0);
        assert!((stats.crit_chance - 0.05).abs() < 1e-9);
        assert!((stats.crit_mult - 1.5).abs() < 1e-9);
        assert_eq!(stats.speed_index, 10);
        assert_eq!(stats.max_resource, 20.0);
        assert!((stats.resource_regen - 1.0).abs() < 1e-9);
        assert_eq!(stats.evasion_chance, 0.0);
    }

    #[test]
    fn test_attack_formula_with_talents() {
        let constants = GameConstants::default();
        let sheet = player(5, &[(Attribute::Strength, 21)])
            .with_equipment(6.0, 0.0)
            .with_talents([TalentId::BruteForce, TalentId::SharpBlade].into_iter().collect());
        // (5 + 10.5 + 6 + 2) * 1.1 = 25.85
        assert_eq!(derive(&sheet, &constants).atk, 25.0);
    }

    #[test]
    fn test_berserker_only_below_threshold() {
        let constants = GameConstants::default();
        let talents: TalentSet = [TalentId::Berserker].into_iter().collect();
        let sheet = player(10, &[]).with_talents(talents);

        assert_eq!(derive(&sheet.clone().with_health_fraction(0.5), &constants).atk, 10.0);
        assert_eq!(derive(&sheet.with_health_fraction(0.29), &constants).atk, 15.0);
    }

    #[test]
    fn test_defense_formula() {
        let constants = GameConstants::default();
        let sheet = player(1, &[(Attribute::Defense, 4), (Attribute::Fortitude, 5)])
            .with_equipment(0.0, 3.0)
            .with_talents([TalentId::IronWall].into_iter().collect());
        // 4 + 2.5 + 3 + 5 = 14.5
        assert_eq!(derive(&sheet, &constants).def, 14.0);
    }

    #[test]
    fn test_heavy_armour_slows_to_floor() {
        let constants = GameConstants::default();
        let sheet = player(1, &[(Attribute::Agility, 50)]);
        assert_eq!(derive(&sheet, &constants).speed_index, 20);

        let slowed = sheet.with_heavy_armour_penalty(true);
        assert_eq!(derive(&slowed, &constants).speed_index, 10);

        let slowest = player(1, &[]).with_heavy_armour_penalty(true);
        assert_eq!(derive(&slowest, &constants).speed_index, 5);
    }

    #[test]
    fn test_evasion_talent_and_agility() {
        let constants = GameConstants::default();
        let sheet = player(1, &[(Attribute::Agility, 100)])
            .with_talents([TalentId::Evasion].into_iter().collect());
        assert!((derive(&sheet, &constants).evasion_chance - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_mob_block_is_fixed() {
        let constants = GameConstants::default();
        let stats = derive(&MobSheet, &constants);
        assert_eq!(stats.atk, 5.0);
        assert_eq!(stats.def, 0.0);
        assert!((stats.crit_chance - constants.combat.base_crit_chance).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn test_monotonic_in_attributes(
            level in 1u32..=20,
            base in 0u32..100,
            attribute_index in 0usize..5,
        ) {
            let constants = GameConstants::default();
            let attribute = [
                Attribute::Strength,
                Attribute::Fortitude,
                Attribute::Intelligence,
                Attribute::Willpower,
                Attribute::Agility,
            ][attribute_index];

            let low = derive(&player(level, &[(attribute, base)]), &constants);
            let high = derive(&player(level, &[(attribute, base + 1)]), &constants);

            match attribute {
                Attribute::Strength => {
                    prop_assert!(high.atk >= low.atk);
                    prop_assert!(high.crit_mult >= low.crit_mult);
                }
                Attribute::Fortitude => prop_assert!(high.def >= low.def),
                Attribute::Intelligence => {
                    prop_assert!(high.max_resource >= low.max_resource);
                    prop_assert!(high.crit_chance >= low.crit_chance);
                }
                Attribute::Willpower => prop_assert!(high.resource_regen >= low.resource_regen),
                _ => {
                    prop_assert!(high.crit_chance >= low.crit_chance);
                    prop_assert!(high.speed_index >= low.speed_index);
                    prop_assert!(high.evasion_chance >= low.evasion_chance);
                }
            }
        }
    }
}
