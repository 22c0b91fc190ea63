//! Game constants configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{load_toml, ConfigError};

/// Tunable game constants
///
/// Passed by reference into derivation and resolution. Every field has a
/// serde default, so a partial TOML file only overrides what it names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameConstants {
    #[serde(default)]
    pub combat: CombatConstants,
    #[serde(default)]
    pub resource: ResourceConstants,
    #[serde(default)]
    pub progression: ProgressionConstants,
    #[serde(default)]
    pub presentation: PresentationConstants,
    #[serde(default)]
    pub death: DeathConstants,
    #[serde(default)]
    pub tick: TickConstants,
}

impl GameConstants {
    /// Load constants from a TOML file
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let constants: GameConstants = load_toml(path)?;
        constants.validate(path)?;
        Ok(constants)
    }

    /// Parse constants from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let origin = Path::new("<string>");
        let constants: GameConstants = toml::from_str(content).map_err(|e| ConfigError::Parse {
            error: e,
            path: origin.to_path_buf(),
        })?;
        constants.validate(origin)?;
        Ok(constants)
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |message: &str| {
            Err(ConfigError::Validation {
                message: message.to_string(),
                path: path.to_path_buf(),
            })
        };

        if self.progression.max_level == 0 {
            return invalid("progression.max_level must be at least 1");
        }
        if self.progression.points_per_level == 0 {
            return invalid("progression.points_per_level must be at least 1");
        }
        if self.progression.max_profiles == 0 {
            return invalid("progression.max_profiles must be at least 1");
        }
        if self.progression.offer_count == 0 {
            return invalid("progression.offer_count must be at least 1");
        }
        if self.tick.cycle_ticks == 0 || self.tick.ticks_per_second == 0 {
            return invalid("tick intervals must be positive");
        }
        if self.presentation.min_health > self.presentation.max_health {
            return invalid("presentation.min_health exceeds max_health");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatConstants {
    #[serde(default = "default_base_crit_chance")]
    pub base_crit_chance: f64,
    /// Base critical multiplier (1.5 = 150%)
    #[serde(default = "default_base_crit_mult")]
    pub base_crit_mult: f64,
    #[serde(default = "default_crit_per_agility")]
    pub crit_per_agility: f64,
    #[serde(default = "default_crit_per_intelligence")]
    pub crit_per_intelligence: f64,
    #[serde(default = "default_crit_mult_per_strength")]
    pub crit_mult_per_strength: f64,
    #[serde(default = "default_atk_per_strength")]
    pub atk_per_strength: f64,
    /// Defense gained per fortitude level
    #[serde(default = "default_def_per_fortitude")]
    pub def_per_fortitude: f64,
    #[serde(default = "default_evasion_per_agility")]
    pub evasion_per_agility: f64,
    #[serde(default = "default_speed_base")]
    pub speed_base: i64,
    #[serde(default = "default_speed_per_agility")]
    pub speed_per_agility: f64,
    #[serde(default = "default_heavy_speed_penalty")]
    pub heavy_speed_penalty: i64,
    /// Speed never drops below this from the armour penalty
    #[serde(default = "default_heavy_speed_floor")]
    pub heavy_speed_floor: i64,
    /// Smallest damage a non-dodged hit can deal
    #[serde(default = "default_min_damage")]
    pub min_damage: f64,
    /// Damage dealt with an item whose requirements are unmet
    #[serde(default = "default_penalty_damage")]
    pub penalty_damage: f64,
    /// Duplicate notifications inside this many ticks are dropped
    #[serde(default = "default_guard_window_ticks")]
    pub guard_window_ticks: u64,
    #[serde(default = "default_lethal_damage")]
    pub lethal_damage: f64,
    /// Native health written just before the lethal call
    #[serde(default = "default_sentinel_health")]
    pub sentinel_health: f64,
    #[serde(default = "default_lifesteal_heal")]
    pub lifesteal_heal: f64,
    #[serde(default = "default_thorns_aura_damage")]
    pub thorns_aura_damage: f64,
    #[serde(default = "default_thorns_master_fraction")]
    pub thorns_master_fraction: f64,
    /// Virtual health restored per cycle by immortal and aquatic_life
    #[serde(default = "default_passive_heal")]
    pub passive_heal: f64,
    #[serde(default = "default_combat_tag_ticks")]
    pub combat_tag_ticks: u64,
    #[serde(default = "default_mob_atk")]
    pub mob_atk: f64,
    #[serde(default)]
    pub mob_def: f64,
}

impl Default for CombatConstants {
    fn default() -> Self {
        CombatConstants {
            base_crit_chance: default_base_crit_chance(),
            base_crit_mult: default_base_crit_mult(),
            crit_per_agility: default_crit_per_agility(),
            crit_per_intelligence: default_crit_per_intelligence(),
            crit_mult_per_strength: default_crit_mult_per_strength(),
            atk_per_strength: default_atk_per_strength(),
            def_per_fortitude: default_def_per_fortitude(),
            evasion_per_agility: default_evasion_per_agility(),
            speed_base: default_speed_base(),
            speed_per_agility: default_speed_per_agility(),
            heavy_speed_penalty: default_heavy_speed_penalty(),
            heavy_speed_floor: default_heavy_speed_floor(),
            min_damage: default_min_damage(),
            penalty_damage: default_penalty_damage(),
            guard_window_ticks: default_guard_window_ticks(),
            lethal_damage: default_lethal_damage(),
            sentinel_health: default_sentinel_health(),
            lifesteal_heal: default_lifesteal_heal(),
            thorns_aura_damage: default_thorns_aura_damage(),
            thorns_master_fraction: default_thorns_master_fraction(),
            passive_heal: default_passive_heal(),
            combat_tag_ticks: default_combat_tag_ticks(),
            mob_atk: default_mob_atk(),
            mob_def: 0.0,
        }
    }
}

fn default_base_crit_chance() -> f64 {
    0.05
}
fn default_base_crit_mult() -> f64 {
    1.5
}
fn default_crit_per_agility() -> f64 {
    0.001
}
fn default_crit_per_intelligence() -> f64 {
    0.0005
}
fn default_crit_mult_per_strength() -> f64 {
    0.005
}
fn default_atk_per_strength() -> f64 {
    0.5
}
fn default_def_per_fortitude() -> f64 {
    0.5
}
fn default_evasion_per_agility() -> f64 {
    0.001
}
fn default_speed_base() -> i64 {
    10
}
fn default_speed_per_agility() -> f64 {
    0.2
}
fn default_heavy_speed_penalty() -> i64 {
    10
}
fn default_heavy_speed_floor() -> i64 {
    5
}
fn default_min_damage() -> f64 {
    1.0
}
fn default_penalty_damage() -> f64 {
    1.0
}
fn default_guard_window_ticks() -> u64 {
    10
}
fn default_lethal_damage() -> f64 {
    9999.0
}
fn default_sentinel_health() -> f64 {
    1.0
}
fn default_lifesteal_heal() -> f64 {
    2.0
}
fn default_thorns_aura_damage() -> f64 {
    2.0
}
fn default_thorns_master_fraction() -> f64 {
    0.3
}
fn default_passive_heal() -> f64 {
    1.0
}
fn default_combat_tag_ticks() -> u64 {
    200
}
fn default_mob_atk() -> f64 {
    5.0
}

/// Mana pool sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConstants {
    #[serde(default = "default_resource_base")]
    pub base: f64,
    #[serde(default = "default_resource_per_intelligence")]
    pub per_intelligence: f64,
    /// Regeneration per second before willpower
    #[serde(default = "default_regen_base")]
    pub regen_base: f64,
    #[serde(default = "default_regen_per_willpower")]
    pub regen_per_willpower: f64,
}

impl Default for ResourceConstants {
    fn default() -> Self {
        ResourceConstants {
            base: default_resource_base(),
            per_intelligence: default_resource_per_intelligence(),
            regen_base: default_regen_base(),
            regen_per_willpower: default_regen_per_willpower(),
        }
    }
}

fn default_resource_base() -> f64 {
    20.0
}
fn default_resource_per_intelligence() -> f64 {
    2.0
}
fn default_regen_base() -> f64 {
    1.0
}
fn default_regen_per_willpower() -> f64 {
    0.1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionConstants {
    #[serde(default = "default_xp_base_cost")]
    pub xp_base_cost: u64,
    #[serde(default = "default_xp_level_multiplier")]
    pub xp_level_multiplier: u64,
    /// Stat points that must be invested to finish a level
    #[serde(default = "default_points_per_level")]
    pub points_per_level: u32,
    #[serde(default = "default_max_level")]
    pub max_level: u32,
    #[serde(default = "default_max_profiles")]
    pub max_profiles: u32,
    /// Cards shown per talent draw
    #[serde(default = "default_offer_count")]
    pub offer_count: usize,
    /// Bonus XP per kill with the exp_boost talent
    #[serde(default = "default_exp_boost_xp")]
    pub exp_boost_xp: u64,
    #[serde(default = "default_admin_xp")]
    pub admin_xp: u64,
}

impl ProgressionConstants {
    /// XP cost of one stat upgrade at the given level
    pub fn upgrade_cost(&self, level: u32) -> u64 {
        self.xp_base_cost + u64::from(level) * self.xp_level_multiplier
    }
}

impl Default for ProgressionConstants {
    fn default() -> Self {
        ProgressionConstants {
            xp_base_cost: default_xp_base_cost(),
            xp_level_multiplier: default_xp_level_multiplier(),
            points_per_level: default_points_per_level(),
            max_level: default_max_level(),
            max_profiles: default_max_profiles(),
            offer_count: default_offer_count(),
            exp_boost_xp: default_exp_boost_xp(),
            admin_xp: default_admin_xp(),
        }
    }
}

fn default_xp_base_cost() -> u64 {
    100
}
fn default_xp_level_multiplier() -> u64 {
    50
}
fn default_points_per_level() -> u32 {
    15
}
fn default_max_level() -> u32 {
    20
}
fn default_max_profiles() -> u32 {
    3
}
fn default_offer_count() -> usize {
    3
}
fn default_exp_boost_xp() -> u64 {
    50
}
fn default_admin_xp() -> u64 {
    1000
}

/// Values pushed to the host's own health and movement systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationConstants {
    #[serde(default = "default_base_health")]
    pub base_health: f64,
    #[serde(default = "default_health_per_fortitude")]
    pub health_per_fortitude: f64,
    #[serde(default = "default_min_health")]
    pub min_health: f64,
    #[serde(default = "default_max_health")]
    pub max_health: f64,
    #[serde(default = "default_vitality_1_health")]
    pub vitality_1_health: f64,
    #[serde(default = "default_vitality_2_health")]
    pub vitality_2_health: f64,
    #[serde(default = "default_glass_cannon_health")]
    pub glass_cannon_health: f64,
    #[serde(default = "default_max_movement")]
    pub max_movement: i64,
}

impl Default for PresentationConstants {
    fn default() -> Self {
        PresentationConstants {
            base_health: default_base_health(),
            health_per_fortitude: default_health_per_fortitude(),
            min_health: default_min_health(),
            max_health: default_max_health(),
            vitality_1_health: default_vitality_1_health(),
            vitality_2_health: default_vitality_2_health(),
            glass_cannon_health: default_glass_cannon_health(),
            max_movement: default_max_movement(),
        }
    }
}

fn default_base_health() -> f64 {
    18.0
}
fn default_health_per_fortitude() -> f64 {
    2.0
}
fn default_min_health() -> f64 {
    18.0
}
fn default_max_health() -> f64 {
    300.0
}
fn default_vitality_1_health() -> f64 {
    4.0
}
fn default_vitality_2_health() -> f64 {
    10.0
}
fn default_glass_cannon_health() -> f64 {
    0.5
}
fn default_max_movement() -> i64 {
    300
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeathConstants {
    /// Chance for each inventory stack to drop on death
    #[serde(default = "default_item_drop_rate")]
    pub item_drop_rate: f64,
}

impl Default for DeathConstants {
    fn default() -> Self {
        DeathConstants {
            item_drop_rate: default_item_drop_rate(),
        }
    }
}

fn default_item_drop_rate() -> f64 {
    0.5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickConstants {
    /// Ticks between periodic regen/presentation passes
    #[serde(default = "default_cycle_ticks")]
    pub cycle_ticks: u64,
    #[serde(default = "default_ticks_per_second")]
    pub ticks_per_second: u64,
}

impl TickConstants {
    pub fn seconds_to_ticks(&self, seconds: f64) -> u64 {
        (seconds * self.ticks_per_second as f64).round().max(0.0) as u64
    }

    /// Fraction of a second covered by one periodic cycle
    pub fn cycle_seconds(&self) -> f64 {
        self.cycle_ticks as f64 / self.ticks_per_second as f64
    }
}

impl Default for TickConstants {
    fn default() -> Self {
        TickConstants {
            cycle_ticks: default_cycle_ticks(),
            ticks_per_second: default_ticks_per_second(),
        }
    }
}

fn default_cycle_ticks() -> u64 {
    5
}
fn default_ticks_per_second() -> u64 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_constants() {
        let constants = GameConstants::default();
        assert!((constants.combat.base_crit_mult - 1.5).abs() < f64::EPSILON);
        assert_eq!(constants.combat.guard_window_ticks, 10);
        assert_eq!(constants.progression.max_level, 20);
        assert_eq!(constants.progression.upgrade_cost(5), 350);
        assert_eq!(constants.tick.seconds_to_ticks(8.0), 160);
    }

    #[test]
    fn test_parse_partial_constants() {
        let toml = r#"
[combat]
guard_window_ticks = 4
min_damage = 2

[progression]
max_profiles = 5
"#;

        let constants = GameConstants::parse(toml).unwrap();
        assert_eq!(constants.combat.guard_window_ticks, 4);
        assert!((constants.combat.min_damage - 2.0).abs() < f64::EPSILON);
        assert_eq!(constants.progression.max_profiles, 5);
        // Untouched sections keep their defaults
        assert_eq!(constants.progression.points_per_level, 15);
        assert_eq!(constants.resource, ResourceConstants::default());
    }

    #[test]
    fn test_zero_level_cap_rejected() {
        let err = GameConstants::parse("[progression]\nmax_level = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("constants.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[death]\nitem_drop_rate = 0.25").unwrap();

        let constants = GameConstants::load_from_path(&path).unwrap();
        assert!((constants.death.item_drop_rate - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = GameConstants::load_from_path(Path::new("/no/such/constants.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
