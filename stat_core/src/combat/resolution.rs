//! Hit resolution - Turn one damage notification into true damage

use super::result::HitOutcome;
use crate::config::GameConstants;
use crate::stat_block::StatBlock;
use crate::talent::{TalentId, TalentSet};
use rand::Rng;

/// Who dealt the hit
#[derive(Debug, Clone, Copy)]
pub enum Attacker<'a> {
    Player {
        stats: &'a StatBlock,
        talents: &'a TalentSet,
        /// The main-hand item passes the requirement gate
        requirement_met: bool,
    },
    /// A mob, projectile or environmental source; keeps the notified amount
    Other,
}

/// Who received the hit
#[derive(Debug, Clone, Copy)]
pub enum Defender<'a> {
    Player {
        stats: &'a StatBlock,
        talents: &'a TalentSet,
    },
    NonPlayer,
}

/// Resolve a hit with the thread RNG
pub fn resolve_hit(
    attacker: Attacker<'_>,
    defender: Defender<'_>,
    notified_amount: f64,
    constants: &GameConstants,
) -> HitOutcome {
    let mut rng = rand::thread_rng();
    resolve_hit_with_rng(attacker, defender, notified_amount, constants, &mut rng)
}

/// Resolve a hit with a provided RNG (for deterministic testing)
///
/// Rolls happen in a fixed order: the attacker's crit, then the defender's
/// evasion. A roll whose chance is zero consumes nothing.
pub fn resolve_hit_with_rng(
    attacker: Attacker<'_>,
    defender: Defender<'_>,
    notified_amount: f64,
    constants: &GameConstants,
    rng: &mut impl Rng,
) -> HitOutcome {
    let combat = &constants.combat;
    let mut outcome = HitOutcome::default();

    // Step 1: Attacker side
    let mut damage = match attacker {
        Attacker::Player {
            stats,
            talents,
            requirement_met,
        } => {
            if talents.has(TalentId::Vampirism) {
                outcome.lifesteal = combat.lifesteal_heal;
            }
            if !requirement_met {
                outcome.penalty = true;
                combat.penalty_damage
            } else if stats.crit_chance > 0.0 && rng.gen::<f64>() < stats.crit_chance {
                outcome.is_critical = true;
                stats.atk * stats.crit_mult
            } else {
                stats.atk
            }
        }
        Attacker::Other => notified_amount,
    };
    outcome.raw_damage = damage;

    // Step 2: Defender side
    match defender {
        Defender::Player { stats, talents } => {
            if stats.evasion_chance > 0.0 && rng.gen::<f64>() < stats.evasion_chance {
                outcome.dodged = true;
                return outcome;
            }

            damage = (damage - stats.def).max(combat.min_damage);

            if talents.has(TalentId::ThornsAura) {
                outcome.thorns.push(combat.thorns_aura_damage);
            }
            if talents.has(TalentId::ThornsMaster) {
                let reflected = (damage * combat.thorns_master_fraction).floor();
                if reflected > 0.0 {
                    outcome.thorns.push(reflected);
                }
            }
        }
        Defender::NonPlayer => {
            damage = damage.max(combat.min_damage);
        }
    }

    // Step 3: Floor
    outcome.final_damage = damage.floor();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stat_block::{derive, MobSheet, PlayerSheet};
    use gear_core::{Attribute, Attributes};
    use proptest::prelude::*;
    use rand::rngs::mock::StepRng;

    /// Every roll returns 0.0, so any positive chance succeeds
    fn always() -> StepRng {
        StepRng::new(0, 0)
    }

    /// Every roll returns just under 1.0
    fn never() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    fn player_stats(level: u32, pairs: &[(Attribute, u32)], talents: &TalentSet) -> StatBlock {
        let mut attrs = Attributes::new();
        for (a, v) in pairs {
            attrs.set(*a, *v);
        }
        derive(
            &PlayerSheet::new(level, attrs).with_talents(talents.clone()),
            &GameConstants::default(),
        )
    }

    #[test]
    fn test_fresh_player_vs_fresh_player() {
        let constants = GameConstants::default();
        let none = TalentSet::new();
        let stats = player_stats(1, &[], &none);

        let outcome = resolve_hit_with_rng(
            Attacker::Player {
                stats: &stats,
                talents: &none,
                requirement_met: true,
            },
            Defender::Player {
                stats: &stats,
                talents: &none,
            },
            4.0,
            &constants,
            &mut never(),
        );
        assert_eq!(outcome.final_damage, 1.0);
        assert!(!outcome.is_critical);
        assert!(!outcome.dodged);
    }

    #[test]
    fn test_critical_multiplies_attack() {
        let constants = GameConstants::default();
        let none = TalentSet::new();
        let attacker = player_stats(10, &[(Attribute::Strength, 20)], &none);

        let outcome = resolve_hit_with_rng(
            Attacker::Player {
                stats: &attacker,
                talents: &none,
                requirement_met: true,
            },
            Defender::NonPlayer,
            1.0,
            &constants,
            &mut always(),
        );
        // atk 20, crit mult 1.5 + 0.1
        assert!(outcome.is_critical);
        assert_eq!(outcome.final_damage, 32.0);
    }

    #[test]
    fn test_unmet_requirement_deals_penalty() {
        let constants = GameConstants::default();
        let vampire: TalentSet = [TalentId::Vampirism].into_iter().collect();
        let attacker = player_stats(20, &[(Attribute::Strength, 100)], &vampire);

        let outcome = resolve_hit_with_rng(
            Attacker::Player {
                stats: &attacker,
                talents: &vampire,
                requirement_met: false,
            },
            Defender::NonPlayer,
            12.0,
            &constants,
            &mut always(),
        );
        assert!(outcome.penalty);
        assert!(!outcome.is_critical);
        assert_eq!(outcome.final_damage, 1.0);
        assert_eq!(outcome.lifesteal, 2.0);
    }

    #[test]
    fn test_dodge_still_lifesteals() {
        let constants = GameConstants::default();
        let vampire: TalentSet = [TalentId::Vampirism].into_iter().collect();
        let evader: TalentSet = [TalentId::Evasion, TalentId::ThornsAura].into_iter().collect();
        let attacker = player_stats(5, &[], &vampire);
        let defender = player_stats(5, &[], &evader);

        let outcome = resolve_hit_with_rng(
            Attacker::Player {
                stats: &attacker,
                talents: &vampire,
                requirement_met: true,
            },
            Defender::Player {
                stats: &defender,
                talents: &evader,
            },
            3.0,
            &constants,
            &mut always(),
        );
        assert!(outcome.dodged);
        assert_eq!(outcome.final_damage, 0.0);
        assert!(outcome.thorns.is_empty());
        assert_eq!(outcome.lifesteal, 2.0);
        assert!(!outcome.landed());
    }

    #[test]
    fn test_mob_hit_uses_notified_amount() {
        let constants = GameConstants::default();
        let none = TalentSet::new();
        let defender = player_stats(1, &[(Attribute::Defense, 4)], &none);

        let outcome = resolve_hit_with_rng(
            Attacker::Other,
            Defender::Player {
                stats: &defender,
                talents: &none,
            },
            9.0,
            &constants,
            &mut never(),
        );
        assert_eq!(outcome.raw_damage, 9.0);
        assert_eq!(outcome.final_damage, 5.0);
    }

    #[test]
    fn test_thorns_reflections_are_separate() {
        let constants = GameConstants::default();
        let thorny: TalentSet = [TalentId::ThornsAura, TalentId::ThornsMaster].into_iter().collect();
        let defender = player_stats(1, &[], &thorny);

        let outcome = resolve_hit_with_rng(
            Attacker::Other,
            Defender::Player {
                stats: &defender,
                talents: &thorny,
            },
            20.0,
            &constants,
            &mut never(),
        );
        assert_eq!(outcome.final_damage, 20.0);
        assert_eq!(outcome.thorns, vec![2.0, 6.0]);
    }

    #[test]
    fn test_mob_attack_against_mob_floor() {
        let constants = GameConstants::default();
        let mob = derive(&MobSheet, &constants);
        assert_eq!(mob.atk, 5.0);
        let outcome =
            resolve_hit_with_rng(Attacker::Other, Defender::NonPlayer, 0.4, &constants, &mut never());
        assert_eq!(outcome.final_damage, 1.0);
    }

    proptest! {
        #[test]
        fn test_damage_floor_holds(
            level in 1u32..=20,
            strength in 0u32..=100,
            defense in 0u32..=100,
            fortitude in 0u32..=100,
            seed in any::<u64>(),
            notified in 0.0f64..500.0,
        ) {
            use rand::SeedableRng;
            let constants = GameConstants::default();
            let none = TalentSet::new();
            let attacker = player_stats(level, &[(Attribute::Strength, strength)], &none);
            let defender = player_stats(
                1,
                &[(Attribute::Defense, defense), (Attribute::Fortitude, fortitude)],
                &none,
            );
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

            for attacker in [
                Attacker::Player { stats: &attacker, talents: &none, requirement_met: true },
                Attacker::Other,
            ] {
                let outcome = resolve_hit_with_rng(
                    attacker,
                    Defender::Player { stats: &defender, talents: &none },
                    notified,
                    &constants,
                    &mut rng,
                );
                if !outcome.dodged {
                    prop_assert!(outcome.final_damage >= constants.combat.min_damage);
                }
            }
        }
    }
}
