//! StatAccumulator - Collects talent modifiers before they are applied to base values

use crate::talent::{modifiers, Condition, Modifier, Stage, StatTarget, TalentSet};

/// Situational flags that gate conditional modifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveConditions {
    pub low_health: bool,
    pub sneaking: bool,
}

impl ActiveConditions {
    pub fn holds(&self, condition: Condition) -> bool {
        match condition {
            Condition::LowHealth => self.low_health,
            Condition::Sneaking => self.sneaking,
        }
    }
}

/// Accumulates talent modifications for one derivation pass
///
/// Flat additions, percentage multipliers and conditional multipliers are
/// kept apart so they always apply in that order regardless of talent order.
#[derive(Debug, Clone, Default)]
pub struct StatAccumulator {
    pub atk_flat: f64,
    pub atk_more: Vec<f64>,
    pub atk_conditional: Vec<f64>,
    pub def_flat: f64,
    pub def_more: Vec<f64>,
    pub def_conditional: Vec<f64>,
    pub crit_chance_flat: f64,
    pub evasion_flat: f64,
    pub speed_flat: i64,
}

impl StatAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gather the modifiers of every owned talent
    pub fn from_talents(talents: &TalentSet, conditions: ActiveConditions) -> Self {
        let mut acc = Self::new();
        for talent in talents.iter() {
            for modifier in modifiers(talent) {
                acc.apply_modifier(modifier, conditions);
            }
        }
        acc
    }

    fn apply_modifier(&mut self, modifier: &Modifier, conditions: ActiveConditions) {
        match *modifier {
            Modifier::Add(target, amount) => match target {
                StatTarget::Atk => self.atk_flat += amount,
                StatTarget::Def => self.def_flat += amount,
                StatTarget::CritChance => self.crit_chance_flat += amount,
                StatTarget::Evasion => self.evasion_flat += amount,
                StatTarget::Speed => self.speed_flat += amount as i64,
            },
            Modifier::Multiply(target, factor) => self.push_multiplier(Stage::Percent, target, factor),
            Modifier::MultiplyWhen(condition, target, factor) => {
                if conditions.holds(condition) {
                    self.push_multiplier(Stage::Conditional, target, factor);
                }
            }
        }
    }

    fn push_multiplier(&mut self, stage: Stage, target: StatTarget, factor: f64) {
        let bucket = match (target, stage) {
            (StatTarget::Atk, Stage::Conditional) => &mut self.atk_conditional,
            (StatTarget::Atk, _) => &mut self.atk_more,
            (StatTarget::Def, Stage::Conditional) => &mut self.def_conditional,
            (StatTarget::Def, _) => &mut self.def_more,
            // Only atk and def take multipliers
            _ => return,
        };
        bucket.push(factor);
    }

    /// Final attack before flooring
    pub fn atk(&self, base: f64) -> f64 {
        staged(base, self.atk_flat, &self.atk_more, &self.atk_conditional)
    }

    /// Final defense before flooring
    pub fn def(&self, base: f64) -> f64 {
        staged(base, self.def_flat, &self.def_more, &self.def_conditional)
    }
}

fn staged(base: f64, flat: f64, more: &[f64], conditional: &[f64]) -> f64 {
    let after_flat = base + flat;
    let after_more = more.iter().fold(after_flat, |v, m| v * m);
    conditional.iter().fold(after_more, |v, m| v * m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::talent::TalentId;

    #[test]
    fn test_flat_applies_before_multipliers() {
        let talents: TalentSet = [TalentId::BruteForce, TalentId::GlassCannon]
            .into_iter()
            .collect();
        let acc = StatAccumulator::from_talents(&talents, ActiveConditions::default());
        // (10 + 2) * 1.5, never 10 * 1.5 + 2
        assert!((acc.atk(10.0) - 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_conditional_needs_condition() {
        let talents: TalentSet = [TalentId::Assassin, TalentId::LastStand].into_iter().collect();

        let idle = StatAccumulator::from_talents(&talents, ActiveConditions::default());
        assert!((idle.atk(10.0) - 10.0).abs() < 1e-9);
        assert!((idle.def(10.0) - 10.0).abs() < 1e-9);

        let hurt_and_crouched = StatAccumulator::from_talents(
            &talents,
            ActiveConditions {
                low_health: true,
                sneaking: true,
            },
        );
        assert!((hurt_and_crouched.atk(10.0) - 20.0).abs() < 1e-9);
        assert!((hurt_and_crouched.def(10.0) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_speed_and_crit_flats() {
        let talents: TalentSet = [TalentId::Swift1, TalentId::Godspeed, TalentId::EagleEye]
            .into_iter()
            .collect();
        let acc = StatAccumulator::from_talents(&talents, ActiveConditions::default());
        assert_eq!(acc.speed_flat, 20);
        assert!((acc.crit_chance_flat - 0.1).abs() < 1e-9);
    }
}
