//! ProgressionEngine - XP, stat upgrades, level-ups and talent draws
//!
//! Every function here mutates a [`CharacterState`] in memory and either
//! succeeds completely or returns a [`Rejection`] with the state untouched.
//! Persisting the result is the caller's job.

use crate::character::CharacterState;
use crate::error::Rejection;
use gear_core::{Attribute, Attributes, MAX_ATTRIBUTE};
use rand::seq::SliceRandom;
use rand::Rng;
use stat_core::config::ProgressionConstants;
use stat_core::{derive, GameConstants, PlayerSheet, TalentId};
use tables_core::{CardEffect, ContentRegistry, TalentCard};

/// Result of a successful stat upgrade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeOutcome {
    Upgraded { attribute: Attribute, value: u32 },
    /// The fifteenth point of a level was spent
    LeveledUp { attribute: Attribute, level: u32 },
    /// The fifteenth point at the level cap was spent
    MaxLevelBonusComplete { attribute: Attribute },
}

/// Spend XP on one attribute point
pub fn upgrade_stat(
    state: &mut CharacterState,
    attribute: Attribute,
    progression: &ProgressionConstants,
) -> Result<UpgradeOutcome, Rejection> {
    if state.level >= progression.max_level && state.invested_points >= progression.points_per_level
    {
        return Err(Rejection::FullyMaxed);
    }
    if state.attributes.is_maxed(attribute) {
        return Err(Rejection::AttributeMaxed(attribute));
    }
    let cost = progression.upgrade_cost(state.level);
    if state.xp < cost {
        return Err(Rejection::InsufficientXp {
            need: cost,
            have: state.xp,
        });
    }

    state.xp -= cost;
    let value = state.attributes.add(attribute, 1);
    state.invested_points += 1;

    if state.invested_points < progression.points_per_level {
        return Ok(UpgradeOutcome::Upgraded { attribute, value });
    }
    if state.level < progression.max_level {
        state.level += 1;
        state.invested_points = 0;
        state.pending_draws += 1;
        Ok(UpgradeOutcome::LeveledUp {
            attribute,
            level: state.level,
        })
    } else {
        Ok(UpgradeOutcome::MaxLevelBonusComplete { attribute })
    }
}

pub fn add_xp(state: &mut CharacterState, amount: u64) {
    state.xp = state.xp.saturating_add(amount);
}

/// Death penalty: all unspent XP is lost. Returns the amount lost.
pub fn lose_xp(state: &mut CharacterState) -> u64 {
    std::mem::take(&mut state.xp)
}

/// The current offer, drawing a new one if none is outstanding
///
/// Cards are sampled without replacement from the eligible pool. When
/// nothing qualifies the offer is the filler card alone.
pub fn draw_offer_with_rng<R: Rng>(
    state: &mut CharacterState,
    content: &ContentRegistry,
    offer_count: usize,
    rng: &mut R,
) -> Result<Vec<TalentId>, Rejection> {
    if state.pending_draws == 0 {
        return Err(Rejection::NoPendingDraw);
    }
    if let Some(offer) = &state.offer {
        return Ok(offer.clone());
    }

    let filler = content.filler().map(|card| card.id);
    let eligible: Vec<&TalentCard> = content
        .cards()
        .iter()
        .filter(|card| Some(card.id) != filler)
        .filter(|card| card.eligible(state.level, &state.attributes, &state.talents))
        .collect();

    let offer: Vec<TalentId> = if eligible.is_empty() {
        filler.into_iter().collect()
    } else {
        eligible
            .choose_multiple(rng, offer_count)
            .map(|card| card.id)
            .collect()
    };
    state.offer = Some(offer.clone());
    Ok(offer)
}

/// Take one card from the outstanding offer
pub fn select_talent<'c>(
    state: &mut CharacterState,
    content: &'c ContentRegistry,
    talent: TalentId,
) -> Result<&'c TalentCard, Rejection> {
    if state.pending_draws == 0 {
        return Err(Rejection::NoPendingDraw);
    }
    let offered = state
        .offer
        .as_ref()
        .is_some_and(|offer| offer.contains(&talent));
    let card = content
        .card(talent)
        .filter(|_| offered)
        .ok_or(Rejection::CardNotOffered(talent))?;

    state.pending_draws -= 1;
    state.offer = None;
    // The filler card carries no tag
    if talent.tag().is_some() {
        state.talents.grant(talent);
    }
    match &card.effect {
        CardEffect::Xp { amount } => add_xp(state, *amount),
        CardEffect::StatBonus { target, amount } => {
            for attribute in target.attributes() {
                state.attributes.add(attribute, *amount);
            }
        }
        CardEffect::Passive => {}
    }
    Ok(card)
}

/// Admin override: every attribute capped, level cap, full resource
pub fn max_out(state: &mut CharacterState, constants: &GameConstants) {
    let mut attributes = Attributes::new();
    attributes.fill(MAX_ATTRIBUTE);
    state.attributes = attributes;
    state.level = constants.progression.max_level;
    state.invested_points = 0;
    let sheet = PlayerSheet::new(state.level, state.attributes.clone());
    state.resource = derive(&sheet, constants).max_resource;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::path::Path;

    fn state_with_xp(level: u32, invested: u32, xp: u64) -> CharacterState {
        let mut state = CharacterState::new(&GameConstants::default());
        state.level = level;
        state.invested_points = invested;
        state.xp = xp;
        state
    }

    #[test]
    fn test_upgrade_debits_cost() {
        let progression = ProgressionConstants::default();
        let mut state = state_with_xp(3, 0, 1000);

        let outcome = upgrade_stat(&mut state, Attribute::Strength, &progression).unwrap();
        assert_eq!(
            outcome,
            UpgradeOutcome::Upgraded {
                attribute: Attribute::Strength,
                value: 1
            }
        );
        // 100 + 3 * 50
        assert_eq!(state.xp, 750);
        assert_eq!(state.invested_points, 1);
    }

    #[test]
    fn test_level_up_is_atomic() {
        let progression = ProgressionConstants::default();
        let mut state = state_with_xp(5, 14, 10_000);

        let outcome = upgrade_stat(&mut state, Attribute::Agility, &progression).unwrap();
        assert_eq!(
            outcome,
            UpgradeOutcome::LeveledUp {
                attribute: Attribute::Agility,
                level: 6
            }
        );
        assert_eq!(state.level, 6);
        assert_eq!(state.invested_points, 0);
        assert_eq!(state.pending_draws, 1);
    }

    #[test]
    fn test_rejections_leave_state_unchanged() {
        let progression = ProgressionConstants::default();

        let mut poor = state_with_xp(1, 0, 149);
        let before = poor.clone();
        assert_eq!(
            upgrade_stat(&mut poor, Attribute::Strength, &progression),
            Err(Rejection::InsufficientXp {
                need: 150,
                have: 149
            })
        );
        assert_eq!(poor, before);

        let mut maxed = state_with_xp(4, 2, 10_000);
        maxed.attributes.set(Attribute::Willpower, 100);
        let before = maxed.clone();
        assert_eq!(
            upgrade_stat(&mut maxed, Attribute::Willpower, &progression),
            Err(Rejection::AttributeMaxed(Attribute::Willpower))
        );
        assert_eq!(maxed, before);
    }

    #[test]
    fn test_level_cap_bonus_then_limit() {
        let progression = ProgressionConstants::default();
        let mut state = state_with_xp(20, 14, 100_000);

        let outcome = upgrade_stat(&mut state, Attribute::Charisma, &progression).unwrap();
        assert_eq!(
            outcome,
            UpgradeOutcome::MaxLevelBonusComplete {
                attribute: Attribute::Charisma
            }
        );
        assert_eq!(state.level, 20);
        assert_eq!(state.invested_points, 15);
        assert_eq!(state.pending_draws, 0);

        let before = state.clone();
        assert_eq!(
            upgrade_stat(&mut state, Attribute::Charisma, &progression),
            Err(Rejection::FullyMaxed)
        );
        assert_eq!(state, before);
    }

    fn content() -> ContentRegistry {
        let mut content = ContentRegistry::new();
        content
            .load_str(
                r#"
[[talents]]
id = "basic_training"
name = "Basic Training"
condition = { min_level = 999 }
effect = { type = "xp", amount = 300 }

[[talents]]
id = "swift_1"
name = "Swift I"
effect = { type = "passive" }

[[talents]]
id = "godspeed"
name = "Godspeed"
condition = { requires = ["swift_1"] }
effect = { type = "passive" }

[[talents]]
id = "titan_strength"
name = "Titan Strength"
effect = { type = "stat_bonus", target = "strength", amount = 5 }

[[talents]]
id = "awakening"
name = "Awakening"
condition = { min_level = 10 }
effect = { type = "stat_bonus", target = "all", amount = 2 }
"#,
                Path::new("cards.toml"),
            )
            .unwrap();
        content
    }

    #[test]
    fn test_draw_samples_eligible_without_replacement() {
        let content = content();
        let mut state = state_with_xp(2, 0, 0);
        state.pending_draws = 1;
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let mut offer = draw_offer_with_rng(&mut state, &content, 3, &mut rng).unwrap();
        offer.sort();
        // godspeed needs swift_1, awakening needs level 10
        assert_eq!(offer, vec![TalentId::Swift1, TalentId::TitanStrength]);

        // The outstanding offer is stable
        let again = draw_offer_with_rng(&mut state, &content, 3, &mut rng).unwrap();
        assert_eq!(state.offer.as_ref(), Some(&again));
    }

    #[test]
    fn test_draw_falls_back_to_filler() {
        let content = content();
        let mut state = state_with_xp(2, 0, 0);
        state.pending_draws = 1;
        state.talents = [TalentId::Swift1, TalentId::Godspeed, TalentId::TitanStrength]
            .into_iter()
            .collect();

        let offer = draw_offer_with_rng(&mut state, &content, 3, &mut StepRng::new(0, 1)).unwrap();
        assert_eq!(offer, vec![TalentId::BasicTraining]);

        let card = select_talent(&mut state, &content, TalentId::BasicTraining).unwrap();
        assert_eq!(card.name, "Basic Training");
        assert_eq!(state.xp, 300);
        assert_eq!(state.pending_draws, 0);
        assert!(!state.talents.has(TalentId::BasicTraining));
    }

    #[test]
    fn test_draw_needs_pending() {
        let content = content();
        let mut state = state_with_xp(2, 0, 0);
        assert_eq!(
            draw_offer_with_rng(&mut state, &content, 3, &mut StepRng::new(0, 1)),
            Err(Rejection::NoPendingDraw)
        );
    }

    #[test]
    fn test_select_applies_stat_bonus() {
        let content = content();
        let mut state = state_with_xp(12, 0, 0);
        state.pending_draws = 2;
        state.attributes.set(Attribute::Strength, 98);
        state.offer = Some(vec![TalentId::TitanStrength, TalentId::Awakening]);

        select_talent(&mut state, &content, TalentId::TitanStrength).unwrap();
        assert_eq!(state.attributes.get(Attribute::Strength), 100);
        assert!(state.talents.has(TalentId::TitanStrength));
        assert_eq!(state.pending_draws, 1);
        assert!(state.offer.is_none());

        state.offer = Some(vec![TalentId::Awakening]);
        select_talent(&mut state, &content, TalentId::Awakening).unwrap();
        assert_eq!(state.attributes.get(Attribute::Thunder), 2);
    }

    #[test]
    fn test_select_unoffered_card_rejected() {
        let content = content();
        let mut state = state_with_xp(2, 0, 0);
        state.pending_draws = 1;
        state.offer = Some(vec![TalentId::Swift1]);
        let before = state.clone();

        assert_eq!(
            select_talent(&mut state, &content, TalentId::TitanStrength).unwrap_err(),
            Rejection::CardNotOffered(TalentId::TitanStrength)
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_max_out() {
        let constants = GameConstants::default();
        let mut state = state_with_xp(2, 7, 0);
        max_out(&mut state, &constants);
        assert_eq!(state.level, 20);
        assert!(Attribute::all().iter().all(|a| state.attributes.is_maxed(*a)));
        assert_eq!(state.resource, 220.0);
    }

    #[test]
    fn test_lose_xp() {
        let mut state = state_with_xp(2, 0, 480);
        assert_eq!(lose_xp(&mut state), 480);
        assert_eq!(state.xp, 0);
    }
}
