//! Combat handler - Native damage in, virtual health out
//!
//! Order per notification: claim the victim's guard, neutralize the native
//! damage, resolve true damage, then write virtual health or finish the
//! victim with one lethal native call. The guard is claimed before anything
//! else so that the lethal call is absorbed when it comes back as a new event
//! inside the window. Thorns reflections carry no source, so they come back
//! as plain damage of the reflected amount.

use crate::command::{Command, Cue};
use crate::context::EventContext;
use crate::entity::{EntityId, EntityKind};
use crate::error::EngineError;
use crate::store::{keys, PersistentStore};
use stat_core::{derive, resolve_hit_with_rng, Attacker, Defender, StatBlock, TalentSet};
use tracing::trace;

/// Derived state of a player taking part in one hit
struct Participant {
    stats: StatBlock,
    talents: TalentSet,
    requirement_met: bool,
}

/// Record the hit tick, or fail if the victim was hit inside the window
pub fn claim_guard<S: PersistentStore + ?Sized>(
    store: &mut S,
    victim: EntityId,
    tick: u64,
    window: u64,
) -> Result<(), EngineError> {
    if let Some(last) = store.get_number(victim, keys::LAST_HIT).map(|t| t as u64) {
        // A marker ahead of the clock was left by an earlier run
        if last <= tick && tick - last < window {
            return Err(EngineError::DuplicateEvent { victim, tick });
        }
    }
    store.set(victim, keys::LAST_HIT, tick.into());
    Ok(())
}

fn participant<S: PersistentStore>(ctx: &EventContext<'_, S>, player: EntityId) -> Participant {
    let state = ctx.load_character(player);
    let sheet = ctx.sheet(player, &state);
    let requirement_met = ctx
        .host
        .loadout(player)
        .main_hand_check(&state.attributes, ctx.equipment)
        .valid;
    Participant {
        stats: derive(&sheet, ctx.constants),
        talents: state.talents,
        requirement_met,
    }
}

/// Health before this hit, seeding it for entities seen for the first time
fn current_health<S: PersistentStore>(
    ctx: &EventContext<'_, S>,
    entity: EntityId,
    kind: &EntityKind,
    native: f64,
) -> f64 {
    if let Some(health) = ctx.virtual_health(entity) {
        return health;
    }
    match kind {
        EntityKind::Player => ctx.health_ceiling(&ctx.load_character(entity)),
        EntityKind::Mob { .. } => native,
    }
}

pub(crate) fn on_damage<S: PersistentStore>(
    ctx: &mut EventContext<'_, S>,
    victim: EntityId,
    attacker: Option<EntityId>,
    amount: f64,
) -> Result<Vec<Command>, EngineError> {
    let constants = ctx.constants;
    let combat = &constants.combat;
    if !ctx.host.is_valid(victim) {
        return Err(EngineError::StaleEntity(victim));
    }

    // 1. Guard
    claim_guard(&mut *ctx.store, victim, ctx.tick, combat.guard_window_ticks)?;

    // 2. Neutralize native damage
    let native = ctx
        .host
        .native_health(victim)
        .ok_or(EngineError::StaleEntity(victim))?;
    if native <= 0.0 {
        trace!(%victim, "victim already dead");
        return Ok(Vec::new());
    }
    let native_max = ctx.host.native_max_health(victim).unwrap_or(native + amount);
    let restored = (native + amount).min(native_max);
    let mut commands = vec![Command::SetNativeHealth {
        entity: victim,
        value: restored,
    }];

    let victim_kind = ctx
        .host
        .kind(victim)
        .ok_or(EngineError::StaleEntity(victim))?;
    let attacker = attacker.filter(|a| ctx.host.is_valid(*a));
    let attacker_is_player = attacker.is_some_and(|a| ctx.host.is_player(a));

    // 3. and 4. Resolve
    let attacking = match attacker {
        Some(a) if attacker_is_player => Some(participant(ctx, a)),
        _ => None,
    };
    let defending = victim_kind
        .is_player()
        .then(|| participant(ctx, victim));

    let outcome = resolve_hit_with_rng(
        match &attacking {
            Some(p) => Attacker::Player {
                stats: &p.stats,
                talents: &p.talents,
                requirement_met: p.requirement_met,
            },
            None => Attacker::Other,
        },
        match &defending {
            Some(p) => Defender::Player {
                stats: &p.stats,
                talents: &p.talents,
            },
            None => Defender::NonPlayer,
        },
        amount,
        constants,
        &mut *ctx.rng,
    );

    if victim_kind.is_player() {
        ctx.mark_in_combat(victim);
    }
    if let (Some(a), true) = (attacker, attacker_is_player) {
        ctx.mark_in_combat(a);
        if outcome.penalty {
            commands.push(Command::cue(a, Cue::Penalty));
        }
        if outcome.lifesteal > 0.0 {
            let state = ctx.load_character(a);
            let ceiling = ctx.health_ceiling(&state);
            let health = ctx.virtual_health(a).unwrap_or(ceiling);
            ctx.set_virtual_health(a, (health + outcome.lifesteal).min(ceiling));
        }
    }

    if outcome.dodged {
        commands.push(Command::cue(victim, Cue::Dodge));
        commands.push(Command::message(victim, "Dodged!"));
        return Ok(commands);
    }
    if outcome.is_critical {
        if let Some(a) = attacker {
            commands.push(Command::cue(a, Cue::Critical));
        }
        commands.push(Command::cue(victim, Cue::Critical));
    }
    if let Some(a) = attacker {
        for reflected in &outcome.thorns {
            commands.push(Command::ApplyNativeDamage {
                target: a,
                amount: *reflected,
                source: None,
            });
        }
    }

    // 5. Apply
    let remaining = current_health(ctx, victim, &victim_kind, restored) - outcome.final_damage;
    if remaining > 0.0 {
        ctx.set_virtual_health(victim, remaining);
    } else {
        // Reseeded on respawn
        ctx.store.delete(victim, keys::HEALTH);
        commands.push(Command::SetNativeHealth {
            entity: victim,
            value: combat.sentinel_health,
        });
        commands.push(Command::ApplyNativeDamage {
            target: victim,
            amount: combat.lethal_damage,
            source: attacker,
        });
    }
    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_guard_window() {
        let mut store = MemoryStore::new();
        let victim = EntityId(3);

        claim_guard(&mut store, victim, 100, 10).unwrap();
        assert!(matches!(
            claim_guard(&mut store, victim, 109, 10),
            Err(EngineError::DuplicateEvent { tick: 109, .. })
        ));
        claim_guard(&mut store, victim, 110, 10).unwrap();
        assert_eq!(store.get_number(victim, keys::LAST_HIT), Some(110.0));
    }

    #[test]
    fn test_zero_window_never_absorbs() {
        let mut store = MemoryStore::new();
        let victim = EntityId(3);
        claim_guard(&mut store, victim, 5, 0).unwrap();
        claim_guard(&mut store, victim, 5, 0).unwrap();
    }

    #[test]
    fn test_marker_from_a_later_tick_is_ignored() {
        let mut store = MemoryStore::new();
        let victim = EntityId(4);
        store.set(victim, keys::LAST_HIT, 5000u64.into());

        claim_guard(&mut store, victim, 3, 10).unwrap();
        assert_eq!(store.get_number(victim, keys::LAST_HIT), Some(3.0));
        assert!(claim_guard(&mut store, victim, 4, 10).is_err());
    }

    #[test]
    fn test_first_hit_always_passes() {
        let mut store = MemoryStore::new();
        claim_guard(&mut store, EntityId(1), 0, 10).unwrap();
    }
}
