//! World lifecycle handlers - deaths, spawns and players leaving

use crate::character::CharacterState;
use crate::command::{Command, Cue};
use crate::context::EventContext;
use crate::entity::{EntityId, EntityKind};
use crate::error::EngineError;
use crate::profile;
use crate::progression;
use crate::store::{keys, PersistentStore};
use gear_core::ItemStack;
use stat_core::TalentId;
use tables_core::{DropKind, COOLDOWN_TAG_PREFIX};
use tracing::{debug, info, warn};

pub(crate) fn on_died<S: PersistentStore>(
    ctx: &mut EventContext<'_, S>,
    victim: EntityId,
    attacker: Option<EntityId>,
) -> Result<Vec<Command>, EngineError> {
    let victim_kind = ctx
        .host
        .kind(victim)
        .ok_or(EngineError::StaleEntity(victim))?;
    let mut commands = Vec::new();

    if let Some(killer) = attacker.filter(|a| ctx.host.is_player(*a)) {
        commands.extend(credit_kill(ctx, killer, victim, &victim_kind));
    }

    // Reseeded on respawn
    ctx.store.delete(victim, keys::HEALTH);
    if victim_kind.is_player() {
        commands.extend(player_died(ctx, victim));
    }
    Ok(commands)
}

/// Quest progress, boss drops and the exp_boost bonus for a player's kill
fn credit_kill<S: PersistentStore>(
    ctx: &mut EventContext<'_, S>,
    killer: EntityId,
    victim: EntityId,
    victim_kind: &EntityKind,
) -> Vec<Command> {
    let content = ctx.content;
    let mut commands = Vec::new();
    let mut state = ctx.load_character(killer);

    for quest in state.quests.record_kill(victim_kind.type_id(), content) {
        commands.push(Command::cue(killer, Cue::QuestCompleted));
        commands.push(Command::message(
            killer,
            format!("Quest Completed: {}", quest.name),
        ));
    }

    let boss = ctx
        .store
        .has_tag(victim, keys::BOSS_TAG)
        .then(|| ctx.store.get_text(victim, keys::BOSS_ID))
        .flatten()
        .and_then(|id| content.boss(&id));
    if let Some(boss) = boss {
        info!(%killer, boss = %boss.id, "boss defeated");
        for drop in boss.roll_drops(&mut *ctx.rng) {
            match &drop.kind {
                DropKind::Xp(amount) => {
                    progression::add_xp(&mut state, *amount);
                    commands.push(Command::cue(killer, Cue::BossDefeated));
                    commands.push(Command::message(
                        killer,
                        format!("Boss Defeated! +{} XP", amount),
                    ));
                }
                DropKind::Item(id) => match ctx.equipment.get(id) {
                    Some(def) => {
                        commands.push(Command::DropItemAt {
                            entity: victim,
                            item: ItemStack::custom(def.base_item.clone(), def.id.clone()),
                        });
                        commands.push(Command::message(
                            killer,
                            format!("RARE DROP! You found: {}", def.name),
                        ));
                    }
                    None => warn!(boss = %boss.id, item = %id, "boss drops unknown item"),
                },
            }
        }
    }

    if state.talents.has(TalentId::ExpBoost) {
        progression::add_xp(&mut state, ctx.constants.progression.exp_boost_xp);
    }
    ctx.commit(killer, &state);
    commands
}

fn player_died<S: PersistentStore>(ctx: &mut EventContext<'_, S>, player: EntityId) -> Vec<Command> {
    let mut commands = Vec::new();
    let mut state = ctx.load_character(player);
    let lost = progression::lose_xp(&mut state);
    if lost > 0 {
        commands.push(Command::message(
            player,
            format!("You died and lost {} XP...", lost),
        ));
    }
    state.combat_until = None;
    ctx.commit(player, &state);
    commands.push(Command::ScatterInventory {
        entity: player,
        rate: ctx.constants.death.item_drop_rate,
    });
    commands
}

pub(crate) fn on_spawned<S: PersistentStore>(
    ctx: &mut EventContext<'_, S>,
    entity: EntityId,
) -> Result<Vec<Command>, EngineError> {
    match ctx
        .host
        .kind(entity)
        .ok_or(EngineError::StaleEntity(entity))?
    {
        EntityKind::Player => Ok(player_spawned(ctx, entity)),
        EntityKind::Mob { entity_type } => {
            mob_spawned(ctx, entity, &entity_type);
            Ok(Vec::new())
        }
    }
}

fn player_spawned<S: PersistentStore>(ctx: &mut EventContext<'_, S>, player: EntityId) -> Vec<Command> {
    let mut commands = Vec::new();

    if !CharacterState::exists(&*ctx.store, player) {
        let mut state = CharacterState::new(ctx.constants);
        state.active_profile = Some(1);
        ctx.commit(player, &state);
        info!(%player, "initialized new character");
        commands.push(Command::message(player, "Welcome! Your journey begins."));
    }

    if ctx.store.remove_tag(player, keys::COMBAT_LOGGED_TAG) {
        info!(%player, "executing combat logger");
        commands.push(Command::message(
            player,
            "You logged out during combat and were executed.",
        ));
        commands.push(Command::ApplyNativeDamage {
            target: player,
            amount: ctx.constants.combat.lethal_damage,
            source: None,
        });
        return commands;
    }

    let state = ctx.load_character(player);
    let ceiling = ctx.health_ceiling(&state);
    ctx.set_virtual_health(player, ceiling);
    commands.push(ctx.presentation(player, &state));
    commands
}

/// Tag a freshly spawned mob if it answers a pending boss summon
fn mob_spawned<S: PersistentStore>(ctx: &mut EventContext<'_, S>, entity: EntityId, entity_type: &str) {
    let Some(index) = ctx
        .pending_bosses
        .iter()
        .position(|p| p.entity_type == entity_type)
    else {
        return;
    };
    let pending = ctx.pending_bosses.remove(index);
    ctx.store.add_tag(entity, keys::BOSS_TAG);
    ctx.store.set(entity, keys::BOSS_ID, pending.boss_id.as_str().into());
    debug!(%entity, boss = %pending.boss_id, "boss spawned");
}

pub(crate) fn on_left<S: PersistentStore>(
    ctx: &mut EventContext<'_, S>,
    player: EntityId,
) -> Result<Vec<Command>, EngineError> {
    let mut commands = Vec::new();
    let mut state = ctx.load_character(player);

    if state.in_combat(ctx.tick) {
        info!(%player, "player left during combat");
        ctx.store.add_tag(player, keys::COMBAT_LOGGED_TAG);
        commands.push(Command::ScatterInventory {
            entity: player,
            rate: 1.0,
        });
    }
    state.combat_until = None;
    state.save(&mut *ctx.store, player);
    profile::save(&mut *ctx.store, player, &state)?;

    // Cooldown removals are cancelled with the tasks, so drop their tags too
    let cancelled = ctx.scheduler.cancel_for(player);
    for tag in ctx.store.tags_with_prefix(player, COOLDOWN_TAG_PREFIX) {
        ctx.store.remove_tag(player, &tag);
    }
    debug!(%player, cancelled, "player left");
    Ok(commands)
}
