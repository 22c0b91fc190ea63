//! Admin channel - `addxp`, `quest`, `give`, `summon` and `max`

use crate::command::Command;
use crate::context::{reject, EventContext, PendingBoss};
use crate::entity::EntityId;
use crate::error::{EngineError, Rejection};
use crate::progression;
use crate::store::PersistentStore;
use gear_core::ItemStack;
use tracing::{debug, info};

/// Namespace the host may put in front of signal ids
const SIGNAL_NAMESPACE: &str = "rpg:";

pub(crate) fn on_signal<S: PersistentStore>(
    ctx: &mut EventContext<'_, S>,
    id: &str,
    source: Option<EntityId>,
    message: &str,
) -> Result<Vec<Command>, EngineError> {
    let Some(player) = source.filter(|s| ctx.host.is_player(*s)) else {
        debug!(signal = %id, "signal without a player source");
        return Ok(Vec::new());
    };
    let argument = message.trim();
    let result = match id.strip_prefix(SIGNAL_NAMESPACE).unwrap_or(id) {
        "addxp" => Ok(add_xp(ctx, player, argument)),
        "quest" => accept_quest(ctx, player, argument),
        "give" => give(ctx, player, argument),
        "summon" => summon(ctx, player, argument),
        "max" => Ok(max(ctx, player)),
        other => {
            debug!(signal = %other, "unknown signal");
            Ok(Vec::new())
        }
    };
    Ok(result.unwrap_or_else(|rejection| reject(player, &rejection)))
}

fn add_xp<S: PersistentStore>(ctx: &mut EventContext<'_, S>, player: EntityId, argument: &str) -> Vec<Command> {
    let amount = argument
        .parse::<u64>()
        .unwrap_or(ctx.constants.progression.admin_xp);
    let mut state = ctx.load_character(player);
    progression::add_xp(&mut state, amount);
    ctx.commit(player, &state);
    vec![Command::message(player, format!("+{} XP", amount))]
}

pub(crate) fn accept_quest<S: PersistentStore>(
    ctx: &mut EventContext<'_, S>,
    player: EntityId,
    quest_id: &str,
) -> Result<Vec<Command>, Rejection> {
    let content = ctx.content;
    let mut state = ctx.load_character(player);
    let quest = state.quests.accept(quest_id, content)?;
    ctx.commit(player, &state);
    Ok(vec![Command::message(
        player,
        format!("Quest Accepted: {}", quest.name),
    )])
}

fn give<S: PersistentStore>(
    ctx: &mut EventContext<'_, S>,
    player: EntityId,
    item_id: &str,
) -> Result<Vec<Command>, Rejection> {
    let definition = ctx
        .equipment
        .get(item_id)
        .ok_or_else(|| Rejection::UnknownItem(item_id.to_string()))?;
    Ok(vec![
        Command::GiveItem {
            entity: player,
            item: ItemStack::custom(definition.base_item.clone(), definition.id.clone()),
            count: 1,
        },
        Command::message(player, format!("Received: {}", definition.name)),
    ])
}

fn summon<S: PersistentStore>(
    ctx: &mut EventContext<'_, S>,
    player: EntityId,
    boss_id: &str,
) -> Result<Vec<Command>, Rejection> {
    let boss = ctx
        .content
        .boss(boss_id)
        .ok_or_else(|| Rejection::UnknownBoss(boss_id.to_string()))?;
    ctx.pending_bosses.push(PendingBoss {
        boss_id: boss.id.clone(),
        entity_type: boss.entity_type.clone(),
    });
    info!(%player, boss = %boss.id, "boss summoned");
    Ok(vec![Command::SpawnBoss {
        near: player,
        boss_id: boss.id.clone(),
        entity_type: boss.entity_type.clone(),
        name: boss.name.clone(),
        speed: boss.speed,
        equipment: boss.equipment.clone(),
    }])
}

fn max<S: PersistentStore>(ctx: &mut EventContext<'_, S>, player: EntityId) -> Vec<Command> {
    let mut state = ctx.load_character(player);
    progression::max_out(&mut state, ctx.constants);
    ctx.commit(player, &state);
    vec![
        ctx.presentation(player, &state),
        Command::message(player, "ALL STATS MAXED!"),
    ]
}
