//! Skills - Casting the skill bound to a used item

use crate::character::CharacterState;
use crate::command::{Command, Cue};
use crate::context::{reject, EventContext};
use crate::entity::EntityId;
use crate::error::Rejection;
use crate::scheduler::Task;
use crate::store::PersistentStore;
use gear_core::{check_definition, EquipmentRegistry, ItemStack};
use tables_core::{ContentRegistry, SkillDefinition};
use tracing::{debug, warn};

/// Validate a cast and debit its cost
///
/// `Ok(None)` means the item has no skill to cast.
pub fn try_cast<'c, S: PersistentStore + ?Sized>(
    store: &S,
    player: EntityId,
    state: &mut CharacterState,
    item: &ItemStack,
    equipment: &EquipmentRegistry,
    content: &'c ContentRegistry,
) -> Result<Option<&'c SkillDefinition>, Rejection> {
    let Some(definition) = equipment.resolve(item) else {
        return Ok(None);
    };
    let Some(skill_id) = definition.skill_id.as_deref() else {
        return Ok(None);
    };

    let check = check_definition(&state.attributes, definition);
    if let Some(missing) = check.missing {
        return Err(Rejection::RequirementUnmet(missing));
    }

    let Some(skill) = content.skill(skill_id) else {
        warn!(item = %definition.id, skill = %skill_id, "item uses unknown skill");
        return Ok(None);
    };
    if store.has_tag(player, &skill.cooldown_tag()) {
        return Err(Rejection::SkillOnCooldown(skill.id.clone()));
    }
    if state.resource < skill.mana_cost {
        return Err(Rejection::NotEnoughResource {
            current: state.resource.floor(),
            cost: skill.mana_cost,
        });
    }

    state.resource -= skill.mana_cost;
    Ok(Some(skill))
}

pub(crate) fn on_item_used<S: PersistentStore>(
    ctx: &mut EventContext<'_, S>,
    player: EntityId,
    item: &ItemStack,
) -> Vec<Command> {
    let mut state = ctx.load_character(player);
    let cast = try_cast(
        &*ctx.store,
        player,
        &mut state,
        item,
        ctx.equipment,
        ctx.content,
    );
    let skill = match cast {
        Ok(Some(skill)) => skill,
        Ok(None) => return Vec::new(),
        Err(rejection) => return reject(player, &rejection),
    };

    state.save(&mut *ctx.store, player);
    ctx.store.add_tag(player, &skill.cooldown_tag());
    let delay = ctx.constants.tick.seconds_to_ticks(skill.cooldown_secs);
    ctx.scheduler.run_after(
        ctx.tick,
        delay,
        Task::ClearCooldown {
            player,
            skill_id: skill.id.clone(),
        },
    );
    debug!(%player, skill = %skill.id, delay, "skill cast");

    vec![Command::CastSkill {
        caster: player,
        skill_id: skill.id.clone(),
    }]
}

/// Lift a cooldown; nothing happens for a player who is gone
pub(crate) fn clear_cooldown<S: PersistentStore>(
    ctx: &mut EventContext<'_, S>,
    player: EntityId,
    skill_id: &str,
) -> Vec<Command> {
    if !ctx.host.is_valid(player) {
        return Vec::new();
    }
    let Some(skill) = ctx.content.skill(skill_id) else {
        return Vec::new();
    };
    ctx.store.remove_tag(player, &skill.cooldown_tag());
    vec![
        Command::message(player, format!("Skill Ready: {}", skill.name)),
        Command::cue(player, Cue::SkillReady),
    ]
}
