//! Periodic cycle - Regeneration, healing passives and the HUD

use crate::character::CharacterState;
use crate::command::Command;
use crate::context::EventContext;
use crate::entity::EntityId;
use crate::store::PersistentStore;
use stat_core::{derive, GameConstants, TalentId};

const BAR_CELLS: usize = 10;

/// Two-line HUD: level and XP to the next upgrade, then the resource bar
pub fn hud_line(state: &CharacterState, max_resource: f64, constants: &GameConstants) -> String {
    let cost = constants.progression.upgrade_cost(state.level);
    let fraction = if max_resource > 0.0 {
        (state.resource / max_resource).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = ((fraction * BAR_CELLS as f64).ceil() as usize).min(BAR_CELLS);
    format!(
        "Lv.{} [XP: {}/{}]\nEther: {}{} {}/{}",
        state.level,
        state.xp,
        cost,
        "■".repeat(filled),
        "□".repeat(BAR_CELLS - filled),
        state.resource.floor(),
        max_resource,
    )
}

pub(crate) fn run<S: PersistentStore>(ctx: &mut EventContext<'_, S>) -> Vec<Command> {
    let mut commands = Vec::new();
    for player in ctx.host.online_players() {
        if !ctx.host.is_valid(player) || !CharacterState::exists(&*ctx.store, player) {
            continue;
        }
        commands.extend(cycle_player(ctx, player));
    }
    commands
}

fn cycle_player<S: PersistentStore>(ctx: &mut EventContext<'_, S>, player: EntityId) -> Vec<Command> {
    let constants = ctx.constants;
    let mut state = ctx.load_character(player);
    let stats = derive(&ctx.sheet(player, &state), constants);

    if state.resource < stats.max_resource {
        let regen = stats.resource_regen * constants.tick.cycle_seconds();
        state.resource = (state.resource + regen).min(stats.max_resource);
        state.save(&mut *ctx.store, player);
    }

    let mut heal = 0.0;
    if state.talents.has(TalentId::Immortal) {
        heal += constants.combat.passive_heal;
    }
    if state.talents.has(TalentId::AquaticLife) && ctx.host.is_submerged(player) {
        heal += constants.combat.passive_heal;
    }
    if heal > 0.0 {
        let ceiling = ctx.health_ceiling(&state);
        if let Some(health) = ctx.virtual_health(player) {
            ctx.set_virtual_health(player, (health + heal).min(ceiling));
        }
    }

    let mut commands = vec![
        ctx.presentation(player, &state),
        Command::Hud {
            entity: player,
            text: hud_line(&state, stats.max_resource, constants),
        },
    ];
    if state.talents.has(TalentId::FullBelly) {
        commands.push(Command::Saturate { entity: player });
    }
    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hud_line() {
        let constants = GameConstants::default();
        let mut state = CharacterState::new(&constants);
        state.level = 3;
        state.xp = 120;
        state.resource = 10.7;

        assert_eq!(
            hud_line(&state, 24.0, &constants),
            "Lv.3 [XP: 120/250]\nEther: ■■■■■□□□□□ 10/24"
        );
    }

    #[test]
    fn test_hud_bar_rounds_up() {
        let constants = GameConstants::default();
        let mut state = CharacterState::new(&constants);
        state.resource = 0.5;
        assert!(hud_line(&state, 20.0, &constants).contains("■□□□□□□□□□ 0/20"));

        state.resource = 20.0;
        assert!(hud_line(&state, 20.0, &constants).contains("■■■■■■■■■■ 20/20"));
    }
}
