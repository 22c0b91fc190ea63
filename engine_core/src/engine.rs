//! Engine - Owns the simulation state and routes events to handlers
//!
//! Each world event, tick or player action runs to completion and returns the
//! commands the host must execute. Handler failures never escape: they are
//! logged and turned into an empty command list.

use crate::admin;
use crate::character::CharacterState;
use crate::combat;
use crate::command::{Command, Cue};
use crate::context::{reject, EventContext, PendingBoss};
use crate::cycle;
use crate::entity::EntityId;
use crate::error::{EngineError, Rejection};
use crate::event::WorldEvent;
use crate::host::HostView;
use crate::lifecycle;
use crate::profile::{self, SlotSummary};
use crate::progression::{self, UpgradeOutcome};
use crate::scheduler::{Scheduler, Task};
use crate::skills;
use crate::store::PersistentStore;
use gear_core::{Attribute, EquipmentRegistry, ItemStack};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use stat_core::{GameConstants, TalentId};
use tables_core::{ContentRegistry, TalentCard};
use tracing::{debug, info, trace, warn};

pub struct Engine<S: PersistentStore> {
    store: S,
    constants: GameConstants,
    equipment: EquipmentRegistry,
    content: ContentRegistry,
    scheduler: Scheduler,
    rng: ChaCha8Rng,
    pending_bosses: Vec<PendingBoss>,
    tick: u64,
}

impl<S: PersistentStore> Engine<S> {
    pub fn new(
        store: S,
        constants: GameConstants,
        equipment: EquipmentRegistry,
        content: ContentRegistry,
    ) -> Self {
        for problem in content.dangling_references(&equipment) {
            warn!("{}", problem);
        }
        let mut scheduler = Scheduler::new();
        scheduler.run_periodic(0, constants.tick.cycle_ticks, Task::Cycle);
        Engine {
            store,
            constants,
            equipment,
            content,
            scheduler,
            rng: ChaCha8Rng::from_entropy(),
            pending_bosses: Vec::new(),
            tick: 0,
        }
    }

    /// Use a fixed RNG seed (for deterministic testing)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn constants(&self) -> &GameConstants {
        &self.constants
    }

    pub fn content(&self) -> &ContentRegistry {
        &self.content
    }

    pub fn equipment(&self) -> &EquipmentRegistry {
        &self.equipment
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Current state of a player as stored
    pub fn character(&self, player: EntityId) -> CharacterState {
        CharacterState::load(&self.store, player, &self.constants)
    }

    fn context<'a>(&'a mut self, host: &'a dyn HostView) -> EventContext<'a, S> {
        EventContext {
            host,
            store: &mut self.store,
            constants: &self.constants,
            equipment: &self.equipment,
            content: &self.content,
            scheduler: &mut self.scheduler,
            rng: &mut self.rng,
            pending_bosses: &mut self.pending_bosses,
            tick: self.tick,
        }
    }

    /// Process one world event
    pub fn handle(&mut self, host: &dyn HostView, event: WorldEvent) -> Vec<Command> {
        let name = event.name();
        let mut ctx = self.context(host);
        let result = match &event {
            WorldEvent::DamageDealt {
                victim,
                attacker,
                amount,
            } => combat::on_damage(&mut ctx, *victim, *attacker, *amount),
            WorldEvent::EntityDied { victim, attacker } => {
                lifecycle::on_died(&mut ctx, *victim, *attacker)
            }
            WorldEvent::EntitySpawned { entity } => lifecycle::on_spawned(&mut ctx, *entity),
            WorldEvent::PlayerLeft { player } => lifecycle::on_left(&mut ctx, *player),
            WorldEvent::ItemUsed { actor, item } => Ok(skills::on_item_used(&mut ctx, *actor, item)),
            WorldEvent::Signal {
                id,
                source,
                message,
            } => admin::on_signal(&mut ctx, id, *source, message),
        };
        absorb(name, result)
    }

    /// Advance one tick and run every task that came due
    pub fn advance(&mut self, host: &dyn HostView) -> Vec<Command> {
        self.tick += 1;
        let tasks = self.scheduler.due(self.tick);
        let mut ctx = self.context(host);
        let mut commands = Vec::new();
        for task in tasks {
            match task {
                Task::Cycle => commands.extend(cycle::run(&mut ctx)),
                Task::ClearCooldown { player, skill_id } => {
                    commands.extend(skills::clear_cooldown(&mut ctx, player, &skill_id))
                }
            }
        }
        commands
    }

    /// Run `ticks` ticks, collecting their commands
    pub fn advance_by(&mut self, host: &dyn HostView, ticks: u64) -> Vec<Command> {
        (0..ticks).flat_map(|_| self.advance(host)).collect()
    }

    pub fn upgrade_stat(
        &mut self,
        host: &dyn HostView,
        player: EntityId,
        attribute: Attribute,
    ) -> Vec<Command> {
        let mut ctx = self.context(host);
        let mut state = ctx.load_character(player);
        let outcome =
            match progression::upgrade_stat(&mut state, attribute, &ctx.constants.progression) {
                Ok(outcome) => outcome,
                Err(rejection) => return reject(player, &rejection),
            };
        ctx.commit(player, &state);

        let mut commands = match outcome {
            UpgradeOutcome::Upgraded { attribute, value } => vec![Command::message(
                player,
                format!("{} upgraded to {}", attribute, value),
            )],
            UpgradeOutcome::LeveledUp { level, .. } => {
                info!(%player, level, "level up");
                vec![
                    Command::cue(player, Cue::LevelUp),
                    Command::message(player, format!("LEVEL UP! You are now level {}", level)),
                    Command::message(player, "A talent draw is waiting for you"),
                ]
            }
            UpgradeOutcome::MaxLevelBonusComplete { .. } => {
                vec![Command::message(player, "MAX LEVEL BONUS COMPLETE")]
            }
        };
        commands.push(ctx.presentation(player, &state));
        commands
    }

    /// The outstanding talent offer, drawing one if needed
    pub fn draw_talents(&mut self, player: EntityId) -> Result<Vec<TalentCard>, Rejection> {
        let mut state = self.character(player);
        let offer = progression::draw_offer_with_rng(
            &mut state,
            &self.content,
            self.constants.progression.offer_count,
            &mut self.rng,
        )?;
        state.save(&mut self.store, player);
        Ok(offer
            .into_iter()
            .filter_map(|id| self.content.card(id).cloned())
            .collect())
    }

    pub fn select_talent(
        &mut self,
        host: &dyn HostView,
        player: EntityId,
        talent: TalentId,
    ) -> Vec<Command> {
        let mut ctx = self.context(host);
        let content = ctx.content;
        let mut state = ctx.load_character(player);
        let card = match progression::select_talent(&mut state, content, talent) {
            Ok(card) => card,
            Err(rejection) => return reject(player, &rejection),
        };
        ctx.commit(player, &state);
        ctx.clamp_health(player, &state);
        debug!(%player, talent = %card.id, "talent selected");
        vec![
            Command::cue(player, Cue::TalentGained),
            Command::message(player, format!("Talent Acquired: {}", card.name)),
            ctx.presentation(player, &state),
        ]
    }

    pub fn accept_quest(&mut self, host: &dyn HostView, player: EntityId, quest_id: &str) -> Vec<Command> {
        let mut ctx = self.context(host);
        admin::accept_quest(&mut ctx, player, quest_id)
            .unwrap_or_else(|rejection| reject(player, &rejection))
    }

    /// Claim a completed quest; anything else is a no-op
    pub fn claim_quest(&mut self, host: &dyn HostView, player: EntityId, quest_id: &str) -> Vec<Command> {
        let mut ctx = self.context(host);
        let content = ctx.content;
        let mut state = ctx.load_character(player);
        let Some((quest, reward)) = state.quests.claim(quest_id, content) else {
            return Vec::new();
        };

        let mut commands = Vec::new();
        if let Some(xp) = reward.xp {
            progression::add_xp(&mut state, xp);
            commands.push(Command::message(player, format!("+{} XP", xp)));
        }
        if let Some(item) = &reward.item {
            commands.push(Command::GiveItem {
                entity: player,
                item: ItemStack::plain(item.clone()),
                count: reward.count,
            });
        }
        commands.push(Command::message(player, format!("Reward claimed: {}", quest.name)));
        ctx.commit(player, &state);
        commands
    }

    pub fn save_profile(&mut self, player: EntityId) -> Vec<Command> {
        let state = self.character(player);
        match profile::save(&mut self.store, player, &state) {
            Ok(()) => vec![Command::message(
                player,
                format!("Profile saved (Slot {})", state.active_profile.unwrap_or(1)),
            )],
            Err(e) => {
                warn!(%player, error = %e, "profile save failed");
                Vec::new()
            }
        }
    }

    pub fn switch_profile(&mut self, host: &dyn HostView, player: EntityId, slot: u32) -> Vec<Command> {
        let mut ctx = self.context(host);
        let mut state = ctx.load_character(player);
        match profile::switch(&mut *ctx.store, player, &mut state, slot, ctx.constants) {
            Ok(()) => {}
            Err(EngineError::Rejected(rejection)) => return reject(player, &rejection),
            Err(e) => {
                warn!(%player, error = %e, "profile switch failed");
                return Vec::new();
            }
        }
        ctx.commit(player, &state);
        ctx.clamp_health(player, &state);
        vec![
            Command::message(player, format!("Loaded profile slot {}", slot)),
            ctx.presentation(player, &state),
        ]
    }

    pub fn reset_profile(&mut self, host: &dyn HostView, player: EntityId, slot: u32) -> Vec<Command> {
        let mut ctx = self.context(host);
        let mut state = ctx.load_character(player);
        if let Err(rejection) = profile::reset(&mut *ctx.store, player, &mut state, slot, ctx.constants)
        {
            return reject(player, &rejection);
        }
        if state.active_profile.unwrap_or(1) == slot {
            ctx.commit(player, &state);
            ctx.clamp_health(player, &state);
        }
        vec![
            Command::message(player, format!("Profile slot {} has been reset", slot)),
            ctx.presentation(player, &state),
        ]
    }

    /// Menu summaries of every profile slot
    pub fn slot_summaries(&self, player: EntityId) -> Vec<SlotSummary> {
        let state = self.character(player);
        (1..=self.constants.progression.max_profiles)
            .filter_map(|slot| {
                profile::slot_summary(&self.store, player, &state, slot, &self.constants).ok()
            })
            .collect()
    }
}

/// Log and drop a handler failure
fn absorb(event: &str, result: Result<Vec<Command>, EngineError>) -> Vec<Command> {
    match result {
        Ok(commands) => commands,
        Err(EngineError::DuplicateEvent { victim, tick }) => {
            trace!(event, %victim, tick, "absorbed inside guard window");
            Vec::new()
        }
        Err(EngineError::StaleEntity(entity)) => {
            debug!(event, %entity, "entity no longer valid");
            Vec::new()
        }
        Err(e) => {
            warn!(event, error = %e, "handler failed");
            Vec::new()
        }
    }
}
