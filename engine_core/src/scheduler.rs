//! Tick scheduler - Periodic and one-shot tasks
//!
//! Tasks are plain data; the engine interprets them when they come due.

use crate::entity::EntityId;

/// Opaque handle of a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

/// Deferred work the engine knows how to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Regeneration, healing passives and HUD for every online player
    Cycle,
    /// Remove a skill cooldown tag
    ClearCooldown { player: EntityId, skill_id: String },
}

impl Task {
    /// Entity the task acts on, if it is tied to one
    pub fn target(&self) -> Option<EntityId> {
        match self {
            Task::Cycle => None,
            Task::ClearCooldown { player, .. } => Some(*player),
        }
    }
}

#[derive(Debug, Clone)]
struct Scheduled {
    handle: TaskHandle,
    due: u64,
    period: Option<u64>,
    task: Task,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    next_handle: u64,
    tasks: Vec<Scheduled>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` every `interval` ticks, first at `now + interval`
    pub fn run_periodic(&mut self, now: u64, interval: u64, task: Task) -> TaskHandle {
        let interval = interval.max(1);
        self.push(now + interval, Some(interval), task)
    }

    /// Run `task` once at `now + delay`
    pub fn run_after(&mut self, now: u64, delay: u64, task: Task) -> TaskHandle {
        self.push(now + delay, None, task)
    }

    fn push(&mut self, due: u64, period: Option<u64>, task: Task) -> TaskHandle {
        self.next_handle += 1;
        let handle = TaskHandle(self.next_handle);
        self.tasks.push(Scheduled {
            handle,
            due,
            period,
            task,
        });
        handle
    }

    /// Returns false if the handle was unknown or already ran
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|s| s.handle != handle);
        self.tasks.len() != before
    }

    /// Cancel every task acting on an entity
    pub fn cancel_for(&mut self, entity: EntityId) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|s| s.task.target() != Some(entity));
        before - self.tasks.len()
    }

    /// Take every task due at `now`, in scheduling order
    ///
    /// One-shot tasks are removed; periodic ones are pushed to their next slot.
    pub fn due(&mut self, now: u64) -> Vec<Task> {
        let mut ready = Vec::new();
        self.tasks.retain_mut(|s| {
            if s.due > now {
                return true;
            }
            ready.push(s.task.clone());
            match s.period {
                Some(period) => {
                    s.due = now + period;
                    true
                }
                None => false,
            }
        });
        ready
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear(player: u64) -> Task {
        Task::ClearCooldown {
            player: EntityId(player),
            skill_id: "fireball".to_string(),
        }
    }

    #[test]
    fn test_one_shot_runs_once() {
        let mut scheduler = Scheduler::new();
        scheduler.run_after(0, 3, clear(1));

        assert!(scheduler.due(2).is_empty());
        assert_eq!(scheduler.due(3), vec![clear(1)]);
        assert!(scheduler.due(4).is_empty());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_periodic_reschedules() {
        let mut scheduler = Scheduler::new();
        scheduler.run_periodic(0, 5, Task::Cycle);

        let runs: usize = (1..=20).map(|tick| scheduler.due(tick).len()).sum();
        assert_eq!(runs, 4);
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.run_after(0, 1, clear(1));
        scheduler.run_after(0, 1, clear(2));
        scheduler.run_periodic(0, 1, Task::Cycle);

        assert!(scheduler.cancel(handle));
        assert!(!scheduler.cancel(handle));
        assert_eq!(scheduler.cancel_for(EntityId(2)), 1);
        assert_eq!(scheduler.due(1), vec![Task::Cycle]);
    }
}
