//! QuestTracker - Kill-quest progress, completion and claim

use crate::error::Rejection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tables_core::{ContentRegistry, QuestDefinition, QuestReward};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    Active,
    Completed,
    Claimed,
}

impl QuestStatus {
    /// Position in the quest log: claimable first, finished last
    fn log_order(self) -> u8 {
        match self {
            QuestStatus::Completed => 0,
            QuestStatus::Active => 1,
            QuestStatus::Claimed => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestRecord {
    pub status: QuestStatus,
    pub progress: u32,
}

/// Quest records of one character, keyed by quest id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestLog(BTreeMap<String, QuestRecord>);

impl QuestLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, quest_id: &str) -> Option<&QuestRecord> {
        self.0.get(quest_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Start a quest
    pub fn accept<'c>(
        &mut self,
        quest_id: &str,
        content: &'c ContentRegistry,
    ) -> Result<&'c QuestDefinition, Rejection> {
        let definition = content
            .quest(quest_id)
            .ok_or_else(|| Rejection::UnknownQuest(quest_id.to_string()))?;
        if self.0.contains_key(quest_id) {
            return Err(Rejection::QuestAlreadyAccepted(quest_id.to_string()));
        }
        self.0.insert(
            quest_id.to_string(),
            QuestRecord {
                status: QuestStatus::Active,
                progress: 0,
            },
        );
        Ok(definition)
    }

    /// Advance active quests that count a kill of `entity_type`
    ///
    /// Returns the quests this kill completed.
    pub fn record_kill<'c>(
        &mut self,
        entity_type: &str,
        content: &'c ContentRegistry,
    ) -> Vec<&'c QuestDefinition> {
        let mut completed = Vec::new();
        for (id, record) in self.0.iter_mut() {
            if record.status != QuestStatus::Active {
                continue;
            }
            let Some(definition) = content.quest(id) else {
                continue;
            };
            if !definition.counts_kill_of(entity_type) {
                continue;
            }
            record.progress += 1;
            if record.progress >= definition.goal() {
                record.status = QuestStatus::Completed;
                completed.push(definition);
            }
        }
        completed
    }

    /// Claim a completed quest, returning its reward exactly once
    pub fn claim<'c>(
        &mut self,
        quest_id: &str,
        content: &'c ContentRegistry,
    ) -> Option<(&'c QuestDefinition, &'c QuestReward)> {
        let record = self.0.get_mut(quest_id)?;
        if record.status != QuestStatus::Completed {
            return None;
        }
        let definition = content.quest(quest_id)?;
        record.status = QuestStatus::Claimed;
        Some((definition, &definition.reward))
    }

    /// Entries in display order: completed, active, claimed
    pub fn entries(&self) -> Vec<(&str, &QuestRecord)> {
        let mut entries: Vec<_> = self.0.iter().map(|(k, v)| (k.as_str(), v)).collect();
        entries.sort_by_key(|(id, record)| (record.status.log_order(), *id));
        entries
    }
}
