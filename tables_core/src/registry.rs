use crate::boss::BossDefinition;
use crate::card::TalentCard;
use crate::config::ContentFileConfig;
use crate::quest::QuestDefinition;
use crate::skill::SkillDefinition;
use crate::ConfigError;
use gear_core::EquipmentRegistry;
use stat_core::TalentId;
use std::collections::HashMap;
use std::path::Path;

const BUILTIN_FILES: &[(&str, &str)] = &[
    ("builtin/talents.toml", include_str!("../data/talents.toml")),
    ("builtin/quests.toml", include_str!("../data/quests.toml")),
    ("builtin/bosses.toml", include_str!("../data/bosses.toml")),
    ("builtin/skills.toml", include_str!("../data/skills.toml")),
];

/// Registry of all static content, loaded from TOML files
#[derive(Debug, Clone, Default)]
pub struct ContentRegistry {
    /// Card pool in file order
    cards: Vec<TalentCard>,
    quests: HashMap<String, QuestDefinition>,
    bosses: HashMap<String, BossDefinition>,
    skills: HashMap<String, SkillDefinition>,
}

impl ContentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the content shipped with the crate
    pub fn builtin() -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        for (origin, content) in BUILTIN_FILES {
            registry.load_str(content, Path::new(origin))?;
        }
        Ok(registry)
    }

    /// Load all content files from a directory (recursively)
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        registry.load_dir(dir)?;
        Ok(registry)
    }

    /// Load content from a directory recursively
    fn load_dir(&mut self, dir: &Path) -> Result<(), ConfigError> {
        if !dir.exists() {
            return Ok(());
        }

        let mut paths = Vec::new();
        let entries = std::fs::read_dir(dir).map_err(|e| ConfigError::Io {
            error: e,
            path: Some(dir.to_path_buf()),
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| ConfigError::Io {
                error: e,
                path: Some(dir.to_path_buf()),
            })?;
            paths.push(entry.path());
        }
        // Card pool order follows file names
        paths.sort();

        for path in paths {
            if path.is_dir() {
                self.load_dir(&path)?;
            } else if path.extension().is_some_and(|ext| ext == "toml") {
                self.load_file(&path)?;
            }
        }

        Ok(())
    }

    /// Load a single content file
    fn load_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            error: e,
            path: Some(path.to_path_buf()),
        })?;
        self.load_str(&content, path)
    }

    /// Parse content from a TOML string and add it
    pub fn load_str(&mut self, content: &str, origin: &Path) -> Result<(), ConfigError> {
        let config: ContentFileConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
            error: e,
            path: origin.to_path_buf(),
        })?;

        let invalid = |message: String| ConfigError::Validation {
            message,
            path: origin.to_path_buf(),
        };

        for card in config.talents {
            if self.card(card.id).is_some() {
                return Err(invalid(format!("duplicate talent card '{}'", card.id)));
            }
            self.cards.push(card);
        }

        for quest in config.quests {
            let id = quest.id.clone();
            let quest = QuestDefinition::from_config(quest)
                .map_err(|e| invalid(format!("quest '{}': {}", id, e)))?;
            if self.quests.insert(id.clone(), quest).is_some() {
                return Err(invalid(format!("duplicate quest '{}'", id)));
            }
        }

        for boss in config.bosses {
            let id = boss.id.clone();
            let boss = BossDefinition::from_config(boss)
                .map_err(|e| invalid(format!("boss '{}': {}", id, e)))?;
            if self.bosses.insert(id.clone(), boss).is_some() {
                return Err(invalid(format!("duplicate boss '{}'", id)));
            }
        }

        for skill in config.skills {
            if skill.cooldown_secs < 0.0 || skill.mana_cost < 0.0 {
                return Err(invalid(format!("skill '{}' has negative cost", skill.id)));
            }
            let id = skill.id.clone();
            if self.skills.insert(id.clone(), skill).is_some() {
                return Err(invalid(format!("duplicate skill '{}'", id)));
            }
        }

        Ok(())
    }

    /// All talent cards in pool order
    pub fn cards(&self) -> &[TalentCard] {
        &self.cards
    }

    pub fn card(&self, id: TalentId) -> Option<&TalentCard> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// The guaranteed card offered when nothing else qualifies
    pub fn filler(&self) -> Option<&TalentCard> {
        self.card(TalentId::BasicTraining)
    }

    pub fn quest(&self, id: &str) -> Option<&QuestDefinition> {
        self.quests.get(id)
    }

    pub fn boss(&self, id: &str) -> Option<&BossDefinition> {
        self.bosses.get(id)
    }

    pub fn skill(&self, id: &str) -> Option<&SkillDefinition> {
        self.skills.get(id)
    }

    /// List all quest IDs
    pub fn quest_ids(&self) -> impl Iterator<Item = &str> {
        self.quests.keys().map(|s| s.as_str())
    }

    /// List all boss IDs
    pub fn boss_ids(&self) -> impl Iterator<Item = &str> {
        self.bosses.keys().map(|s| s.as_str())
    }

    /// Item and skill ids referenced by content but missing from the equipment registry
    pub fn dangling_references(&self, equipment: &EquipmentRegistry) -> Vec<String> {
        let mut missing = Vec::new();
        for boss in self.bosses.values() {
            for drop in &boss.drops {
                if let crate::DropKind::Item(id) = &drop.kind {
                    if !equipment.contains(id) {
                        missing.push(format!("boss '{}' drops unknown item '{}'", boss.id, id));
                    }
                }
            }
        }
        for id in equipment.ids() {
            if let Some(skill_id) = equipment.get(id).and_then(|def| def.skill_id.as_deref()) {
                if !self.skills.contains_key(skill_id) {
                    missing.push(format!("item '{}' uses unknown skill '{}'", id, skill_id));
                }
            }
        }
        missing.sort();
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardEffect;
    use crate::quest::QuestKind;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_content_file(dir: &Path, name: &str, content: &str) {
        let path = dir.join(format!("{}.toml", name));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_builtin_content() {
        let registry = ContentRegistry::builtin().unwrap();
        assert!(registry.filler().is_some());
        assert!(registry.skill("fireball").is_some());
        assert!(registry.quest_ids().count() > 0);
        assert!(registry.boss_ids().count() > 0);

        let equipment = EquipmentRegistry::builtin().unwrap();
        assert_eq!(registry.dangling_references(&equipment), Vec::<String>::new());
    }

    #[test]
    fn test_builtin_skill_table() {
        let registry = ContentRegistry::builtin().unwrap();
        let expected = [
            ("gale_dash", 5.0, 15.0),
            ("fireball", 8.0, 25.0),
            ("thunder_smite", 15.0, 40.0),
            ("ice_shard", 3.0, 10.0),
            ("healing_aura", 20.0, 50.0),
            ("ground_smash", 12.0, 30.0),
            ("war_cry", 30.0, 45.0),
        ];
        for (id, cooldown, cost) in expected {
            let skill = registry.skill(id).unwrap();
            assert_eq!(skill.cooldown_secs, cooldown);
            assert_eq!(skill.mana_cost, cost);
        }
    }

    #[test]
    fn test_load_mixed_directory() {
        let dir = TempDir::new().unwrap();
        create_content_file(
            dir.path(),
            "quests",
            r#"
[[quests]]
id = "cull_zombies"
name = "Cull the Dead"
type = "kill"
target = "minecraft:zombie"
amount = 3
reward = { xp = 200 }
"#,
        );
        std::fs::create_dir(dir.path().join("cards")).unwrap();
        create_content_file(
            &dir.path().join("cards"),
            "basic",
            r#"
[[talents]]
id = "basic_training"
name = "Basic Training"
effect = { type = "xp", amount = 100 }
"#,
        );

        let registry = ContentRegistry::load(dir.path()).unwrap();
        let quest = registry.quest("cull_zombies").unwrap();
        assert_eq!(
            quest.kind,
            QuestKind::Kill {
                target: "minecraft:zombie".to_string(),
                amount: 3
            }
        );
        assert_eq!(quest.reward.count, 1);
        assert_eq!(
            registry.filler().map(|c| &c.effect),
            Some(&CardEffect::Xp { amount: 100 })
        );
    }

    #[test]
    fn test_duplicate_quest_rejected() {
        let mut registry = ContentRegistry::new();
        let content = r#"
[[quests]]
id = "twice"
name = "Twice"
type = "kill"
target = "minecraft:spider"
amount = 1
"#;
        registry.load_str(content, Path::new("a.toml")).unwrap();
        let err = registry.load_str(content, Path::new("b.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn test_unknown_quest_type_rejected() {
        let mut registry = ContentRegistry::new();
        let err = registry
            .load_str(
                r#"
[[quests]]
id = "fetch"
name = "Fetch"
type = "collect"
"#,
                Path::new("fetch.toml"),
            )
            .unwrap_err();
        match err {
            ConfigError::Validation { message, .. } => assert!(message.contains("collect")),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let registry = ContentRegistry::load(Path::new("/no/such/content")).unwrap();
        assert!(registry.cards().is_empty());
    }
}
