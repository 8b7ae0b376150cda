// src/quest/src/lib.rs
//! Quest definitions, progress tracking and reward grants.
//!
//! Progress only advances through explicit event notifications; the system
//! never polls game state on its own.

use std::collections::{BTreeSet, HashMap};

use character::Character;
use items::ItemCatalog;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum QuestError {
    #[error("Unknown quest '{0}'")]
    Unknown(String),
    #[error("Quest '{0}' is already active")]
    AlreadyActive(String),
    #[error("Quest '{0}' is already completed")]
    AlreadyCompleted(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    KillEnemy,
    CollectItem,
    TalkToNpc,
    VisitLocation,
    OpenChest,
}

/// One measurable sub-goal, tracked against a required count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub id: String,
    pub kind: ObjectiveKind,
    /// What the event payload must match: an enemy template id, an item id,
    /// an NPC id, a scene id or a chest key.
    pub target: String,
    pub description: String,
    pub required: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rewards {
    pub experience: u32,
    pub gold: u32,
    pub items: Vec<String>,
}

/// Static quest definition, looked up by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestDef {
    pub id: String,
    pub name: String,
    pub description: String,
    pub objectives: Vec<Objective>,
    pub rewards: Rewards,
}

/// A gameplay event that may advance quest objectives.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestEvent {
    KillEnemy { enemy_type: String },
    CollectItem { item_id: String, quantity: u32 },
    TalkToNpc { npc_id: String },
    VisitLocation { scene_id: String },
    OpenChest { chest_key: String },
}

/// Reported back to the orchestrator when a quest completes, for messaging
/// and event emission.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub quest_id: String,
    pub quest_name: String,
    pub rewards: Rewards,
}

/// Per-objective progress counters for one active quest.
pub type Progress = HashMap<String, u32>;

/// Tracks active and completed quests and advances objective progress on
/// gameplay events.
#[derive(Debug)]
pub struct QuestSystem {
    definitions: HashMap<String, QuestDef>,
    active: HashMap<String, Progress>,
    /// One-way set; a completed quest is never reopened or re-rewarded.
    completed: BTreeSet<String>,
}

impl QuestSystem {
    pub fn new(definitions: impl IntoIterator<Item = QuestDef>) -> Self {
        Self {
            definitions: definitions.into_iter().map(|d| (d.id.clone(), d)).collect(),
            active: HashMap::new(),
            completed: BTreeSet::new(),
        }
    }

    pub fn definition(&self, id: &str) -> Option<&QuestDef> {
        self.definitions.get(id)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.contains_key(id)
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.contains(id)
    }

    pub fn active_quests(&self) -> impl Iterator<Item = (&QuestDef, &Progress)> {
        self.active
            .iter()
            .filter_map(|(id, progress)| Some((self.definitions.get(id)?, progress)))
    }

    pub fn completed_quests(&self) -> impl Iterator<Item = &str> {
        self.completed.iter().map(String::as_str)
    }

    /// Accept a quest: progress starts at zero for every objective.
    /// Duplicate starts and restarts of completed quests are rejected.
    pub fn start_quest(&mut self, id: &str) -> Result<&QuestDef, QuestError> {
        if self.completed.contains(id) {
            return Err(QuestError::AlreadyCompleted(id.to_string()));
        }
        if self.active.contains_key(id) {
            return Err(QuestError::AlreadyActive(id.to_string()));
        }
        let def = self
            .definitions
            .get(id)
            .ok_or_else(|| QuestError::Unknown(id.to_string()))?;
        let progress = def.objectives.iter().map(|o| (o.id.clone(), 0)).collect();
        self.active.insert(id.to_string(), progress);
        Ok(def)
    }

    /// Advance every active quest whose objectives match the event, then
    /// resolve completions. Rewards are granted to the player exactly once,
    /// synchronously with the triggering event.
    pub fn update_progress(
        &mut self,
        event: &QuestEvent,
        player: &mut Character,
        catalog: &ItemCatalog,
    ) -> Vec<Completion> {
        for (id, progress) in &mut self.active {
            let Some(def) = self.definitions.get(id) else {
                continue;
            };
            for objective in &def.objectives {
                if let Some(gain) = objective_gain(objective, event) {
                    let counter = progress.entry(objective.id.clone()).or_insert(0);
                    match gain {
                        Gain::Increment(amount) => *counter += amount,
                        Gain::Set(value) => *counter = (*counter).max(value),
                    }
                }
            }
        }

        let finished: Vec<String> = self
            .active
            .iter()
            .filter(|(id, progress)| {
                self.definitions
                    .get(*id)
                    .is_some_and(|def| is_complete(def, progress))
            })
            .map(|(id, _)| id.clone())
            .collect();

        finished
            .into_iter()
            .filter_map(|id| self.complete_quest(&id, player, catalog))
            .collect()
    }

    /// Move a finished quest out of the active set and pay its rewards.
    fn complete_quest(
        &mut self,
        id: &str,
        player: &mut Character,
        catalog: &ItemCatalog,
    ) -> Option<Completion> {
        self.active.remove(id)?;
        if !self.completed.insert(id.to_string()) {
            return None;
        }
        let def = self.definitions.get(id)?;

        player.gain_experience(def.rewards.experience);
        player.gold += def.rewards.gold;
        for item_id in &def.rewards.items {
            if let Some(item) = catalog.get(item_id) {
                // A full inventory forfeits the item; gold and experience
                // are already paid.
                let _ = player.inventory.add_item(item.clone(), 1);
            }
        }

        Some(Completion {
            quest_id: def.id.clone(),
            quest_name: def.name.clone(),
            rewards: def.rewards.clone(),
        })
    }

    /// Active progress and the completed set, for the save snapshot.
    pub fn export_state(&self) -> (Vec<(String, Vec<(String, u32)>)>, Vec<String>) {
        let mut active: Vec<(String, Vec<(String, u32)>)> = self
            .active
            .iter()
            .map(|(id, progress)| {
                let mut pairs: Vec<(String, u32)> =
                    progress.iter().map(|(k, v)| (k.clone(), *v)).collect();
                pairs.sort();
                (id.clone(), pairs)
            })
            .collect();
        active.sort();
        let completed = self.completed.iter().cloned().collect();
        (active, completed)
    }

    /// Rebuild tracking state from a snapshot. Quests whose definitions no
    /// longer exist are dropped silently.
    pub fn restore_state(
        &mut self,
        active: Vec<(String, Vec<(String, u32)>)>,
        completed: Vec<String>,
    ) {
        self.active = active
            .into_iter()
            .filter(|(id, _)| self.definitions.contains_key(id))
            .map(|(id, pairs)| (id, pairs.into_iter().collect()))
            .collect();
        self.completed = completed.into_iter().collect();
    }
}

enum Gain {
    Increment(u32),
    Set(u32),
}

/// How much an event advances one objective, if it matches at all.
fn objective_gain(objective: &Objective, event: &QuestEvent) -> Option<Gain> {
    match (objective.kind, event) {
        (ObjectiveKind::KillEnemy, QuestEvent::KillEnemy { enemy_type })
            if *enemy_type == objective.target =>
        {
            Some(Gain::Increment(1))
        }
        (ObjectiveKind::CollectItem, QuestEvent::CollectItem { item_id, quantity })
            if *item_id == objective.target =>
        {
            Some(Gain::Increment(*quantity))
        }
        (ObjectiveKind::TalkToNpc, QuestEvent::TalkToNpc { npc_id })
            if *npc_id == objective.target =>
        {
            // Non-cumulative; talking twice still counts once.
            Some(Gain::Set(1))
        }
        (ObjectiveKind::VisitLocation, QuestEvent::VisitLocation { scene_id })
            if *scene_id == objective.target =>
        {
            Some(Gain::Set(1))
        }
        (ObjectiveKind::OpenChest, QuestEvent::OpenChest { chest_key })
            if *chest_key == objective.target =>
        {
            Some(Gain::Set(1))
        }
        _ => None,
    }
}

/// A quest is complete iff every objective meets its required count.
fn is_complete(def: &QuestDef, progress: &Progress) -> bool {
    def.objectives
        .iter()
        .all(|o| progress.get(&o.id).copied().unwrap_or(0) >= o.required)
}

fn objective(id: &str, kind: ObjectiveKind, target: &str, description: &str, required: u32) -> Objective {
    Objective {
        id: id.to_string(),
        kind,
        target: target.to_string(),
        description: description.to_string(),
        required,
    }
}

/// The built-in quest log.
pub fn default_definitions() -> Vec<QuestDef> {
    vec![
        QuestDef {
            id: "welcome_quest".to_string(),
            name: "A Warm Welcome".to_string(),
            description: "Meet the people of Eldervale.".to_string(),
            objectives: vec![
                objective(
                    "talk_elder",
                    ObjectiveKind::TalkToNpc,
                    "elder",
                    "Speak with Elder Rowan",
                    1,
                ),
                objective(
                    "talk_shopkeeper",
                    ObjectiveKind::TalkToNpc,
                    "shopkeeper",
                    "Speak with Marla the Shopkeeper",
                    1,
                ),
            ],
            rewards: Rewards {
                experience: 50,
                gold: 25,
                items: vec!["health_potion".to_string()],
            },
        },
        QuestDef {
            id: "forest_menace".to_string(),
            name: "The Forest Menace".to_string(),
            description: "Thin out the wolves stalking Whisperwood.".to_string(),
            objectives: vec![
                objective(
                    "cull_wolves",
                    ObjectiveKind::KillEnemy,
                    "Grey Wolf",
                    "Defeat 3 grey wolves",
                    3,
                ),
                objective(
                    "gather_pelts",
                    ObjectiveKind::CollectItem,
                    "wolf_pelt",
                    "Collect 2 wolf pelts",
                    2,
                ),
            ],
            rewards: Rewards {
                experience: 75,
                gold: 40,
                items: vec!["strength_elixir".to_string()],
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn system() -> QuestSystem {
        QuestSystem::new(default_definitions())
    }

    fn catalog() -> ItemCatalog {
        ItemCatalog::default()
    }

    fn player() -> Character {
        Character::new_player("Aria")
    }

    fn talk(npc_id: &str) -> QuestEvent {
        QuestEvent::TalkToNpc {
            npc_id: npc_id.to_string(),
        }
    }

    #[test]
    fn duplicate_and_unknown_starts_are_rejected() {
        let mut quests = system();
        assert!(quests.start_quest("welcome_quest").is_ok());
        assert_eq!(
            quests.start_quest("welcome_quest").unwrap_err(),
            QuestError::AlreadyActive("welcome_quest".to_string())
        );
        assert_eq!(
            quests.start_quest("dragon_hunt").unwrap_err(),
            QuestError::Unknown("dragon_hunt".to_string())
        );
    }

    #[test]
    fn welcome_quest_completes_after_both_conversations() {
        let mut quests = system();
        let catalog = catalog();
        let mut player = player();
        quests.start_quest("welcome_quest").unwrap();

        // One conversation is not enough, even repeated.
        assert!(quests.update_progress(&talk("elder"), &mut player, &catalog).is_empty());
        assert!(quests.update_progress(&talk("elder"), &mut player, &catalog).is_empty());
        assert!(quests.is_active("welcome_quest"));

        let completions = quests.update_progress(&talk("shopkeeper"), &mut player, &catalog);
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].quest_id, "welcome_quest");
        assert!(quests.is_completed("welcome_quest"));
        assert!(!quests.is_active("welcome_quest"));
    }

    #[test]
    fn rewards_are_granted_exactly_once() {
        let mut quests = system();
        let catalog = catalog();
        let mut player = player();
        quests.start_quest("welcome_quest").unwrap();

        quests.update_progress(&talk("elder"), &mut player, &catalog);
        quests.update_progress(&talk("shopkeeper"), &mut player, &catalog);
        assert_eq!(player.experience, 50);
        assert_eq!(player.gold, 30 + 25);
        assert_eq!(player.inventory.quantity_of("health_potion"), 1);

        // Further matching events change nothing.
        let completions = quests.update_progress(&talk("shopkeeper"), &mut player, &catalog);
        assert!(completions.is_empty());
        assert_eq!(player.gold, 55);
        assert_eq!(player.inventory.quantity_of("health_potion"), 1);
    }

    #[test]
    fn completed_quests_cannot_be_restarted() {
        let mut quests = system();
        let catalog = catalog();
        let mut player = player();
        quests.start_quest("welcome_quest").unwrap();
        quests.update_progress(&talk("elder"), &mut player, &catalog);
        quests.update_progress(&talk("shopkeeper"), &mut player, &catalog);

        assert_eq!(
            quests.start_quest("welcome_quest").unwrap_err(),
            QuestError::AlreadyCompleted("welcome_quest".to_string())
        );
    }

    #[test]
    fn kill_and_collect_objectives_accumulate() {
        let mut quests = system();
        let catalog = catalog();
        let mut player = player();
        quests.start_quest("forest_menace").unwrap();

        let kill = QuestEvent::KillEnemy {
            enemy_type: "Grey Wolf".to_string(),
        };
        for _ in 0..3 {
            assert!(quests.update_progress(&kill, &mut player, &catalog).is_empty());
        }
        // Kills alone do not finish the quest.
        assert!(quests.is_active("forest_menace"));

        let pelts = QuestEvent::CollectItem {
            item_id: "wolf_pelt".to_string(),
            quantity: 2,
        };
        let completions = quests.update_progress(&pelts, &mut player, &catalog);
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].quest_name, "The Forest Menace");
    }

    #[test]
    fn mismatched_events_leave_progress_alone() {
        let mut quests = system();
        let catalog = catalog();
        let mut player = player();
        quests.start_quest("forest_menace").unwrap();

        quests.update_progress(
            &QuestEvent::KillEnemy {
                enemy_type: "Goblin".to_string(),
            },
            &mut player,
            &catalog,
        );
        let (active, _) = quests.export_state();
        let (_, progress) = &active[0];
        assert!(progress.iter().all(|(_, count)| *count == 0));
    }

    #[test]
    fn state_round_trips_through_export_and_restore() {
        let mut quests = system();
        let catalog = catalog();
        let mut player = player();
        quests.start_quest("welcome_quest").unwrap();
        quests.start_quest("forest_menace").unwrap();
        quests.update_progress(&talk("elder"), &mut player, &catalog);
        quests.update_progress(
            &QuestEvent::KillEnemy {
                enemy_type: "Grey Wolf".to_string(),
            },
            &mut player,
            &catalog,
        );

        let (active, completed) = quests.export_state();
        let mut restored = system();
        restored.restore_state(active.clone(), completed);
        assert_eq!(restored.export_state().0, active);
        assert!(restored.is_active("welcome_quest"));

        // Progress carried over: one more conversation finishes the quest.
        let completions = restored.update_progress(&talk("shopkeeper"), &mut player, &catalog);
        assert_eq!(completions.len(), 1);
    }
}
