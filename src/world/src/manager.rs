// src/world/src/manager.rs

use std::collections::{BTreeSet, HashMap};

use character::Character;
use combat::EnemyFactory;
use rand::Rng;
use rand::seq::IndexedRandom;
use thiserror::Error;

use crate::scene::{Direction, Npc, ObjectKind, Position, Scene, Shop, ShrineEffect};

/// Loot table consulted when an authored chest carries no fixed contents.
const CHEST_LOOT: &[&str] = &["health_potion", "mana_potion", "strength_elixir"];

#[derive(Debug, Error, PartialEq)]
pub enum WorldError {
    #[error("Unknown scene '{0}'")]
    UnknownScene(String),
}

/// Something the player should be told about after a successful move.
#[derive(Debug)]
pub enum WorldEvent {
    /// An NPC shares the tile; prompt for interact.
    NpcNearby { npc_id: String, name: String },
    /// A random encounter fired; the enemy is ready for a combat session.
    Encounter(Box<Character>),
    /// A transition tile was reached; travel needs an explicit interact.
    TransitionNearby { destination: String },
}

#[derive(Debug)]
pub enum MoveOutcome {
    /// Position updated; events surfaced in discovery order.
    Moved { events: Vec<WorldEvent> },
    /// Out of bounds or an impassable tile. No state change.
    Blocked,
}

/// Result of one interact action. At most one interaction fires per call.
#[derive(Debug, PartialEq)]
pub enum Interaction {
    Dialogue {
        npc_id: String,
        npc_name: String,
        line: String,
        /// Quests this NPC offers; the orchestrator decides what to start.
        quests: Vec<String>,
        has_shop: bool,
    },
    /// The transition under the player was taken; the new scene is loaded.
    Traveled { destination: String },
    ChestLoot { item_id: String },
    ChestAlreadyOpened,
    /// A standalone shop object; stock is listed by the caller.
    ShopOpened(Shop),
    /// Shrine restored the player to full. Repeatable.
    ShrineHealed,
    /// Shrine requests a persistence write from the orchestrator. Repeatable.
    SaveRequested,
    Nothing,
}

/// Tracks the current scene and player position; resolves movement legality,
/// interaction targets, random encounters and scene transitions.
#[derive(Debug)]
pub struct WorldManager {
    scenes: HashMap<String, Scene>,
    factory: EnemyFactory,
    current_scene: String,
    player_position: Position,
    /// Scene-scoped; rebuilt on every scene load.
    npcs: Vec<Npc>,
    /// Permanently opened chests, keyed `scene:x:y`. Survives scene reloads
    /// and is carried through saves as game flags.
    opened_chests: BTreeSet<String>,
}

impl WorldManager {
    pub fn new(
        scenes: impl IntoIterator<Item = Scene>,
        factory: EnemyFactory,
        start_scene: &str,
    ) -> Result<Self, WorldError> {
        let scenes: HashMap<String, Scene> =
            scenes.into_iter().map(|s| (s.id.clone(), s)).collect();
        let mut manager = Self {
            scenes,
            factory,
            current_scene: String::new(),
            player_position: Position::new(0, 0),
            npcs: Vec::new(),
            opened_chests: BTreeSet::new(),
        };
        manager.load_scene(start_scene)?;
        Ok(manager)
    }

    pub fn current_scene(&self) -> &Scene {
        // The id is validated on every load, so the lookup cannot miss.
        &self.scenes[&self.current_scene]
    }

    pub fn current_scene_id(&self) -> &str {
        &self.current_scene
    }

    pub fn player_position(&self) -> Position {
        self.player_position
    }

    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    pub fn npc(&self, id: &str) -> Option<&Npc> {
        self.npcs.iter().find(|n| n.id == id)
    }

    pub fn npc_mut(&mut self, id: &str) -> Option<&mut Npc> {
        self.npcs.iter_mut().find(|n| n.id == id)
    }

    /// Switch to another scene: position resets to its start tile and the
    /// NPC set is rebuilt from scene data. Unknown ids leave everything
    /// untouched.
    pub fn load_scene(&mut self, id: &str) -> Result<(), WorldError> {
        let scene = self
            .scenes
            .get(id)
            .ok_or_else(|| WorldError::UnknownScene(id.to_string()))?;
        self.player_position = scene.start_position;
        self.npcs = scene.npcs.clone();
        self.current_scene = id.to_string();
        Ok(())
    }

    /// One step in `direction`. On success the post-move events are checked;
    /// on an illegal move nothing changes.
    pub fn move_player(
        &mut self,
        direction: Direction,
        player_level: u32,
        rng: &mut impl Rng,
    ) -> MoveOutcome {
        let candidate = self.player_position.step(direction);
        if !self.current_scene().is_walkable(candidate) {
            return MoveOutcome::Blocked;
        }
        self.player_position = candidate;
        MoveOutcome::Moved {
            events: self.check_events(player_level, rng),
        }
    }

    /// Post-move checks: NPC prompt, at most one encounter roll, transition
    /// prompt. Travel itself waits for an explicit interact.
    fn check_events(&self, player_level: u32, rng: &mut impl Rng) -> Vec<WorldEvent> {
        let scene = self.current_scene();
        let mut events = Vec::new();

        if let Some(npc) = self.npcs.iter().find(|n| n.position == self.player_position) {
            events.push(WorldEvent::NpcNearby {
                npc_id: npc.id.clone(),
                name: npc.name.clone(),
            });
        }

        if scene.has_random_encounters
            && rng.random_bool(scene.encounter_rate.clamp(0.0, 1.0))
            && let Some(enemy) = self.factory.spawn_for_level(player_level, rng)
        {
            events.push(WorldEvent::Encounter(Box::new(enemy)));
        }

        if let Some(transition) = scene.transition_at(self.player_position) {
            events.push(WorldEvent::TransitionNearby {
                destination: transition.destination.clone(),
            });
        }

        events
    }

    /// Resolve the interact action at the player's tile, in strict priority
    /// order: NPC, then transition, then object. One interaction per call.
    pub fn interact(&mut self, player: &mut Character, rng: &mut impl Rng) -> Interaction {
        if let Some(npc) = self.npcs.iter().find(|n| n.position == self.player_position) {
            let line = npc
                .dialogue
                .choose(rng)
                .cloned()
                .unwrap_or_else(|| "...".to_string());
            return Interaction::Dialogue {
                npc_id: npc.id.clone(),
                npc_name: npc.name.clone(),
                line,
                quests: npc.quests.clone(),
                has_shop: npc.shop.is_some(),
            };
        }

        if let Some(transition) = self.current_scene().transition_at(self.player_position) {
            let destination = transition.destination.clone();
            return match self.load_scene(&destination) {
                Ok(()) => Interaction::Traveled { destination },
                // Authored data pointing nowhere; stay put.
                Err(_) => Interaction::Nothing,
            };
        }

        if let Some(index) = self.current_scene().object_index_at(self.player_position) {
            return self.interact_object(index, player, rng);
        }

        Interaction::Nothing
    }

    fn interact_object(
        &mut self,
        index: usize,
        player: &mut Character,
        rng: &mut impl Rng,
    ) -> Interaction {
        let scene_id = self.current_scene.clone();
        let object = &self.scenes[&scene_id].objects[index];
        match &object.kind {
            ObjectKind::Chest { contents } => {
                let key = chest_key(&scene_id, object.position);
                if self.opened_chests.contains(&key) {
                    return Interaction::ChestAlreadyOpened;
                }
                let item_id = contents.clone().unwrap_or_else(|| {
                    CHEST_LOOT
                        .choose(rng)
                        .copied()
                        .unwrap_or("health_potion")
                        .to_string()
                });
                self.opened_chests.insert(key);
                Interaction::ChestLoot { item_id }
            }
            ObjectKind::Shop(shop) => Interaction::ShopOpened(shop.clone()),
            ObjectKind::Shrine(effect) => match effect {
                ShrineEffect::Heal => {
                    player.stats.health = player.stats.max_health;
                    player.stats.mana = player.stats.max_mana;
                    Interaction::ShrineHealed
                }
                ShrineEffect::Save => Interaction::SaveRequested,
            },
        }
    }

    /// Opened-chest flags for the save snapshot.
    pub fn opened_chests(&self) -> impl Iterator<Item = &str> {
        self.opened_chests.iter().map(String::as_str)
    }

    pub fn restore_opened_chests(&mut self, keys: impl IntoIterator<Item = String>) {
        self.opened_chests = keys.into_iter().collect();
    }
}

fn chest_key(scene_id: &str, position: Position) -> String {
    format!("{scene_id}:{}:{}", position.x, position.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{SceneObject, Transition};
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn rng() -> Pcg64Mcg {
        Pcg64Mcg::seed_from_u64(4)
    }

    fn field(id: &str, encounter_rate: f64) -> Scene {
        Scene {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            start_position: Position::new(1, 1),
            has_random_encounters: encounter_rate > 0.0,
            encounter_rate,
            map: vec![
                "######".to_string(),
                "#....#".to_string(),
                "#.~..#".to_string(),
                "#....#".to_string(),
                "######".to_string(),
            ],
            npcs: Vec::new(),
            objects: Vec::new(),
            transitions: Vec::new(),
        }
    }

    fn npc(id: &str, x: i32, y: i32) -> Npc {
        Npc {
            id: id.to_string(),
            name: id.to_string(),
            position: Position::new(x, y),
            dialogue: vec!["Hello.".to_string()],
            quests: Vec::new(),
            shop: None,
        }
    }

    fn manager(scenes: Vec<Scene>, start: &str) -> WorldManager {
        WorldManager::new(scenes, EnemyFactory::default(), start).unwrap()
    }

    #[test]
    fn unknown_start_scene_is_rejected() {
        let result = WorldManager::new(vec![field("a", 0.0)], EnemyFactory::default(), "b");
        assert!(matches!(result, Err(WorldError::UnknownScene(id)) if id == "b"));
    }

    #[test]
    fn unknown_scene_load_leaves_state_untouched() {
        let mut world = manager(vec![field("a", 0.0)], "a");
        world.move_player(Direction::East, 1, &mut rng());
        let position = world.player_position();

        assert!(world.load_scene("nowhere").is_err());
        assert_eq!(world.current_scene_id(), "a");
        assert_eq!(world.player_position(), position);
    }

    #[test]
    fn illegal_moves_are_blocked_without_state_change() {
        let mut world = manager(vec![field("a", 0.0)], "a");
        // North from (1,1) is a wall, east then south runs into water.
        assert!(matches!(
            world.move_player(Direction::North, 1, &mut rng()),
            MoveOutcome::Blocked
        ));
        assert_eq!(world.player_position(), Position::new(1, 1));

        assert!(matches!(
            world.move_player(Direction::East, 1, &mut rng()),
            MoveOutcome::Moved { .. }
        ));
        assert!(matches!(
            world.move_player(Direction::South, 1, &mut rng()),
            MoveOutcome::Blocked
        ));
        assert_eq!(world.player_position(), Position::new(2, 1));
    }

    #[test]
    fn encounter_rate_one_fires_on_every_move() {
        let mut world = manager(vec![field("a", 1.0)], "a");
        let MoveOutcome::Moved { events } = world.move_player(Direction::East, 1, &mut rng())
        else {
            panic!("move should succeed");
        };
        assert!(
            events
                .iter()
                .any(|e| matches!(e, WorldEvent::Encounter(_)))
        );
    }

    #[test]
    fn encounter_rate_zero_never_fires() {
        let mut world = manager(vec![field("a", 0.0)], "a");
        let mut rng = rng();
        for direction in [Direction::East, Direction::West, Direction::East] {
            if let MoveOutcome::Moved { events } = world.move_player(direction, 1, &mut rng) {
                assert!(!events.iter().any(|e| matches!(e, WorldEvent::Encounter(_))));
            }
        }
    }

    #[test]
    fn npc_on_tile_takes_priority_over_transition() {
        let mut scene = field("a", 0.0);
        scene.npcs.push(npc("elder", 2, 1));
        scene.transitions.push(Transition {
            position: Position::new(2, 1),
            destination: "b".to_string(),
            direction: Direction::East,
        });
        let mut world = manager(vec![scene, field("b", 0.0)], "a");
        let mut rng = rng();
        world.move_player(Direction::East, 1, &mut rng);

        let mut player = Character::new_player("Aria");
        let interaction = world.interact(&mut player, &mut rng);
        assert!(matches!(
            interaction,
            Interaction::Dialogue { ref npc_id, .. } if npc_id == "elder"
        ));
        assert_eq!(world.current_scene_id(), "a");
    }

    #[test]
    fn travel_resets_position_and_rebuilds_npcs() {
        let mut village = field("village", 0.0);
        village.transitions.push(Transition {
            position: Position::new(2, 1),
            destination: "forest".to_string(),
            direction: Direction::East,
        });
        let mut forest = field("forest", 0.0);
        forest.npcs.push(npc("hermit", 3, 3));

        let mut world = manager(vec![village, forest], "village");
        let mut rng = rng();
        let mut player = Character::new_player("Aria");
        world.move_player(Direction::East, 1, &mut rng);

        let interaction = world.interact(&mut player, &mut rng);
        assert!(matches!(
            interaction,
            Interaction::Traveled { ref destination } if destination == "forest"
        ));
        assert_eq!(world.current_scene_id(), "forest");
        assert_eq!(world.player_position(), Position::new(1, 1));
        assert_eq!(world.npcs().len(), 1);
    }

    #[test]
    fn chest_yields_exactly_once_even_across_reloads() {
        let mut scene = field("a", 0.0);
        scene.objects.push(SceneObject {
            position: Position::new(2, 1),
            kind: ObjectKind::Chest {
                contents: Some("old_key".to_string()),
            },
        });
        let mut world = manager(vec![scene], "a");
        let mut rng = rng();
        let mut player = Character::new_player("Aria");
        world.move_player(Direction::East, 1, &mut rng);

        assert_eq!(
            world.interact(&mut player, &mut rng),
            Interaction::ChestLoot {
                item_id: "old_key".to_string()
            }
        );
        assert_eq!(
            world.interact(&mut player, &mut rng),
            Interaction::ChestAlreadyOpened
        );

        // The opened flag survives leaving and re-entering the scene.
        world.load_scene("a").unwrap();
        world.move_player(Direction::East, 1, &mut rng);
        assert_eq!(
            world.interact(&mut player, &mut rng),
            Interaction::ChestAlreadyOpened
        );
    }

    #[test]
    fn unauthored_chest_rolls_random_loot() {
        let mut scene = field("a", 0.0);
        scene.objects.push(SceneObject {
            position: Position::new(2, 1),
            kind: ObjectKind::Chest { contents: None },
        });
        let mut world = manager(vec![scene], "a");
        let mut rng = rng();
        let mut player = Character::new_player("Aria");
        world.move_player(Direction::East, 1, &mut rng);

        match world.interact(&mut player, &mut rng) {
            Interaction::ChestLoot { item_id } => {
                assert!(CHEST_LOOT.contains(&item_id.as_str()));
            }
            other => panic!("expected loot, got {other:?}"),
        }
    }

    #[test]
    fn heal_shrine_fully_restores_and_repeats() {
        let mut scene = field("a", 0.0);
        scene.objects.push(SceneObject {
            position: Position::new(2, 1),
            kind: ObjectKind::Shrine(ShrineEffect::Heal),
        });
        let mut world = manager(vec![scene], "a");
        let mut rng = rng();
        let mut player = Character::new_player("Aria");
        player.stats.health = 10;
        player.stats.mana = 0;
        world.move_player(Direction::East, 1, &mut rng);

        assert_eq!(world.interact(&mut player, &mut rng), Interaction::ShrineHealed);
        assert_eq!(player.stats.health, player.stats.max_health);
        assert_eq!(player.stats.mana, player.stats.max_mana);

        player.stats.health = 1;
        assert_eq!(world.interact(&mut player, &mut rng), Interaction::ShrineHealed);
        assert_eq!(player.stats.health, player.stats.max_health);
    }

    #[test]
    fn interact_on_an_empty_tile_is_a_noop() {
        let mut world = manager(vec![field("a", 0.0)], "a");
        let mut player = Character::new_player("Aria");
        assert_eq!(world.interact(&mut player, &mut rng()), Interaction::Nothing);
    }

    #[test]
    fn opened_chests_round_trip_through_flags() {
        let mut scene = field("a", 0.0);
        scene.objects.push(SceneObject {
            position: Position::new(2, 1),
            kind: ObjectKind::Chest {
                contents: Some("old_key".to_string()),
            },
        });
        let mut world = manager(vec![scene.clone()], "a");
        let mut rng = rng();
        let mut player = Character::new_player("Aria");
        world.move_player(Direction::East, 1, &mut rng);
        world.interact(&mut player, &mut rng);

        let flags: Vec<String> = world.opened_chests().map(str::to_string).collect();
        assert_eq!(flags, vec!["a:2:1".to_string()]);

        let mut restored = manager(vec![scene], "a");
        restored.restore_opened_chests(flags);
        restored.move_player(Direction::East, 1, &mut rng);
        assert_eq!(
            restored.interact(&mut player, &mut rng),
            Interaction::ChestAlreadyOpened
        );
    }
}
