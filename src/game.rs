// src/game.rs
//! The orchestrator: owns the player, world, quests and combat, routes
//! input by mode, and drives deferred work through the tick scheduler.

use std::collections::{HashMap, VecDeque};

use character::{Character, SkillBook};
use combat::{ActionResult, CombatAction, CombatOutcome, CombatSession, EnemyFactory};
use error::{GameError, handle_error};
use items::ItemCatalog;
use quest::{QuestEvent, QuestSystem};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use save::{AUTOSAVE_SLOT, QuestSnapshot, SAVE_VERSION, SaveData, SaveStore, SaveSystem};
use world::{Interaction, MoveOutcome, ObjectKind, WorldError, WorldEvent, WorldManager, content};

use crate::event_bus::{EventBus, GameEvent};
use crate::input::PlayerAction;
use crate::renderer::GameView;
use crate::scheduler::{Scheduler, TICKS_PER_SECOND, Task};

/// Slot used by explicit saves (shrines, the save key).
pub const MANUAL_SLOT: u32 = 1;

/// Pause before the enemy's combat action, so the player's result is
/// readable first.
const ENEMY_TURN_DELAY: u64 = 6;
/// Pause between a combat resolution and its rewards/mode switch.
const COMBAT_WRAPUP_DELAY: u64 = 8;
const AUTOSAVE_INTERVAL: u64 = 60 * TICKS_PER_SECOND;

const MESSAGE_LOG_CAPACITY: usize = 50;
/// How much of the log the view shows.
const MESSAGE_TAIL: usize = 8;

const DEFAULT_PLAYER_NAME: &str = "Aria";

/// Top-level game mode; every key press is interpreted through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    MainMenu,
    Playing,
    Combat,
    Inventory,
    GameOver,
}

pub struct RpgGame<S: SaveStore> {
    mode: Mode,
    player: Character,
    catalog: ItemCatalog,
    skills: SkillBook,
    world: WorldManager,
    quests: QuestSystem,
    combat: Option<CombatSession>,
    scheduler: Scheduler,
    bus: EventBus,
    saves: SaveSystem<S>,
    rng: Pcg64Mcg,
    messages: VecDeque<String>,
    /// Arbitrary world flags beyond opened chests.
    game_flags: HashMap<String, String>,
    /// NPC whose shop is currently open, if any.
    active_shop: Option<String>,
    play_time_ticks: u64,
    /// Unix seconds, fed in by the game loop's clock.
    wall_clock: u64,
    running: bool,
}

impl<S: SaveStore> RpgGame<S> {
    pub fn new(store: S, seed: u64) -> Result<Self, GameError> {
        let world = build_world()?;
        let mut game = Self {
            mode: Mode::MainMenu,
            player: Character::new_player(DEFAULT_PLAYER_NAME),
            catalog: ItemCatalog::default(),
            skills: SkillBook::default(),
            world,
            quests: QuestSystem::new(quest::default_definitions()),
            combat: None,
            scheduler: Scheduler::default(),
            bus: EventBus::default(),
            saves: SaveSystem::new(store),
            rng: Pcg64Mcg::seed_from_u64(seed),
            messages: VecDeque::new(),
            game_flags: HashMap::new(),
            active_shop: None,
            play_time_ticks: 0,
            wall_clock: 0,
            running: true,
        };
        game.push_message("Welcome to Terminal Realm.");
        Ok(game)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn player(&self) -> &Character {
        &self.player
    }

    pub fn world(&self) -> &WorldManager {
        &self.world
    }

    pub fn quests(&self) -> &QuestSystem {
        &self.quests
    }

    pub fn combat(&self) -> Option<&CombatSession> {
        self.combat.as_ref()
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    pub fn saves(&self) -> &SaveSystem<S> {
        &self.saves
    }

    pub fn subscribe(&mut self, sink: Box<dyn crate::event_bus::EventSink>) {
        self.bus.subscribe(sink);
    }

    pub fn set_wall_clock(&mut self, now_unix: u64) {
        self.wall_clock = now_unix;
    }

    fn push_message(&mut self, message: impl Into<String>) {
        if self.messages.len() == MESSAGE_LOG_CAPACITY {
            self.messages.pop_front();
        }
        self.messages.push_back(message.into());
    }

    fn report(&mut self, error: &GameError) {
        let text = handle_error(error);
        self.push_message(text);
    }

    /// Mode dispatch: every command is routed through an explicit
    /// (mode, action) table.
    pub fn handle_action(&mut self, action: PlayerAction) {
        match (self.mode, action) {
            (Mode::MainMenu, PlayerAction::NewGame) => self.new_game(DEFAULT_PLAYER_NAME),
            (Mode::MainMenu, PlayerAction::LoadGame) => self.load_most_recent(),
            (Mode::MainMenu, PlayerAction::Quit) => self.running = false,

            (Mode::Playing, PlayerAction::Move(direction)) => self.handle_move(direction),
            (Mode::Playing, PlayerAction::Interact) => self.handle_interact(),
            (Mode::Playing, PlayerAction::OpenInventory) => self.mode = Mode::Inventory,
            (Mode::Playing, PlayerAction::SaveGame) => self.manual_save(),
            (Mode::Playing, PlayerAction::CastSkill) => self.cast_first_skill(),
            (Mode::Playing, PlayerAction::SelectSlot(index)) => {
                if self.active_shop.is_some() {
                    self.buy_slot(index);
                }
            }
            (Mode::Playing, PlayerAction::CloseMenu) => self.close_shop(),
            (Mode::Playing, PlayerAction::Quit) => self.running = false,

            (Mode::Combat, PlayerAction::CombatAttack) => {
                self.combat_action(CombatAction::Attack);
            }
            (Mode::Combat, PlayerAction::CombatDefend) => {
                self.combat_action(CombatAction::Defend);
            }
            (Mode::Combat, PlayerAction::CombatFlee) => self.combat_action(CombatAction::Flee),
            (Mode::Combat, PlayerAction::CombatSkill) => {
                let skill = self.player.skills.first().cloned().unwrap_or_default();
                self.combat_action(CombatAction::Skill(skill));
            }
            (Mode::Combat, PlayerAction::CombatItem) => {
                self.combat_action(CombatAction::UseItem("health_potion".to_string()));
            }

            (Mode::Inventory, PlayerAction::SelectSlot(index)) => {
                if self.active_shop.is_some() {
                    self.sell_slot(index);
                } else {
                    self.use_or_equip_slot(index);
                }
            }
            (Mode::Inventory, PlayerAction::CloseMenu)
            | (Mode::Inventory, PlayerAction::OpenInventory) => self.mode = Mode::Playing,

            (Mode::GameOver, PlayerAction::BackToMenu) => self.mode = Mode::MainMenu,
            (Mode::GameOver, PlayerAction::Quit) => self.running = false,

            // Everything else is not meaningful in the current mode.
            _ => {}
        }
    }

    /// Advance one game tick: accumulate play time and run due tasks.
    pub fn tick(&mut self) {
        if matches!(self.mode, Mode::Playing | Mode::Combat | Mode::Inventory) {
            self.play_time_ticks += 1;
        }
        for task in self.scheduler.advance() {
            self.run_task(task);
        }
    }

    /// Teardown: cancel pending timers so nothing fires into a dead game.
    pub fn shutdown(&mut self) {
        self.scheduler.clear();
        if let Some(session) = &mut self.combat {
            session.abandon();
        }
        self.running = false;
    }

    fn new_game(&mut self, name: &str) {
        match build_world() {
            Ok(world) => self.world = world,
            Err(err) => {
                self.report(&err);
                return;
            }
        }
        self.player = Character::new_player(name);
        self.quests = QuestSystem::new(quest::default_definitions());
        self.game_flags.clear();
        self.combat = None;
        self.active_shop = None;
        self.play_time_ticks = 0;
        self.scheduler.clear();
        self.scheduler.schedule_in(AUTOSAVE_INTERVAL, Task::Autosave);
        self.mode = Mode::Playing;
        self.push_message(format!("{name} arrives in Eldervale."));
        self.push_message("The village elder looks like he wants a word.");
    }

    fn load_most_recent(&mut self) {
        let Some(latest) = self
            .saves
            .list_saves()
            .into_iter()
            .max_by_key(|m| m.save_time)
        else {
            self.report(&GameError::SaveNotFound);
            return;
        };
        if let Err(err) = self.load_game(latest.slot) {
            self.report(&err);
        }
    }

    fn manual_save(&mut self) {
        match self.save_game(MANUAL_SLOT) {
            Ok(()) => self.push_message("Game saved."),
            Err(err) => self.report(&err),
        }
    }

    fn handle_move(&mut self, direction: world::Direction) {
        self.close_shop();
        match self
            .world
            .move_player(direction, self.player.level, &mut self.rng)
        {
            MoveOutcome::Blocked => self.push_message("You can't go that way."),
            MoveOutcome::Moved { events } => {
                for event in events {
                    match event {
                        WorldEvent::NpcNearby { name, .. } => {
                            self.push_message(format!("{name} stands here. [E] to talk."));
                        }
                        WorldEvent::TransitionNearby { .. } => {
                            self.push_message("A path leads onward. [E] to travel.");
                        }
                        WorldEvent::Encounter(enemy) => self.start_combat(*enemy),
                    }
                }
            }
        }
    }

    /// Open a combat session against `enemy` and hand input over to combat
    /// mode. If the enemy wins the agility comparison its opening turn is
    /// scheduled immediately.
    pub fn start_combat(&mut self, enemy: Character) {
        self.close_shop();
        self.push_message(format!("A {} blocks your path!", enemy.name));
        let session = CombatSession::new(&self.player, enemy);
        if !session.is_player_turn() {
            self.scheduler.schedule_in(ENEMY_TURN_DELAY, Task::EnemyTurn);
        }
        self.combat = Some(session);
        self.mode = Mode::Combat;
    }

    fn combat_action(&mut self, action: CombatAction) {
        let Some(session) = self.combat.as_mut() else {
            return;
        };
        if let Err(err) = session.select_action(action) {
            let text = err.to_string();
            self.push_message(text);
            return;
        }
        match session.execute_player_action(&mut self.player, &mut self.rng) {
            Ok(ActionResult::Resolved) => {
                self.scheduler.schedule_in(ENEMY_TURN_DELAY, Task::EnemyTurn);
            }
            Ok(ActionResult::NotImplemented) => {}
            Ok(ActionResult::Finished(outcome)) => {
                self.scheduler
                    .schedule_in(COMBAT_WRAPUP_DELAY, Task::FinishCombat(outcome));
            }
            Err(err) => {
                let text = err.to_string();
                self.push_message(text);
            }
        }
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::EnemyTurn => {
                // Stale timers (combat already over or torn down) fall
                // through harmlessly.
                let Some(session) = self.combat.as_mut() else {
                    return;
                };
                if let Some(outcome) = session.execute_enemy_turn(&mut self.player, &mut self.rng)
                {
                    self.scheduler
                        .schedule_in(COMBAT_WRAPUP_DELAY, Task::FinishCombat(outcome));
                }
            }
            Task::FinishCombat(outcome) => self.finish_combat(outcome),
            Task::Autosave => {
                if matches!(self.mode, Mode::Playing | Mode::Inventory)
                    && let Err(err) = self.save_game(AUTOSAVE_SLOT)
                {
                    self.report(&err);
                }
                self.scheduler.schedule_in(AUTOSAVE_INTERVAL, Task::Autosave);
            }
        }
    }

    /// Close out a resolved session. Rewards only flow on a genuine,
    /// non-fled victory.
    fn finish_combat(&mut self, outcome: CombatOutcome) {
        let Some(session) = self.combat.take() else {
            return;
        };
        self.scheduler
            .cancel_where(|task| matches!(task, Task::EnemyTurn));

        match outcome {
            CombatOutcome::Victory => {
                let enemy = session.into_enemy();
                self.apply_victory_rewards(&enemy);
                self.mode = Mode::Playing;
            }
            CombatOutcome::Fled => {
                self.push_message("You catch your breath back on the road.");
                self.mode = Mode::Playing;
            }
            CombatOutcome::Defeat => {
                self.push_message("Darkness takes you.");
                self.mode = Mode::GameOver;
            }
        }
    }

    fn apply_victory_rewards(&mut self, enemy: &Character) {
        let Some(profile) = enemy.enemy.clone() else {
            return;
        };
        self.push_message(format!(
            "Victory! You gain {} experience and {} gold.",
            profile.experience_reward, profile.gold_reward
        ));

        let before = self.player.level;
        self.player.gain_experience(profile.experience_reward);
        self.player.gold += profile.gold_reward;
        self.announce_level_ups(before);

        for item_id in enemy.roll_item_drops(&mut self.rng) {
            self.grant_item(&item_id, 1);
        }

        self.bus.emit(GameEvent::CombatVictory {
            enemy_name: enemy.name.clone(),
        });
        self.fire_quest_event(QuestEvent::KillEnemy {
            enemy_type: enemy.name.clone(),
        });
    }

    /// Add `quantity` of a catalog item to the player's bag, with messaging
    /// and quest notification. Unknown ids are logged and dropped.
    fn grant_item(&mut self, item_id: &str, quantity: u32) {
        let Some(item) = self.catalog.get(item_id).cloned() else {
            self.report(&GameError::unknown("item", item_id));
            return;
        };
        match self.player.inventory.add_item(item.clone(), quantity) {
            Ok(()) => {
                self.push_message(format!("You receive: {}.", item.name));
                self.fire_quest_event(QuestEvent::CollectItem {
                    item_id: item_id.to_string(),
                    quantity,
                });
            }
            Err(err) => self.push_message(err.to_string()),
        }
    }

    fn fire_quest_event(&mut self, event: QuestEvent) {
        let before = self.player.level;
        let completions = self
            .quests
            .update_progress(&event, &mut self.player, &self.catalog);
        for completion in completions {
            self.push_message(format!("Quest complete: {}!", completion.quest_name));
            self.push_message(format!(
                "Reward: {} experience, {} gold.",
                completion.rewards.experience, completion.rewards.gold
            ));
            self.bus.emit(GameEvent::QuestCompleted {
                quest_id: completion.quest_id,
            });
        }
        self.announce_level_ups(before);
    }

    fn announce_level_ups(&mut self, before: u32) {
        let after = self.player.level;
        if after > before {
            self.push_message(format!("You reach level {after}!"));
            self.bus.emit(GameEvent::LevelUp { level: after });
        }
    }

    /// Cast the player's first known skill out of combat. Unknown skill ids
    /// are logged and abandoned; short mana fails quietly with a notice.
    fn cast_first_skill(&mut self) {
        let Some(skill_id) = self.player.skills.first().cloned() else {
            return;
        };
        let Some(skill) = self.skills.get(&skill_id).cloned() else {
            self.report(&GameError::unknown("skill", skill_id));
            return;
        };
        if self.player.use_skill(&skill) {
            let message = skill.apply(&mut self.player);
            self.push_message(message);
        } else {
            self.push_message(format!("You don't have the mana for {}.", skill.name));
        }
    }

    fn handle_interact(&mut self) {
        let position = self.world.player_position();
        let interaction = self.world.interact(&mut self.player, &mut self.rng);
        match interaction {
            Interaction::Dialogue {
                npc_id,
                npc_name,
                line,
                quests,
                has_shop,
            } => {
                self.push_message(format!("{npc_name}: \"{line}\""));
                for quest_id in quests {
                    if let Ok(def) = self.quests.start_quest(&quest_id) {
                        let name = def.name.clone();
                        self.push_message(format!("New quest: {name}."));
                    }
                }
                self.fire_quest_event(QuestEvent::TalkToNpc {
                    npc_id: npc_id.clone(),
                });
                if has_shop {
                    self.open_shop(&npc_id);
                }
            }
            Interaction::Traveled { destination } => {
                self.close_shop();
                let name = self.world.current_scene().name.clone();
                self.push_message(format!("You travel to {name}."));
                self.fire_quest_event(QuestEvent::VisitLocation {
                    scene_id: destination,
                });
            }
            Interaction::ChestLoot { item_id } => {
                self.push_message("You pry the chest open.");
                self.grant_item(&item_id, 1);
                let chest_key = format!(
                    "{}:{}:{}",
                    self.world.current_scene_id(),
                    position.x,
                    position.y
                );
                self.fire_quest_event(QuestEvent::OpenChest { chest_key });
            }
            Interaction::ChestAlreadyOpened => self.push_message("The chest is empty."),
            Interaction::ShopOpened(shop) => {
                self.push_message("Wares on display:");
                for (i, entry) in shop.items.iter().enumerate() {
                    let name = self
                        .catalog
                        .get(&entry.item_id)
                        .map_or(entry.item_id.clone(), |d| d.name.clone());
                    self.push_message(format!("  {}) {} - {} gold", i + 1, name, entry.price));
                }
            }
            Interaction::ShrineHealed => {
                self.push_message("The shrine's light knits your wounds closed.");
            }
            Interaction::SaveRequested => {
                self.manual_save();
                self.push_message("The shrine hums softly.");
            }
            Interaction::Nothing => self.push_message("There is nothing here."),
        }
    }

    fn open_shop(&mut self, npc_id: &str) {
        let Some(shop) = self.world.npc(npc_id).and_then(|n| n.shop.clone()) else {
            return;
        };
        self.active_shop = Some(npc_id.to_string());
        self.push_message("For sale (press a number to buy, [I] to sell):");
        for (i, entry) in shop.items.iter().enumerate() {
            let name = self
                .catalog
                .get(&entry.item_id)
                .map_or(entry.item_id.clone(), |d| d.name.clone());
            let note = if entry.stock == 0 { " (sold out)" } else { "" };
            self.push_message(format!(
                "  {}) {} - {} gold{note}",
                i + 1,
                name,
                entry.price
            ));
        }
    }

    fn close_shop(&mut self) {
        self.active_shop = None;
    }

    fn buy_slot(&mut self, index: usize) {
        let Some(npc_id) = self.active_shop.clone() else {
            return;
        };
        let Some(entry) = self
            .world
            .npc(&npc_id)
            .and_then(|n| n.shop.as_ref())
            .and_then(|s| s.items.get(index))
            .cloned()
        else {
            return;
        };

        if entry.stock == 0 {
            self.push_message("That one is sold out.");
            return;
        }
        if self.player.gold < entry.price {
            self.push_message("You can't afford that.");
            return;
        }
        let Some(item) = self.catalog.get(&entry.item_id).cloned() else {
            self.report(&GameError::unknown("item", entry.item_id));
            return;
        };
        if let Err(err) = self.player.inventory.add_item(item.clone(), 1) {
            self.push_message(err.to_string());
            return;
        }

        self.player.gold -= entry.price;
        if let Some(stocked) = self
            .world
            .npc_mut(&npc_id)
            .and_then(|n| n.shop.as_mut())
            .and_then(|s| s.items.get_mut(index))
        {
            stocked.stock -= 1;
        }
        self.push_message(format!("You buy the {} for {} gold.", item.name, entry.price));
        self.fire_quest_event(QuestEvent::CollectItem {
            item_id: item.id.clone(),
            quantity: 1,
        });
    }

    /// Selling pays half the catalog value, rounded down.
    fn sell_slot(&mut self, index: usize) {
        let Some(stack) = self.player.inventory.slots().get(index) else {
            return;
        };
        let item = stack.item.clone();
        let price = item.value / 2;
        if self.player.inventory.remove_item(&item.id, 1).is_ok() {
            self.player.gold += price;
            self.push_message(format!("You sell the {} for {} gold.", item.name, price));
        }
    }

    fn use_or_equip_slot(&mut self, index: usize) {
        let Some(stack) = self.player.inventory.slots().get(index) else {
            return;
        };
        let item = stack.item.clone();

        if item.is_equippable() {
            match self.player.equip(&item.id) {
                Ok(message) => self.push_message(message),
                Err(err) => {
                    let text = err.to_string();
                    self.push_message(text);
                }
            }
            return;
        }

        if item.usable {
            // The inventory needs the player as an effect target while it is
            // itself part of the player; take it out for the call.
            let mut inventory = std::mem::take(&mut self.player.inventory);
            let result = inventory.use_item(&item.id, &mut self.player);
            self.player.inventory = inventory;
            match result {
                Ok(message) => self.push_message(message),
                Err(err) => {
                    let text = err.to_string();
                    self.push_message(text);
                }
            }
            return;
        }

        self.push_message(format!("The {} doesn't seem useful here.", item.name));
    }

    /// Serialize the current state into a snapshot.
    fn snapshot(&self) -> SaveData {
        let mut game_flags = self.game_flags.clone();
        for key in self.world.opened_chests() {
            game_flags.insert(format!("chest:{key}"), "1".to_string());
        }
        let (active, completed) = self.quests.export_state();
        SaveData {
            version: SAVE_VERSION,
            player: self.player.clone(),
            current_scene: self.world.current_scene_id().to_string(),
            game_flags,
            quests: QuestSnapshot { active, completed },
            save_time: self.wall_clock,
            play_time: self.play_time_ticks / TICKS_PER_SECOND,
        }
    }

    pub fn save_game(&mut self, slot: u32) -> Result<(), GameError> {
        let data = self.snapshot();
        self.saves.save(slot, &data)
    }

    /// Rebuild the whole session from a slot. Fails loudly on missing,
    /// corrupt or version-skewed saves without disturbing the running state.
    pub fn load_game(&mut self, slot: u32) -> Result<(), GameError> {
        let data = self.saves.load(slot)?;

        let mut world = build_world()?;
        world
            .load_scene(&data.current_scene)
            .map_err(|WorldError::UnknownScene(id)| GameError::unknown("scene", id))?;
        let chest_keys: Vec<String> = data
            .game_flags
            .keys()
            .filter_map(|k| k.strip_prefix("chest:"))
            .map(str::to_string)
            .collect();
        world.restore_opened_chests(chest_keys);

        let mut quests = QuestSystem::new(quest::default_definitions());
        quests.restore_state(data.quests.active, data.quests.completed);

        self.player = data.player;
        self.world = world;
        self.quests = quests;
        self.game_flags = data
            .game_flags
            .into_iter()
            .filter(|(k, _)| !k.starts_with("chest:"))
            .collect();
        self.play_time_ticks = data.play_time * TICKS_PER_SECOND;
        self.combat = None;
        self.active_shop = None;
        self.scheduler.clear();
        self.scheduler.schedule_in(AUTOSAVE_INTERVAL, Task::Autosave);
        self.mode = Mode::Playing;
        let name = self.player.name.clone();
        self.push_message(format!("Welcome back, {name}."));
        Ok(())
    }

    /// Build the read-only frame for the renderer.
    pub fn view(&self) -> GameView {
        match self.mode {
            Mode::MainMenu => self.menu_view(),
            Mode::Playing => self.world_view(),
            Mode::Combat => self.combat_view(),
            Mode::Inventory => self.inventory_view(),
            Mode::GameOver => GameView {
                mode: self.mode,
                header: "GAME OVER".to_string(),
                body: vec![
                    "Your story ends here.".to_string(),
                    "[Enter] back to menu   [Q] quit".to_string(),
                ],
                status: String::new(),
                messages: self.message_tail(),
            },
        }
    }

    fn menu_view(&self) -> GameView {
        let mut body = vec![
            "[N] New game".to_string(),
            "[L] Load game".to_string(),
            "[Q] Quit".to_string(),
            String::new(),
        ];
        for meta in self.saves.list_saves() {
            body.push(format!(
                "slot {}: {} (level {}, {})",
                meta.slot, meta.player_name, meta.level, meta.scene
            ));
        }
        GameView {
            mode: self.mode,
            header: "TERMINAL REALM".to_string(),
            body,
            status: String::new(),
            messages: self.message_tail(),
        }
    }

    fn world_view(&self) -> GameView {
        let scene = self.world.current_scene();
        let mut rows: Vec<Vec<char>> = scene.map.iter().map(|r| r.chars().collect()).collect();

        let mut put = |x: i32, y: i32, glyph: char| {
            if let Some(cell) = rows
                .get_mut(y as usize)
                .and_then(|row| row.get_mut(x as usize))
            {
                *cell = glyph;
            }
        };
        for object in &scene.objects {
            let glyph = match object.kind {
                ObjectKind::Chest { .. } => 'C',
                ObjectKind::Shop(_) => '$',
                ObjectKind::Shrine(_) => '+',
            };
            put(object.position.x, object.position.y, glyph);
        }
        for npc in self.world.npcs() {
            put(npc.position.x, npc.position.y, 'N');
        }
        let position = self.world.player_position();
        put(position.x, position.y, '@');

        GameView {
            mode: self.mode,
            header: format!("{} - {}", scene.name, scene.description),
            body: rows.into_iter().map(|r| r.into_iter().collect()).collect(),
            status: self.status_line(),
            messages: self.message_tail(),
        }
    }

    fn combat_view(&self) -> GameView {
        let mut body = Vec::new();
        if let Some(session) = &self.combat {
            let enemy = session.enemy();
            body.push(format!(
                "{} (level {})  HP {}/{}",
                enemy.name, enemy.level, enemy.stats.health, enemy.stats.max_health
            ));
            body.push(format!("Turn {}", session.turn_number()));
            body.push(String::new());
            let log: Vec<&str> = session.log().entries().collect();
            for line in log.iter().rev().take(6).rev() {
                body.push(line.to_string());
            }
            body.push(String::new());
            body.push("[A]ttack  [D]efend  [S]kill  [I]tem  [F]lee".to_string());
        }
        GameView {
            mode: self.mode,
            header: "COMBAT".to_string(),
            body,
            status: self.status_line(),
            messages: self.message_tail(),
        }
    }

    fn inventory_view(&self) -> GameView {
        let mut body = Vec::new();
        let selling = self.active_shop.is_some();
        body.push(if selling {
            "Press a number to sell (half value). [Esc] close.".to_string()
        } else {
            "Press a number to use or equip. [Esc] close.".to_string()
        });
        for (i, stack) in self.player.inventory.slots().iter().enumerate() {
            body.push(format!(
                "{}) {} x{}",
                i + 1,
                stack.item.name,
                stack.quantity
            ));
        }
        if self.player.inventory.is_empty() {
            body.push("(empty)".to_string());
        }
        let equipment = &self.player.equipment;
        body.push(String::new());
        body.push(format!(
            "Weapon: {}   Armor: {}",
            equipment
                .slot(items::EquipSlot::Weapon)
                .map_or("-", |i| i.name.as_str()),
            equipment
                .slot(items::EquipSlot::Armor)
                .map_or("-", |i| i.name.as_str()),
        ));
        GameView {
            mode: self.mode,
            header: "INVENTORY".to_string(),
            body,
            status: self.status_line(),
            messages: self.message_tail(),
        }
    }

    fn status_line(&self) -> String {
        let p = &self.player;
        format!(
            "{}  Lv{}  HP {}/{}  MP {}/{}  XP {}/{}  Gold {}",
            p.name,
            p.level,
            p.stats.health,
            p.stats.max_health,
            p.stats.mana,
            p.stats.max_mana,
            p.experience,
            p.experience_to_next,
            p.gold
        )
    }

    fn message_tail(&self) -> Vec<String> {
        let skip = self.messages.len().saturating_sub(MESSAGE_TAIL);
        self.messages.iter().skip(skip).cloned().collect()
    }
}

fn build_world() -> Result<WorldManager, GameError> {
    WorldManager::new(
        content::default_scenes(),
        EnemyFactory::default(),
        content::START_SCENE,
    )
    .map_err(|WorldError::UnknownScene(id)| GameError::unknown("scene", id))
}
