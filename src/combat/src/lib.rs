// src/combat/src/lib.rs
//! Turn-based battle resolution between the player and one enemy.
//!
//! A [`CombatSession`] owns the ephemeral enemy and a bounded log; the live
//! player is borrowed per call so no subsystem ever works on a stale copy.
//! Enemy-turn timing lives with the orchestrator: after the player's action
//! the session sits in `EnemyTurn` until [`CombatSession::execute_enemy_turn`]
//! is driven by the scheduler, and combat input is ignored meanwhile.

use std::collections::VecDeque;

use character::{AiKind, Character, StatusEffect, StatusKind};
use rand::Rng;
use thiserror::Error;

pub mod enemy;

pub use crate::enemy::{EnemyFactory, EnemyTemplate, default_templates};

/// Oldest entries are evicted beyond this many log lines.
pub const COMBAT_LOG_CAPACITY: usize = 50;

/// Damage variance band applied to every attack: `[80%, 120%]` of attack.
const DAMAGE_VARIANCE: std::ops::Range<f32> = 0.8..1.2;

/// Flee parameters: `min(FLEE_CAP, FLEE_BASE * player_agi / enemy_agi)`.
const FLEE_BASE: f64 = 0.7;
const FLEE_CAP: f64 = 0.95;

/// Enemy AI thresholds: defend at low health, 70% of the time. Defensive
/// temperaments start turtling earlier.
const AI_DEFEND_HEALTH_RATIO: f32 = 0.3;
const AI_DEFEND_HEALTH_RATIO_DEFENSIVE: f32 = 0.5;
const AI_DEFEND_CHANCE: f64 = 0.7;

#[derive(Debug, Error, PartialEq)]
pub enum CombatError {
    #[error("It isn't your turn.")]
    NotPlayerTurn,
    #[error("No action selected.")]
    NoActionSelected,
    #[error("The battle is already over.")]
    CombatOver,
}

/// Player intent for the current turn.
#[derive(Debug, Clone, PartialEq)]
pub enum CombatAction {
    Attack,
    Skill(String),
    UseItem(String),
    Defend,
    Flee,
}

/// How a combat session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatOutcome {
    Victory,
    Defeat,
    Fled,
}

/// Session state machine: player turn and enemy turn alternate until a
/// terminal outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum CombatState {
    PlayerTurn,
    EnemyTurn,
    Finished(CombatOutcome),
}

/// Result of executing the player's selected action.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult {
    /// The action resolved; the enemy turn should now be scheduled.
    Resolved,
    /// Item and skill use inside combat are not wired up yet. The player's
    /// turn is kept so the attempt stays observable rather than a silent
    /// no-op.
    NotImplemented,
    /// The action ended the battle.
    Finished(CombatOutcome),
}

/// Bounded, ordered combat message log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombatLog {
    entries: VecDeque<String>,
}

impl CombatLog {
    pub fn push(&mut self, message: impl Into<String>) {
        if self.entries.len() == COMBAT_LOG_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(message.into());
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One battle between the player and one enemy.
#[derive(Debug)]
pub struct CombatSession {
    enemy: Character,
    state: CombatState,
    turn_number: u32,
    log: CombatLog,
    selected_action: Option<CombatAction>,
}

impl CombatSession {
    /// Open a session. The combatant with the higher agility acts first;
    /// ties go to the player.
    pub fn new(player: &Character, enemy: Character) -> Self {
        let state = if enemy.stats.agility > player.stats.agility {
            CombatState::EnemyTurn
        } else {
            CombatState::PlayerTurn
        };

        let mut log = CombatLog::default();
        log.push(format!("A {} blocks your path!", enemy.name));
        if state == CombatState::EnemyTurn {
            log.push(format!("The {} moves first!", enemy.name));
        }

        Self {
            enemy,
            state,
            turn_number: 1,
            log,
            selected_action: None,
        }
    }

    pub fn state(&self) -> &CombatState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, CombatState::Finished(_))
    }

    pub fn is_player_turn(&self) -> bool {
        matches!(self.state, CombatState::PlayerTurn)
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn log(&self) -> &CombatLog {
        &self.log
    }

    pub fn enemy(&self) -> &Character {
        &self.enemy
    }

    pub fn selected_action(&self) -> Option<&CombatAction> {
        self.selected_action.as_ref()
    }

    /// Record the player's intent for this turn. Rejected outside the
    /// player's turn; this is the gate that ignores input while the enemy
    /// action is pending.
    pub fn select_action(&mut self, action: CombatAction) -> Result<(), CombatError> {
        match self.state {
            CombatState::PlayerTurn => {
                self.selected_action = Some(action);
                Ok(())
            }
            CombatState::EnemyTurn => Err(CombatError::NotPlayerTurn),
            CombatState::Finished(_) => Err(CombatError::CombatOver),
        }
    }

    /// Resolve the selected action. On `Resolved`, the round's status decay
    /// has run and the session waits in `EnemyTurn` for the scheduler.
    pub fn execute_player_action(
        &mut self,
        player: &mut Character,
        rng: &mut impl Rng,
    ) -> Result<ActionResult, CombatError> {
        if !self.is_player_turn() {
            return Err(match self.state {
                CombatState::Finished(_) => CombatError::CombatOver,
                _ => CombatError::NotPlayerTurn,
            });
        }
        let action = self.selected_action.take().ok_or(CombatError::NoActionSelected)?;

        match action {
            CombatAction::Attack => {
                let damage = perform_attack(player, &mut self.enemy, rng);
                self.log
                    .push(format!("You hit the {} for {} damage!", self.enemy.name, damage));
                if !self.enemy.is_alive() {
                    // Mid-turn termination: no decay, no enemy turn.
                    self.log.push(format!("The {} is defeated!", self.enemy.name));
                    self.state = CombatState::Finished(CombatOutcome::Victory);
                    return Ok(ActionResult::Finished(CombatOutcome::Victory));
                }
            }
            CombatAction::Defend => {
                player.add_status(StatusEffect::defending());
                self.log.push("You brace yourself behind your guard.");
            }
            CombatAction::Flee => {
                let ratio =
                    player.stats.agility as f64 / self.enemy.stats.agility.max(1) as f64;
                let chance = (FLEE_BASE * ratio).min(FLEE_CAP);
                if rng.random_bool(chance) {
                    self.log.push("You slip away from the fight!");
                    self.state = CombatState::Finished(CombatOutcome::Fled);
                    return Ok(ActionResult::Finished(CombatOutcome::Fled));
                }
                // A failed attempt still consumes the turn.
                self.log.push(format!("The {} cuts off your escape!", self.enemy.name));
            }
            CombatAction::Skill(_) | CombatAction::UseItem(_) => {
                self.log.push("Nothing happens. You can't do that yet.");
                return Ok(ActionResult::NotImplemented);
            }
        }

        self.end_player_turn(player);
        Ok(ActionResult::Resolved)
    }

    /// Round upkeep: status decay exactly once, after the player's action
    /// and before the enemy acts.
    fn end_player_turn(&mut self, player: &mut Character) {
        for expired in player.decay_statuses() {
            if expired.kind == StatusKind::Buff {
                self.log.push("Your buff wears off.");
            }
        }
        for expired in self.enemy.decay_statuses() {
            if expired.kind == StatusKind::Buff {
                self.log.push(format!("The {}'s buff wears off.", self.enemy.name));
            }
        }
        self.state = CombatState::EnemyTurn;
    }

    /// Run the enemy's scheduled action. Safe to call from a stale timer:
    /// anything but `EnemyTurn` is a no-op returning `None`.
    pub fn execute_enemy_turn(
        &mut self,
        player: &mut Character,
        rng: &mut impl Rng,
    ) -> Option<CombatOutcome> {
        if self.state != CombatState::EnemyTurn {
            return None;
        }

        let threshold = match self.enemy.enemy.as_ref().map(|p| p.ai) {
            Some(AiKind::Defensive) => AI_DEFEND_HEALTH_RATIO_DEFENSIVE,
            _ => AI_DEFEND_HEALTH_RATIO,
        };
        // Reactive AI: a hurt enemy usually turtles, otherwise it attacks.
        if self.enemy.stats.health_ratio() < threshold && rng.random_bool(AI_DEFEND_CHANCE) {
            self.enemy.add_status(StatusEffect::defending());
            self.log.push(format!("The {} falls back and defends.", self.enemy.name));
        } else {
            let damage = perform_attack(&self.enemy, player, rng);
            self.log
                .push(format!("The {} hits you for {} damage!", self.enemy.name, damage));
            if !player.is_alive() {
                self.log.push("You fall to the ground...");
                self.state = CombatState::Finished(CombatOutcome::Defeat);
                return Some(CombatOutcome::Defeat);
            }
        }

        self.turn_number += 1;
        self.state = CombatState::PlayerTurn;
        None
    }

    /// Tear the session down mid-flight (mode teardown, not flee).
    pub fn abandon(&mut self) {
        if self.is_active() {
            self.state = CombatState::Finished(CombatOutcome::Fled);
        }
    }

    /// Consume the session, yielding the enemy for reward application.
    pub fn into_enemy(self) -> Character {
        self.enemy
    }
}

/// Attack resolution: uniform variance in `[80%, 120%]` of total attack,
/// floored, then the defender's own mitigation in `take_damage`.
fn perform_attack(attacker: &Character, target: &mut Character, rng: &mut impl Rng) -> u32 {
    let raw = (attacker.attack_total() as f32 * rng.random_range(DAMAGE_VARIANCE)).floor() as u32;
    target.take_damage(raw)
}
