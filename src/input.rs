// src/input.rs
//! Input abstractions and mode-aware key mapping.

use std::collections::VecDeque;
use std::time::Duration;

use crossterm::event::{self, Event as CEvent, KeyCode, KeyEventKind};
use world::Direction;

use crate::game::Mode;

/// Terminal-agnostic key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Enter,
    Esc,
}

/// A discrete command after mode-aware key translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerAction {
    // Main menu / game over
    NewGame,
    LoadGame,
    Quit,
    BackToMenu,
    // Playing
    Move(Direction),
    Interact,
    OpenInventory,
    SaveGame,
    CastSkill,
    // Combat
    CombatAttack,
    CombatDefend,
    CombatSkill,
    CombatItem,
    CombatFlee,
    // Inventory / shop
    SelectSlot(usize),
    CloseMenu,
}

pub trait InputSource {
    /// Poll for one key event, waiting at most `timeout`.
    fn poll(&mut self, timeout: Duration) -> anyhow::Result<Option<KeyInput>>;
}

/// Live terminal input via crossterm.
#[derive(Debug, Default)]
pub struct ConsoleInput;

impl InputSource for ConsoleInput {
    fn poll(&mut self, timeout: Duration) -> anyhow::Result<Option<KeyInput>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        if let CEvent::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                return Ok(None);
            }
            let input = match key.code {
                KeyCode::Char(c) => KeyInput::Char(c.to_ascii_lowercase()),
                KeyCode::Up => KeyInput::Up,
                KeyCode::Down => KeyInput::Down,
                KeyCode::Left => KeyInput::Left,
                KeyCode::Right => KeyInput::Right,
                KeyCode::Enter => KeyInput::Enter,
                KeyCode::Esc => KeyInput::Esc,
                _ => return Ok(None),
            };
            return Ok(Some(input));
        }
        Ok(None)
    }
}

/// Scripted input for tests and demos.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    keys: VecDeque<KeyInput>,
}

impl ScriptedInput {
    pub fn new(keys: impl IntoIterator<Item = KeyInput>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, _timeout: Duration) -> anyhow::Result<Option<KeyInput>> {
        Ok(self.keys.pop_front())
    }
}

/// Translate a key into a command for the current mode. Each mode owns its
/// own table; a key with no entry is ignored.
pub fn map_key(mode: Mode, key: KeyInput) -> Option<PlayerAction> {
    match mode {
        Mode::MainMenu => match key {
            KeyInput::Char('n') | KeyInput::Enter => Some(PlayerAction::NewGame),
            KeyInput::Char('l') => Some(PlayerAction::LoadGame),
            KeyInput::Char('q') | KeyInput::Esc => Some(PlayerAction::Quit),
            _ => None,
        },
        Mode::Playing => match key {
            KeyInput::Up | KeyInput::Char('w') => Some(PlayerAction::Move(Direction::North)),
            KeyInput::Down | KeyInput::Char('s') => Some(PlayerAction::Move(Direction::South)),
            KeyInput::Left | KeyInput::Char('a') => Some(PlayerAction::Move(Direction::West)),
            KeyInput::Right | KeyInput::Char('d') => Some(PlayerAction::Move(Direction::East)),
            KeyInput::Enter | KeyInput::Char('e') => Some(PlayerAction::Interact),
            KeyInput::Char('i') => Some(PlayerAction::OpenInventory),
            KeyInput::Char('o') => Some(PlayerAction::SaveGame),
            KeyInput::Char('h') => Some(PlayerAction::CastSkill),
            KeyInput::Char(c @ '1'..='9') => {
                Some(PlayerAction::SelectSlot(c as usize - '1' as usize))
            }
            KeyInput::Char('q') => Some(PlayerAction::Quit),
            KeyInput::Esc => Some(PlayerAction::CloseMenu),
            _ => None,
        },
        Mode::Combat => match key {
            KeyInput::Char('a') | KeyInput::Char('1') => Some(PlayerAction::CombatAttack),
            KeyInput::Char('d') | KeyInput::Char('2') => Some(PlayerAction::CombatDefend),
            KeyInput::Char('s') | KeyInput::Char('3') => Some(PlayerAction::CombatSkill),
            KeyInput::Char('i') | KeyInput::Char('4') => Some(PlayerAction::CombatItem),
            KeyInput::Char('f') | KeyInput::Char('5') => Some(PlayerAction::CombatFlee),
            _ => None,
        },
        Mode::Inventory => match key {
            KeyInput::Char(c @ '1'..='9') => {
                Some(PlayerAction::SelectSlot(c as usize - '1' as usize))
            }
            KeyInput::Esc | KeyInput::Char('i') => Some(PlayerAction::CloseMenu),
            _ => None,
        },
        Mode::GameOver => match key {
            KeyInput::Enter => Some(PlayerAction::BackToMenu),
            KeyInput::Char('q') | KeyInput::Esc => Some(PlayerAction::Quit),
            _ => None,
        },
    }
}
