// src/world/src/scene.rs

use serde::{Deserialize, Serialize};

pub const TILE_WALL: char = '#';
pub const TILE_WATER: char = '~';

/// A grid coordinate. Signed so candidate positions one step off the map
/// edge stay representable during legality checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    South,
    West,
    East,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
        }
    }
}

/// One line of a shop's stock list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopEntry {
    pub item_id: String,
    pub price: u32,
    pub stock: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Shop {
    pub items: Vec<ShopEntry>,
}

/// A scene-scoped character the player can talk to. Rebuilt from scene data
/// on every scene load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Npc {
    pub id: String,
    pub name: String,
    pub position: Position,
    /// One line is chosen at random per interaction.
    pub dialogue: Vec<String>,
    /// Quests this NPC offers when spoken to.
    pub quests: Vec<String>,
    pub shop: Option<Shop>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShrineEffect {
    /// Restores the player to full health and mana. Repeatable.
    Heal,
    /// Requests a persistence write from the orchestrator. Repeatable.
    Save,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Yields its contents once; `None` means a random-loot roll.
    Chest { contents: Option<String> },
    Shop(Shop),
    Shrine(ShrineEffect),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub position: Position,
    pub kind: ObjectKind,
}

/// An edge to another scene. Travel happens only on explicit interact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub position: Position,
    pub destination: String,
    pub direction: Direction,
}

/// Static description of one explorable area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub id: String,
    pub name: String,
    pub description: String,
    pub start_position: Position,
    pub has_random_encounters: bool,
    /// Probability of an encounter per successful move, in `[0, 1]`.
    pub encounter_rate: f64,
    /// Row-major tile grid; every row has the same length.
    pub map: Vec<String>,
    pub npcs: Vec<Npc>,
    pub objects: Vec<SceneObject>,
    pub transitions: Vec<Transition>,
}

impl Scene {
    pub fn width(&self) -> i32 {
        self.map.first().map_or(0, |row| row.chars().count() as i32)
    }

    pub fn height(&self) -> i32 {
        self.map.len() as i32
    }

    pub fn tile_at(&self, position: Position) -> Option<char> {
        if position.x < 0 || position.y < 0 {
            return None;
        }
        self.map
            .get(position.y as usize)?
            .chars()
            .nth(position.x as usize)
    }

    /// Movement legality: inside the grid and not a wall or water tile.
    pub fn is_walkable(&self, position: Position) -> bool {
        matches!(self.tile_at(position), Some(tile) if tile != TILE_WALL && tile != TILE_WATER)
    }

    pub fn transition_at(&self, position: Position) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.position == position)
    }

    pub fn object_index_at(&self, position: Position) -> Option<usize> {
        self.objects.iter().position(|o| o.position == position)
    }
}
