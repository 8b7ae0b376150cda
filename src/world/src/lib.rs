// src/world/src/lib.rs
//! Scene data, tile movement and interaction.

pub mod content;
pub mod manager;
pub mod scene;

pub use crate::manager::{Interaction, MoveOutcome, WorldError, WorldEvent, WorldManager};
pub use crate::scene::{
    Direction, Npc, ObjectKind, Position, Scene, SceneObject, Shop, ShopEntry, ShrineEffect,
    Transition,
};
