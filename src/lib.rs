// src/lib.rs
//! Turn-based RPG core: exploration, combat, quests and saves, driven by a
//! fixed-rate tick loop over swappable input/render/clock backends.

pub mod event_bus;
pub mod game;
pub mod game_loop;
pub mod input;
pub mod renderer;
pub mod scheduler;

pub use crate::event_bus::{EventBus, EventSink, GameEvent};
pub use crate::game::{MANUAL_SLOT, Mode, RpgGame};
pub use crate::game_loop::GameLoop;
pub use crate::input::{ConsoleInput, InputSource, KeyInput, PlayerAction, ScriptedInput, map_key};
pub use crate::renderer::{
    Clock, GameView, ManualClock, RecordingRenderer, Renderer, SystemClock, TerminalRenderer,
};
pub use crate::scheduler::{Scheduler, TICKS_PER_SECOND, Task};
