// src/renderer.rs
//! Rendering and time abstractions.
//!
//! The core hands the renderer a read-only [`GameView`] snapshot; rendering
//! failures degrade to a stale display and never stop the tick.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    cursor::MoveTo,
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};

use crate::game::Mode;

/// Read-only frame description built by the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct GameView {
    pub mode: Mode,
    pub header: String,
    /// Mode-specific panel: map rows, combat panel, inventory listing.
    pub body: Vec<String>,
    pub status: String,
    /// Tail of the message log, newest last.
    pub messages: Vec<String>,
}

pub trait Renderer {
    fn init(&mut self) -> anyhow::Result<()>;
    fn draw(&mut self, view: &GameView) -> anyhow::Result<()>;
    fn cleanup(&mut self) -> anyhow::Result<()>;
}

/// Plain crossterm renderer writing the view line by line.
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn init(&mut self) -> anyhow::Result<()> {
        let mut stdout = io::stdout();
        queue!(stdout, Clear(ClearType::All))?;
        stdout.flush()?;
        Ok(())
    }

    fn draw(&mut self, view: &GameView) -> anyhow::Result<()> {
        let mut stdout = io::stdout();
        queue!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;

        let mut row = 0u16;
        let mut put = |stdout: &mut io::Stdout, text: &str| -> anyhow::Result<()> {
            queue!(stdout, MoveTo(0, row), Print(text))?;
            row += 1;
            Ok(())
        };

        put(&mut stdout, &view.header)?;
        put(&mut stdout, "")?;
        for line in &view.body {
            put(&mut stdout, line)?;
        }
        put(&mut stdout, "")?;
        put(&mut stdout, &view.status)?;
        put(&mut stdout, "")?;
        for message in &view.messages {
            put(&mut stdout, message)?;
        }

        stdout.flush()?;
        Ok(())
    }

    fn cleanup(&mut self) -> anyhow::Result<()> {
        let mut stdout = io::stdout();
        queue!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
        stdout.flush()?;
        Ok(())
    }
}

/// Records frames instead of painting them. Test double.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<GameView>,
}

impl Renderer for RecordingRenderer {
    fn init(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn draw(&mut self, view: &GameView) -> anyhow::Result<()> {
        self.frames.push(view.clone());
        Ok(())
    }

    fn cleanup(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Time source for the game loop.
pub trait Clock {
    /// Unix seconds, for save timestamps.
    fn now_unix(&self) -> u64;
    fn sleep(&self, duration: Duration);
    /// Fixed logic step of the loop.
    fn tick_rate(&self) -> Duration;
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }

    fn tick_rate(&self) -> Duration {
        Duration::from_millis(1000 / crate::scheduler::TICKS_PER_SECOND)
    }
}

/// Deterministic clock for tests; never sleeps.
#[derive(Debug, Default)]
pub struct ManualClock {
    pub now: u64,
}

impl Clock for ManualClock {
    fn now_unix(&self) -> u64 {
        self.now
    }

    fn sleep(&self, _duration: Duration) {}

    fn tick_rate(&self) -> Duration {
        Duration::from_millis(0)
    }
}
