// src/main.rs

use std::{io, process, time::SystemTime};

use anyhow::Context;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use save::FileStore;
use scopeguard::defer;

use terminal_realm::{ConsoleInput, GameLoop, RpgGame, SystemClock, TerminalRenderer};

fn main() -> anyhow::Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    execute!(io::stdout(), EnterAlternateScreen).context("Failed to enter alternate screen")?;
    defer! {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }

    let seed = {
        let time = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)?
            .as_nanos();
        let pid = process::id();
        (time ^ (pid as u128)) as u64
    };

    let game = RpgGame::new(FileStore::new("saves"), seed)?;
    let mut game_loop = GameLoop::new(
        game,
        TerminalRenderer::default(),
        ConsoleInput,
        SystemClock,
    );

    if let Err(err) = game_loop.run() {
        eprintln!("Game crashed: {err}");
    }
    Ok(())
}
