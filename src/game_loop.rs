// src/game_loop.rs
//! Fixed-rate loop tying input, game ticks and rendering together.

use save::SaveStore;

use crate::game::RpgGame;
use crate::input::{InputSource, map_key};
use crate::renderer::{Clock, Renderer};

pub struct GameLoop<S: SaveStore, R: Renderer, I: InputSource, C: Clock> {
    pub game: RpgGame<S>,
    renderer: R,
    input: I,
    clock: C,
}

impl<S: SaveStore, R: Renderer, I: InputSource, C: Clock> GameLoop<S, R, I, C> {
    pub fn new(game: RpgGame<S>, renderer: R, input: I, clock: C) -> Self {
        Self {
            game,
            renderer,
            input,
            clock,
        }
    }

    /// Run until the game stops. One iteration is one logic tick: poll a
    /// key, dispatch it, advance the scheduler, render.
    pub fn run(&mut self) -> anyhow::Result<()> {
        self.renderer.init()?;
        while self.game.is_running() {
            self.game.set_wall_clock(self.clock.now_unix());

            if let Some(key) = self.input.poll(self.clock.tick_rate())?
                && let Some(action) = map_key(self.game.mode(), key)
            {
                self.game.handle_action(action);
            }

            self.game.tick();

            // A failed frame degrades to a stale display; it never stops
            // the tick.
            let _ = self.renderer.draw(&self.game.view());
        }
        self.game.shutdown();
        self.renderer.cleanup()?;
        Ok(())
    }
}
