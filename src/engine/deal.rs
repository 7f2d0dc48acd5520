//! Parity-balanced dealing.
//!
//! A [`Dealer`] lives for one redeal. It starts from the mode's full pool,
//! drops one copy of every value still in play, and then alternates the
//! parity of each draw, starting from whichever parity is in the majority.
//! Values already dealt in this redeal are avoided while alternatives exist.

use tracing::trace;

use crate::core::{EngineError, GameRng, NumberPool, Tile};
use crate::rules::GameMode;

/// Pool plus parity cursor for one redeal.
#[derive(Clone, Debug)]
pub struct Dealer {
    pool: NumberPool,
    even: bool,
    drawn: Vec<u8>,
}

impl Dealer {
    /// Dealer for `mode`, excluding the values of `in_play`.
    pub fn new(mode: &GameMode, in_play: impl IntoIterator<Item = Tile>, rng: &mut GameRng) -> Self {
        let mut pool = mode.pool();
        for value in in_play.into_iter().filter_map(Tile::value) {
            pool.exclude(value);
        }
        let even = pool.is_more_even(rng);
        trace!(remaining = pool.len(), even, "dealer ready");
        Self {
            pool,
            even,
            drawn: Vec::new(),
        }
    }

    /// Values left to draw.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.pool.len()
    }

    /// Parity of the next draw.
    #[must_use]
    pub fn next_is_even(&self) -> bool {
        self.even
    }

    /// Draw, consume and wrap the next value.
    ///
    /// # Errors
    ///
    /// [`EngineError::PoolExhausted`] when nothing is left.
    pub fn draw(&mut self, mode: &GameMode, rng: &mut GameRng) -> Result<Tile, EngineError> {
        let value = self
            .pool
            .draw(self.even, &self.drawn, rng)
            .ok_or(EngineError::PoolExhausted)?;
        self.pool.exclude(value);
        self.drawn.push(value);
        self.even = !self.even;
        Ok(mode.tile_for(value))
    }
}
