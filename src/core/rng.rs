//! Seeded randomness for the dealer.
//!
//! A game's whole deal sequence follows from one `u64` seed. The stream
//! position is part of [`GameRngState`], so a restored save resumes the same
//! sequence instead of reseeding.
//!
//! ```
//! use rust_bingo::core::GameRng;
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! assert_eq!(a.pick(&[1u8, 2, 3, 4]), b.pick(&[1u8, 2, 3, 4]));
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Dealer randomness: uniform picks and parity tie-breaks.
#[derive(Clone, Debug)]
pub struct GameRng {
    stream: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            stream: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fair coin.
    pub fn coin_flip(&mut self) -> bool {
        self.stream.gen_bool(0.5)
    }

    /// Uniform pick from `values`, `None` when empty.
    pub fn pick<T: Copy>(&mut self, values: &[T]) -> Option<T> {
        values.choose(&mut self.stream).copied()
    }

    /// Snapshot of the stream for persistence.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.stream.get_word_pos(),
        }
    }

    /// Resume a stream captured by [`GameRng::state`].
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut stream = ChaCha8Rng::seed_from_u64(state.seed);
        stream.set_word_pos(state.word_pos);
        Self {
            stream,
            seed: state.seed,
        }
    }
}

/// Persisted RNG position: the seed plus the ChaCha8 word counter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    pub seed: u64,
    pub word_pos: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGITS: [u8; 10] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9];

    #[test]
    fn test_same_seed_same_picks() {
        let mut a = GameRng::new(42);
        let mut b = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(a.pick(&DIGITS), b.pick(&DIGITS));
        }
    }

    #[test]
    fn test_seeds_diverge() {
        let mut a = GameRng::new(1);
        let mut b = GameRng::new(2);

        let left: Vec<_> = (0..20).map(|_| a.pick(&DIGITS)).collect();
        let right: Vec<_> = (0..20).map(|_| b.pick(&DIGITS)).collect();
        assert_ne!(left, right);
    }

    #[test]
    fn test_pick_empty() {
        let mut rng = GameRng::new(3);
        assert_eq!(rng.pick::<u8>(&[]), None);
        assert_eq!(rng.pick(&[7u8]), Some(7));
    }

    #[test]
    fn test_restored_stream_continues() {
        let mut rng = GameRng::new(7);
        for _ in 0..25 {
            rng.coin_flip();
        }

        let state = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.pick(&DIGITS)).collect();

        let mut restored = GameRng::from_state(&state);
        let actual: Vec<_> = (0..10).map(|_| restored.pick(&DIGITS)).collect();

        assert_eq!(expected, actual);
        assert_eq!(restored.seed(), 7);
    }

    #[test]
    fn test_state_serde() {
        let state = GameRngState { seed: 42, word_pos: 12345 };
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(serde_json::from_str::<GameRngState>(&json).unwrap(), state);
    }
}
