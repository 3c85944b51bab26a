//! Randomness source for the automaton.
//!
//! Every random decision the simulation makes goes through [`Entropy`], so a
//! session can run on a seeded generator while tests force outcomes.

use sandfall_common::Direction;

/// Source of random outcomes.
pub trait Entropy {
    /// Returns true with the given probability (clamped to `[0, 1]`).
    fn chance(&mut self, probability: f32) -> bool;

    /// Returns a uniformly distributed index in `0..bound` (0 when `bound` is 0).
    fn index(&mut self, bound: usize) -> usize;

    /// Draws a cardinal direction uniformly.
    fn direction(&mut self) -> Direction {
        Direction::from_index(self.index(Direction::ALL.len()))
    }
}

/// Seeded pseudo-random entropy backed by `fastrand`.
#[derive(Debug, Clone)]
pub struct SeededEntropy {
    rng: fastrand::Rng,
}

impl SeededEntropy {
    /// Creates a generator from a seed; equal seeds replay equal runs.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Reseeds the generator.
    pub fn reseed(&mut self, seed: u64) {
        self.rng.seed(seed);
    }
}

impl Entropy for SeededEntropy {
    fn chance(&mut self, probability: f32) -> bool {
        if probability <= 0.0 {
            false
        } else if probability >= 1.0 {
            true
        } else {
            self.rng.f32() < probability
        }
    }

    fn index(&mut self, bound: usize) -> usize {
        if bound == 0 {
            0
        } else {
            self.rng.usize(..bound)
        }
    }
}

/// Entropy with pinned outcomes, for tests and scripted runs.
///
/// `chance` answers `outcome` for every probability above zero; a
/// zero-probability event never fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedEntropy {
    /// Answer for every non-zero probability
    pub outcome: bool,
    /// Direction returned by every draw
    pub direction: Direction,
    /// Index returned by every draw (wrapped into range)
    pub index: usize,
}

impl FixedEntropy {
    /// Every possible event fires and every move heads `direction`.
    #[must_use]
    pub const fn always(direction: Direction) -> Self {
        Self {
            outcome: true,
            direction,
            index: 0,
        }
    }

    /// No random event ever fires.
    #[must_use]
    pub const fn never() -> Self {
        Self {
            outcome: false,
            direction: Direction::Down,
            index: 0,
        }
    }
}

impl Entropy for FixedEntropy {
    fn chance(&mut self, probability: f32) -> bool {
        probability > 0.0 && self.outcome
    }

    fn index(&mut self, bound: usize) -> usize {
        if bound == 0 {
            0
        } else {
            self.index % bound
        }
    }

    fn direction(&mut self) -> Direction {
        self.direction
    }
}
