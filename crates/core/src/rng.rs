//! RNG module - shuffled double-six tile bag
//!
//! Every bag holds each of the 28 double-six tiles exactly once, in a random
//! order. Tiles are drawn from the bag until it is exhausted, then a freshly
//! shuffled bag replaces it.
//!
//! Also provides a simple LCG so that a seed fully determines the tile order.

use crate::types::{Tile, BAG_SIZE};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // A zero state would still cycle, but keep seeds distinct from the default.
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones.
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Uniform Fisher-Yates shuffle
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Exhaustible bag of the 28 double-six tiles
#[derive(Debug, Clone)]
pub struct TileBag {
    bag: [Tile; BAG_SIZE],
    /// Index of the next tile to hand out; `BAG_SIZE` means exhausted.
    cursor: usize,
    rng: SimpleRng,
}

impl TileBag {
    /// Create a bag whose order is fully determined by `seed`
    pub fn new(seed: u32) -> Self {
        let mut bag = Self {
            bag: Tile::full_set(),
            cursor: 0,
            rng: SimpleRng::new(seed),
        };
        bag.refill();
        bag
    }

    fn refill(&mut self) {
        self.bag = Tile::full_set();
        self.rng.shuffle(&mut self.bag);
        self.cursor = 0;
    }

    /// Draw the next tile, starting a new shuffled bag when this one is spent
    pub fn draw(&mut self) -> Tile {
        if self.cursor >= self.bag.len() {
            self.refill();
        }
        let tile = self.bag[self.cursor];
        self.cursor += 1;
        tile
    }

    /// Tiles left before the next refill
    pub fn remaining(&self) -> usize {
        self.bag.len() - self.cursor
    }

    /// Current RNG state, usable as a seed to continue the sequence in a new bag
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for TileBag {
    fn default() -> Self {
        Self::new(1)
    }
}
