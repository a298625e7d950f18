//! RNG module - randomness source for piece generation
//!
//! The session only needs a uniform pick among the seven piece kinds, so the
//! randomness source is a one-method trait. Two implementations ship here:
//!
//! - [`SimpleRng`]: seeded LCG, deterministic for a given seed
//! - [`SequenceRng`]: replays a fixed list of kinds, for scripted scenarios

use crate::types::PieceKind;

/// Source of uniform random indices
pub trait Randomizer {
    /// Return an index in `[0, n)`. `n` is never zero.
    fn pick(&mut self, n: usize) -> usize;
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Scales by multiplication so the result depends on the high bits, which are the
    /// well-mixed ones in an LCG.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((u64::from(self.next_u32()) * u64::from(max)) >> 32) as u32
    }

    /// Current internal state (usable as a seed to replay from here)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Randomizer for SimpleRng {
    fn pick(&mut self, n: usize) -> usize {
        let max = u32::try_from(n).unwrap_or(u32::MAX).max(1);
        self.next_range(max) as usize
    }
}

/// Replays a fixed sequence of piece kinds, cycling when exhausted
#[derive(Debug, Clone)]
pub struct SequenceRng {
    kinds: Vec<PieceKind>,
    cursor: usize,
}

impl SequenceRng {
    /// Create from a list of kinds. An empty list always yields `PieceKind::I`.
    pub fn new(kinds: Vec<PieceKind>) -> Self {
        Self { kinds, cursor: 0 }
    }

    /// Sequence that only ever produces one kind
    pub fn repeat(kind: PieceKind) -> Self {
        Self::new(vec![kind])
    }
}

impl Randomizer for SequenceRng {
    fn pick(&mut self, n: usize) -> usize {
        let Some(kind) = self.kinds.get(self.cursor % self.kinds.len().max(1)).copied() else {
            return 0;
        };
        self.cursor = self.cursor.wrapping_add(1);
        kind.index() % n.max(1)
    }
}
