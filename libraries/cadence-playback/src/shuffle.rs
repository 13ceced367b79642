//! Shuffle selection
//!
//! Shuffle never reorders the queue. Each shuffled "next" draws a uniform
//! index from an injectable source and redraws while it lands on the
//! current track, so a queue with more than one entry never repeats the
//! same song back to back.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniformly distributed queue indices
pub trait IndexSource: Send {
    /// Draw an index in `0..len` (`len` is never zero)
    fn next_index(&mut self, len: usize) -> usize;
}

/// `IndexSource` backed by a seeded `StdRng`
#[derive(Debug, Clone)]
pub struct RandomIndexSource {
    rng: StdRng,
}

impl RandomIndexSource {
    /// Seed from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomIndexSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl IndexSource for RandomIndexSource {
    fn next_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// `IndexSource` replaying a fixed script of draws
///
/// Each draw is taken modulo the queue length; the script repeats once
/// exhausted. Lets tests pin down exactly which indices shuffle sees.
#[derive(Debug, Clone)]
pub struct ScriptedIndexSource {
    script: Vec<usize>,
    cursor: usize,
}

impl ScriptedIndexSource {
    /// Create a source replaying `script` (must not be empty)
    pub fn new(script: Vec<usize>) -> Self {
        assert!(!script.is_empty(), "index script must not be empty");
        Self { script, cursor: 0 }
    }

    /// Number of draws taken so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl IndexSource for ScriptedIndexSource {
    fn next_index(&mut self, len: usize) -> usize {
        let value = self.script[self.cursor % self.script.len()];
        self.cursor += 1;
        value % len
    }
}

/// Pick the next shuffled index
///
/// `current` is the queue position of the playing track, if it is queued.
/// With more than one entry the draw is repeated until it differs from
/// `current`. A source that only ever yields `current` never terminates.
pub fn pick_shuffle_index(
    source: &mut dyn IndexSource,
    len: usize,
    current: Option<usize>,
) -> usize {
    debug_assert!(len > 0, "shuffle over an empty queue");

    let mut next = source.next_index(len) % len;
    if len > 1 {
        while Some(next) == current {
            next = source.next_index(len) % len;
        }
    }
    next
}
