use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Uniform random choices used by the prompt generator.
///
/// Injected rather than pulled from a global so rounds can be replayed
/// deterministically in tests.
pub trait RandomSource {
    /// Uniform index in `0..len`. Callers guarantee `len > 0`.
    fn pick(&mut self, len: usize) -> usize;

    /// `true` with the given probability.
    fn chance(&mut self, probability: f64) -> bool;
}

/// Adapter from any `rand` generator
#[derive(Debug, Clone)]
pub struct RngSource<R: Rng>(pub R);

impl RngSource<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn pick(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.0.gen_bool(probability.clamp(0.0, 1.0))
    }
}

/// Replays a fixed script of choices.
///
/// Picks wrap around `len`; once a script runs dry, picks return 0 and
/// chances return `true`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    picks: VecDeque<usize>,
    chances: VecDeque<bool>,
}

impl ScriptedSource {
    pub fn new(
        picks: impl IntoIterator<Item = usize>,
        chances: impl IntoIterator<Item = bool>,
    ) -> Self {
        Self {
            picks: picks.into_iter().collect(),
            chances: chances.into_iter().collect(),
        }
    }
}

impl RandomSource for ScriptedSource {
    fn pick(&mut self, len: usize) -> usize {
        self.picks.pop_front().map_or(0, |p| p % len.max(1))
    }

    fn chance(&mut self, _probability: f64) -> bool {
        self.chances.pop_front().unwrap_or(true)
    }
}
