use rand::{
    Rng, SeedableRng,
    distr::{Distribution, Uniform},
    rngs::StdRng,
};

use crate::error::{BprErr, Result};

/// Draws sample positions of the interaction index.
///
/// Each worker owns its `Sampler`, they are never shared between threads.
pub trait Sampler {
    /// Should return a position in `[0, N)`.
    fn sample(&mut self) -> usize;
}

/// A generator paired with a uniform integer distribution over `[0, N)`.
#[derive(Debug, Clone)]
pub struct UniformSampler<R: Rng = StdRng> {
    rng: R,
    positions: Uniform<usize>,
}

impl<R: Rng> UniformSampler<R> {
    /// Creates a new `UniformSampler`.
    ///
    /// # Arguments
    /// * `rng` - The worker's random number generator.
    /// * `n` - The amount of sample positions, N.
    ///
    /// # Returns
    /// An `EmptyInteractions` error if `n` is zero.
    pub fn new(rng: R, n: usize) -> Result<Self> {
        let positions = Uniform::new(0, n).map_err(|_| BprErr::EmptyInteractions)?;
        Ok(Self { rng, positions })
    }
}

impl UniformSampler<StdRng> {
    /// Creates a new `UniformSampler` from a seed.
    pub fn seeded(seed: u64, n: usize) -> Result<Self> {
        Self::new(StdRng::seed_from_u64(seed), n)
    }
}

impl<R: Rng> Sampler for UniformSampler<R> {
    #[inline]
    fn sample(&mut self) -> usize {
        self.positions.sample(&mut self.rng)
    }
}
