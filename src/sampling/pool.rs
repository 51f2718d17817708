use std::num::NonZeroUsize;

use rand::Rng;

use super::{Sampler, UniformSampler};
use crate::error::Result;

/// One independent sampler per worker.
///
/// The pool is created once per training call and never reseeded, each worker keeps
/// drawing from its own stream across epochs.
#[derive(Debug, Clone)]
pub struct RngPool<S: Sampler = UniformSampler> {
    samplers: Vec<S>,
}

impl RngPool<UniformSampler> {
    /// Creates a new `RngPool` with distinct seeds drawn from `seeds`.
    ///
    /// # Arguments
    /// * `workers` - The amount of workers, W.
    /// * `n` - The amount of sample positions, N.
    /// * `seeds` - The higher level generator the worker seeds are drawn from.
    ///
    /// # Returns
    /// A new pool or an `EmptyInteractions` error if `n` is zero.
    pub fn new<R: Rng>(workers: NonZeroUsize, n: usize, seeds: &mut R) -> Result<Self> {
        let mut drawn: Vec<u64> = Vec::with_capacity(workers.get());

        while drawn.len() < workers.get() {
            let seed = seeds.random();
            if !drawn.contains(&seed) {
                drawn.push(seed);
            }
        }

        let samplers = drawn
            .into_iter()
            .map(|seed| UniformSampler::seeded(seed, n))
            .collect::<Result<_>>()?;

        Ok(Self { samplers })
    }
}

impl<S: Sampler> RngPool<S> {
    /// Creates a new `RngPool` from already built samplers.
    ///
    /// # Returns
    /// `None` if `samplers` is empty.
    pub fn from_samplers(samplers: Vec<S>) -> Option<Self> {
        if samplers.is_empty() {
            return None;
        }

        Some(Self { samplers })
    }

    /// Returns the amount of workers, W.
    pub fn workers(&self) -> usize {
        self.samplers.len()
    }

    /// Hands out every worker's sampler.
    pub fn samplers_mut(&mut self) -> &mut [S] {
        &mut self.samplers
    }
}
