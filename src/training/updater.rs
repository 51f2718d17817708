use rayon::prelude::*;

use super::kernel::sgd_step;
use crate::{
    interactions::Interactions,
    sampling::Sampler,
    storage::{FactorStore, WildFactors},
};

/// Runs asynchronous ("Hogwild") SGD epochs over an interaction index.
///
/// Workers share the factor matrices without any synchronization, only the amount
/// of correctly ranked samples is reduced once every worker is done.
#[derive(Debug, Clone, Copy)]
pub struct Updater<'a> {
    index: &'a Interactions,
    learning_rate: f32,
    regularization: f32,
}

impl<'a> Updater<'a> {
    /// Creates a new `Updater`.
    ///
    /// # Arguments
    /// * `index` - The interactions to sample from.
    /// * `learning_rate` - The SGD step size.
    /// * `regularization` - The L2 penalty applied to every updated entry.
    pub fn new(index: &'a Interactions, learning_rate: f32, regularization: f32) -> Self {
        Self {
            index,
            learning_rate,
            regularization,
        }
    }

    /// Runs one epoch of N samples, split in contiguous blocks between the samplers.
    ///
    /// Runs on the rayon pool it's called from, one task per sampler.
    ///
    /// # Arguments
    /// * `store` - The factor matrices, updated in place.
    /// * `samplers` - One sampler per worker.
    ///
    /// # Returns
    /// How many samples were ranked correctly before their update.
    pub fn epoch<S>(&self, store: &mut FactorStore, samplers: &mut [S]) -> usize
    where
        S: Sampler + Send,
    {
        let &Self {
            index,
            learning_rate: lr,
            regularization: reg,
        } = self;

        let n = index.len();
        let workers = samplers.len();
        let factors = WildFactors::new(store);

        samplers
            .par_iter_mut()
            .with_max_len(1)
            .enumerate()
            .map(|(worker, sampler)| {
                (0..block_len(n, workers, worker))
                    .filter(|_| sgd_step(index, &factors, sampler, lr, reg))
                    .count()
            })
            .sum()
    }
}

/// Returns how many of the `n` sample positions `worker` processes.
///
/// The first `n % workers` workers take one extra position.
pub fn block_len(n: usize, workers: usize, worker: usize) -> usize {
    n / workers + usize::from(worker < n % workers)
}
