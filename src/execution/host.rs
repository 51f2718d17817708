use std::num::NonZeroUsize;

use log::debug;
use rand::Rng;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::Executor;
use crate::{
    error::Result,
    interactions::Interactions,
    sampling::RngPool,
    storage::FactorStore,
    training::Updater,
};

/// Trains on the host with `W` lock-free workers.
///
/// The worker pool and the samplers live as long as the training call, so each
/// worker keeps its own random stream across epochs.
pub struct HostExec<'a> {
    updater: Updater<'a>,
    store: &'a mut FactorStore,
    samplers: RngPool,
    pool: ThreadPool,
    workers: NonZeroUsize,
}

impl<'a> HostExec<'a> {
    /// Creates a new `HostExec`.
    ///
    /// # Arguments
    /// * `index` - The interactions to sample from.
    /// * `store` - The factor matrices, updated in place.
    /// * `learning_rate` - The SGD step size.
    /// * `regularization` - The L2 penalty.
    /// * `workers` - The amount of workers, W.
    /// * `seeds` - The generator every worker seed is drawn from.
    ///
    /// # Returns
    /// A new `HostExec` or an error if the worker pool couldn't be spawned.
    pub fn new<R: Rng>(
        index: &'a Interactions,
        store: &'a mut FactorStore,
        learning_rate: f32,
        regularization: f32,
        workers: NonZeroUsize,
        seeds: &mut R,
    ) -> Result<Self> {
        let samplers = RngPool::new(workers, index.len(), seeds)?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers.get())
            .thread_name(|i| format!("bpr-worker-{i}"))
            .build()?;

        debug!(workers = workers.get(), samples = index.len(); "spawned host workers");

        Ok(Self {
            updater: Updater::new(index, learning_rate, regularization),
            store,
            samplers,
            pool,
            workers,
        })
    }
}

impl Executor for HostExec<'_> {
    fn name(&self) -> &str {
        "host"
    }

    fn workers(&self) -> Option<NonZeroUsize> {
        Some(self.workers)
    }

    fn epoch(&mut self) -> Result<usize> {
        let Self {
            updater,
            store,
            samplers,
            pool,
            ..
        } = self;

        let correct = pool.install(|| updater.epoch(store, samplers.samplers_mut()));
        Ok(correct)
    }

    fn finish(self: Box<Self>) -> Result<()> {
        // the workers already wrote into the caller's store
        Ok(())
    }
}
