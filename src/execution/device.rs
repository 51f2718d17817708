use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::Executor;
use crate::{error::Result, interactions::Interactions, storage::FactorStore};

/// A compute device that can run whole training epochs on its own memory.
///
/// The device receives a copy of the interaction index and of the factors once per
/// training call, runs every epoch on its copies and hands the factors back at the end.
/// Each epoch must process the same amount of samples as the host path.
pub trait Accelerator: Send {
    /// The device's name, used for observability.
    fn name(&self) -> &str;

    /// Should copy the index and the factors into device memory.
    fn upload(&mut self, index: &Interactions, store: &FactorStore) -> Result<()>;

    /// Should run one epoch over the uploaded copies.
    ///
    /// # Arguments
    /// * `learning_rate` - The SGD step size.
    /// * `regularization` - The L2 penalty.
    /// * `seed` - A fresh seed for this epoch's random streams.
    ///
    /// # Returns
    /// How many samples were ranked correctly before their update.
    fn run_epoch(&mut self, learning_rate: f32, regularization: f32, seed: u64) -> Result<usize>;

    /// Should copy the trained factors back into `store`.
    fn download(&mut self, store: &mut FactorStore) -> Result<()>;
}

/// Trains on a registered `Accelerator`.
pub struct DeviceExec<'a> {
    accelerator: &'a mut (dyn Accelerator + 'static),
    store: &'a mut FactorStore,
    seeds: StdRng,
    learning_rate: f32,
    regularization: f32,
}

impl<'a> DeviceExec<'a> {
    /// Creates a new `DeviceExec`, uploading the index and the factors.
    ///
    /// # Arguments
    /// * `accelerator` - The device to train on.
    /// * `index` - The interactions to sample from.
    /// * `store` - The factor matrices, overwritten on `finish`.
    /// * `learning_rate` - The SGD step size.
    /// * `regularization` - The L2 penalty.
    /// * `seeds` - The generator the epoch seeds are derived from.
    ///
    /// # Returns
    /// A new `DeviceExec` or the device's upload error.
    pub fn new<R: Rng>(
        accelerator: &'a mut (dyn Accelerator + 'static),
        index: &Interactions,
        store: &'a mut FactorStore,
        learning_rate: f32,
        regularization: f32,
        seeds: &mut R,
    ) -> Result<Self> {
        accelerator.upload(index, store)?;
        debug!(device = accelerator.name(), samples = index.len(); "uploaded training state");

        Ok(Self {
            accelerator,
            store,
            seeds: StdRng::seed_from_u64(seeds.random()),
            learning_rate,
            regularization,
        })
    }
}

impl Executor for DeviceExec<'_> {
    fn name(&self) -> &str {
        self.accelerator.name()
    }

    fn epoch(&mut self) -> Result<usize> {
        let seed = self.seeds.random();
        self.accelerator
            .run_epoch(self.learning_rate, self.regularization, seed)
    }

    fn finish(self: Box<Self>) -> Result<()> {
        let Self {
            accelerator, store, ..
        } = *self;

        accelerator.download(store)?;
        debug!(device = accelerator.name(); "downloaded trained factors");
        Ok(())
    }
}
