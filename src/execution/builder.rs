use rand::Rng;

use super::{Accelerator, DeviceExec, Executor, HostExec};
use crate::{
    error::{BprErr, Result},
    interactions::Interactions,
    specs::TrainingSpec,
    storage::FactorStore,
};

/// Builds the `Executor` of a training call given its specification.
pub struct ExecutorBuilder<'s> {
    spec: &'s TrainingSpec,
}

impl<'s> ExecutorBuilder<'s> {
    /// Creates a new `ExecutorBuilder`.
    ///
    /// # Arguments
    /// * `spec` - The already validated training specification.
    pub fn new(spec: &'s TrainingSpec) -> Self {
        Self { spec }
    }

    /// Builds the executor selected by `spec.use_gpu`.
    ///
    /// # Arguments
    /// * `index` - The interactions to sample from.
    /// * `store` - The factor matrices to train.
    /// * `accelerator` - The registered device, if any.
    /// * `seeds` - The generator every worker or epoch seed is drawn from.
    ///
    /// # Returns
    /// A new executor, `DeviceUnavailable` if the device path was requested without an
    /// accelerator or the backend's own setup error.
    pub fn build<'a, R: Rng>(
        &self,
        index: &'a Interactions,
        store: &'a mut FactorStore,
        accelerator: Option<&'a mut (dyn Accelerator + 'static)>,
        seeds: &mut R,
    ) -> Result<Box<dyn Executor + 'a>> {
        if self.spec.use_gpu {
            let accelerator = accelerator.ok_or(BprErr::DeviceUnavailable)?;
            self.resolve_device(accelerator, index, store, seeds)
        } else {
            self.resolve_host(index, store, seeds)
        }
    }

    /// Resolves the multi-threaded host executor.
    fn resolve_host<'a, R: Rng>(
        &self,
        index: &'a Interactions,
        store: &'a mut FactorStore,
        seeds: &mut R,
    ) -> Result<Box<dyn Executor + 'a>> {
        let TrainingSpec {
            learning_rate,
            regularization,
            ..
        } = *self.spec;

        let workers = self.spec.threads()?;
        let exec = HostExec::new(index, store, learning_rate, regularization, workers, seeds)?;
        Ok(Box::new(exec))
    }

    /// Resolves the device offload executor.
    fn resolve_device<'a, R: Rng>(
        &self,
        accelerator: &'a mut (dyn Accelerator + 'static),
        index: &'a Interactions,
        store: &'a mut FactorStore,
        seeds: &mut R,
    ) -> Result<Box<dyn Executor + 'a>> {
        let TrainingSpec {
            learning_rate,
            regularization,
            ..
        } = *self.spec;

        let exec =
            DeviceExec::new(accelerator, index, store, learning_rate, regularization, seeds)?;
        Ok(Box::new(exec))
    }
}
