use std::time::{Duration, Instant};

use log::{debug, info};
use ndarray::Array2;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    error::{BprErr, Result},
    execution::{Accelerator, ExecutorBuilder},
    initialization::{RandParamGen, init_factors, trainable_params},
    interactions::{InteractionMatrix, Interactions},
    specs::{InitSpec, TrainingSpec},
    storage::FactorStore,
};

/// The outcome of a single training epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochReport {
    /// The epoch number, starting at 1.
    pub epoch: usize,
    /// How many samples were ranked correctly before their update.
    pub correct: usize,
    /// How many samples the epoch processed, N.
    pub samples: usize,
    pub elapsed: Duration,
}

impl EpochReport {
    /// Returns the fraction of correctly ranked samples.
    pub fn accuracy(&self) -> f32 {
        self.correct as f32 / self.samples as f32
    }
}

/// A Bayesian personalized ranking model.
///
/// The factor matrices live across `fit` calls, a later call keeps training them as
/// long as the interaction matrix has the same shape.
pub struct Bpr {
    spec: TrainingSpec,
    store: Option<FactorStore>,
    accelerator: Option<Box<dyn Accelerator>>,
}

impl Bpr {
    /// Creates a new untrained `Bpr` model.
    pub fn new(spec: TrainingSpec) -> Self {
        Self {
            spec,
            store: None,
            accelerator: None,
        }
    }

    /// Creates a new `Bpr` model starting from caller supplied factors.
    ///
    /// # Arguments
    /// * `spec` - The training configuration.
    /// * `user` - The user factors, `users x (K + 1)`.
    /// * `item` - The item factors, `items x (K + 1)`.
    ///
    /// # Returns
    /// The model or a `ShapeMismatch` if the matrices disagree with each other or with
    /// `spec.factors`.
    pub fn with_factors(spec: TrainingSpec, user: Array2<f32>, item: Array2<f32>) -> Result<Self> {
        let store = FactorStore::from_arrays(user, item)?;
        store.verify(store.n_users(), store.n_items(), spec.factors.get())?;

        Ok(Self {
            spec,
            store: Some(store),
            accelerator: None,
        })
    }

    /// Registers the device used when `use_gpu` is set.
    pub fn with_accelerator<A: Accelerator + 'static>(mut self, accelerator: A) -> Self {
        self.accelerator = Some(Box::new(accelerator));
        self
    }

    pub fn spec(&self) -> &TrainingSpec {
        &self.spec
    }

    /// Returns the trained factors, `None` before the first successful `fit`.
    pub fn factors(&self) -> Option<&FactorStore> {
        self.store.as_ref()
    }

    pub fn into_factors(self) -> Option<FactorStore> {
        self.store
    }

    /// Trains the model for `spec.iterations` epochs.
    ///
    /// # Arguments
    /// * `matrix` - The interactions, row is the item and column is the user.
    ///
    /// # Returns
    /// One report per epoch or the first error found.
    pub fn fit<T>(&mut self, matrix: &InteractionMatrix<T>) -> Result<Vec<EpochReport>>
    where
        T: Copy + PartialEq + Default,
    {
        self.fit_with(matrix, |_| {})
    }

    /// Trains the model for `spec.iterations` epochs, calling `on_epoch` after each of them.
    ///
    /// Training runs on a working copy of the factors, the model only keeps it once every
    /// epoch succeeded and the backend handed it back. A failed call leaves the model as it was.
    ///
    /// # Arguments
    /// * `matrix` - The interactions, row is the item and column is the user.
    /// * `on_epoch` - The observer of every epoch's outcome.
    ///
    /// # Returns
    /// One report per epoch or the first error found.
    pub fn fit_with<T, F>(
        &mut self,
        matrix: &InteractionMatrix<T>,
        mut on_epoch: F,
    ) -> Result<Vec<EpochReport>>
    where
        T: Copy + PartialEq + Default,
        F: FnMut(&EpochReport),
    {
        let Self {
            spec,
            store,
            accelerator,
        } = self;

        spec.validate()?;
        if spec.use_gpu && accelerator.is_none() {
            return Err(BprErr::DeviceUnavailable);
        }

        let index = Interactions::from_matrix(matrix)?;
        if index.is_empty() {
            return Err(BprErr::EmptyInteractions);
        }

        let factors = spec.factors.get();
        let mut rng = generate_rng(spec.seed);

        let mut working = match store {
            Some(store) => {
                store.verify(index.n_users(), index.n_items(), factors)?;
                store.clone()
            }
            None => init_store(spec, &index, &mut rng)?,
        };

        let mut executor = ExecutorBuilder::new(spec).build(
            &index,
            &mut working,
            accelerator.as_deref_mut(),
            &mut rng,
        )?;

        info!(
            users = index.n_users(),
            items = index.n_items(),
            interactions = index.len(),
            factors = factors,
            learning_rate = spec.learning_rate,
            regularization = spec.regularization,
            backend = executor.name();
            "starting training"
        );
        if let Some(workers) = executor.workers() {
            info!(threads = workers.get(); "training on the host");
        }

        let start = Instant::now();
        let epochs = spec.iterations.get();
        let mut reports = Vec::with_capacity(epochs);

        for epoch in 1..=epochs {
            let epoch_start = Instant::now();
            let correct = executor.epoch()?;

            let report = EpochReport {
                epoch,
                correct,
                samples: index.len(),
                elapsed: epoch_start.elapsed(),
            };

            debug!(
                epoch = epoch,
                correct = correct,
                elapsed_ms = report.elapsed.as_millis() as u64;
                "finished epoch"
            );

            on_epoch(&report);
            reports.push(report);
        }

        executor.finish()?;
        *store = Some(working);
        info!("training finished in {:.3}s", start.elapsed().as_secs_f64());

        Ok(reports)
    }
}

/// Generates the training call's master random number generator.
///
/// # Arguments
/// * `seed` - An optional seed for the rng.
fn generate_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Builds the initial factors of `index` following `spec.init`.
fn init_store<R: Rng>(
    spec: &TrainingSpec,
    index: &Interactions,
    rng: &mut R,
) -> Result<FactorStore> {
    let factors = spec.factors.get();
    let limit = trainable_params(index, factors);

    let store = match spec.init {
        InitSpec::Uniform { scale } => {
            let scale = scale.unwrap_or(1. / factors as f32);
            let mut param_gen = RandParamGen::centered(rng, limit, scale)?;
            init_factors(index, factors, &mut param_gen)
        }
        InitSpec::Normal { std_dev } => {
            let mut param_gen = RandParamGen::normal(rng, limit, 0., std_dev)?;
            init_factors(index, factors, &mut param_gen)
        }
    };

    Ok(store)
}
