use std::{num::NonZeroUsize, thread};

use serde::{Deserialize, Serialize};

use crate::error::{BprErr, Result};

const DEFAULT_FACTORS: NonZeroUsize = NonZeroUsize::new(100).unwrap();
const DEFAULT_ITERATIONS: NonZeroUsize = NonZeroUsize::new(100).unwrap();

/// How the factor matrices are initialized on the first training call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InitSpec {
    /// Entries drawn from `U[-0.5, 0.5) * scale`, `scale` defaults to `1 / factors`.
    Uniform {
        #[serde(default)]
        scale: Option<f32>,
    },
    /// Entries drawn from `N(0, std_dev)`.
    Normal { std_dev: f32 },
}

impl Default for InitSpec {
    fn default() -> Self {
        Self::Uniform { scale: None }
    }
}

/// The configuration of a training call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingSpec {
    /// The amount of latent factors, the bias slot is added on top of these.
    pub factors: NonZeroUsize,
    pub learning_rate: f32,
    pub regularization: f32,
    /// The amount of epochs to run.
    pub iterations: NonZeroUsize,
    /// The amount of workers, `0` means the platform's concurrency degree.
    pub num_threads: usize,
    /// Whether to train on a registered accelerator instead of the host.
    pub use_gpu: bool,
    /// The seed for every random stream of the training call, `None` uses OS entropy.
    pub seed: Option<u64>,
    pub init: InitSpec,
}

impl Default for TrainingSpec {
    fn default() -> Self {
        Self {
            factors: DEFAULT_FACTORS,
            learning_rate: 0.01,
            regularization: 0.01,
            iterations: DEFAULT_ITERATIONS,
            num_threads: 0,
            use_gpu: false,
            seed: None,
            init: InitSpec::default(),
        }
    }
}

impl TrainingSpec {
    /// Checks every numeric parameter is inside its valid range.
    ///
    /// # Returns
    /// An `InvalidConfig` error naming the first offending parameter.
    pub fn validate(&self) -> Result<()> {
        let Self {
            learning_rate: lr,
            regularization: reg,
            ..
        } = *self;

        if !(lr.is_finite() && lr > 0.) {
            return Err(BprErr::InvalidConfig(format!(
                "the learning rate must be positive and finite, got {lr}"
            )));
        }

        if !(reg.is_finite() && reg >= 0.) {
            return Err(BprErr::InvalidConfig(format!(
                "the regularization must be non negative and finite, got {reg}"
            )));
        }

        match self.init {
            InitSpec::Uniform { scale: Some(scale) } if !(scale.is_finite() && scale > 0.) => {
                Err(BprErr::InvalidConfig(format!(
                    "the uniform init scale must be positive and finite, got {scale}"
                )))
            }
            InitSpec::Normal { std_dev } if !(std_dev.is_finite() && std_dev >= 0.) => {
                Err(BprErr::InvalidConfig(format!(
                    "the normal init standard deviation must be non negative and finite, got {std_dev}"
                )))
            }
            _ => Ok(()),
        }
    }

    /// Resolves the amount of workers for a training call.
    ///
    /// # Returns
    /// `num_threads` if set, otherwise the platform's available parallelism.
    pub fn threads(&self) -> Result<NonZeroUsize> {
        match NonZeroUsize::new(self.num_threads) {
            Some(threads) => Ok(threads),
            None => Ok(thread::available_parallelism()?),
        }
    }
}
