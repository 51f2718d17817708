//! Bayesian personalized ranking trained with lock-free ("Hogwild") parallel SGD.
//!
//! The model factors an implicit feedback matrix into user and item factors, each
//! row carrying `K` latent dimensions plus a bias slot. Every epoch samples `N`
//! `(user, liked, disliked)` triples and updates their rows in place from `W`
//! workers without any locking.

pub mod error;
pub mod execution;
pub mod initialization;
pub mod interactions;
pub mod model;
pub mod sampling;
pub mod specs;
pub mod storage;
pub mod training;

pub use error::{BprErr, Result};
pub use interactions::{InteractionMatrix, Interactions};
pub use model::{Bpr, EpochReport};
pub use specs::{InitSpec, JobSpec, TrainingSpec};
pub use storage::FactorStore;
