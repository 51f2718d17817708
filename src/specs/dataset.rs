use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use super::TrainingSpec;
use crate::{error::Result, interactions::InteractionMatrix};

/// Interactions laid out as coordinate triplets, row is the item and column is the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripletSpec {
    /// `(items, users)`.
    pub shape: (usize, usize),
    pub items: Vec<usize>,
    pub users: Vec<usize>,
    /// Entry values, only their presence matters. Every entry is `1.0` if missing.
    #[serde(default)]
    pub values: Option<Vec<f32>>,
}

impl TripletSpec {
    fn into_matrix(self) -> Result<InteractionMatrix<f32>> {
        let Self {
            shape,
            items,
            users,
            values,
        } = self;

        let values = values.unwrap_or_else(|| vec![1.; items.len()]);
        InteractionMatrix::from_triplets(shape, items, users, values)
    }
}

/// Where the binary reads its interactions from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DatasetSpec {
    Inline(TripletSpec),
    /// A json file holding a `TripletSpec`.
    Local { path: PathBuf },
}

impl DatasetSpec {
    /// Loads the interaction matrix described by this spec.
    ///
    /// # Returns
    /// The matrix, or an io, json or input error.
    pub fn load(self) -> Result<InteractionMatrix<f32>> {
        match self {
            Self::Inline(triplets) => triplets.into_matrix(),
            Self::Local { path } => {
                let raw = fs::read_to_string(path)?;
                let triplets: TripletSpec = serde_json::from_str(&raw)?;
                triplets.into_matrix()
            }
        }
    }
}

/// A full training job as read by the `bpr-train` binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    #[serde(default)]
    pub training: TrainingSpec,
    pub dataset: DatasetSpec,
}
