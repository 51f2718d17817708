mod dataset;
mod training;

pub use dataset::{DatasetSpec, JobSpec, TripletSpec};
pub use training::{InitSpec, TrainingSpec};
