mod index;
mod matrix;

pub use index::Interactions;
pub use matrix::InteractionMatrix;
