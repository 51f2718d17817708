mod pool;
mod sampler;

pub use pool::RngPool;
pub use sampler::{Sampler, UniformSampler};
