mod store;
mod wild;

pub use store::FactorStore;
pub use wild::WildFactors;
