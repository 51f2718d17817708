mod error;
mod factors;
mod param_gen;
mod random;

pub use error::{RandErr, Result};
pub use factors::{init_factors, trainable_params};
pub use param_gen::ParamGen;
pub use random::RandParamGen;
