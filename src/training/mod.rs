mod kernel;
mod updater;

pub use kernel::{ranking_coefficient, sgd_step, update_rows};
pub use updater::{Updater, block_len};
