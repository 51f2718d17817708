mod builder;
mod device;
mod executor;
mod host;

pub use builder::ExecutorBuilder;
pub use device::{Accelerator, DeviceExec};
pub use executor::Executor;
pub use host::HostExec;
