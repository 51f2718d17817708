use std::num::NonZeroUsize;

use crate::error::Result;

/// Runs training epochs on one backend.
///
/// The host and device backends share this contract, an `Executor` borrows the
/// caller's factors for the whole training call and hands them back on `finish`.
pub trait Executor {
    /// The backend's name, used for observability.
    fn name(&self) -> &str;

    /// The amount of host workers, `None` if the epochs don't run on the host.
    fn workers(&self) -> Option<NonZeroUsize> {
        None
    }

    /// Should run one full epoch over the interaction index.
    ///
    /// # Returns
    /// How many samples were ranked correctly before their update.
    fn epoch(&mut self) -> Result<usize>;

    /// Should leave the trained factors in the caller's store.
    ///
    /// This is the last synchronization point of a training call.
    fn finish(self: Box<Self>) -> Result<()>;
}
