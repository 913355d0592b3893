//! Where cancellation side effects are reported

use subcmdutil_shared::CancelReason;
use tracing::{error, warn};

/// Receives the side effects of a canceled execution
///
/// Nothing reported here reaches the dispatcher; the executor always returns
/// [`ExitStatus::Failure`](subcmdutil_shared::ExitStatus::Failure) once the
/// context wins.
pub trait CancelSink: Send + Sync {
    /// The context was done before `command` finished
    fn canceled(&self, command: &str, reason: &CancelReason);

    /// `command`'s dispose returned an error during cancellation
    fn dispose_failed(&self, command: &str, error: &anyhow::Error);
}

/// Logs through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl CancelSink for TracingSink {
    fn canceled(&self, command: &str, reason: &CancelReason) {
        warn!("Command {} canceled: {}", command, reason);
    }

    fn dispose_failed(&self, command: &str, error: &anyhow::Error) {
        error!("Failed to dispose command {}: {:#}", command, error);
    }
}

#[cfg(test)]
pub(crate) use memory::MemorySink;
