//! Command execution infrastructure
//!
//! This module handles:
//! - Racing a command's execution against its cancellation context
//! - Tearing the command down when the context wins
//! - Reporting cancellations to a pluggable sink
//! - The commands shipped with the `subcmdutil` binary

mod cancelable;
pub mod handlers;
mod sink;

pub use cancelable::{cancelable, CancelableExecutor};
pub use sink::{CancelSink, TracingSink};
