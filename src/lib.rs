//! Cancelable subcommands
//!
//! Wrap a [`CancelableCommand`](subcmdutil_shared::CancelableCommand) in a
//! [`CancelableExecutor`] and register it like any other command. When the
//! execution context is done first (interrupt, deadline), the command is
//! disposed and the dispatcher gets a failure status instead of waiting.

pub mod command;
pub mod shutdown;

pub use command::{cancelable, CancelSink, CancelableExecutor, TracingSink};
pub use subcmdutil_shared as shared;
