//! subcmdutil shared types
//!
//! This crate provides the pieces every command and dispatcher agrees on:
//! the command capability traits, exit statuses, the argument list passed
//! through to commands, the cancellation [`Context`], and the [`Commander`]
//! that dispatches by name.

pub mod command;
pub mod commander;
pub mod context;

use std::any::Any;
use std::process::ExitCode;
use std::sync::Arc;

pub use command::{CancelableCommand, Command, FlagSet, Flags};
pub use commander::{Commander, CommanderConfig, DispatchError};
pub use context::{CancelReason, Context};

/// Outcome of a command execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitStatus {
    /// Command finished successfully
    Success,
    /// Command ran but failed
    Failure,
    /// Command was invoked incorrectly
    UsageError,
}

impl ExitStatus {
    /// Process exit code for this status
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
            ExitStatus::UsageError => 2,
        }
    }

    pub fn is_success(self) -> bool {
        self == ExitStatus::Success
    }
}

impl std::fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitStatus::Success => write!(f, "success"),
            ExitStatus::Failure => write!(f, "failure"),
            ExitStatus::UsageError => write!(f, "usage error"),
        }
    }
}

impl From<ExitStatus> for i32 {
    fn from(status: ExitStatus) -> Self {
        status.code()
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code() as u8)
    }
}

/// Extra values handed from the dispatcher to every command, untouched
///
/// Values are type-erased and shared, so cloning the list is cheap and a
/// command can look up what it needs by type.
#[derive(Clone, Default)]
pub struct Args(Vec<Arc<dyn Any + Send + Sync>>);

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value, builder style
    pub fn with<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.push(value);
        self
    }

    pub fn push<T: Any + Send + Sync>(&mut self, value: T) {
        self.0.push(Arc::new(value));
    }

    /// Value at `index`, if present and of type `T`
    pub fn get<T: Any>(&self, index: usize) -> Option<&T> {
        self.0.get(index).and_then(|v| v.downcast_ref::<T>())
    }

    /// First value of type `T`
    pub fn find<T: Any>(&self) -> Option<&T> {
        self.0.iter().find_map(|v| v.downcast_ref::<T>())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args").field("len", &self.0.len()).finish()
    }
}
