//! Command capability traits

use anyhow::Result;
use async_trait::async_trait;

use crate::{Args, Context, ExitStatus};

/// Builder a command registers its flags into
pub type FlagSet = clap::Command;

/// Parsed flags handed to [`Command::execute`]
pub type Flags = clap::ArgMatches;

/// A named subcommand that can be dispatched by a [`Commander`](crate::Commander)
#[async_trait]
pub trait Command: Send + Sync {
    /// Name used to select this command on the command line
    fn name(&self) -> &str;

    /// One-line description shown in the command list
    fn synopsis(&self) -> &str;

    /// Long usage text shown in the command's help
    fn usage(&self) -> &str;

    /// Add this command's flags to `flags` and return it
    fn set_flags(&self, flags: FlagSet) -> FlagSet;

    /// Run the command
    async fn execute(&self, ctx: Context, flags: Flags, args: Args) -> ExitStatus;
}

/// A command that can be torn down while it is still executing
#[async_trait]
pub trait CancelableCommand: Command {
    /// Gracefully stop whatever `execute` is doing
    async fn dispose(&self) -> Result<()>;
}

#[async_trait]
impl<T: Command + ?Sized> Command for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn synopsis(&self) -> &str {
        (**self).synopsis()
    }

    fn usage(&self) -> &str {
        (**self).usage()
    }

    fn set_flags(&self, flags: FlagSet) -> FlagSet {
        (**self).set_flags(flags)
    }

    async fn execute(&self, ctx: Context, flags: Flags, args: Args) -> ExitStatus {
        (**self).execute(ctx, flags, args).await
    }
}
