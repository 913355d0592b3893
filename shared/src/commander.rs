//! Command dispatcher - registers commands and runs the one named on the command line

use std::ffi::OsString;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

use crate::{Args, Command, Context, ExitStatus, FlagSet};

/// Errors that can occur while registering or looking up commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Command already registered: {0}")]
    DuplicateCommand(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

/// Configuration for the top-level program
#[derive(Debug, Clone)]
pub struct CommanderConfig {
    /// Program name shown in help and errors
    pub name: String,
    /// One-line description of the program
    pub about: String,
    /// Version string, enables `--version` when set
    pub version: Option<String>,
}

impl Default for CommanderConfig {
    fn default() -> Self {
        Self {
            name: "subcmdutil".into(),
            about: String::new(),
            version: None,
        }
    }
}

/// Dispatches the command line to one registered command
pub struct Commander {
    config: CommanderConfig,
    /// Registered commands, in registration order
    commands: Vec<Arc<dyn Command>>,
}

impl Commander {
    /// Create a new commander with no commands
    pub fn new(config: CommanderConfig) -> Self {
        Self {
            config,
            commands: Vec::new(),
        }
    }

    /// Register a command under its own name
    pub fn register<C: Command + 'static>(&mut self, command: C) -> Result<(), DispatchError> {
        if self.lookup(command.name()).is_ok() {
            return Err(DispatchError::DuplicateCommand(command.name().to_string()));
        }

        debug!("Registered command: {}", command.name());
        self.commands.push(Arc::new(command));
        Ok(())
    }

    /// Find a registered command by name
    pub fn lookup(&self, name: &str) -> Result<&Arc<dyn Command>, DispatchError> {
        self.commands
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| DispatchError::UnknownCommand(name.to_string()))
    }

    /// Names of all registered commands
    pub fn command_names(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.name()).collect()
    }

    /// Build the full flag set: the program plus one subcommand per command
    pub fn flag_set(&self) -> FlagSet {
        let mut root = FlagSet::new(self.config.name.clone())
            .subcommand_required(true)
            .arg_required_else_help(true);

        if !self.config.about.is_empty() {
            root = root.about(self.config.about.clone());
        }
        if let Some(version) = &self.config.version {
            root = root.version(version.clone());
        }

        for command in &self.commands {
            let mut sub =
                FlagSet::new(command.name().to_string()).about(command.synopsis().to_string());
            if !command.usage().is_empty() {
                sub = sub.override_usage(command.usage().to_string());
            }
            root = root.subcommand(command.set_flags(sub));
        }

        root
    }

    /// Parse `argv` (program name first) and execute the selected command
    ///
    /// Help and version output count as success; anything clap rejects is a
    /// usage error.
    pub async fn execute<I, T>(&self, ctx: Context, argv: I, args: Args) -> ExitStatus
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = match self.flag_set().try_get_matches_from(argv) {
            Ok(matches) => matches,
            Err(e) => {
                let _ = e.print();
                return if e.use_stderr() {
                    ExitStatus::UsageError
                } else {
                    ExitStatus::Success
                };
            }
        };

        let Some((name, flags)) = matches.subcommand() else {
            return ExitStatus::UsageError;
        };

        let command = match self.lookup(name) {
            Ok(command) => command,
            Err(e) => {
                error!("{}", e);
                return ExitStatus::UsageError;
            }
        };

        debug!("Executing command: {}", name);
        let status = command.execute(ctx, flags.clone(), args).await;
        debug!("Command {} finished: {}", name, status);

        status
    }
}

impl Default for Commander {
    fn default() -> Self {
        Self::new(CommanderConfig::default())
    }
}
