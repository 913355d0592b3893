//! Sleep command handler

use anyhow::Result;
use async_trait::async_trait;
use clap::{value_parser, Arg};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use subcmdutil_shared::{Args, CancelableCommand, Command, Context, ExitStatus, FlagSet, Flags};
use tracing::{info, warn};

/// Configuration for the sleep command
#[derive(Debug, Clone)]
pub struct SleepConfig {
    /// How long to sleep when `--duration-ms` is not given
    pub default_duration: Duration,
}

impl Default for SleepConfig {
    fn default() -> Self {
        Self {
            default_duration: Duration::from_secs(1),
        }
    }
}

/// Sleeps without looking at its context, so only the executor can cut it short
pub struct SleepCommand {
    config: SleepConfig,
    disposed: AtomicBool,
}

impl SleepCommand {
    pub fn new(config: SleepConfig) -> Self {
        Self {
            config,
            disposed: AtomicBool::new(false),
        }
    }

    /// Whether `dispose` has been called
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    fn duration(&self, flags: &Flags) -> Duration {
        flags
            .try_get_one::<u64>("duration-ms")
            .ok()
            .flatten()
            .map(|ms| Duration::from_millis(*ms))
            .unwrap_or(self.config.default_duration)
    }
}

impl Default for SleepCommand {
    fn default() -> Self {
        Self::new(SleepConfig::default())
    }
}

#[async_trait]
impl Command for SleepCommand {
    fn name(&self) -> &str {
        "sleep"
    }

    fn synopsis(&self) -> &str {
        "Sleep for a while, ignoring cancellation"
    }

    fn usage(&self) -> &str {
        "sleep [--duration-ms <ms>]"
    }

    fn set_flags(&self, flags: FlagSet) -> FlagSet {
        flags.arg(
            Arg::new("duration-ms")
                .long("duration-ms")
                .value_name("MS")
                .value_parser(value_parser!(u64))
                .help("Milliseconds to sleep"),
        )
    }

    async fn execute(&self, _ctx: Context, flags: Flags, _args: Args) -> ExitStatus {
        let duration = self.duration(&flags);
        info!("  [SLEEP] Sleeping for {:?}", duration);

        tokio::time::sleep(duration).await;

        if self.is_disposed() {
            warn!("  [SLEEP] Woke up after being disposed");
        } else {
            info!("  [SLEEP] Done");
        }
        ExitStatus::Success
    }
}

#[async_trait]
impl CancelableCommand for SleepCommand {
    async fn dispose(&self) -> Result<()> {
        info!("  [SLEEP] Disposing");
        self.disposed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
