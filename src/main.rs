use std::process::ExitCode;
use subcmdutil::command::handlers::{EchoCommand, SleepCommand, SleepConfig};
use subcmdutil::shutdown::ShutdownMonitor;
use subcmdutil::CancelableExecutor;
use subcmdutil_shared::{Args, Commander, CommanderConfig, Context, ExitStatus};

use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    match run().await {
        Ok(status) => status.into(),
        Err(e) => {
            error!("{:#}", e);
            ExitStatus::Failure.into()
        }
    }
}

async fn run() -> anyhow::Result<ExitStatus> {
    let config = CommanderConfig {
        about: "Run commands that can be interrupted with Ctrl-C".into(),
        version: Some(env!("CARGO_PKG_VERSION").into()),
        ..Default::default()
    };

    let mut commander = Commander::new(config);
    commander.register(CancelableExecutor::new(SleepCommand::new(
        SleepConfig::default(),
    )))?;
    commander.register(EchoCommand)?;
    debug!("Commands: {:?}", commander.command_names());

    // Interrupts cancel the context the running command is raced against
    let ctx = Context::new();
    let shutdown = ShutdownMonitor::new(ctx.clone()).start();

    let status = commander
        .execute(ctx, std::env::args_os(), Args::new())
        .await;

    shutdown.stop();
    Ok(status)
}
