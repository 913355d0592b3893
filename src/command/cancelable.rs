//! Cancelable executor - races a command against its context

use super::sink::{CancelSink, TracingSink};
use async_trait::async_trait;
use std::sync::Arc;
use subcmdutil_shared::{
    Args, CancelableCommand, Command, Context, ExitStatus, FlagSet, Flags,
};
use tokio::sync::oneshot;
use tracing::{debug, error};

/// Wraps a [`CancelableCommand`] so it is torn down if the execution context is
/// done before the command finishes
///
/// The executor masquerades as the wrapped command: name, usage, synopsis and
/// flags all come from it, so it can be registered anywhere a plain
/// [`Command`] is accepted.
///
/// ```ignore
/// commander.register(CancelableExecutor::new(SleepCommand::default()))?;
/// ```
pub struct CancelableExecutor<C: ?Sized> {
    sub: Arc<C>,
    sink: Arc<dyn CancelSink>,
}

impl<C: CancelableCommand + 'static> CancelableExecutor<C> {
    /// Wrap `sub`, reporting cancellations through `tracing`
    pub fn new(sub: C) -> Self {
        Self::from_arc(Arc::new(sub))
    }
}

impl<C: CancelableCommand + ?Sized + 'static> CancelableExecutor<C> {
    /// Wrap an already shared command
    pub fn from_arc(sub: Arc<C>) -> Self {
        Self {
            sub,
            sink: Arc::new(TracingSink),
        }
    }

    /// Report cancellations and dispose failures to `sink` instead
    pub fn with_sink(mut self, sink: impl CancelSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    /// The wrapped command
    pub fn inner(&self) -> &Arc<C> {
        &self.sub
    }
}

/// Wrap `sub` and erase it to a plain [`Command`]
pub fn cancelable<C: CancelableCommand + 'static>(sub: C) -> Box<dyn Command> {
    Box::new(CancelableExecutor::new(sub))
}

#[async_trait]
impl<C: CancelableCommand + ?Sized + 'static> Command for CancelableExecutor<C> {
    fn name(&self) -> &str {
        self.sub.name()
    }

    fn synopsis(&self) -> &str {
        self.sub.synopsis()
    }

    fn usage(&self) -> &str {
        self.sub.usage()
    }

    fn set_flags(&self, flags: FlagSet) -> FlagSet {
        self.sub.set_flags(flags)
    }

    /// Run the wrapped command on a background task
    ///
    /// If `ctx` is done first, the command is disposed, the reason is reported
    /// to the sink and [`ExitStatus::Failure`] is returned. The background
    /// task is not aborted; whatever it eventually returns is dropped.
    async fn execute(&self, ctx: Context, flags: Flags, args: Args) -> ExitStatus {
        let (status_tx, status_rx) = oneshot::channel();

        let sub = Arc::clone(&self.sub);
        let worker_ctx = ctx.clone();
        tokio::spawn(async move {
            let status = sub.execute(worker_ctx, flags, args).await;
            // Receiver is gone if cancellation already won
            let _ = status_tx.send(status);
        });

        tokio::select! {
            biased;

            reason = ctx.done() => {
                let name = self.sub.name();
                debug!("Context done before {} finished, disposing", name);

                if let Err(e) = self.sub.dispose().await {
                    self.sink.dispose_failed(name, &e);
                }
                self.sink.canceled(name, &reason);

                ExitStatus::Failure
            }

            status = status_rx => match status {
                Ok(status) => status,
                Err(_) => {
                    error!("Command {} stopped without an exit status", self.sub.name());
                    ExitStatus::Failure
                }
            },
        }
    }
}
