//! Shutdown Monitor
//!
//! Runs a background task that waits for an interrupt and cancels the
//! execution context when it arrives. Once the context is done, a further
//! interrupt exits the process, so a teardown that hangs can still be stopped.

use std::future::Future;
use std::io;
use std::sync::Arc;
use subcmdutil_shared::Context;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Exit code used when a second interrupt forces the process down (128 + SIGINT)
pub const FORCED_EXIT_CODE: i32 = 130;

/// Cancels a context when the process is interrupted
pub struct ShutdownMonitor {
    ctx: Context,
    force_exit: Arc<dyn Fn() + Send + Sync>,
}

impl ShutdownMonitor {
    /// Create a monitor for `ctx`
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            force_exit: Arc::new(|| std::process::exit(FORCED_EXIT_CODE)),
        }
    }

    /// Run `force_exit` instead of exiting the process on a second interrupt
    pub fn on_force_exit(mut self, force_exit: impl Fn() + Send + Sync + 'static) -> Self {
        self.force_exit = Arc::new(force_exit);
        self
    }

    /// Start listening for Ctrl-C
    pub fn start(&self) -> ShutdownHandle {
        self.start_with(tokio::signal::ctrl_c)
    }

    /// Start listening for interrupts produced by `interrupt`
    ///
    /// `interrupt` is called once per interrupt to wait for.
    pub fn start_with<S, F>(&self, mut interrupt: S) -> ShutdownHandle
    where
        S: FnMut() -> F + Send + 'static,
        F: Future<Output = io::Result<()>> + Send + 'static,
    {
        let ctx = self.ctx.clone();
        let force_exit = Arc::clone(&self.force_exit);

        let task = tokio::spawn(async move {
            tokio::select! {
                result = interrupt() => match result {
                    Ok(()) => {
                        info!("[SHUTDOWN] Interrupt received, canceling");
                        ctx.cancel();
                    }
                    Err(e) => {
                        error!("[SHUTDOWN] Failed to listen for interrupt: {}", e);
                        return;
                    }
                },
                reason = ctx.done() => {
                    debug!("[SHUTDOWN] Context done ({})", reason);
                }
            }

            // The installed handler swallows interrupts from here on
            match interrupt().await {
                Ok(()) => {
                    warn!("[SHUTDOWN] Second interrupt received, exiting");
                    force_exit();
                }
                Err(e) => {
                    error!("[SHUTDOWN] Failed to listen for interrupt: {}", e);
                }
            }
        });

        ShutdownHandle { task }
    }
}

/// Handle to stop shutdown monitoring
pub struct ShutdownHandle {
    task: JoinHandle<()>,
}

impl ShutdownHandle {
    /// Stop listening; the context is left as it is
    pub fn stop(self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
