//! Cancellation context passed to every command execution
//!
//! A [`Context`] becomes done either because someone called
//! [`Context::cancel`] (on it or on an ancestor) or because its deadline
//! passed. Once done it stays done and reports a single [`CancelReason`].
//!
//! ```text
//! root ──child()──> ctx ──with_timeout(5s)──> ctx'
//!   cancel() on root  => ctx and ctx' done (Canceled)
//!   5s elapse         => ctx' done (DeadlineExceeded), ctx untouched
//! ```

use std::sync::{Arc, OnceLock};
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why a context is done
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    #[error("context canceled")]
    Canceled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Clonable cancellation signal with an optional deadline
///
/// Clones share state: cancelling one clone cancels them all.
#[derive(Clone)]
pub struct Context {
    inner: Arc<Inner>,
}

struct Inner {
    token: CancellationToken,
    done: OnceLock<Done>,
    deadline: Option<Instant>,
    parent: Option<Context>,
}

/// Why and when a context became done
#[derive(Debug, Clone, Copy)]
struct Done {
    reason: CancelReason,
    at: Instant,
}

impl Context {
    /// Create a root context that is only done once cancelled
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                token: CancellationToken::new(),
                done: OnceLock::new(),
                deadline: None,
                parent: None,
            }),
        }
    }

    /// Derive a context that is cancelled along with this one
    pub fn child(&self) -> Self {
        self.derive(self.inner.deadline)
    }

    /// Derive a context that expires at `deadline`, or earlier if this one does
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.inner.deadline {
            Some(parent) if parent < deadline => parent,
            _ => deadline,
        };
        self.derive(Some(deadline))
    }

    /// Derive a context that expires after `timeout`
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    fn derive(&self, deadline: Option<Instant>) -> Self {
        Self {
            inner: Arc::new(Inner {
                token: self.inner.token.child_token(),
                done: OnceLock::new(),
                deadline,
                parent: Some(self.clone()),
            }),
        }
    }

    /// Mark this context (and its children) as done
    ///
    /// Idempotent: the first reason recorded is kept.
    pub fn cancel(&self) {
        if self.state().is_some() {
            return;
        }
        self.inner.done.get_or_init(|| Done {
            reason: CancelReason::Canceled,
            at: Instant::now(),
        });
        self.inner.token.cancel();
    }

    /// Deadline after which this context is done, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Reason this context is done, or `None` while it is still live
    pub fn err(&self) -> Option<CancelReason> {
        self.state().map(|done| done.reason)
    }

    /// Wait until this context is done and return why
    pub async fn done(&self) -> CancelReason {
        match self.inner.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.inner.token.cancelled() => {}
                    _ = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => self.inner.token.cancelled().await,
        }
        self.err().unwrap_or(CancelReason::Canceled)
    }

    /// Recorded outcome, or the earlier of an expired deadline and the parent's
    /// outcome, recorded on first observation
    fn state(&self) -> Option<Done> {
        if let Some(done) = self.inner.done.get() {
            return Some(*done);
        }

        let expired = self
            .inner
            .deadline
            .filter(|deadline| Instant::now() >= *deadline)
            .map(|at| Done {
                reason: CancelReason::DeadlineExceeded,
                at,
            });
        let inherited = self.inner.parent.as_ref().and_then(Context::state);

        let done = match (expired, inherited) {
            (Some(expired), Some(inherited)) if inherited.at < expired.at => inherited,
            (Some(expired), _) => expired,
            (None, inherited) => inherited?,
        };

        let done = *self.inner.done.get_or_init(|| done);
        self.inner.token.cancel();
        Some(done)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("deadline", &self.inner.deadline)
            .field("err", &self.err())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_is_live() {
        let ctx = Context::new();
        assert!(!ctx.is_done());
        assert_eq!(ctx.err(), None);
        assert!(ctx.deadline().is_none());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let ctx = Context::new();
        ctx.cancel();
        ctx.cancel();
        assert_eq!(ctx.err(), Some(CancelReason::Canceled));
        assert_eq!(CancelReason::Canceled.to_string(), "context canceled");
    }

    #[test]
    fn test_cancel_propagates_to_children_only() {
        let root = Context::new();
        let child = root.child();
        let grandchild = child.child();

        child.cancel();
        assert!(child.is_done());
        assert!(grandchild.is_done());
        assert!(!root.is_done());

        let sibling = root.child();
        root.cancel();
        assert_eq!(sibling.err(), Some(CancelReason::Canceled));
    }

    #[test]
    fn test_clones_share_state() {
        let ctx = Context::new();
        let clone = ctx.clone();
        clone.cancel();
        assert!(ctx.is_done());
    }

    #[tokio::test]
    async fn test_done_resolves_after_cancel() {
        let ctx = Context::new();
        let waiter = ctx.clone();
        let handle = tokio::spawn(async move { waiter.done().await });

        ctx.cancel();
        let reason = handle.await.expect("waiter panicked");
        assert_eq!(reason, CancelReason::Canceled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_expires() {
        let ctx = Context::new().with_timeout(Duration::from_secs(5));
        assert!(!ctx.is_done());

        let reason = ctx.done().await;
        assert_eq!(reason, CancelReason::DeadlineExceeded);
        assert_eq!(ctx.err(), Some(CancelReason::DeadlineExceeded));
        assert_eq!(reason.to_string(), "context deadline exceeded");
    }

    #[tokio::test(start_paused = true)]
    async fn test_child_inherits_earlier_deadline() {
        let parent = Context::new().with_timeout(Duration::from_secs(1));
        let child = parent.with_timeout(Duration::from_secs(60));
        assert_eq!(child.deadline(), parent.deadline());

        assert_eq!(child.done().await, CancelReason::DeadlineExceeded);
        assert!(parent.is_done());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_deadline_beats_later_parent_cancel() {
        let root = Context::new();
        let child = root.with_timeout(Duration::from_secs(1));

        tokio::time::advance(Duration::from_secs(2)).await;
        root.cancel();

        assert_eq!(root.err(), Some(CancelReason::Canceled));
        assert_eq!(child.err(), Some(CancelReason::DeadlineExceeded));
        assert_eq!(child.done().await, CancelReason::DeadlineExceeded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_parent_cancel_beats_later_deadline() {
        let root = Context::new();
        let child = root.with_timeout(Duration::from_secs(1));

        root.cancel();
        tokio::time::advance(Duration::from_secs(2)).await;

        assert_eq!(child.err(), Some(CancelReason::Canceled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_deadline_keeps_deadline_reason() {
        let ctx = Context::new().with_timeout(Duration::from_secs(1));
        tokio::time::advance(Duration::from_secs(2)).await;

        ctx.cancel();
        assert_eq!(ctx.err(), Some(CancelReason::DeadlineExceeded));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_deadline_wins() {
        let ctx = Context::new().with_timeout(Duration::from_secs(5));
        ctx.cancel();
        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(ctx.done().await, CancelReason::Canceled);
    }
}
