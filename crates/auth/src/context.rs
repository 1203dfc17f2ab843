//! Cooperative cancellation and deadlines for outbound requests.

use bedrock_types::ConnectionCause;
use std::{future::Future, time::Duration};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Operation context passed into every exchange.
///
/// Cloning shares the same cancellation state. Derived contexts
/// ([`child`](Self::child), [`with_timeout`](Self::with_timeout)) are cancelled
/// together with their parent, but cancelling a derived context leaves the
/// parent untouched.
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a context that cancels with `self`.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            cancel: self.cancel.child_token(),
            deadline: self.deadline,
        }
    }

    /// Derive a context that expires `timeout` from now.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derive a context that expires at `deadline`, or at the parent's
    /// deadline if that comes first.
    #[must_use]
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(parent) if parent < deadline => parent,
            _ => deadline,
        };
        Self {
            cancel: self.cancel.child_token(),
            deadline: Some(deadline),
        }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// `true` once cancelled or past the deadline.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.cancel.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// The underlying token, for wiring into other cancellation-aware code.
    #[must_use]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Drive `fut` until it completes or the context is done.
    ///
    /// When the context finishes first, `fut` is dropped without being polled
    /// again, which aborts any request it had in flight.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionCause::Cancelled`] or
    /// [`ConnectionCause::DeadlineExceeded`] if the context finished first.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, ConnectionCause> {
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(ConnectionCause::Cancelled),
            () = expired => Err(ConnectionCause::DeadlineExceeded),
            out = fut => Ok(out),
        }
    }
}

impl From<CancellationToken> for Context {
    fn from(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            deadline: None,
        }
    }
}
