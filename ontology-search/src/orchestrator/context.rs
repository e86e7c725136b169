//! Request-scoped cancellation, deadline, and tracing span.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::Span;

/// State carried through every component call for one search request.
///
/// Cancelling the token or reaching the deadline stops all in-flight source
/// fetches; those sources then contribute no records.
#[derive(Debug, Clone)]
pub struct RequestContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
    span: Span,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestContext {
    /// A context with no deadline and a fresh cancellation token.
    pub fn new() -> Self {
        Self {
            cancel: CancellationToken::new(),
            deadline: None,
            span: tracing::info_span!("search_request"),
        }
    }

    /// Stop all fetches at `deadline`.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Stop all fetches `timeout` from now.
    ///
    /// A timeout too large to represent as an instant leaves the request
    /// without a deadline.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => {
                tracing::debug!(
                    timeout_secs = timeout.as_secs(),
                    "timeout out of range, no deadline set"
                );
                self
            }
        }
    }

    /// Use a caller-owned token, e.g. a child of a server shutdown token.
    pub fn with_cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Log under `span` instead of the default request span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// A handle that cancels this request when triggered.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Whether the request was cancelled or its deadline has passed.
    pub fn is_done(&self) -> bool {
        self.cancel.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Completes when the request is cancelled or its deadline passes.
    pub async fn done(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    () = self.cancel.cancelled() => {}
                    () = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => self.cancel.cancelled().await,
        }
    }
}
