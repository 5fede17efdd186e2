use ferrous_resolver_domain::ResolveError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Deadline and cancellation for one lookup call.
///
/// Everything a lookup spawns runs inside [`LookupContext::run`]; when the
/// deadline passes or the token fires, the in-flight futures are dropped
/// and their transaction ids are released.
#[derive(Debug, Clone, Default)]
pub struct LookupContext {
    deadline: Option<Instant>,
    cancel: CancellationToken,
}

impl LookupContext {
    /// No deadline, never cancelled unless the token is triggered.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Drives `fut` until it completes, the deadline passes or the context is
    /// cancelled, whichever comes first.
    pub async fn run<F, T>(&self, name: &str, fut: F) -> Result<T, ResolveError>
    where
        F: Future<Output = Result<T, ResolveError>>,
    {
        if self.cancel.is_cancelled() {
            return Err(ResolveError::Cancelled {
                name: name.to_string(),
            });
        }

        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ResolveError::Cancelled {
                name: name.to_string(),
            }),
            _ = expired => Err(ResolveError::Timeout {
                name: name.to_string(),
            }),
            result = fut => result,
        }
    }
}
