//! Race-with-cancellation protocol over the endpoint pool.
//!
//! One invocation dispatches an attempt per selected endpoint and drains
//! completions as they land. The first successful decode wins and the
//! losing attempts are cancelled by dropping their futures, which aborts
//! the underlying requests. Per-attempt failures are absorbed; only a
//! fully failed set escalates, and that is the one moment the pool
//! rotates. A cancellation token models supersession: the facade cancels
//! it when a newer invocation of the same kind arrives.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use futures_util::stream::FuturesUnordered;
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::endpoints::EndpointPool;
use crate::error::ClientError;
use crate::models::Outcome;
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Search,
    TrackStream,
    Album,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Search => write!(f, "search"),
            OperationKind::TrackStream => write!(f, "track-stream"),
            OperationKind::Album => write!(f, "album"),
        }
    }
}

/// How one attempt's response classified: a usable payload, a valid
/// no-result response, or a transport/decode failure.
pub(crate) enum AttemptOutcome<T> {
    Success(T),
    Empty,
    Failed(ClientError),
}

pub(crate) struct Coordinator {
    transport: Arc<dyn Transport>,
    pool: Arc<Mutex<EndpointPool>>,
}

impl Coordinator {
    pub(crate) fn new(transport: Arc<dyn Transport>, pool: Arc<Mutex<EndpointPool>>) -> Self {
        Self { transport, pool }
    }

    fn pool(&self) -> std::sync::MutexGuard<'_, EndpointPool> {
        self.pool.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch `url` and classify the response. Never resolves the
    /// invocation by itself; the caller decides what the outcome means.
    async fn attempt<T, C>(
        &self,
        endpoint: String,
        url: String,
        classify: &C,
    ) -> (String, AttemptOutcome<T>)
    where
        C: Fn(&[u8]) -> AttemptOutcome<T>,
    {
        match self.transport.get(&url).await {
            Ok(body) => (endpoint, classify(&body)),
            Err(err) => (endpoint, AttemptOutcome::Failed(err.into())),
        }
    }

    /// Race `width` endpoints for one invocation, first success wins.
    ///
    /// All attempts failing rotates the pool exactly once; at least one
    /// valid-but-empty response resolves `Empty` with the cursor
    /// untouched.
    pub(crate) async fn race<T, C>(
        &self,
        kind: OperationKind,
        path: &str,
        width: usize,
        classify: C,
        cancel: CancellationToken,
    ) -> Outcome<T>
    where
        C: Fn(&[u8]) -> AttemptOutcome<T>,
    {
        // A zero width would resolve Empty without ever asking a mirror.
        let targets = self.pool().current(width.max(1));
        let mut attempts = FuturesUnordered::new();
        for endpoint in targets {
            let url = format!("{}{}", endpoint, path);
            attempts.push(self.attempt(endpoint, url, &classify));
        }
        debug!(%kind, width = attempts.len(), "dispatched racing attempts");

        let mut saw_empty = false;
        let mut last_err = None;
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(%kind, "invocation superseded, cancelling pending attempts");
                    return Outcome::Superseded;
                }
                completed = attempts.next() => match completed {
                    Some((endpoint, AttemptOutcome::Success(payload))) => {
                        debug!(%kind, %endpoint, "attempt won the race");
                        // Dropping the set aborts the losing requests.
                        return Outcome::Success(payload);
                    }
                    Some((endpoint, AttemptOutcome::Empty)) => {
                        debug!(%kind, %endpoint, "attempt returned no results");
                        saw_empty = true;
                    }
                    Some((endpoint, AttemptOutcome::Failed(err))) => {
                        warn!(%kind, %endpoint, %err, "attempt failed");
                        last_err = Some(err);
                    }
                    None => break,
                }
            }
        }

        match last_err {
            Some(err) if !saw_empty => {
                let new_head = self.pool().rotate().to_string();
                warn!(%kind, %new_head, "all endpoints failed, rotated pool");
                Outcome::Failed(err)
            }
            _ => Outcome::Empty,
        }
    }

    /// Sequential rotate-and-retry against the pool head, bounded to one
    /// full cycle. Used by the album path, which is not raced.
    pub(crate) async fn sequential<T, C>(
        &self,
        kind: OperationKind,
        path: &str,
        classify: C,
        cancel: CancellationToken,
    ) -> Outcome<T>
    where
        C: Fn(&[u8]) -> AttemptOutcome<T>,
    {
        let max_attempts = self.pool().len();
        let mut last_err = None;
        for attempt_no in 1..=max_attempts {
            let endpoint = self.pool().head().to_string();
            let url = format!("{}{}", endpoint, path);
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(%kind, "invocation superseded, cancelling pending attempt");
                    return Outcome::Superseded;
                }
                completed = self.attempt(endpoint.clone(), url, &classify) => completed.1,
            };
            match outcome {
                AttemptOutcome::Success(payload) => return Outcome::Success(payload),
                AttemptOutcome::Empty => return Outcome::Empty,
                AttemptOutcome::Failed(err) => {
                    let new_head = self.pool().rotate().to_string();
                    warn!(
                        %kind, %endpoint, %err, attempt_no, %new_head,
                        "attempt failed, rotated pool"
                    );
                    last_err = Some(err);
                }
            }
        }
        match last_err {
            Some(err) => Outcome::Failed(err),
            None => Outcome::Empty,
        }
    }
}
