//! Public facade over the mirror pool: search, stream resolution, album
//! lookup.
//!
//! Each method is one invocation. Search and stream resolution race
//! several mirrors and take the first usable response; album lookup walks
//! the pool sequentially. A newer call of the same kind supersedes the
//! older one: its pending attempts are cancelled and its outcome is
//! dropped silently.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::coordinator::{AttemptOutcome, Coordinator, OperationKind};
use crate::decode::{decode_album, decode_search, decode_stream_url};
use crate::endpoints::EndpointPool;
use crate::error::ClientError;
use crate::models::{AlbumObject, Outcome, Track};
use crate::transport::{HttpTransport, Transport};

pub struct HifiClient {
    config: ClientConfig,
    pool: Arc<Mutex<EndpointPool>>,
    coordinator: Coordinator,
    live_search: Mutex<CancellationToken>,
    live_stream: Mutex<CancellationToken>,
    live_album: Mutex<CancellationToken>,
}

impl HifiClient {
    /// Client against the production mirror list.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let transport =
            HttpTransport::new(Duration::from_secs(config.request_timeout_secs))
                .map_err(ClientError::from)?;
        Ok(Self::with_transport(
            config,
            Arc::new(transport),
            EndpointPool::with_default_mirrors(),
        ))
    }

    /// Client with an explicit transport and pool. This is the seam the
    /// tests use; production callers want [`HifiClient::new`].
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        pool: EndpointPool,
    ) -> Self {
        let pool = Arc::new(Mutex::new(pool));
        Self {
            config,
            coordinator: Coordinator::new(transport, Arc::clone(&pool)),
            pool,
            live_search: Mutex::new(CancellationToken::new()),
            live_stream: Mutex::new(CancellationToken::new()),
            live_album: Mutex::new(CancellationToken::new()),
        }
    }

    /// Search the catalog. Resolves `Empty` when every mirror answered
    /// with a valid no-result envelope.
    pub async fn search(&self, query: &str) -> Outcome<Vec<Track>> {
        let cancel = self.begin(OperationKind::Search);
        let path = format!("/search/?s={}", urlencoding::encode(query));
        self.coordinator
            .race(
                OperationKind::Search,
                &path,
                self.config.race_width,
                classify_search,
                cancel,
            )
            .await
    }

    /// Resolve the playback URL for a track.
    pub async fn track_stream_url(&self, track_id: u64) -> Outcome<String> {
        let cancel = self.begin(OperationKind::TrackStream);
        let path = format!("/track/?id={}&quality=LOSSLESS", track_id);
        self.coordinator
            .race(
                OperationKind::TrackStream,
                &path,
                self.config.race_width,
                classify_stream,
                cancel,
            )
            .await
    }

    /// Look up an album, passing the response object through verbatim.
    /// Walks the pool head-first, rotating on failure, at most one full
    /// cycle.
    pub async fn album(&self, album_id: u64) -> Outcome<AlbumObject> {
        let cancel = self.begin(OperationKind::Album);
        let path = format!("/album/?id={}", album_id);
        self.coordinator
            .sequential(OperationKind::Album, &path, classify_album, cancel)
            .await
    }

    /// Base URL currently at the rotation cursor.
    pub fn current_endpoint(&self) -> String {
        self.lock_pool().head().to_string()
    }

    pub fn cursor(&self) -> usize {
        self.lock_pool().cursor()
    }

    fn lock_pool(&self) -> std::sync::MutexGuard<'_, EndpointPool> {
        self.pool.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Install a fresh cancellation token for `kind`, cancelling the
    /// previous invocation of the same kind if it is still pending.
    fn begin(&self, kind: OperationKind) -> CancellationToken {
        let slot = match kind {
            OperationKind::Search => &self.live_search,
            OperationKind::TrackStream => &self.live_stream,
            OperationKind::Album => &self.live_album,
        };
        let mut live = slot.lock().unwrap_or_else(PoisonError::into_inner);
        live.cancel();
        let fresh = CancellationToken::new();
        *live = fresh.clone();
        fresh
    }
}

fn classify_search(body: &[u8]) -> AttemptOutcome<Vec<Track>> {
    match decode_search(body) {
        Ok(tracks) if tracks.is_empty() => AttemptOutcome::Empty,
        Ok(tracks) => AttemptOutcome::Success(tracks),
        Err(err) => AttemptOutcome::Failed(err.into()),
    }
}

fn classify_stream(body: &[u8]) -> AttemptOutcome<String> {
    match decode_stream_url(body) {
        Ok(url) => AttemptOutcome::Success(url),
        Err(err) => AttemptOutcome::Failed(err.into()),
    }
}

fn classify_album(body: &[u8]) -> AttemptOutcome<AlbumObject> {
    match decode_album(body) {
        Ok(album) => AttemptOutcome::Success(album),
        Err(err) => AttemptOutcome::Failed(err.into()),
    }
}
