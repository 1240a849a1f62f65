//! Fixed pool of catalog mirrors with a rotation cursor.
//!
//! The pool never grows or shrinks at runtime; the cursor is the only
//! mutable state shared across invocations. Rotating `len()` times brings
//! the cursor back to where it started.

use crate::error::ClientError;

/// Mirror base URLs observed in production deployments of the hifi API.
pub const DEFAULT_MIRRORS: &[&str] = &[
    "https://katze.qqdl.site",
    "https://triton.squid.wtf",
    "https://zeus.squid.wtf",
    "https://phoenix.squid.wtf",
    "https://shiva.squid.wtf",
    "https://chaos.squid.wtf",
    "https://hund.qqdl.site",
    "https://wolf.qqdl.site",
    "https://hifi.prigoana.com",
];

#[derive(Debug, Clone)]
pub struct EndpointPool {
    endpoints: Vec<String>,
    cursor: usize,
}

impl EndpointPool {
    /// Build a pool from an ordered list of base URLs. An empty list is a
    /// configuration error, never a runtime state.
    pub fn new(endpoints: Vec<String>) -> Result<Self, ClientError> {
        if endpoints.is_empty() {
            return Err(ClientError::EmptyPool);
        }
        Ok(Self {
            endpoints,
            cursor: 0,
        })
    }

    /// Pool seeded with the production mirror list.
    pub fn with_default_mirrors() -> Self {
        Self {
            endpoints: DEFAULT_MIRRORS.iter().map(|s| s.to_string()).collect(),
            cursor: 0,
        }
    }

    /// The next `k` endpoints starting at the cursor, wrapping around the
    /// pool. `k` is capped at the pool length.
    pub fn current(&self, k: usize) -> Vec<String> {
        let k = k.min(self.endpoints.len());
        (0..k)
            .map(|i| self.endpoints[(self.cursor + i) % self.endpoints.len()].clone())
            .collect()
    }

    /// Base URL at the cursor.
    pub fn head(&self) -> &str {
        &self.endpoints[self.cursor]
    }

    /// Advance the cursor by one position, wrapping. Returns the new head
    /// for logging.
    pub fn rotate(&mut self) -> &str {
        self.cursor = (self.cursor + 1) % self.endpoints.len();
        self.head()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}
