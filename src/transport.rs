//! Transport seam between the coordinator and the network.
//!
//! The coordinator only needs "GET this URL, give me bytes or an error",
//! and cancellation by dropping the future. Tests plug in an in-process
//! transport; production uses the reqwest-backed [`HttpTransport`].

use std::time::Duration;

use async_trait::async_trait;

use crate::error::TransportError;

#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<Vec<u8>, TransportError>;
}

/// reqwest-backed transport. One shared client, connect/read timeouts from
/// the configuration; cancellation rides on future drop.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::from)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(TransportError::from)?
            .error_for_status()
            .map_err(TransportError::from)?;
        let bytes = response.bytes().await.map_err(TransportError::from)?;
        Ok(bytes.to_vec())
    }
}
