//! Error taxonomy for the mirror client.
//!
//! Transport and decode failures are per-attempt: the coordinator absorbs
//! them and only surfaces an error once every attempt of an invocation has
//! failed. An empty result is not an error and never lands here.

use thiserror::Error;

/// Connection, timeout, or non-2xx failure from a single attempt.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// A well-formed transport response whose content matched none of the
/// accepted shapes.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("response was not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not find stream URL in response")]
    NoStreamUrl,
    #[error("album response was not a JSON object")]
    NotAnObject,
}

/// Terminal error for one invocation, surfaced only after every attempt
/// in its racing set has failed.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("endpoint pool must contain at least one mirror")]
    EmptyPool,
}
