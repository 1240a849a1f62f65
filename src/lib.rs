//! Client for a multi-mirrored hifi catalog API.
//!
//! The mirrors are individually unreliable but collectively available;
//! this crate hides that by racing operations across several mirrors,
//! taking the first usable response, and rotating the pool when a whole
//! racing set fails.

pub mod client;
pub mod config;
pub mod coordinator;
pub mod decode;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod transport;

pub use client::HifiClient;
pub use config::ClientConfig;
pub use coordinator::OperationKind;
pub use endpoints::EndpointPool;
pub use error::{ClientError, DecodeError, TransportError};
pub use models::{cover_url, AlbumObject, AlbumRef, ArtistRef, Outcome, Track};
pub use transport::{HttpTransport, Transport};
