//! Value types produced by the decoders, plus the per-invocation outcome.

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// A track record from the search envelope. The catalog is loose about
/// which fields it populates, so everything past the id is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub artist: Option<ArtistRef>,
    #[serde(default)]
    pub artists: Option<Vec<ArtistRef>>,
    #[serde(default)]
    pub album: Option<AlbumRef>,
}

impl Track {
    /// Primary artist name, falling back to the artists list.
    pub fn artist_name(&self) -> &str {
        if let Some(artist) = &self.artist {
            return &artist.name;
        }
        self.artists
            .as_deref()
            .and_then(|a| a.first())
            .map(|a| a.name.as_str())
            .unwrap_or("Unknown Artist")
    }

    pub fn album_title(&self) -> &str {
        self.album
            .as_ref()
            .map(|a| a.title.as_str())
            .unwrap_or("Unknown Album")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRef {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumRef {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub cover: Option<String>,
}

/// Album lookups pass the response object through verbatim; callers pick
/// the fields they care about.
pub type AlbumObject = serde_json::Map<String, serde_json::Value>;

/// Cover art URL for a catalog cover id (e.g. "abc123-def4-5678").
pub fn cover_url(cover_id: &str, size: u32) -> String {
    format!(
        "https://resources.tidal.com/images/{}/{}x{}.jpg",
        cover_id.replace('-', "/"),
        size,
        size
    )
}

/// Terminal outcome of one operation invocation. Delivered exactly once.
///
/// `Superseded` means a newer invocation of the same kind arrived while
/// this one was still racing; treat it as silence, not as an error.
#[derive(Debug)]
pub enum Outcome<T> {
    Success(T),
    Empty,
    Failed(ClientError),
    Superseded,
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Outcome::Superseded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_url_slashes_dashes() {
        assert_eq!(
            cover_url("abc123-def4-5678", 640),
            "https://resources.tidal.com/images/abc123/def4/5678/640x640.jpg"
        );
    }

    #[test]
    fn test_track_artist_fallbacks() {
        let track: Track = serde_json::from_value(serde_json::json!({
            "id": 7,
            "title": "Kind of Blue",
            "artists": [{"name": "Miles Davis"}]
        }))
        .unwrap();
        assert_eq!(track.artist_name(), "Miles Davis");
        assert_eq!(track.album_title(), "Unknown Album");

        let bare: Track = serde_json::from_value(serde_json::json!({"id": 1})).unwrap();
        assert_eq!(bare.artist_name(), "Unknown Artist");
    }
}
