//! Pure decoders for the three response kinds the mirrors serve.
//!
//! The mirrors are inconsistent about envelopes, so each decoder accepts
//! every shape observed in the wild and nothing else. Decode failures are
//! per-attempt, the coordinator decides what they mean for the invocation.

use base64::{engine::general_purpose, Engine as _};
use serde_json::Value;

use crate::error::DecodeError;
use crate::models::{AlbumObject, Track};

/// Decode a search response.
///
/// Accepts `{"tracks":{"items":[...]}}` and `{"items":[...]}`. Any other
/// parsed shape is a legitimate "no results" envelope and yields an empty
/// list; only unparseable bytes are a decode error. Items that fail to
/// deserialize (no id) are skipped, source order is preserved.
pub fn decode_search(bytes: &[u8]) -> Result<Vec<Track>, DecodeError> {
    let root: Value = serde_json::from_slice(bytes)?;

    let items = root
        .get("tracks")
        .and_then(|t| t.get("items"))
        .and_then(Value::as_array)
        .or_else(|| root.get("items").and_then(Value::as_array));

    match items {
        Some(arr) => Ok(arr
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect()),
        None => Ok(Vec::new()),
    }
}

/// Decode a track-stream response into a playback URL.
///
/// The input is either a JSON array or a single object; each element may
/// carry a base64 `manifest` whose decoded JSON holds a `urls` array.
/// Every element with a non-empty `urls` array is a candidate and the
/// last one wins — later manifests overwrite earlier candidates during
/// the scan, even when the winning `urls[0]` stringifies to nothing.
pub fn decode_stream_url(bytes: &[u8]) -> Result<String, DecodeError> {
    let root: Value = serde_json::from_slice(bytes)?;

    let mut candidate = None;
    match &root {
        Value::Array(items) => {
            for item in items {
                if let Some(url) = manifest_url(item) {
                    candidate = Some(url);
                }
            }
        }
        obj @ Value::Object(_) => candidate = manifest_url(obj),
        _ => {}
    }

    match candidate {
        Some(url) if !url.is_empty() => Ok(url),
        _ => Err(DecodeError::NoStreamUrl),
    }
}

/// First entry of the `urls` array inside a base64 `manifest` field, if
/// the whole chain decodes to a non-empty array. A non-string first
/// entry stringifies to "", which still counts as a candidate.
fn manifest_url(item: &Value) -> Option<String> {
    let manifest = item.get("manifest")?.as_str()?;
    let decoded = general_purpose::STANDARD.decode(manifest).ok()?;
    let inner: Value = serde_json::from_slice(&decoded).ok()?;
    let first = inner.get("urls")?.as_array()?.first()?;
    Some(first.as_str().unwrap_or_default().to_string())
}

/// Decode an album response: the JSON object is passed through verbatim.
pub fn decode_album(bytes: &[u8]) -> Result<AlbumObject, DecodeError> {
    let root: Value = serde_json::from_slice(bytes)?;
    match root {
        Value::Object(map) => Ok(map),
        _ => Err(DecodeError::NotAnObject),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;

    fn manifest(urls: &[&str]) -> String {
        let inner = serde_json::json!({ "urls": urls });
        general_purpose::STANDARD.encode(inner.to_string())
    }

    #[test]
    fn test_search_nested_envelope() {
        let body = br#"{"tracks":{"items":[{"id":7,"title":"Kind of Blue"},{"id":8,"title":"So What"}]}}"#;
        let tracks = decode_search(body).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].id, 7);
        assert_eq!(tracks[0].title, "Kind of Blue");
        assert_eq!(tracks[1].id, 8);
    }

    #[test]
    fn test_search_flat_envelope() {
        let body = br#"{"items":[{"id":42,"title":"Blue in Green"}]}"#;
        let tracks = decode_search(body).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, 42);
    }

    #[test]
    fn test_search_unknown_shape_is_empty_not_error() {
        let tracks = decode_search(br#"{"message":"nothing here"}"#).unwrap();
        assert!(tracks.is_empty());
        let tracks = decode_search(br#"[1,2,3]"#).unwrap();
        assert!(tracks.is_empty());
    }

    #[test]
    fn test_search_garbage_is_decode_error() {
        assert!(matches!(
            decode_search(b"<html>502 Bad Gateway</html>"),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn test_stream_single_object() {
        let body = serde_json::json!({ "manifest": manifest(&["https://cdn.example/a.flac"]) });
        let url = decode_stream_url(body.to_string().as_bytes()).unwrap();
        assert_eq!(url, "https://cdn.example/a.flac");
    }

    #[test]
    fn test_stream_array_last_manifest_wins() {
        let body = serde_json::json!([
            { "manifest": manifest(&["https://cdn.example/first.flac"]) },
            { "manifest": manifest(&["https://cdn.example/last.flac", "https://cdn.example/alt.flac"]) },
        ]);
        let url = decode_stream_url(body.to_string().as_bytes()).unwrap();
        assert_eq!(url, "https://cdn.example/last.flac");
    }

    #[test]
    fn test_stream_later_empty_manifest_does_not_clobber() {
        let body = serde_json::json!([
            { "manifest": manifest(&["https://cdn.example/keep.flac"]) },
            { "manifest": manifest(&[]) },
        ]);
        let url = decode_stream_url(body.to_string().as_bytes()).unwrap();
        assert_eq!(url, "https://cdn.example/keep.flac");
    }

    #[test]
    fn test_stream_blank_last_url_clobbers_earlier_candidate() {
        // A later manifest with a non-empty urls list overwrites the
        // earlier winner even when its first entry is blank; the decode
        // then fails because the winning candidate is empty.
        let body = serde_json::json!([
            { "manifest": manifest(&["https://cdn.example/good.flac"]) },
            { "manifest": manifest(&[""]) },
        ]);
        assert!(matches!(
            decode_stream_url(body.to_string().as_bytes()),
            Err(DecodeError::NoStreamUrl)
        ));
    }

    #[test]
    fn test_stream_non_string_last_url_clobbers_earlier_candidate() {
        let inner = serde_json::json!({ "urls": [42] });
        let non_string = general_purpose::STANDARD.encode(inner.to_string());
        let body = serde_json::json!([
            { "manifest": manifest(&["https://cdn.example/good.flac"]) },
            { "manifest": non_string },
        ]);
        assert!(matches!(
            decode_stream_url(body.to_string().as_bytes()),
            Err(DecodeError::NoStreamUrl)
        ));
    }

    #[test]
    fn test_stream_empty_urls_is_no_stream_url() {
        let body = serde_json::json!({ "manifest": manifest(&[]) });
        assert!(matches!(
            decode_stream_url(body.to_string().as_bytes()),
            Err(DecodeError::NoStreamUrl)
        ));
    }

    #[test]
    fn test_stream_bad_base64_is_no_stream_url() {
        let body = br#"{"manifest":"%%%not-base64%%%"}"#;
        assert!(matches!(
            decode_stream_url(body),
            Err(DecodeError::NoStreamUrl)
        ));
    }

    #[test]
    fn test_album_passthrough() {
        let body = br#"{"id":99,"title":"Kind of Blue","artist":{"name":"Miles Davis"}}"#;
        let album = decode_album(body).unwrap();
        assert_eq!(album.get("id").and_then(|v| v.as_u64()), Some(99));
        assert_eq!(
            album.get("title").and_then(|v| v.as_str()),
            Some("Kind of Blue")
        );
    }

    #[test]
    fn test_album_non_object_is_error() {
        assert!(matches!(
            decode_album(br#"[{"id":99}]"#),
            Err(DecodeError::NotAnObject)
        ));
        assert!(matches!(
            decode_album(b"not json"),
            Err(DecodeError::Json(_))
        ));
    }
}
