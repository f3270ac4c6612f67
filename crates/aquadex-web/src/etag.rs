//! ETags for stored images.
//!
//! Images are immutable once uploaded, so the ETag is a SHA-256 hash of the
//! MIME type and bytes.

use sha2::{Digest, Sha256};

/// Quoted strong ETag for an image payload.
pub fn image_etag(mime: &str, bytes: &[u8]) -> String {
  let mut hasher = Sha256::new();
  hasher.update(mime.as_bytes());
  hasher.update([0]);
  hasher.update(bytes);
  format!("\"{}\"", hex::encode(hasher.finalize()))
}

/// `true` if an `If-None-Match` header value matches `etag`.
///
/// Accepts `*`, comma-separated lists, weak validators and bare (unquoted)
/// tags.
pub fn if_none_match(header: &str, etag: &str) -> bool {
  let wanted = etag.trim_matches('"');
  header.split(',').map(str::trim).any(|candidate| {
    candidate == "*"
      || candidate.trim_start_matches("W/").trim_matches('"') == wanted
  })
}
