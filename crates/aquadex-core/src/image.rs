//! Aquarium photos and the main-image pointer.

use serde::Serialize;

use crate::{Error, Result};

/// Identifies an image and the aquarium it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageRef {
  pub id:          i64,
  pub aquarium_id: i64,
}

/// Image payload as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
  pub bytes: Vec<u8>,
  pub mime:  String,
}

impl ImageData {
  /// Accept a non-empty `image/*` payload of at most `max_bytes`.
  pub fn new(bytes: Vec<u8>, mime: &str, max_bytes: usize) -> Result<Self> {
    let mime = mime.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    if !mime.starts_with("image/") || mime.len() == "image/".len() {
      return Err(Error::validation(format!("unsupported image type {mime:?}")));
    }
    if bytes.is_empty() {
      return Err(Error::validation("image is empty"));
    }
    if bytes.len() > max_bytes {
      return Err(Error::validation(format!(
        "image is larger than {max_bytes} bytes"
      )));
    }
    Ok(Self { bytes, mime })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_images_and_strips_parameters() {
    let img = ImageData::new(vec![1, 2, 3], "Image/PNG; q=1", 10).unwrap();
    assert_eq!(img.mime, "image/png");
  }

  #[test]
  fn rejects_other_types_and_sizes() {
    assert!(ImageData::new(vec![1], "text/plain", 10).is_err());
    assert!(ImageData::new(vec![1], "image/", 10).is_err());
    assert!(ImageData::new(vec![], "image/png", 10).is_err());
    assert!(ImageData::new(vec![0; 11], "image/png", 10).is_err());
  }
}
