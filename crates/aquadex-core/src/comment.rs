//! Visitor comments on an aquarium.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{Error, Result};

pub const MAX_COMMENT_CHARS: usize = 5000;

/// A comment left on an aquarium. Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
  pub id:          i64,
  pub aquarium_id: i64,
  pub author_id:   i64,
  pub author_name: String,
  pub content:     String,
  /// Server-assigned.
  pub sent_at:     DateTime<Utc>,
}

/// Trim and length-check comment text.
pub fn validate_comment(content: &str) -> Result<String> {
  let content = content.trim();
  if content.is_empty() || content.chars().count() > MAX_COMMENT_CHARS {
    return Err(Error::validation(format!(
      "comment is required and must be {MAX_COMMENT_CHARS} characters or less"
    )));
  }
  Ok(content.to_owned())
}
