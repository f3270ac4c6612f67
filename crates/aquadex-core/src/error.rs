//! Error types for `aquadex-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed or out-of-range input. Never silently clamped.
  #[error("invalid input: {0}")]
  Validation(String),

  #[error("aquarium not found: {0}")]
  AquariumNotFound(i64),

  #[error("critter not found: {0}")]
  CritterNotFound(i64),

  #[error("comment not found: {0}")]
  CommentNotFound(i64),

  #[error("image not found: {0}")]
  ImageNotFound(i64),

  #[error("user not found: {0}")]
  UserNotFound(i64),

  /// The entity exists but the acting user does not own or author it.
  #[error("user {user_id} does not own {entity}")]
  NotOwner { user_id: i64, entity: String },

  #[error("username {0:?} is already taken")]
  UsernameTaken(String),
}

impl Error {
  pub fn validation(reason: impl Into<String>) -> Self {
    Self::Validation(reason.into())
  }

  /// `true` for every "referenced entity is absent" variant.
  pub fn is_not_found(&self) -> bool {
    matches!(
      self,
      Self::AquariumNotFound(_)
        | Self::CritterNotFound(_)
        | Self::CommentNotFound(_)
        | Self::ImageNotFound(_)
        | Self::UserNotFound(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Check that `user_id` is the owner recorded on an entity.
pub fn ensure_owner(
  owner_id: i64,
  user_id: i64,
  entity: impl FnOnce() -> String,
) -> Result<()> {
  if owner_id == user_id {
    Ok(())
  } else {
    Err(Error::NotOwner { user_id, entity: entity() })
  }
}
