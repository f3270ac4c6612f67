//! Registered users.

use serde::Serialize;

use crate::{Error, Result};

pub const MAX_USERNAME_CHARS: usize = 50;
pub const MAX_PASSWORD_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
  pub id:       i64,
  pub username: String,
}

/// A user row including the stored password hash; never serialised.
#[derive(Debug, Clone)]
pub struct Credentials {
  pub user:          User,
  /// PHC string, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

pub fn validate_username(username: &str) -> Result<()> {
  if username.is_empty() || username.chars().count() > MAX_USERNAME_CHARS {
    return Err(Error::validation(format!(
      "username is required and must be {MAX_USERNAME_CHARS} characters or less"
    )));
  }
  Ok(())
}

/// Both password fields must be present, within length and identical.
pub fn validate_new_password(password1: &str, password2: &str) -> Result<()> {
  for password in [password1, password2] {
    if password.is_empty() || password.chars().count() > MAX_PASSWORD_CHARS {
      return Err(Error::validation(format!(
        "password is required and must be {MAX_PASSWORD_CHARS} characters or less"
      )));
    }
  }
  if password1 != password2 {
    return Err(Error::validation("passwords do not match"));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn username_rules() {
    assert!(validate_username("kalastaja").is_ok());
    assert!(validate_username("").is_err());
    assert!(validate_username(&"u".repeat(51)).is_err());
  }

  #[test]
  fn password_rules() {
    assert!(validate_new_password("hunter2", "hunter2").is_ok());
    assert!(validate_new_password("hunter2", "hunter3").is_err());
    assert!(validate_new_password("", "").is_err());
  }
}
