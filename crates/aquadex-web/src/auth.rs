//! HTTP Basic-auth extractor and password hashing.
//!
//! Every authenticated request carries the username and password; the
//! password is checked against the argon2 hash stored for that user.

use aquadex_core::{store::AquariumStore, user::User};
use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use rand_core::OsRng;

use crate::{AppState, error::Error};

/// The user whose Basic credentials accompanied the request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Hash a password into an argon2 PHC string, e.g. `$argon2id$v=19$…`.
pub fn hash_password(password: &str) -> Result<String, Error> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| Error::Internal(format!("password hashing failed: {e}")))
}

/// `true` if `password` matches the stored PHC string.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
  PasswordHash::new(password_hash)
    .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
    .is_ok()
}

/// Decode `Authorization: Basic …` into `(username, password)`.
pub fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), Error> {
  let header_val = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded.trim()).map_err(|_| Error::Unauthorized)?;
  let creds = String::from_utf8(decoded).map_err(|_| Error::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;
  Ok((username.to_owned(), password.to_owned()))
}

impl<S> FromRequestParts<AppState<S>> for CurrentUser
where
  S: AquariumStore + Clone + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let (username, password) = basic_credentials(&parts.headers)?;

    let credentials = state
      .store
      .find_credentials(username.clone())
      .await
      .map_err(Error::store)?;

    match credentials {
      Some(c) if verify_password(&password, &c.password_hash) => Ok(CurrentUser(c.user)),
      Some(_) => {
        tracing::warn!(%username, "wrong password");
        Err(Error::Unauthorized)
      }
      None => {
        tracing::warn!(%username, "unknown user");
        Err(Error::Unauthorized)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use aquadex_store_sqlite::SqliteStore;
  use axum::http::Request;

  use super::*;
  use crate::tests::{basic, make_state};

  async fn extract(
    req: Request<axum::body::Body>,
    state: &AppState<SqliteStore>,
  ) -> Result<CurrentUser, Error> {
    let (mut parts, _) = req.into_parts();
    CurrentUser::from_request_parts(&mut parts, state).await
  }

  fn request(authorization: Option<&str>) -> Request<axum::body::Body> {
    let mut builder = Request::builder();
    if let Some(value) = authorization {
      builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(axum::body::Body::empty()).unwrap()
  }

  #[test]
  fn hash_and_verify() {
    let hash = hash_password("secret").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("secret", &hash));
    assert!(!verify_password("wrong", &hash));
    assert!(!verify_password("secret", "not a phc string"));
  }

  #[test]
  fn passwords_may_contain_colons() {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, basic("alice", "a:b").parse().unwrap());
    let (user, pass) = basic_credentials(&headers).unwrap();
    assert_eq!(user, "alice");
    assert_eq!(pass, "a:b");
  }

  #[tokio::test]
  async fn correct_credentials() {
    let (state, alice) = make_state().await;
    let user = extract(request(Some(&basic("alice", "secret"))), &state)
      .await
      .unwrap();
    assert_eq!(user.0.id, alice);
  }

  #[tokio::test]
  async fn wrong_password() {
    let (state, _) = make_state().await;
    let res = extract(request(Some(&basic("alice", "wrong"))), &state).await;
    assert!(matches!(res, Err(Error::Unauthorized)));
  }

  #[tokio::test]
  async fn unknown_user() {
    let (state, _) = make_state().await;
    let res = extract(request(Some(&basic("mallory", "secret"))), &state).await;
    assert!(matches!(res, Err(Error::Unauthorized)));
  }

  #[tokio::test]
  async fn missing_header() {
    let (state, _) = make_state().await;
    let res = extract(request(None), &state).await;
    assert!(matches!(res, Err(Error::Unauthorized)));
  }

  #[tokio::test]
  async fn invalid_base64() {
    let (state, _) = make_state().await;
    let res = extract(request(Some("Basic !!!not-base64!!!")), &state).await;
    assert!(matches!(res, Err(Error::Unauthorized)));
  }
}
