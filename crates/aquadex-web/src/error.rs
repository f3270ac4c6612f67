//! Error types and axum `IntoResponse` implementation.

use aquadex_core::store::StoreError;
use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,
  #[error("forbidden: {0}")]
  Forbidden(String),
  #[error("not found: {0}")]
  NotFound(String),
  #[error("conflict: {0}")]
  Conflict(String),
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("internal error: {0}")]
  Internal(String),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
  /// Map a store failure, surfacing the domain error behind it when there is
  /// one.
  pub fn store<E: StoreError>(e: E) -> Self {
    match e.domain() {
      Some(domain) => Self::from_domain(domain),
      None => Self::Store(Box::new(e)),
    }
  }

  fn from_domain(e: &aquadex_core::Error) -> Self {
    use aquadex_core::Error as D;
    match e {
      D::Validation(reason) => Self::BadRequest(reason.clone()),
      D::NotOwner { .. } => Self::Forbidden(e.to_string()),
      D::UsernameTaken(_) => Self::Conflict(e.to_string()),
      _ if e.is_not_found() => Self::NotFound(e.to_string()),
      _ => Self::BadRequest(e.to_string()),
    }
  }
}

impl From<aquadex_core::Error> for Error {
  fn from(e: aquadex_core::Error) -> Self { Self::from_domain(&e) }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      Error::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_owned()),
      Error::Forbidden(m) => (StatusCode::FORBIDDEN, m.clone()),
      Error::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      Error::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      Error::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      Error::Internal(m) => {
        tracing::error!(error = %m, "internal failure");
        (StatusCode::INTERNAL_SERVER_ERROR, m.clone())
      }
      Error::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };

    let mut res = (status, Json(json!({ "error": message }))).into_response();
    if matches!(self, Error::Unauthorized) {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"aquadex\""),
      );
    }
    res
  }
}
