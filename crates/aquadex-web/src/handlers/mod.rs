//! Route handlers, grouped by resource.

pub mod aquariums;
pub mod classes;
pub mod comments;
pub mod critters;
pub mod images;
pub mod users;

use std::num::{IntErrorKind, ParseIntError};

use aquadex_core::{
  aquarium::Aquarium,
  error::ensure_owner,
  pagination::{PageLayout, PageRequest},
  store::AquariumStore,
  user::User,
};
use axum::{
  Json,
  extract::rejection::JsonRejection,
  response::Redirect,
};
use serde::Serialize;

use crate::error::{Error, Result};

// ─── Shared bodies ───────────────────────────────────────────────────────────

/// Response of bulk removals.
#[derive(Debug, Serialize)]
pub struct Removed {
  pub removed: u64,
}

/// Unwrap a JSON body, reporting malformed input as a 400.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T> {
  body
    .map(|Json(value)| value)
    .map_err(|rejection| Error::BadRequest(rejection.body_text()))
}

// ─── Ownership ───────────────────────────────────────────────────────────────

/// Load an aquarium and check that `user` owns it.
pub(crate) async fn owned_aquarium<S: AquariumStore>(
  store: &S,
  id: i64,
  user: &User,
) -> Result<Aquarium> {
  let aquarium = store
    .get_aquarium(id)
    .await
    .map_err(Error::store)?
    .ok_or(aquadex_core::Error::AquariumNotFound(id))?;
  ensure_owner(aquarium.owner_id, user.id, || format!("aquarium {id}"))?;
  Ok(aquarium)
}

// ─── Paging ──────────────────────────────────────────────────────────────────

/// The `page` query parameter; absent or empty means the first page.
///
/// Integers too large for `i64` saturate so they still redirect to the
/// nearest valid page.
pub(crate) fn requested_page(raw: Option<&str>) -> Result<i64> {
  let s = match raw.map(str::trim) {
    None | Some("") => return Ok(1),
    Some(s) => s,
  };
  s.parse().or_else(|e: ParseIntError| match e.kind() {
    IntErrorKind::PosOverflow => Ok(i64::MAX),
    IntErrorKind::NegOverflow => Ok(i64::MIN),
    _ => Err(Error::BadRequest(format!("page must be an integer, got {s:?}"))),
  })
}

/// `path?k=v&…&page=N` with every key and value percent-encoded.
pub(crate) fn canonical_url(path: &str, params: &[(String, String)], page: u32) -> String {
  let mut query: Vec<String> = params
    .iter()
    .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
    .collect();
  query.push(format!("page={page}"));
  format!("{path}?{}", query.join("&"))
}

/// Either the page to serve, or a `303 See Other` to the canonical page.
pub(crate) fn resolve_page(
  layout: &PageLayout,
  requested: i64,
  path: &str,
  params: &[(String, String)],
) -> Result<u32, Redirect> {
  match layout.resolve(requested) {
    PageRequest::Serve(page) => Ok(page),
    PageRequest::Redirect(page) => {
      let url = canonical_url(path, params, page);
      tracing::debug!(requested, %url, "redirecting to canonical page");
      Err(Redirect::to(&url))
    }
  }
}
