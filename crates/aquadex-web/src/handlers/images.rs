//! Handlers for aquarium images.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/aquariums/{id}/images` | owner only; raw body, `Content-Type: image/*` |
//! | `DELETE` | `/aquariums/{id}/images` | owner only; removes every image |
//! | `POST`   | `/aquariums/{id}/images/remove` | owner only; body: `{"image_ids":[1,2]}` |
//! | `PUT`    | `/aquariums/{id}/main_image` | owner only; body: `{"image_id":1}` |
//! | `GET`    | `/images/{id}` | bytes with `Content-Type` and `ETag` |

use aquadex_core::{
  image::{ImageData, ImageRef},
  store::AquariumStore,
};
use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::{HeaderMap, HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::{Removed, json_body, owned_aquarium};
use crate::{
  AppState,
  auth::CurrentUser,
  error::{Error, Result},
  etag::{if_none_match, image_etag},
};

#[derive(Debug, Deserialize)]
pub struct MainImageBody {
  pub image_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct RemoveImagesBody {
  pub image_ids: Vec<i64>,
}

/// Outcome of a partial removal: the main image may have moved.
#[derive(Debug, Serialize)]
pub struct ImagesRemoved {
  pub removed:       u64,
  pub main_image_id: Option<i64>,
}

// ─── Upload ──────────────────────────────────────────────────────────────────

/// `POST /aquariums/{id}/images`
pub async fn upload<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(aquarium_id): Path<i64>,
  headers: HeaderMap,
  body: Bytes,
) -> Result<impl IntoResponse>
where
  S: AquariumStore + Clone + 'static,
{
  owned_aquarium(&*state.store, aquarium_id, &user).await?;

  let mime = headers
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .ok_or_else(|| Error::BadRequest("Content-Type header is required".to_owned()))?;
  let image = ImageData::new(body.to_vec(), mime, state.config.max_image_bytes)?;

  let id = state
    .store
    .add_image(aquarium_id, image)
    .await
    .map_err(Error::store)?;
  Ok((StatusCode::CREATED, Json(ImageRef { id, aquarium_id })))
}

// ─── Fetch ───────────────────────────────────────────────────────────────────

/// `GET /images/{id}`
pub async fn fetch<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  headers: HeaderMap,
) -> Result<Response>
where
  S: AquariumStore + Clone + 'static,
{
  let image = state
    .store
    .get_image_data(id)
    .await
    .map_err(Error::store)?
    .ok_or(aquadex_core::Error::ImageNotFound(id))?;

  let etag = image_etag(&image.mime, &image.bytes);
  let etag_header = HeaderValue::from_str(&etag)
    .map_err(|e| Error::Internal(format!("invalid etag: {e}")))?;

  let not_modified = headers
    .get(header::IF_NONE_MATCH)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|v| if_none_match(v, &etag));
  if not_modified {
    return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag_header)]).into_response());
  }

  let content_type = HeaderValue::from_str(&image.mime)
    .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
  Ok(
    (
      [(header::CONTENT_TYPE, content_type), (header::ETAG, etag_header)],
      image.bytes,
    )
      .into_response(),
  )
}

// ─── Main image ──────────────────────────────────────────────────────────────

/// `PUT /aquariums/{id}/main_image`
pub async fn set_main<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(aquarium_id): Path<i64>,
  body: Result<Json<MainImageBody>, JsonRejection>,
) -> Result<StatusCode>
where
  S: AquariumStore + Clone + 'static,
{
  owned_aquarium(&*state.store, aquarium_id, &user).await?;
  let body = json_body(body)?;
  state
    .store
    .set_main_image(aquarium_id, body.image_id)
    .await
    .map_err(Error::store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Removal ─────────────────────────────────────────────────────────────────

/// `POST /aquariums/{id}/images/remove`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(aquarium_id): Path<i64>,
  body: Result<Json<RemoveImagesBody>, JsonRejection>,
) -> Result<Json<ImagesRemoved>>
where
  S: AquariumStore + Clone + 'static,
{
  owned_aquarium(&*state.store, aquarium_id, &user).await?;
  let body = json_body(body)?;

  let removed = state
    .store
    .remove_images(body.image_ids, aquarium_id)
    .await
    .map_err(Error::store)?;
  let main_image_id = state
    .store
    .main_image(aquarium_id)
    .await
    .map_err(Error::store)?;
  Ok(Json(ImagesRemoved { removed, main_image_id }))
}

/// `DELETE /aquariums/{id}/images`
pub async fn remove_all<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(aquarium_id): Path<i64>,
) -> Result<Json<Removed>>
where
  S: AquariumStore + Clone + 'static,
{
  owned_aquarium(&*state.store, aquarium_id, &user).await?;
  let removed = state
    .store
    .remove_all_images(aquarium_id)
    .await
    .map_err(Error::store)?;
  Ok(Json(Removed { removed }))
}
