//! Handlers for comment endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/aquariums/{id}/comments` | `?page=N`, newest first; out-of-range pages redirect |
//! | `POST`   | `/aquariums/{id}/comments` | authenticated; body: `{"content":"…"}` |
//! | `DELETE` | `/comments/{id}` | author only |

use aquadex_core::{
  comment::{Comment, validate_comment},
  error::ensure_owner,
  pagination::{PageLayout, Pagination},
  store::AquariumStore,
};
use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use super::{aquariums::PageParams, json_body, requested_page, resolve_page};
use crate::{
  AppState,
  auth::CurrentUser,
  error::{Error, Result},
};

#[derive(Debug, Deserialize)]
pub struct CommentBody {
  pub content: String,
}

#[derive(Debug, Serialize)]
pub struct CommentPage {
  pub aquarium_id: i64,
  pub comments:    Vec<Comment>,
  pub pagination:  Pagination,
}

/// `GET /aquariums/{id}/comments[?page=N]`
pub async fn page<S>(
  State(state): State<AppState<S>>,
  Path(aquarium_id): Path<i64>,
  Query(params): Query<PageParams>,
) -> Result<Response>
where
  S: AquariumStore + Clone + 'static,
{
  let requested = requested_page(params.page.as_deref())?;
  let page_size = state.config.comment_page_size;

  if state
    .store
    .get_aquarium(aquarium_id)
    .await
    .map_err(Error::store)?
    .is_none()
  {
    return Err(aquadex_core::Error::AquariumNotFound(aquarium_id).into());
  }

  let total = state
    .store
    .count_comments(aquarium_id)
    .await
    .map_err(Error::store)?;
  let layout = PageLayout::new(total, page_size);
  let path = format!("/aquariums/{aquarium_id}/comments");
  let page = match resolve_page(&layout, requested, &path, &[]) {
    Ok(page) => page,
    Err(redirect) => return Ok(redirect.into_response()),
  };

  let comments = state
    .store
    .comments_page(aquarium_id, page, page_size)
    .await
    .map_err(Error::store)?;
  Ok(
    Json(CommentPage { aquarium_id, comments, pagination: layout.pagination(page) })
      .into_response(),
  )
}

/// `POST /aquariums/{id}/comments`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(aquarium_id): Path<i64>,
  body: Result<Json<CommentBody>, JsonRejection>,
) -> Result<impl IntoResponse>
where
  S: AquariumStore + Clone + 'static,
{
  let content = validate_comment(&json_body(body)?.content)?;
  let comment = state
    .store
    .add_comment(aquarium_id, user.id, content)
    .await
    .map_err(Error::store)?;
  Ok((StatusCode::CREATED, Json(comment)))
}

/// `DELETE /comments/{id}`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<i64>,
) -> Result<StatusCode>
where
  S: AquariumStore + Clone + 'static,
{
  let comment = state
    .store
    .get_comment(id)
    .await
    .map_err(Error::store)?
    .ok_or(aquadex_core::Error::CommentNotFound(id))?;
  ensure_owner(comment.author_id, user.id, || format!("comment {id}"))?;

  state.store.remove_comment(id).await.map_err(Error::store)?;
  tracing::info!(comment_id = id, user_id = user.id, "comment removed");
  Ok(StatusCode::NO_CONTENT)
}
