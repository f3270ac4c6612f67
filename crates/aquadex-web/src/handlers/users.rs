//! Handlers for user accounts.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/users` | body: `{"username":…,"password1":…,"password2":…}` |
//! | `POST` | `/login` | Basic credentials; returns the user |
//! | `GET`  | `/users/{id}` | user and their aquariums |

use aquadex_core::{
  aquarium::UserAquarium,
  store::AquariumStore,
  user::{User, validate_new_password, validate_username},
};
use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use super::json_body;
use crate::{
  AppState,
  auth::{CurrentUser, hash_password},
  error::{Error, Result},
};

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub username:  String,
  pub password1: String,
  pub password2: String,
}

#[derive(Debug, Serialize)]
pub struct UserProfile {
  pub user:      User,
  pub aquariums: Vec<UserAquarium>,
}

/// `POST /users`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<RegisterBody>, JsonRejection>,
) -> Result<impl IntoResponse>
where
  S: AquariumStore + Clone + 'static,
{
  let body = json_body(body)?;
  validate_username(&body.username)?;
  validate_new_password(&body.password1, &body.password2)?;

  let hash = hash_password(&body.password1)?;
  let user = state
    .store
    .create_user(body.username, hash)
    .await
    .map_err(Error::store)?;
  Ok((StatusCode::CREATED, Json(user)))
}

/// `POST /login`
pub async fn login(CurrentUser(user): CurrentUser) -> Json<User> {
  tracing::info!(user_id = user.id, "logged in");
  Json(user)
}

/// `GET /users/{id}`
pub async fn profile<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<UserProfile>>
where
  S: AquariumStore + Clone + 'static,
{
  let user = state
    .store
    .get_user(id)
    .await
    .map_err(Error::store)?
    .ok_or(aquadex_core::Error::UserNotFound(id))?;
  let aquariums = state
    .store
    .user_aquariums(id)
    .await
    .map_err(Error::store)?;
  Ok(Json(UserProfile { user, aquariums }))
}
