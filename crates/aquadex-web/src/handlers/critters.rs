//! Handlers for critter endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/aquariums/{id}/critters` | owner only; body: `{"species":"guppy","count":3}` |
//! | `DELETE` | `/aquariums/{id}/critters` | owner only; removes every critter |
//! | `PUT`    | `/critters/{id}` | owner only; optional `aquarium_id` moves the critter |
//! | `DELETE` | `/critters/{id}` | owner only |

use aquadex_core::{
  critter::{Critter, CritterInput},
  error::ensure_owner,
  store::AquariumStore,
  user::User,
};
use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;

use super::{Removed, json_body, owned_aquarium};
use crate::{
  AppState,
  auth::CurrentUser,
  error::{Error, Result},
};

#[derive(Debug, Deserialize)]
pub struct CritterBody {
  pub species:     String,
  pub count:       u32,
  /// Target aquarium on update; defaults to the current one.
  #[serde(default)]
  pub aquarium_id: Option<i64>,
}

/// `POST /aquariums/{id}/critters`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(aquarium_id): Path<i64>,
  body: Result<Json<CritterBody>, JsonRejection>,
) -> Result<impl IntoResponse>
where
  S: AquariumStore + Clone + 'static,
{
  owned_aquarium(&*state.store, aquarium_id, &user).await?;
  let body = json_body(body)?;
  let input = CritterInput::new(body.species, body.count)?;

  let critter = state
    .store
    .add_critter(aquarium_id, input)
    .await
    .map_err(Error::store)?;
  Ok((StatusCode::CREATED, Json(critter)))
}

/// `DELETE /aquariums/{id}/critters`
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
    .remove_critters(aquarium_id)
    .await
    .map_err(Error::store)?;
  Ok(Json(Removed { removed }))
}

/// `PUT /critters/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<i64>,
  body: Result<Json<CritterBody>, JsonRejection>,
) -> Result<Json<Critter>>
where
  S: AquariumStore + Clone + 'static,
{
  let critter = owned_critter(&*state.store, id, &user).await?;
  let body = json_body(body)?;
  let input = CritterInput::new(body.species, body.count)?;

  // Moving is only allowed into another aquarium of the same owner.
  let target = body.aquarium_id.unwrap_or(critter.aquarium_id);
  if target != critter.aquarium_id {
    owned_aquarium(&*state.store, target, &user).await?;
  }

  state
    .store
    .update_critter(id, target, input)
    .await
    .map_err(Error::store)?;

  let updated = state
    .store
    .get_critter(id)
    .await
    .map_err(Error::store)?
    .ok_or(aquadex_core::Error::CritterNotFound(id))?;
  Ok(Json(updated))
}

/// `DELETE /critters/{id}`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<i64>,
) -> Result<StatusCode>
where
  S: AquariumStore + Clone + 'static,
{
  owned_critter(&*state.store, id, &user).await?;
  state.store.remove_critter(id).await.map_err(Error::store)?;
  Ok(StatusCode::NO_CONTENT)
}

async fn owned_critter<S: AquariumStore>(store: &S, id: i64, user: &User) -> Result<Critter> {
  let critter = store
    .get_critter(id)
    .await
    .map_err(Error::store)?
    .ok_or(aquadex_core::Error::CritterNotFound(id))?;
  ensure_owner(critter.owner_id, user.id, || format!("critter {id}"))?;
  Ok(critter)
}
