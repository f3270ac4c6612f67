//! `GET /classes`: the tag vocabulary, grouped by title.

use aquadex_core::{store::AquariumStore, vocabulary::Vocabulary};
use axum::{Json, extract::State};

use crate::{
  AppState,
  error::{Error, Result},
};

pub async fn list<S>(State(state): State<AppState<S>>) -> Result<Json<Vocabulary>>
where
  S: AquariumStore + Clone + 'static,
{
  let vocabulary = state.store.vocabulary().await.map_err(Error::store)?;
  Ok(Json(vocabulary))
}
