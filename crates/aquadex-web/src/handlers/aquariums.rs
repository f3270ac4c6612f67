//! Handlers for `/aquariums` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/aquariums` | `?page=N`; out-of-range pages redirect |
//! | `GET`    | `/aquariums/search` | filter params + `?page=N` |
//! | `POST`   | `/aquariums` | authenticated; body: [`AquariumBody`] |
//! | `GET`    | `/aquariums/{id}` | detail view |
//! | `PUT`    | `/aquariums/{id}` | owner only; body: [`AquariumBody`] |
//! | `DELETE` | `/aquariums/{id}` | owner only |

use std::collections::BTreeMap;

use aquadex_core::{
  aquarium::{Aquarium, AquariumInput, AquariumSummary, Dimensions, parse_date},
  comment::Comment,
  critter::Critter,
  filter::SearchFilters,
  pagination::{PageLayout, Pagination},
  store::AquariumStore,
  vocabulary::TagAssignment,
};
use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use super::{json_body, owned_aquarium, requested_page, resolve_page};
use crate::{
  AppState,
  auth::CurrentUser,
  error::{Error, Result},
};

// ─── Bodies ──────────────────────────────────────────────────────────────────

/// Request body for creating or updating an aquarium.
#[derive(Debug, Deserialize)]
pub struct AquariumBody {
  pub name:        String,
  /// Centimetres, 1–9999 each.
  pub length:      u32,
  pub depth:       u32,
  pub height:      u32,
  /// `YYYY-MM-DD`; empty or absent for no date.
  #[serde(default)]
  pub date:        Option<String>,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub tags:        Vec<TagAssignment>,
}

impl AquariumBody {
  fn into_input(self) -> Result<AquariumInput> {
    let dimensions = Dimensions::new(self.length, self.depth, self.height)?;
    let date = match self.date.as_deref() {
      Some(s) => parse_date(s)?,
      None => None,
    };
    Ok(AquariumInput::new(self.name, dimensions, date, self.description, self.tags)?)
  }
}

#[derive(Debug, Serialize)]
pub struct AquariumList {
  pub aquariums:  Vec<AquariumSummary>,
  pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
  pub filters:    SearchFilters,
  pub aquariums:  Vec<AquariumSummary>,
  pub pagination: Pagination,
}

/// Everything shown on an aquarium's page.
#[derive(Debug, Serialize)]
pub struct AquariumDetail {
  pub aquarium:      Aquarium,
  pub tags:          Vec<TagAssignment>,
  pub critters:      Vec<Critter>,
  /// The newest few; the full thread is paged under `/comments`.
  pub comments:      Vec<Comment>,
  pub comment_count: u64,
  pub image_ids:     Vec<i64>,
  pub main_image_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
  pub page: Option<String>,
}

// ─── Listing ─────────────────────────────────────────────────────────────────

/// `GET /aquariums[?page=N]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<PageParams>,
) -> Result<Response>
where
  S: AquariumStore + Clone + 'static,
{
  let requested = requested_page(params.page.as_deref())?;
  let page_size = state.config.page_size;

  let total = state.store.count_aquariums().await.map_err(Error::store)?;
  let layout = PageLayout::new(total, page_size);
  let page = match resolve_page(&layout, requested, "/aquariums", &[]) {
    Ok(page) => page,
    Err(redirect) => return Ok(redirect.into_response()),
  };

  let aquariums = state
    .store
    .aquariums_page(page, page_size)
    .await
    .map_err(Error::store)?;
  Ok(Json(AquariumList { aquariums, pagination: layout.pagination(page) }).into_response())
}

/// `GET /aquariums/search?query=…&species_query=…&volume_min=…&class_<Title>=…&page=N`
pub async fn search<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<BTreeMap<String, String>>,
) -> Result<Response>
where
  S: AquariumStore + Clone + 'static,
{
  let filters = SearchFilters::from_params(&params)?;
  let requested = requested_page(params.get("page").map(String::as_str))?;
  let page_size = state.config.page_size;

  let total = state
    .store
    .count_search_results(&filters)
    .await
    .map_err(Error::store)?;
  let layout = PageLayout::new(total, page_size);
  let page =
    match resolve_page(&layout, requested, "/aquariums/search", &filters.to_params()) {
      Ok(page) => page,
      Err(redirect) => return Ok(redirect.into_response()),
    };

  let aquariums = state
    .store
    .search_page(&filters, page, page_size)
    .await
    .map_err(Error::store)?;
  Ok(
    Json(SearchResults { filters, aquariums, pagination: layout.pagination(page) })
      .into_response(),
  )
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /aquariums`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  body: Result<Json<AquariumBody>, JsonRejection>,
) -> Result<impl IntoResponse>
where
  S: AquariumStore + Clone + 'static,
{
  let input = json_body(body)?.into_input()?;
  let id = state
    .store
    .add_aquarium(user.id, input)
    .await
    .map_err(Error::store)?;
  let aquarium = fetch(&*state.store, id).await?;
  Ok((StatusCode::CREATED, Json(aquarium)))
}

// ─── Detail ──────────────────────────────────────────────────────────────────

/// `GET /aquariums/{id}`
pub async fn detail<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<AquariumDetail>>
where
  S: AquariumStore + Clone + 'static,
{
  let store = &*state.store;
  let aquarium = fetch(store, id).await?;

  Ok(Json(AquariumDetail {
    aquarium,
    tags: store.selected_tags(id).await.map_err(Error::store)?,
    critters: store.get_critters(id).await.map_err(Error::store)?,
    comments: store
      .newest_comments(id, state.config.newest_comments)
      .await
      .map_err(Error::store)?,
    comment_count: store.count_comments(id).await.map_err(Error::store)?,
    image_ids: store.image_ids(id).await.map_err(Error::store)?,
    main_image_id: store.main_image(id).await.map_err(Error::store)?,
  }))
}

// ─── Update / remove ─────────────────────────────────────────────────────────

/// `PUT /aquariums/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<i64>,
  body: Result<Json<AquariumBody>, JsonRejection>,
) -> Result<Json<Aquarium>>
where
  S: AquariumStore + Clone + 'static,
{
  owned_aquarium(&*state.store, id, &user).await?;
  let input = json_body(body)?.into_input()?;
  state
    .store
    .update_aquarium(id, input)
    .await
    .map_err(Error::store)?;
  Ok(Json(fetch(&*state.store, id).await?))
}

/// `DELETE /aquariums/{id}`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<i64>,
) -> Result<StatusCode>
where
  S: AquariumStore + Clone + 'static,
{
  owned_aquarium(&*state.store, id, &user).await?;
  state.store.remove_aquarium(id).await.map_err(Error::store)?;
  Ok(StatusCode::NO_CONTENT)
}

async fn fetch<S: AquariumStore>(store: &S, id: i64) -> Result<Aquarium> {
  Ok(
    store
      .get_aquarium(id)
      .await
      .map_err(Error::store)?
      .ok_or(aquadex_core::Error::AquariumNotFound(id))?,
  )
}
