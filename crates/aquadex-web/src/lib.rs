//! HTTP layer for Aquadex.
//!
//! Exposes an axum [`Router`] serving the aquarium catalog as JSON, backed by
//! any [`AquariumStore`]. Writes are authenticated with HTTP Basic
//! credentials checked against the stored argon2 hashes.

pub mod auth;
pub mod error;
pub mod etag;
pub mod handlers;

pub use error::{Error, Result};

use std::{num::NonZeroU32, path::PathBuf, sync::Arc};

use aquadex_core::store::AquariumStore;
use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{delete, get, post, put},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use handlers::{aquariums, classes, comments, critters, images, users};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `AQUADEX_*` environment variables. Every field has a default.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  pub store_path:        PathBuf,
  /// Aquariums per listing or search page.
  pub page_size:         NonZeroU32,
  pub comment_page_size: NonZeroU32,
  /// Comments shown on an aquarium's detail view.
  pub newest_comments:   u32,
  /// Upper bound for a single image upload.
  pub max_image_bytes:   usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:              "127.0.0.1".to_owned(),
      port:              5000,
      store_path:        PathBuf::from("~/.local/share/aquadex/aquadex.db"),
      page_size:         NonZeroU32::new(10).unwrap_or(NonZeroU32::MIN),
      comment_page_size: NonZeroU32::new(10).unwrap_or(NonZeroU32::MIN),
      newest_comments:   5,
      max_image_bytes:   1024 * 1024,
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: AquariumStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
}

impl<S: AquariumStore> AppState<S> {
  pub fn new(store: S, config: ServerConfig) -> Self {
    Self { store: Arc::new(store), config: Arc::new(config) }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the catalog.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: AquariumStore + Clone + 'static,
{
  let image_limit = state.config.max_image_bytes;

  Router::new()
    // Users
    .route("/users",                         post(users::register::<S>))
    .route("/login",                         post(users::login))
    .route("/users/{id}",                    get(users::profile::<S>))
    // Aquariums
    .route("/aquariums",                     get(aquariums::list::<S>).post(aquariums::create::<S>))
    .route("/aquariums/search",              get(aquariums::search::<S>))
    .route(
      "/aquariums/{id}",
      get(aquariums::detail::<S>)
        .put(aquariums::update::<S>)
        .delete(aquariums::remove::<S>),
    )
    .route("/classes",                       get(classes::list::<S>))
    // Critters
    .route(
      "/aquariums/{id}/critters",
      post(critters::create::<S>).delete(critters::remove_all::<S>),
    )
    .route("/critters/{id}",                 put(critters::update::<S>).delete(critters::remove::<S>))
    // Comments
    .route("/aquariums/{id}/comments",       get(comments::page::<S>).post(comments::create::<S>))
    .route("/comments/{id}",                 delete(comments::remove::<S>))
    // Images
    .route(
      "/aquariums/{id}/images",
      post(images::upload::<S>)
        .layer(DefaultBodyLimit::max(image_limit))
        .delete(images::remove_all::<S>),
    )
    .route("/aquariums/{id}/images/remove",  post(images::remove::<S>))
    .route("/aquariums/{id}/main_image",     put(images::set_main::<S>))
    .route("/images/{id}",                   get(images::fetch::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
