//! The `AquariumStore` trait.
//!
//! Implemented by storage backends (e.g. `aquadex-store-sqlite`). The HTTP
//! layer depends on this abstraction, not on any concrete backend.
//!
//! Every write method is a single transaction: either all of its rows are
//! committed or none are.

use std::{future::Future, num::NonZeroU32};

use crate::{
  Error,
  aquarium::{Aquarium, AquariumInput, AquariumSummary, UserAquarium},
  comment::Comment,
  critter::{Critter, CritterInput},
  filter::SearchFilters,
  image::{ImageData, ImageRef},
  user::{Credentials, User},
  vocabulary::{TagAssignment, Vocabulary},
};

/// Backend errors expose the domain error behind them, if there is one, so
/// callers can tell validation and not-found failures from storage faults.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn domain(&self) -> Option<&Error>;
}

/// Abstraction over an aquarium catalog backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait AquariumStore: Send + Sync {
  type Error: StoreError;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Register a user. A duplicate username fails with
  /// [`Error::UsernameTaken`].
  fn create_user(
    &self,
    username: String,
    password_hash: String,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// The user and stored password hash for `username`, if registered.
  fn find_credentials(
    &self,
    username: String,
  ) -> impl Future<Output = Result<Option<Credentials>, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// The user's aquariums, newest first.
  fn user_aquariums(
    &self,
    user_id: i64,
  ) -> impl Future<Output = Result<Vec<UserAquarium>, Self::Error>> + Send + '_;

  // ── Aquariums ─────────────────────────────────────────────────────────

  /// Insert an aquarium and its tags; returns the new id. Volume is derived
  /// from the dimensions and tags are validated against the vocabulary.
  fn add_aquarium(
    &self,
    owner_id: i64,
    input: AquariumInput,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  fn get_aquarium(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Aquarium>, Self::Error>> + Send + '_;

  /// Overwrite an aquarium's fields and replace its tags.
  fn update_aquarium(
    &self,
    id: i64,
    input: AquariumInput,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete an aquarium together with its tags, critters, comments and
  /// images.
  fn remove_aquarium(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The current tag vocabulary.
  fn vocabulary(
    &self,
  ) -> impl Future<Output = Result<Vocabulary, Self::Error>> + Send + '_;

  fn selected_tags(
    &self,
    aquarium_id: i64,
  ) -> impl Future<Output = Result<Vec<TagAssignment>, Self::Error>> + Send + '_;

  // ── Listings ──────────────────────────────────────────────────────────

  fn count_aquariums(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// One page of all aquariums, newest first.
  fn aquariums_page(
    &self,
    page: u32,
    page_size: NonZeroU32,
  ) -> impl Future<Output = Result<Vec<AquariumSummary>, Self::Error>> + Send + '_;

  /// Number of aquariums matching `filters`; zero when no criterion is set.
  fn count_search_results<'a>(
    &'a self,
    filters: &'a SearchFilters,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  /// One page of aquariums matching `filters`, newest first; empty when no
  /// criterion is set.
  fn search_page<'a>(
    &'a self,
    filters: &'a SearchFilters,
    page: u32,
    page_size: NonZeroU32,
  ) -> impl Future<Output = Result<Vec<AquariumSummary>, Self::Error>> + Send + 'a;

  // ── Critters ──────────────────────────────────────────────────────────

  /// Add a critter; its owner is copied from the aquarium.
  fn add_critter(
    &self,
    aquarium_id: i64,
    input: CritterInput,
  ) -> impl Future<Output = Result<Critter, Self::Error>> + Send + '_;

  /// Critters of an aquarium ordered by species.
  fn get_critters(
    &self,
    aquarium_id: i64,
  ) -> impl Future<Output = Result<Vec<Critter>, Self::Error>> + Send + '_;

  fn get_critter(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Critter>, Self::Error>> + Send + '_;

  /// Update species and count, possibly moving the critter to another
  /// aquarium.
  fn update_critter(
    &self,
    id: i64,
    aquarium_id: i64,
    input: CritterInput,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn remove_critter(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove every critter of an aquarium; returns how many were removed.
  fn remove_critters(
    &self,
    aquarium_id: i64,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Comments ──────────────────────────────────────────────────────────

  /// Record a comment; `sent_at` is set by the store.
  fn add_comment(
    &self,
    aquarium_id: i64,
    author_id: i64,
    content: String,
  ) -> impl Future<Output = Result<Comment, Self::Error>> + Send + '_;

  fn newest_comments(
    &self,
    aquarium_id: i64,
    limit: u32,
  ) -> impl Future<Output = Result<Vec<Comment>, Self::Error>> + Send + '_;

  fn count_comments(
    &self,
    aquarium_id: i64,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  fn comments_page(
    &self,
    aquarium_id: i64,
    page: u32,
    page_size: NonZeroU32,
  ) -> impl Future<Output = Result<Vec<Comment>, Self::Error>> + Send + '_;

  fn get_comment(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Comment>, Self::Error>> + Send + '_;

  fn remove_comment(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Images ────────────────────────────────────────────────────────────

  /// Store an image. It becomes the main image only when it is the
  /// aquarium's only image; a main image cleared while other images remain
  /// stays cleared.
  fn add_image(
    &self,
    aquarium_id: i64,
    image: ImageData,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  fn count_images(
    &self,
    aquarium_id: i64,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Image ids of an aquarium, oldest first.
  fn image_ids(
    &self,
    aquarium_id: i64,
  ) -> impl Future<Output = Result<Vec<i64>, Self::Error>> + Send + '_;

  fn get_image(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<ImageRef>, Self::Error>> + Send + '_;

  fn get_image_data(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<ImageData>, Self::Error>> + Send + '_;

  /// Insert or overwrite the aquarium's main-image pointer. The image must
  /// belong to the aquarium.
  fn set_main_image(
    &self,
    aquarium_id: i64,
    image_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn main_image(
    &self,
    aquarium_id: i64,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + '_;

  fn remove_main_image(
    &self,
    aquarium_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The lowest image id of the aquarium.
  fn oldest_image(
    &self,
    aquarium_id: i64,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + '_;

  /// Delete those of `image_ids` that belong to the aquarium. If the main
  /// image was among them the oldest remaining image is promoted, or the
  /// pointer is cleared when none remain. Returns how many were removed.
  fn remove_images(
    &self,
    image_ids: Vec<i64>,
    aquarium_id: i64,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Delete all images of the aquarium and its main-image pointer.
  fn remove_all_images(
    &self,
    aquarium_id: i64,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
