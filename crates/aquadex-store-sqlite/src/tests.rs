use std::num::NonZeroU32;

use aquadex_core::{
  aquarium::{AquariumInput, Dimensions},
  critter::CritterInput,
  filter::SearchFilters,
  image::ImageData,
  store::{AquariumStore, StoreError as _},
  vocabulary::TagAssignment,
};
use chrono::NaiveDate;

use crate::{Error, SqliteStore};

// ─── Helpers ─────────────────────────────────────────────────────────────────

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.expect("in-memory store")
}

fn page_size(n: u32) -> NonZeroU32 { NonZeroU32::new(n).unwrap() }

async fn user(store: &SqliteStore, name: &str) -> i64 {
  store
    .create_user(name.into(), "hash".into())
    .await
    .unwrap()
    .id
}

fn tank(name: &str, dims: (u32, u32, u32)) -> AquariumInput {
  AquariumInput::new(
    name,
    Dimensions::new(dims.0, dims.1, dims.2).unwrap(),
    None,
    "",
    Vec::new(),
  )
  .unwrap()
}

fn tagged(name: &str, dims: (u32, u32, u32), tags: &[(&str, &str)]) -> AquariumInput {
  let mut input = tank(name, dims);
  input.tags = tags.iter().map(|(t, v)| TagAssignment::new(*t, *v)).collect();
  input
}

fn png(n: u8) -> ImageData {
  ImageData { bytes: vec![n; 8], mime: "image/png".into() }
}

fn domain(err: &Error) -> &aquadex_core::Error {
  err.domain().expect("domain error")
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_find_user() {
  let s = store().await;
  let created = s.create_user("alice".into(), "h".into()).await.unwrap();

  let creds = s.find_credentials("alice".into()).await.unwrap().unwrap();
  assert_eq!(creds.user, created);
  assert_eq!(creds.password_hash, "h");

  assert_eq!(s.get_user(created.id).await.unwrap(), Some(created));
  assert!(s.find_credentials("bob".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
  let s = store().await;
  user(&s, "alice").await;
  let err = s.create_user("alice".into(), "x".into()).await.unwrap_err();
  assert!(matches!(domain(&err), aquadex_core::Error::UsernameTaken(n) if n == "alice"));
}

#[tokio::test]
async fn user_aquariums_newest_first() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await;
  let first = s.add_aquarium(alice, tank("first", (10, 10, 10))).await.unwrap();
  s.add_aquarium(bob, tank("other", (10, 10, 10))).await.unwrap();
  let second = s.add_aquarium(alice, tank("second", (100, 40, 50))).await.unwrap();

  let owned = s.user_aquariums(alice).await.unwrap();
  let ids: Vec<_> = owned.iter().map(|a| a.id).collect();
  assert_eq!(ids, vec![second, first]);
  assert_eq!(owned[0].volume, 200);
}

// ─── Aquariums ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn vocabulary_is_seeded() {
  let s = store().await;
  let vocab = s.vocabulary().await.unwrap();
  assert!(vocab.allows("Vesi", "merivesi"));
  assert!(!vocab.allows("Vesi", "lava"));
}

#[tokio::test]
async fn add_get_update_aquarium() {
  let s = store().await;
  let alice = user(&s, "alice").await;

  let mut input = tagged("Reef", (100, 40, 50), &[("Vesi", "merivesi")]);
  input.date = NaiveDate::from_ymd_opt(2020, 5, 1);
  let id = s.add_aquarium(alice, input).await.unwrap();

  let aq = s.get_aquarium(id).await.unwrap().unwrap();
  assert_eq!(aq.name, "Reef");
  assert_eq!(aq.owner_name, "alice");
  assert_eq!(aq.volume, 200);
  assert_eq!(aq.date, NaiveDate::from_ymd_opt(2020, 5, 1));
  assert_eq!(s.selected_tags(id).await.unwrap(), vec![TagAssignment::new(
    "Vesi", "merivesi"
  )]);

  let update = tagged("Nano", (50, 40, 50), &[("Tyyppi", "biotooppi")]);
  s.update_aquarium(id, update).await.unwrap();

  let aq = s.get_aquarium(id).await.unwrap().unwrap();
  assert_eq!(aq.name, "Nano");
  assert_eq!(aq.volume, 100);
  assert_eq!(aq.date, None);
  assert_eq!(s.selected_tags(id).await.unwrap(), vec![TagAssignment::new(
    "Tyyppi",
    "biotooppi"
  )]);
}

#[tokio::test]
async fn unknown_tag_is_rejected_without_writing() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let err = s
    .add_aquarium(alice, tagged("Bad", (10, 10, 10), &[("Vesi", "lava")]))
    .await
    .unwrap_err();
  assert!(matches!(domain(&err), aquadex_core::Error::Validation(_)));
  assert_eq!(s.count_aquariums().await.unwrap(), 0);
}

#[tokio::test]
async fn update_missing_aquarium_is_not_found() {
  let s = store().await;
  let err = s.update_aquarium(42, tank("x", (1, 1, 1))).await.unwrap_err();
  assert!(matches!(domain(&err), aquadex_core::Error::AquariumNotFound(42)));
}

#[tokio::test]
async fn remove_aquarium_cascades() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let id = s
    .add_aquarium(alice, tagged("Reef", (10, 10, 10), &[("Vesi", "merivesi")]))
    .await
    .unwrap();
  let critter = s
    .add_critter(id, CritterInput::new("guppy", 3).unwrap())
    .await
    .unwrap();
  let comment = s.add_comment(id, alice, "nice".into()).await.unwrap();
  let image = s.add_image(id, png(1)).await.unwrap();

  s.remove_aquarium(id).await.unwrap();

  assert!(s.get_aquarium(id).await.unwrap().is_none());
  assert!(s.selected_tags(id).await.unwrap().is_empty());
  assert!(s.get_critter(critter.id).await.unwrap().is_none());
  assert!(s.get_comment(comment.id).await.unwrap().is_none());
  assert!(s.get_image(image).await.unwrap().is_none());
  assert!(s.main_image(id).await.unwrap().is_none());

  let err = s.remove_aquarium(id).await.unwrap_err();
  assert!(domain(&err).is_not_found());
}

// ─── Listings ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn listing_is_newest_first_and_paged() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let mut ids = Vec::new();
  for n in 0..5 {
    ids.push(
      s.add_aquarium(alice, tank(&format!("t{n}"), (10, 10, 10)))
        .await
        .unwrap(),
    );
  }

  assert_eq!(s.count_aquariums().await.unwrap(), 5);
  let first: Vec<_> = s
    .aquariums_page(1, page_size(2))
    .await
    .unwrap()
    .into_iter()
    .map(|a| a.id)
    .collect();
  assert_eq!(first, vec![ids[4], ids[3]]);

  let last = s.aquariums_page(3, page_size(2)).await.unwrap();
  assert_eq!(last.len(), 1);
  assert_eq!(last[0].id, ids[0]);
}

#[tokio::test]
async fn summary_aggregates() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let id = s
    .add_aquarium(
      alice,
      tagged("Reef", (100, 40, 50), &[
        ("Vesi", "merivesi"),
        ("Tekniikka", "high tech"),
      ]),
    )
    .await
    .unwrap();
  s.add_critter(id, CritterInput::new("guppy", 3).unwrap())
    .await
    .unwrap();
  s.add_critter(id, CritterInput::new("guppy", 2).unwrap())
    .await
    .unwrap();
  s.add_critter(id, CritterInput::new("tetra", 10).unwrap())
    .await
    .unwrap();
  s.add_comment(id, alice, "one".into()).await.unwrap();
  let image = s.add_image(id, png(1)).await.unwrap();

  let summary = s.aquariums_page(1, page_size(10)).await.unwrap().remove(0);
  assert_eq!(summary.owner_name, "alice");
  assert_eq!(summary.tags, "Vesi: merivesi, Tekniikka: high tech");
  assert_eq!(summary.comment_count, 1);
  assert_eq!(summary.species_count, 2);
  assert_eq!(summary.total_individuals, 15);
  assert_eq!(summary.main_image_id, Some(image));
}

#[tokio::test]
async fn summary_of_bare_aquarium() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  s.add_aquarium(alice, tank("Bare", (10, 10, 10))).await.unwrap();

  let summary = s.aquariums_page(1, page_size(10)).await.unwrap().remove(0);
  assert_eq!(summary.tags, "");
  assert_eq!(summary.comment_count, 0);
  assert_eq!(summary.species_count, 0);
  assert_eq!(summary.total_individuals, 0);
  assert_eq!(summary.main_image_id, None);
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_filter_finds_nothing() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  s.add_aquarium(alice, tank("a", (10, 10, 10))).await.unwrap();

  let filters = SearchFilters::default();
  assert_eq!(s.count_search_results(&filters).await.unwrap(), 0);
  assert!(s.search_page(&filters, 1, page_size(10)).await.unwrap().is_empty());
}

#[tokio::test]
async fn search_by_volume_bounds() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  s.add_aquarium(alice, tank("small", (50, 40, 50))).await.unwrap(); // 100 l
  let mid = s.add_aquarium(alice, tank("mid", (100, 40, 50))).await.unwrap(); // 200 l
  s.add_aquarium(alice, tank("big", (150, 50, 60))).await.unwrap(); // 450 l

  let filters = SearchFilters {
    volume_min: Some(150),
    volume_max: Some(300),
    ..Default::default()
  };
  assert_eq!(s.count_search_results(&filters).await.unwrap(), 1);
  let found = s.search_page(&filters, 1, page_size(10)).await.unwrap();
  assert_eq!(found[0].id, mid);

  // Bounds are inclusive.
  let exact = SearchFilters {
    volume_min: Some(200),
    volume_max: Some(200),
    ..Default::default()
  };
  assert_eq!(s.count_search_results(&exact).await.unwrap(), 1);
}

#[tokio::test]
async fn search_text_matches_name_description_and_owner() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bobby").await;
  let mut described = tank("plain", (10, 10, 10));
  described.description = "A shrimp colony".into();
  let by_desc = s.add_aquarium(alice, described).await.unwrap();
  let by_name = s.add_aquarium(alice, tank("Shrimp tank", (10, 10, 10))).await.unwrap();
  let by_owner = s.add_aquarium(bob, tank("other", (10, 10, 10))).await.unwrap();
  s.add_aquarium(alice, tank("unrelated", (10, 10, 10))).await.unwrap();

  let shrimp = SearchFilters { query: Some("shrimp".into()), ..Default::default() };
  let ids: Vec<_> = s
    .search_page(&shrimp, 1, page_size(10))
    .await
    .unwrap()
    .into_iter()
    .map(|a| a.id)
    .collect();
  assert_eq!(ids, vec![by_name, by_desc]);

  let owner = SearchFilters { query: Some("bobb".into()), ..Default::default() };
  let found = s.search_page(&owner, 1, page_size(10)).await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].id, by_owner);
}

#[tokio::test]
async fn search_text_treats_wildcards_literally() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  s.add_aquarium(alice, tank("100% reef", (10, 10, 10))).await.unwrap();
  s.add_aquarium(alice, tank("100 liters", (10, 10, 10))).await.unwrap();

  let filters = SearchFilters { query: Some("100%".into()), ..Default::default() };
  assert_eq!(s.count_search_results(&filters).await.unwrap(), 1);

  let underscore = SearchFilters { query: Some("_".into()), ..Default::default() };
  assert_eq!(s.count_search_results(&underscore).await.unwrap(), 0);
}

#[tokio::test]
async fn search_by_species() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let with = s.add_aquarium(alice, tank("a", (10, 10, 10))).await.unwrap();
  let without = s.add_aquarium(alice, tank("b", (10, 10, 10))).await.unwrap();
  s.add_critter(with, CritterInput::new("Neon tetra", 12).unwrap())
    .await
    .unwrap();
  s.add_critter(without, CritterInput::new("guppy", 1).unwrap())
    .await
    .unwrap();

  let filters = SearchFilters { species_query: Some("tetra".into()), ..Default::default() };
  let found = s.search_page(&filters, 1, page_size(10)).await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].id, with);
}

#[tokio::test]
async fn search_by_date_range() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let mut old = tank("old", (10, 10, 10));
  old.date = NaiveDate::from_ymd_opt(2015, 3, 1);
  let mut new = tank("new", (10, 10, 10));
  new.date = NaiveDate::from_ymd_opt(2022, 6, 15);
  s.add_aquarium(alice, old).await.unwrap();
  let new = s.add_aquarium(alice, new).await.unwrap();
  s.add_aquarium(alice, tank("undated", (10, 10, 10))).await.unwrap();

  let filters = SearchFilters {
    date_min: NaiveDate::from_ymd_opt(2020, 1, 1),
    date_max: NaiveDate::from_ymd_opt(2022, 6, 15),
    ..Default::default()
  };
  let found = s.search_page(&filters, 1, page_size(10)).await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].id, new);
}

#[tokio::test]
async fn search_requires_every_tag() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let both = s
    .add_aquarium(
      alice,
      tagged("both", (10, 10, 10), &[
        ("Vesi", "merivesi"),
        ("Tekniikka", "low tech"),
      ]),
    )
    .await
    .unwrap();
  s.add_aquarium(alice, tagged("one", (10, 10, 10), &[("Vesi", "merivesi")]))
    .await
    .unwrap();

  let mut filters = SearchFilters::default();
  filters.tags.insert("Vesi".into(), "merivesi".into());
  assert_eq!(s.count_search_results(&filters).await.unwrap(), 2);

  filters.tags.insert("Tekniikka".into(), "low tech".into());
  let found = s.search_page(&filters, 1, page_size(10)).await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].id, both);
}

#[tokio::test]
async fn search_follows_updates() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let id = s
    .add_aquarium(alice, tagged("Reef", (100, 40, 50), &[("Vesi", "merivesi")]))
    .await
    .unwrap();

  let mut filters = SearchFilters { volume_min: Some(150), ..Default::default() };
  filters.tags.insert("Vesi".into(), "merivesi".into());

  let found = s.search_page(&filters, 1, page_size(10)).await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].volume, 200);

  s.update_aquarium(id, tagged("Reef", (50, 40, 50), &[("Vesi", "merivesi")]))
    .await
    .unwrap();
  assert_eq!(s.count_search_results(&filters).await.unwrap(), 0);
}

// ─── Critters ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn critter_crud() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await;
  let a = s.add_aquarium(alice, tank("a", (10, 10, 10))).await.unwrap();
  let b = s.add_aquarium(bob, tank("b", (10, 10, 10))).await.unwrap();

  let zebra = s
    .add_critter(a, CritterInput::new("zebra danio", 4).unwrap())
    .await
    .unwrap();
  let guppy = s
    .add_critter(a, CritterInput::new("guppy", 2).unwrap())
    .await
    .unwrap();
  assert_eq!(zebra.owner_id, alice);

  let species: Vec<_> = s
    .get_critters(a)
    .await
    .unwrap()
    .into_iter()
    .map(|c| c.species)
    .collect();
  assert_eq!(species, vec!["guppy", "zebra danio"]);

  s.update_critter(guppy.id, b, CritterInput::new("endler", 7).unwrap())
    .await
    .unwrap();
  let moved = s.get_critter(guppy.id).await.unwrap().unwrap();
  assert_eq!(moved.aquarium_id, b);
  assert_eq!(moved.owner_id, bob);
  assert_eq!(moved.count, 7);

  s.remove_critter(zebra.id).await.unwrap();
  assert!(s.get_critters(a).await.unwrap().is_empty());
  let err = s.remove_critter(zebra.id).await.unwrap_err();
  assert!(matches!(domain(&err), aquadex_core::Error::CritterNotFound(_)));
}

#[tokio::test]
async fn critter_needs_existing_aquarium() {
  let s = store().await;
  let err = s
    .add_critter(9, CritterInput::new("guppy", 1).unwrap())
    .await
    .unwrap_err();
  assert!(matches!(domain(&err), aquadex_core::Error::AquariumNotFound(9)));
}

#[tokio::test]
async fn remove_all_critters() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let a = s.add_aquarium(alice, tank("a", (10, 10, 10))).await.unwrap();
  for name in ["a", "b", "c"] {
    s.add_critter(a, CritterInput::new(name, 1).unwrap())
      .await
      .unwrap();
  }
  assert_eq!(s.remove_critters(a).await.unwrap(), 3);
  assert!(s.get_critters(a).await.unwrap().is_empty());
}

// ─── Comments ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn comments_newest_first_and_paged() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await;
  let a = s.add_aquarium(alice, tank("a", (10, 10, 10))).await.unwrap();

  let mut ids = Vec::new();
  for n in 0..7 {
    let c = s.add_comment(a, bob, format!("c{n}")).await.unwrap();
    assert_eq!(c.author_name, "bob");
    ids.push(c.id);
  }

  assert_eq!(s.count_comments(a).await.unwrap(), 7);

  let newest: Vec<_> = s
    .newest_comments(a, 3)
    .await
    .unwrap()
    .into_iter()
    .map(|c| c.id)
    .collect();
  assert_eq!(newest, vec![ids[6], ids[5], ids[4]]);

  let page2: Vec<_> = s
    .comments_page(a, 2, page_size(5))
    .await
    .unwrap()
    .into_iter()
    .map(|c| c.id)
    .collect();
  assert_eq!(page2, vec![ids[1], ids[0]]);

  let fetched = s.get_comment(ids[3]).await.unwrap().unwrap();
  assert_eq!(fetched.content, "c3");

  s.remove_comment(ids[3]).await.unwrap();
  assert_eq!(s.count_comments(a).await.unwrap(), 6);
  assert!(s.get_comment(ids[3]).await.unwrap().is_none());
}

#[tokio::test]
async fn comment_on_missing_aquarium() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let err = s.add_comment(5, alice, "hi".into()).await.unwrap_err();
  assert!(matches!(domain(&err), aquadex_core::Error::AquariumNotFound(5)));
}

// ─── Images ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn first_image_becomes_main() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let a = s.add_aquarium(alice, tank("a", (10, 10, 10))).await.unwrap();

  let first = s.add_image(a, png(1)).await.unwrap();
  let second = s.add_image(a, png(2)).await.unwrap();

  assert_eq!(s.main_image(a).await.unwrap(), Some(first));
  assert_eq!(s.image_ids(a).await.unwrap(), vec![first, second]);
  assert_eq!(s.count_images(a).await.unwrap(), 2);
  assert_eq!(s.oldest_image(a).await.unwrap(), Some(first));

  let data = s.get_image_data(second).await.unwrap().unwrap();
  assert_eq!(data, png(2));
  assert_eq!(s.get_image(second).await.unwrap().unwrap().aquarium_id, a);
}

#[tokio::test]
async fn only_the_first_image_is_promoted() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let a = s.add_aquarium(alice, tank("a", (10, 10, 10))).await.unwrap();

  s.add_image(a, png(1)).await.unwrap();
  s.remove_main_image(a).await.unwrap();
  s.add_image(a, png(2)).await.unwrap();
  assert_eq!(s.main_image(a).await.unwrap(), None);

  s.remove_all_images(a).await.unwrap();
  let fresh = s.add_image(a, png(3)).await.unwrap();
  assert_eq!(s.main_image(a).await.unwrap(), Some(fresh));
}

#[tokio::test]
async fn set_main_image_checks_ownership() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let a = s.add_aquarium(alice, tank("a", (10, 10, 10))).await.unwrap();
  let b = s.add_aquarium(alice, tank("b", (10, 10, 10))).await.unwrap();
  s.add_image(a, png(1)).await.unwrap();
  let second = s.add_image(a, png(2)).await.unwrap();
  let foreign = s.add_image(b, png(3)).await.unwrap();

  s.set_main_image(a, second).await.unwrap();
  assert_eq!(s.main_image(a).await.unwrap(), Some(second));

  let err = s.set_main_image(a, foreign).await.unwrap_err();
  assert!(matches!(domain(&err), aquadex_core::Error::ImageNotFound(_)));
  assert_eq!(s.main_image(a).await.unwrap(), Some(second));

  s.remove_main_image(a).await.unwrap();
  assert_eq!(s.main_image(a).await.unwrap(), None);
}

#[tokio::test]
async fn removing_main_promotes_oldest_remaining() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let a = s.add_aquarium(alice, tank("a", (10, 10, 10))).await.unwrap();
  let i1 = s.add_image(a, png(1)).await.unwrap();
  let i2 = s.add_image(a, png(2)).await.unwrap();
  let i3 = s.add_image(a, png(3)).await.unwrap();
  s.set_main_image(a, i2).await.unwrap();

  assert_eq!(s.remove_images(vec![i2], a).await.unwrap(), 1);
  assert_eq!(s.main_image(a).await.unwrap(), Some(i1));

  // Removing a non-main image leaves the pointer alone.
  assert_eq!(s.remove_images(vec![i3], a).await.unwrap(), 1);
  assert_eq!(s.main_image(a).await.unwrap(), Some(i1));

  assert_eq!(s.remove_images(vec![i1], a).await.unwrap(), 1);
  assert_eq!(s.main_image(a).await.unwrap(), None);
  assert!(s.image_ids(a).await.unwrap().is_empty());
}

#[tokio::test]
async fn remove_images_ignores_other_aquariums() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let a = s.add_aquarium(alice, tank("a", (10, 10, 10))).await.unwrap();
  let b = s.add_aquarium(alice, tank("b", (10, 10, 10))).await.unwrap();
  let mine = s.add_image(a, png(1)).await.unwrap();
  let theirs = s.add_image(b, png(2)).await.unwrap();

  assert_eq!(s.remove_images(vec![theirs, 999], a).await.unwrap(), 0);
  assert!(s.get_image(theirs).await.unwrap().is_some());
  assert_eq!(s.main_image(b).await.unwrap(), Some(theirs));
  assert_eq!(s.main_image(a).await.unwrap(), Some(mine));

  assert_eq!(s.remove_images(Vec::new(), a).await.unwrap(), 0);
}

#[tokio::test]
async fn remove_all_images_clears_main() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let a = s.add_aquarium(alice, tank("a", (10, 10, 10))).await.unwrap();
  s.add_image(a, png(1)).await.unwrap();
  s.add_image(a, png(2)).await.unwrap();

  assert_eq!(s.remove_all_images(a).await.unwrap(), 2);
  assert_eq!(s.main_image(a).await.unwrap(), None);
  assert_eq!(s.count_images(a).await.unwrap(), 0);

  // A fresh upload becomes the main image again.
  let next = s.add_image(a, png(3)).await.unwrap();
  assert_eq!(s.main_image(a).await.unwrap(), Some(next));
}
