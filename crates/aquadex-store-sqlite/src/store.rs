//! [`SqliteStore`], the SQLite implementation of [`AquariumStore`].

use std::{num::NonZeroU32, path::Path};

use aquadex_core::{
  aquarium::{Aquarium, AquariumInput, AquariumSummary, UserAquarium},
  comment::Comment,
  critter::{Critter, CritterInput},
  filter::SearchFilters,
  image::{ImageData, ImageRef},
  pagination::limit_offset,
  store::AquariumStore,
  user::{Credentials, User},
  vocabulary::{DEFAULT_VOCABULARY, TagAssignment, Vocabulary},
};
use chrono::Utc;
use rusqlite::{OptionalExtension as _, types::Value};

use crate::{
  Error, Result,
  encode::{
    RawAquarium, RawComment, RawCritter, RawSummary, decode_u32, decode_u64,
    encode_date, encode_dt,
  },
  filter::Predicate,
  schema::{COMMENT_SELECT, COUNT_SELECT, SCHEMA, SUMMARY_SELECT},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An aquarium catalog backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Create tables and install the default vocabulary into an empty
  /// `classes` table.
  async fn init_schema(&self) -> Result<()> {
    let seeded = self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;

        let tx = conn.transaction()?;
        let existing: i64 =
          tx.query_row("SELECT COUNT(*) FROM classes", [], |r| r.get(0))?;
        if existing > 0 {
          return Ok(false);
        }
        {
          let mut stmt =
            tx.prepare("INSERT INTO classes (title, value) VALUES (?1, ?2)")?;
          for (title, values) in DEFAULT_VOCABULARY {
            for value in *values {
              stmt.execute(rusqlite::params![title, value])?;
            }
          }
        }
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if seeded {
      tracing::info!("installed default tag vocabulary");
    }
    Ok(())
  }

  /// Run a summary query (listing or search) for one page.
  async fn summaries(
    &self,
    predicate: Predicate,
    page: u32,
    page_size: NonZeroU32,
  ) -> Result<Vec<AquariumSummary>> {
    let (limit, offset) = limit_offset(page, page_size);
    let sql = format!(
      "{SUMMARY_SELECT} {} ORDER BY a.id DESC LIMIT ? OFFSET ?",
      predicate.where_clause()
    );
    let mut params = predicate.into_params();
    params.push(Value::Integer(limit));
    params.push(Value::Integer(offset));

    let raws: Vec<RawSummary> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawSummary::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSummary::into_summary).collect()
  }

  async fn count_matching(&self, predicate: Predicate) -> Result<u64> {
    let sql = format!("{COUNT_SELECT} {}", predicate.where_clause());
    let params = predicate.into_params();

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(&sql, rusqlite::params_from_iter(params), |r| r.get(0))?)
      })
      .await?;

    decode_u64("count", count)
  }

  /// Run a single-value `COUNT(*)` keyed by one id.
  async fn count_by(&self, sql: &'static str, id: i64) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(move |conn| Ok(conn.query_row(sql, [id], |r| r.get(0))?))
      .await?;
    decode_u64("count", count)
  }

  async fn aquarium_exists(&self, id: i64) -> Result<bool> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row("SELECT 1 FROM aquariums WHERE id = ?1", [id], |_| Ok(()))
              .optional()?
              .is_some(),
          )
        })
        .await?,
    )
  }

  /// Write the aquarium's tag rows, replacing any existing ones.
  fn replace_tags(
    tx: &rusqlite::Transaction<'_>,
    aquarium_id: i64,
    tags: &[TagAssignment],
  ) -> rusqlite::Result<()> {
    tx.execute(
      "DELETE FROM aquarium_classes WHERE aquarium_id = ?1",
      [aquarium_id],
    )?;
    let mut stmt = tx.prepare(
      "INSERT INTO aquarium_classes (aquarium_id, title, value) VALUES (?1, ?2, ?3)",
    )?;
    for tag in tags {
      stmt.execute(rusqlite::params![aquarium_id, tag.title, tag.value])?;
    }
    Ok(())
  }
}

/// `true` if `e` is a UNIQUE constraint violation.
fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.code == rusqlite::ErrorCode::ConstraintViolation
        && f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

// ─── AquariumStore impl ──────────────────────────────────────────────────────

impl AquariumStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, username: String, password_hash: String) -> Result<User> {
    let name = username.clone();
    let id: Option<i64> = self
      .conn
      .call(move |conn| {
        match conn.execute(
          "INSERT INTO users (username, password_hash) VALUES (?1, ?2)",
          rusqlite::params![name, password_hash],
        ) {
          Ok(_) => Ok(Some(conn.last_insert_rowid())),
          Err(e) if is_unique_violation(&e) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    let id = id.ok_or_else(|| aquadex_core::Error::UsernameTaken(username.clone()))?;
    tracing::info!(user_id = id, %username, "user registered");
    Ok(User { id, username })
  }

  async fn find_credentials(&self, username: String) -> Result<Option<Credentials>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT id, username, password_hash FROM users WHERE username = ?1",
                [username],
                |row| {
                  Ok(Credentials {
                    user:          User { id: row.get(0)?, username: row.get(1)? },
                    password_hash: row.get(2)?,
                  })
                },
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn get_user(&self, id: i64) -> Result<Option<User>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT id, username FROM users WHERE id = ?1",
                [id],
                |row| Ok(User { id: row.get(0)?, username: row.get(1)? }),
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn user_aquariums(&self, user_id: i64) -> Result<Vec<UserAquarium>> {
    let rows: Vec<(i64, String, i64)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, name, volume FROM aquariums WHERE user_id = ?1 ORDER BY id DESC",
        )?;
        let rows = stmt
          .query_map([user_id], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(id, name, volume)| {
        Ok(UserAquarium { id, name, volume: decode_u32("volume", volume)? })
      })
      .collect()
  }

  // ── Aquariums ─────────────────────────────────────────────────────────────

  async fn add_aquarium(&self, owner_id: i64, input: AquariumInput) -> Result<i64> {
    self.vocabulary().await?.validate(&input.tags)?;

    let volume = input.volume_liters();
    let dims = input.dimensions;
    let date = encode_date(input.date);
    let AquariumInput { name, description, tags, .. } = input;

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO aquariums
             (user_id, name, length, depth, height, volume, date, description)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            owner_id,
            name,
            dims.length,
            dims.depth,
            dims.height,
            volume,
            date,
            description,
          ],
        )?;
        let id = tx.last_insert_rowid();
        Self::replace_tags(&tx, id, &tags)?;
        tx.commit()?;
        Ok(id)
      })
      .await?;

    tracing::info!(aquarium_id = id, owner_id, volume, "aquarium created");
    Ok(id)
  }

  async fn get_aquarium(&self, id: i64) -> Result<Option<Aquarium>> {
    let raw: Option<RawAquarium> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT a.id, u.id, u.username, a.name, a.length, a.depth,
                      a.height, a.volume, a.date, a.description
                 FROM aquariums a
                 JOIN users u ON a.user_id = u.id
                WHERE a.id = ?1",
              [id],
              RawAquarium::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAquarium::into_aquarium).transpose()
  }

  async fn update_aquarium(&self, id: i64, input: AquariumInput) -> Result<()> {
    self.vocabulary().await?.validate(&input.tags)?;

    let volume = input.volume_liters();
    let dims = input.dimensions;
    let date = encode_date(input.date);
    let AquariumInput { name, description, tags, .. } = input;

    let updated = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE aquariums
              SET name = ?1, length = ?2, depth = ?3, height = ?4,
                  volume = ?5, date = ?6, description = ?7
            WHERE id = ?8",
          rusqlite::params![
            name,
            dims.length,
            dims.depth,
            dims.height,
            volume,
            date,
            description,
            id,
          ],
        )?;
        if changed == 0 {
          return Ok(false);
        }
        Self::replace_tags(&tx, id, &tags)?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !updated {
      return Err(aquadex_core::Error::AquariumNotFound(id).into());
    }
    tracing::info!(aquarium_id = id, volume, "aquarium updated");
    Ok(())
  }

  async fn remove_aquarium(&self, id: i64) -> Result<()> {
    let removed = self
      .conn
      .call(move |conn| Ok(conn.execute("DELETE FROM aquariums WHERE id = ?1", [id])?))
      .await?;

    if removed == 0 {
      return Err(aquadex_core::Error::AquariumNotFound(id).into());
    }
    tracing::info!(aquarium_id = id, "aquarium removed");
    Ok(())
  }

  async fn vocabulary(&self) -> Result<Vocabulary> {
    let rows: Vec<(String, String)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT title, value FROM classes ORDER BY id")?;
        let rows = stmt
          .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(Vocabulary::from_rows(rows))
  }

  async fn selected_tags(&self, aquarium_id: i64) -> Result<Vec<TagAssignment>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          let mut stmt = conn.prepare(
            "SELECT title, value FROM aquarium_classes WHERE aquarium_id = ?1 ORDER BY id",
          )?;
          let rows = stmt
            .query_map([aquarium_id], |r| {
              Ok(TagAssignment { title: r.get(0)?, value: r.get(1)? })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  // ── Listings ──────────────────────────────────────────────────────────────

  async fn count_aquariums(&self) -> Result<u64> {
    self.count_matching(Predicate::default()).await
  }

  async fn aquariums_page(
    &self,
    page: u32,
    page_size: NonZeroU32,
  ) -> Result<Vec<AquariumSummary>> {
    self.summaries(Predicate::default(), page, page_size).await
  }

  async fn count_search_results(&self, filters: &SearchFilters) -> Result<u64> {
    let predicate = Predicate::build(filters);
    if predicate.is_vacuous() {
      return Ok(0);
    }
    tracing::debug!(predicate = %predicate.sql(), "counting search results");
    self.count_matching(predicate).await
  }

  async fn search_page(
    &self,
    filters: &SearchFilters,
    page: u32,
    page_size: NonZeroU32,
  ) -> Result<Vec<AquariumSummary>> {
    let predicate = Predicate::build(filters);
    if predicate.is_vacuous() {
      return Ok(Vec::new());
    }
    tracing::debug!(predicate = %predicate.sql(), page, "fetching search page");
    self.summaries(predicate, page, page_size).await
  }

  // ── Critters ──────────────────────────────────────────────────────────────

  async fn add_critter(&self, aquarium_id: i64, input: CritterInput) -> Result<Critter> {
    let species = input.species.clone();
    let count = input.count;

    let inserted: Option<(i64, i64)> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let owner: Option<i64> = tx
          .query_row(
            "SELECT user_id FROM aquariums WHERE id = ?1",
            [aquarium_id],
            |r| r.get(0),
          )
          .optional()?;
        let Some(owner) = owner else { return Ok(None) };
        tx.execute(
          "INSERT INTO critters (aquarium_id, user_id, species, count)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![aquarium_id, owner, species, count],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Some((id, owner)))
      })
      .await?;

    let (id, owner_id) =
      inserted.ok_or(aquadex_core::Error::AquariumNotFound(aquarium_id))?;
    tracing::info!(critter_id = id, aquarium_id, "critter added");
    Ok(Critter {
      id,
      aquarium_id,
      owner_id,
      species: input.species,
      count: input.count,
    })
  }

  async fn get_critters(&self, aquarium_id: i64) -> Result<Vec<Critter>> {
    let raws: Vec<RawCritter> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, aquarium_id, user_id, species, count
             FROM critters
            WHERE aquarium_id = ?1
            ORDER BY species, id",
        )?;
        let rows = stmt
          .query_map([aquarium_id], RawCritter::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCritter::into_critter).collect()
  }

  async fn get_critter(&self, id: i64) -> Result<Option<Critter>> {
    let raw: Option<RawCritter> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, aquarium_id, user_id, species, count FROM critters WHERE id = ?1",
              [id],
              RawCritter::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCritter::into_critter).transpose()
  }

  async fn update_critter(
    &self,
    id: i64,
    aquarium_id: i64,
    input: CritterInput,
  ) -> Result<()> {
    if !self.aquarium_exists(aquarium_id).await? {
      return Err(aquadex_core::Error::AquariumNotFound(aquarium_id).into());
    }

    let CritterInput { species, count } = input;
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE critters
              SET species = ?1,
                  count = ?2,
                  aquarium_id = ?3,
                  user_id = (SELECT user_id FROM aquariums WHERE id = ?3)
            WHERE id = ?4",
          rusqlite::params![species, count, aquarium_id, id],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(aquadex_core::Error::CritterNotFound(id).into());
    }
    tracing::info!(critter_id = id, aquarium_id, "critter updated");
    Ok(())
  }

  async fn remove_critter(&self, id: i64) -> Result<()> {
    let removed = self
      .conn
      .call(move |conn| Ok(conn.execute("DELETE FROM critters WHERE id = ?1", [id])?))
      .await?;

    if removed == 0 {
      return Err(aquadex_core::Error::CritterNotFound(id).into());
    }
    Ok(())
  }

  async fn remove_critters(&self, aquarium_id: i64) -> Result<u64> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM critters WHERE aquarium_id = ?1", [aquarium_id])?)
      })
      .await?;

    tracing::info!(aquarium_id, removed, "critters removed");
    Ok(removed as u64)
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  async fn add_comment(
    &self,
    aquarium_id: i64,
    author_id: i64,
    content: String,
  ) -> Result<Comment> {
    if !self.aquarium_exists(aquarium_id).await? {
      return Err(aquadex_core::Error::AquariumNotFound(aquarium_id).into());
    }

    let sent_at = Utc::now();
    let sent_at_str = encode_dt(sent_at);
    let text = content.clone();

    let (id, author_name): (i64, String) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO comments (aquarium_id, user_id, content, sent_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![aquarium_id, author_id, text, sent_at_str],
        )?;
        let id = tx.last_insert_rowid();
        let author: String =
          tx.query_row("SELECT username FROM users WHERE id = ?1", [author_id], |r| {
            r.get(0)
          })?;
        tx.commit()?;
        Ok((id, author))
      })
      .await?;

    tracing::info!(comment_id = id, aquarium_id, author_id, "comment added");
    Ok(Comment { id, aquarium_id, author_id, author_name, content, sent_at })
  }

  async fn newest_comments(&self, aquarium_id: i64, limit: u32) -> Result<Vec<Comment>> {
    let sql = format!("{COMMENT_SELECT} WHERE c.aquarium_id = ?1 ORDER BY c.id DESC LIMIT ?2");
    let raws: Vec<RawComment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![aquarium_id, limit], RawComment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawComment::into_comment).collect()
  }

  async fn count_comments(&self, aquarium_id: i64) -> Result<u64> {
    self
      .count_by("SELECT COUNT(*) FROM comments WHERE aquarium_id = ?1", aquarium_id)
      .await
  }

  async fn comments_page(
    &self,
    aquarium_id: i64,
    page: u32,
    page_size: NonZeroU32,
  ) -> Result<Vec<Comment>> {
    let (limit, offset) = limit_offset(page, page_size);
    let sql = format!(
      "{COMMENT_SELECT} WHERE c.aquarium_id = ?1 ORDER BY c.id DESC LIMIT ?2 OFFSET ?3"
    );
    let raws: Vec<RawComment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![aquarium_id, limit, offset],
            RawComment::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawComment::into_comment).collect()
  }

  async fn get_comment(&self, id: i64) -> Result<Option<Comment>> {
    let sql = format!("{COMMENT_SELECT} WHERE c.id = ?1");
    let raw: Option<RawComment> = self
      .conn
      .call(move |conn| Ok(conn.query_row(&sql, [id], RawComment::from_row).optional()?))
      .await?;

    raw.map(RawComment::into_comment).transpose()
  }

  async fn remove_comment(&self, id: i64) -> Result<()> {
    let removed = self
      .conn
      .call(move |conn| Ok(conn.execute("DELETE FROM comments WHERE id = ?1", [id])?))
      .await?;

    if removed == 0 {
      return Err(aquadex_core::Error::CommentNotFound(id).into());
    }
    Ok(())
  }

  // ── Images ────────────────────────────────────────────────────────────────

  async fn add_image(&self, aquarium_id: i64, image: ImageData) -> Result<i64> {
    if !self.aquarium_exists(aquarium_id).await? {
      return Err(aquadex_core::Error::AquariumNotFound(aquarium_id).into());
    }

    let ImageData { bytes, mime } = image;
    let (id, promoted) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO images (aquarium_id, image, file_type) VALUES (?1, ?2, ?3)",
          rusqlite::params![aquarium_id, bytes, mime],
        )?;
        let id = tx.last_insert_rowid();
        let count: i64 = tx.query_row(
          "SELECT COUNT(id) FROM images WHERE aquarium_id = ?1",
          [aquarium_id],
          |r| r.get(0),
        )?;
        // Only the first image is promoted; a cleared main image stays cleared.
        let promoted = count == 1
          && tx.execute(
            "INSERT INTO main_images (aquarium_id, image_id) VALUES (?1, ?2)
             ON CONFLICT(aquarium_id) DO NOTHING",
            rusqlite::params![aquarium_id, id],
          )? > 0;
        tx.commit()?;
        Ok((id, promoted))
      })
      .await?;

    tracing::info!(image_id = id, aquarium_id, promoted, "image added");
    Ok(id)
  }

  async fn count_images(&self, aquarium_id: i64) -> Result<u64> {
    self
      .count_by("SELECT COUNT(id) FROM images WHERE aquarium_id = ?1", aquarium_id)
      .await
  }

  async fn image_ids(&self, aquarium_id: i64) -> Result<Vec<i64>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          let mut stmt =
            conn.prepare("SELECT id FROM images WHERE aquarium_id = ?1 ORDER BY id")?;
          let ids = stmt
            .query_map([aquarium_id], |r| r.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
          Ok(ids)
        })
        .await?,
    )
  }

  async fn get_image(&self, id: i64) -> Result<Option<ImageRef>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT id, aquarium_id FROM images WHERE id = ?1",
                [id],
                |r| Ok(ImageRef { id: r.get(0)?, aquarium_id: r.get(1)? }),
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn get_image_data(&self, id: i64) -> Result<Option<ImageData>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT image, file_type FROM images WHERE id = ?1",
                [id],
                |r| Ok(ImageData { bytes: r.get(0)?, mime: r.get(1)? }),
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn set_main_image(&self, aquarium_id: i64, image_id: i64) -> Result<()> {
    let set = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let belongs = tx
          .query_row(
            "SELECT 1 FROM images WHERE id = ?1 AND aquarium_id = ?2",
            [image_id, aquarium_id],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if !belongs {
          return Ok(false);
        }
        tx.execute(
          "INSERT INTO main_images (aquarium_id, image_id) VALUES (?1, ?2)
           ON CONFLICT(aquarium_id) DO UPDATE SET image_id = excluded.image_id",
          [aquarium_id, image_id],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !set {
      return Err(aquadex_core::Error::ImageNotFound(image_id).into());
    }
    tracing::info!(aquarium_id, image_id, "main image set");
    Ok(())
  }

  async fn main_image(&self, aquarium_id: i64) -> Result<Option<i64>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT image_id FROM main_images WHERE aquarium_id = ?1",
                [aquarium_id],
                |r| r.get(0),
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn remove_main_image(&self, aquarium_id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM main_images WHERE aquarium_id = ?1", [aquarium_id])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn oldest_image(&self, aquarium_id: i64) -> Result<Option<i64>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT id FROM images WHERE aquarium_id = ?1 ORDER BY id LIMIT 1",
                [aquarium_id],
                |r| r.get(0),
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn remove_images(&self, image_ids: Vec<i64>, aquarium_id: i64) -> Result<u64> {
    if image_ids.is_empty() {
      return Ok(0);
    }

    let (removed, main) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let main: Option<i64> = tx
          .query_row(
            "SELECT image_id FROM main_images WHERE aquarium_id = ?1",
            [aquarium_id],
            |r| r.get(0),
          )
          .optional()?;
        let main_removed = main.is_some_and(|m| image_ids.contains(&m));

        // The pointer must go before the image it references.
        if main_removed {
          tx.execute("DELETE FROM main_images WHERE aquarium_id = ?1", [aquarium_id])?;
        }

        let mut removed = 0;
        {
          let mut stmt =
            tx.prepare("DELETE FROM images WHERE id = ?1 AND aquarium_id = ?2")?;
          for id in &image_ids {
            removed += stmt.execute([*id, aquarium_id])?;
          }
        }

        let mut main_after = if main_removed { None } else { main };
        if main_removed {
          let oldest: Option<i64> = tx
            .query_row(
              "SELECT id FROM images WHERE aquarium_id = ?1 ORDER BY id LIMIT 1",
              [aquarium_id],
              |r| r.get(0),
            )
            .optional()?;
          if let Some(oldest) = oldest {
            tx.execute(
              "INSERT INTO main_images (aquarium_id, image_id) VALUES (?1, ?2)",
              [aquarium_id, oldest],
            )?;
            main_after = Some(oldest);
          }
        }

        tx.commit()?;
        Ok((removed as u64, main_after))
      })
      .await?;

    tracing::info!(aquarium_id, removed, main_image = ?main, "images removed");
    Ok(removed)
  }

  async fn remove_all_images(&self, aquarium_id: i64) -> Result<u64> {
    let removed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM main_images WHERE aquarium_id = ?1", [aquarium_id])?;
        let removed = tx.execute("DELETE FROM images WHERE aquarium_id = ?1", [aquarium_id])?;
        tx.commit()?;
        Ok(removed as u64)
      })
      .await?;

    tracing::info!(aquarium_id, removed, "all images removed");
    Ok(removed)
  }
}

// ─── Rollback ────────────────────────────────────────────────────────────────
