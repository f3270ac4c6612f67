//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Calendar dates are stored as `YYYY-MM-DD`, timestamps as RFC 3339 strings,
//! and all counts and dimensions as INTEGER.

use aquadex_core::{
  age::age_today,
  aquarium::{Aquarium, AquariumSummary, Dimensions},
  comment::Comment,
  critter::Critter,
};
use chrono::{DateTime, NaiveDate, Utc};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: Option<NaiveDate>) -> Option<String> {
  d.map(|d| d.format("%Y-%m-%d").to_string())
}

/// NULL and the empty string both mean "no date".
pub fn decode_date(s: Option<&str>) -> Result<Option<NaiveDate>> {
  match s.map(str::trim) {
    None | Some("") => Ok(None),
    Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
      .map(Some)
      .map_err(|e| Error::DateParse(format!("{s:?}: {e}"))),
  }
}

// ─── Integers ────────────────────────────────────────────────────────────────

pub fn decode_u32(column: &'static str, value: i64) -> Result<u32> {
  u32::try_from(value).map_err(|_| Error::Corrupt { column, value })
}

pub fn decode_u64(column: &'static str, value: i64) -> Result<u64> {
  u64::try_from(value).map_err(|_| Error::Corrupt { column, value })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from an `aquariums` row joined with its owner.
pub struct RawAquarium {
  pub id:          i64,
  pub owner_id:    i64,
  pub owner_name:  String,
  pub name:        String,
  pub length:      i64,
  pub depth:       i64,
  pub height:      i64,
  pub volume:      i64,
  pub date:        Option<String>,
  pub description: String,
}

impl RawAquarium {
  /// Reads the columns of `SELECT a.id, u.id, u.username, a.name, a.length,
  /// a.depth, a.height, a.volume, a.date, a.description`.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      owner_id:    row.get(1)?,
      owner_name:  row.get(2)?,
      name:        row.get(3)?,
      length:      row.get(4)?,
      depth:       row.get(5)?,
      height:      row.get(6)?,
      volume:      row.get(7)?,
      date:        row.get(8)?,
      description: row.get(9)?,
    })
  }

  pub fn into_aquarium(self) -> Result<Aquarium> {
    let date = decode_date(self.date.as_deref())?;
    Ok(Aquarium {
      id: self.id,
      owner_id: self.owner_id,
      owner_name: self.owner_name,
      name: self.name,
      dimensions: decode_dimensions(self.length, self.depth, self.height)?,
      volume: decode_u32("volume", self.volume)?,
      date,
      description: self.description,
      age: age_today(date),
    })
  }
}

fn decode_dimensions(length: i64, depth: i64, height: i64) -> Result<Dimensions> {
  Ok(Dimensions {
    length: decode_u32("length", length)?,
    depth:  decode_u32("depth", depth)?,
    height: decode_u32("height", height)?,
  })
}

/// Raw values of one listing/search row; see `schema::SUMMARY_SELECT`.
pub struct RawSummary {
  pub id:                i64,
  pub name:              String,
  pub length:            i64,
  pub depth:             i64,
  pub height:            i64,
  pub volume:            i64,
  pub date:              Option<String>,
  pub owner_id:          i64,
  pub owner_name:        String,
  pub main_image_id:     Option<i64>,
  pub selected_classes:  Option<String>,
  pub comment_count:     i64,
  pub species_count:     i64,
  pub total_individuals: i64,
}

impl RawSummary {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                row.get(0)?,
      name:              row.get(1)?,
      length:            row.get(2)?,
      depth:             row.get(3)?,
      height:            row.get(4)?,
      volume:            row.get(5)?,
      date:              row.get(6)?,
      owner_id:          row.get(7)?,
      owner_name:        row.get(8)?,
      main_image_id:     row.get(9)?,
      selected_classes:  row.get(10)?,
      comment_count:     row.get(11)?,
      species_count:     row.get(12)?,
      total_individuals: row.get(13)?,
    })
  }

  pub fn into_summary(self) -> Result<AquariumSummary> {
    let date = decode_date(self.date.as_deref())?;
    Ok(AquariumSummary {
      id: self.id,
      name: self.name,
      dimensions: decode_dimensions(self.length, self.depth, self.height)?,
      volume: decode_u32("volume", self.volume)?,
      date,
      owner_id: self.owner_id,
      owner_name: self.owner_name,
      main_image_id: self.main_image_id,
      tags: self.selected_classes.unwrap_or_default(),
      comment_count: decode_u64("comment_count", self.comment_count)?,
      species_count: decode_u64("species_count", self.species_count)?,
      total_individuals: decode_u64("total_individuals", self.total_individuals)?,
      age: age_today(date),
    })
  }
}

/// Raw values of `SELECT id, aquarium_id, user_id, species, count FROM critters`.
pub struct RawCritter {
  pub id:          i64,
  pub aquarium_id: i64,
  pub owner_id:    i64,
  pub species:     String,
  pub count:       i64,
}

impl RawCritter {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      aquarium_id: row.get(1)?,
      owner_id:    row.get(2)?,
      species:     row.get(3)?,
      count:       row.get(4)?,
    })
  }

  pub fn into_critter(self) -> Result<Critter> {
    Ok(Critter {
      id:          self.id,
      aquarium_id: self.aquarium_id,
      owner_id:    self.owner_id,
      species:     self.species,
      count:       decode_u32("count", self.count)?,
    })
  }
}

/// Raw values of a comment row; see `schema::COMMENT_SELECT`.
pub struct RawComment {
  pub id:          i64,
  pub aquarium_id: i64,
  pub author_id:   i64,
  pub author_name: String,
  pub content:     String,
  pub sent_at:     String,
}

impl RawComment {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      aquarium_id: row.get(1)?,
      author_id:   row.get(2)?,
      author_name: row.get(3)?,
      content:     row.get(4)?,
      sent_at:     row.get(5)?,
    })
  }

  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      id:          self.id,
      aquarium_id: self.aquarium_id,
      author_id:   self.author_id,
      author_name: self.author_name,
      content:     self.content,
      sent_at:     decode_dt(&self.sent_at)?,
    })
  }
}
