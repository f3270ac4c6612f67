//! Aquarium records: dimensions, derived volume and the read models returned
//! by the store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, age::Age, vocabulary::TagAssignment};

pub const MAX_NAME_CHARS: usize = 50;
pub const MAX_DESCRIPTION_CHARS: usize = 5000;
pub const MAX_DIMENSION_CM: u32 = 9999;

// ─── Dimensions ──────────────────────────────────────────────────────────────

/// Inner tank dimensions in centimetres, each in `1..=9999`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
  pub length: u32,
  pub depth:  u32,
  pub height: u32,
}

impl Dimensions {
  pub fn new(length: u32, depth: u32, height: u32) -> Result<Self> {
    for value in [length, depth, height] {
      if !(1..=MAX_DIMENSION_CM).contains(&value) {
        return Err(dimension_error());
      }
    }
    Ok(Self { length, depth, height })
  }

  /// Volume in whole litres: `floor(l * d * h / 1000)`.
  pub fn volume_liters(&self) -> u32 {
    let cm3 = u64::from(self.length) * u64::from(self.depth) * u64::from(self.height);
    // 9999^3 / 1000 is below u32::MAX.
    (cm3 / 1000) as u32
  }
}

fn dimension_error() -> Error {
  Error::validation(format!(
    "dimensions must be integers from 1 to {MAX_DIMENSION_CM} cm"
  ))
}

// ─── Input ───────────────────────────────────────────────────────────────────

/// Validated input to [`crate::store::AquariumStore::add_aquarium`] and
/// [`crate::store::AquariumStore::update_aquarium`].
///
/// Tags are checked against the vocabulary by the store at write time.
#[derive(Debug, Clone)]
pub struct AquariumInput {
  pub name:        String,
  pub dimensions:  Dimensions,
  pub date:        Option<NaiveDate>,
  pub description: String,
  pub tags:        Vec<TagAssignment>,
}

impl AquariumInput {
  pub fn new(
    name: impl Into<String>,
    dimensions: Dimensions,
    date: Option<NaiveDate>,
    description: impl Into<String>,
    tags: Vec<TagAssignment>,
  ) -> Result<Self> {
    let name = name.into();
    let description = description.into();

    if name.trim().is_empty() || name.chars().count() > MAX_NAME_CHARS {
      return Err(Error::validation(format!(
        "name is required and must be {MAX_NAME_CHARS} characters or less"
      )));
    }
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
      return Err(Error::validation(format!(
        "description must be {MAX_DESCRIPTION_CHARS} characters or less"
      )));
    }

    Ok(Self { name, dimensions, date, description, tags })
  }

  pub fn volume_liters(&self) -> u32 { self.dimensions.volume_liters() }
}

/// Parse an ISO `YYYY-MM-DD` calendar date; an empty string means no date.
pub fn parse_date(s: &str) -> Result<Option<NaiveDate>> {
  let s = s.trim();
  if s.is_empty() {
    return Ok(None);
  }
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map(Some)
    .map_err(|_| Error::validation(format!("invalid date {s:?}, expected YYYY-MM-DD")))
}

// ─── Read models ─────────────────────────────────────────────────────────────

/// A single aquarium with its owner's username and derived age.
#[derive(Debug, Clone, Serialize)]
pub struct Aquarium {
  pub id:          i64,
  pub owner_id:    i64,
  pub owner_name:  String,
  pub name:        String,
  #[serde(flatten)]
  pub dimensions:  Dimensions,
  pub volume:      u32,
  pub date:        Option<NaiveDate>,
  pub description: String,
  pub age:         Age,
}

/// One row of a listing or search page.
#[derive(Debug, Clone, Serialize)]
pub struct AquariumSummary {
  pub id:                i64,
  pub name:              String,
  #[serde(flatten)]
  pub dimensions:        Dimensions,
  pub volume:            u32,
  pub date:              Option<NaiveDate>,
  pub owner_id:          i64,
  pub owner_name:        String,
  pub main_image_id:     Option<i64>,
  /// All assigned tags as `"title: value, title: value"`.
  pub tags:              String,
  pub comment_count:     u64,
  pub species_count:     u64,
  pub total_individuals: u64,
  pub age:               Age,
}

/// The short form shown on a user's page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserAquarium {
  pub id:     i64,
  pub name:   String,
  pub volume: u32,
}
