//! Livestock entries kept in an aquarium.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const MAX_SPECIES_CHARS: usize = 100;
pub const MAX_CRITTER_COUNT: u32 = 9999;

/// A species and head count kept in an aquarium.
///
/// `owner_id` duplicates the aquarium's owner so ownership can be checked
/// without a join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Critter {
  pub id:          i64,
  pub aquarium_id: i64,
  pub owner_id:    i64,
  pub species:     String,
  pub count:       u32,
}

/// Validated species/count pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CritterInput {
  pub species: String,
  pub count:   u32,
}

impl CritterInput {
  pub fn new(species: impl Into<String>, count: u32) -> Result<Self> {
    let species = species.into().trim().to_owned();
    if species.is_empty() || species.chars().count() > MAX_SPECIES_CHARS {
      return Err(Error::validation(format!(
        "species is required and must be {MAX_SPECIES_CHARS} characters or less"
      )));
    }
    if !(1..=MAX_CRITTER_COUNT).contains(&count) {
      return Err(Error::validation(format!(
        "count must be an integer from 1 to {MAX_CRITTER_COUNT}"
      )));
    }
    Ok(Self { species, count })
  }
}
