//! Search criteria for the aquarium search.
//!
//! [`SearchFilters`] is an immutable value: every criterion is optional and
//! independent. The storage backend turns it into a parameterised predicate.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{Error, Result, aquarium::parse_date};

/// Prefix of request parameters that select a tag value, e.g. `class_Vesi`.
pub const TAG_PARAM_PREFIX: &str = "class_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchFilters {
  /// Matched against aquarium name, description and owner username.
  pub query:         Option<String>,
  /// Matched against the species of any critter in the aquarium.
  pub species_query: Option<String>,
  /// Inclusive.
  pub volume_min:    Option<u32>,
  /// Inclusive.
  pub volume_max:    Option<u32>,
  /// Inclusive, compared as calendar dates.
  pub date_min:      Option<NaiveDate>,
  pub date_max:      Option<NaiveDate>,
  /// Tag title → required value. Each is matched independently.
  pub tags:          BTreeMap<String, String>,
}

impl SearchFilters {
  /// No criteria at all; a search with these filters has not been performed
  /// yet and yields nothing.
  pub fn is_empty(&self) -> bool { *self == Self::default() }

  /// Read criteria from query-string parameters. Empty values count as
  /// absent; unrelated keys (such as `page`) are ignored.
  pub fn from_params(params: &BTreeMap<String, String>) -> Result<Self> {
    let text = |key: &str| {
      params
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
    };

    let volume = |key: &str| -> Result<Option<u32>> {
      text(key)
        .map(|v| {
          v.parse::<u32>().map_err(|_| {
            Error::validation(format!("{key} must be a non-negative integer"))
          })
        })
        .transpose()
    };

    let date = |key: &str| -> Result<Option<NaiveDate>> {
      match text(key) {
        Some(v) => parse_date(&v),
        None => Ok(None),
      }
    };

    let tags = params
      .iter()
      .filter_map(|(key, value)| {
        let title = key.strip_prefix(TAG_PARAM_PREFIX)?;
        let value = value.trim();
        (!title.is_empty() && !value.is_empty())
          .then(|| (title.to_owned(), value.to_owned()))
      })
      .collect();

    Ok(Self {
      query: text("query"),
      species_query: text("species_query"),
      volume_min: volume("volume_min")?,
      volume_max: volume("volume_max")?,
      date_min: date("date_min")?,
      date_max: date("date_max")?,
      tags,
    })
  }

  /// The criteria as query-string pairs in a fixed order, for building
  /// canonical URLs.
  pub fn to_params(&self) -> Vec<(String, String)> {
    let mut out = Vec::new();
    if let Some(q) = &self.query {
      out.push(("query".to_owned(), q.clone()));
    }
    if let Some(q) = &self.species_query {
      out.push(("species_query".to_owned(), q.clone()));
    }
    if let Some(v) = self.volume_min {
      out.push(("volume_min".to_owned(), v.to_string()));
    }
    if let Some(v) = self.volume_max {
      out.push(("volume_max".to_owned(), v.to_string()));
    }
    if let Some(d) = self.date_min {
      out.push(("date_min".to_owned(), d.to_string()));
    }
    if let Some(d) = self.date_max {
      out.push(("date_max".to_owned(), d.to_string()));
    }
    for (title, value) in &self.tags {
      out.push((format!("{TAG_PARAM_PREFIX}{title}"), value.clone()));
    }
    out
  }
}
