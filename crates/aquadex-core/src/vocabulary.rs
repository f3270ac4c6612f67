//! Classification tags and the vocabulary of permitted title/value pairs.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Vocabulary installed into an empty database.
pub const DEFAULT_VOCABULARY: &[(&str, &[&str])] = &[
  ("Vesi", &["makea vesi", "murtovesi", "merivesi"]),
  ("Lämpötila", &["trooppinen", "lauhkea", "kylmä"]),
  ("Tyyppi", &[
    "vain kaloja",
    "vain selkärangattomia",
    "lajiakvaario",
    "riutta-akvaario",
    "kasviakvaario",
    "biotooppi",
    "aquascape",
  ]),
  ("Tekniikka", &["high tech", "low tech"]),
];

/// One tag assigned to an aquarium.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagAssignment {
  pub title: String,
  pub value: String,
}

impl TagAssignment {
  pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
    Self { title: title.into(), value: value.into() }
  }
}

/// A tag title together with its allowed values, in vocabulary order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagTitle {
  pub title:  String,
  pub values: Vec<String>,
}

/// The typed title → permitted-values mapping.
///
/// Built from the `classes` table rows for each validation; never cached
/// globally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Vocabulary {
  titles: Vec<TagTitle>,
}

impl Vocabulary {
  /// Group `(title, value)` rows, preserving first-seen order.
  pub fn from_rows<I, T, V>(rows: I) -> Self
  where
    I: IntoIterator<Item = (T, V)>,
    T: Into<String>,
    V: Into<String>,
  {
    let mut titles: Vec<TagTitle> = Vec::new();
    for (title, value) in rows {
      let title = title.into();
      let value = value.into();
      match titles.iter_mut().find(|t| t.title == title) {
        Some(entry) => entry.values.push(value),
        None => titles.push(TagTitle { title, values: vec![value] }),
      }
    }
    Self { titles }
  }

  pub fn default_vocabulary() -> Self {
    Self::from_rows(
      DEFAULT_VOCABULARY
        .iter()
        .flat_map(|(title, values)| values.iter().map(move |v| (*title, *v))),
    )
  }

  pub fn titles(&self) -> &[TagTitle] { &self.titles }

  pub fn values(&self, title: &str) -> Option<&[String]> {
    self
      .titles
      .iter()
      .find(|t| t.title == title)
      .map(|t| t.values.as_slice())
  }

  pub fn allows(&self, title: &str, value: &str) -> bool {
    self.values(title).is_some_and(|vs| vs.iter().any(|v| v == value))
  }

  /// Every tag must be a permitted pair and each title may appear once.
  pub fn validate(&self, tags: &[TagAssignment]) -> Result<()> {
    let mut seen = HashSet::new();
    for tag in tags {
      if self.values(&tag.title).is_none() {
        return Err(Error::validation(format!("unknown tag title {:?}", tag.title)));
      }
      if !self.allows(&tag.title, &tag.value) {
        return Err(Error::validation(format!(
          "{:?} is not a valid value for {:?}",
          tag.value, tag.title
        )));
      }
      if !seen.insert(tag.title.as_str()) {
        return Err(Error::validation(format!(
          "tag {:?} given more than once",
          tag.title
        )));
      }
    }
    Ok(())
  }
}
