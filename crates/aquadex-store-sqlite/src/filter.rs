//! Translation of [`SearchFilters`] into a parameterised SQL predicate.
//!
//! Every condition is a `&'static str` containing only `?` placeholders, so
//! user-supplied values can only ever reach SQLite as bound parameters. The
//! fragments refer to the `a` (aquariums) and `u` (owner) aliases used by
//! `schema::SUMMARY_SELECT` and `schema::COUNT_SELECT`.

use aquadex_core::filter::SearchFilters;
use rusqlite::types::Value;

const TEXT_MATCH: &str = "(a.name LIKE ? ESCAPE '\\' \
   OR a.description LIKE ? ESCAPE '\\' \
   OR u.username LIKE ? ESCAPE '\\')";

const SPECIES_MATCH: &str = "EXISTS (SELECT 1 FROM critters c \
   WHERE c.aquarium_id = a.id AND c.species LIKE ? ESCAPE '\\')";

const VOLUME_MIN: &str = "a.volume >= ?";
const VOLUME_MAX: &str = "a.volume <= ?";
const DATE_MIN: &str = "date(a.date) >= date(?)";
const DATE_MAX: &str = "date(a.date) <= date(?)";

/// Each tag constraint gets its own EXISTS so it is matched against its own
/// assignment row.
const TAG_MATCH: &str = "EXISTS (SELECT 1 FROM aquarium_classes ac \
   WHERE ac.aquarium_id = a.id AND ac.title = ? AND ac.value = ?)";

/// A conjunction of conditions plus the values bound to their placeholders,
/// in placeholder order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
  conditions: Vec<&'static str>,
  params:     Vec<Value>,
}

impl Predicate {
  pub fn build(filters: &SearchFilters) -> Self {
    let mut p = Self::default();

    if let Some(query) = &filters.query {
      let pattern = like_pattern(query);
      p.push(TEXT_MATCH, [
        Value::Text(pattern.clone()),
        Value::Text(pattern.clone()),
        Value::Text(pattern),
      ]);
    }

    if let Some(species) = &filters.species_query {
      p.push(SPECIES_MATCH, [Value::Text(like_pattern(species))]);
    }

    if let Some(min) = filters.volume_min {
      p.push(VOLUME_MIN, [Value::Integer(i64::from(min))]);
    }
    if let Some(max) = filters.volume_max {
      p.push(VOLUME_MAX, [Value::Integer(i64::from(max))]);
    }

    if let Some(min) = filters.date_min {
      p.push(DATE_MIN, [Value::Text(min.format("%Y-%m-%d").to_string())]);
    }
    if let Some(max) = filters.date_max {
      p.push(DATE_MAX, [Value::Text(max.format("%Y-%m-%d").to_string())]);
    }

    for (title, value) in &filters.tags {
      p.push(TAG_MATCH, [Value::Text(title.clone()), Value::Text(value.clone())]);
    }

    p
  }

  fn push<const N: usize>(&mut self, condition: &'static str, params: [Value; N]) {
    debug_assert_eq!(condition.matches('?').count(), N);
    self.conditions.push(condition);
    self.params.extend(params);
  }

  /// `true` when no criterion contributed a condition. Such a predicate
  /// matches every row, so callers treat it as "no search performed".
  pub fn is_vacuous(&self) -> bool { self.conditions.is_empty() }

  /// The conjunction, e.g. `a.volume >= ? AND a.volume <= ?`.
  pub fn sql(&self) -> String { self.conditions.join(" AND ") }

  /// `WHERE <conjunction>`, or an empty string for a vacuous predicate.
  pub fn where_clause(&self) -> String {
    if self.is_vacuous() {
      String::new()
    } else {
      format!("WHERE {}", self.sql())
    }
  }

  pub fn params(&self) -> &[Value] { &self.params }

  pub fn into_params(self) -> Vec<Value> { self.params }
}

/// `%text%` with LIKE metacharacters escaped for `ESCAPE '\'`.
fn like_pattern(text: &str) -> String {
  let escaped = text
    .replace('\\', "\\\\")
    .replace('%', "\\%")
    .replace('_', "\\_");
  format!("%{escaped}%")
}
