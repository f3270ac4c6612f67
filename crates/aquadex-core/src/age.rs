//! Elapsed time since an aquarium was set up, in whole years plus days.

use chrono::{Datelike as _, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Completed years since a date and the days since the most recent
/// anniversary.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
pub struct Age {
  pub years: u32,
  pub days:  u32,
}

impl Age {
  pub const ZERO: Age = Age { years: 0, days: 0 };
}

/// The `n`-th anniversary of `date`.
///
/// Month arithmetic clamps to the end of the month, so a Feb 29 date has its
/// anniversary on Feb 28 in non-leap years.
fn anniversary(date: NaiveDate, years: i32) -> Option<NaiveDate> {
  let months = u32::try_from(years).ok()?.checked_mul(12)?;
  date.checked_add_months(Months::new(months))
}

/// Age of `date` as seen on `today`. A missing or future date is zero.
pub fn age_between(date: Option<NaiveDate>, today: NaiveDate) -> Age {
  let Some(date) = date else { return Age::ZERO };
  if date > today {
    return Age::ZERO;
  }

  let mut years = today.year() - date.year();
  let mut last = anniversary(date, years);
  if last.is_none_or(|a| a > today) {
    years -= 1;
    last = anniversary(date, years);
  }

  match last {
    Some(last) => Age {
      years: u32::try_from(years).unwrap_or(0),
      days:  u32::try_from((today - last).num_days()).unwrap_or(0),
    },
    None => Age::ZERO,
  }
}

/// Age of `date` relative to the local current date.
pub fn age_today(date: Option<NaiveDate>) -> Age {
  age_between(date, Local::now().date_naive())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
  }

  #[test]
  fn missing_date_is_zero() {
    assert_eq!(age_between(None, d(2024, 5, 1)), Age::ZERO);
  }

  #[test]
  fn same_day_is_zero() {
    assert_eq!(age_between(Some(d(2024, 5, 1)), d(2024, 5, 1)), Age::ZERO);
  }

  #[test]
  fn exactly_one_year() {
    let age = age_between(Some(d(2023, 5, 1)), d(2024, 5, 1));
    assert_eq!(age, Age { years: 1, days: 0 });
  }

  #[test]
  fn day_before_anniversary() {
    let age = age_between(Some(d(2020, 6, 15)), d(2024, 6, 14));
    assert_eq!(age.years, 3);
    assert_eq!(age.days, 365);
  }

  #[test]
  fn days_since_anniversary() {
    let age = age_between(Some(d(2021, 1, 10)), d(2024, 2, 9));
    assert_eq!(age, Age { years: 3, days: 30 });
  }

  #[test]
  fn leap_day_in_non_leap_year() {
    let born = d(2020, 2, 29);
    assert_eq!(age_between(Some(born), d(2023, 2, 27)), Age {
      years: 2,
      days:  364,
    });
    assert_eq!(age_between(Some(born), d(2023, 2, 28)), Age {
      years: 3,
      days:  0,
    });
    assert_eq!(age_between(Some(born), d(2023, 3, 1)), Age {
      years: 3,
      days:  1,
    });
  }

  #[test]
  fn leap_day_in_leap_year() {
    let age = age_between(Some(d(2020, 2, 29)), d(2024, 2, 29));
    assert_eq!(age, Age { years: 4, days: 0 });
  }

  #[test]
  fn future_date_is_zero() {
    assert_eq!(age_between(Some(d(2030, 1, 1)), d(2024, 1, 1)), Age::ZERO);
  }

  #[test]
  fn one_year_before_today() {
    let today = Local::now().date_naive();
    let year_ago = today.checked_sub_months(Months::new(12)).unwrap();
    let age = age_today(Some(year_ago));
    assert_eq!(age.years, 1);
    // Feb 29 minus twelve months lands on Feb 28.
    if !(today.month() == 2 && today.day() == 29) {
      assert_eq!(age.days, 0);
    }
  }
}
