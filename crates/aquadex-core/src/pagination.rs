//! Page arithmetic for listings, search results and comment threads.
//!
//! Pages are 1-based. An out-of-range request is never corrected silently:
//! [`PageLayout::resolve`] tells the caller to redirect to the canonical page
//! instead, so a given listing + page always has exactly one URL and no query
//! ever runs with an OFFSET past the end of the result set.

use std::num::NonZeroU32;

use serde::Serialize;

/// `max(1, ceil(total / page_size))`; an empty result still has one page.
pub fn page_count(total: u64, page_size: NonZeroU32) -> u32 {
  let pages = total.div_ceil(u64::from(page_size.get())).max(1);
  u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Outcome of checking a requested page number against a [`PageLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
  /// The page is in range; render it.
  Serve(u32),
  /// The page is out of range; send the client to this page instead.
  Redirect(u32),
}

/// The shape of a paginated result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
  pub total:      u64,
  pub page_size:  NonZeroU32,
  pub page_count: u32,
}

impl PageLayout {
  pub fn new(total: u64, page_size: NonZeroU32) -> Self {
    Self { total, page_size, page_count: page_count(total, page_size) }
  }

  /// Clamp-by-redirect: below 1 goes to 1, past the end goes to the last page.
  pub fn resolve(&self, requested: i64) -> PageRequest {
    if requested < 1 {
      PageRequest::Redirect(1)
    } else if requested > i64::from(self.page_count) {
      PageRequest::Redirect(self.page_count)
    } else {
      // In range, so it fits in u32.
      PageRequest::Serve(requested as u32)
    }
  }

  /// Metadata for a served page.
  pub fn pagination(&self, page: u32) -> Pagination {
    Pagination {
      page,
      page_size: self.page_size.get(),
      total: self.total,
      page_count: self.page_count,
    }
  }
}

/// `(LIMIT, OFFSET)` for a 1-based page.
pub fn limit_offset(page: u32, page_size: NonZeroU32) -> (i64, i64) {
  let size = i64::from(page_size.get());
  (size, size * (i64::from(page.max(1)) - 1))
}

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
  /// Current page number (1-based).
  pub page:       u32,
  pub page_size:  u32,
  /// Total number of matching items across all pages.
  pub total:      u64,
  pub page_count: u32,
}
