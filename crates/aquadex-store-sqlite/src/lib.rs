//! SQLite backend for the Aquadex aquarium catalog.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod filter;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use filter::Predicate;
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
