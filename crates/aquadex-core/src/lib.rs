//! Core types and trait definitions for the Aquadex aquarium catalog.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

pub mod age;
pub mod aquarium;
pub mod comment;
pub mod critter;
pub mod error;
pub mod filter;
pub mod image;
pub mod pagination;
pub mod store;
pub mod user;
pub mod vocabulary;

pub use error::{Error, Result};
