//! Core domain types for the reelvault movie catalog.
//!
//! This crate holds everything the rest of the workspace agrees on:
//! the [`Movie`] and rating models, the canonical [`ListOptions`] built
//! from raw query parameters, and the deterministic slug generator that
//! serves as the natural key for lookups and uniqueness checks.

pub mod error;
pub mod movie;
pub mod options;
pub mod slug;

pub use error::{CoreError, Result};
pub use movie::{Movie, MovieRating, Rating};
pub use options::{ListOptions, RawListQuery, SortField, SortOrder};
pub use slug::slugify;
