//! Repository contract for the reelvault movie catalog.
//!
//! The traits in this crate are the persistence seam the rest of the
//! workspace depends on. `reelvault-db-postgres` implements them against
//! PostgreSQL; the in-memory backend here backs tests and local
//! development.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StorageError, StorageResult};
pub use memory::InMemoryStore;
pub use traits::{DynMovieRepository, DynRatingRepository, MovieRepository, RatingRepository};
