//! In-process response cache for movie reads, with tag-based invalidation.

pub mod backend;
pub mod movies;

pub use backend::{CacheBackend, CacheStats, CachedEntry};
pub use movies::{MOVIES_TAG, MovieCache};
