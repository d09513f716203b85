//! Repository traits for the movie catalog storage layer.
//!
//! Implementations must be thread-safe (`Send + Sync`). Every method is an
//! async suspension point; request cancellation is delivered by dropping
//! the future, so implementations must not detach work that outlives the
//! call.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use reelvault_core::{ListOptions, Movie, MovieRating};

use crate::error::StorageError;

/// Persistence contract for movies.
///
/// Read methods accept the requesting user's id so the returned movies can
/// carry both the aggregate rating and that user's own rating.
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Inserts a movie together with its genres.
    ///
    /// Returns `true` when the row was written.
    ///
    /// # Errors
    ///
    /// Returns an error for infrastructure issues only; slug uniqueness is
    /// enforced by validation before this is called, and defensively by the
    /// backend's unique index.
    async fn create(&self, movie: &Movie) -> Result<bool, StorageError>;

    /// Fetches a movie by id, rating fields populated for `user_id`.
    ///
    /// Returns `None` if the movie does not exist.
    async fn get_by_id(&self, id: Uuid, user_id: Option<Uuid>)
    -> Result<Option<Movie>, StorageError>;

    /// Fetches a movie by slug, rating fields populated for `user_id`.
    ///
    /// Returns `None` if the movie does not exist.
    async fn get_by_slug(
        &self,
        slug: &str,
        user_id: Option<Uuid>,
    ) -> Result<Option<Movie>, StorageError>;

    /// Lists movies filtered, sorted, and paged per `options`, with each
    /// movie's rating fields populated for `options.user_id`.
    async fn get_all(&self, options: &ListOptions) -> Result<Vec<Movie>, StorageError>;

    /// Counts movies matching the title/year filters, ignoring pagination.
    async fn get_count(
        &self,
        title: Option<&str>,
        year_of_release: Option<i32>,
    ) -> Result<u64, StorageError>;

    /// Replaces a movie's title, year, and genres. The id is preserved.
    ///
    /// Returns `false` when no movie with that id exists.
    async fn update(&self, movie: &Movie) -> Result<bool, StorageError>;

    /// Deletes a movie and its genres and ratings.
    ///
    /// Returns `false` when no movie with that id exists.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StorageError>;

    /// Returns whether a movie with the given id exists.
    async fn exists_by_id(&self, id: Uuid) -> Result<bool, StorageError>;
}

/// Persistence contract for per-user movie ratings.
#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// Upserts the user's rating for a movie.
    ///
    /// Returns `true` when a row was written.
    async fn rate_movie(
        &self,
        movie_id: Uuid,
        rating: i32,
        user_id: Uuid,
    ) -> Result<bool, StorageError>;

    /// Average rating for a movie, if any ratings exist.
    async fn get_rating(&self, movie_id: Uuid) -> Result<Option<f32>, StorageError>;

    /// Average rating plus the given user's own rating for a movie.
    async fn get_user_rating(
        &self,
        movie_id: Uuid,
        user_id: Uuid,
    ) -> Result<(Option<f32>, Option<i32>), StorageError>;

    /// Removes the user's rating for a movie.
    ///
    /// Returns `false` when the user had not rated that movie.
    async fn delete_rating(&self, movie_id: Uuid, user_id: Uuid) -> Result<bool, StorageError>;

    /// All ratings the user has given, joined with each movie's slug.
    async fn get_ratings_for_user(&self, user_id: Uuid)
    -> Result<Vec<MovieRating>, StorageError>;
}

/// Type alias for a shareable movie repository.
pub type DynMovieRepository = Arc<dyn MovieRepository>;

/// Type alias for a shareable rating repository.
pub type DynRatingRepository = Arc<dyn RatingRepository>;

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time test that MovieRepository is object-safe
    fn _assert_movie_repository_object_safe(_: &dyn MovieRepository) {}

    // Compile-time test that RatingRepository is object-safe
    fn _assert_rating_repository_object_safe(_: &dyn RatingRepository) {}
}
