//! Movie and rating domain models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::slug::slugify;

/// A movie record.
///
/// The `id` is opaque and immutable once created. The slug is not stored on
/// the struct; it is always derived from the current title and release year
/// via [`Movie::slug`], so an update that changes either field produces a
/// new slug rather than patching the old one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub year_of_release: i32,
    pub genres: Vec<String>,
    /// Average rating across all users, if any ratings exist.
    pub rating: Option<f32>,
    /// The requesting user's own rating, if authenticated and rated.
    pub user_rating: Option<i32>,
}

impl Movie {
    /// Creates a movie with a freshly generated id and no rating data.
    #[must_use]
    pub fn new(title: impl Into<String>, year_of_release: i32, genres: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            year_of_release,
            genres,
            rating: None,
            user_rating: None,
        }
    }

    /// The movie's URL-safe alternate key, derived from title and year.
    #[must_use]
    pub fn slug(&self) -> String {
        slugify(&self.title, self.year_of_release)
    }
}

/// A single user's rating of a movie. One row per (user, movie); writes
/// are upserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: Uuid,
    pub movie_id: Uuid,
    pub rating: i32,
}

/// A rating joined with the movie it belongs to, as returned by the
/// "ratings for user" listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRating {
    pub movie_id: Uuid,
    pub slug: String,
    pub rating: i32,
}
