//! Wire contracts: request and response bodies of the movie API.
//!
//! Responses derive `Deserialize` as well so cached MessagePack payloads
//! can be decoded back into the same types.

use reelvault_core::{ListOptions, Movie, MovieRating};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovieRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year_of_release: i32,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovieRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year_of_release: i32,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateMovieRequest {
    pub rating: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub year_of_release: i32,
    pub rating: Option<f32>,
    pub user_rating: Option<i32>,
    pub genres: Vec<String>,
}

impl From<Movie> for MovieResponse {
    fn from(movie: Movie) -> Self {
        let slug = movie.slug();
        Self {
            id: movie.id,
            title: movie.title,
            slug,
            year_of_release: movie.year_of_release,
            rating: movie.rating,
            user_rating: movie.user_rating,
            genres: movie.genres,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoviesResponse {
    pub items: Vec<MovieResponse>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl MoviesResponse {
    pub fn new(movies: Vec<Movie>, options: &ListOptions, total: u64) -> Self {
        Self {
            items: movies.into_iter().map(MovieResponse::from).collect(),
            page: options.page,
            page_size: options.page_size,
            total,
        }
    }

    /// Whether a page follows the one in this response.
    pub fn has_next_page(&self) -> bool {
        self.total > u64::from(self.page) * u64::from(self.page_size)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieRatingResponse {
    pub movie_id: Uuid,
    pub slug: String,
    pub rating: i32,
}

impl From<MovieRating> for MovieRatingResponse {
    fn from(rating: MovieRating) -> Self {
        Self {
            movie_id: rating.movie_id,
            slug: rating.slug,
            rating: rating.rating,
        }
    }
}

/// One failed validation rule, named after the offending property.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailureResponse {
    pub property_name: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub errors: Vec<ValidationFailureResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_response_carries_derived_slug() {
        let movie = Movie::new("The Matrix", 1999, vec!["Sci-Fi".into()]);
        let response = MovieResponse::from(movie);
        assert_eq!(response.slug, "the-matrix-1999");
    }

    #[test]
    fn test_movie_response_serializes_camel_case() {
        let movie = Movie::new("Heat", 1995, vec![]);
        let json = serde_json::to_value(MovieResponse::from(movie)).unwrap();
        assert!(json.get("yearOfRelease").is_some());
        assert!(json.get("userRating").is_some());
        assert!(json.get("year_of_release").is_none());
    }

    #[test]
    fn test_has_next_page() {
        let options = ListOptions::default();
        let page = MoviesResponse::new(vec![], &options, 25);
        assert!(page.has_next_page());
        let last = MoviesResponse::new(vec![], &options, 10);
        assert!(!last.has_next_page());
    }
}
