//! Application services: orchestration between validation and storage.

use reelvault_core::{ListOptions, Movie, MovieRating};
use reelvault_storage::{DynMovieRepository, DynRatingRepository};
use uuid::Uuid;

use crate::error::ApiError;
use crate::validation::{MovieValidator, validate_rating};

/// Movie use-cases: create, read, update, delete.
#[derive(Clone)]
pub struct MovieService {
    movies: DynMovieRepository,
    ratings: DynRatingRepository,
    validator: MovieValidator,
}

impl MovieService {
    pub fn new(movies: DynMovieRepository, ratings: DynRatingRepository) -> Self {
        let validator = MovieValidator::new(movies.clone());
        Self {
            movies,
            ratings,
            validator,
        }
    }

    pub async fn create(&self, movie: &Movie) -> Result<bool, ApiError> {
        self.validator.validate(movie).await?;
        Ok(self.movies.create(movie).await?)
    }

    pub async fn get_by_id(
        &self,
        id: Uuid,
        user_id: Option<Uuid>,
    ) -> Result<Option<Movie>, ApiError> {
        Ok(self.movies.get_by_id(id, user_id).await?)
    }

    pub async fn get_by_slug(
        &self,
        slug: &str,
        user_id: Option<Uuid>,
    ) -> Result<Option<Movie>, ApiError> {
        Ok(self.movies.get_by_slug(slug, user_id).await?)
    }

    pub async fn get_all(&self, options: &ListOptions) -> Result<Vec<Movie>, ApiError> {
        Ok(self.movies.get_all(options).await?)
    }

    pub async fn get_count(&self, options: &ListOptions) -> Result<u64, ApiError> {
        Ok(self
            .movies
            .get_count(options.title.as_deref(), options.year_of_release)
            .await?)
    }

    /// Updates a movie in place. Returns the stored movie with rating
    /// fields refreshed, or `None` when the id is unknown.
    pub async fn update(
        &self,
        movie: &Movie,
        user_id: Option<Uuid>,
    ) -> Result<Option<Movie>, ApiError> {
        self.validator.validate(movie).await?;

        if !self.movies.update(movie).await? {
            return Ok(None);
        }

        let mut updated = movie.clone();
        match user_id {
            Some(user_id) => {
                let (rating, user_rating) =
                    self.ratings.get_user_rating(movie.id, user_id).await?;
                updated.rating = rating;
                updated.user_rating = user_rating;
            }
            None => {
                updated.rating = self.ratings.get_rating(movie.id).await?;
                updated.user_rating = None;
            }
        }
        Ok(Some(updated))
    }

    pub async fn delete_by_id(&self, id: Uuid) -> Result<bool, ApiError> {
        Ok(self.movies.delete_by_id(id).await?)
    }
}

/// Rating use-cases.
#[derive(Clone)]
pub struct RatingService {
    movies: DynMovieRepository,
    ratings: DynRatingRepository,
}

impl RatingService {
    pub fn new(movies: DynMovieRepository, ratings: DynRatingRepository) -> Self {
        Self { movies, ratings }
    }

    /// Rates a movie on behalf of a user. Returns `false` when the movie
    /// does not exist.
    pub async fn rate_movie(
        &self,
        movie_id: Uuid,
        rating: i32,
        user_id: Uuid,
    ) -> Result<bool, ApiError> {
        validate_rating(rating)?;

        if !self.movies.exists_by_id(movie_id).await? {
            return Ok(false);
        }
        Ok(self.ratings.rate_movie(movie_id, rating, user_id).await?)
    }

    pub async fn delete_rating(&self, movie_id: Uuid, user_id: Uuid) -> Result<bool, ApiError> {
        Ok(self.ratings.delete_rating(movie_id, user_id).await?)
    }

    pub async fn get_ratings_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<MovieRating>, ApiError> {
        Ok(self.ratings.get_ratings_for_user(user_id).await?)
    }
}
