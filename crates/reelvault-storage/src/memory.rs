//! In-memory repository backend.
//!
//! Backs the server test suite and local development. Filtering, sorting,
//! pagination, and rating aggregation follow the same semantics as the
//! PostgreSQL backend: title is a substring match, averages are rounded to
//! one decimal place, and pagination is applied after sorting.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use reelvault_core::{ListOptions, Movie, MovieRating, SortField, SortOrder, slugify};

use crate::error::StorageError;
use crate::traits::{MovieRepository, RatingRepository};

#[derive(Debug, Clone)]
struct MovieRow {
    id: Uuid,
    title: String,
    year_of_release: i32,
    genres: Vec<String>,
}

#[derive(Default)]
struct Inner {
    movies: Vec<MovieRow>,
    /// (user id, movie id) -> rating value
    ratings: HashMap<(Uuid, Uuid), i32>,
}

/// In-memory movie and rating store.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn average_rating(ratings: &HashMap<(Uuid, Uuid), i32>, movie_id: Uuid) -> Option<f32> {
    let values: Vec<i32> = ratings
        .iter()
        .filter(|((_, m), _)| *m == movie_id)
        .map(|(_, r)| *r)
        .collect();
    if values.is_empty() {
        return None;
    }
    let avg = values.iter().sum::<i32>() as f32 / values.len() as f32;
    // Round to one decimal, matching the SQL round(avg(rating), 1)
    Some((avg * 10.0).round() / 10.0)
}

fn to_movie(row: &MovieRow, inner: &Inner, user_id: Option<Uuid>) -> Movie {
    Movie {
        id: row.id,
        title: row.title.clone(),
        year_of_release: row.year_of_release,
        genres: row.genres.clone(),
        rating: average_rating(&inner.ratings, row.id),
        user_rating: user_id.and_then(|u| inner.ratings.get(&(u, row.id)).copied()),
    }
}

#[async_trait]
impl MovieRepository for InMemoryStore {
    async fn create(&self, movie: &Movie) -> Result<bool, StorageError> {
        let mut inner = self.inner.write().await;
        inner.movies.push(MovieRow {
            id: movie.id,
            title: movie.title.clone(),
            year_of_release: movie.year_of_release,
            genres: movie.genres.clone(),
        });
        Ok(true)
    }

    async fn get_by_id(
        &self,
        id: Uuid,
        user_id: Option<Uuid>,
    ) -> Result<Option<Movie>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner
            .movies
            .iter()
            .find(|m| m.id == id)
            .map(|row| to_movie(row, &inner, user_id)))
    }

    async fn get_by_slug(
        &self,
        slug: &str,
        user_id: Option<Uuid>,
    ) -> Result<Option<Movie>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner
            .movies
            .iter()
            .find(|m| slugify(&m.title, m.year_of_release) == slug)
            .map(|row| to_movie(row, &inner, user_id)))
    }

    async fn get_all(&self, options: &ListOptions) -> Result<Vec<Movie>, StorageError> {
        let inner = self.inner.read().await;

        let mut rows: Vec<&MovieRow> = inner
            .movies
            .iter()
            .filter(|m| {
                options
                    .title
                    .as_deref()
                    .is_none_or(|t| m.title.contains(t))
            })
            .filter(|m| {
                options
                    .year_of_release
                    .is_none_or(|y| m.year_of_release == y)
            })
            .collect();

        if let Some(field) = options.sort_field {
            match field {
                SortField::Title => rows.sort_by(|a, b| a.title.cmp(&b.title)),
                SortField::YearOfRelease => {
                    rows.sort_by_key(|m| m.year_of_release);
                }
            }
            if options.sort_order == SortOrder::Descending {
                rows.reverse();
            }
        }

        let movies = rows
            .into_iter()
            .skip(options.offset() as usize)
            .take(options.page_size as usize)
            .map(|row| to_movie(row, &inner, options.user_id))
            .collect();
        Ok(movies)
    }

    async fn get_count(
        &self,
        title: Option<&str>,
        year_of_release: Option<i32>,
    ) -> Result<u64, StorageError> {
        let inner = self.inner.read().await;
        let count = inner
            .movies
            .iter()
            .filter(|m| title.is_none_or(|t| m.title.contains(t)))
            .filter(|m| year_of_release.is_none_or(|y| m.year_of_release == y))
            .count();
        Ok(count as u64)
    }

    async fn update(&self, movie: &Movie) -> Result<bool, StorageError> {
        let mut inner = self.inner.write().await;
        match inner.movies.iter_mut().find(|m| m.id == movie.id) {
            Some(row) => {
                row.title = movie.title.clone();
                row.year_of_release = movie.year_of_release;
                row.genres = movie.genres.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StorageError> {
        let mut inner = self.inner.write().await;
        let before = inner.movies.len();
        inner.movies.retain(|m| m.id != id);
        let removed = inner.movies.len() < before;
        if removed {
            inner.ratings.retain(|(_, movie_id), _| *movie_id != id);
        }
        Ok(removed)
    }

    async fn exists_by_id(&self, id: Uuid) -> Result<bool, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner.movies.iter().any(|m| m.id == id))
    }
}

#[async_trait]
impl RatingRepository for InMemoryStore {
    async fn rate_movie(
        &self,
        movie_id: Uuid,
        rating: i32,
        user_id: Uuid,
    ) -> Result<bool, StorageError> {
        let mut inner = self.inner.write().await;
        inner.ratings.insert((user_id, movie_id), rating);
        Ok(true)
    }

    async fn get_rating(&self, movie_id: Uuid) -> Result<Option<f32>, StorageError> {
        let inner = self.inner.read().await;
        Ok(average_rating(&inner.ratings, movie_id))
    }

    async fn get_user_rating(
        &self,
        movie_id: Uuid,
        user_id: Uuid,
    ) -> Result<(Option<f32>, Option<i32>), StorageError> {
        let inner = self.inner.read().await;
        Ok((
            average_rating(&inner.ratings, movie_id),
            inner.ratings.get(&(user_id, movie_id)).copied(),
        ))
    }

    async fn delete_rating(&self, movie_id: Uuid, user_id: Uuid) -> Result<bool, StorageError> {
        let mut inner = self.inner.write().await;
        Ok(inner.ratings.remove(&(user_id, movie_id)).is_some())
    }

    async fn get_ratings_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<MovieRating>, StorageError> {
        let inner = self.inner.read().await;
        let mut ratings: Vec<MovieRating> = inner
            .ratings
            .iter()
            .filter(|((u, _), _)| *u == user_id)
            .filter_map(|((_, movie_id), rating)| {
                inner.movies.iter().find(|m| m.id == *movie_id).map(|m| MovieRating {
                    movie_id: *movie_id,
                    slug: slugify(&m.title, m.year_of_release),
                    rating: *rating,
                })
            })
            .collect();
        ratings.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(ratings)
    }
}
