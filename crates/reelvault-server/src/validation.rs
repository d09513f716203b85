//! Movie validation: every rule runs, all failures are reported together.

use reelvault_core::Movie;
use reelvault_storage::DynMovieRepository;
use time::OffsetDateTime;

use crate::contracts::ValidationFailureResponse;
use crate::error::ApiError;

fn failure(property: &str, message: &str) -> ValidationFailureResponse {
    ValidationFailureResponse {
        property_name: property.to_string(),
        message: message.to_string(),
    }
}

/// Validates movies before create and update.
///
/// Rules never short-circuit: a movie with an empty title and a future
/// year reports both failures in one response. The slug-uniqueness rule
/// needs the repository, so validation is fallible on storage errors
/// independently of the validation outcome.
#[derive(Clone)]
pub struct MovieValidator {
    movies: DynMovieRepository,
}

impl MovieValidator {
    pub fn new(movies: DynMovieRepository) -> Self {
        Self { movies }
    }

    pub async fn validate(&self, movie: &Movie) -> Result<(), ApiError> {
        let mut failures = Vec::new();

        if movie.id.is_nil() {
            failures.push(failure("Id", "Id is required"));
        }

        if movie.title.trim().is_empty() {
            failures.push(failure("Title", "Title is required"));
        }

        if movie.genres.is_empty() {
            failures.push(failure("Genres", "Genre is required"));
        }

        let current_year = OffsetDateTime::now_utc().year();
        if movie.year_of_release > current_year {
            failures.push(failure(
                "YearOfRelease",
                "Year of release cannot be in the future",
            ));
        }

        // Slug uniqueness. A movie colliding with itself (same id) is an
        // update keeping its own slug, which is fine.
        let existing = self.movies.get_by_slug(&movie.slug(), None).await?;
        if let Some(existing) = existing {
            if existing.id != movie.id {
                failures.push(failure(
                    "Slug",
                    "This movie already exists in the system",
                ));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(failures))
        }
    }
}

/// Ratings live on a 1 to 5 scale.
pub fn validate_rating(rating: i32) -> Result<(), ApiError> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(ApiError::Validation(vec![failure(
            "Rating",
            "Rating must be between 1 and 5",
        )]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelvault_storage::memory::InMemoryStore;
    use std::sync::Arc;
    use uuid::Uuid;

    fn validator_with_store() -> (MovieValidator, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (MovieValidator::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_valid_movie_passes() {
        let (validator, _) = validator_with_store();
        let movie = Movie::new("Alien", 1979, vec!["Horror".into()]);
        assert!(validator.validate(&movie).await.is_ok());
    }

    #[tokio::test]
    async fn test_all_failures_reported_together() {
        let (validator, _) = validator_with_store();
        let mut movie = Movie::new("", 3000, vec![]);
        movie.id = Uuid::nil();

        let err = validator.validate(&movie).await.unwrap_err();
        let ApiError::Validation(failures) = err else {
            panic!("expected validation error");
        };
        let properties: Vec<_> = failures.iter().map(|f| f.property_name.as_str()).collect();
        assert_eq!(
            properties,
            vec!["Id", "Title", "Genres", "YearOfRelease"]
        );
        assert_eq!(failures[2].message, "Genre is required");
    }

    #[tokio::test]
    async fn test_genre_list_content_is_not_validated() {
        // The rule is on the collection; element content is the client's.
        let (validator, _) = validator_with_store();
        let movie = Movie::new("Alien", 1979, vec!["  ".into()]);
        assert!(validator.validate(&movie).await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected() {
        let (validator, store) = validator_with_store();
        use reelvault_storage::MovieRepository;
        let existing = Movie::new("Alien", 1979, vec!["Horror".into()]);
        store.create(&existing).await.unwrap();

        let duplicate = Movie::new("Alien", 1979, vec!["Sci-Fi".into()]);
        let err = validator.validate(&duplicate).await.unwrap_err();
        let ApiError::Validation(failures) = err else {
            panic!("expected validation error");
        };
        assert_eq!(failures[0].property_name, "Slug");
    }

    #[tokio::test]
    async fn test_self_collision_allowed_on_update() {
        let (validator, store) = validator_with_store();
        use reelvault_storage::MovieRepository;
        let mut movie = Movie::new("Alien", 1979, vec!["Horror".into()]);
        store.create(&movie).await.unwrap();

        // Same movie, same slug.
        movie.genres = vec!["Sci-Fi".into()];
        assert!(validator.validate(&movie).await.is_ok());
    }

    #[test]
    fn test_rating_bounds() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }
}
