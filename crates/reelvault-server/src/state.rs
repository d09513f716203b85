use std::sync::Arc;

use axum::extract::FromRef;
use reelvault_auth::AuthState;
use reelvault_storage::{DynMovieRepository, DynRatingRepository};

use crate::cache::MovieCache;
use crate::service::{MovieService, RatingService};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub movies: MovieService,
    pub ratings: RatingService,
    pub cache: Arc<MovieCache>,
    pub auth: AuthState,
}

impl AppState {
    pub fn new(
        movies: DynMovieRepository,
        ratings: DynRatingRepository,
        cache: Arc<MovieCache>,
        auth: AuthState,
    ) -> Self {
        Self {
            movies: MovieService::new(movies.clone(), ratings.clone()),
            ratings: RatingService::new(movies, ratings),
            cache,
            auth,
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
