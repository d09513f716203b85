//! Movie CRUD handlers.
//!
//! Reads are cached for anonymous requests only; any mutation (including
//! rating changes, see the ratings handlers) evicts the whole movies tag.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use reelvault_auth::{AuthTier, RequestIdentity};
use reelvault_core::{ListOptions, Movie, RawListQuery};
use uuid::Uuid;

use crate::cache::MovieCache;
use crate::contracts::{
    CreateMovieRequest, MovieResponse, MoviesResponse, UpdateMovieRequest,
};
use crate::error::ApiError;
use crate::state::AppState;

/// `POST /api/movies`
pub async fn create_movie(
    State(state): State<AppState>,
    RequestIdentity(identity): RequestIdentity,
    Json(request): Json<CreateMovieRequest>,
) -> Result<Response, ApiError> {
    identity.require_tier(AuthTier::Trusted)?;

    let movie = Movie::new(request.title, request.year_of_release, request.genres);
    state.movies.create(&movie).await?;
    state.cache.evict_all();

    tracing::info!(movie_id = %movie.id, slug = %movie.slug(), "movie created");

    let location = format!("/api/movies/{}", movie.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(MovieResponse::from(movie)),
    )
        .into_response())
}

/// `GET /api/movies/{idOrSlug}`
///
/// A path segment that parses as a UUID addresses by id; anything else is
/// treated as a slug.
pub async fn get_movie(
    State(state): State<AppState>,
    RequestIdentity(identity): RequestIdentity,
    Path(id_or_slug): Path<String>,
) -> Result<Json<MovieResponse>, ApiError> {
    let anonymous = !identity.is_authenticated();
    let cache_key = MovieCache::detail_key(&id_or_slug);

    if anonymous {
        if let Some(cached) = state.cache.get_detail(&cache_key) {
            return Ok(Json(cached));
        }
    }

    let movie = match id_or_slug.parse::<Uuid>() {
        Ok(id) => state.movies.get_by_id(id, identity.user_id).await?,
        Err(_) => state.movies.get_by_slug(&id_or_slug, identity.user_id).await?,
    };

    let movie = movie.ok_or(ApiError::NotFound)?;
    let response = MovieResponse::from(movie);

    if anonymous {
        state.cache.put_detail(&cache_key, &response);
    }
    Ok(Json(response))
}

/// `GET /api/movies`
pub async fn get_all_movies(
    State(state): State<AppState>,
    RequestIdentity(identity): RequestIdentity,
    Query(raw): Query<RawListQuery>,
) -> Result<Json<MoviesResponse>, ApiError> {
    let options = ListOptions::build(&raw)?.with_user_id(identity.user_id);

    let anonymous = !identity.is_authenticated();
    let cache_key = MovieCache::list_key(&options);

    if anonymous {
        if let Some(cached) = state.cache.get_list(&cache_key) {
            return Ok(Json(cached));
        }
    }

    let movies = state.movies.get_all(&options).await?;
    let total = state.movies.get_count(&options).await?;
    let response = MoviesResponse::new(movies, &options, total);

    if anonymous {
        state.cache.put_list(&cache_key, &response);
    }
    Ok(Json(response))
}

/// `PUT /api/movies/{id}`
///
/// Updates address movies by id only; a slug in the path is a 404.
pub async fn update_movie(
    State(state): State<AppState>,
    RequestIdentity(identity): RequestIdentity,
    Path(id_or_slug): Path<String>,
    Json(request): Json<UpdateMovieRequest>,
) -> Result<Json<MovieResponse>, ApiError> {
    identity.require_tier(AuthTier::Trusted)?;

    let id = id_or_slug.parse::<Uuid>().map_err(|_| ApiError::NotFound)?;
    let movie = Movie {
        id,
        title: request.title,
        year_of_release: request.year_of_release,
        genres: request.genres,
        rating: None,
        user_rating: None,
    };

    let updated = state
        .movies
        .update(&movie, identity.user_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    state.cache.evict_all();

    tracing::info!(movie_id = %id, "movie updated");
    Ok(Json(MovieResponse::from(updated)))
}

/// `DELETE /api/movies/{id}`
pub async fn delete_movie(
    State(state): State<AppState>,
    RequestIdentity(identity): RequestIdentity,
    Path(id_or_slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    identity.require_tier(AuthTier::Admin)?;

    let id = id_or_slug.parse::<Uuid>().map_err(|_| ApiError::NotFound)?;
    if !state.movies.delete_by_id(id).await? {
        return Err(ApiError::NotFound);
    }
    state.cache.evict_all();

    tracing::info!(movie_id = %id, "movie deleted");
    Ok(StatusCode::OK)
}
