//! Rating handlers. All of them require an authenticated user; rating
//! writes change the averages baked into cached movie responses, so they
//! evict the movies tag like any other mutation.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use reelvault_auth::RequestIdentity;
use uuid::Uuid;

use crate::contracts::{MovieRatingResponse, RateMovieRequest};
use crate::error::ApiError;
use crate::state::AppState;

/// `PUT /api/movies/{id}/ratings`
pub async fn rate_movie(
    State(state): State<AppState>,
    RequestIdentity(identity): RequestIdentity,
    Path(id): Path<Uuid>,
    Json(request): Json<RateMovieRequest>,
) -> Result<StatusCode, ApiError> {
    let user_id = identity.require_user()?;

    if !state.ratings.rate_movie(id, request.rating, user_id).await? {
        return Err(ApiError::NotFound);
    }
    state.cache.evict_all();

    tracing::info!(movie_id = %id, rating = request.rating, "movie rated");
    Ok(StatusCode::OK)
}

/// `DELETE /api/movies/{id}/ratings`
pub async fn delete_rating(
    State(state): State<AppState>,
    RequestIdentity(identity): RequestIdentity,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let user_id = identity.require_user()?;

    if !state.ratings.delete_rating(id, user_id).await? {
        return Err(ApiError::NotFound);
    }
    state.cache.evict_all();
    Ok(StatusCode::OK)
}

/// `GET /api/ratings/me`
pub async fn get_user_ratings(
    State(state): State<AppState>,
    RequestIdentity(identity): RequestIdentity,
) -> Result<Json<Vec<MovieRatingResponse>>, ApiError> {
    let user_id = identity.require_user()?;

    let ratings = state.ratings.get_ratings_for_user(user_id).await?;
    Ok(Json(
        ratings.into_iter().map(MovieRatingResponse::from).collect(),
    ))
}
