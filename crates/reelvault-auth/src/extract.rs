//! Axum extractor turning request credentials into an [`Identity`].
//!
//! Resolution order:
//!
//! 1. `x-api-key` header — a matching key grants the admin tier acting as
//!    the configured service account; a mismatched key is rejected.
//! 2. `Authorization: Bearer` — the token is validated and its claims
//!    yield the tier and user id; an invalid token is rejected rather
//!    than downgraded to anonymous.
//! 3. Neither — the request proceeds anonymously.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

use crate::claims::API_KEY_HEADER;
use crate::error::AuthError;
use crate::jwt::JwtService;
use crate::tier::{AuthTier, Identity};

/// State required to resolve request identities.
#[derive(Clone)]
pub struct AuthState {
    /// JWT service for token validation.
    pub jwt: Arc<JwtService>,

    /// Service API key granting the admin tier, if configured.
    pub api_key: Option<String>,

    /// User id attributed to api-key callers.
    pub service_user_id: Uuid,
}

impl AuthState {
    /// Creates auth state without an API key configured.
    #[must_use]
    pub fn new(jwt: Arc<JwtService>, service_user_id: Uuid) -> Self {
        Self {
            jwt,
            api_key: None,
            service_user_id,
        }
    }

    /// Sets the service API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// Extractor yielding the request's [`Identity`].
///
/// Never rejects anonymous requests; handlers enforce their own required
/// tier. Presented-but-invalid credentials are rejected with 401.
pub struct RequestIdentity(pub Identity);

impl<S> FromRequestParts<S> for RequestIdentity
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        if let Some(presented) = parts.headers.get(API_KEY_HEADER) {
            let Some(expected) = auth_state.api_key.as_deref() else {
                return Err(AuthError::unauthorized("api key auth is not enabled"));
            };
            let presented = presented
                .to_str()
                .map_err(|_| AuthError::unauthorized("invalid api key"))?;
            if presented != expected {
                tracing::debug!("api key mismatch");
                return Err(AuthError::unauthorized("invalid api key"));
            }
            return Ok(Self(Identity {
                user_id: Some(auth_state.service_user_id),
                tier: AuthTier::Admin,
            }));
        }

        let Some(auth_header) = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
        else {
            return Ok(Self(Identity::anonymous()));
        };

        let token = match auth_header.strip_prefix("Bearer ") {
            Some(t) if !t.is_empty() => t,
            _ => {
                return Err(AuthError::unauthorized(
                    "invalid Authorization header format",
                ));
            }
        };

        let claims = auth_state.jwt.decode(token)?;
        let identity = Identity::from_claims(&claims);
        tracing::debug!(tier = %identity.tier, "token validated");
        Ok(Self(identity))
    }
}
