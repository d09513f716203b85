//! Authentication and tiered authorization for the reelvault API.
//!
//! Requests authenticate with a JWT bearer token (HS256) or, for service
//! callers, an API key header. Authorization is tiered: anonymous clients
//! may read, trusted members may write, admins may delete. The tier is a
//! pure function of the validated claims; handlers check it with
//! [`Identity::require_tier`].

pub mod claims;
pub mod error;
pub mod extract;
pub mod jwt;
pub mod tier;

pub use claims::{
    ADMIN_CLAIM, API_KEY_HEADER, AccessTokenClaims, TRUSTED_MEMBER_CLAIM, USER_ID_CLAIM,
};
pub use error::AuthError;
pub use extract::{AuthState, RequestIdentity};
pub use jwt::JwtService;
pub use tier::{AuthTier, Identity};
