//! Authorization tiers and request identity.

use uuid::Uuid;

use crate::claims::AccessTokenClaims;
use crate::error::AuthError;

/// Authorization tier of a request.
///
/// Ordered: `Anonymous < Trusted < Admin`, so a tier check is the pure
/// predicate `tier >= required`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AuthTier {
    Anonymous,
    Trusted,
    Admin,
}

impl AuthTier {
    /// Whether this tier satisfies `required`.
    #[must_use]
    pub fn satisfies(self, required: AuthTier) -> bool {
        self >= required
    }

    /// Derives the tier from validated token claims.
    #[must_use]
    pub fn from_claims(claims: &AccessTokenClaims) -> Self {
        if claims.admin {
            Self::Admin
        } else if claims.trusted_member {
            Self::Trusted
        } else {
            Self::Anonymous
        }
    }
}

impl std::fmt::Display for AuthTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anonymous => write!(f, "anonymous"),
            Self::Trusted => write!(f, "trusted"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// The authenticated (or anonymous) identity of a request.
///
/// A request can be authenticated without holding an elevated tier: a
/// valid token whose claims carry neither flag yields an identity with a
/// user id at the `Anonymous` tier. Such callers may rate movies but not
/// mutate the catalog.
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub user_id: Option<Uuid>,
    pub tier: AuthTier,
}

impl Identity {
    /// An unauthenticated request.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            user_id: None,
            tier: AuthTier::Anonymous,
        }
    }

    /// Identity derived from validated token claims.
    #[must_use]
    pub fn from_claims(claims: &AccessTokenClaims) -> Self {
        Self {
            user_id: claims.userid,
            tier: AuthTier::from_claims(claims),
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// Requires at least `required`; 401 when no credentials were
    /// presented, 403 when credentials exist but the tier is too low.
    pub fn require_tier(&self, required: AuthTier) -> Result<(), AuthError> {
        if self.tier.satisfies(required) {
            return Ok(());
        }
        if self.is_authenticated() {
            Err(AuthError::forbidden(format!("{required} tier required")))
        } else {
            Err(AuthError::unauthorized("authentication required"))
        }
    }

    /// Requires an authenticated caller and returns their user id.
    pub fn require_user(&self) -> Result<Uuid, AuthError> {
        self.user_id
            .ok_or_else(|| AuthError::unauthorized("authentication required"))
    }
}
