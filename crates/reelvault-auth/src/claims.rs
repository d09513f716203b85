//! Access token claims.
//!
//! Claim names match the token issuer's vocabulary: `userid` carries the
//! caller's UUID, and the `admin` / `trusted_member` claims are flags that
//! may be encoded either as booleans or as the string `"true"`.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Claim naming the caller's user id.
pub const USER_ID_CLAIM: &str = "userid";
/// Flag claim granting the admin tier.
pub const ADMIN_CLAIM: &str = "admin";
/// Flag claim granting the trusted-member tier.
pub const TRUSTED_MEMBER_CLAIM: &str = "trusted_member";
/// Header carrying the service API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Validated claims of an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (standard claim).
    #[serde(default)]
    pub sub: Option<String>,

    /// Expiry as a unix timestamp (validated by the JWT layer).
    pub exp: i64,

    /// Issuer.
    #[serde(default)]
    pub iss: Option<String>,

    /// Audience.
    #[serde(default)]
    pub aud: Option<String>,

    /// The caller's user id.
    #[serde(default)]
    pub userid: Option<Uuid>,

    /// Admin flag.
    #[serde(default, deserialize_with = "flag_claim")]
    pub admin: bool,

    /// Trusted-member flag.
    #[serde(default, deserialize_with = "flag_claim")]
    pub trusted_member: bool,
}

/// Accepts `true`, `"true"`, `false`, `"false"`, or an absent claim.
fn flag_claim<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => Ok(b),
        Some(Flag::Text(s)) => Ok(s.eq_ignore_ascii_case("true")),
        None => Ok(false),
    }
}
