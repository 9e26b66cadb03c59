//! Claims carried by the external identity provider's bearer tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::UserRole;

/// Decoded JWT claims.
///
/// The identity provider mints HS256 tokens with the user id in `sub`
/// and the approved role in a custom `role` claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthClaims {
    /// The authenticated user's ID.
    pub sub: Uuid,
    /// The user's email address.
    #[serde(default)]
    pub email: String,
    /// The user's role.
    pub role: UserRole,
    /// Expiry as a Unix timestamp.
    pub exp: i64,
}
