//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Settings for validating bearer tokens minted by the external
/// identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 shared secret for JWT signature validation.
    pub jwt_secret: String,
    /// Expected `aud` claim; empty disables audience validation.
    #[serde(default)]
    pub jwt_audience: String,
}
