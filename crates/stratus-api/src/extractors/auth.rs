//! `AuthUser` extractor — pulls the JWT from the Authorization header,
//! validates it, and injects the request context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use stratus_core::error::AppError;
use stratus_entity::user::AuthClaims;
use stratus_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))?;

        let claims = decode_claims(token, &state.config.auth.jwt_secret, &state.config.auth.jwt_audience)?;

        let ctx = RequestContext::new(claims.sub, claims.role, claims.email);
        Ok(AuthUser(ctx))
    }
}

/// Decode and validate an HS256 bearer token.
fn decode_claims(token: &str, secret: &str, audience: &str) -> Result<AuthClaims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    if audience.is_empty() {
        validation.validate_aud = false;
    } else {
        validation.set_audience(&[audience]);
    }

    jsonwebtoken::decode::<AuthClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::authentication(format!("Invalid token: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use stratus_entity::user::UserRole;
    use uuid::Uuid;

    fn mint(secret: &str, exp_offset: i64) -> String {
        let claims = AuthClaims {
            sub: Uuid::new_v4(),
            email: "user@example.com".to_string(),
            role: UserRole::Member,
            exp: chrono::Utc::now().timestamp() + exp_offset,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_decodes() {
        let token = mint("secret", 3600);
        let claims = decode_claims(&token, "secret", "").unwrap();
        assert_eq!(claims.email, "user@example.com");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = mint("secret", 3600);
        assert!(decode_claims(&token, "other", "").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = mint("secret", -3600);
        assert!(decode_claims(&token, "secret", "").is_err());
    }
}
