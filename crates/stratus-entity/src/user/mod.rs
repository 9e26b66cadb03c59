//! User role and token claims for the external identity provider.

pub mod claims;
pub mod role;

pub use claims::AuthClaims;
pub use role::UserRole;
