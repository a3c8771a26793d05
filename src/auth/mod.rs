pub mod extractors;
pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use validator::Validate;

// Re-export necessary items
pub use extractors::Principal;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use service::{AuthError, Authenticator, SESSION_TTL_HOURS};
pub use token::{generate_token, verify_token, SessionClaims, TokenError};

/// Immutable credential settings, built once from configuration at startup
/// and handed to the authenticator and the authorization gate.
#[derive(Clone)]
pub struct AuthSettings {
    /// HMAC key used to sign and verify session tokens.
    pub secret: Arc<[u8]>,
    /// bcrypt work factor for new password hashes.
    pub hash_cost: u32,
}

impl AuthSettings {
    pub fn new(secret: impl AsRef<[u8]>, hash_cost: u32) -> Self {
        Self {
            secret: Arc::from(secret.as_ref()),
            hash_cost,
        }
    }
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("secret", &"<redacted>")
            .field("hash_cost", &self.hash_cost)
            .finish()
    }
}

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// User's email address.
    #[validate(email)]
    pub email: String,
    /// User's password.
    #[validate(length(min = 6, max = 72))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name for the new account.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Email address for the new account. Must be unique.
    #[validate(email)]
    pub email: String,
    /// Password for the new account; bcrypt only reads the first 72 bytes.
    #[validate(length(min = 6, max = 72))]
    pub password: String,
}

/// Response body after a successful login or registration.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Signed session token, sent back as `Authorization: Bearer <token>`.
    pub token: String,
    /// The unique identifier of the authenticated user.
    pub user_id: String,
}
