use chrono::Duration;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::auth::token::{generate_token, verify_token, SessionClaims, TokenError};
use crate::models::NewUser;
use crate::store::{StoreError, UserStore};

/// Lifetime of an issued session token.
pub const SESSION_TTL_HOURS: i64 = 24;

/// Hashed once per authenticator and checked against when an email is unknown.
const DECOY_PASSWORD: &str = "decoy-password-never-issued";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Hashing(String),
    #[error("email already registered")]
    DuplicateEmail,
    #[error("user not found")]
    NotFound,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("store error: {0}")]
    Store(String),
}

impl From<StoreError> for AuthError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => AuthError::NotFound,
            StoreError::UniqueViolation => AuthError::DuplicateEmail,
            StoreError::Database(e) => AuthError::Store(e.to_string()),
        }
    }
}

/// Registers users, checks their credentials, and issues session tokens.
#[derive(Clone)]
pub struct Authenticator {
    users: Arc<dyn UserStore>,
    hash_cost: u32,
    decoy: Arc<OnceCell<String>>,
}

impl Authenticator {
    pub fn new(users: Arc<dyn UserStore>, hash_cost: u32) -> Self {
        Self {
            users,
            hash_cost,
            decoy: Arc::new(OnceCell::new()),
        }
    }

    async fn decoy_digest(&self) -> Result<String, AuthError> {
        let digest = self
            .decoy
            .get_or_try_init(|| hash_password_blocking(DECOY_PASSWORD.to_string(), self.hash_cost))
            .await?;
        Ok(digest.clone())
    }

    /// Hashes `password` and stores a new user, returning its id.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<String, AuthError> {
        let password_hash = hash_password_blocking(password.to_string(), self.hash_cost).await?;

        let user = NewUser {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
        };

        let id = self.users.add_user(user).await?;
        log::info!("registered user {}", id);
        Ok(id)
    }

    /// Returns the user id for a matching email and password.
    ///
    /// Unknown email is `NotFound`, a wrong password `InvalidCredentials`;
    /// callers must not expose the difference. An unknown email still pays
    /// for one bcrypt verification at the configured cost.
    pub async fn validate_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<String, AuthError> {
        let credential = match self.users.get_user_by_email(email).await {
            Ok(credential) => credential,
            Err(StoreError::NotFound) => {
                let digest = self.decoy_digest().await?;
                verify_password_blocking(password.to_string(), digest).await?;
                return Err(AuthError::NotFound);
            }
            Err(e) => return Err(e.into()),
        };

        let matches =
            verify_password_blocking(password.to_string(), credential.password_hash).await?;
        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(credential.id)
    }

    pub fn issue_session(&self, user_id: &str, secret: &[u8]) -> Result<String, TokenError> {
        generate_token(user_id, secret, Duration::hours(SESSION_TTL_HOURS))
    }

    pub fn verify_session(&self, token: &str, secret: &[u8]) -> Result<SessionClaims, TokenError> {
        verify_token(token, secret)
    }
}
