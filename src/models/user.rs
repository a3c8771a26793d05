use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A registered user as returned by the API. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The stored login credential for one user.
#[derive(Debug, Clone, FromRow)]
pub struct Credential {
    pub id: String,
    pub password_hash: String,
}

/// A user record ready to be persisted; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// A sparse update to the caller's own profile.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    // Plaintext; hashed before it reaches the store.
    #[validate(length(min = 6, max = 72))]
    pub password: Option<String>,
}
