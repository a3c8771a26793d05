use crate::auth::service::AuthError;
use bcrypt::{hash, verify};

/// Hashes `password` with bcrypt at the given work factor.
///
/// The returned digest embeds its own salt and cost, so it is the only value
/// that needs to be stored.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    hash(password, cost).map_err(|e| AuthError::Hashing(format!("failed to hash password: {}", e)))
}

/// Checks `password` against a stored bcrypt digest.
///
/// A mismatch is `Ok(false)`; only a digest that cannot be parsed is an error.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AuthError> {
    verify(password, hashed_password)
        .map_err(|e| AuthError::Hashing(format!("failed to verify password: {}", e)))
}

/// Runs [`hash_password`] on the blocking pool so the work factor does not
/// stall the request workers.
pub async fn hash_password_blocking(password: String, cost: u32) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| AuthError::Hashing(format!("hashing task failed: {}", e)))?
}

/// Runs [`verify_password`] on the blocking pool.
pub async fn verify_password_blocking(
    password: String,
    hashed_password: String,
) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hashed_password))
        .await
        .map_err(|e| AuthError::Hashing(format!("verification task failed: {}", e)))?
}
