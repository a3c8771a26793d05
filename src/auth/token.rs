use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The only signing algorithm tokens are issued with or accepted under.
pub const SESSION_ALGORITHM: Algorithm = Algorithm::HS256;

/// The signed claim set carried by a session token.
///
/// Serialized with the registered JWT names: `sub` holds the subject ID and
/// `exp` the expiry in Unix seconds.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// Identifier of the user the session belongs to.
    #[serde(rename = "sub")]
    pub subject_id: String,
    /// Expiration timestamp (seconds since epoch).
    #[serde(rename = "exp")]
    pub expires_at: i64,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
}

/// Why a token could not be issued or verified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Not a three-part token, or a part failed to decode.
    #[error("token is malformed")]
    Malformed,
    /// MAC mismatch, or signed under an algorithm other than HS256.
    #[error("token signature is invalid")]
    InvalidSignature,
    /// `exp` is at or before the current time.
    #[error("token has expired")]
    Expired,
    #[error("token could not be encoded: {0}")]
    Encoding(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        match error.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingAlgorithm => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        }
    }
}

fn validation() -> Validation {
    let mut validation = Validation::new(SESSION_ALGORITHM);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);
    validation
}

/// Issues a signed session token for `subject_id` that expires `ttl` from now.
pub fn generate_token(subject_id: &str, secret: &[u8], ttl: Duration) -> Result<String, TokenError> {
    let now = Utc::now();
    let expires_at = now
        .checked_add_signed(ttl)
        .ok_or_else(|| TokenError::Encoding("ttl out of range".into()))?;

    let claims = SessionClaims {
        subject_id: subject_id.to_string(),
        expires_at: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::new(SESSION_ALGORITHM),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| TokenError::Encoding(e.to_string()))
}

/// Verifies a session token and returns its claims.
///
/// The signature (and algorithm) is checked before expiry, so a token signed
/// with another key reports `InvalidSignature` even when it is also stale.
pub fn verify_token(token: &str, secret: &[u8]) -> Result<SessionClaims, TokenError> {
    let claims = decode::<SessionClaims>(token, &DecodingKey::from_secret(secret), &validation())?
        .claims;

    // The library accepts exp == now; a session is only valid strictly before expiry.
    if claims.expires_at <= Utc::now().timestamp() {
        return Err(TokenError::Expired);
    }

    Ok(claims)
}
