use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;

/// The authenticated caller, as established by `AuthMiddleware`.
///
/// Handlers behind the gate take a `Principal` argument; all ownership checks
/// use its `id`. Outside the gate extraction fails with 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
}

impl FromRequest for Principal {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Principal>().cloned() {
            Some(principal) => ready(Ok(principal)),
            None => {
                let err = AppError::Unauthorized("missing token".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
