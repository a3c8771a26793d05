use crate::{
    auth::{AuthResponse, AuthSettings, Authenticator, LoginRequest, RegisterRequest},
    error::AppError,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Creates a new user account and returns a session token for it.
#[post("/register")]
pub async fn register(
    authenticator: web::Data<Authenticator>,
    settings: web::Data<AuthSettings>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let user_id = authenticator
        .register(
            &register_data.name,
            &register_data.email,
            &register_data.password,
        )
        .await?;
    let token = authenticator.issue_session(&user_id, &settings.secret)?;

    Ok(HttpResponse::Created().json(AuthResponse { token, user_id }))
}

/// Login user
///
/// Exchanges an email and password for a session token. Unknown email and
/// wrong password produce the same response.
#[post("/login")]
pub async fn login(
    authenticator: web::Data<Authenticator>,
    settings: web::Data<AuthSettings>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user_id = authenticator
        .validate_credentials(&login_data.email, &login_data.password)
        .await?;
    let token = authenticator.issue_session(&user_id, &settings.secret)?;

    Ok(HttpResponse::Ok().json(AuthResponse { token, user_id }))
}
