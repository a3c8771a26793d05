use crate::{auth::Principal, error::AppError, models::ProfileUpdate, services::UserService};
use actix_web::{delete, get, put, web, HttpResponse, Responder};
use validator::Validate;

/// Returns the caller's profile.
#[get("/me")]
pub async fn get_me(
    users: web::Data<UserService>,
    principal: Principal,
) -> Result<impl Responder, AppError> {
    let user = users.get_profile(&principal.id).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Sparsely updates the caller's profile. An empty body is 204.
#[put("/me")]
pub async fn update_me(
    users: web::Data<UserService>,
    principal: Principal,
    update: web::Json<ProfileUpdate>,
) -> Result<impl Responder, AppError> {
    update.validate()?;

    match users
        .update_profile(&principal.id, update.into_inner())
        .await?
    {
        Some(user) => Ok(HttpResponse::Ok().json(user)),
        None => Ok(HttpResponse::NoContent().finish()),
    }
}

/// Deletes the caller's account together with all of their tasks.
#[delete("/me")]
pub async fn delete_me(
    users: web::Data<UserService>,
    principal: Principal,
) -> Result<impl Responder, AppError> {
    users.delete_profile(&principal.id).await?;
    Ok(HttpResponse::NoContent().finish())
}
