use crate::{
    auth::Principal,
    error::AppError,
    models::{ListTasksParams, SearchTasksParams, TaskInput, TaskPatch},
    services::TaskService,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use validator::Validate;

/// Lists the caller's tasks.
///
/// ## Query Parameters:
/// - `title` (optional): case-insensitive substring match on the title.
/// - `status` (optional): `active` or `done`.
/// - `sort_by` (optional): `id` (default), `title` or `status`.
/// - `order` (optional): `asc` (default) or `desc`.
/// - `page` (optional): 1-based page number, default 1.
/// - `page_size` (optional): 1 to 100, default 10.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects.
/// - `400 Bad Request`: unknown `sort_by`/`order` or a non-numeric page value.
/// - `422 Unprocessable Entity`: page values out of range or unknown status.
#[get("")]
pub async fn list_tasks(
    tasks: web::Data<TaskService>,
    principal: Principal,
    params: web::Query<ListTasksParams>,
) -> Result<impl Responder, AppError> {
    params.validate()?;

    let spec = params.into_inner().into_spec(principal.id);
    let found = tasks.list_tasks(&spec).await?;

    Ok(HttpResponse::Ok().json(found))
}

/// Searches the caller's tasks by `title` and/or `status`.
///
/// At least one filter must be non-empty. Returns up to 100 matches in id order.
#[get("/search")]
pub async fn search_tasks(
    tasks: web::Data<TaskService>,
    principal: Principal,
    params: web::Query<SearchTasksParams>,
) -> Result<impl Responder, AppError> {
    params.validate()?;
    if params.is_empty() {
        return Err(AppError::ValidationError(
            "search requires a title or status".into(),
        ));
    }

    let found = tasks
        .search_tasks(&principal.id, params.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(found))
}

/// Creates a task owned by the caller.
///
/// ## Responses:
/// - `201 Created`: the new `Task`.
/// - `400 Bad Request`: body is not valid JSON for `TaskInput`.
/// - `422 Unprocessable Entity`: title, description or status out of bounds.
#[post("")]
pub async fn create_task(
    tasks: web::Data<TaskService>,
    principal: Principal,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = tasks
        .create_task(&principal.id, task_data.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(task))
}

/// Fetches one of the caller's tasks; any other id is 404.
#[get("/{id}")]
pub async fn get_task(
    tasks: web::Data<TaskService>,
    principal: Principal,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let task = tasks.get_task(&principal.id, &task_id).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Sparsely updates one of the caller's tasks.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `204 No Content`: the body set no fields, nothing was written.
/// - `404 Not Found`: no such task owned by the caller.
/// - `422 Unprocessable Entity`: a present field is out of bounds.
#[put("/{id}")]
pub async fn update_task(
    tasks: web::Data<TaskService>,
    principal: Principal,
    task_id: web::Path<String>,
    patch: web::Json<TaskPatch>,
) -> Result<impl Responder, AppError> {
    patch.validate()?;

    match tasks.update_task(&principal.id, &task_id, &patch).await? {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Ok(HttpResponse::NoContent().finish()),
    }
}

/// Deletes one of the caller's tasks.
#[delete("/{id}")]
pub async fn delete_task(
    tasks: web::Data<TaskService>,
    principal: Principal,
    task_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    tasks.delete_task(&principal.id, &task_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
