pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;

use actix_web::{error, web, HttpRequest};
use std::sync::Arc;

use crate::auth::{AuthMiddleware, AuthSettings, Authenticator};
use crate::error::AppError;
use crate::services::{TaskService, UserService};
use crate::store::{TaskStore, UserStore};

/// Everything the handlers need, built once per process and shared by every
/// worker.
#[derive(Clone)]
pub struct AppServices {
    pub settings: AuthSettings,
    pub authenticator: Authenticator,
    pub tasks: TaskService,
    pub users: UserService,
}

impl AppServices {
    pub fn new(
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
        settings: AuthSettings,
    ) -> Self {
        Self {
            authenticator: Authenticator::new(users.clone(), settings.hash_cost),
            users: UserService::new(users, settings.hash_cost),
            tasks: TaskService::new(tasks),
            settings,
        }
    }
}

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// Registers shared state, body/query error handling and every route.
///
/// `/health` and `/api/auth` are public; `/api/tasks` and `/api/users` sit
/// behind [`AuthMiddleware`].
pub fn configure(cfg: &mut web::ServiceConfig, services: &AppServices) {
    let gate = AuthMiddleware::new(services.settings.secret.clone());

    cfg.app_data(web::Data::new(services.settings.clone()))
        .app_data(web::Data::new(services.authenticator.clone()))
        .app_data(web::Data::new(services.tasks.clone()))
        .app_data(web::Data::new(services.users.clone()))
        .app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .service(health::health)
        .service(
            web::scope("/api")
                .service(
                    web::scope("/auth")
                        .service(auth::register)
                        .service(auth::login),
                )
                .service(
                    web::scope("/tasks")
                        .wrap(gate.clone())
                        .service(tasks::list_tasks)
                        .service(tasks::search_tasks)
                        .service(tasks::create_task)
                        .service(tasks::get_task)
                        .service(tasks::update_task)
                        .service(tasks::delete_task),
                )
                .service(
                    web::scope("/users")
                        .wrap(gate)
                        .service(users::get_me)
                        .service(users::update_me)
                        .service(users::delete_me),
                ),
        );
}
