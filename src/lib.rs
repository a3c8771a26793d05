#![doc = "The `todo_api` library crate."]
#![doc = ""]
#![doc = "Credential and session handling, the authorization gate, the parameterized"]
#![doc = "query builder, storage traits with their Postgres implementations, and the"]
#![doc = "HTTP routes that tie them together. `main.rs` only loads configuration,"]
#![doc = "opens the pool and starts the server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod routes;
pub mod services;
pub mod store;

pub use crate::error::AppError;
pub use crate::routes::{configure, AppServices};
