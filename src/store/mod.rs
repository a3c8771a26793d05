//! Persistence seams.
//!
//! Services talk to storage only through [`UserStore`] and [`TaskStore`], so
//! the HTTP layer can be exercised against in-memory stores while production
//! runs on the Postgres implementations in [`postgres`].

pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Credential, NewUser, Task, User};
use crate::query::BuiltQuery;

pub use postgres::{PgTaskStore, PgUserStore};

#[derive(Debug, Error)]
pub enum StoreError {
    /// No row matched, including rows owned by someone else.
    #[error("record not found")]
    NotFound,
    /// A unique constraint rejected the write.
    #[error("unique constraint violated")]
    UniqueViolation,
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(ref db) if db.code().as_deref() == Some("23505") => {
                StoreError::UniqueViolation
            }
            other => StoreError::Database(other),
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new user and returns its id.
    async fn add_user(&self, user: NewUser) -> Result<String, StoreError>;

    async fn get_user_by_email(&self, email: &str) -> Result<Credential, StoreError>;

    async fn get_user(&self, id: &str) -> Result<User, StoreError>;

    /// Runs a profile `UPDATE ... RETURNING` and yields the updated user.
    async fn update_user(&self, query: &BuiltQuery) -> Result<User, StoreError>;

    /// Removes the user and, through the foreign key, every task they own.
    async fn delete_user(&self, id: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Runs a listing `SELECT` built by [`crate::query::tasks::list_query`].
    async fn list(&self, query: &BuiltQuery) -> Result<Vec<Task>, StoreError>;

    async fn insert(&self, task: &Task) -> Result<Task, StoreError>;

    async fn get(&self, owner_id: &str, task_id: &str) -> Result<Task, StoreError>;

    /// Runs a sparse task `UPDATE ... RETURNING`; zero rows is `NotFound`.
    async fn update(&self, query: &BuiltQuery) -> Result<Task, StoreError>;

    async fn delete(&self, owner_id: &str, task_id: &str) -> Result<(), StoreError>;
}
