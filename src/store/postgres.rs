use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgPool};
use sqlx::query::QueryAs;
use sqlx::Postgres;

use super::{StoreError, TaskStore, UserStore};
use crate::models::{Credential, NewUser, Task, User};
use crate::query::tasks::TASK_COLUMNS;
use crate::query::users::USER_COLUMNS;
use crate::query::{BuiltQuery, SqlValue};

/// Binds every argument of a built query, in placeholder order.
fn bind_args<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    args: &'q [SqlValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for arg in args {
        query = match arg {
            SqlValue::Text(value) => query.bind(value.as_str()),
            SqlValue::BigInt(value) => query.bind(*value),
            SqlValue::Timestamp(value) => query.bind(*value),
        };
    }
    query
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn add_user(&self, user: NewUser) -> Result<String, StoreError> {
        let (id,): (String,) = sqlx::query_as(
            "INSERT INTO users (id, name, email, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Credential, StoreError> {
        let credential =
            sqlx::query_as::<_, Credential>("SELECT id, password_hash FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(credential)
    }

    async fn get_user(&self, id: &str) -> Result<User, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }

    async fn update_user(&self, query: &BuiltQuery) -> Result<User, StoreError> {
        let user = bind_args(sqlx::query_as::<_, User>(&query.text), &query.args)
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }

    async fn delete_user(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}

#[derive(Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn list(&self, query: &BuiltQuery) -> Result<Vec<Task>, StoreError> {
        let tasks = bind_args(sqlx::query_as::<_, Task>(&query.text), &query.args)
            .fetch_all(&self.pool)
            .await?;

        Ok(tasks)
    }

    async fn insert(&self, task: &Task) -> Result<Task, StoreError> {
        let sql = format!(
            "INSERT INTO tasks (id, user_id, title, description, status, due_date, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {}",
            TASK_COLUMNS
        );
        let inserted = sqlx::query_as::<_, Task>(&sql)
            .bind(&task.id)
            .bind(&task.user_id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(&task.status)
            .bind(task.due_date)
            .bind(task.created_at)
            .bind(task.updated_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(inserted)
    }

    async fn get(&self, owner_id: &str, task_id: &str) -> Result<Task, StoreError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE id = $1 AND user_id = $2",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(task_id)
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(task)
    }

    async fn update(&self, query: &BuiltQuery) -> Result<Task, StoreError> {
        let task = bind_args(sqlx::query_as::<_, Task>(&query.text), &query.args)
            .fetch_optional(&self.pool)
            .await?;

        task.ok_or(StoreError::NotFound)
    }

    async fn delete(&self, owner_id: &str, task_id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(task_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}
