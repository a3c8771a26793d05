//! In-memory stores and app helpers shared by the integration tests.
//!
//! The stores execute `BuiltQuery` values by reading the `column = $n`
//! bindings out of the statement, which is enough to drive every route
//! without a database.
#![allow(dead_code)]

use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test,
};
use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

use todo_api::auth::AuthSettings;
use todo_api::models::{Credential, NewUser, Task, User};
use todo_api::query::{BuiltQuery, SqlValue};
use todo_api::store::{StoreError, TaskStore, UserStore};
use todo_api::{configure, AppServices};

pub const TEST_SECRET: &[u8] = b"integration-test-secret";
pub const TEST_COST: u32 = 4;

fn text(value: &SqlValue) -> String {
    match value {
        SqlValue::Text(v) => v.clone(),
        SqlValue::BigInt(v) => v.to_string(),
        SqlValue::Timestamp(v) => v.to_rfc3339(),
    }
}

/// `(column, value)` for every `column = $n` or `column ILIKE $n` in the statement.
fn bindings(query: &BuiltQuery) -> Vec<(String, SqlValue)> {
    let re = Regex::new(r"(\w+) (?:=|ILIKE) \$(\d+)").unwrap();
    re.captures_iter(&query.text)
        .map(|c| {
            let index: usize = c[2].parse().unwrap();
            (c[1].to_string(), query.args[index - 1].clone())
        })
        .collect()
}

fn window(query: &BuiltQuery) -> (usize, usize) {
    let re = Regex::new(r"LIMIT \$(\d+) OFFSET \$(\d+)").unwrap();
    let c = re.captures(&query.text).unwrap();
    let arg = |i: &str| match &query.args[i.parse::<usize>().unwrap() - 1] {
        SqlValue::BigInt(v) => *v as usize,
        other => panic!("window argument is not an integer: {:?}", other),
    };
    (arg(&c[1]), arg(&c[2]))
}

#[derive(Clone)]
struct StoredUser {
    id: String,
    name: String,
    email: String,
    password_hash: String,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
}

impl StoredUser {
    fn public(&self) -> User {
        User {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Deleting a user also drops their tasks from `tasks`, like the foreign key does.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<StoredUser>>,
    tasks: Option<Arc<MemoryTaskStore>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn add_user(&self, user: NewUser) -> Result<String, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation);
        }
        let now = Utc::now();
        users.push(StoredUser {
            id: user.id.clone(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        });
        Ok(user.id)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Credential, StoreError> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .map(|u| Credential {
                id: u.id.clone(),
                password_hash: u.password_hash.clone(),
            })
            .ok_or(StoreError::NotFound)
    }

    async fn get_user(&self, id: &str) -> Result<User, StoreError> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .map(StoredUser::public)
            .ok_or(StoreError::NotFound)
    }

    async fn update_user(&self, query: &BuiltQuery) -> Result<User, StoreError> {
        let pairs = bindings(query);
        let id = pairs
            .iter()
            .find(|(c, _)| c == "id")
            .map(|(_, v)| text(v))
            .unwrap();

        let mut users = self.users.lock().unwrap();
        if let Some((_, email)) = pairs.iter().find(|(c, _)| c == "email") {
            let email = text(email);
            if users.iter().any(|u| u.email == email && u.id != id) {
                return Err(StoreError::UniqueViolation);
            }
        }

        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound)?;
        for (column, value) in pairs {
            match column.as_str() {
                "name" => user.name = text(&value),
                "email" => user.email = text(&value),
                "password_hash" => user.password_hash = text(&value),
                _ => {}
            }
        }
        user.updated_at = Utc::now();
        Ok(user.public())
    }

    async fn delete_user(&self, id: &str) -> Result<(), StoreError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(StoreError::NotFound);
        }
        if let Some(tasks) = &self.tasks {
            tasks.tasks.lock().unwrap().retain(|t| t.user_id != id);
        }
        Ok(())
    }
}

impl MemoryUserStore {
    pub fn cascading_to(tasks: Arc<MemoryTaskStore>) -> Self {
        Self {
            users: Mutex::default(),
            tasks: Some(tasks),
        }
    }

    pub fn password_hash(&self, email: &str) -> Option<String> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.password_hash.clone())
    }
}

#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: Mutex<Vec<Task>>,
    statements: Mutex<Vec<BuiltQuery>>,
}

impl MemoryTaskStore {
    pub fn task_count(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    /// Statements run through `list` or `update`, oldest first.
    pub fn statements(&self) -> Vec<BuiltQuery> {
        self.statements.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list(&self, query: &BuiltQuery) -> Result<Vec<Task>, StoreError> {
        self.statements.lock().unwrap().push(query.clone());
        let pairs = bindings(query);
        let (limit, offset) = window(query);

        let mut found: Vec<Task> = self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .filter(|task| {
                pairs.iter().all(|(column, value)| match column.as_str() {
                    "user_id" => task.user_id == text(value),
                    "status" => task.status == text(value),
                    "title" => {
                        let needle = text(value).trim_matches('%').to_lowercase();
                        task.title.to_lowercase().contains(&needle)
                    }
                    _ => true,
                })
            })
            .cloned()
            .collect();

        let order = Regex::new(r"ORDER BY (\w+) (ASC|DESC)").unwrap();
        let c = order.captures(&query.text).unwrap();
        match &c[1] {
            "title" => found.sort_by(|a, b| a.title.cmp(&b.title)),
            "status" => found.sort_by(|a, b| a.status.cmp(&b.status)),
            _ => found.sort_by(|a, b| a.id.cmp(&b.id)),
        }
        if &c[2] == "DESC" {
            found.reverse();
        }

        Ok(found.into_iter().skip(offset).take(limit).collect())
    }

    async fn insert(&self, task: &Task) -> Result<Task, StoreError> {
        self.tasks.lock().unwrap().push(task.clone());
        Ok(task.clone())
    }

    async fn get(&self, owner_id: &str, task_id: &str) -> Result<Task, StoreError> {
        self.tasks
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == task_id && t.user_id == owner_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update(&self, query: &BuiltQuery) -> Result<Task, StoreError> {
        self.statements.lock().unwrap().push(query.clone());
        let pairs = bindings(query);
        let key = |name: &str| {
            pairs
                .iter()
                .find(|(c, _)| c == name)
                .map(|(_, v)| text(v))
                .unwrap_or_default()
        };
        let (id, owner) = (key("id"), key("user_id"));

        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id && t.user_id == owner)
            .ok_or(StoreError::NotFound)?;
        for (column, value) in &pairs {
            match (column.as_str(), value) {
                ("title", v) => task.title = text(v),
                ("description", v) => task.description = Some(text(v)),
                ("status", v) => task.status = text(v),
                ("due_date", SqlValue::Timestamp(v)) => task.due_date = Some(*v),
                _ => {}
            }
        }
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    async fn delete(&self, owner_id: &str, task_id: &str) -> Result<(), StoreError> {
        let mut tasks = self.tasks.lock().unwrap();
        let before = tasks.len();
        tasks.retain(|t| !(t.id == task_id && t.user_id == owner_id));
        if tasks.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

pub struct Harness {
    pub users: Arc<MemoryUserStore>,
    pub tasks: Arc<MemoryTaskStore>,
    pub services: AppServices,
}

impl Harness {
    pub fn new() -> Self {
        let tasks = Arc::new(MemoryTaskStore::default());
        let users = Arc::new(MemoryUserStore::cascading_to(tasks.clone()));
        let services = AppServices::new(
            users.clone(),
            tasks.clone(),
            AuthSettings::new(TEST_SECRET, TEST_COST),
        );
        Self {
            users,
            tasks,
            services,
        }
    }
}

/// Builds the full application over the harness's stores.
macro_rules! test_app {
    ($harness:expr) => {{
        let services = $harness.services.clone();
        actix_web::test::init_service(
            actix_web::App::new().configure(move |cfg| todo_api::configure(cfg, &services)),
        )
        .await
    }};
}

/// Status and JSON body of a call, whether the service answered or errored
/// out of a middleware.
pub async fn send<S, B>(app: &S, req: actix_http::Request) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    match app.call(req).await {
        Ok(resp) => {
            let status = resp.status();
            let body = test::read_body(resp).await;
            let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
            (status, json)
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            let body = actix_web::body::to_bytes(resp.into_body())
                .await
                .unwrap_or_default();
            let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
            (status, json)
        }
    }
}

/// Registers a user and returns `(token, user_id)`.
pub async fn register<S, B>(app: &S, name: &str, email: &str, password: &str) -> (String, String)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": name, "email": email, "password": password }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

    (
        body["token"].as_str().unwrap().to_string(),
        body["user_id"].as_str().unwrap().to_string(),
    )
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

