use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::query::tasks::{QuerySpec, SortDirection, SortField};

/// Status of a task that is still open.
pub const STATUS_ACTIVE: &str = "active";
/// Status of a completed task.
pub const STATUS_DONE: &str = "done";

/// Default and maximum page sizes for task listings.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

lazy_static! {
    // Accepted values for a task's status.
    static ref STATUS_REGEX: Regex = Regex::new(r"^(active|done)$").unwrap();
    // Same, but an empty filter means "no filter".
    static ref STATUS_FILTER_REGEX: Regex = Regex::new(r"^(active|done)?$").unwrap();
}

/// Input structure for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task.
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// An optional description for the task.
    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// `active` or `done`; defaults to `active` when omitted.
    #[validate(regex(path = "STATUS_REGEX", message = "status must be either 'active' or 'done'"))]
    pub status: Option<String>,

    /// Optional due date for the task.
    pub due_date: Option<DateTime<Utc>>,
}

/// A sparse task update. Absent fields are left untouched.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
pub struct TaskPatch {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(regex(path = "STATUS_REGEX", message = "status must be either 'active' or 'done'"))]
    pub status: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: String,
    /// Identifier of the user who owns the task.
    pub user_id: String,
    /// The title of the task.
    pub title: String,
    /// An optional description for the task.
    pub description: Option<String>,
    /// `active` or `done`.
    pub status: String,
    /// Optional due date for the task.
    pub due_date: Option<DateTime<Utc>>,
    /// Timestamp of when the task was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update to the task.
    pub updated_at: DateTime<Utc>,
}

/// Query parameters accepted by `GET /api/tasks`.
///
/// Sort column and direction deserialize straight into their enums, so an
/// unknown value is rejected while binding and never reaches the query builder.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListTasksParams {
    /// Case-insensitive substring match on the title.
    pub title: Option<String>,
    /// Exact status match; empty means no filter.
    #[validate(regex(path = "STATUS_FILTER_REGEX", message = "status must be either 'active' or 'done'"))]
    pub status: Option<String>,
    pub sort_by: Option<SortField>,
    pub order: Option<SortDirection>,
    #[validate(range(min = 1))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100))]
    pub page_size: Option<u32>,
}

impl ListTasksParams {
    /// Turns validated parameters into a query description for `owner_id`.
    pub fn into_spec(self, owner_id: String) -> QuerySpec {
        QuerySpec {
            owner_id,
            title_like: self.title,
            status_equals: self.status,
            sort_field: self.sort_by.unwrap_or_default(),
            sort_direction: self.order.unwrap_or_default(),
            page: self.page.unwrap_or(1),
            page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }
}

/// Query parameters accepted by `GET /api/tasks/search`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SearchTasksParams {
    pub title: Option<String>,
    #[validate(regex(path = "STATUS_FILTER_REGEX", message = "status must be either 'active' or 'done'"))]
    pub status: Option<String>,
}

impl SearchTasksParams {
    /// A search needs at least one non-empty filter.
    pub fn is_empty(&self) -> bool {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, str::is_empty);
        blank(&self.title) && blank(&self.status)
    }

    /// Searches return the first page of matches in id order.
    pub fn into_spec(self, owner_id: String) -> QuerySpec {
        QuerySpec {
            owner_id,
            title_like: self.title,
            status_equals: self.status,
            sort_field: SortField::Id,
            sort_direction: SortDirection::Asc,
            page: 1,
            page_size: MAX_PAGE_SIZE,
        }
    }
}

impl Task {
    /// Creates a new `Task` from `TaskInput` for `owner_id`, with a fresh UUID
    /// and both timestamps set to now.
    pub fn new(input: TaskInput, owner_id: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: owner_id.to_string(),
            title: input.title,
            description: input.description,
            status: input.status.unwrap_or_else(|| STATUS_ACTIVE.to_string()),
            due_date: input.due_date,
            created_at: now,
            updated_at: now,
        }
    }
}
