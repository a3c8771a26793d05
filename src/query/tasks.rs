use serde::Deserialize;

use super::{Assignments, BuiltQuery, SqlBuilder};
use crate::models::TaskPatch;

/// Columns selected for every task row, in `Task` field order.
pub const TASK_COLUMNS: &str =
    "id, user_id, title, description, status, due_date, created_at, updated_at";

/// Columns a listing may be ordered by.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Id,
    Title,
    Status,
}

impl SortField {
    pub fn column(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Title => "title",
            SortField::Status => "status",
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A fully-resolved description of one task listing.
///
/// Empty or absent filters are ignored. `page` is 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub owner_id: String,
    pub title_like: Option<String>,
    pub status_equals: Option<String>,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub page: u32,
    pub page_size: u32,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Builds the `SELECT` for a task listing scoped to `spec.owner_id`.
pub fn list_query(spec: &QuerySpec) -> BuiltQuery {
    let mut builder = SqlBuilder::new(&format!("SELECT {} FROM tasks WHERE ", TASK_COLUMNS));
    builder.push_bind("user_id = ", spec.owner_id.as_str());

    if let Some(title) = non_empty(&spec.title_like) {
        builder.push_bind(" AND title ILIKE ", format!("%{}%", title));
    }
    if let Some(status) = non_empty(&spec.status_equals) {
        builder.push_bind(" AND status = ", status);
    }

    builder
        .push(" ORDER BY ")
        .push(spec.sort_field.column())
        .push(" ")
        .push(spec.sort_direction.keyword());

    let limit = i64::from(spec.page_size);
    let offset = i64::from(spec.page.saturating_sub(1)) * limit;
    builder.push_bind(" LIMIT ", limit);
    builder.push_bind(" OFFSET ", offset);

    builder.build()
}

/// Builds the sparse `UPDATE` for one of `owner_id`'s tasks.
///
/// Returns `None` when the patch sets nothing.
pub fn update_query(owner_id: &str, task_id: &str, patch: &TaskPatch) -> Option<BuiltQuery> {
    let mut assignments = Assignments::new();
    assignments
        .set_if("title", patch.title.clone())
        .set_if("description", patch.description.clone())
        .set_if("status", patch.status.clone())
        .set_if("due_date", patch.due_date);

    assignments.into_update(
        "tasks",
        vec![("id", task_id.into()), ("user_id", owner_id.into())],
        TASK_COLUMNS,
    )
}
