use super::{Assignments, BuiltQuery};

/// Columns of the public `User` view.
pub const USER_COLUMNS: &str = "id, name, email, created_at, updated_at";

/// Profile columns after validation; the password is already hashed.
#[derive(Debug, Default, Clone)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

/// Builds the sparse `UPDATE` for one user's profile, or `None` when nothing changes.
pub fn update_query(user_id: &str, changes: ProfileChanges) -> Option<BuiltQuery> {
    let mut assignments = Assignments::new();
    assignments
        .set_if("name", changes.name)
        .set_if("email", changes.email)
        .set_if("password_hash", changes.password_hash);

    assignments.into_update("users", vec![("id", user_id.into())], USER_COLUMNS)
}
