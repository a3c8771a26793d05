pub mod task;
pub mod user;

pub use task::{ListTasksParams, SearchTasksParams, Task, TaskInput, TaskPatch};
pub use user::{Credential, NewUser, ProfileUpdate, User};
