use std::sync::Arc;

use crate::models::{SearchTasksParams, Task, TaskInput, TaskPatch};
use crate::query::tasks::{list_query, update_query, QuerySpec};
use crate::store::{StoreError, TaskStore};

/// Owner-scoped task operations. Every call is restricted to `owner_id`'s
/// rows, so another user's task is indistinguishable from a missing one.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub async fn list_tasks(&self, spec: &QuerySpec) -> Result<Vec<Task>, StoreError> {
        self.store.list(&list_query(spec)).await
    }

    /// First page of `owner_id`'s tasks matching the given filters, in id order.
    pub async fn search_tasks(
        &self,
        owner_id: &str,
        params: SearchTasksParams,
    ) -> Result<Vec<Task>, StoreError> {
        self.list_tasks(&params.into_spec(owner_id.to_string())).await
    }

    pub async fn create_task(&self, owner_id: &str, input: TaskInput) -> Result<Task, StoreError> {
        let task = Task::new(input, owner_id);
        let created = self.store.insert(&task).await?;
        log::debug!("created task {} for {}", created.id, owner_id);
        Ok(created)
    }

    pub async fn get_task(&self, owner_id: &str, task_id: &str) -> Result<Task, StoreError> {
        self.store.get(owner_id, task_id).await
    }

    /// Applies a sparse update. `Ok(None)` means the patch was empty and the
    /// store was not touched.
    pub async fn update_task(
        &self,
        owner_id: &str,
        task_id: &str,
        patch: &TaskPatch,
    ) -> Result<Option<Task>, StoreError> {
        match update_query(owner_id, task_id, patch) {
            Some(query) => self.store.update(&query).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn delete_task(&self, owner_id: &str, task_id: &str) -> Result<(), StoreError> {
        self.store.delete(owner_id, task_id).await?;
        log::debug!("deleted task {} for {}", task_id, owner_id);
        Ok(())
    }
}
