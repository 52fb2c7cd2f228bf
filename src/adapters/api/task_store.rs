use async_trait::async_trait;

use super::dto::{TaskCreateDto, TaskDto, TaskUpdateDto};
use super::ApiClient;
use crate::domain::{StatusFilter, Task, TaskDraft, TaskId, TaskUpdate};
use crate::ports::{StoreResult, TaskStore};

#[derive(Clone)]
pub struct HttpTaskStore {
    client: std::sync::Arc<ApiClient>,
}

impl HttpTaskStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client: std::sync::Arc::new(client),
        }
    }

    fn collection_path(filter: StatusFilter) -> String {
        match filter.query_value() {
            Some(status) => format!("/tasks/?status={}", urlencoding::encode(status)),
            None => "/tasks/".to_string(),
        }
    }
}

#[async_trait]
impl TaskStore for HttpTaskStore {
    async fn list_tasks(&self, filter: StatusFilter) -> StoreResult<Vec<Task>> {
        let path = Self::collection_path(filter);
        let dtos: Vec<TaskDto> = self.client.get(&path).await?;
        dtos.into_iter().map(Task::try_from).collect()
    }

    async fn get_task(&self, id: &TaskId) -> StoreResult<Task> {
        let path = format!("/tasks/{id}");
        let dto: TaskDto = self.client.get(&path).await?;
        dto.try_into()
    }

    async fn create_task(&self, draft: &TaskDraft) -> StoreResult<Task> {
        let dto: TaskDto = self
            .client
            .post("/tasks/", &TaskCreateDto::from(draft))
            .await?;
        dto.try_into()
    }

    async fn update_task(&self, id: &TaskId, update: &TaskUpdate) -> StoreResult<Task> {
        let path = format!("/tasks/{id}");
        let dto: TaskDto = self.client.put(&path, &TaskUpdateDto::from(update)).await?;
        dto.try_into()
    }

    async fn delete_task(&self, id: &TaskId) -> StoreResult<()> {
        let path = format!("/tasks/{id}");
        self.client.delete(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskStatus;

    #[test]
    fn collection_path_scopes_by_status() {
        assert_eq!(HttpTaskStore::collection_path(StatusFilter::All), "/tasks/");
        assert_eq!(
            HttpTaskStore::collection_path(StatusFilter::Only(TaskStatus::InProgress)),
            "/tasks/?status=in_progress"
        );
    }
}
