use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{StatusFilter, Task, TaskDraft, TaskId, TaskUpdate};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store rejected the payload: {0}")]
    Validation(String),

    #[error("Undecodable store response: {0}")]
    Decode(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The remote task store. Operations are one-shot: a failure is returned
/// to the caller and never retried here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Fetch the collection, optionally scoped server-side by status.
    /// The store's ordering is opaque and preserved as returned.
    async fn list_tasks(&self, filter: StatusFilter) -> StoreResult<Vec<Task>>;

    async fn get_task(&self, id: &TaskId) -> StoreResult<Task>;

    /// The created task comes back with a store-assigned id and the
    /// default `pending` status.
    async fn create_task(&self, draft: &TaskDraft) -> StoreResult<Task>;

    /// Partial update; any subset of title/description/status.
    async fn update_task(&self, id: &TaskId, update: &TaskUpdate) -> StoreResult<Task>;

    async fn delete_task(&self, id: &TaskId) -> StoreResult<()>;
}
