use chrono::{DateTime, Local};
use dashmap::DashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{AppError, AppResult, EditSession};
use crate::domain::{StatusFilter, Task, TaskDraft, TaskId, TaskStatus, TaskUpdate, TimeFilter};
use crate::ports::TaskStore;

/// Owns the authoritative task collection and all view state: both
/// filters, the single edit slot, the loading flag and the per-task
/// in-flight guard.
///
/// Every mutation round-trips to the store and then re-fetches the full
/// collection; the collection is only ever replaced wholesale, never
/// patched. A re-fetch racing a later filter-change fetch is not
/// ordered against it — the last response to resolve wins, and the next
/// refresh converges since this client is the store's only writer.
pub struct ViewController {
    store: Arc<dyn TaskStore>,

    tasks: RwLock<Vec<Task>>,
    status_filter: RwLock<StatusFilter>,
    time_filter: RwLock<TimeFilter>,
    edit: RwLock<EditSession>,
    loading: AtomicBool,
    in_flight: DashSet<TaskId>,
}

impl ViewController {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            store,
            tasks: RwLock::new(Vec::new()),
            status_filter: RwLock::new(StatusFilter::default()),
            time_filter: RwLock::new(TimeFilter::default()),
            edit: RwLock::new(EditSession::default()),
            loading: AtomicBool::new(false),
            in_flight: DashSet::new(),
        }
    }

    /// Replace the collection with a fresh snapshot for the active
    /// status filter. On failure the existing collection is kept;
    /// stale-but-present beats empty.
    pub async fn refresh(&self) -> AppResult<()> {
        let filter = *self.status_filter.read().await;

        self.loading.store(true, Ordering::SeqCst);
        let result = self.store.list_tasks(filter).await;
        self.loading.store(false, Ordering::SeqCst);

        let fresh = result?;
        tracing::debug!("Refreshed {} task(s) for filter {filter}", fresh.len());
        *self.tasks.write().await = fresh;
        Ok(())
    }

    /// The status dimension is applied by the store, so changing it
    /// means a re-fetch.
    pub async fn set_status_filter(&self, filter: StatusFilter) -> AppResult<()> {
        *self.status_filter.write().await = filter;
        self.refresh().await
    }

    /// The time dimension is client-side only; no fetch.
    pub async fn set_time_filter(&self, filter: TimeFilter) {
        *self.time_filter.write().await = filter;
    }

    pub async fn visible_tasks(&self) -> Vec<Task> {
        self.visible_tasks_at(Local::now()).await
    }

    /// Derived list: the time filter projected over the (already
    /// status-filtered) collection at an explicit evaluation instant.
    pub async fn visible_tasks_at(&self, now: DateTime<Local>) -> Vec<Task> {
        let filter = *self.time_filter.read().await;
        let tasks = self.tasks.read().await;
        filter.apply(&tasks, now)
    }

    pub async fn add_task(&self, title: String, description: Option<String>) -> AppResult<Task> {
        let draft = TaskDraft { title, description };
        let created = self.store.create_task(&draft).await?;
        self.refresh().await?;
        Ok(created)
    }

    /// One step around the status cycle, persisted via a partial update.
    pub async fn advance_status(&self, id: &TaskId) -> AppResult<Task> {
        let current = self
            .status_of(id)
            .await
            .ok_or_else(|| AppError::UnknownTask(id.clone()))?;

        self.claim(id)?;
        let update = TaskUpdate {
            status: Some(current.advance()),
            ..Default::default()
        };
        let result = self.store.update_task(id, &update).await;
        self.release(id);

        let updated = result?;
        self.refresh().await?;
        Ok(updated)
    }

    pub async fn remove_task(&self, id: &TaskId) -> AppResult<()> {
        self.claim(id)?;
        let result = self.store.delete_task(id).await;
        self.release(id);

        result?;
        self.refresh().await
    }

    /// Open the edit slot for a task, seeding buffers from its current
    /// fields. Fails while another session is active rather than
    /// discarding that session's buffers.
    pub async fn begin_edit(&self, id: &TaskId) -> AppResult<()> {
        let task = {
            let tasks = self.tasks.read().await;
            tasks
                .iter()
                .find(|t| &t.id == id)
                .cloned()
                .ok_or_else(|| AppError::UnknownTask(id.clone()))?
        };

        let mut edit = self.edit.write().await;
        if edit.is_active() {
            return Err(AppError::EditInProgress);
        }
        *edit = EditSession::begin(&task);
        Ok(())
    }

    /// Replace the active session's buffers. Nothing is persisted until
    /// `save_edit`.
    pub async fn stage_edit(
        &self,
        title: String,
        description: Option<String>,
        status: TaskStatus,
    ) -> AppResult<()> {
        let mut edit = self.edit.write().await;
        match &mut *edit {
            EditSession::Editing {
                title: t,
                description: d,
                status: s,
                ..
            } => {
                *t = title;
                *d = description;
                *s = status;
                Ok(())
            }
            EditSession::Idle => Err(AppError::NoActiveEdit),
        }
    }

    /// Commit the active session. On success the slot empties and the
    /// collection is re-fetched; on failure the session stays active
    /// with its buffers intact and the error is returned.
    pub async fn save_edit(&self) -> AppResult<Task> {
        let (id, update) = self
            .edit
            .read()
            .await
            .to_update()
            .ok_or(AppError::NoActiveEdit)?;

        self.claim(&id)?;
        let result = self.store.update_task(&id, &update).await;
        self.release(&id);

        let updated = result?;
        *self.edit.write().await = EditSession::Idle;
        self.refresh().await?;
        Ok(updated)
    }

    /// Discard the active session's buffers. No network call.
    pub async fn cancel_edit(&self) {
        *self.edit.write().await = EditSession::Idle;
    }

    /// Read-through for a single task; does not touch the collection.
    pub async fn fetch_task(&self, id: &TaskId) -> AppResult<Task> {
        Ok(self.store.get_task(id).await?)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub async fn tasks(&self) -> Vec<Task> {
        self.tasks.read().await.clone()
    }

    pub async fn edit_session(&self) -> EditSession {
        self.edit.read().await.clone()
    }

    pub async fn status_filter(&self) -> StatusFilter {
        *self.status_filter.read().await
    }

    pub async fn time_filter(&self) -> TimeFilter {
        *self.time_filter.read().await
    }

    async fn status_of(&self, id: &TaskId) -> Option<TaskStatus> {
        self.tasks
            .read()
            .await
            .iter()
            .find(|t| &t.id == id)
            .map(|t| t.status)
    }

    /// A second mutation for a task whose previous one has not resolved
    /// fails fast; duplicate clicks are not queued.
    fn claim(&self, id: &TaskId) -> AppResult<()> {
        if self.in_flight.insert(id.clone()) {
            Ok(())
        } else {
            Err(AppError::MutationInFlight(id.clone()))
        }
    }

    fn release(&self, id: &TaskId) {
        self.in_flight.remove(id);
    }
}
