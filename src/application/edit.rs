use crate::domain::{Task, TaskId, TaskStatus, TaskUpdate};

/// The single edit slot. There is one of these for the whole view, not
/// one per task, so a second edit cannot start until the first commits
/// or cancels.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditSession {
    #[default]
    Idle,
    Editing {
        task_id: TaskId,
        title: String,
        description: Option<String>,
        status: TaskStatus,
    },
}

impl EditSession {
    /// Open a session seeded from the task's current field values.
    pub fn begin(task: &Task) -> Self {
        EditSession::Editing {
            task_id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, EditSession::Editing { .. })
    }

    /// Commit payload: all three buffers, whether touched or not.
    /// `None` while idle.
    pub fn to_update(&self) -> Option<(TaskId, TaskUpdate)> {
        match self {
            EditSession::Idle => None,
            EditSession::Editing {
                task_id,
                title,
                description,
                status,
            } => Some((
                task_id.clone(),
                TaskUpdate {
                    title: Some(title.clone()),
                    description: Some(description.clone()),
                    status: Some(*status),
                },
            )),
        }
    }
}
