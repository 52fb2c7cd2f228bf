use crate::domain::TaskId;
use crate::ports::{ConfigError, StoreError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Another edit is already in progress")]
    EditInProgress,

    #[error("No edit in progress")]
    NoActiveEdit,

    #[error("Unknown task: {0}")]
    UnknownTask(TaskId),

    #[error("A change for task {0} is still in flight")]
    MutationInFlight(TaskId),
}

pub type AppResult<T> = Result<T, AppError>;
