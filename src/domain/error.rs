use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Unrecognized task status: {0}")]
    UnrecognizedStatus(String),

    #[error("Unrecognized filter: {0}")]
    UnrecognizedFilter(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
