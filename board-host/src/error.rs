//! Host-level errors

use applicant_board::DomainError;
use thiserror::Error;

pub type HostResult<T> = Result<T, HostError>;

#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("config: {0}")]
    Config(String),
    #[error(transparent)]
    Logger(#[from] rolling_logger::LoggerError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("unsupported: {0}")]
    Unsupported(String),
}
