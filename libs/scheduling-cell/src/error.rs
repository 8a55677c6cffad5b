use thiserror::Error;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Invalid schedule window: {0}")]
    InvalidWindow(String),

    #[error("Invalid query range: {0}")]
    InvalidRange(String),

    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    #[error("No schedule window found: {0}")]
    ScheduleNotFound(String),

    #[error("Schedule conflict: {0}")]
    ScheduleConflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::InvalidWindow(msg) => AppError::ValidationError(msg),
            SchedulingError::InvalidRange(msg) => AppError::BadRequest(msg),
            SchedulingError::ProviderNotFound(msg) => AppError::NotFound(msg),
            SchedulingError::ScheduleNotFound(msg) => AppError::NotFound(msg),
            SchedulingError::ScheduleConflict(msg) => AppError::Conflict(msg),
            SchedulingError::Storage(msg) => AppError::Internal(msg),
        }
    }
}
