//! Unified error types for Kundalini Core.

use kundalini_types::AccountError;
use thiserror::Error;

use crate::modules::repository::RepositoryError;

/// Main error type for Kundalini operations that can fail.
///
/// Verification never fails with an error; its failures are reported as
/// status values instead.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    /// Account write rejected (validation, duplicate, missing, storage).
    #[error(transparent)]
    Account(#[from] AccountError),

    /// Configuration loading or validation failed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP transport could not be built.
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Result type alias for Kundalini operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Account(e.into())
    }
}
