//! Account repository trait for storage abstraction.
//!
//! Reads never fail: a storage error is logged by the implementation and
//! reported as an empty result. Writes return [`RepositoryError`].

use async_trait::async_trait;
use kundalini_types::{Account, AccountError, Environment};

pub type RepoResult<T> = Result<T, RepositoryError>;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Account not found: {0}")]
    NotFound(i64),
    #[error("Account already exists: {0}")]
    AlreadyExists(String),
    #[error("Account has no id; it must be created before it can be {0}")]
    MissingId(&'static str),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Storage task failed: {0}")]
    TaskJoin(String),
}

impl From<RepositoryError> for AccountError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound(id) => AccountError::NotFound { id: id.to_string() },
            RepositoryError::AlreadyExists(username) => AccountError::AlreadyExists { username },
            RepositoryError::MissingId(action) => AccountError::ValidationError {
                field: "id".to_string(),
                message: format!("required to be {}", action),
            },
            RepositoryError::Database(message) | RepositoryError::TaskJoin(message) => {
                AccountError::StorageError { message }
            },
        }
    }
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn count_all(&self) -> usize;
    async fn find_all(&self) -> Vec<Account>;
    async fn find_by_id(&self, id: i64) -> Option<Account>;
    async fn find_by_username(&self, username: &str) -> Option<Account>;
    async fn find_by_environment(&self, environment: Environment) -> Vec<Account>;

    /// Persist a new account and return it with its assigned id.
    async fn create(&self, account: Account) -> RepoResult<Account>;
    async fn update(&self, account: Account) -> RepoResult<Account>;
    async fn delete(&self, account: &Account) -> RepoResult<()>;
}
