//! Account model and related types.

use super::Environment;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A monitored test account.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    /// Storage identifier, `None` until the account is first persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Login name, unique across the repository
    pub username: String,
    /// Login password
    pub password: String,
    /// Deployment the account belongs to
    pub environment: Environment,
}

impl Account {
    /// Create an account that has not been persisted yet.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        environment: Environment,
    ) -> Self {
        Self { id: None, username: username.into(), password: password.into(), environment }
    }

    /// Same account with the given storage identifier.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Identity used to deduplicate status snapshots.
    pub fn key(&self) -> AccountKey {
        match self.id {
            Some(id) => AccountKey::Id(id),
            None => AccountKey::Username(self.username.clone()),
        }
    }
}

// Manual impl keeps the password out of logs.
impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password", &"***")
            .field("environment", &self.environment)
            .finish()
    }
}

/// Identity of an account.
///
/// Persisted accounts are identified by their numeric id; an account that was
/// never stored falls back to its username.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AccountKey {
    Id(i64),
    Username(String),
}

impl fmt::Display for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountKey::Id(id) => write!(f, "#{}", id),
            AccountKey::Username(name) => write!(f, "{}", name),
        }
    }
}

/// One retrievable data item returned by the enumeration stage.
///
/// Only lives for the duration of a single verification run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataHandle {
    pub key: String,
    pub account_token: String,
}

impl DataHandle {
    pub fn new(key: impl Into<String>, account_token: impl Into<String>) -> Self {
        Self { key: key.into(), account_token: account_token.into() }
    }
}
