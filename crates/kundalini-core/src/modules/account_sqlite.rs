//! SQLite-backed account storage.

use async_trait::async_trait;
use kundalini_types::{Account, Environment};
use parking_lot::Mutex;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::path::Path;
use std::sync::Arc;

use super::repository::{AccountRepository, RepoResult, RepositoryError};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS test_account (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    environment TEXT NOT NULL
)";

const SELECT_COLUMNS: &str = "SELECT id, username, password, environment FROM test_account";

/// Account repository over a single SQLite connection.
///
/// Every statement runs on the blocking thread pool.
#[derive(Clone)]
pub struct SqliteAccountRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteAccountRepository {
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(db_err)?;
        tracing::info!(path = %path.display(), "[Repository] Opened account database");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> RepoResult<Self> {
        Self::with_connection(Connection::open_in_memory().map_err(db_err)?)
    }

    fn with_connection(conn: Connection) -> RepoResult<Self> {
        conn.execute(SCHEMA, []).map_err(db_err)?;
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    async fn run<T, F>(&self, f: F) -> RepoResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> RepoResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            f(&guard)
        })
        .await
        .map_err(|e| RepositoryError::TaskJoin(e.to_string()))?
    }

    /// Run a read and degrade to `fallback` on failure.
    async fn read<T, F>(&self, op: &'static str, fallback: T, f: F) -> T
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> RepoResult<T> + Send + 'static,
    {
        match self.run(f).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("[Repository] {} failed: {}", op, e);
                fallback
            },
        }
    }
}

fn db_err(e: rusqlite::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(e, rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation)
}

/// Map one row; rows with an unknown environment are reported as `None`.
fn account_from_row(row: &Row<'_>) -> rusqlite::Result<Option<Account>> {
    let id: i64 = row.get(0)?;
    let username: String = row.get(1)?;
    let password: String = row.get(2)?;
    let environment: String = row.get(3)?;
    match environment.parse::<Environment>() {
        Ok(env) => Ok(Some(Account::new(username, password, env).with_id(id))),
        Err(e) => {
            tracing::warn!(id, "[Repository] Skipping account with bad environment: {}", e);
            Ok(None)
        },
    }
}

fn query_accounts(
    conn: &Connection,
    sql: &str,
    args: impl rusqlite::Params,
) -> RepoResult<Vec<Account>> {
    let mut stmt = conn.prepare(sql).map_err(db_err)?;
    let rows = stmt.query_map(args, account_from_row).map_err(db_err)?;
    let mut accounts = Vec::new();
    for row in rows {
        if let Some(account) = row.map_err(db_err)? {
            accounts.push(account);
        }
    }
    Ok(accounts)
}

fn query_one(
    conn: &Connection,
    sql: &str,
    args: impl rusqlite::Params,
) -> RepoResult<Option<Account>> {
    conn.query_row(sql, args, account_from_row).optional().map_err(db_err).map(Option::flatten)
}

#[async_trait]
impl AccountRepository for SqliteAccountRepository {
    async fn count_all(&self) -> usize {
        self.read("count_all", 0, |conn| {
            conn.query_row("SELECT COUNT(*) FROM test_account", [], |row| row.get::<_, i64>(0))
                .map(|n| usize::try_from(n).unwrap_or(0))
                .map_err(db_err)
        })
        .await
    }

    async fn find_all(&self) -> Vec<Account> {
        self.read("find_all", Vec::new(), |conn| {
            query_accounts(conn, &format!("{} ORDER BY id", SELECT_COLUMNS), [])
        })
        .await
    }

    async fn find_by_id(&self, id: i64) -> Option<Account> {
        self.read("find_by_id", None, move |conn| {
            query_one(conn, &format!("{} WHERE id = ?1", SELECT_COLUMNS), params![id])
        })
        .await
    }

    async fn find_by_username(&self, username: &str) -> Option<Account> {
        let username = username.to_string();
        self.read("find_by_username", None, move |conn| {
            query_one(conn, &format!("{} WHERE username = ?1", SELECT_COLUMNS), params![username])
        })
        .await
    }

    async fn find_by_environment(&self, environment: Environment) -> Vec<Account> {
        self.read("find_by_environment", Vec::new(), move |conn| {
            query_accounts(
                conn,
                &format!("{} WHERE environment = ?1 ORDER BY id", SELECT_COLUMNS),
                params![environment.as_str()],
            )
        })
        .await
    }

    async fn create(&self, account: Account) -> RepoResult<Account> {
        let created = self
            .run(move |conn| {
                let inserted = conn.execute(
                    "INSERT INTO test_account (username, password, environment) VALUES (?1, ?2, ?3)",
                    params![account.username, account.password, account.environment.as_str()],
                );
                match inserted {
                    Ok(_) => Ok(account.with_id(conn.last_insert_rowid())),
                    Err(e) if is_unique_violation(&e) => {
                        Err(RepositoryError::AlreadyExists(account.username))
                    },
                    Err(e) => Err(db_err(e)),
                }
            })
            .await?;
        tracing::info!(id = ?created.id, username = %created.username, "[Repository] Account created");
        Ok(created)
    }

    async fn update(&self, account: Account) -> RepoResult<Account> {
        let id = account.id.ok_or(RepositoryError::MissingId("updated"))?;
        self.run(move |conn| {
            let changed = conn.execute(
                "UPDATE test_account SET username = ?1, password = ?2, environment = ?3 WHERE id = ?4",
                params![account.username, account.password, account.environment.as_str(), id],
            );
            match changed {
                Ok(0) => Err(RepositoryError::NotFound(id)),
                Ok(_) => Ok(account),
                Err(e) if is_unique_violation(&e) => {
                    Err(RepositoryError::AlreadyExists(account.username))
                },
                Err(e) => Err(db_err(e)),
            }
        })
        .await
    }

    async fn delete(&self, account: &Account) -> RepoResult<()> {
        let id = account.id.ok_or(RepositoryError::MissingId("deleted"))?;
        self.run(move |conn| {
            let removed = conn
                .execute("DELETE FROM test_account WHERE id = ?1", params![id])
                .map_err(db_err)?;
            if removed == 0 {
                return Err(RepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await?;
        tracing::info!(id, "[Repository] Account deleted");
        Ok(())
    }
}
