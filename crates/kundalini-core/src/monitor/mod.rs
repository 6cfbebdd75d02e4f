//! Account status monitor.
//!
//! Drives the verification workflow for every stored account, on a schedule
//! and on demand, and publishes each stage's outcome into a [`StatusRegistry`].

mod observable;
mod registry;


pub use observable::{ListenerId, Observable};
pub use registry::{StatusRegistry, StatusSnapshot};

use futures::stream::{self, StreamExt};
use kundalini_types::{
    Account, AccountError, AccountStatus, Environment, MonitorConfig, Tristate,
};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::error::AppResult;
use crate::modules::repository::AccountRepository;
use crate::verification::VerificationApi;

/// Counts from one refresh pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RefreshSummary {
    pub checked: usize,
    pub login_ok: usize,
    pub history_found: usize,
}

impl RefreshSummary {
    fn record(&mut self, status: &AccountStatus) {
        self.checked += 1;
        if status.login_ok.is_yes() {
            self.login_ok += 1;
        }
        if status.history_found.is_yes() {
            self.history_found += 1;
        }
    }
}

/// Keeps `is_refreshing` true while any pass holding a guard is alive.
struct RefreshGuard {
    active: Arc<Mutex<usize>>,
    flag: Arc<Observable<bool>>,
}

impl RefreshGuard {
    fn acquire(active: &Arc<Mutex<usize>>, flag: &Arc<Observable<bool>>) -> Self {
        let mut count = active.lock();
        *count += 1;
        if *count == 1 {
            flag.set(true);
        }
        drop(count);
        Self { active: Arc::clone(active), flag: Arc::clone(flag) }
    }
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        let mut count = self.active.lock();
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.flag.set(false);
        }
    }
}

pub struct StatusMonitor {
    repository: Arc<dyn AccountRepository>,
    api: Arc<dyn VerificationApi>,
    registry: Arc<StatusRegistry>,
    is_refreshing: Arc<Observable<bool>>,
    active_passes: Arc<Mutex<usize>>,
    refresh_interval: Duration,
    max_concurrent_checks: usize,
}

impl StatusMonitor {
    pub fn new(
        repository: Arc<dyn AccountRepository>,
        api: Arc<dyn VerificationApi>,
        config: &MonitorConfig,
    ) -> Self {
        Self {
            repository,
            api,
            registry: Arc::new(StatusRegistry::new()),
            is_refreshing: Arc::new(Observable::new(false)),
            active_passes: Arc::new(Mutex::new(0)),
            refresh_interval: config.refresh_interval(),
            max_concurrent_checks: config.effective_concurrency(),
        }
    }

    /// Override the delay between scheduled passes.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn registry(&self) -> &Arc<StatusRegistry> {
        &self.registry
    }

    /// True while any refresh pass is running.
    pub fn is_refreshing(&self) -> &Arc<Observable<bool>> {
        &self.is_refreshing
    }

    pub async fn get_account_count(&self) -> usize {
        self.repository.count_all().await
    }

    /// Verify one account, publishing the status after every stage.
    pub async fn run_workflow(&self, account: Account) -> AccountStatus {
        let username = account.username.clone();
        let environment = account.environment;
        self.registry.upsert(AccountStatus::checking(account.clone()));

        let session =
            self.api.authenticate(&account.username, &account.password, environment).await;
        let Some(session) = session.filter(|s| !s.trim().is_empty()) else {
            tracing::info!(username = %username, env = %environment, "[Monitor] Login failed");
            return self.publish(AccountStatus::new(account, false, false, false));
        };
        self.registry.upsert(AccountStatus::new(
            account.clone(),
            true,
            Tristate::Unknown,
            Tristate::Unknown,
        ));

        let handles = self.api.enumerate_data_handles(&session, environment).await;
        if handles.is_empty() {
            tracing::info!(username = %username, env = %environment, "[Monitor] No data handles");
            return self.publish(AccountStatus::new(account, true, false, false));
        }
        self.registry.upsert(AccountStatus::new(account.clone(), true, true, Tristate::Unknown));

        let mut history_found = false;
        for handle in &handles {
            let found = self.api.fetch_detail(&session, handle, environment).await;
            tracing::debug!(
                username = %username,
                key = %handle.key,
                found,
                "[Monitor] Detail fetched"
            );
            history_found |= found;
        }

        tracing::info!(
            username = %username,
            env = %environment,
            handles = handles.len(),
            history_found,
            "[Monitor] Verification finished"
        );
        self.publish(AccountStatus::new(account, true, true, history_found))
    }

    fn publish(&self, status: AccountStatus) -> AccountStatus {
        self.registry.upsert(status.clone());
        status
    }

    /// Verify every stored account once, at most `max_concurrent_checks` at a time.
    pub async fn refresh_once(&self) -> RefreshSummary {
        let _guard = RefreshGuard::acquire(&self.active_passes, &self.is_refreshing);

        let accounts = self.repository.find_all().await;
        tracing::info!(
            accounts = accounts.len(),
            concurrency = self.max_concurrent_checks,
            "[Monitor] Refresh pass started"
        );

        let statuses: Vec<AccountStatus> = stream::iter(accounts)
            .map(|account| self.run_workflow(account))
            .buffer_unordered(self.max_concurrent_checks)
            .collect()
            .await;

        let mut summary = RefreshSummary::default();
        for status in &statuses {
            summary.record(status);
        }
        tracing::info!(
            checked = summary.checked,
            login_ok = summary.login_ok,
            history_found = summary.history_found,
            "[Monitor] Refresh pass finished"
        );
        summary
    }

    /// Refresh, sleep, repeat until `shutdown` turns true or its sender is dropped.
    pub async fn run_forever(&self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            interval_secs = self.refresh_interval.as_secs(),
            "[Monitor] Scheduler started"
        );

        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            self.refresh_once().await;

            let sleep = tokio::time::sleep(self.refresh_interval);
            tokio::pin!(sleep);
            let stop = loop {
                tokio::select! {
                    () = &mut sleep => break false,
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow_and_update() {
                            break true;
                        }
                    }
                }
            };
            if stop {
                break;
            }
        }

        tracing::info!("[Monitor] Scheduler stopped");
    }

    /// Create (`id` absent) or update the account, then verify it.
    pub async fn save_account(
        &self,
        id: Option<i64>,
        username: &str,
        password: &str,
        environment: Environment,
    ) -> AppResult<AccountStatus> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AccountError::ValidationError {
                field: "username".to_string(),
                message: "must not be blank".to_string(),
            }
            .into());
        }
        let draft = Account::new(username, password, environment);
        let saved = match id {
            None => self.repository.create(draft).await?,
            Some(id) => self.repository.update(draft.with_id(id)).await?,
        };
        Ok(self.run_workflow(saved).await)
    }

    /// Delete from storage, then drop the account's status.
    pub async fn delete_account(&self, account: &Account) -> AppResult<()> {
        self.repository.delete(account).await?;
        self.registry.remove_by_account(account);
        Ok(())
    }

    /// Verify the stored account with this username, if any.
    pub async fn check_account(&self, username: &str) -> Option<AccountStatus> {
        let account = self.repository.find_by_username(username).await?;
        Some(self.run_workflow(account).await)
    }
}
