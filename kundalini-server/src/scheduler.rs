//! Background Status Monitor
//!
//! Runs `StatusMonitor::run_forever` as a tokio task and mirrors registry
//! changes and refresh transitions into the log.
//!
//! Features:
//! - Configurable interval (`monitor.refresh_interval_minutes`, default 60)
//! - Cooperative shutdown through a watch channel; an in-flight pass completes
//! - Logs an account only when its finished outcome changes

use std::collections::HashMap;
use std::sync::Arc;

use kundalini_core::StatusRegistry;
use kundalini_types::{AccountKey, AccountStatus};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::state::AppState;

type Outcome = (bool, bool, bool);

/// Handle to the running monitor task.
pub struct MonitorTask {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl MonitorTask {
    /// Request shutdown and wait for the loop to exit.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.handle.await {
            tracing::error!("[Scheduler] Monitor task panicked: {}", e);
        }
    }
}

/// Start the status monitor scheduler as a background tokio task
pub fn start_monitor(state: &AppState) -> MonitorTask {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    state.monitor.is_refreshing().subscribe(|refreshing: &bool| {
        if *refreshing {
            tracing::info!("[Scheduler] Refresh started");
        } else {
            tracing::info!("[Scheduler] Refresh finished");
        }
    });

    log_registry_changes(state.monitor.registry());

    let monitor = Arc::clone(&state.monitor);
    let handle = tokio::spawn(async move { monitor.run_forever(shutdown_rx).await });

    MonitorTask { shutdown_tx, handle }
}

/// Last logged outcome per account, shared with the registry observer.
#[derive(Default)]
struct OutcomeLog {
    logged: Mutex<HashMap<AccountKey, Outcome>>,
}

impl OutcomeLog {
    fn record(&self, snapshot: &[AccountStatus]) -> usize {
        log_changed_outcomes(&mut self.logged.lock(), snapshot)
    }

    fn tracked(&self) -> usize {
        self.logged.lock().len()
    }
}

fn log_registry_changes(registry: &StatusRegistry) -> Arc<OutcomeLog> {
    let log = Arc::new(OutcomeLog::default());
    let observer = Arc::clone(&log);
    registry.subscribe(move |snapshot| {
        tracing::debug!("[Scheduler] Registry updated: {} statuses", snapshot.len());
        observer.record(snapshot);
    });
    log
}

/// No check is still pending for this run.
fn is_finished(status: &AccountStatus) -> bool {
    status.login_ok.is_known() && status.data_found.is_known() && status.history_found.is_known()
}

/// Log finished statuses whose outcome differs from the last one logged.
/// Returns how many lines were logged.
fn log_changed_outcomes(
    logged: &mut HashMap<AccountKey, Outcome>,
    snapshot: &[AccountStatus],
) -> usize {
    logged.retain(|key, _| snapshot.iter().any(|s| &s.key() == key));

    let mut lines = 0;
    for status in snapshot.iter().filter(|s| is_finished(s)) {
        let outcome = (
            status.login_ok.is_yes(),
            status.data_found.is_yes(),
            status.history_found.is_yes(),
        );
        if logged.insert(status.key(), outcome) == Some(outcome) {
            continue;
        }
        tracing::info!(
            env = %status.environment(),
            username = status.username(),
            stage = ?status.stage(),
            login = %status.login_ok,
            data = %status.data_found,
            history = %status.history_found,
            "[Scheduler] Account verified"
        );
        lines += 1;
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use kundalini_types::{Account, Environment};

    fn status(id: i64, login: bool) -> AccountStatus {
        AccountStatus::new(Account::new(format!("u{id}"), "pw", Environment::E1).with_id(id), login, false, false)
    }

    #[test]
    fn test_only_changed_outcomes_are_logged() {
        let mut logged = HashMap::new();
        assert_eq!(log_changed_outcomes(&mut logged, &[status(1, true), status(2, false)]), 2);
        assert_eq!(log_changed_outcomes(&mut logged, &[status(1, true), status(2, false)]), 0);
        assert_eq!(log_changed_outcomes(&mut logged, &[status(1, false), status(2, false)]), 1);
    }

    #[test]
    fn test_checking_status_is_not_logged() {
        let mut logged = HashMap::new();
        let checking = AccountStatus::checking(Account::new("u1", "pw", Environment::E1).with_id(1));
        assert_eq!(log_changed_outcomes(&mut logged, &[checking]), 0);
        assert!(logged.is_empty());
    }

    #[test]
    fn test_removed_accounts_are_forgotten() {
        let mut logged = HashMap::new();
        log_changed_outcomes(&mut logged, &[status(1, true)]);
        log_changed_outcomes(&mut logged, &[]);
        assert_eq!(log_changed_outcomes(&mut logged, &[status(1, true)]), 1);
    }

    #[test]
    fn test_registry_observer_tracks_finished_accounts() {
        let registry = StatusRegistry::new();
        let log = log_registry_changes(&registry);

        registry.upsert(AccountStatus::checking(Account::new("u1", "pw", Environment::E1).with_id(1)));
        assert_eq!(log.tracked(), 0);

        registry.upsert(status(1, true));
        registry.upsert(status(2, false));
        assert_eq!(log.tracked(), 2);
        assert_eq!(log.record(&registry.snapshot()), 0);

        registry.remove_by_key(&status(2, false).key());
        assert_eq!(log.tracked(), 1);
    }
}
