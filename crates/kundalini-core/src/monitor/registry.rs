//! Ordered, observable set of account statuses.

use kundalini_types::{Account, AccountKey, AccountStatus};
use std::sync::Arc;
use tokio::sync::watch;

use super::observable::{ListenerId, Observable};

/// Immutable ordered view handed to observers.
pub type StatusSnapshot = Arc<[AccountStatus]>;

/// At most one status per account identity, kept in display order.
///
/// Each mutation rebuilds the snapshot and notifies observers before the next
/// mutation can start.
pub struct StatusRegistry {
    statuses: Observable<StatusSnapshot>,
}

impl Default for StatusRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusRegistry {
    pub fn new() -> Self {
        Self { statuses: Observable::new(Arc::from(Vec::<AccountStatus>::new())) }
    }

    /// Insert `status`, replacing any entry for the same account.
    pub fn upsert(&self, status: AccountStatus) {
        let key = status.key();
        self.statuses.update(move |current| {
            let mut next: Vec<AccountStatus> =
                current.iter().filter(|s| s.key() != key).cloned().collect();
            next.push(status);
            next.sort_by(AccountStatus::display_cmp);
            Some(next.into())
        });
    }

    /// Drop the entry for `account`. Returns whether one existed.
    pub fn remove_by_account(&self, account: &Account) -> bool {
        self.remove_by_key(&account.key())
    }

    pub fn remove_by_key(&self, key: &AccountKey) -> bool {
        self.statuses.update(|current| {
            if !current.iter().any(|s| &s.key() == key) {
                return None;
            }
            let next: Vec<AccountStatus> =
                current.iter().filter(|s| &s.key() != key).cloned().collect();
            Some(next.into())
        })
    }

    /// Called with the full ordered snapshot after every change.
    pub fn subscribe<F>(&self, observer: F) -> ListenerId
    where
        F: Fn(&StatusSnapshot) + Send + Sync + 'static,
    {
        self.statuses.subscribe(observer)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.statuses.unsubscribe(id)
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.statuses.get()
    }

    pub fn get(&self, account: &Account) -> Option<AccountStatus> {
        let key = account.key();
        self.snapshot().iter().find(|s| s.key() == key).cloned()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    pub fn watch(&self) -> watch::Receiver<StatusSnapshot> {
        self.statuses.watch()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kundalini_types::{Environment, Tristate};
    use parking_lot::Mutex;

    fn acc(id: i64, name: &str, env: Environment) -> Account {
        Account::new(name, "pw", env).with_id(id)
    }

    fn names(snapshot: &StatusSnapshot) -> Vec<String> {
        snapshot.iter().map(|s| s.username().to_string()).collect()
    }

    #[test]
    fn test_upsert_replaces_same_account() {
        let registry = StatusRegistry::new();
        let a = acc(1, "alice", Environment::E1);
        registry.upsert(AccountStatus::checking(a.clone()));
        registry.upsert(AccountStatus::new(a.clone(), true, false, false));

        assert_eq!(registry.len(), 1);
        let stored = registry.get(&a).expect("present");
        assert_eq!(stored.login_ok, Tristate::Yes);
        assert_eq!(stored.data_found, Tristate::No);
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let registry = StatusRegistry::new();
        let status = AccountStatus::new(acc(1, "alice", Environment::E1), true, true, false);
        registry.upsert(status.clone());
        let first = registry.snapshot();
        registry.upsert(status);
        assert_eq!(&*first, &*registry.snapshot());
    }

    #[test]
    fn test_snapshot_is_ordered_by_environment_then_username() {
        let registry = StatusRegistry::new();
        registry.upsert(AccountStatus::checking(acc(1, "zed", Environment::E1)));
        registry.upsert(AccountStatus::checking(acc(2, "bob", Environment::E3)));
        registry.upsert(AccountStatus::checking(acc(3, "amy", Environment::E2)));
        registry.upsert(AccountStatus::checking(acc(4, "abe", Environment::E1)));

        assert_eq!(names(&registry.snapshot()), vec!["abe", "zed", "amy", "bob"]);
    }

    #[test]
    fn test_unpersisted_account_is_keyed_by_username() {
        let registry = StatusRegistry::new();
        let draft = Account::new("alice", "pw", Environment::E1);
        registry.upsert(AccountStatus::checking(draft.clone()));
        registry.upsert(AccountStatus::new(draft.clone(), false, false, false));
        assert_eq!(registry.len(), 1);

        // Persisted copy has a different identity.
        registry.upsert(AccountStatus::checking(draft.clone().with_id(7)));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_remove_notifies_only_when_present() {
        let registry = StatusRegistry::new();
        let a = acc(1, "alice", Environment::E1);
        registry.upsert(AccountStatus::checking(a.clone()));

        let notified = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&notified);
        registry.subscribe(move |_| *counter.lock() += 1);

        assert!(!registry.remove_by_account(&acc(2, "bob", Environment::E1)));
        assert_eq!(*notified.lock(), 0);

        assert!(registry.remove_by_account(&a));
        assert_eq!(*notified.lock(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_every_observer_sees_every_change() {
        let registry = StatusRegistry::new();
        let seen_a = Arc::new(Mutex::new(Vec::new()));
        let seen_b = Arc::new(Mutex::new(Vec::new()));
        let (sink_a, sink_b) = (Arc::clone(&seen_a), Arc::clone(&seen_b));
        registry.subscribe(move |snap| sink_a.lock().push(snap.len()));
        let id_b = registry.subscribe(move |snap| sink_b.lock().push(snap.len()));

        registry.upsert(AccountStatus::checking(acc(1, "alice", Environment::E1)));
        registry.upsert(AccountStatus::checking(acc(2, "bob", Environment::E1)));
        registry.unsubscribe(id_b);
        registry.upsert(AccountStatus::checking(acc(3, "carol", Environment::E1)));

        assert_eq!(*seen_a.lock(), vec![1, 2, 3]);
        assert_eq!(*seen_b.lock(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_watch_tracks_latest_snapshot() {
        let registry = StatusRegistry::new();
        let mut rx = registry.watch();
        assert!(rx.borrow().is_empty());

        registry.upsert(AccountStatus::checking(acc(1, "alice", Environment::E2)));
        rx.changed().await.expect("sender alive");
        assert_eq!(names(&rx.borrow_and_update()), vec!["alice"]);
    }

    #[test]
    fn test_concurrent_upserts_keep_one_entry_per_account() {
        let registry = Arc::new(StatusRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for i in 0..50i64 {
                        let id = i % 10;
                        let status = AccountStatus::new(
                            acc(id, &format!("user{id}"), Environment::E1),
                            t % 2 == 0,
                            false,
                            false,
                        );
                        registry.upsert(status);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread");
        }

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 10);
        assert!(snapshot.windows(2).all(|w| w[0].display_cmp(&w[1]).is_le()));
    }
}
