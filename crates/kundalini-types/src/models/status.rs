//! Verification status snapshots.

use super::{Account, AccountKey, Environment};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Outcome of a single verification check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tristate {
    /// The check has not run yet in the current pass
    #[default]
    Unknown,
    Yes,
    No,
}

impl Tristate {
    /// Collapse to a boolean, treating `Unknown` as `false`.
    pub const fn is_yes(self) -> bool {
        matches!(self, Tristate::Yes)
    }

    pub const fn is_known(self) -> bool {
        !matches!(self, Tristate::Unknown)
    }

    /// Ordering used for display: `Unknown` sorts like `No`.
    pub fn sort_cmp(self, other: Self) -> Ordering {
        self.is_yes().cmp(&other.is_yes())
    }
}

impl From<bool> for Tristate {
    fn from(value: bool) -> Self {
        if value {
            Tristate::Yes
        } else {
            Tristate::No
        }
    }
}

impl From<Option<bool>> for Tristate {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Tristate::Unknown, Tristate::from)
    }
}

impl fmt::Display for Tristate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tristate::Unknown => f.write_str("?"),
            Tristate::Yes => f.write_str("yes"),
            Tristate::No => f.write_str("no"),
        }
    }
}

/// Where a verification run stopped, derived from a status tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStage {
    Checking,
    AuthFailed,
    Authenticated,
    NoData,
    DataFound,
    HistoryFound,
    NoHistory,
}

/// Snapshot of the verification outcome for one account.
///
/// The registry identifies entries by [`AccountStatus::key`]. `==` is
/// structural and also compares the account fields and check results, so two
/// snapshots of the same entry are unequal once a check changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStatus {
    pub account: Account,
    pub login_ok: Tristate,
    pub data_found: Tristate,
    pub history_found: Tristate,
}

impl AccountStatus {
    /// Fresh "currently checking" snapshot with every check unknown.
    pub fn checking(account: Account) -> Self {
        Self {
            account,
            login_ok: Tristate::Unknown,
            data_found: Tristate::Unknown,
            history_found: Tristate::Unknown,
        }
    }

    pub fn new(
        account: Account,
        login_ok: impl Into<Tristate>,
        data_found: impl Into<Tristate>,
        history_found: impl Into<Tristate>,
    ) -> Self {
        Self {
            account,
            login_ok: login_ok.into(),
            data_found: data_found.into(),
            history_found: history_found.into(),
        }
    }

    pub fn key(&self) -> AccountKey {
        self.account.key()
    }

    pub fn username(&self) -> &str {
        &self.account.username
    }

    pub const fn environment(&self) -> Environment {
        self.account.environment
    }

    /// Display order: environment, username, then each check with unknown as false.
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        self.environment()
            .cmp(&other.environment())
            .then_with(|| self.username().cmp(other.username()))
            .then_with(|| self.login_ok.sort_cmp(other.login_ok))
            .then_with(|| self.data_found.sort_cmp(other.data_found))
            .then_with(|| self.history_found.sort_cmp(other.history_found))
    }

    /// A later stage is never `Yes` unless every earlier stage is `Yes`.
    pub fn is_consistent(&self) -> bool {
        let data_ok = !self.data_found.is_yes() || self.login_ok.is_yes();
        let history_ok = !self.history_found.is_yes() || self.data_found.is_yes();
        data_ok && history_ok
    }

    pub fn stage(&self) -> VerificationStage {
        match (self.login_ok, self.data_found, self.history_found) {
            (Tristate::Unknown, _, _) => VerificationStage::Checking,
            (Tristate::No, _, _) => VerificationStage::AuthFailed,
            (Tristate::Yes, Tristate::Unknown, _) => VerificationStage::Authenticated,
            (Tristate::Yes, Tristate::No, _) => VerificationStage::NoData,
            (Tristate::Yes, Tristate::Yes, Tristate::Unknown) => VerificationStage::DataFound,
            (Tristate::Yes, Tristate::Yes, Tristate::Yes) => VerificationStage::HistoryFound,
            (Tristate::Yes, Tristate::Yes, Tristate::No) => VerificationStage::NoHistory,
        }
    }
}
