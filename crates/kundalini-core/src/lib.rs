//! # Kundalini Core
//!
//! Core logic for the Kundalini account monitor.
//!
//! ## Architecture
//!
//! ```text
//! kundalini-core/src/
//! ├── transport/     # Shared HTTP client state: host cookie jar, rotating routes
//! ├── verification/  # Three-stage remote protocol (signin, dataBlob, getInformation)
//! ├── modules/       # Account repository contract, SQLite storage, config file
//! ├── monitor/       # StatusRegistry, Observable flag, StatusMonitor scheduler
//! └── utils/         # HTTP client builder, data-dir paths, JSON path lookup
//! ```
//!
//! `StatusMonitor` reads accounts through `AccountRepository`, drives a
//! `VerificationApi` for each one and publishes every stage into the
//! `StatusRegistry`, which front ends observe.

#![allow(
    clippy::significant_drop_tightening,
    reason = "Registry notifications run while the registry lock is held"
)]
#![allow(clippy::implicit_clone, reason = "Explicit .clone() vs .to_string() is stylistic")]
// Test-only lints: allow panic!, println!, etc. in test code
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::print_stdout,
        clippy::unwrap_used,
        clippy::assertions_on_result_states
    )
)]

pub mod error;
pub mod modules;
pub mod monitor;
pub mod transport;
pub mod utils;
pub mod verification;

// Re-export commonly used types
pub use error::{AppError, AppResult};
pub use kundalini_types::{Account, AccountStatus, AppConfig, DataHandle, Environment, Tristate};
pub use modules::account_sqlite::SqliteAccountRepository;
pub use modules::repository::{AccountRepository, RepoResult, RepositoryError};
pub use monitor::{RefreshSummary, StatusMonitor, StatusRegistry, StatusSnapshot};
pub use transport::Transport;
pub use verification::{HttpVerificationClient, VerificationApi};
