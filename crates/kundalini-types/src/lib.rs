//! # Kundalini Types
//!
//! Core types, models, and error definitions for the Kundalini account monitor.
//!
//! - **`error`** - Typed error hierarchy for accounts and configuration
//! - **`models`** - Domain models (Environment, Account, AccountStatus, AppConfig)
//!
//! ## Architecture Role
//!
//! `kundalini-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!   kundalini-types (this crate)
//!          │
//!          ▼
//!   kundalini-core
//!          │
//!          ▼
//!   kundalini-server
//! ```

pub mod error;
pub mod models;

// Re-export error types for convenience
pub use error::{AccountError, ConfigError};

// Re-export core model types
pub use models::{
    Account, AccountKey, AccountStatus, AppConfig, DataHandle, Environment, MonitorConfig,
    TransportConfig, Tristate, VerificationStage,
};
