//! Core domain models for Kundalini.
//!
//! This module contains all shared data structures used across the workspace.

mod account;
mod config;
mod environment;
mod status;

// Re-export all models
pub use account::{Account, AccountKey, DataHandle};
pub use config::{AppConfig, MonitorConfig, TransportConfig, DIRECT_ROUTE};
pub use environment::Environment;
pub use status::{AccountStatus, Tristate, VerificationStage};
