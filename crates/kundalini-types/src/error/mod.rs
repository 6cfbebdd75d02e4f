//! Typed error definitions for Kundalini.
//!
//! Errors are serializable so the CLI can emit them as JSON, and displayable
//! for logs. Match on the variants, not on the messages.

mod account;
mod config;

pub use account::AccountError;
pub use config::ConfigError;
