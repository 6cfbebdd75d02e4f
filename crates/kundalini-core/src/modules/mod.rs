//! Account storage and configuration file modules.

pub mod account_sqlite;
pub mod config;
pub mod repository;
