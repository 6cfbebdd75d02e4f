//! Application configuration models.

use super::Environment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Route entry that disables the proxy for a request.
pub const DIRECT_ROUTE: &str = "direct";

// ============================================================================
// Monitor Configuration
// ============================================================================

/// Scheduling settings for the status monitor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Minutes between scheduled refresh passes
    #[serde(default = "default_refresh_interval_minutes")]
    pub refresh_interval_minutes: u64,
    /// Upper bound on accounts verified in parallel during a pass
    #[serde(default = "default_max_concurrent_checks")]
    pub max_concurrent_checks: usize,
}

fn default_refresh_interval_minutes() -> u64 {
    60
}

fn default_max_concurrent_checks() -> usize {
    4
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            refresh_interval_minutes: default_refresh_interval_minutes(),
            max_concurrent_checks: default_max_concurrent_checks(),
        }
    }
}

impl MonitorConfig {
    /// Interval with zero clamped to the default hour.
    pub fn effective_interval_minutes(&self) -> u64 {
        if self.refresh_interval_minutes < 1 {
            default_refresh_interval_minutes()
        } else {
            self.refresh_interval_minutes
        }
    }

    /// Delay between scheduled passes, saturating for oversized intervals.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.effective_interval_minutes().saturating_mul(60))
    }

    pub fn effective_concurrency(&self) -> usize {
        self.max_concurrent_checks.max(1)
    }
}

// ============================================================================
// Transport Configuration
// ============================================================================

/// HTTP transport settings shared by every verification call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransportConfig {
    #[serde(default = "default_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub read_timeout_secs: u64,
    /// Candidate routes in preference order: proxy URLs or `"direct"`
    #[serde(default = "default_routes")]
    pub routes: Vec<String>,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_routes() -> Vec<String> {
    vec![
        "http://localhost:8080".to_string(),
        "http://localhost:8585".to_string(),
        DIRECT_ROUTE.to_string(),
    ]
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_timeout_secs(),
            read_timeout_secs: default_timeout_secs(),
            routes: default_routes(),
        }
    }
}

impl TransportConfig {
    /// Direct connection only, no proxies.
    pub fn direct() -> Self {
        Self { routes: vec![DIRECT_ROUTE.to_string()], ..Self::default() }
    }
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Root configuration persisted as `kundalini.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub transport: TransportConfig,
    /// Per-environment base URL overrides (staging mirrors, local mocks)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environments: BTreeMap<Environment, String>,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }
}
