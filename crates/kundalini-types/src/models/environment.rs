//! Deployment targets for monitored accounts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Remote deployment an account lives in.
///
/// Declaration order is significant: statuses are ordered E1, E2, E3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Environment {
    /// First QA deployment
    E1,
    /// Second QA deployment
    E2,
    /// Production deployment
    E3,
}

impl Environment {
    /// All environments in display order.
    pub const ALL: [Environment; 3] = [Environment::E1, Environment::E2, Environment::E3];

    /// Host prefix of the environment's base URL.
    pub const fn subdomain(self) -> &'static str {
        match self {
            Environment::E1 => "e1qonline",
            Environment::E2 => "e2qonline",
            Environment::E3 => "online",
        }
    }

    /// Fixed base URL, always ending with `/`.
    pub fn base_url(self) -> String {
        format!("https://{}.mock1.com/", self.subdomain())
    }

    /// Absolute URL of `path` under the fixed base URL.
    pub fn url(self, path: &str) -> String {
        format!("{}{}", self.base_url(), path.trim_start_matches('/'))
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Environment::E1 => "E1",
            Environment::E2 => "E2",
            Environment::E3 => "E3",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "E1" => Ok(Environment::E1),
            "E2" => Ok(Environment::E2),
            "E3" => Ok(Environment::E3),
            other => Err(format!("Unknown environment '{}', expected E1, E2 or E3", other)),
        }
    }
}
