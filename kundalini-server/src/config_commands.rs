use anyhow::Result;
use colored::Colorize;

use kundalini_core::modules::config as core_config;
use kundalini_core::utils::http::redact_proxy_url;
use kundalini_types::{models::DIRECT_ROUTE, AppConfig, Environment};

pub fn show_config(config: &AppConfig, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    if let Ok(path) = core_config::get_config_path() {
        println!("{} {}", "Config file:".dimmed(), path.display());
    }

    println!("{}", "Monitor Configuration:".cyan().bold());
    println!("  Refresh interval: {} min", config.monitor.effective_interval_minutes());
    println!("  Max concurrent checks: {}", config.monitor.effective_concurrency());

    println!("{}", "Transport Configuration:".cyan().bold());
    println!("  Connect timeout: {}s", config.transport.connect_timeout_secs);
    println!("  Read timeout: {}s", config.transport.read_timeout_secs);
    println!("  Routes:");
    for route in &config.transport.routes {
        println!("    - {}", display_route(route));
    }

    println!("{}", "Environments:".cyan().bold());
    for env in Environment::ALL {
        match config.environments.get(&env) {
            Some(url) => println!("  {}: {} {}", env, url, "(override)".yellow()),
            None => println!("  {}: {}", env, env.base_url()),
        }
    }
    Ok(())
}

pub fn get_config_value(config: &AppConfig, key: &str) -> Result<()> {
    let value = match key {
        "monitor.refresh_interval_minutes" => config.monitor.refresh_interval_minutes.to_string(),
        "monitor.max_concurrent_checks" => config.monitor.max_concurrent_checks.to_string(),
        "transport.connect_timeout_secs" => config.transport.connect_timeout_secs.to_string(),
        "transport.read_timeout_secs" => config.transport.read_timeout_secs.to_string(),
        "transport.routes" => config
            .transport
            .routes
            .iter()
            .map(|r| display_route(r))
            .collect::<Vec<_>>()
            .join(","),
        _ => match environment_key(key)? {
            Some(env) => config.environments.get(&env).cloned().unwrap_or_else(|| env.base_url()),
            None => anyhow::bail!("Unknown config key: {}", key),
        },
    };

    println!("{}", value);
    Ok(())
}

/// A validated change to one configuration key.
enum ConfigChange {
    RefreshInterval(u64),
    MaxConcurrentChecks(usize),
    ConnectTimeout(u64),
    ReadTimeout(u64),
    Routes(Vec<String>),
    EnvironmentUrl(Environment, Option<String>),
}

impl ConfigChange {
    fn parse(key: &str, value: &str) -> Result<Self> {
        let change = match key {
            "monitor.refresh_interval_minutes" => Self::RefreshInterval(parse_number(value)?),
            "monitor.max_concurrent_checks" => Self::MaxConcurrentChecks(parse_number(value)?),
            "transport.connect_timeout_secs" => Self::ConnectTimeout(parse_number(value)?),
            "transport.read_timeout_secs" => Self::ReadTimeout(parse_number(value)?),
            "transport.routes" => {
                let routes: Vec<String> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .map(str::to_string)
                    .collect();
                if routes.is_empty() {
                    anyhow::bail!("transport.routes needs at least one route");
                }
                Self::Routes(routes)
            },
            _ => match environment_key(key)? {
                Some(env) if value.eq_ignore_ascii_case("default") => {
                    Self::EnvironmentUrl(env, None)
                },
                Some(env) => {
                    url::Url::parse(value)
                        .map_err(|e| anyhow::anyhow!("Invalid URL '{}': {}", value, e))?;
                    Self::EnvironmentUrl(env, Some(value.to_string()))
                },
                None => anyhow::bail!("Unknown config key: {}", key),
            },
        };
        Ok(change)
    }

    fn apply(self, config: &mut AppConfig) {
        match self {
            Self::RefreshInterval(v) => config.monitor.refresh_interval_minutes = v,
            Self::MaxConcurrentChecks(v) => config.monitor.max_concurrent_checks = v,
            Self::ConnectTimeout(v) => config.transport.connect_timeout_secs = v,
            Self::ReadTimeout(v) => config.transport.read_timeout_secs = v,
            Self::Routes(routes) => config.transport.routes = routes,
            Self::EnvironmentUrl(env, Some(url)) => {
                config.environments.insert(env, url);
            },
            Self::EnvironmentUrl(env, None) => {
                config.environments.remove(&env);
            },
        }
    }
}

pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let change = ConfigChange::parse(key, value)?;
    core_config::update_config(|config| change.apply(config)).map_err(|e| anyhow::anyhow!(e))?;

    println!("{} Config updated: {} = {}", "✓".green(), key, value);
    println!("{}", "Restart the monitor to apply the change.".dimmed());
    Ok(())
}

/// `environments.E2` style keys. `Ok(None)` when `key` is not an environment key.
fn environment_key(key: &str) -> Result<Option<Environment>> {
    match key.strip_prefix("environments.") {
        Some(name) => name.parse::<Environment>().map(Some).map_err(|e| anyhow::anyhow!(e)),
        None => Ok(None),
    }
}

fn parse_number<T: std::str::FromStr>(value: &str) -> Result<T> {
    value.trim().parse::<T>().map_err(|_| anyhow::anyhow!("Invalid number: {}", value))
}

fn display_route(route: &str) -> String {
    if route.trim().eq_ignore_ascii_case(DIRECT_ROUTE) {
        DIRECT_ROUTE.to_string()
    } else {
        redact_proxy_url(route)
    }
}
