//! HTTP client utilities with proxy support.

use reqwest::cookie::CookieStore;
use reqwest::{Client, Proxy};
use std::sync::Arc;
use std::time::Duration;

/// Strip credentials from a proxy URL before it reaches the logs.
pub fn redact_proxy_url(url: &str) -> String {
    url::Url::parse(url)
        .map(|u| {
            if u.username().is_empty() && u.password().is_none() {
                format!(
                    "{}://{}:{}",
                    u.scheme(),
                    u.host_str().unwrap_or("?"),
                    u.port_or_known_default().unwrap_or(0)
                )
            } else {
                format!(
                    "{}://***@{}:{}",
                    u.scheme(),
                    u.host_str().unwrap_or("?"),
                    u.port_or_known_default().unwrap_or(0)
                )
            }
        })
        .unwrap_or_else(|_| "<invalid-url>".to_string())
}

/// Timeouts applied to every client built for the transport.
#[derive(Debug, Clone, Copy)]
pub struct ClientTimeouts {
    pub connect: Duration,
    pub read: Duration,
}

impl ClientTimeouts {
    pub fn from_secs(connect_secs: u64, read_secs: u64) -> Self {
        Self { connect: Duration::from_secs(connect_secs), read: Duration::from_secs(read_secs) }
    }
}

/// Create an HTTP client for one route.
///
/// `proxy_url = None` builds a strictly direct client: environment proxy
/// variables are ignored so the direct route really is direct. All clients
/// built with the same `cookie_store` share cookies.
pub fn create_client_for_route<C>(
    timeouts: ClientTimeouts,
    proxy_url: Option<&str>,
    cookie_store: Arc<C>,
) -> Result<Client, String>
where
    C: CookieStore + 'static,
{
    let mut builder = Client::builder()
        .connect_timeout(timeouts.connect)
        .read_timeout(timeouts.read)
        .tcp_nodelay(true)
        .cookie_provider(cookie_store);

    match proxy_url {
        Some(url) => {
            let proxy = Proxy::all(url).map_err(|e| format!("invalid proxy URL: {e}"))?;
            builder = builder.proxy(proxy);
            tracing::debug!(host = %redact_proxy_url(url), "HTTP client: proxy route");
        },
        None => {
            builder = builder.no_proxy();
        },
    }

    builder.build().map_err(|e| format!("HTTP client builder failed: {e}"))
}
