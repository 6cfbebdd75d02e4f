//! Shared HTTP transport for the verification protocol.
//!
//! Owns the process-wide mutable client state: the host-keyed cookie jar and
//! the rotating route list. Each has its own lock. One `reqwest::Client` is
//! built per configured route up front; all of them share the cookie jar.

mod cookie_jar;
mod route_pool;

#[cfg(test)]
mod tests;

pub use cookie_jar::HostCookieJar;
pub use route_pool::{parse_route, Route, RoutePool};

use kundalini_types::{ConfigError, TransportConfig};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::utils::http::{create_client_for_route, ClientTimeouts};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Every route refused the connection
    #[error("all {attempts} route(s) failed to connect (last error: {last})")]
    AllRoutesFailed { attempts: usize, last: String },

    /// Request failed after a connection was established (timeout, protocol error)
    #[error("request via {route} failed: {source}")]
    Request {
        route: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response body could not be read
    #[error("reading response body failed: {0}")]
    Body(#[source] reqwest::Error),
}

/// Fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TransportResponse {
    /// First value of `name` as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub struct Transport {
    cookies: Arc<HostCookieJar>,
    routes: RoutePool,
    clients: HashMap<Route, Client>,
}

impl Transport {
    /// Build the transport from configuration.
    ///
    /// Invalid route entries are skipped with an error log; the transport
    /// refuses to start when no usable route remains.
    pub fn new(config: &TransportConfig) -> AppResult<Self> {
        let mut routes: Vec<Route> = Vec::new();
        for raw in &config.routes {
            match parse_route(raw) {
                Ok(route) if !routes.contains(&route) => routes.push(route),
                Ok(route) => tracing::warn!("[Transport] Duplicate route ignored: {}", route),
                Err(e) => tracing::error!("[Transport] Skipping invalid route: {}", e),
            }
        }
        if routes.is_empty() {
            let err = ConfigError::ValidationError {
                field: "transport.routes".to_string(),
                message: "no usable route".to_string(),
            };
            return Err(AppError::Config(err.to_string()));
        }

        let cookies = Arc::new(HostCookieJar::new());
        let timeouts =
            ClientTimeouts::from_secs(config.connect_timeout_secs, config.read_timeout_secs);

        let mut clients = HashMap::with_capacity(routes.len());
        for route in &routes {
            let client = create_client_for_route(timeouts, route.proxy_url(), Arc::clone(&cookies))
                .map_err(AppError::Transport)?;
            clients.insert(route.clone(), client);
        }

        Ok(Self { cookies, routes: RoutePool::new(routes), clients })
    }

    pub fn cookie_jar(&self) -> &Arc<HostCookieJar> {
        &self.cookies
    }

    /// Routes in their current preference order.
    pub fn routes(&self) -> Vec<Route> {
        self.routes.snapshot()
    }

    /// POST a JSON body, trying routes in order.
    ///
    /// A connection failure demotes the route and moves on to the next one.
    /// Any other failure ends the call. Non-2xx statuses are returned as-is.
    pub async fn post_json(
        &self,
        url: &str,
        headers: HeaderMap,
        body: String,
    ) -> Result<TransportResponse, TransportError> {
        let candidates = self.routes.snapshot();
        let attempts = candidates.len();
        let mut last_err: Option<String> = None;

        tracing::debug!(url, body = %body, "[Transport] --> POST");

        for route in candidates {
            let Some(client) = self.clients.get(&route) else {
                continue;
            };

            let result = client
                .post(url)
                .headers(headers.clone())
                .header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body.clone())
                .send()
                .await;

            match result {
                Ok(resp) => {
                    let status = resp.status();
                    let resp_headers = resp.headers().clone();
                    let text = resp.text().await.map_err(TransportError::Body)?;
                    tracing::debug!(
                        url,
                        route = %route,
                        status = status.as_u16(),
                        body = %text,
                        "[Transport] <-- response"
                    );
                    return Ok(TransportResponse { status, headers: resp_headers, body: text });
                },
                Err(e) if e.is_connect() => {
                    tracing::warn!("[Transport] Connection via {} failed: {}", route, e);
                    self.routes.demote(&route);
                    last_err = Some(e.to_string());
                },
                Err(e) => {
                    return Err(TransportError::Request { route: route.to_string(), source: e });
                },
            }
        }

        Err(TransportError::AllRoutesFailed {
            attempts,
            last: last_err.unwrap_or_else(|| "no client available".to_string()),
        })
    }
}
