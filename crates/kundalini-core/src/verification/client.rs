use async_trait::async_trait;
use base64::Engine as _;
use kundalini_types::{DataHandle, Environment};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::envelopes::{
    common_envelope, current_lookback_window, information_request, login_envelope,
};
use super::VerificationApi;
use crate::transport::{Transport, TransportResponse};
use crate::utils::json_path::{resolve_array, resolve_str};

pub const SIGNIN_PATH: &str = "mobile/signin";
pub const DATA_BLOB_PATH: &str = "mobile/v1/dataBlob";
pub const GET_INFORMATION_PATH: &str = "mobile/v3/getInformation";

const SESSION_HEADER: &str = "session";
const SECURITY_DATA_HEADER: &str = "securitydata";
const SUCCESS: &str = "SUCCESS";

const DATA_BLOB_ARRAY: &str = "SVCResponse.responseData.responseBody.dataBlob";
const CONTENT_BOARD_ARRAY: &str = "responseData.contentBoard";
const PAST_REQUESTS_ARRAY: &str = "transactionData.pastRequests";

/// Verification client speaking the mobile JSON protocol over a shared [`Transport`].
pub struct HttpVerificationClient {
    transport: Arc<Transport>,
    base_urls: BTreeMap<Environment, String>,
}

impl HttpVerificationClient {
    /// `base_urls` overrides the fixed base URL of individual environments.
    pub fn new(transport: Arc<Transport>, base_urls: BTreeMap<Environment, String>) -> Self {
        Self { transport, base_urls }
    }

    pub fn endpoint(&self, environment: Environment, path: &str) -> String {
        match self.base_urls.get(&environment) {
            Some(base) => {
                format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
            },
            None => environment.url(path),
        }
    }

    async fn post(
        &self,
        environment: Environment,
        path: &str,
        headers: HeaderMap,
        body: &Value,
    ) -> Option<TransportResponse> {
        let url = self.endpoint(environment, path);
        match self.transport.post_json(&url, headers, body.to_string()).await {
            Ok(resp) => Some(resp),
            Err(e) => {
                tracing::warn!(env = %environment, "[Verify] POST {} failed: {}", path, e);
                None
            },
        }
    }
}

/// Parse a response body, logging instead of failing.
fn parse_body(path: &str, body: &str) -> Option<Value> {
    if body.trim().is_empty() {
        tracing::warn!("[Verify] {} returned an empty body", path);
        return None;
    }
    match serde_json::from_str(body) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::warn!("[Verify] {} returned unparseable body: {}", path, e);
            None
        },
    }
}

fn header_value(path: &str, raw: &str) -> Option<HeaderValue> {
    match HeaderValue::from_str(raw) {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("[Verify] {} header contains invalid characters", path);
            None
        },
    }
}

fn handle_from_element(element: &Value) -> Option<DataHandle> {
    let key = resolve_str(element, "key")?;
    let token = resolve_str(element, "accountToken")?;
    Some(DataHandle::new(key, token))
}

/// True when any `contentBoard[i].dataBlob[j]` carries a non-empty `pastRequests` array.
fn has_past_requests(json: &Value) -> bool {
    let Some(boards) = resolve_array(json, CONTENT_BOARD_ARRAY) else {
        return false;
    };
    boards
        .iter()
        .filter_map(|board| resolve_array(board, "dataBlob"))
        .flatten()
        .filter_map(|blob| resolve_array(blob, PAST_REQUESTS_ARRAY))
        .any(|past| !past.is_empty())
}

#[async_trait]
impl VerificationApi for HttpVerificationClient {
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
        environment: Environment,
    ) -> Option<String> {
        let encoded =
            base64::engine::general_purpose::STANDARD.encode(format!("{}:{}", username, password));
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, header_value(SIGNIN_PATH, &format!("Basic {}", encoded))?);

        let resp = self.post(environment, SIGNIN_PATH, headers, &login_envelope()).await?;
        let json = parse_body(SIGNIN_PATH, &resp.body)?;

        if resolve_str(&json, "status") != Some(SUCCESS) {
            tracing::info!(username, env = %environment, "[Verify] Sign-in rejected");
            return None;
        }

        match resp.header(SESSION_HEADER).map(str::trim) {
            Some(session) if !session.is_empty() => {
                tracing::debug!(username, env = %environment, "[Verify] Signed in");
                Some(session.to_string())
            },
            _ => {
                tracing::warn!(
                    username,
                    env = %environment,
                    "[Verify] Sign-in succeeded without a session header"
                );
                None
            },
        }
    }

    async fn enumerate_data_handles(
        &self,
        session: &str,
        environment: Environment,
    ) -> Vec<DataHandle> {
        let Some(session_value) = header_value(DATA_BLOB_PATH, session) else {
            return Vec::new();
        };
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(SECURITY_DATA_HEADER), session_value);

        let Some(resp) = self.post(environment, DATA_BLOB_PATH, headers, &common_envelope()).await
        else {
            return Vec::new();
        };
        let Some(json) = parse_body(DATA_BLOB_PATH, &resp.body) else {
            return Vec::new();
        };
        let Some(elements) = resolve_array(&json, DATA_BLOB_ARRAY) else {
            tracing::debug!(env = %environment, "[Verify] No dataBlob array in response");
            return Vec::new();
        };

        let handles: Vec<DataHandle> = elements.iter().filter_map(handle_from_element).collect();
        if handles.len() < elements.len() {
            tracing::debug!(
                skipped = elements.len() - handles.len(),
                "[Verify] Skipped malformed dataBlob entries"
            );
        }
        handles
    }

    async fn fetch_detail(
        &self,
        session: &str,
        handle: &DataHandle,
        environment: Environment,
    ) -> bool {
        let Some(auth) =
            header_value(GET_INFORMATION_PATH, &format!("type=\"session\", value=\"{}\"", session))
        else {
            return false;
        };
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let (from_date, to_date) = current_lookback_window();
        let body = information_request(handle, &from_date, &to_date);

        let Some(resp) = self.post(environment, GET_INFORMATION_PATH, headers, &body).await else {
            return false;
        };
        let Some(json) = parse_body(GET_INFORMATION_PATH, &resp.body) else {
            return false;
        };
        if resolve_str(&json, "responseMessage") != Some(SUCCESS) {
            tracing::debug!(key = %handle.key, "[Verify] getInformation not successful");
            return false;
        }
        has_past_requests(&json)
    }
}
