//! Cookie storage keyed by host.
//!
//! Every response carrying `Set-Cookie` replaces the cookies remembered for
//! its host; every request to that host replays them. Paths, expiry and domain
//! attributes are ignored.

use parking_lot::RwLock;
use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;
use reqwest::Url;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct HostCookieJar {
    cookies: RwLock<HashMap<String, Vec<(String, String)>>>,
}

impl HostCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cookies currently stored for `host` as `(name, value)` pairs.
    pub fn cookies_for_host(&self, host: &str) -> Vec<(String, String)> {
        self.cookies.read().get(host).cloned().unwrap_or_default()
    }
}

/// Keeps only the leading `name=value` pair. Attributes such as `Path`,
/// `Expires` and `Domain` are dropped.
fn parse_set_cookie(value: &HeaderValue) -> Option<(String, String)> {
    let raw = value.to_str().ok()?;
    let pair = raw.split(';').next()?.trim();
    let (name, value) = pair.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), value.trim().to_string()))
}

impl CookieStore for HostCookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let Some(host) = url.host_str() else {
            return;
        };
        let parsed: Vec<(String, String)> = cookie_headers.filter_map(parse_set_cookie).collect();
        if parsed.is_empty() {
            return;
        }
        tracing::debug!(host, count = parsed.len(), "[Transport] Storing cookies");
        self.cookies.write().insert(host.to_string(), parsed);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        let host = url.host_str()?;
        let guard = self.cookies.read();
        let stored = guard.get(host)?;
        if stored.is_empty() {
            return None;
        }
        let header = stored
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ");
        HeaderValue::from_str(&header).ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_cookies_are_scoped_to_host() {
        let jar = HostCookieJar::new();
        let headers = [
            HeaderValue::from_static("sid=abc; Path=/; HttpOnly"),
            HeaderValue::from_static("lang=en"),
        ];
        jar.set_cookies(&mut headers.iter(), &url("https://e1qonline.mock1.com/mobile/signin"));

        let sent = jar.cookies(&url("https://e1qonline.mock1.com/mobile/v1/dataBlob")).unwrap();
        assert_eq!(sent.to_str().unwrap(), "sid=abc; lang=en");
        assert!(jar.cookies(&url("https://online.mock1.com/")).is_none());
    }

    #[test]
    fn test_set_cookie_attributes_are_dropped() {
        let jar = HostCookieJar::new();
        let headers = [HeaderValue::from_static(
            "token=YWJj==; Expires=Wed, 21 Oct 2026 07:28:00 GMT; Domain=mock1.com; Secure",
        )];
        jar.set_cookies(&mut headers.iter(), &url("https://e2online.mock1.com/mobile/signin"));

        let sent = jar.cookies(&url("https://e2online.mock1.com/")).unwrap();
        assert_eq!(sent.to_str().unwrap(), "token=YWJj==");
        assert!(jar.cookies(&url("https://mock1.com/")).is_none());
    }

    #[test]
    fn test_new_cookies_replace_previous_set() {
        let jar = HostCookieJar::new();
        let first = [HeaderValue::from_static("sid=old")];
        let second = [HeaderValue::from_static("sid=new")];
        jar.set_cookies(&mut first.iter(), &url("http://127.0.0.1:9000/a"));
        jar.set_cookies(&mut second.iter(), &url("http://127.0.0.1:9000/b"));

        assert_eq!(
            jar.cookies_for_host("127.0.0.1"),
            vec![("sid".to_string(), "new".to_string())]
        );
    }

    #[test]
    fn test_malformed_set_cookie_is_ignored() {
        let jar = HostCookieJar::new();
        let headers = [HeaderValue::from_static("garbage"), HeaderValue::from_static("=x")];
        jar.set_cookies(&mut headers.iter(), &url("http://127.0.0.1/"));
        assert!(jar.cookies_for_host("127.0.0.1").is_empty());
    }
}
