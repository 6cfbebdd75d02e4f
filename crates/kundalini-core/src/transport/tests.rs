use super::{Route, Transport, TransportError};
use kundalini_types::TransportConfig;
use reqwest::header::HeaderMap;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Nothing listens on port 1, so a proxy there refuses every connection.
const DEAD_PROXY: &str = "http://127.0.0.1:1";

fn config_with_routes(routes: &[&str]) -> TransportConfig {
    TransportConfig {
        connect_timeout_secs: 5,
        read_timeout_secs: 5,
        routes: routes.iter().map(|r| r.to_string()).collect(),
    }
}

#[test]
fn test_new_rejects_config_without_usable_routes() {
    assert!(Transport::new(&config_with_routes(&["", "bogus"])).is_err());
    assert!(Transport::new(&config_with_routes(&[])).is_err());
}

#[test]
fn test_new_skips_invalid_and_duplicate_routes() {
    let transport = match Transport::new(&config_with_routes(&["bogus", "direct", "DIRECT"])) {
        Ok(t) => t,
        Err(e) => panic!("transport build failed: {}", e),
    };
    assert_eq!(transport.routes(), vec![Route::Direct]);
}

#[tokio::test]
async fn test_post_json_sends_content_type_and_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mobile/signin"))
        .and(header("content-type", "application/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("session", "tok-1")
                .set_body_string(r#"{"status":"SUCCESS"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transport = Transport::new(&TransportConfig::direct()).expect("transport");
    let resp = transport
        .post_json(&format!("{}/mobile/signin", server.uri()), HeaderMap::new(), "{}".to_string())
        .await
        .expect("request should succeed");

    assert_eq!(resp.status, 200);
    assert_eq!(resp.header("session"), Some("tok-1"));
    assert_eq!(resp.body, r#"{"status":"SUCCESS"}"#);
}

#[tokio::test]
async fn test_cookies_are_replayed_to_same_host() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "sid=abc; Path=/"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/next"))
        .and(header("cookie", "sid=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("with-cookie"))
        .expect(1)
        .mount(&server)
        .await;

    let transport = Transport::new(&TransportConfig::direct()).expect("transport");
    transport
        .post_json(&format!("{}/login", server.uri()), HeaderMap::new(), "{}".to_string())
        .await
        .expect("login request");
    let resp = transport
        .post_json(&format!("{}/next", server.uri()), HeaderMap::new(), "{}".to_string())
        .await
        .expect("follow-up request");

    assert_eq!(resp.body, "with-cookie");
    assert_eq!(
        transport.cookie_jar().cookies_for_host("127.0.0.1"),
        vec![("sid".to_string(), "abc".to_string())]
    );
}

#[tokio::test]
async fn test_refused_route_is_demoted_and_next_route_used() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("direct"))
        .expect(1)
        .mount(&server)
        .await;

    let transport =
        Transport::new(&config_with_routes(&[DEAD_PROXY, "direct"])).expect("transport");
    let resp = transport
        .post_json(&format!("{}/any", server.uri()), HeaderMap::new(), "{}".to_string())
        .await
        .expect("direct route should succeed");

    assert_eq!(resp.body, "direct");
    assert_eq!(
        transport.routes(),
        vec![Route::Direct, Route::Proxy(DEAD_PROXY.to_string())],
        "failed proxy should move to the back"
    );
}

#[tokio::test]
async fn test_all_routes_refused() {
    let transport = Transport::new(&config_with_routes(&[DEAD_PROXY])).expect("transport");
    let result = transport
        .post_json("http://127.0.0.1:9/unreachable", HeaderMap::new(), "{}".to_string())
        .await;

    match result {
        Err(TransportError::AllRoutesFailed { attempts, .. }) => assert_eq!(attempts, 1),
        other => panic!("expected AllRoutesFailed, got {:?}", other.map(|r| r.status)),
    }
}
