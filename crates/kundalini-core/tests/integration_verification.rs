#![allow(unused_crate_dependencies)]
#![allow(clippy::tests_outside_test_module, reason = "integration tests live in tests/ dir")]
#![allow(clippy::expect_used, reason = "panics are the assertion mechanism in integration tests")]

use kundalini_core::{
    AccountRepository, AccountStatus, Environment, HttpVerificationClient, SqliteAccountRepository,
    StatusMonitor, Transport, Tristate,
};
use kundalini_types::{Account, MonitorConfig, TransportConfig};
use std::collections::BTreeMap;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn data_blob_body() -> serde_json::Value {
    serde_json::json!({
        "SVCResponse": {
            "responseData": {
                "responseBody": {
                    "dataBlob": [
                        {"key": "card-1", "accountToken": "tok-1"},
                        {"key": "card-2", "accountToken": "tok-2"}
                    ]
                }
            }
        }
    })
}

fn information_body(past_requests: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "responseMessage": "SUCCESS",
        "responseData": {
            "contentBoard": [{
                "dataBlob": [{"transactionData": {"pastRequests": past_requests}}]
            }]
        }
    })
}

async fn mount_service(server: &MockServer) {
    // base64("alice:pw1")
    Mock::given(method("POST"))
        .and(path("/mobile/signin"))
        .and(header("authorization", "Basic YWxpY2U6cHcx"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("session", "alice-session")
                .insert_header("set-cookie", "JSESSIONID=xyz; Path=/")
                .set_body_json(serde_json::json!({"status": "SUCCESS"})),
        )
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/mobile/signin"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "FAILURE"})),
        )
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/mobile/v1/dataBlob"))
        .and(header("securitydata", "alice-session"))
        .and(header("cookie", "JSESSIONID=xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(data_blob_body()))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/mobile/v3/getInformation"))
        .and(body_partial_json(serde_json::json!({
            "requestData": {"contentContext": [{"key": "card-1"}]}
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(information_body(serde_json::json!([]))),
        )
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/mobile/v3/getInformation"))
        .and(body_partial_json(serde_json::json!({
            "requestData": {"contentContext": [{"key": "card-2"}]}
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(information_body(serde_json::json!([{"amount": 10}]))),
        )
        .expect(1)
        .mount(server)
        .await;
}

fn build_monitor(server: &MockServer, repo: Arc<SqliteAccountRepository>) -> StatusMonitor {
    let transport = Arc::new(Transport::new(&TransportConfig::direct()).expect("transport"));
    let mut base_urls = BTreeMap::new();
    base_urls.insert(Environment::E1, server.uri());
    let client = HttpVerificationClient::new(transport, base_urls);
    StatusMonitor::new(repo, Arc::new(client), &MonitorConfig::default())
}

fn tuple(status: &AccountStatus) -> (Tristate, Tristate, Tristate) {
    (status.login_ok, status.data_found, status.history_found)
}

#[tokio::test]
async fn test_refresh_pass_against_mock_service() {
    let server = MockServer::start().await;
    mount_service(&server).await;

    let repo = Arc::new(SqliteAccountRepository::open_in_memory().expect("db"));
    repo.create(Account::new("alice", "pw1", Environment::E1)).await.expect("create alice");
    repo.create(Account::new("bob", "wrong", Environment::E1)).await.expect("create bob");

    let monitor = build_monitor(&server, Arc::clone(&repo));
    let summary = monitor.refresh_once().await;
    assert_eq!(summary.checked, 2);
    assert_eq!(summary.login_ok, 1);
    assert_eq!(summary.history_found, 1);

    let snapshot = monitor.registry().snapshot();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot[0].username(), "alice");
    assert_eq!(tuple(&snapshot[0]), (Tristate::Yes, Tristate::Yes, Tristate::Yes));
    assert_eq!(snapshot[1].username(), "bob");
    assert_eq!(tuple(&snapshot[1]), (Tristate::No, Tristate::No, Tristate::No));
    assert!(!monitor.is_refreshing().get());
}

#[tokio::test]
async fn test_delete_after_verification() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mobile/signin"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "FAILURE"})),
        )
        .mount(&server)
        .await;

    let repo = Arc::new(SqliteAccountRepository::open_in_memory().expect("db"));
    let monitor = build_monitor(&server, Arc::clone(&repo));

    let status =
        monitor.save_account(None, "carol", "pw", Environment::E1).await.expect("save carol");
    assert_eq!(monitor.registry().len(), 1);

    monitor.delete_account(&status.account).await.expect("delete carol");
    assert!(monitor.registry().is_empty());
    assert_eq!(repo.count_all().await, 0);
}
