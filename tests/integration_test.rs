//! Integration tests for google-ip-sync
//!
//! Both the Google IP list and the Cloudflare API are served by wiremock, so
//! these tests check exactly which outbound calls a run makes.

use google_ip_sync::{run, run_every, Config, SyncOutcome};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GROUP_PATH: &str = "/accounts/mock-account-id/access/groups/mock-group-id";

fn mock_config(server: &MockServer, token: Option<&str>) -> Config {
    let mut config = Config::new(token, "mock-account-id", "mock-group-id");
    config.ip_list_url = format!("{}/ipranges/goog.json", server.uri());
    config.api_base = server.uri();
    config
}

fn google_response() -> Value {
    json!({
        "syncToken": "1234567890",
        "creationTime": "2024-01-01T00:00:00.000Z",
        "prefixes": [
            { "ipv4Prefix": "35.190.0.0/17" },
            { "ipv4Prefix": "35.191.0.0/16" },
            { "ipv6Prefix": "2600:1900::/35" }
        ]
    })
}

async fn mount_google(server: &MockServer, response: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path("/ipranges/goog.json"))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

async fn mount_update(server: &MockServer, times: u64) {
    Mock::given(method("PUT"))
        .and(path(GROUP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true, "errors": [], "messages": [], "result": {}
        })))
        .expect(times)
        .mount(server)
        .await;
}

async fn update_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .expect("Request recording is enabled")
        .iter()
        .filter(|r| r.method.as_str() == "PUT")
        .map(|r| serde_json::from_slice(&r.body).expect("Update body is JSON"))
        .collect()
}

#[tokio::test]
async fn test_sync_updates_access_group() {
    let server = MockServer::start().await;
    mount_google(
        &server,
        ResponseTemplate::new(200).set_body_json(google_response()),
        1,
    )
    .await;
    Mock::given(method("PUT"))
        .and(path(GROUP_PATH))
        .and(header("authorization", "Bearer mock-api-token"))
        .and(body_json(json!({
            "name": "Google",
            "include": [
                { "ip": { "ip": "35.190.0.0/17" } },
                { "ip": { "ip": "35.191.0.0/16" } },
                { "ip": { "ip": "2600:1900::/35" } }
            ],
            "account_id": "mock-account-id"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = run(&mock_config(&server, Some("mock-api-token")))
        .await
        .expect("Sync should succeed");
    assert_eq!(outcome, SyncOutcome::Updated { included: 3 });
}

#[tokio::test]
async fn test_missing_token_makes_no_calls() {
    let server = MockServer::start().await;
    mount_google(
        &server,
        ResponseTemplate::new(200).set_body_json(google_response()),
        0,
    )
    .await;
    mount_update(&server, 0).await;

    for token in [None, Some("")] {
        let outcome = run(&mock_config(&server, token))
            .await
            .expect("Missing token is not an error");
        assert_eq!(outcome, SyncOutcome::Skipped);
    }
    assert!(server
        .received_requests()
        .await
        .expect("Request recording is enabled")
        .is_empty());
}

#[tokio::test]
async fn test_google_error_skips_update() {
    let server = MockServer::start().await;
    mount_google(&server, ResponseTemplate::new(500), 1).await;
    mount_update(&server, 0).await;

    let outcome = run(&mock_config(&server, Some("mock-api-token")))
        .await
        .expect("Fetch failure is handled quietly");
    assert_eq!(outcome, SyncOutcome::FetchFailed);
}

#[tokio::test]
async fn test_ipv4_entries_precede_ipv6() {
    let server = MockServer::start().await;
    let body = json!({
        "syncToken": "1",
        "creationTime": "2024-01-01T00:00:00.000Z",
        "prefixes": [
            { "ipv6Prefix": "2001:4860::/32" },
            { "ipv4Prefix": "8.8.4.0/24" },
            { "ipv6Prefix": "2404:6800::/32" },
            { "ipv4Prefix": "8.8.8.0/24" },
            { "ipv4Prefix": "8.34.208.0/20" }
        ]
    });
    mount_google(&server, ResponseTemplate::new(200).set_body_json(body), 1).await;
    mount_update(&server, 1).await;

    run(&mock_config(&server, Some("mock-api-token")))
        .await
        .expect("Sync should succeed");

    let bodies = update_bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    let include: Vec<&str> = bodies[0]["include"]
        .as_array()
        .expect("include is an array")
        .iter()
        .map(|rule| rule["ip"]["ip"].as_str().expect("ip is a string"))
        .collect();
    assert_eq!(
        include,
        vec![
            "8.8.4.0/24",
            "8.8.8.0/24",
            "8.34.208.0/20",
            "2001:4860::/32",
            "2404:6800::/32"
        ]
    );
}

#[tokio::test]
async fn test_two_runs_send_identical_updates() {
    let server = MockServer::start().await;
    mount_google(
        &server,
        ResponseTemplate::new(200).set_body_json(google_response()),
        2,
    )
    .await;
    mount_update(&server, 2).await;

    let config = mock_config(&server, Some("mock-api-token"));
    run(&config).await.expect("First sync should succeed");
    run(&config).await.expect("Second sync should succeed");

    let bodies = update_bodies(&server).await;
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[0], bodies[1]);
}

#[tokio::test]
async fn test_empty_prefixes_clear_group() {
    let server = MockServer::start().await;
    mount_google(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "syncToken": "1", "creationTime": "2024-01-01T00:00:00.000Z", "prefixes": []
        })),
        1,
    )
    .await;
    Mock::given(method("PUT"))
        .and(path(GROUP_PATH))
        .and(body_json(json!({
            "name": "Google",
            "include": [],
            "account_id": "mock-account-id"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = run(&mock_config(&server, Some("mock-api-token")))
        .await
        .expect("Sync should succeed");
    assert_eq!(outcome, SyncOutcome::Updated { included: 0 });
}

#[tokio::test]
async fn test_null_prefix_entries_do_not_block_sync() {
    let server = MockServer::start().await;
    mount_google(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "syncToken": "1",
            "creationTime": "2024-01-01T00:00:00.000Z",
            "prefixes": [
                { "ipv4Prefix": "35.190.0.0/17" },
                { "ipv4Prefix": null },
                { "ipv6Prefix": "2600:1900::/35" }
            ]
        })),
        1,
    )
    .await;
    Mock::given(method("PUT"))
        .and(path(GROUP_PATH))
        .and(body_json(json!({
            "name": "Google",
            "include": [
                { "ip": { "ip": "35.190.0.0/17" } },
                { "ip": { "ip": "2600:1900::/35" } }
            ],
            "account_id": "mock-account-id"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = run(&mock_config(&server, Some("mock-api-token")))
        .await
        .expect("Null prefix should be skipped, not fail the run");
    assert_eq!(outcome, SyncOutcome::Updated { included: 2 });
}

#[tokio::test]
async fn test_malformed_payload_is_an_error() {
    let server = MockServer::start().await;
    mount_google(
        &server,
        ResponseTemplate::new(200).set_body_string("{\"prefixes\": [oops"),
        1,
    )
    .await;
    mount_update(&server, 0).await;

    let result = run(&mock_config(&server, Some("mock-api-token"))).await;
    assert!(result.is_err(), "Malformed JSON should propagate");
}

#[tokio::test]
async fn test_api_failure_is_an_error() {
    let server = MockServer::start().await;
    mount_google(
        &server,
        ResponseTemplate::new(200).set_body_json(google_response()),
        1,
    )
    .await;
    Mock::given(method("PUT"))
        .and(path(GROUP_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "success": false,
            "errors": [{ "code": 10000, "message": "Authentication error" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = run(&mock_config(&server, Some("mock-api-token")))
        .await
        .expect_err("API failure should propagate");
    assert!(err.to_string().contains("403"), "Unexpected error: {err}");
}

#[tokio::test]
async fn test_scheduled_runs_are_drained() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ipranges/goog.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(google_response())
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1..)
        .mount(&server)
        .await;
    mount_update(&server, 1).await;

    // Shutdown arrives while the first run is still waiting on the fetch.
    let started = run_every(
        mock_config(&server, Some("mock-api-token")),
        Duration::from_secs(60),
        tokio::time::sleep(Duration::from_millis(20)),
    )
    .await;
    assert_eq!(started, 1);

    let bodies = update_bodies(&server).await;
    assert_eq!(bodies.len(), 1, "In-flight run should finish before return");
}
