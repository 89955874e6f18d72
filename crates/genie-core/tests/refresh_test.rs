// Orchestrator behavior tests against a mock server.
//
// The key property under test is per-device failure isolation: a bulk run
// over N devices reports partial success/failure counts instead of failing
// atomically.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use genie_api::transport::TransportConfig;
use genie_api::{Credentials, GenieClient};
use genie_core::{CoreError, reconnect_offline, refresh_all};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Arc<GenieClient>) {
    let server = MockServer::start().await;
    let client = GenieClient::new(
        server.uri().parse().unwrap(),
        Credentials::new("admin", "admin"),
        &TransportConfig::default(),
    )
    .unwrap();
    (server, Arc::new(client))
}

fn device(id: &str) -> serde_json::Value {
    json!({ "_id": id })
}

// ── refresh_all ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_all_empty_list_dispatches_nothing() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = refresh_all(&client).await.unwrap();

    assert_eq!(result.total_devices, 0);
    assert_eq!(result.success_count, 0);
    assert_eq!(result.failure_count, 0);
    assert!(result.outcomes.is_empty());
}

#[tokio::test]
async fn test_refresh_all_isolates_per_device_failures() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            device("dev-a"),
            device("dev-b"),
            device("dev-c"),
        ])))
        .mount(&server)
        .await;

    // dev-b's task creation fails; its siblings must be unaffected.
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .and(body_partial_json(json!({ "device": "dev-a" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "_id": "t-a" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .and(body_partial_json(json!({ "device": "dev-b" })))
        .respond_with(ResponseTemplate::new(500).set_body_string("queue full"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .and(body_partial_json(json!({ "device": "dev-c" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "_id": "t-c" })))
        .expect(1)
        .mount(&server)
        .await;

    let result = refresh_all(&client).await.unwrap();

    assert_eq!(result.total_devices, 3);
    assert_eq!(result.success_count, 2);
    assert_eq!(result.failure_count, 1);

    // Outcomes preserve device-list order.
    let ids: Vec<&str> = result
        .outcomes
        .iter()
        .map(|o| o.device_id.as_str())
        .collect();
    assert_eq!(ids, vec!["dev-a", "dev-b", "dev-c"]);

    assert!(result.outcomes[0].success);
    assert!(!result.outcomes[1].success);
    assert!(result.outcomes[1].error.as_deref().unwrap().contains("500"));
    assert!(result.outcomes[2].success);
}

#[tokio::test]
async fn test_refresh_all_propagates_list_failure() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    match refresh_all(&client).await {
        Err(CoreError::Api { status, .. }) => assert_eq!(status, Some(500)),
        other => panic!("expected Api error, got: {other:?}"),
    }
}

// ── reconnect_offline ───────────────────────────────────────────────

#[tokio::test]
async fn test_reconnect_targets_only_offline_devices() {
    let (server, client) = setup().await;

    let now = Utc::now();
    let recent = (now - TimeDelta::minutes(5)).to_rfc3339();
    let stale = (now - TimeDelta::minutes(20)).to_rfc3339();

    Mock::given(method("GET"))
        .and(path("/devices"))
        .and(query_param("projection", "_id,_lastInform"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "dev-a", "_lastInform": recent },
            { "_id": "dev-b", "_lastInform": stale },
            { "_id": "dev-c", "_lastInform": null },
        ])))
        .mount(&server)
        .await;

    // Exactly one connection request each for the stale and never-contacted
    // devices; the online device gets none (an unexpected call would fall
    // through unmatched and surface as a failure in the counts).
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .and(body_partial_json(json!({
            "device": "dev-b",
            "name": "connectionRequest",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "_id": "t-b" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .and(body_partial_json(json!({
            "device": "dev-c",
            "name": "connectionRequest",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "_id": "t-c" })))
        .expect(1)
        .mount(&server)
        .await;

    let result = reconnect_offline(&client).await.unwrap();

    assert_eq!(result.total_devices, 3);
    assert_eq!(result.offline_devices, Some(2));
    assert_eq!(result.success_count, 2);
    assert_eq!(result.failure_count, 0);

    let ids: Vec<&str> = result
        .outcomes
        .iter()
        .map(|o| o.device_id.as_str())
        .collect();
    assert_eq!(ids, vec!["dev-b", "dev-c"]);
}

#[tokio::test]
async fn test_reconnect_with_all_devices_online() {
    let (server, client) = setup().await;

    let now = Utc::now();
    let recent = (now - TimeDelta::minutes(1)).to_rfc3339();

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "dev-a", "_lastInform": recent },
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = reconnect_offline(&client).await.unwrap();

    assert_eq!(result.total_devices, 1);
    assert_eq!(result.offline_devices, Some(0));
    assert_eq!(result.success_count, 0);
    assert_eq!(result.failure_count, 0);
}
