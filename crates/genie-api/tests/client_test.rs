// Integration tests for `GenieClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use genie_api::models::TaskName;
use genie_api::transport::TransportConfig;
use genie_api::{Credentials, Error, GenieClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, GenieClient) {
    let server = MockServer::start().await;
    let url = server.uri().parse().unwrap();
    let client = GenieClient::new(
        url,
        Credentials::new("admin", "admin"),
        &TransportConfig::default(),
    )
    .unwrap();
    (server, client)
}

fn device_doc(id: &str, serial: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "_deviceId": {
            "_Manufacturer": "TP-Link",
            "_OUI": "ABCDEF",
            "_ProductClass": "EX220",
            "_SerialNumber": serial,
        },
        "_lastInform": "2025-03-01T12:00:00.000Z",
        "_registered": "2024-11-20T08:30:00.000Z",
        "Device": {
            "DeviceInfo": {
                "SoftwareVersion": { "_value": "1.2.3", "_writable": false }
            }
        }
    })
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            device_doc("dev-a", "SN-A"),
            device_doc("dev-b", "SN-B"),
        ])))
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();

    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].id, "dev-a");
    assert_eq!(devices[0].device_id.serial_number.as_deref(), Some("SN-A"));
    assert_eq!(
        devices[0].device_id.manufacturer.as_deref(),
        Some("TP-Link")
    );
    assert!(devices[0].last_inform.is_some());
    assert!(devices[0].parameters.contains_key("Device"));
}

#[tokio::test]
async fn test_get_device_is_a_filtered_list() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .and(query_param("query", r#"{"_id":"dev-a"}"#))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([device_doc("dev-a", "SN-A")])),
        )
        .mount(&server)
        .await;

    let device = client.get_device("dev-a").await.unwrap();
    assert_eq!(device.id, "dev-a");
}

#[tokio::test]
async fn test_get_device_empty_result_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = client.get_device("missing").await;

    match result {
        Err(Error::NotFound { ref resource }) => assert!(resource.contains("missing")),
        other => panic!("expected NotFound, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_list_device_contacts_projection() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .and(query_param("projection", "_id,_lastInform"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "dev-a", "_lastInform": "2025-03-01T12:00:00.000Z" },
            { "_id": "dev-b" },
        ])))
        .mount(&server)
        .await;

    let contacts = client.list_device_contacts().await.unwrap();

    assert_eq!(contacts.len(), 2);
    assert!(contacts[0].last_inform.is_some());
    assert!(contacts[1].last_inform.is_none());
}

#[tokio::test]
async fn test_delete_device_uses_query_filter() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/devices"))
        .and(query_param("query", r#"{"_id":"dev-a"}"#))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_device("dev-a").await.unwrap();
}

#[tokio::test]
async fn test_refresh_device_info_task_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/tasks"))
        .and(body_json(json!({
            "device": "dev-a",
            "name": "getParameterValues",
            "parameterNames": [
                "Device.DeviceInfo.HardwareVersion",
                "Device.DeviceInfo.SoftwareVersion",
                "Device.DeviceInfo.UpTime",
                "Device.DeviceInfo.SerialNumber",
                "Device.DeviceInfo.Manufacturer",
                "Device.DeviceInfo.ModelName",
                "Device.ManagementServer.ConnectionRequestURL",
                "Device.ManagementServer.ParameterKey",
            ],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "task-1",
            "device": "dev-a",
            "name": "getParameterValues",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let task = client.refresh_device_info("dev-a").await.unwrap();
    assert_eq!(task.id.as_deref(), Some("task-1"));
    assert_eq!(task.name.as_deref(), Some("getParameterValues"));
}

#[tokio::test]
async fn test_refresh_parameters_defaults_to_wildcard() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/tasks"))
        .and(body_json(json!({
            "device": "dev-a",
            "name": "getParameterValues",
            "parameterNames": ["*"],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "_id": "task-2" })))
        .expect(1)
        .mount(&server)
        .await;

    client.refresh_parameters("dev-a", None).await.unwrap();
}

#[tokio::test]
async fn test_set_parameter_sends_typed_triple() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/tasks"))
        .and(body_json(json!({
            "device": "dev-a",
            "name": "setParameterValues",
            "parameterValues": [[
                "InternetGatewayDevice.LANDevice.1.WLANConfiguration.1.SSID",
                "HomeNet",
                "xsd:string",
            ]],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "_id": "task-3" })))
        .expect(1)
        .mount(&server)
        .await;

    client
        .set_parameter(
            "dev-a",
            "InternetGatewayDevice.LANDevice.1.WLANConfiguration.1.SSID",
            "HomeNet",
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_connection_request_has_no_parameter_payload() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/tasks"))
        .and(body_json(json!({
            "device": "dev-b",
            "name": "connectionRequest",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "_id": "task-4" })))
        .expect(1)
        .mount(&server)
        .await;

    client.connection_request("dev-b").await.unwrap();
}

#[tokio::test]
async fn test_create_task_tolerates_empty_acknowledgment() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let task = client.reboot("dev-a").await.unwrap();
    assert!(task.id.is_none());
}

#[tokio::test]
async fn test_list_tasks_filters_by_device() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/tasks"))
        .and(query_param("query", r#"{"device":"dev-a"}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "task-1", "device": "dev-a", "name": "reboot" },
        ])))
        .mount(&server)
        .await;

    let tasks = client.list_tasks("dev-a").await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].name.as_deref(), Some("reboot"));
}

#[test]
fn test_task_name_wire_spelling() {
    assert_eq!(
        serde_json::to_string(&TaskName::ConnectionRequest).unwrap(),
        r#""connectionRequest""#
    );
    assert_eq!(
        serde_json::to_string(&TaskName::FactoryReset).unwrap(),
        r#""factoryReset""#
    );
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_error_400_is_validation() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad query"))
        .mount(&server)
        .await;

    match client.list_devices().await {
        Err(Error::Validation { ref message }) => assert_eq!(message, "bad query"),
        other => panic!("expected Validation, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_401_and_403_are_auth() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    assert!(client.list_devices().await.unwrap_err().is_auth());
    assert!(client.list_tasks("dev-a").await.unwrap_err().is_auth());
}

#[tokio::test]
async fn test_error_404_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert!(client.list_devices().await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_error_408_is_timeout() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(408))
        .mount(&server)
        .await;

    match client.list_devices().await {
        Err(Error::Timeout { .. }) => {}
        other => panic!("expected Timeout, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_500_is_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    match client.list_devices().await {
        Err(Error::Server {
            status,
            ref message,
        }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected Server, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_no_response_is_connectivity() {
    // Point the client at a server that is no longer listening.
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = GenieClient::new(
        uri.parse().unwrap(),
        Credentials::new("admin", "admin"),
        &TransportConfig::default(),
    )
    .unwrap();

    match client.list_devices().await {
        Err(Error::Connectivity(_)) => {}
        other => panic!("expected Connectivity, got: {other:?}"),
    }
}
