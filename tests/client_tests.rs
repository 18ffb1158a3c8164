//! Integration tests for the async client against a mock Monitor server.
//!
//! These tests verify the session lifecycle (login, expiry, single retry,
//! single-flight login), request building on the wire, and the error
//! taxonomy end to end.

use monitor_api::clients::API_NOT_AVAILABLE_MESSAGE;
use monitor_api::{
    BaseUrl, BatchCommandEntity, BatchOptions, Client, CommandOptions, CompanyNumber, ErrorKind,
    LanguageCode, MonitorConfig, MonitorError, Password, QueryParams, Username,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOGIN_PATH: &str = "/en/001.1/login";
const PARTS_PATH: &str = "/en/001.1/api/v1/Inventory/Parts/";

/// Creates a config pointing at the mock server.
fn test_config(server: &MockServer, session_id: Option<&str>) -> MonitorConfig {
    let mut builder = MonitorConfig::builder()
        .company_number(CompanyNumber::new("001.1").unwrap())
        .username(Username::new("api-user").unwrap())
        .password(Password::new("secret").unwrap())
        .base_url(BaseUrl::new(server.uri()).unwrap());
    if let Some(id) = session_id {
        builder = builder.session_id(id);
    }
    builder.build().unwrap()
}

/// A successful login response issuing `token`.
fn login_response(token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("x-monitor-sessionid", token)
        .set_body_json(json!({"SessionSuspended": false}))
}

// ============================================================================
// Session lifecycle
// ============================================================================

#[tokio::test]
async fn test_login_posts_credentials_and_stores_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .and(body_json(json!({
            "Username": "api-user",
            "Password": "secret",
            "ForceRelogin": true
        })))
        .respond_with(login_response("ABC123"))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server, None)).unwrap();
    let session = client.login().await.unwrap();

    assert_eq!(session.token(), Some("ABC123"));
    assert_eq!(client.session().token(), Some("ABC123"));
    assert!(client.session().acquired_at().is_some());
}

#[tokio::test]
async fn test_expired_session_is_refreshed_and_request_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PARTS_PATH))
        .and(header("x-monitor-sessionid", "ABC123"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(login_response("XYZ987"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(PARTS_PATH))
        .and(header("x-monitor-sessionid", "XYZ987"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"Id": 1}])))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server, Some("ABC123"))).unwrap();
    let parts = client
        .query("Inventory", "Parts", &QueryParams::new())
        .await
        .unwrap();

    assert_eq!(parts, json!([{"Id": 1}]));
    assert_eq!(client.session().token(), Some("XYZ987"));
}

#[tokio::test]
async fn test_first_request_without_session_logs_in_on_demand() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PARTS_PATH))
        .and(header("x-monitor-sessionid", "NEW"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(login_response("NEW"))
        .expect(1)
        .mount(&server)
        .await;

    // Anything not carrying the new token is rejected.
    Mock::given(method("GET"))
        .and(path(PARTS_PATH))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server, None)).unwrap();
    let parts = client
        .query("Inventory", "Parts", &QueryParams::new())
        .await
        .unwrap();

    assert_eq!(parts, json!([]));
}

#[tokio::test]
async fn test_second_rejection_is_returned_as_invalid_session_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PARTS_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("Session expired"))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(login_response("XYZ987"))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server, Some("ABC123"))).unwrap();
    let error = client
        .query("Inventory", "Parts", &QueryParams::new())
        .await
        .unwrap_err();

    assert_eq!(
        error,
        MonitorError::InvalidSessionId {
            status: 401,
            body: "Session expired".to_string()
        }
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_rejections_share_a_single_login() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PARTS_PATH))
        .and(header("x-monitor-sessionid", "ABC123"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(login_response("XYZ987").set_delay(Duration::from_millis(300)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(PARTS_PATH))
        .and(header("x-monitor-sessionid", "XYZ987"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"Id": 1}])))
        .expect(10)
        .mount(&server)
        .await;

    let client = Arc::new(Client::new(test_config(&server, Some("ABC123"))).unwrap());

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let client = Arc::clone(&client);
            tokio::spawn(async move {
                client
                    .query("Inventory", "Parts", &QueryParams::new())
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), json!([{"Id": 1}]));
    }
    assert_eq!(client.session().generation(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_observe_the_same_login_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PARTS_PATH))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string("Invalid username or password")
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = Arc::new(Client::new(test_config(&server, Some("ABC123"))).unwrap());

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let client = Arc::clone(&client);
            tokio::spawn(async move {
                client
                    .query("Inventory", "Parts", &QueryParams::new())
                    .await
            })
        })
        .collect();

    for handle in handles {
        let error = handle.await.unwrap().unwrap_err();
        assert_eq!(
            error,
            MonitorError::LoginFailed {
                status: 400,
                body: "Invalid username or password".to_string()
            }
        );
    }
}

#[tokio::test]
async fn test_suspended_login_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-monitor-sessionid", "ABC123")
                .set_body_json(json!({"SessionSuspended": true})),
        )
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server, None)).unwrap();
    let error = client.login().await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::SessionSuspended);
    assert!(!client.session().is_active());
}

// ============================================================================
// Request building on the wire
// ============================================================================

#[tokio::test]
async fn test_query_sends_only_set_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/en/001.1/api/v1/Inventory/Parts/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Id": 42})))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server, Some("ABC123"))).unwrap();
    let params = QueryParams::new()
        .id(42)
        .filter("PartNumber eq 'P-1'")
        .select("")
        .top(5);
    client.query("Inventory", "Parts", &params).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let pairs: Vec<(String, String)> = requests[0]
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("$filter".to_string(), "PartNumber eq 'P-1'".to_string()),
            ("$top".to_string(), "5".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_query_language_override_changes_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sv/001.1/api/v1/Sales/Customers/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server, Some("ABC123"))).unwrap();
    let params = QueryParams::new().language(LanguageCode::new("sv").unwrap());
    client.query("Sales", "Customers", &params).await.unwrap();
}

#[tokio::test]
async fn test_command_path_variants() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/en/001.1/api/v1/Inventory/Parts/Create"))
        .and(body_json(json!({"PartNumber": "P-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"EntityId": 9})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/en/001.1/api/v1/Inventory/Parts/Create/Many/Simulate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/en/001.1/api/v1/Inventory/Parts/Update/Validate"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server, Some("ABC123"))).unwrap();

    let created = client
        .command(
            "Inventory",
            "Parts",
            "Create",
            Some(json!({"PartNumber": "P-1"})),
            &CommandOptions::new(),
        )
        .await
        .unwrap();
    assert_eq!(created, json!({"EntityId": 9}));

    client
        .command(
            "Inventory",
            "Parts",
            "Create",
            Some(json!([{"PartNumber": "P-2"}])),
            &CommandOptions::new().many(true).simulate(true),
        )
        .await
        .unwrap();

    let validated = client
        .command(
            "Inventory",
            "Parts",
            "Update",
            None,
            &CommandOptions::new().simulate(true).validate(true),
        )
        .await
        .unwrap();
    assert!(validated.is_null());
}

#[tokio::test]
async fn test_batch_body_preserves_order_and_metadata() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/en/001.1/api/v1/Batch"))
        .and(body_json(json!([
            {
                "Path": "Inventory/Parts/Create",
                "Body": {"PartNumber": "P-1"},
                "ForwardPropertyName": "EntityId",
                "ReceivingPropertyName": null
            },
            {
                "Path": "Common/Notes/Create",
                "Body": {"Text": "hello"},
                "ForwardPropertyName": null,
                "ReceivingPropertyName": "ParentId"
            }
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"IsSuccessful": true},
            {"IsSuccessful": true}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server, Some("ABC123"))).unwrap();
    let commands = [
        BatchCommandEntity::new("Inventory/Parts/Create", json!({"PartNumber": "P-1"}))
            .forward_property_name("EntityId"),
        BatchCommandEntity::new("Common/Notes/Create", json!({"Text": "hello"}))
            .receiving_property_name("ParentId"),
    ];

    let result = client
        .batch(&commands, &BatchOptions::new().raise_on_error(true))
        .await
        .unwrap();
    assert_eq!(result.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_batch_raise_on_error_reports_failing_entry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/en/001.1/api/v1/Batch/Simulate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"IsSuccessful": true},
            {"IsSuccessful": false, "ErrorMessage": "Part is locked"}
        ])))
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server, Some("ABC123"))).unwrap();
    let commands = [
        BatchCommandEntity::new("Inventory/Parts/Update", json!({})),
        BatchCommandEntity::new("Inventory/Parts/Update", json!({})),
    ];

    let error = client
        .batch(&commands, &BatchOptions::new().simulate(true).raise_on_error(true))
        .await
        .unwrap_err();

    match error {
        MonitorError::BatchCommandError { index, body, .. } => {
            assert_eq!(index, 1);
            assert!(body.contains("Part is locked"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ============================================================================
// Error taxonomy
// ============================================================================

async fn query_error(status: u16, body: &str) -> MonitorError {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server, Some("ABC123"))).unwrap();
    client
        .query("Inventory", "Parts", &QueryParams::new())
        .await
        .unwrap_err()
}

async fn command_error(status: u16, body: &str) -> MonitorError {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server, Some("ABC123"))).unwrap();
    client
        .command("Inventory", "Parts", "Update", None, &CommandOptions::new())
        .await
        .unwrap_err()
}

#[tokio::test]
async fn test_query_error_kinds() {
    let cases = [
        (400, "Id is not valid", ErrorKind::QueryInvalidId),
        (400, "Could not parse filter", ErrorKind::QueryInvalidFilter),
        (404, "Not found", ErrorKind::QueryEntityNotFound),
        (403, API_NOT_AVAILABLE_MESSAGE, ErrorKind::ApiNotAvailable),
        (403, "Another session is active", ErrorKind::SessionSuspended),
        (500, "NullReferenceException", ErrorKind::UnhandledException),
        (502, "Bad gateway", ErrorKind::QueryError),
    ];

    for (status, body, expected) in cases {
        let error = query_error(status, body).await;
        assert_eq!(error.kind(), expected, "status {status} body {body:?}");
        assert_eq!(error.status(), Some(status));
        assert_eq!(error.body(), Some(body));
    }
}

#[tokio::test]
async fn test_command_error_kinds() {
    let cases = [
        (400, "PartNumber is required", ErrorKind::CommandValidationFailure),
        (404, "Entity with id 5 was not found", ErrorKind::CommandEntityNotFound),
        (404, "Command was not found", ErrorKind::CommandNotFound),
        (409, "Entity has been modified", ErrorKind::CommandConflict),
        (500, "boom", ErrorKind::UnhandledException),
        (418, "teapot", ErrorKind::CommandError),
    ];

    for (status, body, expected) in cases {
        let error = command_error(status, body).await;
        assert_eq!(error.kind(), expected, "status {status} body {body:?}");
        assert_eq!(error.body(), Some(body));
    }
}

#[tokio::test]
async fn test_non_json_success_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server, Some("ABC123"))).unwrap();
    let error = client
        .query("Inventory", "Parts", &QueryParams::new())
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::InvalidResponse);
}

// ============================================================================
// Transport failures
// ============================================================================

#[tokio::test]
async fn test_unreachable_server_is_request_error() {
    let config = MonitorConfig::builder()
        .company_number(CompanyNumber::new("001.1").unwrap())
        .username(Username::new("api-user").unwrap())
        .password(Password::new("secret").unwrap())
        .base_url(BaseUrl::new("http://127.0.0.1:1").unwrap())
        .session_id("ABC123")
        .build()
        .unwrap();

    let client = Client::new(config).unwrap();
    let error = client
        .query("Inventory", "Parts", &QueryParams::new())
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::RequestError);
    assert!(error.status().is_none());
}

#[tokio::test]
async fn test_slow_server_is_timeout_request_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = MonitorConfig::builder()
        .company_number(CompanyNumber::new("001.1").unwrap())
        .username(Username::new("api-user").unwrap())
        .password(Password::new("secret").unwrap())
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .session_id("ABC123")
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();

    let client = Client::new(config).unwrap();
    let error = client
        .query("Inventory", "Parts", &QueryParams::new())
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        MonitorError::RequestError {
            is_timeout: true,
            ..
        }
    ));
}
