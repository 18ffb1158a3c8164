//! Integration tests for the `reqwest` transport.
//!
//! These tests verify what actually goes over the wire: default headers,
//! the session header, query encoding and JSON bodies.

use monitor_api::clients::{login_request, query_request};
use monitor_api::{
    BaseUrl, CompanyNumber, HttpClient, HttpMethod, HttpRequest, MonitorConfig, Password,
    QueryParams, Transport, Username,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer) -> MonitorConfig {
    MonitorConfig::builder()
        .company_number(CompanyNumber::new("001.1").unwrap())
        .username(Username::new("api-user").unwrap())
        .password(Password::new("secret").unwrap())
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .user_agent_prefix("Integration/1.0")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_request_carries_default_and_session_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/en/001.1/api/v1/Inventory/Parts/"))
        .and(header("accept", "application/json"))
        .and(header("x-monitor-sessionid", "ABC123"))
        .and(header_exists("user-agent"))
        .and(query_param("$filter", "Id gt 5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let client = HttpClient::new(&config).unwrap();
    let mut request = query_request(
        &config,
        "Inventory",
        "Parts",
        &QueryParams::new().filter("Id gt 5"),
    );
    request.set_session_id("ABC123");

    let response = client.send(&request).await.unwrap();
    assert_eq!(response.code, 200);
    assert_eq!(response.body, "[]");
    assert!(client.default_headers()["user-agent"].starts_with("Integration/1.0 | "));
}

#[tokio::test]
async fn test_login_request_sends_json_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/en/001.1/login"))
        .and(body_json(json!({
            "Username": "api-user",
            "Password": "secret",
            "ForceRelogin": true
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Monitor-SessionId", "ABC123")
                .set_body_json(json!({"SessionSuspended": false})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let client = HttpClient::new(&config).unwrap();

    let response = client.send(&login_request(&config)).await.unwrap();
    assert!(response.is_ok());
    assert_eq!(response.session_id(), Some("ABC123"));
}

#[tokio::test]
async fn test_error_statuses_are_returned_not_raised() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let config = test_config(&server);
    let client = HttpClient::new(&config).unwrap();
    let request = HttpRequest::builder(HttpMethod::Post, format!("{}/anything", server.uri()))
        .body(json!({}))
        .build();

    let response = client.send(&request).await.unwrap();
    assert_eq!(response.code, 500);
    assert_eq!(response.body, "boom");
    assert!(!response.is_ok());
}
