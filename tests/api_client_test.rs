// Integration tests for the HTTP API client against a mock server

use anyhow::Result;
use std::net::Ipv4Addr;
use uuid::Uuid;

use upvpn_core::api::{
    AddDeviceRequest, ApiClient, DeviceInfo, OnlyEmail, UserCredentials, VpnApi,
};
use upvpn_core::config::{Config, RetryConfig};
use upvpn_core::ApiError;

fn client_for(url: &str) -> Result<ApiClient> {
    let config = Config {
        api_url: url.to_string(),
        request_timeout_secs: 5,
        retry: RetryConfig {
            max_attempts: 3,
            base_delay_ms: 0,
        },
        ..Config::default()
    };
    Ok(ApiClient::new(&config)?)
}

fn add_device_request() -> AddDeviceRequest {
    AddDeviceRequest {
        user_credentials: UserCredentials {
            email: "a@x.io".to_string(),
            password: "secret".to_string(),
        },
        device_info: DeviceInfo {
            unique_id: Uuid::new_v4(),
            name: "Linux ci-runner".to_string(),
            version: "6.6".to_string(),
            arch: "x86_64".to_string(),
            public_key: "cHVibGljLWtleQ==".to_string(),
        },
    }
}

#[tokio::test]
async fn test_add_device_success() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/device/add")
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"token":"tok-1","device_addresses":{"ipv4_address":"10.8.0.7"}}"#)
        .create_async()
        .await;

    let client = client_for(&server.url())?;
    let resp = client.add_device(&add_device_request()).await?;

    assert_eq!(resp.token, "tok-1");
    assert_eq!(resp.device_addresses.ipv4_address, Ipv4Addr::new(10, 8, 0, 7));
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_add_device_malformed_body() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/v1/device/add")
        .with_status(200)
        .with_body(r#"{"token":"tok-1"}"#)
        .create_async()
        .await;

    let client = client_for(&server.url())?;
    let err = client.add_device(&add_device_request()).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse(_)));
    Ok(())
}

#[tokio::test]
async fn test_unauthorized_is_classified() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/v1/device/sign-out")
        .with_status(401)
        .with_body(r#"{"message":"session expired"}"#)
        .create_async()
        .await;

    let client = client_for(&server.url())?;
    let err = client.sign_out(Some("tok-1")).await.unwrap_err();
    assert_eq!(err, ApiError::Unauthorized);
    Ok(())
}

#[tokio::test]
async fn test_sign_out_sends_bearer_token() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/device/sign-out")
        .match_header("authorization", "Bearer tok-1")
        .with_status(200)
        .create_async()
        .await;

    let client = client_for(&server.url())?;
    client.sign_out(Some("tok-1")).await?;
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_rejected_carries_server_message() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/v1/user/request-code")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"Email already registered"}"#)
        .create_async()
        .await;

    let client = client_for(&server.url())?;
    let err = client
        .request_code(&OnlyEmail {
            email: "a@x.io".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Rejected {
            status: 400,
            message: "Email already registered".to_string(),
        }
    );
    assert!(!err.is_retryable());
    Ok(())
}

#[tokio::test]
async fn test_get_locations_parses_catalog() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v1/locations")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
                {"code":"de-fra","country":"Germany","country_code":"DE","city":"Frankfurt","city_code":"FRA"},
                {"code":"us-sea","country":"United States","country_code":"US","city":"Seattle","city_code":"SEA","state":"WA"}
            ]"#,
        )
        .create_async()
        .await;

    let client = client_for(&server.url())?;
    let locations = client.get_locations().await?;

    assert_eq!(locations.len(), 2);
    assert_eq!(locations[0].state, None);
    assert_eq!(locations[1].state.as_deref(), Some("WA"));
    Ok(())
}

#[tokio::test]
async fn test_get_locations_retries_server_errors() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/locations")
        .with_status(503)
        .expect(3)
        .create_async()
        .await;

    let client = client_for(&server.url())?;
    let err = client.get_locations().await.unwrap_err();

    assert!(matches!(err, ApiError::Rejected { status: 503, .. }));
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_get_locations_does_not_retry_client_errors() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/locations")
        .with_status(404)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server.url())?;
    let err = client.get_locations().await.unwrap_err();

    assert!(matches!(err, ApiError::Rejected { status: 404, .. }));
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() -> Result<()> {
    // Bind then drop to get a port nothing listens on
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        listener.local_addr()?.port()
    };

    let client = client_for(&format!("http://127.0.0.1:{}", port))?;
    let err = client.sign_out(None).await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
    assert!(err.is_retryable());
    Ok(())
}
