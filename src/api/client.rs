// Control-plane API client
//
// Endpoints (JSON bodies, snake_case fields):
//
//   POST /api/v1/device/add
//     Body: { user_credentials, device_info }
//     Response: { token, device_addresses: { ipv4_address } }
//
//   POST /api/v1/device/sign-out
//     Auth: Bearer <session token>
//
//   POST /api/v1/user/request-code
//     Body: { email }
//
//   POST /api/v1/user/sign-up
//     Body: { email, password, code }
//
//   GET /api/v1/locations
//     Response: [ { code, country, country_code, city, city_code, state? } ]
//
// Non-success responses carry { message }. 401 is reported as
// `ApiError::Unauthorized` no matter what the body says.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::retry::with_retry;
use super::types::{
    AddDeviceRequest, AddDeviceResponse, ErrorResponse, LocationRecord, OnlyEmail,
    UserCredentialsWithCode,
};
use super::VpnApi;
use crate::config::{Config, RetryConfig};
use crate::errors::ApiError;

/// HTTP implementation of [`VpnApi`].
pub struct ApiClient {
    base_url: String,
    http: Client,
    retry: RetryConfig,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("upvpn-core/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            http,
            retry: config.retry.clone(),
        })
    }

    async fn get_locations_once(&self) -> Result<Vec<LocationRecord>, ApiError> {
        tracing::debug!("GET /api/v1/locations");
        let resp = self.http.get(self.url("/api/v1/locations")).send().await?;
        let resp = check_status(resp).await?;
        parse_json(resp).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response, ApiError> {
        tracing::debug!("POST {}", path);
        let resp = self.http.post(self.url(path)).json(body).send().await?;
        check_status(resp).await
    }
}

#[async_trait]
impl VpnApi for ApiClient {
    async fn add_device(&self, request: &AddDeviceRequest) -> Result<AddDeviceResponse, ApiError> {
        let resp = self.post_json("/api/v1/device/add", request).await?;
        parse_json(resp).await
    }

    async fn sign_out(&self, token: Option<&str>) -> Result<(), ApiError> {
        tracing::debug!("POST /api/v1/device/sign-out");
        let mut req = self.http.post(self.url("/api/v1/device/sign-out"));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;
        check_status(resp).await?;
        Ok(())
    }

    async fn request_code(&self, request: &OnlyEmail) -> Result<(), ApiError> {
        self.post_json("/api/v1/user/request-code", request).await?;
        Ok(())
    }

    async fn sign_up(&self, request: &UserCredentialsWithCode) -> Result<(), ApiError> {
        self.post_json("/api/v1/user/sign-up", request).await?;
        Ok(())
    }

    /// Idempotent, so transient failures are retried.
    async fn get_locations(&self) -> Result<Vec<LocationRecord>, ApiError> {
        with_retry(&self.retry, || self.get_locations_once()).await
    }
}

/// Turn a non-success response into a classified error.
async fn check_status(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = error_message(status, &body);
    tracing::warn!("API error {}: {}", status, message);
    Err(ApiError::Rejected {
        status: status.as_u16(),
        message,
    })
}

fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorResponse>(body) {
        return parsed.message;
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

async fn parse_json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}
