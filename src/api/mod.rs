// Control-plane API
//
// The sync layer talks to the server only through the `VpnApi` trait so the
// flows can be exercised against a scripted implementation. `ApiClient` is
// the HTTP implementation used in production.

use async_trait::async_trait;

pub mod client;
pub mod retry;
pub mod types;

pub use client::ApiClient;
pub use types::{
    AddDeviceRequest, AddDeviceResponse, DeviceAddresses, DeviceInfo, LocationRecord, OnlyEmail,
    UserCredentials, UserCredentialsWithCode,
};

use crate::errors::ApiError;

/// Remote operations the sync layer depends on.
///
/// Every call returns either its payload or a classified [`ApiError`]; none
/// of them touch local state.
#[async_trait]
pub trait VpnApi: Send + Sync {
    /// Add this device to the account identified by `request.user_credentials`.
    async fn add_device(&self, request: &AddDeviceRequest) -> Result<AddDeviceResponse, ApiError>;

    /// Revoke the session identified by `token`.
    ///
    /// Fails with [`ApiError::Unauthorized`] when the server no longer
    /// recognises the session.
    async fn sign_out(&self, token: Option<&str>) -> Result<(), ApiError>;

    /// Ask the server to email a sign-up code.
    async fn request_code(&self, request: &OnlyEmail) -> Result<(), ApiError>;

    async fn sign_up(&self, request: &UserCredentialsWithCode) -> Result<(), ApiError>;

    /// The full location catalog.
    async fn get_locations(&self) -> Result<Vec<LocationRecord>, ApiError>;
}
