// Wire types for the control-plane API

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use uuid::Uuid;

/// Email + password used to add this device to an account.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserCredentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Sign-up request: credentials plus the code mailed by `request_code`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserCredentialsWithCode {
    pub email: String,
    pub password: String,
    pub code: String,
}

impl std::fmt::Debug for UserCredentialsWithCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCredentialsWithCode")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("code", &self.code)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OnlyEmail {
    pub email: String,
}

/// Public description of a device, sent when adding it to an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceInfo {
    pub unique_id: Uuid,
    pub name: String,
    pub version: String,
    pub arch: String,
    pub public_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddDeviceRequest {
    pub user_credentials: UserCredentials,
    pub device_info: DeviceInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceAddresses {
    pub ipv4_address: Ipv4Addr,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddDeviceResponse {
    pub token: String,
    pub device_addresses: DeviceAddresses,
}

impl std::fmt::Debug for AddDeviceResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddDeviceResponse")
            .field("token", &"<redacted>")
            .field("device_addresses", &self.device_addresses)
            .finish()
    }
}

/// A location as served by the catalog endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocationRecord {
    pub code: String,
    pub country: String,
    pub country_code: String,
    pub city: String,
    pub city_code: String,
    #[serde(default)]
    pub state: Option<String>,
}

/// Error body returned by the server on non-success statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub message: String,
}
